pub mod applicant;
pub mod request;

use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
use argon2::Argon2;
use hex::ToHex;
use rand::{thread_rng, Rng};

use crate::error::Error;

pub(crate) fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::ServerError(e.to_string()))?
        .to_string())
}

// Opaque bearer credential, 16 random bytes hex-encoded.
pub(crate) fn random_token() -> String {
    let bytes: [u8; 16] = thread_rng().gen();
    bytes.encode_hex()
}

#[cfg(test)]
mod test {
    use super::*;
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    #[test]
    fn test_random_token_shape() {
        let token = random_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_random_tokens_differ() {
        assert_ne!(random_token(), random_token());
    }

    #[test]
    fn test_hash_password_verifies() {
        let hash = hash_password("longenough").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(Argon2::default().verify_password(b"longenough", &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"wrong", &parsed).is_err());
    }
}
