use actix_web::web::{Data, Json, Path};
use lazy_static::lazy_static;
use serde::Deserialize;
use sqlx::{query, query_as, query_scalar, PgPool};
use validator::Validate;

use crate::context::UserInfo;
use crate::error::Error;
use crate::handlers::{hash_password, random_token};
use crate::models::user::{Applicant, UserType};
use crate::response::Message;

static APPLICANT_NOT_FOUND: &str = "Applicant not found !";

lazy_static! {
    static ref PHONE_REGEX: regex::Regex = regex::Regex::new(r"^\+?[0-9]{7,15}$").unwrap();
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApplicantPayload {
    #[validate(length(min = 10, max = 20, message = "name should be between (10-20) characters."))]
    pub name: String,
    #[validate(email(message = "Please Enter a Valid Email!"))]
    pub email: String,
    #[validate(regex(path = "PHONE_REGEX", message = "Please Enter a Valid Phone Number!"))]
    pub phone: String,
    #[validate(length(min = 8, max = 12, message = "password should be between (8-12) characters."))]
    pub password: String,
}

pub async fn create(admin: UserInfo, Json(payload): Json<ApplicantPayload>, db: Data<PgPool>) -> Result<Json<Applicant>, Error> {
    payload.validate()?;
    let mut conn = db.acquire().await?;
    let exists: bool = query_scalar("SELECT EXISTS(SELECT id FROM users WHERE email = $1)")
        .bind(&payload.email)
        .fetch_one(&mut conn)
        .await?;
    if exists {
        return Err(Error::Business("email is already exists!".into()));
    }
    let token = random_token();
    let password = hash_password(&payload.password)?;
    let (id,): (i32,) = query_as(
        "INSERT INTO users (name, email, password, phone, token, type) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&password)
    .bind(&payload.phone)
    .bind(&token)
    .bind(UserType::Applicant)
    .fetch_one(&mut conn)
    .await?;
    log::info!("admin {} created applicant {}", admin.id, id);
    Ok(Json(Applicant {
        id,
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        token,
    }))
}

pub async fn update(admin: UserInfo, id: Path<(i32,)>, Json(payload): Json<ApplicantPayload>, db: Data<PgPool>) -> Result<Json<Message>, Error> {
    payload.validate()?;
    let id = id.into_inner().0;
    let password = hash_password(&payload.password)?;
    let updated = query("UPDATE users SET name = $1, email = $2, phone = $3, password = $4 WHERE id = $5 AND type = $6")
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&password)
        .bind(id)
        .bind(UserType::Applicant)
        .execute(&mut db.acquire().await?)
        .await?
        .rows_affected();
    if updated == 0 {
        return Err(Error::NotFound(APPLICANT_NOT_FOUND.into()));
    }
    log::info!("admin {} updated applicant {}", admin.id, id);
    Ok(Json(Message::new("Applicant Updated Successfully !")))
}

pub async fn delete_applicant(admin: UserInfo, id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<Message>, Error> {
    let id = id.into_inner().0;
    let deleted = query("DELETE FROM users WHERE id = $1 AND type = $2")
        .bind(id)
        .bind(UserType::Applicant)
        .execute(&mut db.acquire().await?)
        .await?
        .rows_affected();
    if deleted == 0 {
        return Err(Error::NotFound(APPLICANT_NOT_FOUND.into()));
    }
    log::info!("admin {} deleted applicant {}", admin.id, id);
    Ok(Json(Message::new("Applicant Deleted Successfully !")))
}

pub async fn list(db: Data<PgPool>) -> Result<Json<Vec<Applicant>>, Error> {
    let applicants = query_as::<_, Applicant>("SELECT id, name, email, phone, token FROM users WHERE type = $1")
        .bind(UserType::Applicant)
        .fetch_all(&mut db.acquire().await?)
        .await?;
    Ok(Json(applicants))
}

pub async fn detail(id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<Applicant>, Error> {
    let id = id.into_inner().0;
    query_as::<_, Applicant>("SELECT id, name, email, phone, token FROM users WHERE id = $1 AND type = $2")
        .bind(id)
        .bind(UserType::Applicant)
        .fetch_optional(&mut db.acquire().await?)
        .await?
        .map(Json)
        .ok_or_else(|| Error::NotFound(APPLICANT_NOT_FOUND.into()))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::field_errors;

    fn payload() -> ApplicantPayload {
        ApplicantPayload {
            name: "Jonathan Smithson".into(),
            email: "jonathan@example.com".into(),
            phone: "+20123456789".into(),
            password: "secret1234".into(),
        }
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn test_short_name_is_rejected() {
        let mut p = payload();
        p.name = "Jonathan".into();
        let errors = p.validate().unwrap_err();
        let list = field_errors(&errors);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].param, "name");
        assert_eq!(list[0].msg, "name should be between (10-20) characters.");
    }

    #[test]
    fn test_long_name_is_rejected() {
        let mut p = payload();
        p.name = "Jonathan Smithson the Third of Cairo".into();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_invalid_email_is_rejected() {
        let mut p = payload();
        p.email = "not-an-email".into();
        let errors = p.validate().unwrap_err();
        let list = field_errors(&errors);
        assert_eq!(list[0].param, "email");
        assert_eq!(list[0].msg, "Please Enter a Valid Email!");
    }

    #[test]
    fn test_invalid_phone_is_rejected() {
        let mut p = payload();
        p.phone = "phone-number".into();
        let errors = p.validate().unwrap_err();
        let list = field_errors(&errors);
        assert_eq!(list[0].param, "phone");
        assert_eq!(list[0].msg, "Please Enter a Valid Phone Number!");
    }

    #[test]
    fn test_password_length_bounds() {
        let mut p = payload();
        p.password = "short".into();
        assert!(p.validate().is_err());
        p.password = "waytoolongpassword".into();
        assert!(p.validate().is_err());
        p.password = "12345678".into();
        assert!(p.validate().is_ok());
        p.password = "123456789012".into();
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("+20123456789"));
        assert!(PHONE_REGEX.is_match("01234567"));
        assert!(!PHONE_REGEX.is_match("123"));
        assert!(!PHONE_REGEX.is_match("+2012345678901234567"));
        assert!(!PHONE_REGEX.is_match("12a4567890"));
    }
}
