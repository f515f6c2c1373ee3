use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error as ThisError;
use validator::ValidationErrors;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("dotenv error: {0}")]
    DotEnv(#[from] dotenv::Error),

    #[error("validation error")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    Business(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("server error: {0}")]
    ServerError(String),
}

#[derive(Debug, Serialize, PartialEq)]
pub struct FieldError {
    pub param: String,
    pub msg: String,
}

#[derive(Debug, Serialize)]
struct ErrorList {
    errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
struct Msg {
    msg: String,
}

pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut list: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(param, errs)| {
            errs.iter().map(move |e| FieldError {
                param: param.to_string(),
                msg: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();
    list.sort_by(|a, b| a.param.cmp(&b.param));
    list
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::Business(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::Database(_) | Error::DotEnv(_) | Error::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Error::Validation(errors) => HttpResponse::build(self.status_code()).json(ErrorList {
                errors: field_errors(errors),
            }),
            Error::Business(msg) | Error::NotFound(msg) | Error::Forbidden(msg) => {
                HttpResponse::build(self.status_code()).json(Msg { msg: msg.clone() })
            }
            _ => {
                log::error!("{}", self);
                HttpResponse::build(self.status_code()).json(Msg {
                    msg: "internal server error".into(),
                })
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct Payload {
        #[validate(length(min = 3, message = "too short"))]
        name: String,
        #[validate(email(message = "not an email"))]
        email: String,
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::Business("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Error::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(Error::ServerError("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_field_errors_flatten_sorted() {
        let payload = Payload {
            name: "ab".into(),
            email: "nope".into(),
        };
        let errors = payload.validate().unwrap_err();
        let list = field_errors(&errors);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].param, "email");
        assert_eq!(list[0].msg, "not an email");
        assert_eq!(list[1].param, "name");
        assert_eq!(list[1].msg, "too short");
    }
}
