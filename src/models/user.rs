use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[repr(i16)]
pub enum UserType {
    Applicant = 0,
    Admin = 1,
}

// Full row, token middleware only. Never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub token: String,
    #[sqlx(rename = "type")]
    pub user_type: UserType,
}

// Applicant as echoed to admins: selected without the password column.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Applicant {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub token: String,
}
