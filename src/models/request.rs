use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Declined,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Accepted => "Accepted",
            RequestStatus::Declined => "Declined",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRequest {
    pub id: i32,
    pub user_id: i32,
    pub job_id: i32,
    pub requested_time: NaiveDateTime,
    pub status: RequestStatus,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(RequestStatus::Pending.to_string(), "Pending");
        assert_eq!(RequestStatus::Accepted.to_string(), "Accepted");
        assert_eq!(RequestStatus::Declined.to_string(), "Declined");
    }
}
