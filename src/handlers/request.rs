use actix_web::web::{Data, Json, Path};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{query, query_as, FromRow, PgPool};

use crate::context::UserInfo;
use crate::error::Error;
use crate::models::job::Job;
use crate::models::request::{RequestStatus, UserRequest};
use crate::response::Message;

static NO_REQUESTS: &str = "No requests found";
static REQUEST_NOT_FOUND: &str = "User request not found!";
static CAPACITY_EXHAUSTED: &str = "Maximum number of candidates has already been reached for this job. Cannot accept more requests!";
static CAPACITY_REACHED: &str = "Maximum number of candidates has been reached for this job. All pending requests have been declined.";

#[derive(Debug, FromRow)]
struct HistoryRow {
    id: i32,
    name: String,
    position: String,
    requested_time: NaiveDateTime,
    status: RequestStatus,
}

#[derive(Debug, Serialize)]
pub struct HistoryItem {
    id: i32,
    name: String,
    position: String,
    requested_time: String,
    status: RequestStatus,
}

#[derive(Debug, Serialize)]
pub struct History {
    requests: Vec<HistoryItem>,
    msg: String,
}

fn format_requested_time(t: &NaiveDateTime) -> String {
    t.format("%d-%m-%Y %H:%M").to_string()
}

pub async fn history(db: Data<PgPool>) -> Result<Json<History>, Error> {
    let rows: Vec<HistoryRow> = query_as(
        "SELECT ur.id, u.name, j.position, ur.requested_time, ur.status
        FROM user_requests AS ur
        JOIN users AS u ON ur.user_id = u.id
        JOIN jobs AS j ON ur.job_id = j.id
        ORDER BY ur.requested_time DESC",
    )
    .fetch_all(&mut db.acquire().await?)
    .await?;
    let requests = rows
        .into_iter()
        .map(|r| HistoryItem {
            id: r.id,
            name: r.name,
            position: r.position,
            requested_time: format_requested_time(&r.requested_time),
            status: r.status,
        })
        .collect();
    Ok(Json(History {
        requests,
        msg: "Applicant Requests History Retrieved Successfully!".into(),
    }))
}

#[derive(Debug, Serialize, FromRow)]
pub struct RequestItem {
    id: i32,
    name: String,
    email: String,
    position: String,
    status: RequestStatus,
    requested_time_formatted: String,
    user_id: i32,
}

pub async fn list(db: Data<PgPool>) -> Result<Json<Vec<RequestItem>>, Error> {
    let requests: Vec<RequestItem> = query_as(
        "SELECT ur.id, u.name, u.email, j.position, ur.status,
            TO_CHAR(ur.requested_time, 'YYYY-MM-DD HH24:MI:SS') AS requested_time_formatted,
            ur.user_id
        FROM user_requests AS ur
        JOIN users AS u ON ur.user_id = u.id
        JOIN jobs AS j ON ur.job_id = j.id
        ORDER BY ur.requested_time DESC",
    )
    .fetch_all(&mut db.acquire().await?)
    .await?;
    if requests.is_empty() {
        return Err(Error::NotFound(NO_REQUESTS.into()));
    }
    Ok(Json(requests))
}

#[derive(Debug, Serialize, FromRow)]
pub struct UserRequestItem {
    name: String,
    email: String,
    position: String,
    status: RequestStatus,
}

pub async fn list_by_user(user_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<Vec<UserRequestItem>>, Error> {
    let user_id = user_id.into_inner().0;
    let requests: Vec<UserRequestItem> = query_as(
        "SELECT u.name, u.email, j.position, ur.status
        FROM user_requests AS ur
        JOIN users AS u ON ur.user_id = u.id
        JOIN jobs AS j ON ur.job_id = j.id
        WHERE ur.user_id = $1",
    )
    .bind(user_id)
    .fetch_all(&mut db.acquire().await?)
    .await?;
    if requests.is_empty() {
        return Err(Error::NotFound(NO_REQUESTS.into()));
    }
    Ok(Json(requests))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

fn parse_target_status(status: &str) -> Result<RequestStatus, Error> {
    match status {
        "Accepted" => Ok(RequestStatus::Accepted),
        "Declined" => Ok(RequestStatus::Declined),
        _ => Err(Error::Business("Invalid status value!".into())),
    }
}

fn ensure_transition(current: RequestStatus, target: RequestStatus) -> Result<(), Error> {
    if current == target {
        return Err(Error::Business(format!("User request status is already {}!", target)));
    }
    Ok(())
}

// Accept/decline a request. Runs in one transaction with the request row
// locked: the capacity decrement is conditional on remaining capacity, so
// two concurrent accepts cannot drive max_candidate_number below zero.
pub async fn update_status(admin: UserInfo, id: Path<(i32,)>, Json(body): Json<StatusUpdate>, db: Data<PgPool>) -> Result<Json<Message>, Error> {
    let id = id.into_inner().0;
    let target = parse_target_status(&body.status)?;
    let mut tx = db.begin().await?;
    let request: UserRequest = query_as("SELECT * FROM user_requests WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut tx)
        .await?
        .ok_or_else(|| Error::NotFound(REQUEST_NOT_FOUND.into()))?;
    ensure_transition(request.status, target)?;
    if target == RequestStatus::Accepted {
        let decremented = query("UPDATE jobs SET max_candidate_number = max_candidate_number - 1 WHERE id = $1 AND max_candidate_number > 0")
            .bind(request.job_id)
            .execute(&mut tx)
            .await?
            .rows_affected();
        if decremented == 0 {
            return Err(Error::Business(CAPACITY_EXHAUSTED.into()));
        }
        query("UPDATE user_requests SET status = $1 WHERE id = $2")
            .bind(target)
            .bind(id)
            .execute(&mut tx)
            .await?;
        let job: Job = query_as("SELECT * FROM jobs WHERE id = $1")
            .bind(request.job_id)
            .fetch_one(&mut tx)
            .await?;
        if job.max_candidate_number == 0 {
            query("UPDATE user_requests SET status = $1 WHERE status = $2 AND job_id = $3")
                .bind(RequestStatus::Declined)
                .bind(RequestStatus::Pending)
                .bind(job.id)
                .execute(&mut tx)
                .await?;
            tx.commit().await?;
            log::info!("admin {} accepted request {}, job {} is now full", admin.id, id, job.id);
            return Ok(Json(Message::new(CAPACITY_REACHED)));
        }
    } else {
        query("UPDATE user_requests SET status = $1 WHERE id = $2")
            .bind(target)
            .bind(id)
            .execute(&mut tx)
            .await?;
    }
    tx.commit().await?;
    log::info!("admin {} set request {} to {}", admin.id, id, target);
    Ok(Json(Message::new("User request status updated successfully!")))
}
