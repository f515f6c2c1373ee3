use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Job {
    pub id: i32,
    pub position: String,
    pub max_candidate_number: i32,
}
