use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-job knockout question.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScreeningQuestion {
    pub id: Uuid,
    pub job_id: Uuid,
    pub prompt: String,
    pub knockout: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One answer per `(submission, question)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScreeningResponse {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub question_id: Uuid,
    pub answer: Option<String>,
    pub passed: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
