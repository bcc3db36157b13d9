use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "submission_status", rename_all = "lowercase")]
pub enum SubmissionStatus {
    Draft,
    Sent,
    Interview,
    Offer,
    Rejected,
}

/// One pipeline entry per `(job, candidate)` pair; the pair is unique at the
/// database level.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Submission {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub status: SubmissionStatus,
    pub match_score: Option<f64>,
    pub match_reasons: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
