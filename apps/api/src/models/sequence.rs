use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "run_status", rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Sent,
    Replied,
    Stopped,
    Completed,
}

/// Outreach automation definition; `steps` is an ordered JSON array.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sequence {
    pub id: Uuid,
    pub name: String,
    pub steps: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-contact execution state of a sequence; one run per
/// `(sequence, contact)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SequenceRun {
    pub id: Uuid,
    pub sequence_id: Uuid,
    pub contact_id: Uuid,
    pub status: RunStatus,
    pub current_step: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
