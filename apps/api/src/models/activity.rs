use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "activity_kind", rename_all = "lowercase")]
pub enum ActivityKind {
    Email,
    Note,
    Call,
    Status,
    Meeting,
    Task,
}

/// Polymorphic audit entry. `subject_type`/`subject_id` reference any entity
/// informally; there is deliberately no foreign key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: Uuid,
    pub subject_type: String,
    pub subject_id: Uuid,
    pub kind: ActivityKind,
    pub body: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
