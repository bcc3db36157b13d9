use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Standalone entity: candidates are not owned by a company. The pgvector
/// `embedding` column is excluded from row mapping, as with jobs.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub headline: Option<String>,
    pub skills: Vec<String>,
    pub tags: Vec<String>,
    pub education: Value,
    pub experience: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const CANDIDATE_COLUMNS: &str = "id, name, email, phone, location, headline, skills, tags, \
     education, experience, created_at, updated_at";
