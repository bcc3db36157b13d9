use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
pub enum JobStatus {
    Draft,
    Published,
    Closed,
}

/// The `embedding` column (pgvector) is intentionally absent here: queries
/// against jobs use an explicit column list and never fetch it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: JobStatus,
    pub location: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub requirements: Vec<String>,
    pub nice_to_haves: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column list for SELECTs against jobs, excluding the embedding.
pub const JOB_COLUMNS: &str = "id, company_id, title, description, status, location, \
     salary_min, salary_max, requirements, nice_to_haves, created_at, updated_at";
