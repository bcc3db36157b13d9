use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Ideal customer profile for company targeting. The candidate-profile
/// variant stays client-local and is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Icp {
    pub id: Uuid,
    pub name: String,
    pub industry: Option<String>,
    pub size_min: Option<i32>,
    pub size_max: Option<i32>,
    pub tech_keywords: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
