use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Relationship state of a company in the pipeline. Enforced as a Postgres
/// enum column, not just application-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "partner_status", rename_all = "lowercase")]
pub enum PartnerStatus {
    Lead,
    Prospect,
    Active,
    Inactive,
    Churned,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub domain: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub location: Option<String>,
    pub partner_status: PartnerStatus,
    pub hiring_urgency: Option<String>,
    pub signals: Value,
    pub funding_amount: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partner_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PartnerStatus::Churned).unwrap(),
            "\"churned\""
        );
    }

    #[test]
    fn test_partner_status_deserializes() {
        let s: PartnerStatus = serde_json::from_str("\"lead\"").unwrap();
        assert_eq!(s, PartnerStatus::Lead);
    }
}
