use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "deal_stage", rename_all = "lowercase")]
pub enum DealStage {
    Prospect,
    Discovery,
    Proposal,
    Won,
    Lost,
}

/// `probability` lives in [0,100], enforced by a column CHECK. Stage carries
/// no linked probability rule.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Deal {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub stage: DealStage,
    pub value: Option<f64>,
    pub probability: Option<i32>,
    pub close_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_round_trip() {
        for (stage, text) in [
            (DealStage::Prospect, "\"prospect\""),
            (DealStage::Discovery, "\"discovery\""),
            (DealStage::Proposal, "\"proposal\""),
            (DealStage::Won, "\"won\""),
            (DealStage::Lost, "\"lost\""),
        ] {
            assert_eq!(serde_json::to_string(&stage).unwrap(), text);
            let back: DealStage = serde_json::from_str(text).unwrap();
            assert_eq!(back, stage);
        }
    }
}
