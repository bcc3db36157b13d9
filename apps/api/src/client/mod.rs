//! Client-side data access: a `DataSource` seam with an in-memory fixture
//! implementation and an HTTP-backed one, plus the pipeline board state that
//! consumes it. Which implementation backs a view is configuration, not a
//! hardcoded mock array.

pub mod pipeline;
pub mod source;

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::config::Config;
use crate::models::deal::{Deal, DealStage};

pub use pipeline::PipelineBoard;
pub use source::{DataSource, FixtureSource, HttpSource, SourceError, SourceKind, UpdateMethod};

/// Deal source for the pipeline board, selected by `DATA_SOURCE`.
pub fn deal_source(config: &Config) -> Arc<dyn DataSource<Deal>> {
    match SourceKind::from_config(&config.data_source) {
        SourceKind::Http => Arc::new(HttpSource::new(&config.api_base_url, "/api/deals")),
        SourceKind::Fixture => Arc::new(FixtureSource::new(fixture_deals())),
    }
}

/// Sample deals for fixture mode, spread across the pipeline stages.
pub fn fixture_deals() -> Vec<(Uuid, Deal)> {
    let company_id = Uuid::new_v4();
    [
        ("Northwind platform build-out", DealStage::Prospect, 45_000.0, 20),
        ("Initech staffing retainer", DealStage::Discovery, 120_000.0, 45),
        ("Globex contract-to-hire", DealStage::Proposal, 80_000.0, 70),
    ]
    .into_iter()
    .map(|(name, stage, value, probability)| {
        let id = Uuid::new_v4();
        (
            id,
            Deal {
                id,
                company_id,
                name: name.to_string(),
                stage,
                value: Some(value),
                probability: Some(probability),
                close_date: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        )
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixture_deals_back_a_board() {
        let fixtures = fixture_deals();
        let first = fixtures[0].0;
        let cards: Vec<(Uuid, String)> = fixtures
            .iter()
            .map(|(id, deal)| (*id, serde_json::to_value(deal.stage).unwrap().as_str().unwrap().to_string()))
            .collect();
        let source = Arc::new(FixtureSource::new(fixtures));
        let mut board = PipelineBoard::new(source, "stage", cards);

        assert_eq!(board.stage_of(first), Some("prospect"));
        let updated = board.apply_move(first, "discovery").await.unwrap();
        assert_eq!(updated.stage, DealStage::Discovery);
        assert_eq!(board.stage_of(first), Some("discovery"));
    }
}
