use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::client::source::{DataSource, SourceError};

/// Kanban-style stage state over a `DataSource`.
///
/// A move is a command with an explicit result: the card moves locally first,
/// the backing update is awaited, and a failed update reverts the local move
/// instead of leaving the board out of sync with the server.
pub struct PipelineBoard<T> {
    source: Arc<dyn DataSource<T>>,
    stage_field: String,
    stages: HashMap<Uuid, String>,
}

impl<T> PipelineBoard<T> {
    /// `stage_field` names the JSON field a move patches, e.g. "stage" for
    /// deals or "status" for submissions.
    pub fn new(
        source: Arc<dyn DataSource<T>>,
        stage_field: &str,
        cards: impl IntoIterator<Item = (Uuid, String)>,
    ) -> Self {
        PipelineBoard {
            source,
            stage_field: stage_field.to_string(),
            stages: cards.into_iter().collect(),
        }
    }

    pub fn stage_of(&self, id: Uuid) -> Option<&str> {
        self.stages.get(&id).map(String::as_str)
    }

    /// Ids currently in `stage`, for rendering one column.
    pub fn column(&self, stage: &str) -> Vec<Uuid> {
        self.stages
            .iter()
            .filter(|(_, s)| s.as_str() == stage)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Optimistically moves a card, then confirms with the data source.
    /// On failure the local move is reverted and the error returned.
    pub async fn apply_move(&mut self, id: Uuid, to_stage: &str) -> Result<T, SourceError> {
        let previous = self.stages.insert(id, to_stage.to_string());

        let mut patch = serde_json::Map::new();
        patch.insert(
            self.stage_field.clone(),
            Value::String(to_stage.to_string()),
        );
        match self.source.update(id, Value::Object(patch)).await {
            Ok(updated) => Ok(updated),
            Err(err) => {
                warn!("Stage move for {id} failed, reverting: {err}");
                match previous {
                    Some(stage) => {
                        self.stages.insert(id, stage);
                    }
                    None => {
                        self.stages.remove(&id);
                    }
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::source::FixtureSource;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Card {
        id: Uuid,
        stage: String,
    }

    fn board_with_card(stage: &str) -> (Uuid, PipelineBoard<Card>) {
        let id = Uuid::new_v4();
        let card = Card {
            id,
            stage: stage.to_string(),
        };
        let source = Arc::new(FixtureSource::new([(id, card)]));
        let board = PipelineBoard::new(source, "stage", [(id, stage.to_string())]);
        (id, board)
    }

    #[tokio::test]
    async fn test_move_updates_board_and_source() {
        let (id, mut board) = board_with_card("prospect");
        let updated = board.apply_move(id, "discovery").await.unwrap();
        assert_eq!(updated.stage, "discovery");
        assert_eq!(board.stage_of(id), Some("discovery"));
    }

    #[tokio::test]
    async fn test_failed_move_reverts_local_state() {
        let (id, mut board) = board_with_card("prospect");
        // Unknown card id: the source rejects the update.
        let ghost = Uuid::new_v4();
        board.stages.insert(ghost, "prospect".to_string());
        let err = board.apply_move(ghost, "discovery").await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
        assert_eq!(board.stage_of(ghost), Some("prospect"));
        assert_eq!(board.stage_of(id), Some("prospect"));
    }

    #[tokio::test]
    async fn test_column_groups_by_stage() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let source: Arc<FixtureSource<Card>> = Arc::new(FixtureSource::new([]));
        let board = PipelineBoard::new(
            source,
            "stage",
            [
                (a, "won".to_string()),
                (b, "won".to_string()),
                (c, "lost".to_string()),
            ],
        );
        let mut won = board.column("won");
        won.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(won, expected);
        assert_eq!(board.column("lost"), vec![c]);
    }
}
