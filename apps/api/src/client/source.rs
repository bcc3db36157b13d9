use std::collections::HashMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Record {0} not found")]
    NotFound(Uuid),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid patch: {0}")]
    Patch(String),
}

/// Capability surface for a list view: fetch one, list all, patch one.
#[async_trait]
pub trait DataSource<T>: Send + Sync {
    async fn fetch(&self, id: Uuid) -> Result<Option<T>, SourceError>;
    async fn list(&self) -> Result<Vec<T>, SourceError>;
    async fn update(&self, id: Uuid, patch: Value) -> Result<T, SourceError>;
}

/// Which `DataSource` implementation backs the views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Fixture,
    Http,
}

impl SourceKind {
    /// Parses the `DATA_SOURCE` config value; anything other than "fixture"
    /// selects the HTTP client.
    pub fn from_config(value: &str) -> SourceKind {
        if value.eq_ignore_ascii_case("fixture") {
            SourceKind::Fixture
        } else {
            SourceKind::Http
        }
    }
}

/// In-memory fixture source. Patches are merged field-by-field into the
/// record's JSON representation, so it rejects patches the real API would
/// reject for shape reasons.
pub struct FixtureSource<T> {
    records: Mutex<HashMap<Uuid, T>>,
}

impl<T> FixtureSource<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(records: impl IntoIterator<Item = (Uuid, T)>) -> Self {
        FixtureSource {
            records: Mutex::new(records.into_iter().collect()),
        }
    }
}

#[async_trait]
impl<T> DataSource<T> for FixtureSource<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    async fn fetch(&self, id: Uuid) -> Result<Option<T>, SourceError> {
        Ok(self.records.lock().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>, SourceError> {
        Ok(self.records.lock().await.values().cloned().collect())
    }

    async fn update(&self, id: Uuid, patch: Value) -> Result<T, SourceError> {
        let mut records = self.records.lock().await;
        let existing = records.get(&id).ok_or(SourceError::NotFound(id))?;

        let mut merged =
            serde_json::to_value(existing).map_err(|e| SourceError::Patch(e.to_string()))?;
        let (Value::Object(target), Value::Object(fields)) = (&mut merged, &patch) else {
            return Err(SourceError::Patch("patch must be a JSON object".to_string()));
        };
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }

        let updated: T =
            serde_json::from_value(merged).map_err(|e| SourceError::Patch(e.to_string()))?;
        records.insert(id, updated.clone());
        Ok(updated)
    }
}

/// HTTP method `HttpSource::update` issues against `{path}/:id`. Deals,
/// submissions and sequence runs take PATCH; companies, jobs and candidates
/// take PUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMethod {
    Patch,
    Put,
}

/// HTTP-backed source talking to the `/api/*` endpoints.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
    path: String,
    update_method: UpdateMethod,
}

impl HttpSource {
    /// `path` is the collection route, e.g. "/api/deals". Updates go out as
    /// PATCH unless overridden with [`with_update_method`](Self::with_update_method).
    pub fn new(base_url: &str, path: &str) -> Self {
        HttpSource {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            path: path.to_string(),
            update_method: UpdateMethod::Patch,
        }
    }

    /// Switches the update verb for collections whose `:id` route expects PUT.
    pub fn with_update_method(mut self, method: UpdateMethod) -> Self {
        self.update_method = method;
        self
    }
}

#[async_trait]
impl<T> DataSource<T> for HttpSource
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    async fn fetch(&self, id: Uuid) -> Result<Option<T>, SourceError> {
        let response = self
            .client
            .get(format!("{}{}/{id}", self.base_url, self.path))
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(response.error_for_status()?.json().await?))
    }

    async fn list(&self) -> Result<Vec<T>, SourceError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, self.path))
            .send()
            .await?;
        Ok(response.error_for_status()?.json().await?)
    }

    async fn update(&self, id: Uuid, patch: Value) -> Result<T, SourceError> {
        let url = format!("{}{}/{id}", self.base_url, self.path);
        let request = match self.update_method {
            UpdateMethod::Patch => self.client.patch(url),
            UpdateMethod::Put => self.client.put(url),
        };
        let response = request.json(&patch).send().await?;
        Ok(response.error_for_status()?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Card {
        id: Uuid,
        title: String,
        stage: String,
    }

    fn card(title: &str, stage: &str) -> (Uuid, Card) {
        let id = Uuid::new_v4();
        (
            id,
            Card {
                id,
                title: title.to_string(),
                stage: stage.to_string(),
            },
        )
    }

    #[test]
    fn test_source_kind_from_config() {
        assert_eq!(SourceKind::from_config("fixture"), SourceKind::Fixture);
        assert_eq!(SourceKind::from_config("Fixture"), SourceKind::Fixture);
        assert_eq!(SourceKind::from_config("http"), SourceKind::Http);
        assert_eq!(SourceKind::from_config(""), SourceKind::Http);
    }

    #[tokio::test]
    async fn test_fixture_fetch_and_list() {
        let (id, c) = card("Acme intro", "prospect");
        let source = FixtureSource::new([(id, c.clone())]);
        assert_eq!(source.fetch(id).await.unwrap(), Some(c));
        assert_eq!(source.list().await.unwrap().len(), 1);
        assert_eq!(source.fetch(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_fixture_update_merges_patch() {
        let (id, c) = card("Acme intro", "prospect");
        let source = FixtureSource::new([(id, c)]);
        let updated = source
            .update(id, json!({ "stage": "discovery" }))
            .await
            .unwrap();
        assert_eq!(updated.stage, "discovery");
        assert_eq!(updated.title, "Acme intro");
    }

    #[tokio::test]
    async fn test_fixture_update_unknown_id() {
        let source: FixtureSource<Card> = FixtureSource::new([]);
        let err = source.update(Uuid::new_v4(), json!({})).await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_fixture_update_rejects_bad_shape() {
        let (id, c) = card("Acme intro", "prospect");
        let source = FixtureSource::new([(id, c.clone())]);
        let err = source
            .update(id, json!({ "stage": 42 }))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Patch(_)));
        // Failed update leaves the record untouched.
        assert_eq!(source.fetch(id).await.unwrap(), Some(c));
    }

    #[test]
    fn test_http_source_defaults_to_patch_updates() {
        let source = HttpSource::new("http://localhost:8080/", "/api/deals");
        assert_eq!(source.update_method, UpdateMethod::Patch);
        assert_eq!(source.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_http_source_update_method_is_configurable() {
        let source = HttpSource::new("http://localhost:8080", "/api/companies")
            .with_update_method(UpdateMethod::Put);
        assert_eq!(source.update_method, UpdateMethod::Put);
    }

    #[tokio::test]
    async fn test_fixture_update_rejects_non_object_patch() {
        let (id, c) = card("Acme intro", "prospect");
        let source = FixtureSource::new([(id, c)]);
        let err = source.update(id, json!("discovery")).await.unwrap_err();
        assert!(matches!(err, SourceError::Patch(_)));
    }
}
