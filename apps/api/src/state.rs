use crate::config::Config;
use crate::db::Db;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Config,
}
