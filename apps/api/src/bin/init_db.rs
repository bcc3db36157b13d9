//! Schema initialization CLI.
//!
//! Default run is tolerant: statements reporting "already exists" are skipped,
//! so re-running against an initialized database succeeds. `--reset` drops
//! everything first and recreates from scratch — dev/reset use only.
//!
//! Exits 0 on success, 1 on failure.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crm_api::config::Config;
use crm_api::db::Db;
use crm_api::schema::{init_schema, InitMode};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.rust_log)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mode = if std::env::args().any(|arg| arg == "--reset") {
        InitMode::Reset
    } else {
        InitMode::Tolerant
    };
    info!("Initializing schema ({mode:?} mode)");

    let db = Db::open(&config.database_url).await?;
    init_schema(db.pool(), mode).await?;
    db.close().await;

    info!("Done");
    Ok(())
}
