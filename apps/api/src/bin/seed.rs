//! Demo-data seeder. Expects an initialized schema (run `init-db` first).
//! Exits 0 on success, 1 on failure.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crm_api::config::Config;
use crm_api::db::Db;
use crm_api::seed::{seed_database, SeedConfig};

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

    let db = Db::open(&config.database_url).await?;
    let summary = seed_database(&db, &SeedConfig::default()).await?;
    db.close().await;

    info!(
        "Seed complete: {} companies / {} candidates / {} submissions",
        summary.companies, summary.candidates, summary.submissions
    );
    Ok(())
}
