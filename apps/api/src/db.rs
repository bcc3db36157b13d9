use std::time::Duration;

use anyhow::Result;
use futures::future::BoxFuture;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{error, info};

/// Explicitly constructed database handle. Owns the connection pool and its
/// lifecycle; handlers receive it through `AppState` rather than a module-level
/// singleton.
#[derive(Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    /// Opens a PostgreSQL connection pool: up to 20 connections, 30s idle
    /// timeout, 2s acquire timeout.
    pub async fn open(database_url: &str) -> Result<Self> {
        info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(20)
            .idle_timeout(Duration::from_secs(30))
            .acquire_timeout(Duration::from_secs(2))
            .connect(database_url)
            .await?;

        info!("PostgreSQL connection pool established");
        Ok(Db { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs `f` inside BEGIN/COMMIT; any error rolls back. The connection is
    /// returned to the pool either way. No retry policy: failures surface
    /// immediately to the caller.
    pub async fn transaction<T, F>(&self, f: F) -> Result<T, sqlx::Error>
    where
        F: for<'c> FnOnce(
            &'c mut Transaction<'static, Postgres>,
        ) -> BoxFuture<'c, Result<T, sqlx::Error>>,
    {
        let mut tx = self.pool.begin().await?;
        match f(&mut tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    error!("Transaction rollback failed: {rollback_err}");
                }
                Err(err)
            }
        }
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL connection pool closed");
    }
}
