//! Record store connection and schema

use anyhow::{Context, Result};
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::{Duration, Instant};
use tubely_core::Config;

/// Schema for the `videos` table, compiled into the binary.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Open the record store pool and bring the schema up to date.
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    let pool = connect(config).await?;
    migrate(&pool).await?;
    Ok(pool)
}

async fn connect(config: &Config) -> Result<PgPool> {
    let start = Instant::now();
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(POOL_IDLE_TIMEOUT)
        .connect(config.database_url())
        .await
        .context("Couldn't connect to the record store")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Record store connected"
    );
    Ok(pool)
}

async fn migrate(pool: &PgPool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("Couldn't apply record store migrations")?;
    tracing::info!(migrations = MIGRATOR.iter().count(), "Record store schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_videos_migration_is_embedded() {
        assert!(MIGRATOR
            .iter()
            .any(|migration| migration.description.contains("videos")));
    }
}
