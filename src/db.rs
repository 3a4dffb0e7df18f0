use std::time::Duration;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;

/// Connects the pool and applies the schema in `migrations/`.
pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
        .context("connect to database")?;
    tracing::info!("database connected");

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("apply database schema")?;

    Ok(db)
}
