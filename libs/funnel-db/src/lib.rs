pub mod models;
pub mod repositories;

pub use sqlx;
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

pub async fn connect(url: &str) -> Result<sqlx::PgPool> {
    if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
        return Err(anyhow::anyhow!(
            "DATABASE_URL must start with postgres:// or postgresql://"
        ));
    }

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(url)
        .await
        .context("Failed to connect to PostgreSQL")?;
    info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run DB migrations")?;
    info!("Database migrations applied");

    Ok(pool)
}
