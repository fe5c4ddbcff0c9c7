//! SQLite connection pooling

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info};

use crate::infrastructure::config::AppConfig;

/// Opens the pool described by `config`, creating the database file if needed.
///
/// In-memory databases live as long as their connection, so they get exactly
/// one connection that is never recycled.
pub async fn init_pool(config: &AppConfig) -> Result<SqlitePool> {
    info!(database_url = %config.database_url, "Initializing database connection pool");

    let options = SqliteConnectOptions::from_str(&config.database_url)
        .with_context(|| format!("invalid DATABASE_URL: {}", config.database_url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let in_memory = config.database_url.contains(":memory:")
        || config.database_url.contains("mode=memory");

    let pool_options = SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(30));
    let pool_options = if in_memory {
        pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        pool_options.max_connections(config.max_connections.max(1))
    };

    let pool = pool_options.connect_with(options).await?;

    info!(in_memory, "Database connection pool initialized");
    Ok(pool)
}

pub async fn health_check(pool: &SqlitePool) -> bool {
    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => true,
        Err(e) => {
            error!(error = %e, "Database health check failed");
            false
        }
    }
}
