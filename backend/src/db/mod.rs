//! Database connection and pool management
//!
//! This module provides database connection pooling with proper
//! configuration for production use including health checks,
//! connection timeouts, and retry logic.

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Attempts made before giving up on the database at startup
pub const MAX_CONNECT_ATTEMPTS: u32 = 5;
/// Upper bound for the delay between connection attempts
const MAX_RETRY_DELAY: Duration = Duration::from_secs(16);

/// Database configuration for pool creation
pub struct DbConfig {
    pub url: String,
    pub password: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            password: None,
            max_connections: 25,
            min_connections: 2,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 300,  // 5 minutes
            max_lifetime_secs: 300,  // 5 minutes
        }
    }
}

/// Create a PostgreSQL connection pool from the application configuration
///
/// Reads the password file if one is configured; its contents (minus
/// surrounding whitespace) replace any password in the URL.
pub async fn create_pool(database: &DatabaseConfig) -> Result<PgPool> {
    let password = match &database.password_file {
        Some(path) => {
            info!(path = %path.display(), "Reading database password file");
            let contents = std::fs::read_to_string(path).with_context(|| {
                format!("Failed to read database password file {}", path.display())
            })?;
            Some(contents.trim().to_string())
        }
        None => None,
    };

    let config = DbConfig {
        url: database.url.clone(),
        password,
        max_connections: database.max_connections,
        ..Default::default()
    };
    create_pool_with_retry(&config).await
}

/// Connect with exponential backoff (1s, 2s, 4s, ... capped at 16s)
pub async fn create_pool_with_retry(config: &DbConfig) -> Result<PgPool> {
    let mut delay = Duration::from_secs(1);
    let mut attempt = 1;

    loop {
        match create_pool_with_config(config).await {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt < MAX_CONNECT_ATTEMPTS => {
                warn!(
                    attempt,
                    max_attempts = MAX_CONNECT_ATTEMPTS,
                    retry_in_secs = delay.as_secs(),
                    "Database connection failed: {}",
                    e
                );
                tokio::time::sleep(delay).await;
                delay = next_retry_delay(delay);
                attempt += 1;
            }
            Err(e) => {
                return Err(e.context(format!(
                    "Failed to connect to database after {} attempts",
                    MAX_CONNECT_ATTEMPTS
                )))
            }
        }
    }
}

fn next_retry_delay(delay: Duration) -> Duration {
    (delay * 2).min(MAX_RETRY_DELAY)
}

/// Create a PostgreSQL connection pool with custom configuration
pub async fn create_pool_with_config(config: &DbConfig) -> Result<PgPool> {
    let mut connect_options =
        PgConnectOptions::from_str(&config.url)?.application_name("software-slayer");
    if let Some(password) = &config.password {
        connect_options = connect_options.password(password);
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await?;

    info!(
        "Database pool created: max={}, min={}",
        config.max_connections, config.min_connections
    );

    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed successfully");
    Ok(())
}

/// Check database health
pub async fn health_check(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| {
            warn!("Database health check failed: {}", e);
            e.into()
        })
}
