//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! Everything here is built once at startup and read-only afterwards:
//! the pool and token keys are internally shared, so cloning is O(1).

use crate::auth::TokenService;
use crate::config::{AppConfig, ConfigError, ServerSecret};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Token service keyed by the server secret
    pub tokens: TokenService,
    /// Prometheus render handle, absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    ///
    /// Derives the token keys from `secret`; the secret itself is not kept.
    pub fn new(db: PgPool, config: AppConfig, secret: &ServerSecret) -> Result<Self, ConfigError> {
        let tokens = TokenService::new(secret.expose(), config.auth.token_lifetime()?);

        Ok(Self {
            db,
            config: Arc::new(config),
            tokens,
            metrics: None,
        })
    }

    /// Attach the Prometheus handle served on `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the database pool
    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the token service
    #[inline]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    #[inline]
    pub fn metrics(&self) -> Option<&PrometheusHandle> {
        self.metrics.as_ref()
    }
}
