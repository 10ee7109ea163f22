//! Service probes and metrics scrape
//!
//! `/health` and `/health/live` answer from the process alone. `/health/ready`
//! runs `SELECT 1` against the Postgres pool that backs users, skills and the
//! learning list, and answers 503 until it succeeds. `/metrics` renders the
//! Prometheus registry when a recorder is installed.

use crate::{db, state::AppState};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::{Duration, Instant};

const SERVICE_NAME: &str = "software-slayer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    Healthy,
    Alive,
    Ready,
    NotReady,
}

/// Outcome of the `SELECT 1` round trip
#[derive(Debug, Serialize)]
pub struct PostgresCheck {
    pub reachable: bool,
    pub latency_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct ProbeResponse {
    pub service: &'static str,
    pub status: ProbeStatus,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postgres: Option<PostgresCheck>,
}

impl ProbeResponse {
    fn process(status: ProbeStatus) -> Self {
        Self {
            service: SERVICE_NAME,
            status,
            version: env!("CARGO_PKG_VERSION"),
            postgres: None,
        }
    }

    /// Readiness verdict for a finished database check
    fn readiness(reachable: bool, elapsed: Duration) -> (StatusCode, Self) {
        let (code, status) = if reachable {
            (StatusCode::OK, ProbeStatus::Ready)
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, ProbeStatus::NotReady)
        };
        let latency_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        let mut response = Self::process(status);
        response.postgres = Some(PostgresCheck {
            reachable,
            latency_ms,
        });
        (code, response)
    }
}

/// GET /health
pub async fn health_check() -> Json<ProbeResponse> {
    Json(ProbeResponse::process(ProbeStatus::Healthy))
}

/// GET /health/ready
///
/// The failure reason is logged by `db::health_check`, not returned.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ProbeResponse>) {
    let started = Instant::now();
    let reachable = db::health_check(state.db()).await.is_ok();
    let (code, response) = ProbeResponse::readiness(reachable, started.elapsed());
    (code, Json(response))
}

/// GET /health/live
pub async fn liveness_check() -> Json<ProbeResponse> {
    Json(ProbeResponse::process(ProbeStatus::Alive))
}

/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics() {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
