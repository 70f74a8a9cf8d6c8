//! Health endpoints
//!
//! `/health` and `/health/live` answer without touching dependencies.
//! `/health/ready` probes PostgreSQL and Redis and answers 503 when the
//! database is unreachable.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::future::Future;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::startup::AppState;

static STARTED: Lazy<(Instant, DateTime<Utc>)> = Lazy::new(|| (Instant::now(), Utc::now()));

/// Pin the start time; called once during startup
pub fn init_server_start() {
    Lazy::force(&STARTED);
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<&'static str>,
}

/// One dependency probe
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Probe {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Probe {
    fn down(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            latency_ms: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub started_at: String,
    pub checks: BTreeMap<&'static str, Probe>,
}

pub async fn health_check() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "healthy",
        version: Some(env!("CARGO_PKG_VERSION")),
    })
}

pub async fn liveness() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive",
        version: None,
    })
}

pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let database = probe("Database", 100, async {
        sqlx::query("SELECT 1").execute(&state.db).await.map(drop)
    })
    .await;

    let redis = match state.redis.clone() {
        Some(mut conn) => {
            probe("Redis", 50, async move {
                redis::cmd("PING")
                    .query_async::<String>(&mut conn)
                    .await
                    .map(drop)
            })
            .await
        }
        None => Probe::down("Redis is not configured"),
    };

    let status = overall_status(&database, &redis);
    let code = if status == HealthStatus::Unhealthy {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    let (started, started_at) = &*STARTED;
    let response = ReadinessResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: started.elapsed().as_secs(),
        started_at: started_at.to_rfc3339(),
        checks: BTreeMap::from([("database", database), ("redis", redis)]),
    };

    (code, Json(response))
}

/// Run `check`; slower than `slow_ms` counts as degraded.
async fn probe<F, E>(name: &str, slow_ms: u64, check: F) -> Probe
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    let start = Instant::now();
    match check.await {
        Ok(()) => {
            let latency = start.elapsed().as_millis() as u64;
            Probe {
                status: if latency < slow_ms {
                    HealthStatus::Healthy
                } else {
                    HealthStatus::Degraded
                },
                latency_ms: Some(latency),
                message: None,
            }
        }
        Err(e) => Probe::down(format!("{} connection failed: {}", name, e)),
    }
}

/// Losing the database is fatal; losing Redis only degrades sign-in flows.
fn overall_status(database: &Probe, redis: &Probe) -> HealthStatus {
    match (database.status, redis.status) {
        (HealthStatus::Unhealthy, _) => HealthStatus::Unhealthy,
        (HealthStatus::Healthy, HealthStatus::Healthy) => HealthStatus::Healthy,
        _ => HealthStatus::Degraded,
    }
}
