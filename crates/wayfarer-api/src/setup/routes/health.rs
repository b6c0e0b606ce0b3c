//! Liveness and readiness probes.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use wayfarer_db::{Collection, Filter};

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Check {
    Healthy,
    Unhealthy,
    Timeout,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    status: Check,
    database: Check,
    storage: Check,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    problems: Vec<String>,
}

async fn probe<E: Display>(
    name: &str,
    check: impl Future<Output = Result<(), E>>,
    problems: &mut Vec<String>,
) -> Check {
    match tokio::time::timeout(PROBE_TIMEOUT, check).await {
        Ok(Ok(())) => Check::Healthy,
        Ok(Err(e)) => {
            tracing::warn!(probe = name, error = %e, "Health probe failed");
            problems.push(format!("{}: {}", name, e));
            Check::Unhealthy
        }
        Err(_) => {
            tracing::warn!(
                probe = name,
                timeout_secs = PROBE_TIMEOUT.as_secs(),
                "Health probe timed out"
            );
            problems.push(format!("{}: timed out", name));
            Check::Timeout
        }
    }
}

pub async fn liveness_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "alive" }))
}

/// Ready when the document store answers. The media root is reported only.
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthReport>) {
    let mut problems = Vec::new();

    let database = probe(
        "database",
        async { state.store.count(Collection::Addresses, &Filter::new()).await.map(drop) },
        &mut problems,
    )
    .await;
    let storage = probe(
        "storage",
        async { tokio::fs::metadata(&state.media_root).await.map(drop) },
        &mut problems,
    )
    .await;

    let (status, code) = match database {
        Check::Healthy => (Check::Healthy, StatusCode::OK),
        _ => (Check::Unhealthy, StatusCode::SERVICE_UNAVAILABLE),
    };
    (
        code,
        Json(HealthReport {
            status,
            database,
            storage,
            problems,
        }),
    )
}
