//! Liveness and capability discovery.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rose_core::surface::{Capabilities, Surface};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub migrations_applied: usize,
    pub migrations_total: usize,
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = state.db.health_check().await;
    let (total, applied) = match state.db.migration_status().await {
        Ok(status) => status,
        Err(e) => {
            warn!(error = %e, "Migration status unavailable");
            (0, 0)
        }
    };

    let status = if database { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (
        status,
        Json(HealthResponse {
            status: if database { "OK" } else { "DEGRADED" },
            database,
            migrations_applied: applied,
            migrations_total: total,
        }),
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitiesResponse {
    pub surface: Surface,
    pub store_name: String,
    pub capabilities: Capabilities,
}

/// `GET /api/capabilities`: which tabs the client shows.
pub async fn capabilities(State(state): State<AppState>) -> Json<CapabilitiesResponse> {
    Json(CapabilitiesResponse {
        surface: state.config.server.surface,
        store_name: state.config.store.name.clone(),
        capabilities: state.capabilities(),
    })
}
