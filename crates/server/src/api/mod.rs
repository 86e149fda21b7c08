//! Passthrough routes of the records gateway.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::Value;
use shared::{error::GatewayError, protocol::GET_RECORDS_ROUTE};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::app_state::AppState;

#[derive(Debug, Error)]
enum UpstreamError {
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

pub(crate) fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(GET_RECORDS_ROUTE, get(proxy_get_records))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Forwards the upstream JSON body as-is, or reports the failure as
/// `{ "error": ... }` with status 500.
async fn proxy_get_records(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, (StatusCode, Json<GatewayError>)> {
    fetch_upstream(&state).await.map(Json).map_err(|error| {
        warn!(upstream = %state.upstream_url, %error, "GetRecords passthrough failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(GatewayError::new(error.to_string())),
        )
    })
}

async fn fetch_upstream(state: &AppState) -> Result<Value, UpstreamError> {
    debug!(upstream = %state.upstream_url, "forwarding GetRecords");
    let response = state.http.get(state.upstream_url.clone()).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Status(status.as_u16()));
    }

    Ok(response.json().await?)
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
