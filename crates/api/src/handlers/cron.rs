//! Scheduled keep-alive endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// GET /api/v1/cron/ping
///
/// Runs a one-row listing so an external scheduler can keep the backing
/// database from idling out.
pub async fn ping(State(state): State<AppState>) -> AppResult<Json<PingResponse>> {
    state.service.ping().await?;
    tracing::debug!("Keep-alive ping succeeded");
    Ok(Json(PingResponse {
        status: "ok",
        message: "Storage pinged successfully",
    }))
}
