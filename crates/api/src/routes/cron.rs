//! Route definitions for scheduler hooks.

use axum::routing::get;
use axum::Router;

use crate::handlers::cron;
use crate::state::AppState;

/// Routes mounted at `/cron`.
///
/// ```text
/// GET /ping    -> ping
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/ping", get(cron::ping))
}
