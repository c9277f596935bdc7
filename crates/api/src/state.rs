use std::sync::Arc;

use pressroom_core::service::ContentService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Content operations over the configured store.
    pub service: ContentService,
    /// Server configuration (JWT settings are read by the auth extractor).
    pub config: Arc<ServerConfig>,
    /// Database connection pool, when running on Postgres.
    pub pool: Option<pressroom_db::DbPool>,
}
