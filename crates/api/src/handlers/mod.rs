//! Request handlers.
//!
//! Handlers extract the request, delegate to the [`ContentService`] held in
//! [`AppState`] and map errors via [`AppError`].
//!
//! [`ContentService`]: pressroom_core::service::ContentService
//! [`AppState`]: crate::state::AppState
//! [`AppError`]: crate::error::AppError

pub mod content;
pub mod cron;
pub mod trash;

use pressroom_core::types::ContentId;

use crate::error::{AppError, AppResult};

/// Parse a content id from a path segment.
pub(crate) fn parse_id(raw: &str) -> AppResult<ContentId> {
    ContentId::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid content id '{raw}'")))
}
