//! Handlers for the content trash.
//!
//! Listing, restoring and purging (hard-deleting) soft-deleted records.

use axum::extract::{Path, Query, State};
use axum::Json;
use pressroom_core::content::{ContentRecord, ContentType};
use pressroom_core::service::TrashListing;
use serde::Deserialize;

use super::parse_id;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{MessageResponse, PurgeResponse};
use crate::state::AppState;

/// Query parameters for the trash listing endpoint.
#[derive(Debug, Deserialize)]
pub struct TrashQuery {
    /// Optional content type filter; `all` or unknown values list everything.
    #[serde(alias = "contentType")]
    pub content_type: Option<String>,
}

/// Body of `PUT /content/trash/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct TrashAction {
    #[serde(default)]
    pub action: Option<String>,
}

/// GET /api/v1/content/trash
pub async fn list_trashed(
    State(state): State<AppState>,
    Query(params): Query<TrashQuery>,
) -> AppResult<Json<TrashListing>> {
    let content_type = params.content_type.as_deref().and_then(ContentType::parse);
    let listing = state.service.list_trash(content_type).await?;
    Ok(Json(listing))
}

/// PUT /api/v1/content/trash/{id}
///
/// The only supported action is `restore`.
pub async fn apply_action(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<TrashAction>,
) -> AppResult<Json<ContentRecord>> {
    let id = parse_id(&id)?;
    match body.action.as_deref().map(str::trim) {
        Some("restore") => {}
        Some(other) if !other.is_empty() => {
            return Err(AppError::BadRequest(format!(
                "Invalid action '{other}'. Supported actions: restore"
            )));
        }
        _ => {
            return Err(AppError::BadRequest(
                "Missing action. Supported actions: restore".into(),
            ));
        }
    }
    let record = state
        .service
        .restore(id, user.as_ref().map(|u| &u.actor))
        .await?;
    Ok(Json(record))
}

/// DELETE /api/v1/content/trash/{id}
///
/// Permanently delete one trashed record. 409 while other resources still
/// name it as their parent.
pub async fn purge_one(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state
        .service
        .purge(parse_id(&id)?, user.as_ref().map(|u| &u.actor))
        .await?;
    Ok(Json(MessageResponse::new("Content permanently deleted")))
}

/// DELETE /api/v1/content/trash
///
/// Permanently delete every trashed record that nothing else depends on.
pub async fn purge_all(
    State(state): State<AppState>,
    user: Option<AuthUser>,
) -> AppResult<Json<PurgeResponse>> {
    let purged = state
        .service
        .empty_trash(user.as_ref().map(|u| &u.actor))
        .await?;
    Ok(Json(PurgeResponse {
        message: format!("Permanently deleted {purged} item(s)"),
        purged,
    }))
}
