//! Handlers for the `/content` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pressroom_core::content::{ContentPatch, ContentRecord, NewContent};
use pressroom_core::query::{ContentPage, ContentQuery};

use super::parse_id;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::{ContentResponse, MessageResponse};
use crate::state::AppState;

/// GET /api/v1/content
///
/// Paginated listing of active content. Unknown filter values are ignored.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ContentQuery>,
) -> AppResult<Json<ContentPage>> {
    let page = state.service.list(&query).await?;
    Ok(Json(page))
}

/// POST /api/v1/content
pub async fn create(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Json(input): Json<NewContent>,
) -> AppResult<(StatusCode, Json<ContentResponse<ContentRecord>>)> {
    let record = state
        .service
        .create(input, user.as_ref().map(|u| &u.actor))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ContentResponse {
            message: "Content created successfully".into(),
            content: record,
        }),
    ))
}

/// GET /api/v1/content/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ContentRecord>> {
    let record = state.service.get(parse_id(&id)?).await?;
    Ok(Json(record))
}

/// PUT /api/v1/content/{id}
///
/// Partial update; returns 409 when `expected_revision` is stale.
pub async fn update(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<String>,
    Json(patch): Json<ContentPatch>,
) -> AppResult<Json<ContentRecord>> {
    let record = state
        .service
        .update(parse_id(&id)?, patch, user.as_ref().map(|u| &u.actor))
        .await?;
    Ok(Json(record))
}

/// DELETE /api/v1/content/{id}
///
/// Moves the record to the trash. Repeating the call succeeds.
pub async fn delete(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state
        .service
        .soft_delete(parse_id(&id)?, user.as_ref().map(|u| &u.actor))
        .await?;
    Ok(Json(MessageResponse::new("Content moved to trash")))
}
