//! Route definitions for the `/content` resource.
//!
//! Also nests the trash under `/content/trash`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{content, trash};
use crate::state::AppState;

/// Routes mounted at `/content`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete        (soft delete)
///
/// GET    /trash         -> list_trashed  (?contentType=)
/// DELETE /trash         -> purge_all
/// PUT    /trash/{id}    -> apply_action  ({"action": "restore"})
/// DELETE /trash/{id}    -> purge_one
/// ```
pub fn router() -> Router<AppState> {
    let trash_routes = Router::new()
        .route("/", get(trash::list_trashed).delete(trash::purge_all))
        .route("/{id}", put(trash::apply_action).delete(trash::purge_one));

    Router::new()
        .route("/", get(content::list).post(content::create))
        .route(
            "/{id}",
            get(content::get_by_id)
                .put(content::update)
                .delete(content::delete),
        )
        .nest("/trash", trash_routes)
}
