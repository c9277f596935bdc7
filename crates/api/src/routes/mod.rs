pub mod content;
pub mod cron;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /content                     list (public), create (auth)
/// /content/{id}                get (public), update, delete (auth)
/// /content/trash               list trashed (public), empty trash (auth)
/// /content/trash/{id}          restore via action body, purge (auth)
///
/// /cron/ping                   storage keep-alive
/// ```
///
/// The health check lives at the root (`/health`), see [`health::router`].
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Content CRUD, with the trash nested underneath.
        .nest("/content", content::router())
        // Scheduler hooks.
        .nest("/cron", cron::router())
}
