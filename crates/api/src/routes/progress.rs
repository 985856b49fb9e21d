//! Route definitions for the `/progress` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

/// Routes mounted at `/progress`. All require auth.
///
/// ```text
/// POST /                  -> post_progress
/// GET  /{enrollment_id}   -> get_progress
/// PUT  /{enrollment_id}   -> put_progress
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(progress::post_progress))
        .route(
            "/{enrollment_id}",
            get(progress::get_progress).put(progress::put_progress),
        )
}
