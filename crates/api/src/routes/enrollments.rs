//! Route definitions for the `/enrollments` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::enrollments;
use crate::state::AppState;

/// Routes mounted at `/enrollments`. All require auth.
///
/// ```text
/// GET /       -> list_enrollments
/// GET /{id}   -> get_enrollment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(enrollments::list_enrollments))
        .route("/{id}", get(enrollments::get_enrollment))
}
