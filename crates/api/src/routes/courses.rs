//! Route definitions for the `/courses` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{auth, courses};
use crate::state::AppState;

/// Routes mounted at `/courses`.
///
/// ```text
/// GET  /                          -> list_courses
/// POST /                          -> upsert_course (requires auth)
/// GET  /{id}                      -> get_course
/// GET  /shopify/{product_id}      -> get_course_by_product
/// GET  /user/{customer_id}/{email} -> legacy_customer_login
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(courses::list_courses).post(courses::upsert_course))
        .route("/{id}", get(courses::get_course))
        .route("/shopify/{product_id}", get(courses::get_course_by_product))
        .route(
            "/user/{customer_id}/{email}",
            get(auth::legacy_customer_login),
        )
}
