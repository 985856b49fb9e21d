//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /shopify-verify          -> shopify_verify
/// GET  /shopify-customer-login  -> shopify_customer_login
/// GET  /me                      -> me (requires auth)
/// POST /sync-user               -> sync_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/shopify-verify", post(auth::shopify_verify))
        .route("/shopify-customer-login", get(auth::shopify_customer_login))
        .route("/me", get(auth::me))
        .route("/sync-user", post(auth::sync_user))
}
