pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod health;
pub mod progress;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/shopify-verify                      storefront token login (public)
/// /auth/shopify-customer-login              signed login link (public, redirects)
/// /auth/me                                  caller's profile (requires auth)
/// /auth/sync-user                           refresh profile from storefront token
///
/// /courses                                  list active, upsert (upsert requires auth)
/// /courses/{id}                             get by id
/// /courses/shopify/{productId}              get active course by product id
/// /courses/user/{customerId}/{email}        path-style login link (redirects)
///
/// /enrollments                              caller's enrollments (requires auth)
/// /enrollments/{id}                         get (requires auth, owner only)
///
/// /progress                                 record update, enrollmentId in body
/// /progress/{enrollmentId}                  get, record update (owner only)
///
/// /webhooks/shopify/order-created           signed storefront webhooks
/// /webhooks/shopify/order-updated
/// /webhooks/shopify/product-created
/// /webhooks/shopify/product-updated
/// /webhooks/shopify/customers-create
/// /webhooks/shopify/customers-update
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/courses", courses::router())
        .nest("/enrollments", enrollments::router())
        .nest("/progress", progress::router())
        .nest("/webhooks/shopify", webhooks::router())
}
