//! Route definitions for storefront webhooks.

use axum::routing::post;
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

/// Routes mounted at `/webhooks/shopify`. All require a valid signature.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/order-created", post(webhooks::order_created))
        .route("/order-updated", post(webhooks::order_updated))
        .route("/product-created", post(webhooks::product_created))
        .route("/product-updated", post(webhooks::product_updated))
        .route("/customers-create", post(webhooks::customer_created))
        .route("/customers-update", post(webhooks::customer_updated))
}
