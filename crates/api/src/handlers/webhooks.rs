//! Handlers for storefront webhooks under `/webhooks/shopify`.
//!
//! Every handler takes a [`ShopifyWebhook`], so the signature is verified
//! before the body is parsed. Skipped line items still answer 200; only a
//! structurally invalid delivery is rejected.

use axum::extract::State;
use axum::Json;
use lms_core::shopify::{CustomerPayload, OrderPayload, ProductPayload};

use crate::error::AppResult;
use crate::middleware::webhook::ShopifyWebhook;
use crate::response::WebhookAck;
use crate::state::AppState;
use crate::sync::{catalog, customer, order};

/// POST /api/webhooks/shopify/order-created
pub async fn order_created(
    State(state): State<AppState>,
    webhook: ShopifyWebhook,
) -> AppResult<Json<WebhookAck>> {
    let payload: OrderPayload = webhook.payload()?;
    let snapshot = webhook.snapshot()?;
    tracing::info!(
        order_id = %payload.id,
        order_number = ?payload.order_number,
        shop = %webhook.shop_domain,
        topic = %webhook.topic,
        "Order received",
    );

    let outcome = order::process_order(&state.pool, &payload, &snapshot, &state.config).await?;
    tracing::info!(
        order_id = %payload.id,
        enrolled = outcome.enrolled,
        skipped_not_course = outcome.skipped_not_course,
        skipped_duplicate = outcome.skipped_duplicate,
        "Order processed",
    );

    Ok(Json(WebhookAck::ok()))
}

/// POST /api/webhooks/shopify/order-updated
pub async fn order_updated(
    State(state): State<AppState>,
    webhook: ShopifyWebhook,
) -> AppResult<Json<WebhookAck>> {
    let payload: OrderPayload = webhook.payload()?;
    tracing::info!(order_id = %payload.id, shop = %webhook.shop_domain, "Order updated");

    order::update_order_status(&state.pool, &payload).await?;
    Ok(Json(WebhookAck::ok()))
}

/// POST /api/webhooks/shopify/product-created
pub async fn product_created(
    state: State<AppState>,
    webhook: ShopifyWebhook,
) -> AppResult<Json<WebhookAck>> {
    sync_product(state, webhook).await
}

/// POST /api/webhooks/shopify/product-updated
pub async fn product_updated(
    state: State<AppState>,
    webhook: ShopifyWebhook,
) -> AppResult<Json<WebhookAck>> {
    sync_product(state, webhook).await
}

/// POST /api/webhooks/shopify/customers-create
pub async fn customer_created(
    state: State<AppState>,
    webhook: ShopifyWebhook,
) -> AppResult<Json<WebhookAck>> {
    sync_customer(state, webhook).await
}

/// POST /api/webhooks/shopify/customers-update
pub async fn customer_updated(
    state: State<AppState>,
    webhook: ShopifyWebhook,
) -> AppResult<Json<WebhookAck>> {
    sync_customer(state, webhook).await
}

async fn sync_product(
    State(state): State<AppState>,
    webhook: ShopifyWebhook,
) -> AppResult<Json<WebhookAck>> {
    let payload: ProductPayload = webhook.payload()?;
    let snapshot = webhook.snapshot()?;
    catalog::upsert_course(&state.pool, &payload, Some(snapshot)).await?;
    Ok(Json(WebhookAck::ok()))
}

async fn sync_customer(
    State(state): State<AppState>,
    webhook: ShopifyWebhook,
) -> AppResult<Json<WebhookAck>> {
    let payload: CustomerPayload = webhook.payload()?;
    let snapshot = webhook.snapshot()?;
    customer::sync_customer(&state.pool, &payload, Some(snapshot), &state.config).await?;
    Ok(Json(WebhookAck::ok()))
}
