//! Extractor for signed storefront webhook deliveries.
//!
//! The signature covers the exact request bytes, so the body is buffered
//! as-is and verified before anything parses it. Handlers deserialize from
//! the same verified bytes.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::HeaderMap;
use lms_core::error::CoreError;
use lms_core::shopify::{HEADER_HMAC, HEADER_SHOP_DOMAIN, HEADER_TOPIC};
use lms_core::signature::verify_webhook_signature;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::state::AppState;

/// A webhook delivery whose signature has been verified.
#[derive(Debug, Clone)]
pub struct ShopifyWebhook {
    /// Shop that sent the delivery.
    pub shop_domain: String,
    /// Webhook topic, e.g. `orders/create`.
    pub topic: String,
    /// The raw, verified request body.
    pub body: Bytes,
}

impl ShopifyWebhook {
    /// Deserialize the body into a typed payload.
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::from_slice(&self.body).map_err(|e| {
            AppError::Core(CoreError::BadRequest(format!(
                "Invalid {} payload: {e}",
                self.topic
            )))
        })
    }

    /// The body as an untyped JSON value, stored as the entity snapshot.
    pub fn snapshot(&self) -> Result<serde_json::Value, AppError> {
        self.payload()
    }
}

impl FromRequest<AppState> for ShopifyWebhook {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let headers = req.headers();
        let (Some(signature), Some(shop_domain), Some(topic)) = (
            header_value(headers, HEADER_HMAC),
            header_value(headers, HEADER_SHOP_DOMAIN),
            header_value(headers, HEADER_TOPIC),
        ) else {
            return Err(AppError::Core(CoreError::BadRequest(
                "Missing storefront webhook headers".into(),
            )));
        };

        let secret = state
            .config
            .shopify
            .webhook_secret
            .clone()
            .ok_or_else(|| {
                AppError::Core(CoreError::Misconfigured(
                    "Webhook secret not configured".into(),
                ))
            })?;

        let body = Bytes::from_request(req, state).await.map_err(|e| {
            AppError::Core(CoreError::BadRequest(format!(
                "Unreadable webhook body: {}",
                e.body_text()
            )))
        })?;

        if !verify_webhook_signature(&secret, &body, &signature) {
            tracing::warn!(shop = %shop_domain, topic = %topic, "Rejected webhook with invalid signature");
            return Err(AppError::Core(CoreError::Unauthenticated(
                "Invalid webhook signature".into(),
            )));
        }

        Ok(ShopifyWebhook {
            shop_domain,
            topic,
            body,
        })
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
