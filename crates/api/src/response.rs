//! Shared response envelope types for API handlers.
//!
//! Resource reads and progress updates use a `{ "data": ... }` envelope.
//! Authentication endpoints and webhooks return their own flat shapes.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: courses }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "success": true }` acknowledgement returned to webhook deliveries.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub success: bool,
}

impl WebhookAck {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
