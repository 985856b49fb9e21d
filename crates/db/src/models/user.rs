//! User entity model and DTOs.

use lms_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: DbId,
    pub shopify_customer_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub shopify_data: Option<serde_json::Value>,
    pub last_synced_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Customer fields applied on sync. `None` keeps the stored value on update.
#[derive(Debug, Clone, Default)]
pub struct CustomerFields {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub shopify_data: Option<serde_json::Value>,
}

/// DTO for inserting a user that does not exist yet.
///
/// `email` and `name` are required on insert; callers substitute
/// placeholders when the storefront did not supply them.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub shopify_customer_id: String,
    pub email: String,
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub shopify_data: Option<serde_json::Value>,
}
