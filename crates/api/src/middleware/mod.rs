//! Request extractors that authenticate callers.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a session token.
//! - [`webhook::ShopifyWebhook`] -- Verifies a storefront webhook and keeps its raw body.

pub mod auth;
pub mod webhook;
