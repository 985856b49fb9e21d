//! Credential primitives.
//!
//! - [`jwt`] -- Session tokens issued by this server.
//! - [`storefront`] -- Verification of storefront-issued session tokens.

pub mod jwt;
pub mod storefront;
