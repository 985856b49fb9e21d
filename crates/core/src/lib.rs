//! Domain logic for the storefront-synchronized learning backend.
//!
//! Everything here is pure: no database or HTTP access. The `db` and `api`
//! crates build on these types and rules.

pub mod enrollment;
pub mod error;
pub mod identity;
pub mod player_state;
pub mod progress;
pub mod shopify;
pub mod signature;
pub mod types;
