//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - The input DTOs its repository accepts
//!
//! Storefront snapshots are opaque `serde_json::Value` blobs and are never
//! serialized to API responses.

pub mod course;
pub mod enrollment;
pub mod progress;
pub mod user;
