use crate::types::DbId;

/// Domain error taxonomy shared by every layer.
///
/// Each variant maps to exactly one HTTP status class in the API crate.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed or missing required input.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing, invalid, or expired credential or signature.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Valid credential, but the caller does not own the resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A required server-side secret is not configured.
    #[error("Misconfigured: {0}")]
    Misconfigured(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
