//! Cross-cutting error types for LinkHub.
//!
//! Storage and auth failures live in their own crates (`DatabaseError`,
//! `AuthError`). Everything converges into `anyhow` in `hub-cli`.

use thiserror::Error;

/// Errors that can be raised by any LinkHub crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A moderation transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// Data failed validation (required fields, formats, hierarchy cycles).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The acting user lacks the role or ownership an operation needs.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
