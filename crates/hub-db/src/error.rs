//! Database error types for hub-db.

use hub_core::errors::CoreError;
use thiserror::Error;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or a row could not be decoded.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Stored data is inconsistent (e.g. a link without its grant rows).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Domain rule violated: not found, forbidden, bad input, bad transition.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    pub(crate) fn not_found(entity_type: impl ToString, id: &str) -> Self {
        Self::Core(CoreError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        })
    }

    pub(crate) fn forbidden(message: impl Into<String>) -> Self {
        Self::Core(CoreError::Forbidden(message.into()))
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Core(CoreError::Validation(message.into()))
    }

    /// True for `CoreError::NotFound` and `NoResult`.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NoResult | Self::Core(CoreError::NotFound { .. }))
    }

    #[must_use]
    pub const fn is_forbidden(&self) -> bool {
        matches!(self, Self::Core(CoreError::Forbidden(_)))
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(error: serde_json::Error) -> Self {
        Self::Other(error.into())
    }
}
