//! RNIB error type

use thiserror::Error;

/// Errors returned by an [`RnibDataService`](crate::RnibDataService).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RnibError {
    /// The requested record does not exist
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// The store was reachable but the operation failed
    #[error("rnib internal error: {0}")]
    Internal(String),

    /// The record handed to the store is malformed
    #[error("rnib validation error: {0}")]
    Validation(String),
}

impl RnibError {
    /// Returns true for the not-found case, which callers often treat as "nothing to do".
    pub fn is_not_found(&self) -> bool {
        matches!(self, RnibError::ResourceNotFound(_))
    }
}
