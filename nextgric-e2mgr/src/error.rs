//! Error taxonomy of the E2 manager

use nextgric_e2ap::{E2apCause, E2apCodecError};
use nextgric_rnib::RnibError;
use thiserror::Error;

use crate::clients::RoutingManagerClientError;
use crate::services::TransportError;

/// Errors returned by the lifecycle managers and handlers.
#[derive(Debug, Error)]
pub enum E2mgrError {
    /// A record that was expected to exist is absent
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The store was reachable but the operation failed
    #[error("RNIB DB error: {0}")]
    RnibDb(String),

    /// The routing manager rejected the request or was unreachable
    #[error("Routing manager error: {0}")]
    RoutingManager(#[from] RoutingManagerClientError),

    /// Malformed or structurally incomplete inbound data
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business-rule rejection answered to the RAN with a cause
    #[error("Request rejected: {0}")]
    RequestRejected(E2apCause),

    /// The RAN is in a state that does not allow the operation
    #[error("Wrong state: {0}")]
    WrongState(String),

    /// Outbound message could not be handed to the transport
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Codec failure at the E2AP boundary
    #[error("Codec error: {0}")]
    Codec(#[from] E2apCodecError),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl E2mgrError {
    /// Re-labels any failure as a store failure, keeping its message.
    pub fn into_rnib_db(self) -> Self {
        match self {
            E2mgrError::RnibDb(_) => self,
            other => E2mgrError::RnibDb(other.to_string()),
        }
    }

    /// Returns true for the not-found case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, E2mgrError::NotFound(_))
    }
}

impl From<RnibError> for E2mgrError {
    fn from(err: RnibError) -> Self {
        match err {
            RnibError::ResourceNotFound(what) => E2mgrError::NotFound(what),
            RnibError::Validation(msg) => E2mgrError::Validation(msg),
            RnibError::Internal(msg) => E2mgrError::RnibDb(msg),
        }
    }
}
