//! Inbound notification handlers
//!
//! One handler per inbound message type. The dispatcher in
//! [`crate::tasks`] looks the handler up by [`MessageType`] and runs it on its
//! own task.

use std::time::Instant;

use async_trait::async_trait;
use bytes::Bytes;

use crate::services::MessageType;

mod e2_reset_request;
mod e2_setup_request;
mod e2_term_init;
mod error_indication;
mod ran_lost_connection;
mod ric_service_update;

pub use e2_reset_request::E2ResetRequestNotificationHandler;
pub use e2_setup_request::E2SetupRequestNotificationHandler;
pub use e2_term_init::{E2TermInitNotificationHandler, E2TermInitPayload};
pub use error_indication::{ErrorIndicationNotificationHandler, RecoveryAction};
pub use ran_lost_connection::RanLostConnectionHandler;
pub use ric_service_update::RicServiceUpdateHandler;

/// One inbound message as delivered by the transport.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub msg_type: MessageType,
    pub ran_name: String,
    pub payload: Bytes,
    pub transaction_id: Bytes,
    pub start_time: Instant,
}

impl NotificationRequest {
    pub fn new(
        msg_type: MessageType,
        ran_name: impl Into<String>,
        payload: Bytes,
        transaction_id: Bytes,
    ) -> Self {
        Self {
            msg_type,
            ran_name: ran_name.into(),
            payload,
            transaction_id,
            start_time: Instant::now(),
        }
    }
}

/// Handles one kind of inbound notification.
///
/// Handlers report failures through logs; there is nobody to return an
/// error to.
#[async_trait]
pub trait NotificationHandler: Send + Sync {
    async fn handle(&self, request: &NotificationRequest);
}
