//! Transport sender that records outbound messages
//!
//! Stands in for the message router so tests can assert what the manager
//! sent, and through which path.

use std::sync::Mutex;

use async_trait::async_trait;
use nextgric_e2mgr::services::TransportError;
use nextgric_e2mgr::{MessageType, RmrMessage, RmrSender};

/// How a message was handed to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendPath {
    /// Routed by message type
    Routed,
    /// Returned to the originating endpoint
    WormholeReply,
}

/// One recorded message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub path: SendPath,
    pub message: RmrMessage,
}

/// [`RmrSender`] keeping every message in memory.
#[derive(Debug, Default)]
pub struct RecordingRmrSender {
    sent: Mutex<Vec<SentMessage>>,
    fail: Mutex<bool>,
}

impl RecordingRmrSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent send fail.
    pub fn fail_sends(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    /// All messages sent so far, oldest first.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Messages of one type, oldest first.
    pub fn sent_of_type(&self, msg_type: MessageType) -> Vec<SentMessage> {
        self.sent()
            .into_iter()
            .filter(|sent| sent.message.msg_type == msg_type)
            .collect()
    }

    fn record(&self, path: SendPath, message: RmrMessage) -> Result<(), TransportError> {
        if *self.fail.lock().unwrap() {
            return Err(TransportError::SendFailed(format!(
                "{} refused",
                message.msg_type
            )));
        }
        self.sent.lock().unwrap().push(SentMessage { path, message });
        Ok(())
    }
}

#[async_trait]
impl RmrSender for RecordingRmrSender {
    async fn send(&self, msg: RmrMessage) -> Result<(), TransportError> {
        self.record(SendPath::Routed, msg)
    }

    async fn wh_send(&self, msg: RmrMessage) -> Result<(), TransportError> {
        self.record(SendPath::WormholeReply, msg)
    }
}
