//! Outbound transport
//!
//! The message router itself is external. The managers hand it
//! `(message type, RAN name, payload, transaction id)` tuples through
//! [`RmrSender`]; [`ChannelRmrSender`] forwards them into a channel drained
//! by the transport adaptor.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use nextgric_common::{log_protocol_message, Direction};
use thiserror::Error;
use tokio::sync::mpsc;

/// Message router message types used by the E2 manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    RicSctpConnectionFailure,
    E2TermInit,
    RicX2SetupReq,
    RicEndcX2SetupReq,
    RicE2SetupReq,
    RicE2SetupResp,
    RicE2SetupFailure,
    RicE2ResetReq,
    RicE2ResetResp,
    RicErrorIndication,
    RicServiceUpdate,
    RicServiceUpdateAck,
    RicServiceUpdateFailure,
}

impl MessageType {
    /// Numeric message type on the router.
    pub fn value(&self) -> i32 {
        match self {
            MessageType::RicSctpConnectionFailure => 1080,
            MessageType::E2TermInit => 1100,
            MessageType::RicX2SetupReq => 10060,
            MessageType::RicEndcX2SetupReq => 10360,
            MessageType::RicE2SetupReq => 12001,
            MessageType::RicE2SetupResp => 12002,
            MessageType::RicE2SetupFailure => 12003,
            MessageType::RicE2ResetReq => 12004,
            MessageType::RicE2ResetResp => 12005,
            MessageType::RicErrorIndication => 12007,
            MessageType::RicServiceUpdate => 12030,
            MessageType::RicServiceUpdateAck => 12031,
            MessageType::RicServiceUpdateFailure => 12032,
        }
    }

    /// False for messages that are about a terminator rather than one RAN.
    pub fn is_ran_scoped(&self) -> bool {
        !matches!(self, MessageType::E2TermInit)
    }

    /// Protocol label used when logging the payload.
    fn protocol(&self) -> &'static str {
        match self {
            MessageType::RicX2SetupReq | MessageType::RicEndcX2SetupReq => "X2AP",
            MessageType::E2TermInit | MessageType::RicSctpConnectionFailure => "RMR",
            _ => "E2AP",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.value())
    }
}

/// One outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RmrMessage {
    pub msg_type: MessageType,
    pub ran_name: String,
    pub payload: Bytes,
    pub transaction_id: Bytes,
}

impl RmrMessage {
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
        }
    }
}

/// Failures handing a message to the transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The transport side is gone
    #[error("transport channel closed")]
    ChannelClosed,

    /// The transport refused the message
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Outbound side of the message router.
#[async_trait]
pub trait RmrSender: Send + Sync {
    /// Routes by message type.
    async fn send(&self, msg: RmrMessage) -> Result<(), TransportError>;

    /// Sends back to the endpoint that originated the request.
    async fn wh_send(&self, msg: RmrMessage) -> Result<(), TransportError> {
        self.send(msg).await
    }
}

/// [`RmrSender`] writing into an mpsc channel.
#[derive(Debug, Clone)]
pub struct ChannelRmrSender {
    tx: mpsc::Sender<RmrMessage>,
}

impl ChannelRmrSender {
    pub fn new(tx: mpsc::Sender<RmrMessage>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl RmrSender for ChannelRmrSender {
    async fn send(&self, msg: RmrMessage) -> Result<(), TransportError> {
        log_protocol_message(
            msg.msg_type.protocol(),
            Direction::Tx,
            &msg.msg_type.to_string(),
            &msg.ran_name,
            &msg.payload,
        );
        self.tx
            .send(msg)
            .await
            .map_err(|_| TransportError::ChannelClosed)
    }
}
