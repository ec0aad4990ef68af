//! E2AP codec boundary
//!
//! [`E2apPdu`] is the tagged sum of every message the E2 manager decodes or
//! encodes. The ASN.1 PER codec lives with the terminator side; the
//! [`JsonE2apCodec`] here serializes the same typed structures as JSON and is
//! what the daemon and the tests use.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::procedures::{
    E2SetupFailure, E2SetupRequest, E2SetupResponse, ErrorIndication, ProcedureCode, ResetRequest,
    ResetResponse, RicServiceUpdate, RicServiceUpdateAcknowledge, TriggeringMessage,
};

/// Separator between the terminator address and the PDU in setup payloads.
pub const ADDRESS_SEPARATOR: u8 = b'|';

/// Errors raised at the codec boundary.
#[derive(Debug, Error)]
pub enum E2apCodecError {
    /// Payload bytes could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Structure could not be encoded
    #[error("Encode error: {0}")]
    Encode(String),

    /// Payload decoded to a different message than expected
    #[error("Unexpected message: expected {expected}, got {actual}")]
    UnexpectedMessage {
        /// Expected message name
        expected: &'static str,
        /// Actual message name
        actual: &'static str,
    },

    /// Setup payload without the `address|` prefix
    #[error("Payload carries no terminator address prefix")]
    MissingAddressPrefix,
}

/// Every E2AP message handled by the E2 manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "message", content = "value", rename_all = "camelCase")]
pub enum E2apPdu {
    E2SetupRequest(E2SetupRequest),
    E2SetupResponse(E2SetupResponse),
    E2SetupFailure(E2SetupFailure),
    RicServiceUpdate(RicServiceUpdate),
    RicServiceUpdateAcknowledge(RicServiceUpdateAcknowledge),
    ErrorIndication(ErrorIndication),
    ResetRequest(ResetRequest),
    ResetResponse(ResetResponse),
}

impl E2apPdu {
    /// Message name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            E2apPdu::E2SetupRequest(_) => "E2SetupRequest",
            E2apPdu::E2SetupResponse(_) => "E2SetupResponse",
            E2apPdu::E2SetupFailure(_) => "E2SetupFailure",
            E2apPdu::RicServiceUpdate(_) => "RICserviceUpdate",
            E2apPdu::RicServiceUpdateAcknowledge(_) => "RICserviceUpdateAcknowledge",
            E2apPdu::ErrorIndication(_) => "ErrorIndication",
            E2apPdu::ResetRequest(_) => "ResetRequest",
            E2apPdu::ResetResponse(_) => "ResetResponse",
        }
    }

    /// Procedure the message belongs to.
    pub fn procedure_code(&self) -> ProcedureCode {
        match self {
            E2apPdu::E2SetupRequest(_) | E2apPdu::E2SetupResponse(_) | E2apPdu::E2SetupFailure(_) => {
                ProcedureCode::E2Setup
            }
            E2apPdu::RicServiceUpdate(_) | E2apPdu::RicServiceUpdateAcknowledge(_) => {
                ProcedureCode::RicServiceUpdate
            }
            E2apPdu::ErrorIndication(_) => ProcedureCode::ErrorIndication,
            E2apPdu::ResetRequest(_) | E2apPdu::ResetResponse(_) => ProcedureCode::Reset,
        }
    }

    /// Message kind on the wire.
    pub fn message_kind(&self) -> TriggeringMessage {
        match self {
            E2apPdu::E2SetupResponse(_)
            | E2apPdu::RicServiceUpdateAcknowledge(_)
            | E2apPdu::ResetResponse(_) => TriggeringMessage::SuccessfulOutcome,
            E2apPdu::E2SetupFailure(_) => TriggeringMessage::UnsuccessfulOutcome,
            _ => TriggeringMessage::InitiatingMessage,
        }
    }
}

macro_rules! typed_decode {
    ($fn_name:ident, $variant:ident, $ty:ty) => {
        #[doc = concat!("Decodes a payload that must be a `", stringify!($variant), "`.")]
        fn $fn_name(&self, bytes: &[u8]) -> Result<$ty, E2apCodecError> {
            match self.decode(bytes)? {
                E2apPdu::$variant(msg) => Ok(msg),
                other => Err(E2apCodecError::UnexpectedMessage {
                    expected: stringify!($variant),
                    actual: other.name(),
                }),
            }
        }
    };
}

/// Converts between payload bytes and [`E2apPdu`].
pub trait E2apCodec: Send + Sync {
    /// Decodes one PDU.
    fn decode(&self, bytes: &[u8]) -> Result<E2apPdu, E2apCodecError>;

    /// Encodes one PDU.
    fn encode(&self, pdu: &E2apPdu) -> Result<Bytes, E2apCodecError>;

    typed_decode!(decode_e2_setup_request, E2SetupRequest, E2SetupRequest);
    typed_decode!(decode_ric_service_update, RicServiceUpdate, RicServiceUpdate);
    typed_decode!(decode_error_indication, ErrorIndication, ErrorIndication);
    typed_decode!(decode_reset_request, ResetRequest, ResetRequest);
}

/// JSON rendition of the E2AP structures.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonE2apCodec;

impl E2apCodec for JsonE2apCodec {
    fn decode(&self, bytes: &[u8]) -> Result<E2apPdu, E2apCodecError> {
        serde_json::from_slice(bytes).map_err(|e| E2apCodecError::Decode(e.to_string()))
    }

    fn encode(&self, pdu: &E2apPdu) -> Result<Bytes, E2apCodecError> {
        serde_json::to_vec(pdu)
            .map(Bytes::from)
            .map_err(|e| E2apCodecError::Encode(e.to_string()))
    }
}

/// Splits a setup payload of the form `address|pdu` into its two parts.
pub fn split_address_prefix(payload: &[u8]) -> Result<(String, &[u8]), E2apCodecError> {
    let index = payload
        .iter()
        .position(|b| *b == ADDRESS_SEPARATOR)
        .ok_or(E2apCodecError::MissingAddressPrefix)?;
    let address = std::str::from_utf8(&payload[..index])
        .map_err(|e| E2apCodecError::Decode(e.to_string()))?;
    if address.is_empty() {
        return Err(E2apCodecError::MissingAddressPrefix);
    }
    Ok((address.to_string(), &payload[index + 1..]))
}
