//! E2AP Cause values
//!
//! Only the cause values the E2 manager sends or inspects are modeled; every
//! group keeps an `Unspecified` fallback.

use std::fmt;

use serde::{Deserialize, Serialize};

/// E2AP cause, grouped as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "group", content = "value", rename_all = "camelCase")]
pub enum E2apCause {
    /// RIC request related
    RicRequest(RicRequestCause),
    /// RIC service related
    RicService(RicServiceCause),
    /// Transport layer related
    Transport(TransportCause),
    /// Protocol related
    Protocol(ProtocolCause),
    /// Miscellaneous
    Misc(MiscCause),
}

/// RIC request causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RicRequestCause {
    RanFunctionIdInvalid,
    ActionNotSupported,
    ExcessiveActions,
    DuplicateAction,
    RequestIdUnknown,
    Unspecified,
}

/// RIC service causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RicServiceCause {
    RanFunctionNotSupported,
    ExcessiveFunctions,
    RicResourceLimit,
}

/// Transport causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportCause {
    Unspecified,
    TransportResourceUnavailable,
}

/// Protocol causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProtocolCause {
    TransferSyntaxError,
    AbstractSyntaxErrorReject,
    AbstractSyntaxErrorIgnoreAndNotify,
    MessageNotCompatibleWithReceiverState,
    SemanticError,
    AbstractSyntaxErrorFalselyConstructedMessage,
    Unspecified,
}

/// Miscellaneous causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MiscCause {
    ControlProcessingOverload,
    HardwareFailure,
    OmIntervention,
    Unspecified,
}

impl fmt::Display for E2apCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            E2apCause::RicRequest(c) => write!(f, "ricRequest/{c}"),
            E2apCause::RicService(c) => write!(f, "ricService/{c}"),
            E2apCause::Transport(c) => write!(f, "transport/{c}"),
            E2apCause::Protocol(c) => write!(f, "protocol/{c}"),
            E2apCause::Misc(c) => write!(f, "misc/{c}"),
        }
    }
}

impl fmt::Display for RicRequestCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RicRequestCause::RanFunctionIdInvalid => "ran-function-id-invalid",
            RicRequestCause::ActionNotSupported => "action-not-supported",
            RicRequestCause::ExcessiveActions => "excessive-actions",
            RicRequestCause::DuplicateAction => "duplicate-action",
            RicRequestCause::RequestIdUnknown => "request-id-unknown",
            RicRequestCause::Unspecified => "unspecified",
        };
        f.write_str(name)
    }
}

impl fmt::Display for RicServiceCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RicServiceCause::RanFunctionNotSupported => "ran-function-not-supported",
            RicServiceCause::ExcessiveFunctions => "excessive-functions",
            RicServiceCause::RicResourceLimit => "ric-resource-limit",
        };
        f.write_str(name)
    }
}

impl fmt::Display for TransportCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportCause::Unspecified => f.write_str("unspecified"),
            TransportCause::TransportResourceUnavailable => {
                f.write_str("transport-resource-unavailable")
            }
        }
    }
}

impl fmt::Display for ProtocolCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProtocolCause::TransferSyntaxError => "transfer-syntax-error",
            ProtocolCause::AbstractSyntaxErrorReject => "abstract-syntax-error-reject",
            ProtocolCause::AbstractSyntaxErrorIgnoreAndNotify => {
                "abstract-syntax-error-ignore-and-notify"
            }
            ProtocolCause::MessageNotCompatibleWithReceiverState => {
                "message-not-compatible-with-receiver-state"
            }
            ProtocolCause::SemanticError => "semantic-error",
            ProtocolCause::AbstractSyntaxErrorFalselyConstructedMessage => {
                "abstract-syntax-error-falsely-constructed-message"
            }
            ProtocolCause::Unspecified => "unspecified",
        };
        f.write_str(name)
    }
}

impl fmt::Display for MiscCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MiscCause::ControlProcessingOverload => "control-processing-overload",
            MiscCause::HardwareFailure => "hardware-failure",
            MiscCause::OmIntervention => "om-intervention",
            MiscCause::Unspecified => "unspecified",
        };
        f.write_str(name)
    }
}
