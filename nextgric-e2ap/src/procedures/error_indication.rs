//! Error Indication Procedure
//!
//! Sent by the terminator (or the node) to report an error in a message it
//! received. When present, the criticality diagnostics name the procedure
//! and the message kind that triggered the error.

use serde::{Deserialize, Serialize};

use super::cause::E2apCause;
use super::ProcedureCode;

/// Message kind that triggered the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggeringMessage {
    InitiatingMessage,
    SuccessfulOutcome,
    UnsuccessfulOutcome,
}

/// Criticality value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Criticality {
    Reject,
    Ignore,
    Notify,
}

/// Type of IE error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeOfError {
    NotUnderstood,
    Missing,
}

/// One IE reported in the diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IeCriticalityDiagnosticsItem {
    pub ie_criticality: Criticality,
    pub ie_id: u16,
    pub type_of_error: TypeOfError,
}

/// Criticality Diagnostics information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalityDiagnostics {
    /// Procedure code of the erroneous message
    #[serde(default)]
    pub procedure_code: Option<u8>,
    /// Message kind of the erroneous message
    #[serde(default)]
    pub triggering_message: Option<TriggeringMessage>,
    /// Criticality of the procedure
    #[serde(default)]
    pub procedure_criticality: Option<Criticality>,
    /// IEs that caused the error
    #[serde(default)]
    pub ies_criticality_diagnostics: Vec<IeCriticalityDiagnosticsItem>,
}

/// Parsed Error Indication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorIndication {
    #[serde(default)]
    pub transaction_id: Option<u32>,
    #[serde(default)]
    pub ran_function_id: Option<u32>,
    #[serde(default)]
    pub cause: Option<E2apCause>,
    #[serde(default)]
    pub criticality_diagnostics: Option<CriticalityDiagnostics>,
}

impl ErrorIndication {
    /// Procedure code reported against a successful outcome, if the diagnostics carry both.
    ///
    /// The code is returned raw so that unknown codes can still be logged.
    pub fn failed_successful_outcome(&self) -> Option<u8> {
        let diagnostics = self.criticality_diagnostics.as_ref()?;
        match (diagnostics.procedure_code, diagnostics.triggering_message) {
            (Some(code), Some(TriggeringMessage::SuccessfulOutcome)) => Some(code),
            _ => None,
        }
    }

    /// Known procedure code reported against a successful outcome.
    pub fn failed_procedure(&self) -> Option<ProcedureCode> {
        self.failed_successful_outcome()
            .and_then(ProcedureCode::from_value)
    }
}
