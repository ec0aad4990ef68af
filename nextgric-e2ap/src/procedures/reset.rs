//! E2 Reset Procedure

use serde::{Deserialize, Serialize};

use super::cause::E2apCause;

/// Reset Request received from an E2 node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequest {
    pub transaction_id: u32,
    pub cause: E2apCause,
}

/// Reset Response sent back once the reset wait elapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    pub transaction_id: u32,
}
