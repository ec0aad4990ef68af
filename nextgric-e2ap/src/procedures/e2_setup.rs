//! E2 Setup Procedure
//!
//! Initiated by the E2 node. The RIC answers with an E2 Setup Response
//! carrying its global id and the accepted RAN functions, or with an E2
//! Setup Failure carrying a cause.

use nextgric_common::GlobalRicId;
use serde::{Deserialize, Serialize};

use super::cause::E2apCause;

/// Kind of E2 node in the global E2 node id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum E2NodeKind {
    /// NR gNB
    Gnb,
    /// LTE eNB
    Enb,
}

/// Global E2 node id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalE2NodeId {
    /// Node kind
    pub kind: E2NodeKind,
    /// Packed PLMN as hex
    pub plmn_id: String,
    /// Node id bit string
    pub node_id: String,
}

/// A RAN function advertised in a setup request or service update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RanFunctionItem {
    pub ran_function_id: u32,
    pub ran_function_definition: String,
    pub ran_function_revision: u32,
    #[serde(default)]
    pub ran_function_oid: String,
}

/// Function id with revision, used in acknowledgement lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RanFunctionIdItem {
    pub ran_function_id: u32,
    pub ran_function_revision: u32,
}

/// Function id refused with a cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RanFunctionIdCauseItem {
    pub ran_function_id: u32,
    pub cause: E2apCause,
}

/// Parsed E2 Setup Request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct E2SetupRequest {
    /// Transaction id chosen by the node
    pub transaction_id: u32,
    /// Identity of the node
    pub global_e2_node_id: GlobalE2NodeId,
    /// Advertised RAN functions
    #[serde(default)]
    pub ran_functions: Vec<RanFunctionItem>,
}

impl E2SetupRequest {
    /// Ids and revisions of every advertised function.
    pub fn ran_function_ids(&self) -> Vec<RanFunctionIdItem> {
        self.ran_functions
            .iter()
            .map(|f| RanFunctionIdItem {
                ran_function_id: f.ran_function_id,
                ran_function_revision: f.ran_function_revision,
            })
            .collect()
    }
}

/// Global RIC id as carried in the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalRicIdIe {
    /// Packed PLMN as hex
    pub plmn_id: String,
    /// 20-bit RIC id as a bit string
    pub ric_id: String,
}

impl From<&GlobalRicId> for GlobalRicIdIe {
    fn from(id: &GlobalRicId) -> Self {
        Self {
            plmn_id: id.plmn.to_hex(),
            ric_id: id.ric_id_bits(),
        }
    }
}

/// E2 Setup Response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct E2SetupResponse {
    pub transaction_id: u32,
    pub global_ric_id: GlobalRicIdIe,
    pub ran_functions_accepted: Vec<RanFunctionIdItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ran_functions_rejected: Vec<RanFunctionIdCauseItem>,
}

impl E2SetupResponse {
    /// Builds a response accepting `accepted` on behalf of `ric_id`.
    pub fn new(transaction_id: u32, ric_id: &GlobalRicId, accepted: Vec<RanFunctionIdItem>) -> Self {
        Self {
            transaction_id,
            global_ric_id: ric_id.into(),
            ran_functions_accepted: accepted,
            ran_functions_rejected: Vec::new(),
        }
    }
}

/// Time to wait before the node may retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeToWait {
    V1s,
    V2s,
    V5s,
    V10s,
    V20s,
    V60s,
}

/// E2 Setup Failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct E2SetupFailure {
    pub transaction_id: u32,
    pub cause: E2apCause,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_wait: Option<TimeToWait>,
}

impl E2SetupFailure {
    /// Builds a failure with `cause` and no wait hint.
    pub fn new(transaction_id: u32, cause: E2apCause) -> Self {
        Self {
            transaction_id,
            cause,
            time_to_wait: None,
        }
    }
}
