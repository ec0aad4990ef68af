//! RIC Service Update Procedure
//!
//! The E2 node reports added, modified and deleted RAN functions. The three
//! wire lists are flattened into one list of tagged changes, in wire order.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::e2_setup::{RanFunctionIdCauseItem, RanFunctionIdItem};

/// Kind of change reported for one function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FunctionChange {
    Added,
    Modified,
    Deleted,
}

impl fmt::Display for FunctionChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionChange::Added => write!(f, "added"),
            FunctionChange::Modified => write!(f, "modified"),
            FunctionChange::Deleted => write!(f, "deleted"),
        }
    }
}

/// One function change. Deleted items only carry id and revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RanFunctionChangeItem {
    pub change: FunctionChange,
    pub ran_function_id: u32,
    #[serde(default)]
    pub ran_function_definition: String,
    pub ran_function_revision: u32,
    #[serde(default)]
    pub ran_function_oid: String,
}

impl RanFunctionChangeItem {
    /// Id and revision echoed in the acknowledgement.
    pub fn id_item(&self) -> RanFunctionIdItem {
        RanFunctionIdItem {
            ran_function_id: self.ran_function_id,
            ran_function_revision: self.ran_function_revision,
        }
    }
}

/// Parsed RIC Service Update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RicServiceUpdate {
    pub transaction_id: u32,
    #[serde(default)]
    pub changes: Vec<RanFunctionChangeItem>,
}

/// RIC Service Update Acknowledge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RicServiceUpdateAcknowledge {
    pub transaction_id: u32,
    pub ran_functions_accepted: Vec<RanFunctionIdItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ran_functions_rejected: Vec<RanFunctionIdCauseItem>,
}

impl RicServiceUpdateAcknowledge {
    /// Builds an acknowledgement accepting `accepted`.
    pub fn new(transaction_id: u32, accepted: Vec<RanFunctionIdItem>) -> Self {
        Self {
            transaction_id,
            ran_functions_accepted: accepted,
            ran_functions_rejected: Vec::new(),
        }
    }
}
