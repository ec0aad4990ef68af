//! RNIB record model
//!
//! One [`NodebInfo`] per RAN name, one [`E2TInstance`] per terminator address,
//! a flat [`E2TInstanceInfo`] list used for load distribution, and the
//! [`NbIdentity`] projection used for listings.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::RnibError;

/// Current wall-clock time in nanoseconds since the Unix epoch.
pub fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

// ============================================================================
// Connection status
// ============================================================================

/// Connection status of a RAN.
///
/// Only `Connected` counts as "up"; every other value is "down".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionStatus {
    /// No status recorded yet
    #[default]
    Unknown,
    /// Setup in progress
    Connecting,
    /// Setup completed
    Connected,
    /// Setup was answered with a failure
    ConnectedSetupFailed,
    /// Lost or given up on
    Disconnected,
    /// Graceful teardown requested
    ShuttingDown,
    /// Terminal state
    ShutDown,
    /// Reset procedure in progress
    UnderReset,
}

impl ConnectionStatus {
    /// Every status, in declaration order.
    pub const ALL: [ConnectionStatus; 8] = [
        ConnectionStatus::Unknown,
        ConnectionStatus::Connecting,
        ConnectionStatus::Connected,
        ConnectionStatus::ConnectedSetupFailed,
        ConnectionStatus::Disconnected,
        ConnectionStatus::ShuttingDown,
        ConnectionStatus::ShutDown,
        ConnectionStatus::UnderReset,
    ];

    /// Returns true for the single "up" status.
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionStatus::Unknown => "UNKNOWN",
            ConnectionStatus::Connecting => "CONNECTING",
            ConnectionStatus::Connected => "CONNECTED",
            ConnectionStatus::ConnectedSetupFailed => "CONNECTED_SETUP_FAILED",
            ConnectionStatus::Disconnected => "DISCONNECTED",
            ConnectionStatus::ShuttingDown => "SHUTTING_DOWN",
            ConnectionStatus::ShutDown => "SHUT_DOWN",
            ConnectionStatus::UnderReset => "UNDER_RESET",
        };
        f.write_str(name)
    }
}

/// Kind of RAN node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    /// Not yet known
    #[default]
    Unknown,
    /// LTE eNodeB
    Enb,
    /// NR gNodeB
    Gnb,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Unknown => write!(f, "UNKNOWN"),
            NodeType::Enb => write!(f, "ENB"),
            NodeType::Gnb => write!(f, "GNB"),
        }
    }
}

/// Global node id: packed PLMN (hex) plus the node id bit string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlobalNbId {
    /// PLMN identity, packed 3GPP form as hex
    pub plmn_id: String,
    /// Node id as a bit string
    pub nb_id: String,
}

impl GlobalNbId {
    /// Creates a new global node id.
    pub fn new(plmn_id: impl Into<String>, nb_id: impl Into<String>) -> Self {
        Self {
            plmn_id: plmn_id.into(),
            nb_id: nb_id.into(),
        }
    }
}

// ============================================================================
// Node configuration
// ============================================================================

/// A capability advertised by a gNB.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RanFunction {
    /// Function id, unique within a RAN
    pub ran_function_id: u32,
    /// Opaque function definition
    pub ran_function_definition: String,
    /// Revision of the definition
    pub ran_function_revision: u32,
    /// Object identifier of the service model
    pub ran_function_oid: String,
}

/// A cell served by an eNB.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServedCellInfo {
    /// E-UTRAN cell id
    pub cell_id: String,
    /// Physical cell id
    pub pci: u32,
    /// Tracking area code
    pub tac: String,
}

/// gNB-specific payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gnb {
    /// Advertised RAN functions
    pub ran_functions: Vec<RanFunction>,
}

/// eNB-specific payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enb {
    /// Served cells
    pub served_cells: Vec<ServedCellInfo>,
}

/// Function accessors implemented per node kind.
///
/// Only gNBs carry RAN functions; an eNB reports none and refuses writes.
pub trait NodeCapabilities {
    /// The advertised functions, or `None` for node kinds that have no function list.
    fn ran_functions(&self) -> Option<&[RanFunction]>;

    /// Replaces the advertised functions.
    fn set_ran_functions(&mut self, functions: Vec<RanFunction>) -> Result<(), RnibError>;
}

impl NodeCapabilities for Gnb {
    fn ran_functions(&self) -> Option<&[RanFunction]> {
        Some(&self.ran_functions)
    }

    fn set_ran_functions(&mut self, functions: Vec<RanFunction>) -> Result<(), RnibError> {
        self.ran_functions = functions;
        Ok(())
    }
}

impl NodeCapabilities for Enb {
    fn ran_functions(&self) -> Option<&[RanFunction]> {
        None
    }

    fn set_ran_functions(&mut self, _functions: Vec<RanFunction>) -> Result<(), RnibError> {
        Err(RnibError::Validation(
            "eNB configuration has no RAN function list".to_string(),
        ))
    }
}

/// Node-kind-specific part of a RAN record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeConfiguration {
    /// eNB payload
    Enb(Enb),
    /// gNB payload
    Gnb(Gnb),
}

impl NodeConfiguration {
    fn capabilities(&self) -> &dyn NodeCapabilities {
        match self {
            NodeConfiguration::Enb(enb) => enb,
            NodeConfiguration::Gnb(gnb) => gnb,
        }
    }

    fn capabilities_mut(&mut self) -> &mut dyn NodeCapabilities {
        match self {
            NodeConfiguration::Enb(enb) => enb,
            NodeConfiguration::Gnb(gnb) => gnb,
        }
    }

    /// Node kind implied by the payload.
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeConfiguration::Enb(_) => NodeType::Enb,
            NodeConfiguration::Gnb(_) => NodeType::Gnb,
        }
    }
}

// ============================================================================
// RAN record
// ============================================================================

/// Durable record of one RAN.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodebInfo {
    /// Unique RAN name
    pub ran_name: String,
    /// Global node identity
    pub global_nb_id: Option<GlobalNbId>,
    /// Node kind
    pub node_type: NodeType,
    /// Current connection status
    pub connection_status: ConnectionStatus,
    /// Reconnection attempts since the last successful association
    pub connection_attempts: u32,
    /// Address of the bound terminator, empty when unbound
    pub associated_e2t_instance_address: String,
    /// Time of the last status write, nanoseconds since the Unix epoch
    pub status_update_time_stamp: u64,
    /// Setup originated from the RAN rather than from provisioning
    pub setup_from_network: bool,
    /// Node-kind-specific payload
    pub configuration: Option<NodeConfiguration>,
}

impl NodebInfo {
    /// Creates a gNB record with the given functions.
    pub fn new_gnb(ran_name: impl Into<String>, global_nb_id: GlobalNbId, functions: Vec<RanFunction>) -> Self {
        Self {
            ran_name: ran_name.into(),
            global_nb_id: Some(global_nb_id),
            node_type: NodeType::Gnb,
            configuration: Some(NodeConfiguration::Gnb(Gnb {
                ran_functions: functions,
            })),
            ..Default::default()
        }
    }

    /// Creates an eNB record.
    pub fn new_enb(ran_name: impl Into<String>, global_nb_id: GlobalNbId) -> Self {
        Self {
            ran_name: ran_name.into(),
            global_nb_id: Some(global_nb_id),
            node_type: NodeType::Enb,
            configuration: Some(NodeConfiguration::Enb(Enb::default())),
            ..Default::default()
        }
    }

    /// Advertised functions, `None` when the node has no gNB-shaped configuration.
    pub fn ran_functions(&self) -> Option<&[RanFunction]> {
        self.configuration.as_ref().and_then(|c| c.capabilities().ran_functions())
    }

    /// Replaces the advertised functions; fails when the node cannot carry them.
    pub fn set_ran_functions(&mut self, functions: Vec<RanFunction>) -> Result<(), RnibError> {
        match self.configuration.as_mut() {
            Some(configuration) => configuration.capabilities_mut().set_ran_functions(functions),
            None => Err(RnibError::Validation(format!(
                "RAN {} has no node configuration",
                self.ran_name
            ))),
        }
    }

    /// Identity projection of this record.
    pub fn to_nb_identity(&self) -> NbIdentity {
        NbIdentity {
            inventory_name: self.ran_name.clone(),
            global_nb_id: self.global_nb_id.clone(),
            connection_status: self.connection_status,
            health_check_timestamp_sent: 0,
            health_check_timestamp_received: 0,
        }
    }
}

/// Identity projection used for listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NbIdentity {
    /// RAN name
    pub inventory_name: String,
    /// Global node identity
    pub global_nb_id: Option<GlobalNbId>,
    /// Mirrors `NodebInfo::connection_status`
    pub connection_status: ConnectionStatus,
    /// Last health check request, nanoseconds
    pub health_check_timestamp_sent: u64,
    /// Last message received from the RAN, nanoseconds
    pub health_check_timestamp_received: u64,
}

// ============================================================================
// Terminator records
// ============================================================================

/// Lifecycle state of a terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum E2TInstanceState {
    /// Accepting RANs
    #[default]
    Active,
    /// Draining, never selected
    ToBeDeleted,
    /// Routing manager could not be updated for this instance
    RoutingManagerFailure,
}

impl fmt::Display for E2TInstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            E2TInstanceState::Active => write!(f, "ACTIVE"),
            E2TInstanceState::ToBeDeleted => write!(f, "TO_BE_DELETED"),
            E2TInstanceState::RoutingManagerFailure => write!(f, "ROUTING_MANAGER_FAILURE"),
        }
    }
}

/// Durable record of one terminator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct E2TInstance {
    /// Terminator address, unique key
    pub address: String,
    /// Kubernetes pod name
    pub pod_name: String,
    /// RANs currently bound to this terminator
    pub associated_ran_list: Vec<String>,
    /// Last keep-alive, nanoseconds
    pub keep_alive_timestamp: u64,
    /// Lifecycle state
    pub state: E2TInstanceState,
}

impl E2TInstance {
    /// Creates an active terminator with no RANs.
    pub fn new(address: impl Into<String>, pod_name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            pod_name: pod_name.into(),
            keep_alive_timestamp: now_nanos(),
            ..Default::default()
        }
    }
}

/// Load-distribution aggregate for one terminator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct E2TInstanceInfo {
    /// Terminator address
    pub address: String,
    /// Number of RANs bound to it
    pub associated_ran_count: u32,
}

/// Global feature switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfiguration {
    /// Whether RANs may connect at all
    pub enable_ric: bool,
}

impl Default for GeneralConfiguration {
    fn default() -> Self {
        Self { enable_ric: true }
    }
}
