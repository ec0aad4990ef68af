//! Connection status state machine
//!
//! [`classify`] decides, from the status before and after a change, whether
//! the change crosses the CONNECTED boundary and which store write to use.
//! [`RanConnectStatusChangeManager`] applies a change: classify, set the
//! status, write, refresh the identity index, raise the alarm.

use std::fmt;
use std::sync::Arc;

use nextgric_rnib::{now_nanos, ConnectionStatus, NodebInfo, RnibDataService};
use tracing::{error, info};

use crate::error::E2mgrError;
use crate::managers::RanListManager;
use crate::services::RanAlarmService;

/// Connectivity event produced by a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    /// Became CONNECTED
    Connected,
    /// Left CONNECTED
    Disconnected,
    /// Stayed on the same side of the boundary
    None,
}

impl ConnectivityEvent {
    /// Event tag published with a status-inversion write.
    pub fn tag(&self, ran_name: &str) -> String {
        match self {
            ConnectivityEvent::Connected => format!("{ran_name}_CONNECTED"),
            ConnectivityEvent::Disconnected => format!("{ran_name}_DISCONNECTED"),
            ConnectivityEvent::None => "NONE".to_string(),
        }
    }
}

impl fmt::Display for ConnectivityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectivityEvent::Connected => write!(f, "CONNECTED"),
            ConnectivityEvent::Disconnected => write!(f, "DISCONNECTED"),
            ConnectivityEvent::None => write!(f, "NONE"),
        }
    }
}

/// Store write variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Plain overwrite
    Plain,
    /// Overwrite that also publishes the connectivity event
    StatusInversion,
}

/// Result of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub event: ConnectivityEvent,
    pub write_mode: WriteMode,
}

/// Classifies a status change. Must see the status before it is overwritten.
pub fn classify(current: ConnectionStatus, next: ConnectionStatus) -> StatusTransition {
    let event = match (current.is_connected(), next.is_connected()) {
        (false, true) => ConnectivityEvent::Connected,
        (true, false) => ConnectivityEvent::Disconnected,
        _ => ConnectivityEvent::None,
    };
    let write_mode = match event {
        ConnectivityEvent::None => WriteMode::Plain,
        _ => WriteMode::StatusInversion,
    };
    StatusTransition { event, write_mode }
}

/// Applies connection status changes to RAN records.
pub struct RanConnectStatusChangeManager {
    rnib: Arc<dyn RnibDataService>,
    ran_list: Arc<RanListManager>,
    alarm: Arc<dyn RanAlarmService>,
}

impl RanConnectStatusChangeManager {
    pub fn new(
        rnib: Arc<dyn RnibDataService>,
        ran_list: Arc<RanListManager>,
        alarm: Arc<dyn RanAlarmService>,
    ) -> Self {
        Self {
            rnib,
            ran_list,
            alarm,
        }
    }

    /// Moves `nodeb` to `next` and persists it.
    ///
    /// Returns true when the change was a connectivity event, i.e. the
    /// status-inversion write was used. Only a failed record write fails the
    /// call; index and alarm failures are logged.
    pub async fn change_status(
        &self,
        nodeb: &mut NodebInfo,
        next: ConnectionStatus,
    ) -> Result<bool, E2mgrError> {
        let transition = classify(nodeb.connection_status, next);
        info!(
            "RAN {}: {} -> {} (event {})",
            nodeb.ran_name, nodeb.connection_status, next, transition.event
        );

        nodeb.connection_status = next;
        nodeb.status_update_time_stamp = now_nanos();

        let written = match transition.write_mode {
            WriteMode::Plain => self.rnib.update_nodeb_info(nodeb).await,
            WriteMode::StatusInversion => {
                let tag = transition.event.tag(&nodeb.ran_name);
                self.rnib
                    .update_nodeb_info_on_connection_status_inversion(nodeb, &tag)
                    .await
            }
        };
        if let Err(e) = written {
            error!(
                "RAN {}: failed writing status {}: {}",
                nodeb.ran_name, next, e
            );
            return Err(E2mgrError::RnibDb(e.to_string()));
        }

        if let Err(e) = self.ran_list.update_nb_identity_connection_status(nodeb).await {
            error!(
                "RAN {}: failed updating identity connection status: {}",
                nodeb.ran_name, e
            );
        }

        let is_event = transition.event != ConnectivityEvent::None;
        if is_event {
            if let Err(e) = self.alarm.set_connectivity_change_alarm(nodeb).await {
                error!("RAN {}: failed raising connectivity alarm: {}", nodeb.ran_name, e);
            }
        }

        Ok(is_event)
    }
}
