//! Connectivity alarms
//!
//! Raised by the status change manager when a RAN crosses the CONNECTED
//! boundary.

use async_trait::async_trait;
use nextgric_rnib::NodebInfo;
use tracing::info;

use crate::error::E2mgrError;

/// Alarm side effect of a connectivity event.
#[async_trait]
pub trait RanAlarmService: Send + Sync {
    async fn set_connectivity_change_alarm(&self, nodeb: &NodebInfo) -> Result<(), E2mgrError>;
}

/// Alarm service that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingRanAlarmService;

#[async_trait]
impl RanAlarmService for LoggingRanAlarmService {
    async fn set_connectivity_change_alarm(&self, nodeb: &NodebInfo) -> Result<(), E2mgrError> {
        info!(
            "Connectivity alarm: RAN {} is now {}",
            nodeb.ran_name, nodeb.connection_status
        );
        Ok(())
    }
}
