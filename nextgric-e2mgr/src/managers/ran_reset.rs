//! E2 reset status handling

use std::sync::Arc;

use nextgric_rnib::{ConnectionStatus, NodebInfo, RnibDataService};
use tracing::info;

use crate::error::E2mgrError;
use crate::managers::RanConnectStatusChangeManager;

pub struct RanResetManager {
    rnib: Arc<dyn RnibDataService>,
    status_change: Arc<RanConnectStatusChangeManager>,
}

impl RanResetManager {
    pub fn new(
        rnib: Arc<dyn RnibDataService>,
        status_change: Arc<RanConnectStatusChangeManager>,
    ) -> Self {
        Self {
            rnib,
            status_change,
        }
    }

    /// Puts a CONNECTED RAN under reset. Any other status is `WrongState`.
    pub async fn begin_reset(&self, ran_name: &str) -> Result<NodebInfo, E2mgrError> {
        let mut nodeb = self.rnib.get_nodeb(ran_name).await?;
        if nodeb.connection_status != ConnectionStatus::Connected {
            return Err(E2mgrError::WrongState(format!(
                "RAN {} is {}, reset needs CONNECTED",
                ran_name, nodeb.connection_status
            )));
        }

        self.status_change
            .change_status(&mut nodeb, ConnectionStatus::UnderReset)
            .await?;
        info!("RAN {} under reset", ran_name);
        Ok(nodeb)
    }

    /// Returns a RAN from UNDER_RESET to CONNECTED.
    pub async fn complete_reset(&self, nodeb: &mut NodebInfo) -> Result<(), E2mgrError> {
        self.status_change
            .change_status(nodeb, ConnectionStatus::Connected)
            .await?;
        info!("RAN {} reset completed", nodeb.ran_name);
        Ok(())
    }
}
