//! Reconnection policy for lost RANs

use std::sync::Arc;

use nextgric_rnib::{ConnectionStatus, RnibDataService};
use tracing::info;

use crate::error::E2mgrError;
use crate::managers::{E2TAssociationManager, RanConnectStatusChangeManager, RanSetupManager};

/// Decides whether a lost RAN is retried, given up on, or finalized.
pub struct RanReconnectionManager {
    rnib: Arc<dyn RnibDataService>,
    max_connection_attempts: u32,
    status_change: Arc<RanConnectStatusChangeManager>,
    ran_setup: Arc<RanSetupManager>,
    e2t_association: Arc<E2TAssociationManager>,
}

impl RanReconnectionManager {
    pub fn new(
        rnib: Arc<dyn RnibDataService>,
        max_connection_attempts: u32,
        status_change: Arc<RanConnectStatusChangeManager>,
        ran_setup: Arc<RanSetupManager>,
        e2t_association: Arc<E2TAssociationManager>,
    ) -> Self {
        Self {
            rnib,
            max_connection_attempts,
            status_change,
            ran_setup,
            e2t_association,
        }
    }

    pub async fn reconnect_ran(&self, ran_name: &str) -> Result<(), E2mgrError> {
        let mut nodeb = self.rnib.get_nodeb(ran_name).await?;
        info!(
            "RAN {}: reconnect requested, status {}, attempts {}",
            ran_name, nodeb.connection_status, nodeb.connection_attempts
        );

        match nodeb.connection_status {
            ConnectionStatus::ShutDown => {
                info!("RAN {} is shut down, not reconnecting", ran_name);
                return Ok(());
            }
            ConnectionStatus::ShuttingDown => {
                self.status_change
                    .change_status(&mut nodeb, ConnectionStatus::ShutDown)
                    .await?;
                return Ok(());
            }
            _ => {}
        }

        if nodeb.connection_attempts >= self.max_connection_attempts {
            if nodeb.connection_status == ConnectionStatus::Connecting {
                info!(
                    "RAN {}: {} attempts exhausted, giving up",
                    ran_name, nodeb.connection_attempts
                );
                self.status_change
                    .change_status(&mut nodeb, ConnectionStatus::Disconnected)
                    .await?;
                let e2t_address = nodeb.associated_e2t_instance_address.clone();
                self.e2t_association
                    .dissociate_ran(&e2t_address, ran_name)
                    .await?;
            }
            return Ok(());
        }

        self.ran_setup.execute_setup(&mut nodeb).await
    }
}
