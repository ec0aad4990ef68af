//! Taking a RAN out of service

use std::sync::Arc;

use nextgric_rnib::{ConnectionStatus, RnibDataService};
use tracing::info;

use crate::error::E2mgrError;
use crate::managers::{E2TAssociationManager, RanConnectStatusChangeManager};

pub struct RanDisconnectionManager {
    rnib: Arc<dyn RnibDataService>,
    status_change: Arc<RanConnectStatusChangeManager>,
    e2t_association: Arc<E2TAssociationManager>,
}

impl RanDisconnectionManager {
    pub fn new(
        rnib: Arc<dyn RnibDataService>,
        status_change: Arc<RanConnectStatusChangeManager>,
        e2t_association: Arc<E2TAssociationManager>,
    ) -> Self {
        Self {
            rnib,
            status_change,
            e2t_association,
        }
    }

    /// Moves the RAN to DISCONNECTED (or SHUT_DOWN when it was shutting down)
    /// and unbinds it from its terminator.
    pub async fn disconnect_ran(&self, ran_name: &str) -> Result<(), E2mgrError> {
        let mut nodeb = self.rnib.get_nodeb(ran_name).await?;

        match nodeb.connection_status {
            ConnectionStatus::ShutDown => {
                info!("RAN {} already shut down", ran_name);
                Ok(())
            }
            ConnectionStatus::ShuttingDown => {
                self.status_change
                    .change_status(&mut nodeb, ConnectionStatus::ShutDown)
                    .await?;
                Ok(())
            }
            _ => {
                self.status_change
                    .change_status(&mut nodeb, ConnectionStatus::Disconnected)
                    .await?;
                let e2t_address = nodeb.associated_e2t_instance_address.clone();
                self.e2t_association
                    .dissociate_ran(&e2t_address, ran_name)
                    .await
            }
        }
    }
}
