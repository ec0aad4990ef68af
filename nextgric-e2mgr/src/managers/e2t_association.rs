//! Binding of RANs to terminators
//!
//! Association talks to the routing manager first and only touches local
//! state once the route exists. Dissociation cleans local state even when
//! the routing manager cannot be reached.

use std::sync::Arc;

use nextgric_rnib::{ConnectionStatus, NodebInfo, RnibDataService};
use tracing::{debug, info, warn};

use crate::clients::RoutingManagerClient;
use crate::error::E2mgrError;
use crate::managers::{E2TInstancesManager, RanConnectStatusChangeManager};

pub struct E2TAssociationManager {
    rnib: Arc<dyn RnibDataService>,
    e2t_instances: Arc<E2TInstancesManager>,
    rm_client: Arc<dyn RoutingManagerClient>,
    status_change: Arc<RanConnectStatusChangeManager>,
}

impl E2TAssociationManager {
    pub fn new(
        rnib: Arc<dyn RnibDataService>,
        e2t_instances: Arc<E2TInstancesManager>,
        rm_client: Arc<dyn RoutingManagerClient>,
        status_change: Arc<RanConnectStatusChangeManager>,
    ) -> Self {
        Self {
            rnib,
            e2t_instances,
            rm_client,
            status_change,
        }
    }

    /// Binds `nodeb` to the terminator at `e2t_address`.
    ///
    /// On success the record carries the address, its attempt counter is
    /// cleared and it is persisted as CONNECTED. Returns whether that write
    /// was a status inversion. A routing manager failure is returned before
    /// anything is mutated; later failures come back as `RnibDb` and leave
    /// the route in place.
    pub async fn associate_ran(
        &self,
        e2t_address: &str,
        nodeb: &mut NodebInfo,
    ) -> Result<bool, E2mgrError> {
        let ran_name = nodeb.ran_name.clone();

        if let Err(e) = self
            .rm_client
            .associate_ran_to_e2t_instance(e2t_address, &ran_name)
            .await
        {
            warn!(
                "RAN {}: routing manager refused association with E2T {}: {}",
                ran_name, e2t_address, e
            );
            return Err(E2mgrError::RoutingManager(e));
        }

        let previous = nodeb.associated_e2t_instance_address.clone();
        if !previous.is_empty() && previous != e2t_address {
            self.release_previous(&previous, &ran_name).await?;
        }

        nodeb.associated_e2t_instance_address = e2t_address.to_string();
        nodeb.connection_attempts = 0;
        let published = self
            .status_change
            .change_status(nodeb, ConnectionStatus::Connected)
            .await
            .map_err(E2mgrError::into_rnib_db)?;

        self.e2t_instances
            .associate_ran(&ran_name, e2t_address)
            .await
            .map_err(E2mgrError::into_rnib_db)?;

        info!("RAN {} associated with E2T {}", ran_name, e2t_address);
        Ok(published)
    }

    // A RAN moving to another terminator leaves the old one's list first.
    async fn release_previous(&self, previous: &str, ran_name: &str) -> Result<(), E2mgrError> {
        info!("RAN {} moving away from E2T {}", ran_name, previous);
        if let Err(e) = self
            .rm_client
            .dissociate_ran_e2t_instance(previous, ran_name)
            .await
        {
            warn!(
                "RAN {}: routing manager dissociation from previous E2T {} failed, continuing: {}",
                ran_name, previous, e
            );
        }

        match self.e2t_instances.dissociate_ran(ran_name, previous).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                warn!("RAN {}: previous E2T {} no longer registered", ran_name, previous);
                Ok(())
            }
            Err(e) => Err(e.into_rnib_db()),
        }
    }

    /// Unbinds `ran_name` from `e2t_address`. An empty address is a no-op.
    pub async fn dissociate_ran(&self, e2t_address: &str, ran_name: &str) -> Result<(), E2mgrError> {
        if e2t_address.is_empty() {
            debug!("RAN {} has no associated E2T, nothing to dissociate", ran_name);
            return Ok(());
        }

        if let Err(e) = self
            .rm_client
            .dissociate_ran_e2t_instance(e2t_address, ran_name)
            .await
        {
            warn!(
                "RAN {}: routing manager dissociation from E2T {} failed, continuing: {}",
                ran_name, e2t_address, e
            );
        }

        let mut nodeb = self.rnib.get_nodeb(ran_name).await?;
        if nodeb.associated_e2t_instance_address == e2t_address {
            nodeb.associated_e2t_instance_address.clear();
            self.rnib.update_nodeb_info(&nodeb).await?;
        }

        self.e2t_instances.dissociate_ran(ran_name, e2t_address).await?;

        info!("RAN {} dissociated from E2T {}", ran_name, e2t_address);
        Ok(())
    }

    /// Deletes the terminator at `e2t_address` from the routing manager and
    /// then from the registry. `ran_names` are the RANs the routing manager
    /// should drop along with it.
    pub async fn remove_e2t_instance(
        &self,
        e2t_address: &str,
        ran_names: &[String],
    ) -> Result<(), E2mgrError> {
        self.rm_client
            .delete_e2t_instance(e2t_address, ran_names)
            .await
            .map_err(E2mgrError::RoutingManager)?;

        self.e2t_instances.remove_e2t_instance(e2t_address).await?;
        info!("E2T {} removed with {} RAN(s)", e2t_address, ran_names.len());
        Ok(())
    }
}
