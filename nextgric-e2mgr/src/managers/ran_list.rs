//! In-memory identity index
//!
//! Keeps the `NbIdentity` projection of every known RAN, mirrored to the
//! store, so listings never have to load full records.

use std::collections::HashMap;
use std::sync::Arc;

use nextgric_rnib::{now_nanos, NbIdentity, NodeType, NodebInfo, RnibDataService};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::E2mgrError;

pub struct RanListManager {
    rnib: Arc<dyn RnibDataService>,
    identities: RwLock<HashMap<String, NbIdentity>>,
}

impl RanListManager {
    pub fn new(rnib: Arc<dyn RnibDataService>) -> Self {
        Self {
            rnib,
            identities: RwLock::new(HashMap::new()),
        }
    }

    /// Loads every identity from the store, replacing the index.
    pub async fn init_nb_identity_map(&self) -> Result<(), E2mgrError> {
        let list = self.rnib.get_list_nodeb_ids().await?;
        let mut identities = self.identities.write().await;
        identities.clear();
        for identity in list {
            identities.insert(identity.inventory_name.clone(), identity);
        }
        info!("Identity index initialized with {} RAN(s)", identities.len());
        Ok(())
    }

    /// Adds a new RAN to the store and the index.
    pub async fn add_nb_identity(
        &self,
        node_type: NodeType,
        identity: &NbIdentity,
    ) -> Result<(), E2mgrError> {
        self.rnib.add_nb_identity(node_type, identity).await?;
        self.identities
            .write()
            .await
            .insert(identity.inventory_name.clone(), identity.clone());
        debug!("Identity {} added", identity.inventory_name);
        Ok(())
    }

    /// Mirrors the record's connection status into its identity.
    pub async fn update_nb_identity_connection_status(
        &self,
        nodeb: &NodebInfo,
    ) -> Result<(), E2mgrError> {
        let updated = {
            let identities = self.identities.read().await;
            let mut identity = identities.get(&nodeb.ran_name).cloned().ok_or_else(|| {
                E2mgrError::NotFound(format!("identity {}", nodeb.ran_name))
            })?;
            identity.connection_status = nodeb.connection_status;
            identity
        };

        self.rnib
            .update_nb_identity(nodeb.node_type, &updated)
            .await?;
        self.identities
            .write()
            .await
            .insert(updated.inventory_name.clone(), updated);
        Ok(())
    }

    /// Records that a message was just received from `ran_name`.
    pub async fn update_health_check_timestamp_received(
        &self,
        ran_name: &str,
    ) -> Result<(), E2mgrError> {
        let mut identities = self.identities.write().await;
        let identity = identities
            .get_mut(ran_name)
            .ok_or_else(|| E2mgrError::NotFound(format!("identity {ran_name}")))?;
        identity.health_check_timestamp_received = now_nanos();
        Ok(())
    }

    pub async fn get_nb_identity(&self, ran_name: &str) -> Option<NbIdentity> {
        self.identities.read().await.get(ran_name).cloned()
    }

    /// All identities, ordered by RAN name.
    pub async fn get_nb_identity_list(&self) -> Vec<NbIdentity> {
        let mut list: Vec<_> = self.identities.read().await.values().cloned().collect();
        list.sort_by(|a, b| a.inventory_name.cmp(&b.inventory_name));
        list
    }
}
