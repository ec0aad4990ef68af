//! Store interface consumed by the E2 manager
//!
//! Every call is a single-record operation; a not-found outcome is reported
//! as [`RnibError::ResourceNotFound`] so callers can tell it apart from a
//! failing store.

use async_trait::async_trait;

use crate::entities::{
    E2TInstance, E2TInstanceInfo, GeneralConfiguration, NbIdentity, NodeType, NodebInfo,
};
use crate::error::RnibError;

/// Read/write access to the RAN information base.
#[async_trait]
pub trait RnibDataService: Send + Sync {
    // ------------------------------------------------------------------
    // RAN records
    // ------------------------------------------------------------------

    /// Loads the record of `ran_name`.
    async fn get_nodeb(&self, ran_name: &str) -> Result<NodebInfo, RnibError>;

    /// Creates a record together with its identity entry.
    async fn save_nodeb(&self, identity: &NbIdentity, nodeb: &NodebInfo) -> Result<(), RnibError>;

    /// Plain overwrite of an existing record.
    async fn update_nodeb_info(&self, nodeb: &NodebInfo) -> Result<(), RnibError>;

    /// Overwrite that also publishes `event` on the state-change channel.
    async fn update_nodeb_info_on_connection_status_inversion(
        &self,
        nodeb: &NodebInfo,
        event: &str,
    ) -> Result<(), RnibError>;

    /// Overwrite that also publishes an update notification on the manipulation channel.
    async fn update_nodeb_info_and_publish(&self, nodeb: &NodebInfo) -> Result<(), RnibError>;

    // ------------------------------------------------------------------
    // Terminator records
    // ------------------------------------------------------------------

    /// Loads the terminator record at `address`.
    async fn get_e2t_instance(&self, address: &str) -> Result<E2TInstance, RnibError>;

    /// Creates or overwrites a terminator record.
    async fn save_e2t_instance(&self, instance: &E2TInstance) -> Result<(), RnibError>;

    /// Deletes a terminator record.
    async fn remove_e2t_instance(&self, address: &str) -> Result<(), RnibError>;

    /// Loads the load-distribution list.
    async fn get_e2t_info_list(&self) -> Result<Vec<E2TInstanceInfo>, RnibError>;

    /// Overwrites the load-distribution list.
    async fn save_e2t_info_list(&self, list: &[E2TInstanceInfo]) -> Result<(), RnibError>;

    // ------------------------------------------------------------------
    // Identities
    // ------------------------------------------------------------------

    /// Lists every known identity.
    async fn get_list_nodeb_ids(&self) -> Result<Vec<NbIdentity>, RnibError>;

    /// Adds an identity entry.
    async fn add_nb_identity(&self, node_type: NodeType, identity: &NbIdentity) -> Result<(), RnibError>;

    /// Replaces the identity entry with the same inventory name.
    async fn update_nb_identity(&self, node_type: NodeType, identity: &NbIdentity) -> Result<(), RnibError>;

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Loads the global feature switches.
    async fn get_general_configuration(&self) -> Result<GeneralConfiguration, RnibError>;
}
