//! In-memory RNIB
//!
//! Backs the daemon when no external store is wired in, and the tests. Each
//! call takes the single lock once, which gives per-key atomicity. Calls are
//! counted per operation and any operation can be made to fail.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::entities::{
    E2TInstance, E2TInstanceInfo, GeneralConfiguration, NbIdentity, NodeType, NodebInfo,
};
use crate::error::RnibError;
use crate::store::RnibDataService;

/// Store operations, used for call accounting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RnibOperation {
    GetNodeb,
    SaveNodeb,
    UpdateNodebInfo,
    UpdateNodebInfoOnConnectionStatusInversion,
    UpdateNodebInfoAndPublish,
    GetE2TInstance,
    SaveE2TInstance,
    RemoveE2TInstance,
    GetE2TInfoList,
    SaveE2TInfoList,
    GetListNodebIds,
    AddNbIdentity,
    UpdateNbIdentity,
    GetGeneralConfiguration,
}

impl RnibOperation {
    /// Operations that write a RAN record.
    pub const NODEB_WRITES: [RnibOperation; 4] = [
        RnibOperation::SaveNodeb,
        RnibOperation::UpdateNodebInfo,
        RnibOperation::UpdateNodebInfoOnConnectionStatusInversion,
        RnibOperation::UpdateNodebInfoAndPublish,
    ];
}

/// A notification emitted by a publishing write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedEvent {
    /// Channel name
    pub channel: String,
    /// Event payload, e.g. `gnb_1_CONNECTED`
    pub event: String,
}

#[derive(Debug, Default)]
struct Inner {
    nodebs: HashMap<String, NodebInfo>,
    identities: BTreeMap<String, (NodeType, NbIdentity)>,
    e2t_instances: HashMap<String, E2TInstance>,
    e2t_info_list: Vec<E2TInstanceInfo>,
    general_configuration: GeneralConfiguration,
    published: Vec<PublishedEvent>,
    calls: HashMap<RnibOperation, usize>,
    failing: HashSet<RnibOperation>,
}

impl Inner {
    fn enter(&mut self, op: RnibOperation) -> Result<(), RnibError> {
        *self.calls.entry(op).or_default() += 1;
        if self.failing.contains(&op) {
            return Err(RnibError::Internal(format!("injected failure on {op:?}")));
        }
        Ok(())
    }

    fn overwrite_nodeb(&mut self, nodeb: &NodebInfo) -> Result<(), RnibError> {
        if nodeb.ran_name.is_empty() {
            return Err(RnibError::Validation("RAN name is empty".to_string()));
        }
        self.nodebs.insert(nodeb.ran_name.clone(), nodeb.clone());
        Ok(())
    }
}

/// In-memory implementation of [`RnibDataService`].
#[derive(Debug, Clone)]
pub struct InMemoryRnib {
    inner: Arc<RwLock<Inner>>,
    state_change_channel: String,
    ran_manipulation_channel: String,
}

impl Default for InMemoryRnib {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRnib {
    /// Creates an empty store publishing on the default channel names.
    pub fn new() -> Self {
        Self::with_channels("RAN_CONNECTION_STATUS_CHANGE", "RAN_MANIPULATION")
    }

    /// Creates an empty store publishing on the given channels.
    pub fn with_channels(
        state_change_channel: impl Into<String>,
        ran_manipulation_channel: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            state_change_channel: state_change_channel.into(),
            ran_manipulation_channel: ran_manipulation_channel.into(),
        }
    }

    /// Seeds a RAN record without counting it as a write.
    pub async fn insert_nodeb(&self, nodeb: NodebInfo) {
        let mut inner = self.inner.write().await;
        inner.nodebs.insert(nodeb.ran_name.clone(), nodeb);
    }

    /// Seeds a terminator record and its info entry without counting writes.
    pub async fn insert_e2t_instance(&self, instance: E2TInstance) {
        let mut inner = self.inner.write().await;
        let count = instance.associated_ran_list.len() as u32;
        match inner
            .e2t_info_list
            .iter_mut()
            .find(|info| info.address == instance.address)
        {
            Some(info) => info.associated_ran_count = count,
            None => inner.e2t_info_list.push(E2TInstanceInfo {
                address: instance.address.clone(),
                associated_ran_count: count,
            }),
        }
        inner.e2t_instances.insert(instance.address.clone(), instance);
    }

    /// Current RAN record, if any.
    pub async fn nodeb(&self, ran_name: &str) -> Option<NodebInfo> {
        self.inner.read().await.nodebs.get(ran_name).cloned()
    }

    /// Current terminator record, if any.
    pub async fn e2t_instance(&self, address: &str) -> Option<E2TInstance> {
        self.inner.read().await.e2t_instances.get(address).cloned()
    }

    /// Current load-distribution list.
    pub async fn e2t_info_list(&self) -> Vec<E2TInstanceInfo> {
        self.inner.read().await.e2t_info_list.clone()
    }

    /// Current identity entries.
    pub async fn identities(&self) -> Vec<NbIdentity> {
        self.inner
            .read()
            .await
            .identities
            .values()
            .map(|(_, identity)| identity.clone())
            .collect()
    }

    /// Sets the global feature switches.
    pub async fn set_general_configuration(&self, configuration: GeneralConfiguration) {
        self.inner.write().await.general_configuration = configuration;
    }

    /// Makes every subsequent call of `op` fail with an internal error.
    pub async fn fail_operation(&self, op: RnibOperation) {
        self.inner.write().await.failing.insert(op);
    }

    /// Removes all injected failures.
    pub async fn clear_failures(&self) {
        self.inner.write().await.failing.clear();
    }

    /// Number of calls made to `op`, failed ones included.
    pub async fn call_count(&self, op: RnibOperation) -> usize {
        self.inner.read().await.calls.get(&op).copied().unwrap_or(0)
    }

    /// Number of calls to any RAN-record write operation.
    pub async fn nodeb_write_count(&self) -> usize {
        let inner = self.inner.read().await;
        RnibOperation::NODEB_WRITES
            .iter()
            .map(|op| inner.calls.get(op).copied().unwrap_or(0))
            .sum()
    }

    /// Events published so far, oldest first.
    pub async fn published_events(&self) -> Vec<PublishedEvent> {
        self.inner.read().await.published.clone()
    }
}

#[async_trait]
impl RnibDataService for InMemoryRnib {
    async fn get_nodeb(&self, ran_name: &str) -> Result<NodebInfo, RnibError> {
        let mut inner = self.inner.write().await;
        inner.enter(RnibOperation::GetNodeb)?;
        inner
            .nodebs
            .get(ran_name)
            .cloned()
            .ok_or_else(|| RnibError::ResourceNotFound(format!("nodeb {ran_name}")))
    }

    async fn save_nodeb(&self, identity: &NbIdentity, nodeb: &NodebInfo) -> Result<(), RnibError> {
        let mut inner = self.inner.write().await;
        inner.enter(RnibOperation::SaveNodeb)?;
        inner.overwrite_nodeb(nodeb)?;
        inner.identities.insert(
            identity.inventory_name.clone(),
            (nodeb.node_type, identity.clone()),
        );
        debug!("Saved nodeb {}", nodeb.ran_name);
        Ok(())
    }

    async fn update_nodeb_info(&self, nodeb: &NodebInfo) -> Result<(), RnibError> {
        let mut inner = self.inner.write().await;
        inner.enter(RnibOperation::UpdateNodebInfo)?;
        inner.overwrite_nodeb(nodeb)
    }

    async fn update_nodeb_info_on_connection_status_inversion(
        &self,
        nodeb: &NodebInfo,
        event: &str,
    ) -> Result<(), RnibError> {
        let mut inner = self.inner.write().await;
        inner.enter(RnibOperation::UpdateNodebInfoOnConnectionStatusInversion)?;
        inner.overwrite_nodeb(nodeb)?;
        inner.published.push(PublishedEvent {
            channel: self.state_change_channel.clone(),
            event: event.to_string(),
        });
        Ok(())
    }

    async fn update_nodeb_info_and_publish(&self, nodeb: &NodebInfo) -> Result<(), RnibError> {
        let mut inner = self.inner.write().await;
        inner.enter(RnibOperation::UpdateNodebInfoAndPublish)?;
        inner.overwrite_nodeb(nodeb)?;
        inner.published.push(PublishedEvent {
            channel: self.ran_manipulation_channel.clone(),
            event: format!("{}_UPDATED", nodeb.ran_name),
        });
        Ok(())
    }

    async fn get_e2t_instance(&self, address: &str) -> Result<E2TInstance, RnibError> {
        let mut inner = self.inner.write().await;
        inner.enter(RnibOperation::GetE2TInstance)?;
        inner
            .e2t_instances
            .get(address)
            .cloned()
            .ok_or_else(|| RnibError::ResourceNotFound(format!("e2t instance {address}")))
    }

    async fn save_e2t_instance(&self, instance: &E2TInstance) -> Result<(), RnibError> {
        let mut inner = self.inner.write().await;
        inner.enter(RnibOperation::SaveE2TInstance)?;
        if instance.address.is_empty() {
            return Err(RnibError::Validation("E2T address is empty".to_string()));
        }
        inner
            .e2t_instances
            .insert(instance.address.clone(), instance.clone());
        Ok(())
    }

    async fn remove_e2t_instance(&self, address: &str) -> Result<(), RnibError> {
        let mut inner = self.inner.write().await;
        inner.enter(RnibOperation::RemoveE2TInstance)?;
        inner.e2t_instances.remove(address);
        Ok(())
    }

    async fn get_e2t_info_list(&self) -> Result<Vec<E2TInstanceInfo>, RnibError> {
        let mut inner = self.inner.write().await;
        inner.enter(RnibOperation::GetE2TInfoList)?;
        Ok(inner.e2t_info_list.clone())
    }

    async fn save_e2t_info_list(&self, list: &[E2TInstanceInfo]) -> Result<(), RnibError> {
        let mut inner = self.inner.write().await;
        inner.enter(RnibOperation::SaveE2TInfoList)?;
        inner.e2t_info_list = list.to_vec();
        Ok(())
    }

    async fn get_list_nodeb_ids(&self) -> Result<Vec<NbIdentity>, RnibError> {
        let mut inner = self.inner.write().await;
        inner.enter(RnibOperation::GetListNodebIds)?;
        Ok(inner
            .identities
            .values()
            .map(|(_, identity)| identity.clone())
            .collect())
    }

    async fn add_nb_identity(&self, node_type: NodeType, identity: &NbIdentity) -> Result<(), RnibError> {
        let mut inner = self.inner.write().await;
        inner.enter(RnibOperation::AddNbIdentity)?;
        inner
            .identities
            .insert(identity.inventory_name.clone(), (node_type, identity.clone()));
        Ok(())
    }

    async fn update_nb_identity(&self, node_type: NodeType, identity: &NbIdentity) -> Result<(), RnibError> {
        let mut inner = self.inner.write().await;
        inner.enter(RnibOperation::UpdateNbIdentity)?;
        if !inner.identities.contains_key(&identity.inventory_name) {
            return Err(RnibError::ResourceNotFound(format!(
                "identity {}",
                identity.inventory_name
            )));
        }
        inner
            .identities
            .insert(identity.inventory_name.clone(), (node_type, identity.clone()));
        Ok(())
    }

    async fn get_general_configuration(&self) -> Result<GeneralConfiguration, RnibError> {
        let mut inner = self.inner.write().await;
        inner.enter(RnibOperation::GetGeneralConfiguration)?;
        Ok(inner.general_configuration)
    }
}
