//! Terminator registry
//!
//! Owns the terminator records and the load-distribution info list. Every
//! read-modify-write of either goes through one async mutex. The RAN list of
//! a terminator is the source of truth; the info count follows it, so an
//! associate or dissociate interrupted between the two writes is safe to
//! retry.

use std::sync::Arc;

use nextgric_rnib::{E2TInstance, E2TInstanceInfo, E2TInstanceState, RnibDataService};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::E2mgrError;

pub struct E2TInstancesManager {
    rnib: Arc<dyn RnibDataService>,
    mutex: Mutex<()>,
}

impl E2TInstancesManager {
    pub fn new(rnib: Arc<dyn RnibDataService>) -> Self {
        Self {
            rnib,
            mutex: Mutex::new(()),
        }
    }

    async fn info_list(&self) -> Result<Vec<E2TInstanceInfo>, E2mgrError> {
        match self.rnib.get_e2t_info_list().await {
            Ok(list) => Ok(list),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Registers a terminator with no associated RANs.
    pub async fn add_e2t_instance(&self, address: &str, pod_name: &str) -> Result<(), E2mgrError> {
        if address.is_empty() {
            return Err(E2mgrError::Validation("E2T address is empty".to_string()));
        }

        let instance = E2TInstance::new(address, pod_name);
        self.rnib.save_e2t_instance(&instance).await?;

        let _guard = self.mutex.lock().await;
        let mut list = self.info_list().await?;
        if list.iter().any(|info| info.address == address) {
            debug!("E2T instance {} already in info list", address);
        } else {
            list.push(E2TInstanceInfo {
                address: address.to_string(),
                associated_ran_count: 0,
            });
        }
        self.rnib.save_e2t_info_list(&list).await?;

        info!("E2T instance {} added", address);
        Ok(())
    }

    pub async fn get_e2t_instance(&self, address: &str) -> Result<E2TInstance, E2mgrError> {
        Ok(self.rnib.get_e2t_instance(address).await?)
    }

    /// Every terminator listed in the info list whose record still exists.
    pub async fn get_e2t_instances(&self) -> Result<Vec<E2TInstance>, E2mgrError> {
        let list = self.info_list().await?;
        let mut instances = Vec::with_capacity(list.len());
        for info in list {
            match self.rnib.get_e2t_instance(&info.address).await {
                Ok(instance) => instances.push(instance),
                Err(e) if e.is_not_found() => {
                    warn!("E2T instance {} listed but has no record", info.address)
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(instances)
    }

    /// Picks the active terminator with the fewest RANs; ties go to the lowest address.
    pub async fn select_e2t_instance(&self) -> Result<String, E2mgrError> {
        let _guard = self.mutex.lock().await;
        let list = self.info_list().await?;

        let mut best: Option<&E2TInstanceInfo> = None;
        for info in &list {
            let instance = match self.rnib.get_e2t_instance(&info.address).await {
                Ok(instance) => instance,
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e.into()),
            };
            if instance.state != E2TInstanceState::Active {
                continue;
            }
            let better = match best {
                None => true,
                Some(current) => {
                    (info.associated_ran_count, &info.address)
                        < (current.associated_ran_count, &current.address)
                }
            };
            if better {
                best = Some(info);
            }
        }

        best.map(|info| info.address.clone())
            .ok_or_else(|| E2mgrError::NotFound("no active E2T instance".to_string()))
    }

    /// Records `ran_name` as bound to `address`.
    ///
    /// The RAN list is committed first and the info count is then set from
    /// its length, so a retry after a partial commit converges instead of
    /// counting the RAN twice.
    pub async fn associate_ran(&self, ran_name: &str, address: &str) -> Result<(), E2mgrError> {
        let _guard = self.mutex.lock().await;

        let mut instance = self.rnib.get_e2t_instance(address).await?;
        if instance.associated_ran_list.iter().any(|name| name == ran_name) {
            debug!("RAN {} already associated with E2T {}", ran_name, address);
        } else {
            instance.associated_ran_list.push(ran_name.to_string());
            self.rnib.save_e2t_instance(&instance).await?;
        }

        self.sync_ran_count(address, instance.associated_ran_list.len() as u32)
            .await?;

        info!("RAN {} associated with E2T {}", ran_name, address);
        Ok(())
    }

    /// Removes `ran_name` from `address`.
    pub async fn dissociate_ran(&self, ran_name: &str, address: &str) -> Result<(), E2mgrError> {
        let _guard = self.mutex.lock().await;

        let mut instance = self.rnib.get_e2t_instance(address).await?;
        let before = instance.associated_ran_list.len();
        instance.associated_ran_list.retain(|name| name != ran_name);
        if instance.associated_ran_list.len() == before {
            debug!("RAN {} not in E2T {} RAN list", ran_name, address);
        } else {
            self.rnib.save_e2t_instance(&instance).await?;
        }

        self.sync_ran_count(address, instance.associated_ran_list.len() as u32)
            .await?;

        info!("RAN {} dissociated from E2T {}", ran_name, address);
        Ok(())
    }

    // Caller holds the mutex.
    async fn sync_ran_count(&self, address: &str, count: u32) -> Result<(), E2mgrError> {
        let mut list = self.info_list().await?;
        match list.iter_mut().find(|info| info.address == address) {
            Some(info) if info.associated_ran_count == count => return Ok(()),
            Some(info) => info.associated_ran_count = count,
            None => {
                warn!("E2T {} missing from info list, count not updated", address);
                return Ok(());
            }
        }
        self.rnib.save_e2t_info_list(&list).await?;
        Ok(())
    }

    /// Returns a terminator to the active state.
    pub async fn activate_e2t_instance(&self, address: &str) -> Result<(), E2mgrError> {
        let _guard = self.mutex.lock().await;
        let mut instance = self.rnib.get_e2t_instance(address).await?;
        instance.state = E2TInstanceState::Active;
        self.rnib.save_e2t_instance(&instance).await?;
        info!("E2T instance {} activated", address);
        Ok(())
    }

    /// Deletes a terminator record and its info entry.
    pub async fn remove_e2t_instance(&self, address: &str) -> Result<(), E2mgrError> {
        let _guard = self.mutex.lock().await;
        self.rnib.remove_e2t_instance(address).await?;
        let mut list = self.info_list().await?;
        list.retain(|info| info.address != address);
        self.rnib.save_e2t_info_list(&list).await?;
        info!("E2T instance {} removed", address);
        Ok(())
    }
}
