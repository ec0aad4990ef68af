//! RAN function reconciliation for RIC Service Update

use std::collections::HashMap;
use std::sync::Arc;

use nextgric_e2ap::{FunctionChange, RanFunctionChangeItem, RanFunctionIdItem};
use nextgric_rnib::{NodebInfo, RanFunction, RnibDataService};
use tracing::{debug, info, warn};

use crate::error::E2mgrError;
use crate::state::RanFunctionSnapshots;

/// Applies `changes` to `functions` and returns the acknowledgement list.
///
/// Every item is echoed, including deletes of ids that were never present.
/// Deleted entries are removed after all items are applied.
pub fn apply_function_changes(
    functions: &mut Vec<RanFunction>,
    changes: &[RanFunctionChangeItem],
) -> Vec<RanFunctionIdItem> {
    let mut index: HashMap<u32, usize> = functions
        .iter()
        .enumerate()
        .map(|(i, f)| (f.ran_function_id, i))
        .collect();
    let mut deleted = Vec::new();
    let mut accepted = Vec::with_capacity(changes.len());

    for item in changes {
        match (item.change, index.get(&item.ran_function_id).copied()) {
            (FunctionChange::Added | FunctionChange::Modified, Some(i)) => {
                let function = &mut functions[i];
                function.ran_function_definition = item.ran_function_definition.clone();
                function.ran_function_revision = item.ran_function_revision;
                function.ran_function_oid = item.ran_function_oid.clone();
            }
            (FunctionChange::Added | FunctionChange::Modified, None) => {
                index.insert(item.ran_function_id, functions.len());
                functions.push(RanFunction {
                    ran_function_id: item.ran_function_id,
                    ran_function_definition: item.ran_function_definition.clone(),
                    ran_function_revision: item.ran_function_revision,
                    ran_function_oid: item.ran_function_oid.clone(),
                });
            }
            (FunctionChange::Deleted, Some(_)) => deleted.push(item.ran_function_id),
            (FunctionChange::Deleted, None) => {
                debug!("function {} not present, nothing to delete", item.ran_function_id);
            }
        }
        accepted.push(item.id_item());
    }

    if !deleted.is_empty() {
        functions.retain(|f| !deleted.contains(&f.ran_function_id));
    }

    accepted
}

/// Keeps RAN function lists in step with service updates, with a snapshot
/// to fall back to when the terminator reports the update failed.
pub struct RicServiceUpdateManager {
    rnib: Arc<dyn RnibDataService>,
    snapshots: Arc<RanFunctionSnapshots>,
}

impl RicServiceUpdateManager {
    pub fn new(rnib: Arc<dyn RnibDataService>, snapshots: Arc<RanFunctionSnapshots>) -> Self {
        Self { rnib, snapshots }
    }

    /// Snapshots the current function list of `nodeb`.
    pub async fn store_existing_ran_functions(&self, nodeb: &NodebInfo) -> Result<(), E2mgrError> {
        let functions = nodeb.ran_functions().ok_or_else(|| {
            E2mgrError::Validation(format!("RAN {} is not a gNB", nodeb.ran_name))
        })?;
        self.snapshots.set(&nodeb.ran_name, functions.to_vec()).await;
        debug!(
            "RAN {}: stored {} functions before update",
            nodeb.ran_name,
            functions.len()
        );
        Ok(())
    }

    /// Applies `changes` to `nodeb` and persists it with the publishing
    /// write when there was anything to apply.
    pub async fn apply_update(
        &self,
        nodeb: &mut NodebInfo,
        changes: &[RanFunctionChangeItem],
    ) -> Result<Vec<RanFunctionIdItem>, E2mgrError> {
        let mut functions = nodeb
            .ran_functions()
            .ok_or_else(|| E2mgrError::Validation(format!("RAN {} is not a gNB", nodeb.ran_name)))?
            .to_vec();
        let accepted = apply_function_changes(&mut functions, changes);
        nodeb.set_ran_functions(functions)?;

        if !changes.is_empty() {
            self.rnib
                .update_nodeb_info_and_publish(nodeb)
                .await
                .map_err(|e| E2mgrError::RnibDb(e.to_string()))?;
        }

        info!(
            "RAN {}: service update applied, {} items accepted",
            nodeb.ran_name,
            accepted.len()
        );
        Ok(accepted)
    }

    /// Restores the function list captured by
    /// [`store_existing_ran_functions`](Self::store_existing_ran_functions).
    pub async fn revert_ran_functions(&self, ran_name: &str) -> Result<(), E2mgrError> {
        let Some(snapshot) = self.snapshots.get(ran_name).await else {
            info!("RAN {}: no function snapshot, nothing to revert", ran_name);
            return Ok(());
        };

        let mut nodeb = self.rnib.get_nodeb(ran_name).await?;
        if nodeb.ran_functions().is_none() {
            warn!("RAN {} is no longer a gNB, not reverting functions", ran_name);
            return Ok(());
        }

        nodeb.set_ran_functions(snapshot)?;
        self.rnib
            .update_nodeb_info_and_publish(&nodeb)
            .await
            .map_err(|e| E2mgrError::RnibDb(e.to_string()))?;
        info!("RAN {}: functions reverted to pre-update snapshot", ran_name);
        Ok(())
    }
}
