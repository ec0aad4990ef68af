//! E2 Termination init handling
//!
//! A terminator announces itself on start. Unknown terminators are
//! registered; known ones get their RANs replayed through the reconnection
//! policy, one RAN at a time under that RAN's lock.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use nextgric_rnib::E2TInstanceState;

use crate::clients::RoutingManagerClient;
use crate::handlers::{NotificationHandler, NotificationRequest};
use crate::managers::{E2TInstancesManager, RanReconnectionManager};
use crate::tasks::RanLocks;

/// JSON body of the init message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct E2TermInitPayload {
    pub address: String,
    #[serde(default)]
    pub pod_name: String,
}

pub struct E2TermInitNotificationHandler {
    e2t_instances: Arc<E2TInstancesManager>,
    reconnection: Arc<RanReconnectionManager>,
    rm_client: Arc<dyn RoutingManagerClient>,
    ran_locks: Arc<RanLocks>,
}

impl E2TermInitNotificationHandler {
    pub fn new(
        e2t_instances: Arc<E2TInstancesManager>,
        reconnection: Arc<RanReconnectionManager>,
        rm_client: Arc<dyn RoutingManagerClient>,
        ran_locks: Arc<RanLocks>,
    ) -> Self {
        Self {
            e2t_instances,
            reconnection,
            rm_client,
            ran_locks,
        }
    }

    async fn handle_new_instance(&self, payload: &E2TermInitPayload) {
        if let Err(e) = self.rm_client.add_e2t_instance(&payload.address).await {
            error!(
                "E2T {}: routing manager refused new instance: {}",
                payload.address, e
            );
            return;
        }
        match self
            .e2t_instances
            .add_e2t_instance(&payload.address, &payload.pod_name)
            .await
        {
            Ok(()) => info!("E2T {} registered", payload.address),
            Err(e) => error!("E2T {}: failed registering instance: {}", payload.address, e),
        }
    }

    async fn replay_rans(&self, address: &str, ran_names: &[String]) {
        for ran_name in ran_names {
            let _guard = self.ran_locks.lock(ran_name).await;
            if let Err(e) = self.reconnection.reconnect_ran(ran_name).await {
                error!("RAN {}: reconnect after E2T {} init failed: {}", ran_name, address, e);
                if !e.is_not_found() {
                    break;
                }
            }
        }
    }
}

#[async_trait]
impl NotificationHandler for E2TermInitNotificationHandler {
    async fn handle(&self, request: &NotificationRequest) {
        let payload: E2TermInitPayload = match serde_json::from_slice(&request.payload) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Malformed E2 Term Init payload: {}", e);
                return;
            }
        };
        if payload.address.is_empty() {
            error!("E2 Term Init carries no E2T address");
            return;
        }
        info!("E2T {} (pod {}) initialized", payload.address, payload.pod_name);

        let instance = match self.e2t_instances.get_e2t_instance(&payload.address).await {
            Ok(instance) => instance,
            Err(e) if e.is_not_found() => {
                self.handle_new_instance(&payload).await;
                return;
            }
            Err(e) => {
                error!("E2T {}: failed loading instance: {}", payload.address, e);
                return;
            }
        };

        if instance.associated_ran_list.is_empty() {
            info!("E2T {} has no associated RANs", instance.address);
            return;
        }

        match instance.state {
            E2TInstanceState::ToBeDeleted => {
                info!("E2T {} is to be deleted, ignoring init", instance.address);
                return;
            }
            E2TInstanceState::RoutingManagerFailure => {
                if let Err(e) = self.e2t_instances.activate_e2t_instance(&instance.address).await {
                    warn!("E2T {}: failed re-activating: {}", instance.address, e);
                    return;
                }
            }
            E2TInstanceState::Active => {}
        }

        self.replay_rans(&instance.address, &instance.associated_ran_list)
            .await;
        info!("E2T {}: init handling completed", instance.address);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_camel_case() {
        let payload: E2TermInitPayload =
            serde_json::from_str(r#"{"address":"10.0.2.15:38000","podName":"e2term-0"}"#).unwrap();
        assert_eq!(payload.address, "10.0.2.15:38000");
        assert_eq!(payload.pod_name, "e2term-0");
    }

    #[test]
    fn test_payload_without_pod_name() {
        let payload: E2TermInitPayload =
            serde_json::from_str(r#"{"address":"10.0.2.15:38000"}"#).unwrap();
        assert!(payload.pod_name.is_empty());
    }
}
