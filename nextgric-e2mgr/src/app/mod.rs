//! E2 Manager Application
//!
//! Configuration loading, component wiring and the lifecycle of the
//! long-running tasks.
//!
//! ```text
//! E2mgrConfig ──> E2ManagerContext ──> E2ManagerApp
//!                   (managers,            ├─ NotificationTask
//!                    handlers)            └─ EvictionTask (optional)
//! ```

mod config_loader;
mod context;

pub use config_loader::{
    global_ric_id, load_and_validate_e2mgr_config, load_e2mgr_config, load_e2mgr_config_from_str,
    validate_e2mgr_config, ConfigError, ConfigValidationError,
};
pub use context::E2ManagerContext;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::E2mgrError;
use crate::handlers::NotificationRequest;
use crate::tasks::{
    task_channel, EvictionMessage, EvictionTask, NotificationTask, Task, TaskHandle,
    DEFAULT_CHANNEL_CAPACITY,
};

/// A running E2 manager.
pub struct E2ManagerApp {
    context: Arc<E2ManagerContext>,
    notifications: TaskHandle<NotificationRequest>,
    eviction: Option<TaskHandle<EvictionMessage>>,
    tasks: Vec<JoinHandle<()>>,
}

impl E2ManagerApp {
    /// Loads the identity index and spawns the tasks.
    pub async fn start(context: E2ManagerContext) -> Result<Self, E2mgrError> {
        context.ran_list.init_nb_identity_map().await?;

        let context = Arc::new(context);
        let mut tasks = Vec::new();

        let (notifications, rx) = task_channel(DEFAULT_CHANNEL_CAPACITY);
        let mut notification_task = NotificationTask::new(
            Arc::new(context.handler_provider()),
            context.ran_locks.clone(),
        );
        tasks.push(tokio::spawn(async move { notification_task.run(rx).await }));
        info!("Notification task spawned");

        let eviction = context.procedure_state_ttl.map(|ttl| {
            let (handle, rx) = task_channel(DEFAULT_CHANNEL_CAPACITY);
            let mut eviction_task = EvictionTask::new(
                context.procedure_states.clone(),
                context.snapshots.clone(),
                ttl,
            );
            tasks.push(tokio::spawn(async move { eviction_task.run(rx).await }));
            info!("Eviction task spawned");
            handle
        });

        Ok(Self {
            context,
            notifications,
            eviction,
            tasks,
        })
    }

    pub fn context(&self) -> &Arc<E2ManagerContext> {
        &self.context
    }

    /// Handle the transport feeds inbound notifications into.
    pub fn notification_handle(&self) -> TaskHandle<NotificationRequest> {
        self.notifications.clone()
    }

    /// Stops the tasks, letting in-flight notifications finish.
    pub async fn shutdown(self) {
        info!("Initiating graceful shutdown...");
        if self.notifications.shutdown().await.is_err() {
            warn!("Notification task already stopped");
        }
        if let Some(eviction) = &self.eviction {
            if eviction.shutdown().await.is_err() {
                warn!("Eviction task already stopped");
            }
        }
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!("Task failed during shutdown: {}", e);
            }
        }
        info!("All tasks shut down");
    }
}
