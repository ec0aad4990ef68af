//! E2 Manager Task Framework
//!
//! Inbound notifications reach the manager as [`TaskMessage`] envelopes on
//! the [`NotificationTask`] channel. Each notification runs on its own tokio
//! task; notifications naming the same RAN are serialized through
//! [`RanLocks`], notifications for different RANs run concurrently.
//!
//! ```text
//! transport ──> TaskHandle<NotificationRequest> ──> NotificationTask
//!                                                     │ one task per message
//!                                                     ├─> RanLocks (per RAN)
//!                                                     └─> NotificationHandler
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::handlers::{NotificationHandler, NotificationRequest};
use crate::services::MessageType;
use crate::state::{ProcedureStateTracker, RanFunctionSnapshots};

/// Default channel capacity for task message queues
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

// ============================================================================
// Task Message Envelope
// ============================================================================

/// Task message envelope wrapping typed messages with control signals.
#[derive(Debug)]
pub enum TaskMessage<T> {
    /// Regular message payload
    Message(T),
    /// Shutdown signal - task should terminate gracefully
    Shutdown,
}

impl<T> TaskMessage<T> {
    pub fn message(msg: T) -> Self {
        TaskMessage::Message(msg)
    }

    pub fn shutdown() -> Self {
        TaskMessage::Shutdown
    }

    pub fn is_shutdown(&self) -> bool {
        matches!(self, TaskMessage::Shutdown)
    }

    /// Returns the message payload if present, or None for shutdown.
    pub fn into_message(self) -> Option<T> {
        match self {
            TaskMessage::Message(msg) => Some(msg),
            TaskMessage::Shutdown => None,
        }
    }
}

/// Trait for E2 manager tasks.
#[async_trait::async_trait]
pub trait Task: Send + 'static {
    /// The message type this task processes.
    type Message: Send;

    /// Runs the task's main loop until shutdown.
    async fn run(&mut self, rx: mpsc::Receiver<TaskMessage<Self::Message>>);
}

/// Handle for sending messages to a task.
pub struct TaskHandle<T> {
    tx: mpsc::Sender<TaskMessage<T>>,
}

impl<T> Clone for TaskHandle<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> TaskHandle<T> {
    pub fn new(tx: mpsc::Sender<TaskMessage<T>>) -> Self {
        Self { tx }
    }

    /// Sends a message to the task.
    ///
    /// Returns an error if the task has been dropped.
    pub async fn send(&self, msg: T) -> Result<(), mpsc::error::SendError<TaskMessage<T>>> {
        self.tx.send(TaskMessage::Message(msg)).await
    }

    /// Sends a shutdown signal to the task.
    pub async fn shutdown(&self) -> Result<(), mpsc::error::SendError<TaskMessage<T>>> {
        self.tx.send(TaskMessage::Shutdown).await
    }

    /// Returns true if the task channel is closed.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Creates a task channel and the handle feeding it.
pub fn task_channel<T>(
    capacity: usize,
) -> (TaskHandle<T>, mpsc::Receiver<TaskMessage<T>>) {
    let (tx, rx) = mpsc::channel(capacity);
    (TaskHandle::new(tx), rx)
}

// ============================================================================
// Per-RAN Serialization
// ============================================================================

/// Keyed async mutex, one lock per RAN name.
///
/// Entries are created on first use and dropped when the last holder or
/// waiter releases them.
#[derive(Debug, Default)]
pub struct RanLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl RanLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `ran_name`.
    pub async fn lock(&self, ran_name: &str) -> RanLockGuard<'_> {
        let mutex = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks
                .entry(ran_name.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        let guard = mutex.clone().lock_owned().await;
        RanLockGuard {
            locks: self,
            ran_name: ran_name.to_string(),
            mutex,
            guard: Some(guard),
        }
    }

    /// Number of RANs currently locked or waited on.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exclusive access to one RAN, released on drop.
pub struct RanLockGuard<'a> {
    locks: &'a RanLocks,
    ran_name: String,
    mutex: Arc<AsyncMutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for RanLockGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.locks.lock().unwrap_or_else(|e| e.into_inner());
        // Only the map and this guard still reference the mutex.
        if Arc::strong_count(&self.mutex) == 2 {
            locks.remove(&self.ran_name);
        }
    }
}

// ============================================================================
// Notification Dispatch
// ============================================================================

/// Maps inbound message types to their handlers.
#[derive(Default)]
pub struct NotificationHandlerProvider {
    handlers: HashMap<MessageType, Arc<dyn NotificationHandler>>,
}

impl NotificationHandlerProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, msg_type: MessageType, handler: Arc<dyn NotificationHandler>) {
        self.handlers.insert(msg_type, handler);
    }

    pub fn get(&self, msg_type: MessageType) -> Option<Arc<dyn NotificationHandler>> {
        self.handlers.get(&msg_type).cloned()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Dispatches notifications to their handlers.
pub struct NotificationTask {
    provider: Arc<NotificationHandlerProvider>,
    ran_locks: Arc<RanLocks>,
    in_flight: JoinSet<()>,
}

impl NotificationTask {
    pub fn new(provider: Arc<NotificationHandlerProvider>, ran_locks: Arc<RanLocks>) -> Self {
        Self {
            provider,
            ran_locks,
            in_flight: JoinSet::new(),
        }
    }

    fn dispatch(&mut self, request: NotificationRequest) {
        let Some(handler) = self.provider.get(request.msg_type) else {
            warn!(
                "RAN {}: no handler for message type {}",
                request.ran_name, request.msg_type
            );
            return;
        };
        debug!(
            "RAN {}: dispatching {}",
            request.ran_name, request.msg_type
        );

        let ran_locks = self.ran_locks.clone();
        self.in_flight.spawn(async move {
            if request.msg_type.is_ran_scoped() {
                let _guard = ran_locks.lock(&request.ran_name).await;
                handler.handle(&request).await;
            } else {
                handler.handle(&request).await;
            }
        });
    }
}

#[async_trait::async_trait]
impl Task for NotificationTask {
    type Message = NotificationRequest;

    async fn run(&mut self, mut rx: mpsc::Receiver<TaskMessage<Self::Message>>) {
        info!("Notification task started");
        loop {
            tokio::select! {
                msg = rx.recv() => match msg {
                    Some(TaskMessage::Message(request)) => self.dispatch(request),
                    Some(TaskMessage::Shutdown) | None => break,
                },
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    if let Err(e) = joined {
                        error!("Notification handler task failed: {}", e);
                    }
                }
            }
        }

        debug!("Draining {} in-flight notification(s)", self.in_flight.len());
        while let Some(joined) = self.in_flight.join_next().await {
            if let Err(e) = joined {
                error!("Notification handler task failed: {}", e);
            }
        }
        info!("Notification task stopped");
    }
}

// ============================================================================
// Eviction
// ============================================================================

/// Messages for the eviction task.
#[derive(Debug)]
pub enum EvictionMessage {
    /// Evict immediately instead of waiting for the next tick
    EvictNow,
}

/// Drops per-RAN procedure states and function snapshots older than `ttl`.
pub struct EvictionTask {
    procedure_states: Arc<ProcedureStateTracker>,
    snapshots: Arc<RanFunctionSnapshots>,
    ttl: Duration,
    period: Duration,
}

impl EvictionTask {
    /// Creates a task checking every `ttl / 2`, at least once a second.
    pub fn new(
        procedure_states: Arc<ProcedureStateTracker>,
        snapshots: Arc<RanFunctionSnapshots>,
        ttl: Duration,
    ) -> Self {
        let period = (ttl / 2).max(Duration::from_secs(1));
        Self {
            procedure_states,
            snapshots,
            ttl,
            period,
        }
    }

    async fn evict(&self) {
        let states = self.procedure_states.evict_older_than(self.ttl).await;
        let snapshots = self.snapshots.evict_older_than(self.ttl).await;
        if states + snapshots > 0 {
            debug!(
                "Evicted {} procedure state(s) and {} snapshot(s)",
                states, snapshots
            );
        }
    }
}

#[async_trait::async_trait]
impl Task for EvictionTask {
    type Message = EvictionMessage;

    async fn run(&mut self, mut rx: mpsc::Receiver<TaskMessage<Self::Message>>) {
        info!("Eviction task started, ttl {:?}", self.ttl);
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => self.evict().await,
                msg = rx.recv() => match msg {
                    Some(TaskMessage::Message(EvictionMessage::EvictNow)) => self.evict().await,
                    Some(TaskMessage::Shutdown) | None => break,
                },
            }
        }
        info!("Eviction task stopped");
    }
}
