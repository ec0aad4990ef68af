//! nextgric-e2mgr - E2 Manager
#![allow(missing_docs)]
//!
//! This crate manages the connection lifecycle between RAN nodes and the
//! E2 terminators that carry their E2 traffic:
//!
//! - E2 setup admission, function storage and terminator association
//! - RIC service update reconciliation with snapshot and revert
//! - Reconnection policy with an attempt ceiling
//! - Error indication recovery (disconnect or function revert)
//! - E2 reset and terminator initialization replay
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        E2 Manager                            │
//! │                                                              │
//! │  transport ──> NotificationTask ──> handlers                 │
//! │                 (per-RAN locks)        │                     │
//! │                                        ▼                     │
//! │                  ┌──────────── managers ───────────┐         │
//! │                  │ status change   e2t association │         │
//! │                  │ reconnection    disconnection   │         │
//! │                  │ service update  reset / setup   │         │
//! │                  └────────┬───────────────┬────────┘         │
//! │                           │               │                  │
//! └───────────────────────────┼───────────────┼──────────────────┘
//!                             ▼               ▼
//!                           RNIB       routing manager
//! ```
//!
//! Every state transition goes through
//! [`managers::RanConnectStatusChangeManager`], which persists the record,
//! publishes the transition event and keeps the identity index current.

pub mod app;
pub mod clients;
pub mod error;
pub mod handlers;
pub mod managers;
pub mod services;
pub mod state;
pub mod tasks;

pub use app::{
    load_and_validate_e2mgr_config, load_e2mgr_config, load_e2mgr_config_from_str,
    validate_e2mgr_config, ConfigError, ConfigValidationError, E2ManagerApp, E2ManagerContext,
};
pub use error::E2mgrError;
pub use handlers::{NotificationHandler, NotificationRequest};
pub use services::{ChannelRmrSender, MessageType, RmrMessage, RmrSender};
pub use state::{ProcedureState, ProcedureStateTracker};
pub use tasks::{
    task_channel, NotificationTask, Task, TaskHandle, TaskMessage, DEFAULT_CHANNEL_CAPACITY,
};
