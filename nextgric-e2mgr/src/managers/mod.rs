//! Lifecycle managers
//!
//! Each manager owns one step of the RAN/terminator lifecycle and is shared
//! behind an `Arc` by the handlers.
//!
//! ```text
//! RanReconnectionManager ─┐
//! RanDisconnectionManager ┼─> E2TAssociationManager ─> E2TInstancesManager
//! RanSetupManager ────────┘            │
//!                                      └─> RanConnectStatusChangeManager ─> RanListManager
//! ```

mod e2t_association;
mod e2t_instances;
mod ran_disconnection;
mod ran_list;
mod ran_reconnection;
mod ran_reset;
mod ran_setup;
mod ric_service_update;
mod status_change;

pub use e2t_association::E2TAssociationManager;
pub use e2t_instances::E2TInstancesManager;
pub use ran_disconnection::RanDisconnectionManager;
pub use ran_list::RanListManager;
pub use ran_reconnection::RanReconnectionManager;
pub use ran_reset::RanResetManager;
pub use ran_setup::{RanSetupManager, SetupRequestPayloads};
pub use ric_service_update::{apply_function_changes, RicServiceUpdateManager};
pub use status_change::{
    classify, ConnectivityEvent, RanConnectStatusChangeManager, StatusTransition, WriteMode,
};
