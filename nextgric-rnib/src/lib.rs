//! RAN Information Base (RNIB) for nextgric
//!
//! This crate holds the durable record model the E2 manager works on and the
//! store interface it reads and writes through:
//!
//! - [`entities`]: RAN records (`NodebInfo`), terminator records (`E2TInstance`,
//!   `E2TInstanceInfo`), the identity projection (`NbIdentity`)
//! - [`store`]: the `RnibDataService` trait
//! - [`memory`]: an in-memory store with write accounting and failure injection

pub mod entities;
pub mod error;
pub mod memory;
pub mod store;

pub use entities::{
    now_nanos, ConnectionStatus, E2TInstance, E2TInstanceInfo, E2TInstanceState, Enb,
    GeneralConfiguration, GlobalNbId, Gnb, NbIdentity, NodeCapabilities, NodeConfiguration,
    NodeType, NodebInfo, RanFunction, ServedCellInfo,
};
pub use error::RnibError;
pub use memory::{InMemoryRnib, PublishedEvent, RnibOperation};
pub use store::RnibDataService;
