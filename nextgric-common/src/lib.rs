//! Common types and utilities for nextgric
//!
//! This crate provides the shared error type, logging setup, PLMN and RIC
//! identity types, and the YAML configuration model used by the E2 manager.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::{
    E2mgrConfig, GlobalRicIdConfig, LoggingConfig, RnibWriterConfig, RoutingManagerConfig,
};
pub use error::Error;
pub use logging::{
    init_logging, init_logging_with_filter, log_e2ap_message, log_protocol_message, Direction,
    HexDump, LogLevel,
};
pub use types::{GlobalRicId, Plmn};
