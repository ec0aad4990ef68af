//! Integration test framework for nextgric
#![allow(missing_docs)]
//!
//! This crate provides fixtures and helpers for scenario tests that drive
//! the E2 manager through its handlers, with an in-memory RNIB, a
//! `wiremock` routing manager and a recording transport sender.
//!
//! # Components
//!
//! - [`recording_sender`] - Transport sender that keeps every outbound message
//! - [`test_fixtures`] - Test harness, configuration and payload builders
//! - [`test_utils`] - Logging setup and polling on manager state and sent messages
//!
//! # Test Categories
//!
//! 1. **Connection lifecycle** - setup, quiet period, service update,
//!    error indication recovery and association failure
//! 2. **Dispatcher** - notifications routed through the running manager,
//!    per-RAN serialization

pub mod recording_sender;
pub mod test_fixtures;
pub mod test_utils;

pub use recording_sender::{RecordingRmrSender, SendPath, SentMessage};
pub use test_fixtures::{
    error_indication_payload, gnb_record, notification, ran_function, reset_request_payload,
    service_update_payload, setup_payload, stored_function, test_config, TestE2mgr,
    TEST_E2T_ADDRESS,
};
pub use test_utils::{
    init_test_logging, wait_for_condition, wait_for_procedure_state, wait_for_sent, TestResult,
    DEFAULT_POLL_INTERVAL, DEFAULT_TEST_TIMEOUT,
};
