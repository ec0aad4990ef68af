//! Configuration Loading for the E2 Manager
//!
//! Wraps `E2mgrConfig` from `nextgric-common` with validation and error
//! handling specific to the manager.
//!
//! # Example
//!
//! ```rust,ignore
//! use nextgric_e2mgr::app::load_and_validate_e2mgr_config;
//!
//! let config = load_and_validate_e2mgr_config("config/e2mgr.yaml")?;
//! ```

use std::path::Path;

use nextgric_common::{E2mgrConfig, GlobalRicId};
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ConfigValidationError),
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// Invalid global RIC id
    #[error("Invalid global RIC id: {0}")]
    InvalidGlobalRicId(String),

    /// Invalid routing manager settings
    #[error("Invalid routing manager configuration: {0}")]
    InvalidRoutingManager(String),

    /// Invalid log level
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    /// Empty publish channel name
    #[error("Invalid RNIB writer configuration: {0}")]
    InvalidRnibWriter(String),
}

/// Loads an E2 manager configuration from a YAML file.
///
/// Only parses; call [`validate_e2mgr_config`] afterwards.
pub fn load_e2mgr_config<P: AsRef<Path>>(path: P) -> Result<E2mgrConfig, ConfigError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    load_e2mgr_config_from_str(&contents)
}

/// Loads an E2 manager configuration from a YAML string.
pub fn load_e2mgr_config_from_str(yaml: &str) -> Result<E2mgrConfig, ConfigError> {
    serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Validates an E2 manager configuration.
///
/// # Validation Rules
///
/// - RIC id must be exactly 5 hex digits
/// - MCC must be 3 digits, MNC 2-3 digits
/// - Routing manager base URL must not be empty
/// - Log level must be one of trace, debug, info, warn, error
/// - Publish channel names must not be empty
pub fn validate_e2mgr_config(config: &E2mgrConfig) -> Result<(), ConfigValidationError> {
    let ric_id = &config.global_ric_id.ric_id;
    if ric_id.len() != 5 || !ric_id.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigValidationError::InvalidGlobalRicId(format!(
            "RIC id '{}' must be exactly 5 hex digits",
            ric_id
        )));
    }
    global_ric_id(config)?;

    if config.routing_manager.base_url.trim().is_empty() {
        return Err(ConfigValidationError::InvalidRoutingManager(
            "base URL is empty".to_string(),
        ));
    }

    config
        .logging
        .level()
        .map_err(ConfigValidationError::InvalidLogLevel)?;

    let writer = &config.rnib_writer;
    if writer.state_change_message_channel.is_empty()
        || writer.ran_manipulation_message_channel.is_empty()
    {
        return Err(ConfigValidationError::InvalidRnibWriter(
            "channel names must not be empty".to_string(),
        ));
    }

    Ok(())
}

/// Parses the controller identity out of the configuration.
pub fn global_ric_id(config: &E2mgrConfig) -> Result<GlobalRicId, ConfigValidationError> {
    let id = &config.global_ric_id;
    GlobalRicId::parse(&id.ric_id, &id.mcc, &id.mnc)
        .map_err(|e| ConfigValidationError::InvalidGlobalRicId(e.to_string()))
}

/// Loads and validates an E2 manager configuration in one step.
pub fn load_and_validate_e2mgr_config<P: AsRef<Path>>(path: P) -> Result<E2mgrConfig, ConfigError> {
    let config = load_e2mgr_config(path)?;
    validate_e2mgr_config(&config)?;
    Ok(config)
}
