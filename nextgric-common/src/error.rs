//! Error types for nextgric

use thiserror::Error;

/// Error types shared by the nextgric crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Protocol-related errors.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Identity values that cannot be parsed (PLMN, RIC id).
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    /// YAML parsing errors.
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}
