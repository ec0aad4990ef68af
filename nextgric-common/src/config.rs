//! Configuration structures for the E2 manager
//!
//! Deserialized from YAML with camelCase keys. Validation lives in the
//! manager crate's config loader.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;

/// Default reconnection ceiling.
pub const DEFAULT_MAX_CONNECTION_ATTEMPTS: u32 = 3;
/// Default quiet period after a RAN goes DISCONNECTED, in milliseconds.
pub const DEFAULT_SETUP_QUIET_PERIOD_MS: u64 = 10_000;
/// Default time a RAN stays UNDER_RESET before the reset response is sent.
pub const DEFAULT_E2_RESET_TIMEOUT_SEC: u64 = 10;
/// Default routing manager HTTP timeout, in milliseconds.
pub const DEFAULT_ROUTING_MANAGER_TIMEOUT_MS: u64 = 5_000;

fn default_max_connection_attempts() -> u32 {
    DEFAULT_MAX_CONNECTION_ATTEMPTS
}

fn default_setup_quiet_period_ms() -> u64 {
    DEFAULT_SETUP_QUIET_PERIOD_MS
}

fn default_e2_reset_timeout_sec() -> u64 {
    DEFAULT_E2_RESET_TIMEOUT_SEC
}

fn default_routing_manager_timeout_ms() -> u64 {
    DEFAULT_ROUTING_MANAGER_TIMEOUT_MS
}

fn default_state_change_channel() -> String {
    "RAN_CONNECTION_STATUS_CHANGE".to_string()
}

fn default_ran_manipulation_channel() -> String {
    "RAN_MANIPULATION".to_string()
}

/// Logging section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Log level name (trace, debug, info, warn, error)
    #[serde(default)]
    pub log_level: String,
}

impl LoggingConfig {
    /// Parsed log level, falling back to info for an empty value.
    pub fn level(&self) -> Result<LogLevel, String> {
        if self.log_level.is_empty() {
            return Ok(LogLevel::default());
        }
        self.log_level.parse()
    }
}

/// Routing manager section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingManagerConfig {
    /// Base URL, e.g. `http://rtmgr:12020/ric/v1/handles/`
    pub base_url: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_routing_manager_timeout_ms")]
    pub timeout_ms: u64,
}

impl RoutingManagerConfig {
    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Global RIC id section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalRicIdConfig {
    /// 20-bit RIC id as 5 hex digits
    pub ric_id: String,
    /// Mobile Country Code (3 digits)
    pub mcc: String,
    /// Mobile Network Code (2-3 digits)
    pub mnc: String,
}

/// RNIB writer section: names of the publish channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RnibWriterConfig {
    /// Channel receiving connectivity events
    #[serde(default = "default_state_change_channel")]
    pub state_change_message_channel: String,
    /// Channel receiving RAN add/update notifications
    #[serde(default = "default_ran_manipulation_channel")]
    pub ran_manipulation_message_channel: String,
}

impl Default for RnibWriterConfig {
    fn default() -> Self {
        Self {
            state_change_message_channel: default_state_change_channel(),
            ran_manipulation_message_channel: default_ran_manipulation_channel(),
        }
    }
}

/// E2 manager configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct E2mgrConfig {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Routing manager endpoint
    pub routing_manager: RoutingManagerConfig,
    /// Reconnection ceiling
    #[serde(default = "default_max_connection_attempts")]
    pub max_connection_attempts: u32,
    /// Quiet period after DISCONNECTED during which setup requests are dropped
    #[serde(default = "default_setup_quiet_period_ms")]
    pub setup_quiet_period_ms: u64,
    /// Seconds spent UNDER_RESET before answering a reset request
    #[serde(default = "default_e2_reset_timeout_sec", rename = "e2ResetTimeOutSec")]
    pub e2_reset_timeout_sec: u64,
    /// Controller identity
    pub global_ric_id: GlobalRicIdConfig,
    /// Publish channel names
    #[serde(default)]
    pub rnib_writer: RnibWriterConfig,
    /// Eviction TTL for per-RAN procedure state and snapshots; unset keeps entries forever
    #[serde(default)]
    pub procedure_state_ttl_sec: Option<u64>,
}

impl E2mgrConfig {
    /// Quiet period as a duration.
    pub fn setup_quiet_period(&self) -> Duration {
        Duration::from_millis(self.setup_quiet_period_ms)
    }

    /// Reset wait as a duration.
    pub fn e2_reset_timeout(&self) -> Duration {
        Duration::from_secs(self.e2_reset_timeout_sec)
    }

    /// Eviction TTL, if configured.
    pub fn procedure_state_ttl(&self) -> Option<Duration> {
        self.procedure_state_ttl_sec.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
routingManager:
  baseUrl: http://localhost:12020/ric/v1/handles/
globalRicId:
  ricId: AACCE
  mcc: "310"
  mnc: "411"
"#;

    #[test]
    fn test_minimal_config_defaults() {
        let config: E2mgrConfig = serde_yaml::from_str(MINIMAL).unwrap();
        assert_eq!(config.max_connection_attempts, DEFAULT_MAX_CONNECTION_ATTEMPTS);
        assert_eq!(config.setup_quiet_period(), Duration::from_secs(10));
        assert_eq!(config.e2_reset_timeout_sec, DEFAULT_E2_RESET_TIMEOUT_SEC);
        assert_eq!(config.routing_manager.timeout_ms, DEFAULT_ROUTING_MANAGER_TIMEOUT_MS);
        assert_eq!(
            config.rnib_writer.state_change_message_channel,
            "RAN_CONNECTION_STATUS_CHANGE"
        );
        assert_eq!(config.procedure_state_ttl(), None);
        assert_eq!(config.logging.level().unwrap(), LogLevel::Info);
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
logging:
  logLevel: debug
routingManager:
  baseUrl: http://rtmgr/
  timeoutMs: 250
maxConnectionAttempts: 5
setupQuietPeriodMs: 2000
e2ResetTimeOutSec: 3
globalRicId:
  ricId: "10000"
  mcc: "208"
  mnc: "92"
rnibWriter:
  stateChangeMessageChannel: STATE
  ranManipulationMessageChannel: MANIP
procedureStateTtlSec: 600
"#;
        let config: E2mgrConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.logging.level().unwrap(), LogLevel::Debug);
        assert_eq!(config.routing_manager.timeout(), Duration::from_millis(250));
        assert_eq!(config.max_connection_attempts, 5);
        assert_eq!(config.e2_reset_timeout(), Duration::from_secs(3));
        assert_eq!(config.rnib_writer.ran_manipulation_message_channel, "MANIP");
        assert_eq!(config.procedure_state_ttl(), Some(Duration::from_secs(600)));
    }
}
