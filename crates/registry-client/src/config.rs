//! Configuration structures for the registry client

use crate::client::DEFAULT_TIMEOUT_SECS;
use crate::error::Result;
use crate::models::{
    AgentEndpoint, DEFAULT_CHECK_INTERVAL_SECS, DEFAULT_DEREGISTER_AFTER_SECS, HealthCheck, Probe,
    ServiceDescriptor,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Registry client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Agent the client talks to
    #[serde(default)]
    pub agent: AgentEndpoint,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Probe windows applied to registrations
    #[serde(default)]
    pub check: CheckDefaults,
}

/// Probe windows applied when a registration builds its own check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDefaults {
    /// Seconds between two probes
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Seconds a critical instance survives before the agent drops it
    #[serde(default = "default_deregister_after")]
    pub deregister_after_secs: u64,
}

impl ClientConfig {
    /// Load configuration from a YAML or JSON file
    ///
    /// Files ending in `.yaml` or `.yml` parse as YAML, everything else
    /// as JSON. Missing fields fall back to their defaults, so a partial
    /// file is fine.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        if path.extension().and_then(|s| s.to_str()) == Some("yaml")
            || path.extension().and_then(|s| s.to_str()) == Some("yml")
        {
            Ok(serde_yaml::from_str(&contents)?)
        } else {
            Ok(serde_json::from_str(&contents)?)
        }
    }

    /// TCP health check for `service`, using the configured windows
    pub fn check_for(&self, service: &ServiceDescriptor) -> HealthCheck {
        HealthCheck {
            probe: Probe::Tcp {
                tcp: service.check_target(),
            },
            interval_secs: self.check.interval_secs,
            deregister_after_secs: self.check.deregister_after_secs,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            agent: AgentEndpoint::default(),
            timeout_secs: default_timeout(),
            check: CheckDefaults::default(),
        }
    }
}

impl Default for CheckDefaults {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            deregister_after_secs: default_deregister_after(),
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_interval() -> u64 {
    DEFAULT_CHECK_INTERVAL_SECS
}

fn default_deregister_after() -> u64 {
    DEFAULT_DEREGISTER_AFTER_SECS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_serialization() {
        let config = ClientConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: ClientConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.agent.to_string(), "127.0.0.1:8500");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_partial_yaml_config() {
        let yaml = "agent:\n  host: 10.0.0.5\n";
        let config: ClientConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.agent.host, "10.0.0.5");
        assert_eq!(config.agent.port, 8500);
        assert_eq!(config.check.interval_secs, 10);
        assert_eq!(config.check.deregister_after_secs, 30);
    }

    #[test]
    fn test_from_file_picks_format_by_extension() {
        let mut yaml_file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        writeln!(yaml_file, "timeout_secs: 3").unwrap();
        let config = ClientConfig::from_file(yaml_file.path()).unwrap();
        assert_eq!(config.timeout_secs, 3);

        let mut json_file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .unwrap();
        writeln!(json_file, "{{\"timeout_secs\": 7}}").unwrap();
        let config = ClientConfig::from_file(json_file.path()).unwrap();
        assert_eq!(config.timeout_secs, 7);

        // Anything that is not .yaml/.yml reads as JSON
        let mut other_file = tempfile::Builder::new()
            .suffix(".conf")
            .tempfile()
            .unwrap();
        writeln!(other_file, "{{\"timeout_secs\": 9}}").unwrap();
        let config = ClientConfig::from_file(other_file.path()).unwrap();
        assert_eq!(config.timeout_secs, 9);
    }

    #[test]
    fn test_check_for_uses_configured_windows() {
        let yaml = "check:\n  interval_secs: 5\n  deregister_after_secs: 15\n";
        let config: ClientConfig = serde_yaml::from_str(yaml).unwrap();

        let service = ServiceDescriptor::new("echo", "10.0.0.1", 9999);
        let check = config.check_for(&service);

        assert_eq!(
            check.probe,
            Probe::Tcp {
                tcp: "10.0.0.1:9999".to_string()
            }
        );
        assert_eq!(check.interval_secs, 5);
        assert_eq!(check.deregister_after_secs, 15);
    }
}
