//! Data models for service registration and discovery

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default seconds between two health probes
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 10;

/// Default seconds a critical instance survives before the agent drops it
pub const DEFAULT_DEREGISTER_AFTER_SECS: u64 = 30;

/// Address and port of a registry agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentEndpoint {
    /// Agent host, an IP address or hostname
    #[serde(default = "default_agent_host")]
    pub host: String,

    /// Agent HTTP API port
    #[serde(default = "default_agent_port")]
    pub port: u16,
}

impl AgentEndpoint {
    /// Endpoint of an agent on a specific host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Base URL of the agent's HTTP API
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/v1", self.host, self.port)
    }
}

impl Default for AgentEndpoint {
    fn default() -> Self {
        Self {
            host: default_agent_host(),
            port: default_agent_port(),
        }
    }
}

impl fmt::Display for AgentEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// A service instance to register with the agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Service name shared by all instances of the service
    pub name: String,

    /// Address the instance listens on
    pub address: String,

    /// Port the instance listens on
    pub port: u16,
}

impl ServiceDescriptor {
    /// Descriptor for an instance of `name` listening on `address:port`
    pub fn new(name: impl Into<String>, address: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            port,
        }
    }

    /// Identifier of this instance within the registry
    ///
    /// Built as `{name}-{address}:{port}`. The separators are part of the
    /// contract: instances that differ in name, address or port get
    /// distinct identifiers, unless the parts themselves contain the
    /// separators (name `a-b` with address `c` aliases name `a` with
    /// address `b-c`). Deregistration must present the same identifier
    /// the registration produced.
    pub fn service_id(&self) -> String {
        format!("{}-{}:{}", self.name, self.address, self.port)
    }

    /// `address:port` target a health probe dials to reach this instance
    pub fn check_target(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// Health check attached to a registration
///
/// The agent runs the probe every `interval_secs` and removes the
/// registration once the instance has been critical for
/// `deregister_after_secs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    /// What the agent probes
    #[serde(flatten)]
    pub probe: Probe,

    /// Seconds between two probes
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Seconds a critical instance survives before the agent drops it
    #[serde(default = "default_deregister_after")]
    pub deregister_after_secs: u64,
}

impl HealthCheck {
    /// TCP connect check against `target`, with the default windows
    pub fn tcp(target: impl Into<String>) -> Self {
        Self {
            probe: Probe::Tcp { tcp: target.into() },
            interval_secs: DEFAULT_CHECK_INTERVAL_SECS,
            deregister_after_secs: DEFAULT_DEREGISTER_AFTER_SECS,
        }
    }

    /// HTTP GET check against `url`, with the default windows
    pub fn http(url: impl Into<String>) -> Self {
        Self {
            probe: Probe::Http { http: url.into() },
            interval_secs: DEFAULT_CHECK_INTERVAL_SECS,
            deregister_after_secs: DEFAULT_DEREGISTER_AFTER_SECS,
        }
    }

    /// Same check with a different probe interval
    ///
    /// The grace window tracks the interval at three times its length, so
    /// an instance always gets a few failed probes before the agent drops
    /// it.
    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self.deregister_after_secs = interval_secs * 3;
        self
    }
}

/// Probe variants the agent knows how to run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Probe {
    /// TCP connect probe
    Tcp {
        /// `address:port` the agent dials
        tcp: String,
    },

    /// HTTP GET probe
    Http {
        /// URL the agent fetches
        http: String,
    },
}

/// One instance of a service, as reported by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredService {
    /// Name the instance is registered under
    pub name: String,

    /// Best known address for reaching the instance
    pub address: String,

    /// Port the instance listens on
    pub port: u16,
}

/// Body of a registration request, in the agent's field naming
#[derive(Debug, Serialize)]
pub(crate) struct RegisterPayload {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "Port")]
    port: u16,
    #[serde(rename = "Check")]
    check: WireCheck,
}

impl RegisterPayload {
    pub(crate) fn new(service: &ServiceDescriptor, check: &HealthCheck) -> Self {
        Self {
            name: service.name.clone(),
            id: service.service_id(),
            address: service.address.clone(),
            port: service.port,
            check: WireCheck::from(check),
        }
    }
}

/// Check section of a registration request
#[derive(Debug, Serialize)]
pub(crate) struct WireCheck {
    #[serde(flatten)]
    probe: WireProbe,
    #[serde(rename = "Interval")]
    interval: String,
    #[serde(rename = "DeregisterCriticalServiceAfter")]
    deregister_after: String,
}

impl From<&HealthCheck> for WireCheck {
    fn from(check: &HealthCheck) -> Self {
        let probe = match &check.probe {
            Probe::Tcp { tcp } => WireProbe::Tcp { tcp: tcp.clone() },
            Probe::Http { http } => WireProbe::Http { http: http.clone() },
        };

        Self {
            probe,
            interval: format!("{}s", check.interval_secs),
            deregister_after: format!("{}s", check.deregister_after_secs),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireProbe {
    Tcp {
        #[serde(rename = "TCP")]
        tcp: String,
    },
    Http {
        #[serde(rename = "HTTP")]
        http: String,
    },
}

/// One record of a catalog response
///
/// The catalog reports the node address and the service address
/// separately. The node address wins when both are present; records with
/// no address at all are skipped.
#[derive(Debug, Deserialize)]
pub(crate) struct CatalogRecord {
    #[serde(rename = "ServiceName")]
    service_name: String,
    #[serde(rename = "ServicePort")]
    service_port: u16,
    #[serde(rename = "Address")]
    address: Option<String>,
    #[serde(rename = "ServiceAddress")]
    service_address: Option<String>,
    #[serde(rename = "ServiceAddress6")]
    service_address6: Option<String>,
}

impl CatalogRecord {
    pub(crate) fn into_service(self) -> Option<DiscoveredService> {
        let address = self
            .address
            .or(self.service_address)
            .or(self.service_address6)?;

        Some(DiscoveredService {
            name: self.service_name,
            address,
            port: self.service_port,
        })
    }
}

fn default_agent_host() -> String {
    "127.0.0.1".to_string()
}

fn default_agent_port() -> u16 {
    8500
}

fn default_interval() -> u64 {
    DEFAULT_CHECK_INTERVAL_SECS
}

fn default_deregister_after() -> u64 {
    DEFAULT_DEREGISTER_AFTER_SECS
}
