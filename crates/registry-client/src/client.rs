//! Blocking HTTP client for the registry agent

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::models::{
    AgentEndpoint, CatalogRecord, DiscoveredService, HealthCheck, RegisterPayload,
    ServiceDescriptor,
};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::{debug, info};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const REGISTER_PATH: &str = "/agent/service/register";
const DEREGISTER_PATH: &str = "/agent/service/deregister";
const DISCOVER_PATH: &str = "/catalog/service";

/// Blocking client for the agent's service API
///
/// The client is synchronous on purpose. Registration and discovery sit
/// in setup paths and command-line tools, where pulling in an async
/// runtime buys nothing.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: Client,
    agent: AgentEndpoint,
}

impl RegistryClient {
    /// Client for the default local agent at `127.0.0.1:8500`
    pub fn new() -> Result<Self> {
        Self::with_endpoint(AgentEndpoint::default())
    }

    /// Client for a specific agent, with the default timeout
    pub fn with_endpoint(agent: AgentEndpoint) -> Result<Self> {
        Self::build(agent, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Client configured from `config`
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::build(
            config.agent.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn build(agent: AgentEndpoint, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { http, agent })
    }

    /// Agent this client talks to
    pub fn agent(&self) -> &AgentEndpoint {
        &self.agent
    }

    /// Register `service` with a TCP health check on its own address
    ///
    /// The agent starts dialing `address:port` every ten seconds and
    /// drops the registration after thirty seconds in critical state.
    pub fn register(&self, service: &ServiceDescriptor) -> Result<()> {
        self.register_with_check(service, &HealthCheck::tcp(service.check_target()))
    }

    /// Register `service` with an explicit health check
    ///
    /// Succeeds only when the agent answers 200 with an empty body.
    /// Anything else the agent sends back comes out as a protocol error
    /// carrying the status and body.
    pub fn register_with_check(
        &self,
        service: &ServiceDescriptor,
        check: &HealthCheck,
    ) -> Result<()> {
        let url = format!("{}{}", self.agent.base_url(), REGISTER_PATH);
        let payload = RegisterPayload::new(service, check);

        debug!("PUT {}", url);
        let response = self.http.put(&url).json(&payload).send()?;
        expect_empty_ok(response)?;

        info!("Registered service: {}", service.service_id());
        Ok(())
    }

    /// Remove the registration identified by `service_id`
    ///
    /// The identifier is the one `ServiceDescriptor::service_id`
    /// produced at registration time. Deregistering an unknown
    /// identifier is whatever the agent makes of it; Consul answers 200
    /// and this call succeeds.
    pub fn deregister(&self, service_id: &str) -> Result<()> {
        let url = format!("{}{}/{}", self.agent.base_url(), DEREGISTER_PATH, service_id);

        debug!("PUT {}", url);
        let response = self.http.put(&url).send()?;
        expect_empty_ok(response)?;

        info!("Deregistered service: {}", service_id);
        Ok(())
    }

    /// Catalog entries for `name`, as the raw JSON the agent returned
    ///
    /// The body passes through untouched. A name nobody registered is
    /// not an error; the agent answers `[]` and that is what comes back.
    pub fn discover(&self, name: &str) -> Result<Vec<u8>> {
        let url = format!("{}{}/{}", self.agent.base_url(), DISCOVER_PATH, name);

        debug!("GET {}", url);
        let response = self.http.get(&url).send()?;
        let status = response.status();
        let body = response.bytes()?;

        if status != StatusCode::OK {
            return Err(Error::Protocol {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        debug!("{} bytes of catalog data for '{}'", body.len(), name);
        Ok(body.to_vec())
    }

    /// Catalog entries for `name`, parsed into typed instances
    ///
    /// Each record keeps the first address the catalog offers for it,
    /// preferring the node address over the service address. Records
    /// with no address at all are dropped.
    pub fn discover_services(&self, name: &str) -> Result<Vec<DiscoveredService>> {
        let body = self.discover(name)?;
        let records: Vec<CatalogRecord> = serde_json::from_slice(&body)?;

        Ok(records
            .into_iter()
            .filter_map(CatalogRecord::into_service)
            .collect())
    }
}

fn expect_empty_ok(response: Response) -> Result<()> {
    let status = response.status();
    let body = response.bytes()?;

    if status == StatusCode::OK && body.is_empty() {
        return Ok(());
    }

    Err(Error::Protocol {
        status: status.as_u16(),
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}
