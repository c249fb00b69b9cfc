//! Synchronous client for a Consul-compatible service registry
//!
//! This crate talks to the HTTP API of a local registry agent to register
//! service instances, deregister them, and look up the instances of a
//! service by name. Registrations carry a health check so the agent can
//! probe the instance and drop it once it stays critical.
//!
//! The client blocks on purpose. It runs in service setup paths and
//! command-line tools, where an async runtime would be extra machinery
//! for three short HTTP calls.
//!
//! # Example
//!
//! ```no_run
//! use registry_client::{RegistryClient, ServiceDescriptor};
//!
//! # fn example() -> registry_client::Result<()> {
//! let client = RegistryClient::new()?;
//! let service = ServiceDescriptor::new("echo", "192.168.1.9", 9999);
//!
//! client.register(&service)?;
//! let instances = client.discover_services("echo")?;
//! client.deregister(&service.service_id())?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::{DEFAULT_TIMEOUT_SECS, RegistryClient};
pub use config::{CheckDefaults, ClientConfig};
pub use error::{Error, Result};
pub use models::*;
