//! Command-line front end for the registry client
//!
//! Registers one service instance with a registry agent and prints the
//! catalog entries for its name. With `--deregister` the instance is
//! removed again afterwards, with a second catalog lookup to show it
//! gone. Each step prints its own outcome; a failed step does not stop
//! the lookups that follow.

use anyhow::{Context, Result};
use clap::Parser;
use registry_client::{AgentEndpoint, ClientConfig, RegistryClient, ServiceDescriptor};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "regctl")]
#[command(about = "Register services with a Consul-compatible agent")]
#[command(version)]
struct Cli {
    /// Service name to register under
    service_name: String,

    /// Address the service listens on
    service_ip: String,

    /// Port the service listens on
    service_port: u16,

    /// Agent host, when not the local default
    #[arg(requires = "agent_port")]
    agent_ip: Option<String>,

    /// Agent port
    agent_port: Option<u16>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Remove the registration again after the catalog lookup
    #[arg(short, long)]
    deregister: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ClientConfig::default(),
    };

    // An agent named on the command line wins over the config file
    if let (Some(host), Some(port)) = (&cli.agent_ip, cli.agent_port) {
        config.agent = AgentEndpoint::new(host.as_str(), port);
    }

    let client = RegistryClient::from_config(&config).context("Failed to build client")?;
    run(&cli, &config, &client);

    Ok(())
}

fn run(cli: &Cli, config: &ClientConfig, client: &RegistryClient) {
    let service = ServiceDescriptor::new(
        cli.service_name.as_str(),
        cli.service_ip.as_str(),
        cli.service_port,
    );

    match client.register_with_check(&service, &config.check_for(&service)) {
        Ok(()) => println!(
            "✓ Registered {} with agent {}",
            service.service_id(),
            client.agent()
        ),
        Err(e) => {
            println!("✗ Failed to register {}", service.service_id());
            println!("  Error: {}", e);
        }
    }

    print_catalog(client, &cli.service_name);

    if cli.deregister {
        match client.deregister(&service.service_id()) {
            Ok(()) => println!("✓ Deregistered {}", service.service_id()),
            Err(e) => {
                println!("✗ Failed to deregister {}", service.service_id());
                println!("  Error: {}", e);
            }
        }

        print_catalog(client, &cli.service_name);
    }
}

fn print_catalog(client: &RegistryClient, name: &str) {
    match client.discover(name) {
        Ok(body) => println!("{}", String::from_utf8_lossy(&body)),
        Err(e) => {
            println!("✗ Failed to discover {}", name);
            println!("  Error: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_parses_service_triple() {
        let cli = Cli::try_parse_from(["regctl", "echo", "192.168.1.9", "9999"]).unwrap();
        assert_eq!(cli.service_name, "echo");
        assert_eq!(cli.service_ip, "192.168.1.9");
        assert_eq!(cli.service_port, 9999);
        assert!(cli.agent_ip.is_none());
        assert!(!cli.deregister);
    }

    #[test]
    fn test_parses_agent_pair() {
        let cli =
            Cli::try_parse_from(["regctl", "echo", "192.168.1.9", "9999", "10.0.0.1", "8500"])
                .unwrap();
        assert_eq!(cli.agent_ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(cli.agent_port, Some(8500));
    }

    #[test]
    fn test_agent_host_without_port_is_rejected() {
        let result = Cli::try_parse_from(["regctl", "echo", "192.168.1.9", "9999", "10.0.0.1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_deregister_flag() {
        let cli = Cli::try_parse_from(["regctl", "--deregister", "echo", "192.168.1.9", "9999"])
            .unwrap();
        assert!(cli.deregister);
    }

    #[test]
    fn test_lookup_still_runs_when_register_fails() {
        let server = MockServer::start();
        let register_mock = server.mock(|when, then| {
            when.method(Method::PUT).path("/v1/agent/service/register");
            then.status(500).body("Unexpected response code: 500");
        });
        let discover_mock = server.mock(|when, then| {
            when.method(Method::GET).path("/v1/catalog/service/echo");
            then.status(200).body("[]");
        });

        let cli = Cli::try_parse_from(["regctl", "echo", "192.168.1.9", "9999"]).unwrap();
        let config = ClientConfig {
            agent: AgentEndpoint::new("127.0.0.1", server.port()),
            ..ClientConfig::default()
        };
        let client = RegistryClient::from_config(&config).unwrap();

        run(&cli, &config, &client);

        register_mock.assert();
        discover_mock.assert();
    }

    #[test]
    fn test_second_lookup_still_runs_when_deregister_fails() {
        let server = MockServer::start();
        let register_mock = server.mock(|when, then| {
            when.method(Method::PUT).path("/v1/agent/service/register");
            then.status(200);
        });
        let deregister_mock = server.mock(|when, then| {
            when.method(Method::PUT)
                .path("/v1/agent/service/deregister/echo-192.168.1.9:9999");
            then.status(500).body("Unknown service ID");
        });
        let discover_mock = server.mock(|when, then| {
            when.method(Method::GET).path("/v1/catalog/service/echo");
            then.status(200).body("[]");
        });

        let cli = Cli::try_parse_from(["regctl", "--deregister", "echo", "192.168.1.9", "9999"])
            .unwrap();
        let config = ClientConfig {
            agent: AgentEndpoint::new("127.0.0.1", server.port()),
            ..ClientConfig::default()
        };
        let client = RegistryClient::from_config(&config).unwrap();

        run(&cli, &config, &client);

        register_mock.assert();
        deregister_mock.assert();
        discover_mock.assert_calls(2);
    }
}
