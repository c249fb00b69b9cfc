//! WebSocket echo relay daemon
//!
//! Listens for WebSocket connections and echoes every message back to
//! its sender. Handy as the far end for client and connectivity tests.

use anyhow::Result;
use clap::Parser;
use echo_relay::{DEFAULT_PORT, EchoServer};
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "echo-relay")]
#[command(about = "WebSocket relay that echoes every message back", long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to bind
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_target(false).init();

    let args = Args::parse();

    smol::block_on(async {
        let server = EchoServer::bind(format!("{}:{}", args.bind, args.port)).await?;

        loop {
            match server.accept().await {
                Ok(handler) => {
                    smol::spawn(async move {
                        if let Err(e) = handler.handle().await {
                            error!("Connection handler error: {}", e);
                        }
                    })
                    .detach();
                }
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    // Keep serving the connections we can
                }
            }
        }
    })
}
