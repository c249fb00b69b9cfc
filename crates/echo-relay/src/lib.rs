//! Runtime-agnostic WebSocket echo relay
//!
//! Accepts WebSocket connections and sends every text or binary message
//! straight back to the connection it came from. Connections are
//! independent; one client closing or erroring never disturbs another.
//!
//! The crate works with any async runtime. It uses:
//!
//! - `async-tungstenite` for WebSocket support
//! - `async-net` for networking
//! - Standard `futures` traits
//!
//! # Example
//!
//! ```no_run
//! use echo_relay::EchoServer;
//!
//! # async fn example() -> echo_relay::Result<()> {
//! let server = EchoServer::bind("127.0.0.1:9999").await?;
//!
//! // Accept connections - runtime agnostic
//! loop {
//!     let handler = server.accept().await?;
//!     // User chooses how to run the handler
//!     // e.g., tokio::spawn, smol::spawn, etc.
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod server;

pub use error::{Error, Result};
pub use server::{ConnectionHandler, DEFAULT_PORT, EchoServer};
