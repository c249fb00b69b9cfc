//! WebSocket echo server implementation

use crate::error::Result;
use async_net::{TcpListener, TcpStream};
use async_tungstenite::{WebSocketStream, accept_async};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use tracing::{debug, error, info};
use tungstenite::Message;

/// Default port the relay listens on
pub const DEFAULT_PORT: u16 = 9999;

/// WebSocket server that sends every message back to its sender
pub struct EchoServer {
    /// The TCP listener
    pub listener: TcpListener,
}

impl EchoServer {
    /// Bind the server to `addr`
    pub async fn bind(addr: impl AsRef<str>) -> Result<Self> {
        let listener = TcpListener::bind(addr.as_ref()).await?;
        info!("Echo relay listening on {}", addr.as_ref());

        Ok(Self { listener })
    }

    /// Accept one connection and perform the WebSocket handshake
    pub async fn accept(&self) -> Result<ConnectionHandler> {
        let (tcp_stream, addr) = self.listener.accept().await?;
        let ws_stream = accept_async(tcp_stream).await?;

        debug!("New WebSocket connection from {}", addr);

        Ok(ConnectionHandler {
            ws: ws_stream,
            addr,
        })
    }

    /// Address the listener actually bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}

/// Handler for a single client connection
pub struct ConnectionHandler {
    ws: WebSocketStream<TcpStream>,
    addr: SocketAddr,
}

impl ConnectionHandler {
    /// Echo messages until the client goes away
    ///
    /// Text and binary payloads go back verbatim, in arrival order. A
    /// close frame or a transport error ends this connection and nothing
    /// else.
    pub async fn handle(mut self) -> Result<()> {
        while let Some(msg) = self.ws.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    debug!("Echoing {} bytes to {}", text.len(), self.addr);
                    self.ws.send(Message::Text(text)).await?;
                }
                Ok(Message::Binary(data)) => {
                    debug!("Echoing {} binary bytes to {}", data.len(), self.addr);
                    self.ws.send(Message::Binary(data)).await?;
                }
                Ok(Message::Close(_)) => {
                    debug!("Client {} requested close", self.addr);
                    break;
                }
                Ok(_) => {
                    // Ping and pong are handled by the protocol layer
                }
                Err(e) => {
                    error!("WebSocket error from {}: {}", self.addr, e);
                    break;
                }
            }
        }

        debug!("Connection from {} closed", self.addr);
        Ok(())
    }
}
