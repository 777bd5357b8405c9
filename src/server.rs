//! TCP server for handling client connections.
//!
//! Accepts connections and runs one protocol session per connection as its
//! own task. Sessions share nothing, so a slow or failing client never holds
//! up the accept loop or any other session.

use crate::config::{Config, ProtocolType};
use crate::protocols::{echo, prime};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, info_span, Instrument};

/// Listen backlog for the accepting socket
const LISTEN_BACKLOG: i32 = 1024;

/// Server instance
pub struct Server {
    config: Config,
    connection_limit: Arc<Semaphore>,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Self {
        let connection_limit = Arc::new(Semaphore::new(config.max_connections));

        Server {
            config,
            connection_limit,
        }
    }

    /// Bind the configured address and begin accepting connections
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.config.listen_addr()?;
        let listener = create_listener(addr)?;
        info!(address = %addr, protocol = ?self.config.protocol, "Server listening");

        self.serve(listener).await
    }

    /// Accept connections from `listener` forever.
    ///
    /// A failed accept is logged and skipped; it never stops the loop.
    pub async fn serve(
        &self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        loop {
            // Wait for a connection slot
            let permit = self.connection_limit.clone().acquire_owned().await?;

            match listener.accept().await {
                Ok((stream, addr)) => {
                    debug!(peer = %addr, "New connection");

                    let protocol = self.config.protocol;
                    let max_line_length = self.config.max_line_length;
                    let span = info_span!("session", peer = %addr);

                    tokio::spawn(
                        async move {
                            match handle_connection(stream, protocol, max_line_length).await {
                                Ok(()) => debug!("Connection closed"),
                                Err(e) => debug!(error = %e, "Connection error"),
                            }
                            drop(permit);
                        }
                        .instrument(span),
                    );
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}

/// Run the configured protocol on one connection.
async fn handle_connection(
    stream: TcpStream,
    protocol: ProtocolType,
    max_line_length: Option<usize>,
) -> io::Result<()> {
    match protocol {
        ProtocolType::Prime => prime::handle_connection(stream, max_line_length).await,
        ProtocolType::Echo => echo::handle_connection(stream).await,
    }
}

/// Create a TCP listener with SO_REUSEADDR so restarts can rebind at once.
fn create_listener(addr: SocketAddr) -> io::Result<TcpListener> {
    let socket = socket2::Socket::new(
        match addr {
            SocketAddr::V4(_) => socket2::Domain::IPV4,
            SocketAddr::V6(_) => socket2::Domain::IPV6,
        },
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;

    TcpListener::from_std(socket.into())
}
