//! prime-time: a line-delimited JSON primality server
//!
//! Clients send one JSON request per line:
//! `{"method":"isPrime","number":<number>}`
//! and get one JSON response per line:
//! `{"method":"isPrime","prime":<true|false>}`
//!
//! Features:
//! - Any number of concurrent connections, each served independently
//! - Requests may be split across reads or batched in a single read
//! - Malformed requests get `malformed` and the connection is closed
//! - Pass-through echo mode for transport testing
//! - Configuration via CLI arguments or TOML file

mod buffer;
mod config;
mod protocols;
mod server;

use config::Config;
use server::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(
        host = %config.host,
        port = config.port,
        protocol = ?config.protocol,
        workers = ?config.workers,
        max_connections = config.max_connections,
        max_line_length = ?config.max_line_length,
        "Starting prime-time server"
    );

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    if let Some(workers) = config.workers.filter(|&n| n > 0) {
        builder.worker_threads(workers);
    }
    let runtime = builder.enable_all().build()?;

    runtime.block_on(async move { Server::new(config).run().await })
}
