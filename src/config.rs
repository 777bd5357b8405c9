//! Configuration module for the prime-time server.
//!
//! Supports both command-line arguments and TOML configuration file.
//! CLI arguments take precedence over config file values.

use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Command-line arguments for the server
#[derive(Parser, Debug)]
#[command(name = "prime-time")]
#[command(author = "prime-time authors")]
#[command(version = "0.1.0")]
#[command(about = "A line-delimited JSON primality server", long_about = None)]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind to (e.g., 0.0.0.0)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Session protocol to serve
    #[arg(short = 'P', long, value_enum)]
    pub protocol: Option<ProtocolType>,

    /// Number of worker threads (defaults to number of CPU cores)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Maximum number of concurrent connections
    #[arg(long)]
    pub max_connections: Option<usize>,

    /// Maximum request line length in bytes (unbounded when unset)
    #[arg(long)]
    pub max_line_length: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Protocol spoken on each accepted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolType {
    /// Newline-delimited JSON `isPrime` requests.
    #[default]
    Prime,
    /// Pass-through: bytes are written back unchanged.
    Echo,
}

/// TOML configuration file structure
#[derive(Debug, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server-related configuration
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Number of worker threads
    pub workers: Option<usize>,
    /// Maximum number of concurrent connections
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            max_connections: default_max_connections(),
        }
    }
}

/// Per-connection session configuration
#[derive(Debug, Deserialize, Default)]
pub struct SessionConfig {
    #[serde(default)]
    pub protocol: ProtocolType,
    /// Maximum request line length in bytes
    pub max_line_length: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_connections() -> usize {
    10_000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Final resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub protocol: ProtocolType,
    pub workers: Option<usize>,
    pub max_connections: usize,
    pub max_line_length: Option<usize>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: default_host(),
            port: default_port(),
            protocol: ProtocolType::default(),
            workers: None,
            max_connections: default_max_connections(),
            max_line_length: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from CLI args and optional TOML file.
    /// CLI arguments take precedence over TOML file values.
    pub fn load() -> Result<Self, ConfigError> {
        let cli = CliArgs::parse();

        // Load TOML config if specified
        let toml_config = if let Some(ref config_path) = cli.config {
            let contents = std::fs::read_to_string(config_path)
                .map_err(|e| ConfigError::FileRead(config_path.clone(), e))?;
            toml::from_str(&contents)
                .map_err(|e| ConfigError::TomlParse(config_path.clone(), e))?
        } else {
            TomlConfig::default()
        };

        Ok(Config::merge(cli, toml_config))
    }

    fn merge(cli: CliArgs, toml_config: TomlConfig) -> Self {
        Config {
            host: cli.host.unwrap_or(toml_config.server.host),
            port: cli.port.unwrap_or(toml_config.server.port),
            protocol: cli.protocol.unwrap_or(toml_config.session.protocol),
            workers: cli.workers.or(toml_config.server.workers),
            max_connections: cli
                .max_connections
                .unwrap_or(toml_config.server.max_connections),
            max_line_length: cli
                .max_line_length
                .or(toml_config.session.max_line_length),
            log_level: if cli.log_level != "info" {
                cli.log_level
            } else {
                toml_config.logging.level
            },
        }
    }

    /// Resolve the configured host and port into a socket address.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| ConfigError::InvalidAddress(addr, e))
    }
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    FileRead(PathBuf, std::io::Error),
    TomlParse(PathBuf, toml::de::Error),
    InvalidAddress(String, std::net::AddrParseError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileRead(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::TomlParse(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidAddress(addr, e) => {
                write!(f, "Invalid listen address '{addr}': {e}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TomlConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.max_connections, 10_000);
        assert_eq!(config.session.protocol, ProtocolType::Prime);
        assert_eq!(config.session.max_line_length, None);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_toml_parsing() {
        let toml_str = r#"
            [server]
            host = "127.0.0.1"
            port = 7000
            workers = 4
            max_connections = 64

            [session]
            protocol = "echo"
            max_line_length = 4096

            [logging]
            level = "debug"
        "#;

        let config: TomlConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.server.workers, Some(4));
        assert_eq!(config.server.max_connections, 64);
        assert_eq!(config.session.protocol, ProtocolType::Echo);
        assert_eq!(config.session.max_line_length, Some(4096));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_cli_overrides_toml() {
        let cli = CliArgs::parse_from([
            "prime-time",
            "--port",
            "6000",
            "--protocol",
            "echo",
            "--log-level",
            "trace",
        ]);
        let toml_config: TomlConfig = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 7000

            [session]
            max_line_length = 128
        "#,
        )
        .unwrap();

        let config = Config::merge(cli, toml_config);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 6000);
        assert_eq!(config.protocol, ProtocolType::Echo);
        assert_eq!(config.max_line_length, Some(128));
        assert_eq!(config.log_level, "trace");
    }

    #[test]
    fn test_listen_addr() {
        let config = Config::default();
        assert_eq!(config.listen_addr().unwrap(), "0.0.0.0:5000".parse().unwrap());

        let config = Config {
            host: "not an address".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.listen_addr(),
            Err(ConfigError::InvalidAddress(..))
        ));
    }
}
