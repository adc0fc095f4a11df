use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::net::IpAddr;
use std::path::Path;

// Largest UDP payload over IPv4
const MAX_UDP_PAYLOAD: usize = 65_507;
const MIN_DATAGRAM_SIZE: usize = 64;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    pub security: SecurityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub http_port: u16,
    pub udp_port: u16,
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
    #[serde(default = "default_max_datagram_size")]
    pub max_datagram_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub api_key: String,
    #[serde(default = "default_max_datagrams_per_minute")]
    pub max_datagrams_per_minute: u32,
    #[serde(default = "default_rate_limit_cleanup_interval")]
    pub rate_limit_cleanup_interval: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Console,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub console: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_initial_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            console: false,
        }
    }
}

// Default value functions
fn default_bind_address() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_num_threads() -> usize {
    num_cpus::get()
}

fn default_max_datagram_size() -> usize {
    1024
}

fn default_initial_capacity() -> usize {
    1024
}

fn default_max_datagrams_per_minute() -> u32 {
    600
}

fn default_rate_limit_cleanup_interval() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Json
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.http_port == 0 {
            bail!("http_port must be greater than 0");
        }

        if self.server.udp_port == 0 {
            bail!("udp_port must be greater than 0");
        }

        if self.server.http_port == self.server.udp_port {
            bail!(
                "http_port and udp_port must differ (both are {})",
                self.server.http_port
            );
        }

        if self.server.num_threads == 0 {
            bail!("num_threads must be greater than 0");
        }

        if !(MIN_DATAGRAM_SIZE..=MAX_UDP_PAYLOAD).contains(&self.server.max_datagram_size) {
            bail!(
                "max_datagram_size must be between {} and {}, got {}",
                MIN_DATAGRAM_SIZE,
                MAX_UDP_PAYLOAD,
                self.server.max_datagram_size
            );
        }

        if self.registry.initial_capacity == 0 {
            bail!("initial_capacity must be greater than 0");
        }

        if self.security.api_key.is_empty() {
            bail!("api_key must not be empty");
        }

        if self.security.max_datagrams_per_minute == 0 {
            bail!("max_datagrams_per_minute must be greater than 0");
        }

        if self.security.rate_limit_cleanup_interval == 0 {
            bail!("rate_limit_cleanup_interval must be greater than 0");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        Ok(())
    }
}
