// Application state (AppState)

use crate::core::config::Config;
use crate::metrics::collector::Metrics;
use crate::security::rate_limiter::DatagramRateLimiter;
use crate::stores::user_registry::UserRegistry;
use std::sync::Arc;

/// State shared by the HTTP handlers and the datagram relay
#[derive(Clone)]
pub struct AppState {
    /// Accounts, login state and online endpoints
    pub registry: Arc<UserRegistry>,

    /// Per-IP limiter for inbound datagrams
    pub rate_limiter: Arc<DatagramRateLimiter>,

    pub metrics: Arc<Metrics>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);

        Self {
            registry: Arc::new(UserRegistry::with_capacity(config.registry.initial_capacity)),
            rate_limiter: Arc::new(DatagramRateLimiter::new(
                config.security.max_datagrams_per_minute,
            )),
            metrics: Arc::new(Metrics::new()),
            config,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::core::config::{
        LogFormat, LoggingConfig, RegistryConfig, SecurityConfig, ServerConfig,
    };
    use std::net::IpAddr;

    pub const TEST_API_KEY: &str = "test-api-key";

    pub fn create_test_config() -> Config {
        Config {
            server: ServerConfig {
                http_port: 8080,
                udp_port: 9000,
                bind_address: IpAddr::from([127, 0, 0, 1]),
                num_threads: 2,
                max_datagram_size: 1024,
            },
            registry: RegistryConfig {
                initial_capacity: 16,
            },
            security: SecurityConfig {
                api_key: TEST_API_KEY.to_string(),
                max_datagrams_per_minute: 100,
                rate_limit_cleanup_interval: 60,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Console,
                console: true,
            },
        }
    }

    pub fn create_test_state() -> Arc<AppState> {
        Arc::new(AppState::new(create_test_config()))
    }
}
