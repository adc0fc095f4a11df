use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, UdpSocket};
use tracing::{debug, info};

use crate::core::config::ServerConfig;
use crate::security::rate_limiter::DatagramRateLimiter;
use crate::utils::time::current_timestamp;

pub struct Listeners {
    pub http: TcpListener,
    pub udp: UdpSocket,
}

/// Bind the HTTP and datagram sockets before anything is served
pub async fn bind_listeners(server: &ServerConfig) -> Result<Listeners> {
    let http_addr = SocketAddr::new(server.bind_address, server.http_port);
    let udp_addr = SocketAddr::new(server.bind_address, server.udp_port);

    let http = TcpListener::bind(http_addr)
        .await
        .context(format!("Failed to bind HTTP listener to {}", http_addr))?;
    info!(address = %http_addr, "HTTP listener bound");

    let udp = UdpSocket::bind(udp_addr)
        .await
        .context(format!("Failed to bind UDP socket to {}", udp_addr))?;
    info!(address = %udp_addr, "UDP socket bound");

    Ok(Listeners { http, udp })
}

/// Periodically forget expired rate limit windows
pub fn spawn_rate_limit_cleanup(limiter: Arc<DatagramRateLimiter>, interval_secs: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

        loop {
            interval.tick().await;

            let removed = limiter.cleanup_expired(current_timestamp());
            debug!(
                removed_windows = removed,
                tracked_sources = limiter.len(),
                "Rate limiter cleanup completed"
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;

    #[tokio::test]
    async fn test_bind_listeners_on_loopback() {
        // Bind to ephemeral ports first to find free ones
        let probe_tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let probe_udp = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let http_port = probe_tcp.local_addr().unwrap().port();
        let udp_port = probe_udp.local_addr().unwrap().port();
        drop(probe_tcp);
        drop(probe_udp);

        let server = ServerConfig {
            http_port,
            udp_port,
            bind_address: IpAddr::from([127, 0, 0, 1]),
            num_threads: 1,
            max_datagram_size: 1024,
        };

        let listeners = bind_listeners(&server).await.unwrap();
        assert_eq!(listeners.http.local_addr().unwrap().port(), http_port);
        assert_eq!(listeners.udp.local_addr().unwrap().port(), udp_port);
    }
}
