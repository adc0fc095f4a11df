use crate::core::error::DatagramError;
use crate::core::state::AppState;
use crate::models::message::ChatMessage;
use crate::models::user::UserRecord;
use crate::stores::user_registry::Liveness;
use crate::utils::time::current_timestamp;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, error, info, warn};

/// Receives chat datagrams and pushes accepted ones to every online user
pub struct DatagramRelay {
    socket: Arc<UdpSocket>,
    state: Arc<AppState>,
}

impl DatagramRelay {
    pub fn new(socket: UdpSocket, state: Arc<AppState>) -> Self {
        Self {
            socket: Arc::new(socket),
            state,
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Receive loop; each datagram is handled on its own task
    pub async fn run(self) {
        let max = self.state.config.server.max_datagram_size;
        // One spare byte so truncated oversize datagrams can be told apart
        let mut buf = vec![0u8; max + 1];

        loop {
            let (len, source) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(e) => {
                    error!(error = %e, "Failed to receive datagram");
                    continue;
                }
            };

            let payload = buf[..len].to_vec();
            let socket = Arc::clone(&self.socket);
            let state = Arc::clone(&self.state);

            tokio::spawn(async move {
                handle_datagram(&socket, &state, &payload, source).await;
            });
        }
    }
}

/// Check a datagram and return the endpoints it should be pushed to
///
/// The sender is validated through the registry, which promotes it to
/// online on its first datagram after login.
pub fn admit(
    state: &AppState,
    payload: &[u8],
    source: SocketAddr,
    now: i64,
) -> Result<Vec<SocketAddr>, DatagramError> {
    if !state.rate_limiter.allow(source.ip(), now) {
        return Err(DatagramError::RateLimited(source.ip()));
    }

    let max = state.config.server.max_datagram_size;
    if payload.len() > max {
        return Err(DatagramError::Oversized {
            len: payload.len(),
            max,
        });
    }

    let message: ChatMessage = serde_json::from_slice(payload)?;

    let liveness = state
        .registry
        .mark_active_and_get_status(message.user_id, source)?;

    if liveness == Liveness::Promoted {
        info!(user_id = message.user_id, endpoint = %source, "User online");
    }

    let targets = state
        .registry
        .snapshot_online_users()
        .iter()
        .filter_map(UserRecord::endpoint)
        .collect();

    Ok(targets)
}

async fn handle_datagram(socket: &UdpSocket, state: &AppState, payload: &[u8], source: SocketAddr) {
    state.metrics.increment_received();

    let targets = match admit(state, payload, source, current_timestamp()) {
        Ok(targets) => targets,
        Err(e) => {
            state.metrics.increment_dropped();
            debug!(source = %source, error = %e, "Datagram dropped");
            return;
        }
    };

    let mut relayed = 0u64;
    for target in &targets {
        match socket.send_to(payload, *target).await {
            Ok(_) => relayed += 1,
            Err(e) => {
                state.metrics.increment_send_failures();
                warn!(target = %target, error = %e, "Failed to push datagram");
            }
        }
    }

    state.metrics.add_relayed(relayed);
    debug!(source = %source, targets = targets.len(), relayed, "Datagram relayed");
}
