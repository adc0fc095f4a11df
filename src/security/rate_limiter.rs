use crate::utils::time::elapsed_seconds;
use dashmap::DashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};

const WINDOW_SECONDS: i64 = 60;

/// Fixed-window counter of inbound datagrams per source IP
pub struct DatagramRateLimiter {
    windows: DashMap<IpAddr, (AtomicU32, AtomicI64)>,
    max_per_window: u32,
}

impl DatagramRateLimiter {
    pub fn new(max_per_window: u32) -> Self {
        Self {
            windows: DashMap::new(),
            max_per_window,
        }
    }

    /// Count one datagram from `ip` and report whether it is within budget
    pub fn allow(&self, ip: IpAddr, now: i64) -> bool {
        let entry = self
            .windows
            .entry(ip)
            .or_insert_with(|| (AtomicU32::new(0), AtomicI64::new(now)));

        let (count, window_start) = entry.value();

        if elapsed_seconds(window_start.load(Ordering::Relaxed), now) >= WINDOW_SECONDS {
            window_start.store(now, Ordering::Relaxed);
            count.store(1, Ordering::Relaxed);
            return true;
        }

        count.fetch_add(1, Ordering::Relaxed) < self.max_per_window
    }

    /// Drop windows that have already expired; returns how many were removed
    pub fn cleanup_expired(&self, now: i64) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, (_, window_start)| {
            elapsed_seconds(window_start.load(Ordering::Relaxed), now) < WINDOW_SECONDS
        });
        before.saturating_sub(self.windows.len())
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
