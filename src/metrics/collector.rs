use crate::stores::user_registry::UserRegistry;
use crate::utils::time::current_timestamp;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

pub struct Metrics {
    pub registrations: AtomicU64,
    pub failed_registrations: AtomicU64,
    pub successful_logins: AtomicU64,
    pub failed_logins: AtomicU64,
    pub datagrams_received: AtomicU64,
    pub datagrams_dropped: AtomicU64,
    pub datagrams_relayed: AtomicU64,
    pub send_failures: AtomicU64,
    pub start_time: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub registrations: u64,
    pub failed_registrations: u64,
    pub successful_logins: u64,
    pub failed_logins: u64,
    pub datagrams_received: u64,
    pub datagrams_dropped: u64,
    pub datagrams_relayed: u64,
    pub send_failures: u64,
    pub registered_users: usize,
    pub online_users: usize,
    pub uptime_seconds: i64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            registrations: AtomicU64::new(0),
            failed_registrations: AtomicU64::new(0),
            successful_logins: AtomicU64::new(0),
            failed_logins: AtomicU64::new(0),
            datagrams_received: AtomicU64::new(0),
            datagrams_dropped: AtomicU64::new(0),
            datagrams_relayed: AtomicU64::new(0),
            send_failures: AtomicU64::new(0),
            start_time: current_timestamp(),
        }
    }

    pub fn record_registration(&self, ok: bool) {
        let counter = if ok {
            &self.registrations
        } else {
            &self.failed_registrations
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_login(&self, ok: bool) {
        let counter = if ok {
            &self.successful_logins
        } else {
            &self.failed_logins
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_received(&self) {
        self.datagrams_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_dropped(&self) {
        self.datagrams_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_relayed(&self, count: u64) {
        self.datagrams_relayed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_send_failures(&self) {
        self.send_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Counters plus registry sizes at this instant
    pub fn get_snapshot(&self, registry: &UserRegistry) -> MetricsSnapshot {
        MetricsSnapshot {
            registrations: self.registrations.load(Ordering::Relaxed),
            failed_registrations: self.failed_registrations.load(Ordering::Relaxed),
            successful_logins: self.successful_logins.load(Ordering::Relaxed),
            failed_logins: self.failed_logins.load(Ordering::Relaxed),
            datagrams_received: self.datagrams_received.load(Ordering::Relaxed),
            datagrams_dropped: self.datagrams_dropped.load(Ordering::Relaxed),
            datagrams_relayed: self.datagrams_relayed.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            registered_users: registry.len(),
            online_users: registry.online_len(),
            uptime_seconds: current_timestamp() - self.start_time,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
