//! Lightweight metrics for registry activity

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for registry activity
#[derive(Debug, Default)]
pub struct Metrics {
    handlers_registered: AtomicU64,
    handlers_enabled: AtomicU64,
    site_clears: AtomicU64,
    queries_served: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler_registered(&self) {
        self.handlers_registered.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "handlers_registered", "Metric incremented");
    }

    pub fn handler_enabled(&self) {
        self.handlers_enabled.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "handlers_enabled", "Metric incremented");
    }

    pub fn site_cleared(&self) {
        self.site_clears.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "site_clears", "Metric incremented");
    }

    pub fn query_served(&self) {
        self.queries_served.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "queries_served", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            handlers_registered: self.handlers_registered.load(Ordering::Relaxed),
            handlers_enabled: self.handlers_enabled.load(Ordering::Relaxed),
            site_clears: self.site_clears.load(Ordering::Relaxed),
            queries_served: self.queries_served.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub handlers_registered: u64,
    pub handlers_enabled: u64,
    pub site_clears: u64,
    pub queries_served: u64,
}
