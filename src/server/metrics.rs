// src/server/metrics.rs
//! Server metrics tracking
//!
//! Atomic counters for the request path and the two domain pipelines
//! (recipe composition and shopping list aggregation), exposed via the
//! admin stats endpoint.

use serde::Serialize;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Server metrics collector
#[derive(Default)]
pub struct ServerMetrics {
    /// Total requests
    requests_total: AtomicU64,
    /// Recipes stored after passing composition
    recipes_composed: AtomicU64,
    /// Create/update payloads rejected by composition
    composition_rejections: AtomicU64,
    /// Shopping lists aggregated and downloaded
    shopping_lists_served: AtomicU64,
    /// Server start time
    start_time: OnceLock<Instant>,
}

impl ServerMetrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self {
            start_time: OnceLock::from(Instant::now()),
            ..Self::default()
        }
    }

    pub fn record_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_composed(&self) {
        self.recipes_composed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.composition_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_shopping_list(&self) {
        self.shopping_lists_served.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        let uptime = self
            .start_time
            .get()
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO);

        let composed = self.recipes_composed.load(Ordering::Relaxed);
        let rejected = self.composition_rejections.load(Ordering::Relaxed);
        let attempts = composed + rejected;
        let rejection_rate = if attempts > 0 {
            (rejected as f64 / attempts as f64) * 100.0
        } else {
            0.0
        };

        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            recipes_composed: composed,
            composition_rejections: rejected,
            rejection_rate,
            shopping_lists_served: self.shopping_lists_served.load(Ordering::Relaxed),
            uptime_secs: uptime.as_secs(),
        }
    }

    /// Reset all counters (for testing)
    #[cfg(test)]
    pub fn reset(&self) {
        self.requests_total.store(0, Ordering::Relaxed);
        self.recipes_composed.store(0, Ordering::Relaxed);
        self.composition_rejections.store(0, Ordering::Relaxed);
        self.shopping_lists_served.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of current metrics
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Total requests processed
    pub requests_total: u64,
    /// Recipes that passed composition and were stored
    pub recipes_composed: u64,
    /// Payloads rejected by composition
    pub composition_rejections: u64,
    /// Rejection percentage of all composition attempts
    pub rejection_rate: f64,
    /// Shopping list downloads
    pub shopping_lists_served: u64,
    /// Server uptime in seconds
    pub uptime_secs: u64,
}
