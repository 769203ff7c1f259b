//! Engine metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters accumulated across the batches run by one engine
#[derive(Debug, Default)]
pub struct FanOutMetrics {
    /// Total batches started
    batch_count: AtomicU64,
    /// Total batches that hit the deadline
    timeout_count: AtomicU64,
    /// Total operations whose body started executing
    launched_count: AtomicU64,
    /// Total successful outcomes
    success_count: AtomicU64,
    /// Total captured failures
    failure_count: AtomicU64,
    /// Peak in-flight of the most recent batch
    last_peak_in_flight: AtomicU64,
}

impl FanOutMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total batches started
    pub fn batch_count(&self) -> u64 {
        self.batch_count.load(Ordering::Relaxed)
    }

    /// Increment batch count
    pub fn inc_batch_count(&self) {
        self.batch_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total timed-out batches
    pub fn timeout_count(&self) -> u64 {
        self.timeout_count.load(Ordering::Relaxed)
    }

    /// Increment timeout count
    pub fn inc_timeout_count(&self) {
        self.timeout_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total launched operations
    pub fn launched_count(&self) -> u64 {
        self.launched_count.load(Ordering::Relaxed)
    }

    /// Increment launched count
    pub fn inc_launched_count(&self) {
        self.launched_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get success count
    pub fn success_count(&self) -> u64 {
        self.success_count.load(Ordering::Relaxed)
    }

    /// Increment success count
    pub fn inc_success_count(&self) {
        self.success_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get failure count
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Increment failure count
    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get peak in-flight of the most recent batch
    pub fn last_peak_in_flight(&self) -> u64 {
        self.last_peak_in_flight.load(Ordering::Relaxed)
    }

    /// Set peak in-flight for a finished batch
    pub fn set_last_peak_in_flight(&self, peak: u64) {
        self.last_peak_in_flight.store(peak, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batch_count: self.batch_count(),
            timeout_count: self.timeout_count(),
            launched_count: self.launched_count(),
            success_count: self.success_count(),
            failure_count: self.failure_count(),
            last_peak_in_flight: self.last_peak_in_flight(),
        }
    }
}

/// Snapshot of engine metrics (for reporting)
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub batch_count: u64,
    pub timeout_count: u64,
    pub launched_count: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub last_peak_in_flight: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = FanOutMetrics::new();
        metrics.inc_batch_count();
        metrics.inc_launched_count();
        metrics.inc_launched_count();
        metrics.inc_success_count();
        metrics.inc_failure_count();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.batch_count, 1);
        assert_eq!(snapshot.launched_count, 2);
        assert_eq!(snapshot.success_count, 1);
        assert_eq!(snapshot.failure_count, 1);
        assert_eq!(snapshot.timeout_count, 0);
    }
}
