//! Batch metrics collection
//!
//! Records fan-out metrics to the metrics registry and aggregates in-memory
//! statistics for end-of-run summaries.

use contracts::FailureKind;
use metrics::{counter, gauge, histogram};

/// Facts about one finished batch, for recording and aggregation
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchRecord {
    /// Requests submitted
    pub requests: usize,
    /// Successful outcomes
    pub succeeded: usize,
    /// Captured failures
    pub failed: usize,
    /// Wall-clock duration of the batch (milliseconds)
    pub duration_ms: f64,
    /// Peak simultaneously executing operations
    pub peak_in_flight: usize,
}

/// Record metrics for one finished batch
///
/// Call once per completed `run`.
pub fn record_batch_completed(record: &BatchRecord) {
    counter!("batch_fetcher_batches_total").increment(1);
    counter!("batch_fetcher_requests_total").increment(record.requests as u64);
    counter!("batch_fetcher_outcomes_total", "result" => "success").increment(record.succeeded as u64);
    counter!("batch_fetcher_outcomes_total", "result" => "failure").increment(record.failed as u64);

    histogram!("batch_fetcher_batch_duration_ms").record(record.duration_ms);
    gauge!("batch_fetcher_peak_in_flight").set(record.peak_in_flight as f64);
}

/// Record a batch that hit its deadline
pub fn record_batch_timeout() {
    counter!("batch_fetcher_batch_timeouts_total").increment(1);
}

/// Record one per-request outcome
pub fn record_request_outcome(target: &str, failure_kind: Option<FailureKind>) {
    match failure_kind {
        None => {
            counter!(
                "batch_fetcher_request_outcomes_total",
                "target" => target.to_string(),
                "result" => "success"
            )
            .increment(1);
        }
        Some(kind) => {
            counter!(
                "batch_fetcher_request_outcomes_total",
                "target" => target.to_string(),
                "result" => kind.as_str()
            )
            .increment(1);
        }
    }
}

/// Batch statistics aggregator
///
/// Aggregates metrics in memory for statistics and summary output.
#[derive(Debug, Clone, Default)]
pub struct BatchStatsAggregator {
    /// Total batches completed
    pub total_batches: u64,

    /// Total batches that hit their deadline
    pub total_timeouts: u64,

    /// Total requests submitted
    pub total_requests: u64,

    /// Total successful outcomes
    pub total_succeeded: u64,

    /// Total captured failures
    pub total_failed: u64,

    /// Batch duration statistics (ms)
    pub duration_stats: RunningStats,

    /// Peak in-flight statistics
    pub peak_stats: RunningStats,

    /// Failure counts by kind
    pub failure_kinds: std::collections::HashMap<&'static str, u64>,
}

impl BatchStatsAggregator {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one finished batch into the aggregate
    pub fn update(&mut self, record: &BatchRecord) {
        self.total_batches += 1;
        self.total_requests += record.requests as u64;
        self.total_succeeded += record.succeeded as u64;
        self.total_failed += record.failed as u64;
        self.duration_stats.push(record.duration_ms);
        self.peak_stats.push(record.peak_in_flight as f64);
    }

    /// Count one timed-out batch
    pub fn record_timeout(&mut self) {
        self.total_batches += 1;
        self.total_timeouts += 1;
    }

    /// Count one captured failure by kind
    pub fn record_failure_kind(&mut self, kind: FailureKind) {
        *self.failure_kinds.entry(kind.as_str()).or_insert(0) += 1;
    }

    /// Generate a summary report
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_batches: self.total_batches,
            total_timeouts: self.total_timeouts,
            total_requests: self.total_requests,
            total_succeeded: self.total_succeeded,
            total_failed: self.total_failed,
            failure_rate: if self.total_requests > 0 {
                self.total_failed as f64 / self.total_requests as f64 * 100.0
            } else {
                0.0
            },
            duration_ms: StatsSummary::from(&self.duration_stats),
            peak_in_flight: StatsSummary::from(&self.peak_stats),
            failure_kinds: self.failure_kinds.clone(),
        }
    }

    /// Reset the aggregate
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metrics summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_batches: u64,
    pub total_timeouts: u64,
    pub total_requests: u64,
    pub total_succeeded: u64,
    pub total_failed: u64,
    pub failure_rate: f64,
    pub duration_ms: StatsSummary,
    pub peak_in_flight: StatsSummary,
    pub failure_kinds: std::collections::HashMap<&'static str, u64>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Batch Metrics Summary ===")?;
        writeln!(f, "Batches: {}", self.total_batches)?;
        writeln!(f, "Timed-out batches: {}", self.total_timeouts)?;
        writeln!(f, "Requests: {}", self.total_requests)?;
        writeln!(
            f,
            "Failures: {} ({:.2}%)",
            self.total_failed, self.failure_rate
        )?;
        writeln!(f, "Batch duration (ms): {}", self.duration_ms)?;
        writeln!(f, "Peak in-flight: {}", self.peak_in_flight)?;

        if !self.failure_kinds.is_empty() {
            writeln!(f, "Failure kinds:")?;
            for (kind, count) in &self.failure_kinds {
                writeln!(f, "  {}: {}", kind, count)?;
            }
        }

        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics calculator (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a new value
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// Sample count
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Minimum
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum
    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();

        stats.push(1.0);
        stats.push(2.0);
        stats.push(3.0);
        stats.push(4.0);
        stats.push(5.0);

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_update() {
        let mut aggregator = BatchStatsAggregator::new();

        aggregator.update(&BatchRecord {
            requests: 10,
            succeeded: 8,
            failed: 2,
            duration_ms: 120.0,
            peak_in_flight: 4,
        });
        aggregator.record_failure_kind(FailureKind::Network);
        aggregator.record_failure_kind(FailureKind::Status);
        aggregator.record_failure_kind(FailureKind::Network);

        assert_eq!(aggregator.total_batches, 1);
        assert_eq!(aggregator.total_requests, 10);
        assert_eq!(aggregator.total_failed, 2);
        assert_eq!(aggregator.failure_kinds.get("network"), Some(&2));
        assert_eq!(aggregator.failure_kinds.get("status"), Some(&1));
    }

    #[test]
    fn test_summary_display() {
        let mut aggregator = BatchStatsAggregator::new();
        aggregator.update(&BatchRecord {
            requests: 100,
            succeeded: 95,
            failed: 5,
            duration_ms: 300.0,
            peak_in_flight: 5,
        });

        let output = format!("{}", aggregator.summary());
        assert!(output.contains("Requests: 100"));
        assert!(output.contains("5.00%"));
    }

    #[test]
    fn test_timeout_counted_as_batch() {
        let mut aggregator = BatchStatsAggregator::new();
        aggregator.record_timeout();
        let summary = aggregator.summary();
        assert_eq!(summary.total_batches, 1);
        assert_eq!(summary.total_timeouts, 1);
        assert_eq!(summary.total_requests, 0);
    }
}
