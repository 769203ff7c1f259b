//! Run statistics and reporting.

use std::time::Duration;

use serde::Serialize;

use contracts::Failure;
use observability::BatchStatsAggregator;

/// Statistics from one fetch run
#[derive(Debug, Clone, Default)]
pub struct FetchStats {
    /// Targets submitted
    pub targets_total: usize,

    /// Targets that produced a success outcome
    pub succeeded: usize,

    /// Targets that produced a captured failure
    pub failed: usize,

    /// Wall-clock duration of the batch
    pub duration: Duration,

    /// Peak simultaneously executing requests
    pub peak_in_flight: usize,

    /// Per-target results, in plan order
    pub results: Vec<TargetResult>,

    /// Aggregated batch metrics
    pub batch_metrics: BatchStatsAggregator,
}

/// Result of one target, for reports and `--output`
#[derive(Debug, Clone, Serialize)]
pub struct TargetResult {
    /// Target id from the plan
    pub id: String,

    /// HTTP status on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Response body size on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_bytes: Option<usize>,

    /// Captured failure, if the target failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
}

impl FetchStats {
    /// Requests per second over the whole batch
    pub fn throughput(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.targets_total as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Failure rate as percentage
    pub fn failure_rate(&self) -> f64 {
        if self.targets_total > 0 {
            (self.failed as f64 / self.targets_total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Fetch Statistics ===\n");
        println!("Duration: {:.2}s", self.duration.as_secs_f64());
        println!("Targets: {}", self.targets_total);
        println!("Succeeded: {}", self.succeeded);
        println!("Failed: {} ({:.2}%)", self.failed, self.failure_rate());
        println!("Throughput: {:.2} req/s", self.throughput());
        println!("Peak in-flight: {}", self.peak_in_flight);

        if !self.results.is_empty() {
            println!("\nTargets:");
            for result in &self.results {
                match &result.failure {
                    None => println!(
                        "  ✓ {} (status {}, {} bytes)",
                        result.id,
                        result.status.unwrap_or_default(),
                        result.body_bytes.unwrap_or_default()
                    ),
                    Some(failure) => println!("  ✗ {} - {}", result.id, failure),
                }
            }
        }

        println!("\n{}", self.batch_metrics.summary());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput() {
        let stats = FetchStats {
            targets_total: 10,
            succeeded: 10,
            duration: Duration::from_secs(2),
            ..Default::default()
        };
        assert!((stats.throughput() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_failure_rate() {
        let stats = FetchStats {
            targets_total: 4,
            succeeded: 3,
            failed: 1,
            ..Default::default()
        };
        assert!((stats.failure_rate() - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_stats() {
        let stats = FetchStats::default();
        assert_eq!(stats.throughput(), 0.0);
        assert_eq!(stats.failure_rate(), 0.0);
    }
}
