//! Run orchestrator - coordinates plan, fetcher and engine.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};

use contracts::{ContractError, FetchPlan, Outcome};
use fanout::FanOut;
use http_fetch::{plan_requests, HttpFetcher};
use observability::{
    record_batch_completed, record_batch_timeout, record_request_outcome, BatchRecord,
    BatchStatsAggregator,
};

use super::{FetchStats, TargetResult};

/// Runner configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// The fetch plan (overrides already applied)
    pub plan: FetchPlan,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Executes one fetch plan to completion
pub struct Runner {
    config: RunnerConfig,
}

impl Runner {
    /// Create a runner with the given configuration
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Run the plan to completion
    ///
    /// Per-target failures are captured in the returned stats; only a batch
    /// error (deadline, invalid budget) or setup failure aborts the run.
    pub async fn run(self) -> Result<FetchStats> {
        let started = Instant::now();
        let plan = &self.config.plan;

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Resolve targets into requests
        let requests = plan_requests(plan).context("Failed to plan requests")?;
        let ids: Vec<String> = requests.iter().map(|r| r.id.clone()).collect();

        // Build the fetch operation
        let fetcher =
            Arc::new(HttpFetcher::from_service(&plan.service).context("Failed to build fetcher")?);
        if let Some(masked) = fetcher.masked_token() {
            info!(token = %masked, "Using API token");
        }

        info!(
            targets = ids.len(),
            budget = plan.batch.max_concurrent,
            timeout_secs = ?plan.batch.timeout_secs,
            "Starting fetch batch"
        );

        let engine = FanOut::new(plan.batch.clone());
        let mut aggregator = BatchStatsAggregator::new();

        let outcomes = match engine.run(requests, fetcher).await {
            Ok(outcomes) => outcomes,
            Err(err) => {
                if matches!(err, ContractError::BatchTimeout { .. }) {
                    record_batch_timeout();
                }
                return Err(err).context("Fetch batch failed");
            }
        };

        let duration = started.elapsed();
        let peak = engine.metrics().last_peak_in_flight() as usize;

        // Fold outcomes into per-target results
        let mut results = Vec::with_capacity(outcomes.len());
        let mut succeeded = 0;
        let mut failed = 0;

        for (id, outcome) in ids.into_iter().zip(outcomes) {
            match outcome {
                Outcome::Success(response) => {
                    succeeded += 1;
                    record_request_outcome(&id, None);
                    results.push(TargetResult {
                        id,
                        status: Some(response.status),
                        body_bytes: Some(response.body.len()),
                        failure: None,
                    });
                }
                Outcome::Failure(failure) => {
                    failed += 1;
                    record_request_outcome(&id, Some(failure.kind));
                    aggregator.record_failure_kind(failure.kind);
                    warn!(target_id = %id, error = %failure, "Target failed");
                    results.push(TargetResult {
                        id,
                        status: None,
                        body_bytes: None,
                        failure: Some(failure),
                    });
                }
            }
        }

        let record = BatchRecord {
            requests: results.len(),
            succeeded,
            failed,
            duration_ms: duration.as_secs_f64() * 1000.0,
            peak_in_flight: peak,
        };
        record_batch_completed(&record);
        aggregator.update(&record);

        info!(
            succeeded,
            failed,
            duration_secs = duration.as_secs_f64(),
            "Fetch batch complete"
        );

        Ok(FetchStats {
            targets_total: results.len(),
            succeeded,
            failed,
            duration,
            peak_in_flight: peak,
            results,
            batch_metrics: aggregator,
        })
    }
}
