//! FanOut - bounded concurrent application of one operation to many requests
//!
//! All requests are submitted at call time; the permit pool decides how many
//! operation bodies run simultaneously. The call returns once every request
//! has an outcome, or fails as a whole when the batch deadline elapses.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use contracts::{BatchConfig, ContractError, Failure, FailureKind, Operation, Outcome};

use crate::metrics::FanOutMetrics;
use crate::permit::PermitPool;

/// The fan-out engine
///
/// Holds the batch settings and counters accumulated across calls. A single
/// `run` call is a pure function from (requests, operation) to outcomes; no
/// state is carried between calls beyond the metrics.
pub struct FanOut {
    config: BatchConfig,
    metrics: Arc<FanOutMetrics>,
}

impl FanOut {
    /// Create an engine with the given batch settings
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(FanOutMetrics::new()),
        }
    }

    /// Batch settings in effect
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Counters accumulated across calls
    pub fn metrics(&self) -> &Arc<FanOutMetrics> {
        &self.metrics
    }

    /// Apply `operation` to every request, at most `max_concurrent` at a time
    ///
    /// Returns one outcome per request, in input order, regardless of the
    /// order in which operations completed. Per-request errors are captured
    /// as `Failure` outcomes and never abort the batch.
    ///
    /// # Errors
    /// - `ContractError::InvalidBudget` before any request is scheduled
    /// - `ContractError::BatchTimeout` when the deadline elapses; all
    ///   remaining tasks are aborted before returning
    #[instrument(
        name = "fanout_run",
        skip(self, requests, operation),
        fields(total = requests.len(), budget = self.config.max_concurrent)
    )]
    pub async fn run<O>(
        &self,
        requests: Vec<O::Request>,
        operation: Arc<O>,
    ) -> Result<Vec<Outcome<O::Output>>, ContractError>
    where
        O: Operation + Send + Sync + 'static,
    {
        let budget = self.config.max_concurrent;
        if budget < 1 {
            return Err(ContractError::InvalidBudget { budget });
        }

        self.metrics.inc_batch_count();

        let total = requests.len();
        if total == 0 {
            debug!("Empty batch, no permits engaged");
            return Ok(Vec::new());
        }

        info!(total, budget, "Batch started");

        let pool = Arc::new(PermitPool::new(budget));
        let completed = Arc::new(AtomicUsize::new(0));
        let mut tasks: JoinSet<(usize, Outcome<O::Output>)> = JoinSet::new();

        for (index, request) in requests.into_iter().enumerate() {
            let pool = Arc::clone(&pool);
            let operation = Arc::clone(&operation);
            let metrics = Arc::clone(&self.metrics);
            let completed = Arc::clone(&completed);

            tasks.spawn(async move {
                let result = {
                    let _permit = pool.acquire().await;
                    metrics.inc_launched_count();
                    operation.apply(&request).await
                };
                // Permit released; the next queued request may start
                completed.fetch_add(1, Ordering::Relaxed);

                let outcome = match result {
                    Ok(output) => {
                        metrics.inc_success_count();
                        Outcome::Success(output)
                    }
                    Err(err) => {
                        metrics.inc_failure_count();
                        debug!(index, error = %err, "Request failed");
                        Outcome::Failure(Failure::from(err))
                    }
                };
                (index, outcome)
            });
        }

        let outcomes = match self.config.timeout() {
            Some(limit) => match timeout(limit, Self::collect(&mut tasks, total)).await {
                Ok(outcomes) => outcomes,
                Err(_) => {
                    self.metrics.inc_timeout_count();
                    self.metrics
                        .set_last_peak_in_flight(pool.peak_in_flight() as u64);
                    let done = completed.load(Ordering::Relaxed);
                    warn!(
                        completed = done,
                        total, "Batch deadline elapsed, aborting remaining requests"
                    );
                    tasks.abort_all();
                    while tasks.join_next().await.is_some() {}
                    return Err(ContractError::BatchTimeout {
                        timeout_ms: limit.as_millis() as u64,
                        completed: done,
                        total,
                    });
                }
            },
            None => Self::collect(&mut tasks, total).await,
        };

        self.metrics
            .set_last_peak_in_flight(pool.peak_in_flight() as u64);
        info!(
            total,
            peak_in_flight = pool.peak_in_flight(),
            "Batch finished"
        );
        Ok(outcomes)
    }

    /// Drain the task set, placing each outcome at its request index
    async fn collect<T: Send + 'static>(
        tasks: &mut JoinSet<(usize, Outcome<T>)>,
        total: usize,
    ) -> Vec<Outcome<T>> {
        let mut slots: Vec<Option<Outcome<T>>> = Vec::with_capacity(total);
        slots.resize_with(total, || None);

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(join_err) => {
                    if !join_err.is_cancelled() {
                        warn!(error = %join_err, "Request task panicked");
                    }
                }
            }
        }

        // A slot can only still be empty if its task panicked; keep the
        // one-outcome-per-request invariant
        slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    Outcome::Failure(Failure::new(
                        FailureKind::Other,
                        "operation task terminated abnormally",
                    ))
                })
            })
            .collect()
    }
}

/// Convenience: run one batch with the given budget and no deadline
pub async fn run_bounded<O>(
    requests: Vec<O::Request>,
    max_concurrent: usize,
    operation: Arc<O>,
) -> Result<Vec<Outcome<O::Output>>, ContractError>
where
    O: Operation + Send + Sync + 'static,
{
    FanOut::new(BatchConfig::unbounded_time(max_concurrent))
        .run(requests, operation)
        .await
}
