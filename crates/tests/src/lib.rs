//! # Integration Tests
//!
//! End-to-end tests across crate boundaries.
//!
//! Covers:
//! - Contract compile checks
//! - Plan file -> loader -> request planning
//! - Fan-out execution properties (ordering, bound, deadline isolation)

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        // Contracts crate exposes its core types
        let _ = contracts::ConfigVersion::V1;
        let _ = contracts::FailureKind::Network;
    }
}

#[cfg(test)]
mod plan_tests {
    use std::io::Write;

    use config_loader::ConfigLoader;
    use http_fetch::plan_requests;

    const PLAN_TOML: &str = r#"
[service]
base_url = "https://eodhd.com/api"

[service.auth]
token_env = "EODHD_API_TOKEN"

[batch]
max_concurrent = 3
timeout_secs = 30

[[targets]]
id = "aapl"
url = "/fundamentals/AAPL.US"
[targets.params]
fmt = "json"

[[targets]]
id = "msft"
url = "/fundamentals/MSFT.US"

[[targets]]
id = "github"
url = "https://api.github.com"
"#;

    /// Plan file -> ConfigLoader -> planned requests
    #[test]
    fn test_plan_file_to_requests() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(PLAN_TOML.as_bytes()).unwrap();

        let plan = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(plan.batch.max_concurrent, 3);

        let requests = plan_requests(&plan).unwrap();
        assert_eq!(requests.len(), 3);
        assert_eq!(
            requests[0].url,
            "https://eodhd.com/api/fundamentals/AAPL.US?fmt=json"
        );
        assert_eq!(
            requests[1].url,
            "https://eodhd.com/api/fundamentals/MSFT.US"
        );
        assert_eq!(requests[2].url, "https://api.github.com/");

        // Planned URLs never carry the token; it is injected at send time
        for request in &requests {
            assert!(!request.url.contains("api_token"));
        }
    }

    #[test]
    fn test_invalid_plan_rejected() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(
            br#"
[batch]
max_concurrent = 0

[[targets]]
id = "aapl"
url = "https://eodhd.com/api/fundamentals/AAPL.US"
"#,
        )
        .unwrap();

        let result = ConfigLoader::load_from_path(file.path());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("max_concurrent must be >= 1"));
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use contracts::{BatchConfig, ContractError, Outcome};
    use fanout::{FanOut, MockOperation};

    fn config(max_concurrent: usize, timeout_secs: Option<u64>) -> BatchConfig {
        BatchConfig {
            max_concurrent,
            timeout_secs,
        }
    }

    /// End-to-end: N requests, budget B, all succeed in input order
    #[tokio::test]
    async fn test_e2e_ordered_outcomes() {
        let engine = FanOut::new(config(3, Some(10)));
        let operation = Arc::new(MockOperation::new(Duration::from_millis(10)));

        let outcomes = engine
            .run((0..20).collect(), Arc::clone(&operation))
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 20);
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.success(), Some(&i));
        }
        assert!(operation.peak_in_flight() <= 3);
        assert_eq!(engine.metrics().success_count(), 20);
    }

    /// The concurrency bound holds while failures are interleaved
    #[tokio::test]
    async fn test_e2e_bound_holds_with_failures() {
        let engine = FanOut::new(config(2, None));
        let operation = Arc::new(MockOperation::failing_at(
            Duration::from_millis(10),
            [0, 2, 4, 6],
        ));

        let outcomes = engine
            .run((0..8).collect(), Arc::clone(&operation))
            .await
            .unwrap();

        for (i, outcome) in outcomes.iter().enumerate() {
            if i % 2 == 0 {
                assert!(outcome.is_failure(), "index {i}");
            } else {
                assert!(outcome.is_success(), "index {i}");
            }
        }
        assert!(operation.peak_in_flight() <= 2);
    }

    /// Budget >= N is equivalent to unbounded execution
    #[tokio::test]
    async fn test_e2e_oversized_budget_equivalence() {
        let operation = Arc::new(MockOperation::failing_at(Duration::from_millis(5), [1, 3]));

        let bounded = FanOut::new(config(6, None))
            .run((0..6).collect(), Arc::clone(&operation))
            .await
            .unwrap();
        let oversized = FanOut::new(config(100, None))
            .run((0..6).collect(), Arc::clone(&operation))
            .await
            .unwrap();

        assert_eq!(bounded.len(), oversized.len());
        for (a, b) in bounded.iter().zip(oversized.iter()) {
            assert_eq!(a.is_success(), b.is_success());
            assert_eq!(a.success(), b.success());
        }
    }

    /// A timed-out batch leaves nothing running that affects a later call
    #[tokio::test]
    async fn test_e2e_timeout_isolation() {
        let engine = FanOut::new(config(2, Some(1)));

        let slow = Arc::new(MockOperation::new(Duration::from_secs(60)));
        let started = Instant::now();
        let result = engine.run((0..6).collect(), Arc::clone(&slow)).await;
        assert!(matches!(result, Err(ContractError::BatchTimeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(10));

        // Fresh inputs on the same engine complete normally
        let fast = Arc::new(MockOperation::new(Duration::from_millis(5)));
        let outcomes = engine.run((0..6).collect(), fast).await.unwrap();
        assert_eq!(outcomes.len(), 6);
        assert!(outcomes.iter().all(Outcome::is_success));

        // The slow operation's tasks were aborted, not left detached
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(slow.in_flight(), 0);
    }

    /// Concrete scenario: 5 requests, budget 2, fixed delay -> 3 rounds
    #[tokio::test]
    async fn test_e2e_round_scheduling() {
        let engine = FanOut::new(config(2, None));
        let operation = Arc::new(MockOperation::new(Duration::from_millis(40)));

        let started = Instant::now();
        let outcomes = engine.run((0..5).collect(), operation).await.unwrap();
        let elapsed = started.elapsed();

        let values: Vec<usize> = outcomes
            .into_iter()
            .map(|o| o.into_success().unwrap())
            .collect();
        assert_eq!(values, vec![0, 1, 2, 3, 4]);
        assert!(
            elapsed >= Duration::from_millis(120),
            "3 rounds of 40ms expected, finished in {elapsed:?}"
        );
    }

    /// Outcome statistics flow into the aggregator
    #[tokio::test]
    async fn test_e2e_stats_aggregation() {
        use observability::{BatchRecord, BatchStatsAggregator};

        let engine = FanOut::new(config(4, None));
        let operation = Arc::new(MockOperation::failing_at(Duration::from_millis(2), [0]));

        let started = Instant::now();
        let outcomes = engine.run((0..10).collect(), operation).await.unwrap();

        let mut aggregator = BatchStatsAggregator::new();
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        let failed = outcomes.len() - succeeded;
        for outcome in &outcomes {
            if let Some(failure) = outcome.failure() {
                aggregator.record_failure_kind(failure.kind);
            }
        }
        aggregator.update(&BatchRecord {
            requests: outcomes.len(),
            succeeded,
            failed,
            duration_ms: started.elapsed().as_secs_f64() * 1000.0,
            peak_in_flight: engine.metrics().last_peak_in_flight() as usize,
        });

        let summary = aggregator.summary();
        assert_eq!(summary.total_requests, 10);
        assert_eq!(summary.total_failed, 1);
        assert_eq!(summary.failure_kinds.get("network"), Some(&1));
    }
}
