//! Mock operation
//!
//! Deterministic operation for tests and offline demos: configurable delay,
//! failure indices, and in-flight instrumentation to verify the concurrency
//! bound from the outside.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use contracts::{ContractError, Operation};

/// Mock operation over `usize` requests
///
/// A request is its own index; on success the operation echoes it back.
pub struct MockOperation {
    /// Sleep before completing, simulating I/O wait
    delay: Duration,

    /// Requests that fail with a network error
    fail_indices: HashSet<usize>,

    /// Requests that panic mid-operation
    panic_indices: HashSet<usize>,

    /// Operations started (entered `apply`)
    calls: AtomicUsize,

    /// Operation bodies currently executing
    in_flight: AtomicUsize,

    /// Peak concurrent operation bodies observed
    peak_in_flight: AtomicUsize,
}

impl MockOperation {
    /// Always-succeeding operation with the given simulated latency
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            fail_indices: HashSet::new(),
            panic_indices: HashSet::new(),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Operation that fails deterministically at the given request indices
    pub fn failing_at(delay: Duration, indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            fail_indices: indices.into_iter().collect(),
            ..Self::new(delay)
        }
    }

    /// Operation that panics at the given request indices
    pub fn panicking_at(delay: Duration, indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            panic_indices: indices.into_iter().collect(),
            ..Self::new(delay)
        }
    }

    /// Number of `apply` invocations started
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Current number of executing operation bodies
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Peak number of simultaneously executing operation bodies
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::Relaxed)
    }

    fn enter(&self) -> InFlightGuard<'_> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let current = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;

        let mut peak = self.peak_in_flight.load(Ordering::Relaxed);
        while current > peak {
            match self.peak_in_flight.compare_exchange_weak(
                peak,
                current,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(p) => peak = p,
            }
        }

        InFlightGuard {
            in_flight: &self.in_flight,
        }
    }
}

/// Decrements the in-flight gauge on drop, panics included
struct InFlightGuard<'a> {
    in_flight: &'a AtomicUsize,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}

impl Operation for MockOperation {
    type Request = usize;
    type Output = usize;

    async fn apply(&self, request: &usize) -> Result<usize, ContractError> {
        let _guard = self.enter();

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.panic_indices.contains(request) {
            panic!("mock operation told to panic at index {request}");
        }

        if self.fail_indices.contains(request) {
            return Err(ContractError::network(
                format!("request-{request}"),
                "simulated failure",
            ));
        }

        Ok(*request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_success_echoes_index() {
        let op = MockOperation::new(Duration::ZERO);
        assert_eq!(op.apply(&3).await.unwrap(), 3);
        assert_eq!(op.calls(), 1);
        assert_eq!(op.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_mock_failure_indices() {
        let op = MockOperation::failing_at(Duration::ZERO, [1]);
        assert!(op.apply(&0).await.is_ok());
        let err = op.apply(&1).await.unwrap_err();
        assert!(matches!(err, ContractError::Network { .. }));
        assert_eq!(op.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_mock_tracks_peak() {
        use std::sync::Arc;

        let op = Arc::new(MockOperation::new(Duration::from_millis(20)));
        let mut handles = Vec::new();
        for i in 0..3 {
            let op = Arc::clone(&op);
            handles.push(tokio::spawn(async move { op.apply(&i).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert!(op.peak_in_flight() >= 2, "peak {}", op.peak_in_flight());
        assert_eq!(op.in_flight(), 0);
    }
}
