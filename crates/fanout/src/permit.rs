//! Counting permit pool gating concurrent executions.
//!
//! Wraps a Tokio semaphore with in-flight and peak gauges. The permit is the
//! only shared mutable resource of a batch; acquire/release pairs must be
//! exception-safe, which the RAII guard guarantees.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Permit pool limiting how many operation bodies run simultaneously
#[derive(Debug)]
pub struct PermitPool {
    /// Semaphore controlling concurrent executions
    semaphore: Arc<Semaphore>,

    /// Maximum permits (for stats/debugging)
    max_permits: usize,

    /// Current number of held permits
    in_flight: AtomicUsize,

    /// Peak held permits observed
    peak_in_flight: AtomicUsize,
}

impl PermitPool {
    /// Creates a pool with the specified number of permits.
    ///
    /// # Panics
    ///
    /// Panics if `max_concurrent` is 0. Callers validate the budget before
    /// constructing a pool; see `ContractError::InvalidBudget`.
    pub fn new(max_concurrent: usize) -> Self {
        assert!(max_concurrent > 0, "max_concurrent must be > 0");

        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_permits: max_concurrent,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Acquires a permit, waiting until one is available.
    ///
    /// The permit is released when the returned guard is dropped.
    pub async fn acquire(&self) -> PermitGuard<'_> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore closed unexpectedly");

        let current = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.update_peak(current);

        PermitGuard {
            _permit: permit,
            in_flight: &self.in_flight,
        }
    }

    /// Tries to acquire a permit without waiting.
    ///
    /// Returns `None` if no permits are available.
    pub fn try_acquire(&self) -> Option<PermitGuard<'_>> {
        let permit = self.semaphore.clone().try_acquire_owned().ok()?;

        let current = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.update_peak(current);

        Some(PermitGuard {
            _permit: permit,
            in_flight: &self.in_flight,
        })
    }

    /// Updates the peak counter if current exceeds it.
    fn update_peak(&self, current: usize) {
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
    }

    /// Returns the pool size.
    pub fn max_concurrent(&self) -> usize {
        self.max_permits
    }

    /// Returns the current number of held permits.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Returns the peak number of held permits observed.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::Relaxed)
    }

    /// Returns the number of available permits.
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// A held execution permit.
///
/// While the guard is alive, it counts against the pool's limit. The permit
/// is released when dropped, on success and failure paths alike.
pub struct PermitGuard<'a> {
    _permit: OwnedSemaphorePermit,
    in_flight: &'a AtomicUsize,
}

impl Drop for PermitGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}
