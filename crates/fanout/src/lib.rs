//! # Fanout
//!
//! Bounded concurrent fan-out engine.
//!
//! Responsibilities:
//! - Apply one operation to N requests concurrently
//! - Bound simultaneous executions with a counting permit pool
//! - Collect all outcomes (successes and captured failures) in input order
//! - Enforce an optional deadline over the whole batch

pub mod engine;
pub mod metrics;
pub mod mock;
pub mod permit;

pub use contracts::{BatchConfig, Operation, Outcome};
pub use engine::{run_bounded, FanOut};
pub use metrics::{FanOutMetrics, MetricsSnapshot};
pub use mock::MockOperation;
pub use permit::{PermitGuard, PermitPool};
