//! Mock Batch Example
//!
//! Demonstrates the fan-out engine without touching the network: five
//! requests, a budget of two, and a deterministic mock operation.
//!
//! Run with: cargo run --bin mock_batch

use std::sync::Arc;
use std::time::{Duration, Instant};

use contracts::BatchConfig;
use fanout::{FanOut, MockOperation};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Mock Batch Demo");

    let engine = FanOut::new(BatchConfig {
        max_concurrent: 2,
        timeout_secs: Some(10),
    });

    // Each operation sleeps 200ms; with a budget of 2 the five requests
    // need three rounds
    let operation = Arc::new(MockOperation::failing_at(Duration::from_millis(200), [3]));

    let started = Instant::now();
    let outcomes = engine.run((0..5).collect(), Arc::clone(&operation)).await?;
    let elapsed = started.elapsed();

    println!("\n=== Outcomes ===");
    for (index, outcome) in outcomes.iter().enumerate() {
        match outcome.failure() {
            None => println!("  ✓ request {index}"),
            Some(failure) => println!("  ✗ request {index} - {failure}"),
        }
    }

    println!("\nElapsed: {:.2}s", elapsed.as_secs_f64());
    println!("Peak in-flight: {}", operation.peak_in_flight());
    println!(
        "Engine counters: {} launched, {} succeeded, {} failed",
        engine.metrics().launched_count(),
        engine.metrics().success_count(),
        engine.metrics().failure_count()
    );

    Ok(())
}
