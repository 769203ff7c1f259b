//! HTTP Batch Example
//!
//! Fetches a handful of public endpoints with a bounded concurrency budget
//! and prints one outcome per target, in submission order.
//!
//! Run with: cargo run --bin http_batch

use std::sync::Arc;

use contracts::{BatchConfig, FetchRequest, ServiceConfig};
use fanout::FanOut;
use http_fetch::HttpFetcher;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting HTTP Batch Demo");

    let requests = vec![
        FetchRequest::new("github", "https://api.github.com"),
        FetchRequest::new("httpbin-delay", "https://httpbin.org/delay/1"),
        FetchRequest::new("placeholder", "https://jsonplaceholder.typicode.com/posts/1"),
    ];
    let ids: Vec<String> = requests.iter().map(|r| r.id.clone()).collect();

    let fetcher = Arc::new(HttpFetcher::from_service(&ServiceConfig::default())?);
    let engine = FanOut::new(BatchConfig {
        max_concurrent: 2,
        timeout_secs: Some(15),
    });

    let outcomes = engine.run(requests, fetcher).await?;

    println!("\n=== Outcomes ===");
    for (id, outcome) in ids.iter().zip(outcomes.iter()) {
        match outcome.success() {
            Some(response) => println!(
                "  ✓ {id} (status {}, {} bytes)",
                response.status,
                response.body.len()
            ),
            None => println!("  ✗ {id} - {}", outcome.failure().unwrap()),
        }
    }

    Ok(())
}
