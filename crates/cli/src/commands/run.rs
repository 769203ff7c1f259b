//! `run` command implementation.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::runner::{FetchStats, Runner, RunnerConfig};

/// Execute the `run` command
pub async fn run_fetch(args: &RunArgs) -> Result<()> {
    info!(plan = %args.plan.display(), "Loading plan");

    // Validate plan path
    if !args.plan.exists() {
        anyhow::bail!("Plan file not found: {}", args.plan.display());
    }

    // Load and parse the plan
    let mut plan = config_loader::ConfigLoader::load_from_path(&args.plan)
        .with_context(|| format!("Failed to load plan from {}", args.plan.display()))?;

    // Apply CLI overrides
    if let Some(max_concurrent) = args.max_concurrent {
        info!(max_concurrent, "Overriding concurrency budget from CLI");
        plan.batch.max_concurrent = max_concurrent;
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            info!("Disabling batch deadline from CLI");
            plan.batch.timeout_secs = None;
        } else {
            info!(timeout, "Overriding batch deadline from CLI");
            plan.batch.timeout_secs = Some(timeout);
        }
    }

    info!(
        targets = plan.targets.len(),
        budget = plan.batch.max_concurrent,
        timeout_secs = ?plan.batch.timeout_secs,
        "Plan loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - plan is valid, exiting");
        print_plan_summary(&plan);
        return Ok(());
    }

    // Build runner configuration
    let runner_config = RunnerConfig {
        plan,
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    let runner = Runner::new(runner_config);

    // Setup graceful shutdown handler
    let shutdown_signal = setup_shutdown_signal();

    info!("Starting fetch...");

    // Run with shutdown signal
    tokio::select! {
        result = runner.run() => {
            match result {
                Ok(stats) => {
                    info!(
                        succeeded = stats.succeeded,
                        failed = stats.failed,
                        duration_secs = stats.duration.as_secs_f64(),
                        throughput = format!("{:.2}", stats.throughput()),
                        "Fetch completed"
                    );

                    stats.print_summary();

                    if let Some(ref path) = args.output {
                        write_outcomes(&stats, path)?;
                    }
                }
                Err(e) => {
                    return Err(e).context("Fetch execution failed");
                }
            }
        }
        _ = shutdown_signal => {
            warn!("Received shutdown signal, stopping fetch...");
        }
    }

    info!("Batch Fetcher finished");
    Ok(())
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Write per-target outcomes as JSON
fn write_outcomes(stats: &FetchStats, path: &std::path::Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&stats.results)
        .context("Failed to serialize outcomes")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write outcomes to {}", path.display()))?;
    info!(path = %path.display(), targets = stats.results.len(), "Outcomes written");
    Ok(())
}

/// Print plan summary for dry-run mode
fn print_plan_summary(plan: &contracts::FetchPlan) {
    println!("\n=== Plan Summary ===\n");
    println!("Service:");
    println!(
        "  Base URL: {}",
        plan.service.base_url.as_deref().unwrap_or("(none)")
    );
    println!(
        "  Auth: {}",
        plan.service
            .auth
            .as_ref()
            .map(|a| a.token_env.as_str())
            .unwrap_or("(none)")
    );

    println!("\nBatch:");
    println!("  Concurrency budget: {}", plan.batch.max_concurrent);
    match plan.batch.timeout_secs {
        Some(secs) => println!("  Deadline: {}s", secs),
        None => println!("  Deadline: none"),
    }

    println!("\nTargets ({}):", plan.targets.len());
    for target in &plan.targets {
        println!("  - {} -> {}", target.id, target.url);
    }

    println!();
}
