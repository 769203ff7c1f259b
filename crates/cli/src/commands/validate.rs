//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    plan_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<PlanSummary>,
}

#[derive(Serialize)]
struct PlanSummary {
    version: String,
    base_url: Option<String>,
    target_count: usize,
    max_concurrent: usize,
    timeout_secs: Option<u64>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(plan = %args.plan.display(), "Validating plan");

    let result = validate_plan(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Plan validation failed")
    }
}

fn validate_plan(args: &ValidateArgs) -> ValidationResult {
    let plan_path = args.plan.display().to_string();

    // Check file exists
    if !args.plan.exists() {
        return ValidationResult {
            valid: false,
            plan_path,
            error: Some(format!("File not found: {}", args.plan.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.plan) {
        Ok(plan) => {
            let warnings = collect_warnings(&plan);

            ValidationResult {
                valid: true,
                plan_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(PlanSummary {
                    version: format!("{:?}", plan.version),
                    base_url: plan.service.base_url.clone(),
                    target_count: plan.targets.len(),
                    max_concurrent: plan.batch.max_concurrent,
                    timeout_secs: plan.batch.timeout_secs,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            plan_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect plan warnings (non-fatal issues)
fn collect_warnings(plan: &contracts::FetchPlan) -> Vec<String> {
    let mut warnings = Vec::new();

    // Check for empty targets
    if plan.targets.is_empty() {
        warnings.push("No targets configured - nothing will be fetched".to_string());
    }

    // Budget larger than the plan degenerates to unbounded fan-out
    if plan.batch.max_concurrent > plan.targets.len() && !plan.targets.is_empty() {
        warnings.push(format!(
            "Concurrency budget ({}) exceeds target count ({}) - effectively unbounded",
            plan.batch.max_concurrent,
            plan.targets.len()
        ));
    }

    // Check deadline
    if plan.batch.timeout_secs.is_none() {
        warnings.push("No batch deadline configured - a stuck request blocks the run".to_string());
    }

    // Check auth
    if plan.service.auth.is_none() {
        warnings.push("No auth configured - requests will be unauthenticated".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Plan is valid: {}", result.plan_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!(
                "  Base URL: {}",
                summary.base_url.as_deref().unwrap_or("(none)")
            );
            println!("  Targets: {}", summary.target_count);
            println!("  Concurrency budget: {}", summary.max_concurrent);
            match summary.timeout_secs {
                Some(secs) => println!("  Deadline: {}s", secs),
                None => println!("  Deadline: none"),
            }
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Plan is invalid: {}", result.plan_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
