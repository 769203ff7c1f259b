//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Plan info for JSON output
#[derive(Serialize)]
struct PlanInfo {
    version: String,
    service: ServiceInfo,
    batch: BatchInfo,
    target_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    targets: Vec<TargetInfo>,
}

#[derive(Serialize)]
struct ServiceInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    user_agent: String,
    connect_timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth_token_env: Option<String>,
}

#[derive(Serialize)]
struct BatchInfo {
    max_concurrent: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
}

#[derive(Serialize)]
struct TargetInfo {
    id: String,
    url: String,
    #[serde(skip_serializing_if = "std::collections::BTreeMap::is_empty")]
    params: std::collections::BTreeMap<String, String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(plan = %args.plan.display(), "Reading plan");

    if !args.plan.exists() {
        anyhow::bail!("Plan file not found: {}", args.plan.display());
    }

    let plan = config_loader::ConfigLoader::load_from_path(&args.plan)
        .with_context(|| format!("Failed to load plan from {}", args.plan.display()))?;

    let plan_info = PlanInfo {
        version: format!("{:?}", plan.version),
        service: ServiceInfo {
            base_url: plan.service.base_url.clone(),
            user_agent: plan.service.user_agent.clone(),
            connect_timeout_secs: plan.service.connect_timeout_secs,
            auth_token_env: plan.service.auth.as_ref().map(|a| a.token_env.clone()),
        },
        batch: BatchInfo {
            max_concurrent: plan.batch.max_concurrent,
            timeout_secs: plan.batch.timeout_secs,
        },
        target_count: plan.targets.len(),
        targets: if args.targets {
            plan.targets
                .iter()
                .map(|t| TargetInfo {
                    id: t.id.clone(),
                    url: t.url.clone(),
                    params: t.params.clone(),
                })
                .collect()
        } else {
            Vec::new()
        },
    };

    if args.json {
        let json =
            serde_json::to_string_pretty(&plan_info).context("Failed to serialize plan info")?;
        println!("{}", json);
    } else {
        print_plan_info(&plan_info);
    }

    Ok(())
}

fn print_plan_info(info: &PlanInfo) {
    println!("\n=== Plan Info ===\n");
    println!("Version: {}", info.version);

    println!("\nService:");
    println!(
        "  Base URL: {}",
        info.service.base_url.as_deref().unwrap_or("(none)")
    );
    println!("  User-Agent: {}", info.service.user_agent);
    println!(
        "  Connect timeout: {}s",
        info.service.connect_timeout_secs
    );
    println!(
        "  Auth token env: {}",
        info.service.auth_token_env.as_deref().unwrap_or("(none)")
    );

    println!("\nBatch:");
    println!("  Concurrency budget: {}", info.batch.max_concurrent);
    match info.batch.timeout_secs {
        Some(secs) => println!("  Deadline: {}s", secs),
        None => println!("  Deadline: none"),
    }

    println!("\nTargets: {}", info.target_count);
    for target in &info.targets {
        println!("  - {} -> {}", target.id, target.url);
        for (key, value) in &target.params {
            println!("      {} = {}", key, value);
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_info_on_valid_plan() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(
            br#"
[[targets]]
id = "github"
url = "https://api.github.com"
"#,
        )
        .unwrap();

        let args = InfoArgs {
            plan: file.path().to_path_buf(),
            json: true,
            targets: true,
        };
        assert!(run_info(&args).is_ok());
    }

    #[test]
    fn test_info_missing_file() {
        let args = InfoArgs {
            plan: "does-not-exist.toml".into(),
            json: false,
            targets: false,
        };
        assert!(run_info(&args).is_err());
    }
}
