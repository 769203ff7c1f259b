//! Plan validation
//!
//! Rules:
//! - target id unique and non-empty
//! - target url non-empty; relative urls require service.base_url
//! - batch.max_concurrent >= 1
//! - batch.timeout_secs > 0 when present
//! - auth.token_env non-empty when auth is configured

use std::collections::HashSet;

use contracts::{ContractError, FetchPlan};

/// Validate a FetchPlan
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(plan: &FetchPlan) -> Result<(), ContractError> {
    validate_targets(plan)?;
    validate_batch(plan)?;
    validate_auth(plan)?;
    Ok(())
}

/// Validate target ids and urls
fn validate_targets(plan: &FetchPlan) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, target) in plan.targets.iter().enumerate() {
        if target.id.is_empty() {
            return Err(ContractError::config_validation(
                format!("targets[{idx}].id"),
                "target id cannot be empty",
            ));
        }
        if !seen.insert(&target.id) {
            return Err(ContractError::config_validation(
                format!("targets[id={}]", target.id),
                "duplicate target id",
            ));
        }
        if target.url.is_empty() {
            return Err(ContractError::config_validation(
                format!("targets[{}].url", target.id),
                "target url cannot be empty",
            ));
        }
        if !target.url.starts_with("http") && plan.service.base_url.is_none() {
            return Err(ContractError::config_validation(
                format!("targets[{}].url", target.id),
                "relative url requires service.base_url",
            ));
        }
    }
    Ok(())
}

/// Validate batch settings
fn validate_batch(plan: &FetchPlan) -> Result<(), ContractError> {
    if plan.batch.max_concurrent < 1 {
        return Err(ContractError::config_validation(
            "batch.max_concurrent",
            format!(
                "max_concurrent must be >= 1, got {}",
                plan.batch.max_concurrent
            ),
        ));
    }

    if plan.batch.timeout_secs == Some(0) {
        return Err(ContractError::config_validation(
            "batch.timeout_secs",
            "timeout_secs must be > 0 when set (omit it for no deadline)",
        ));
    }

    Ok(())
}

/// Validate auth settings
fn validate_auth(plan: &FetchPlan) -> Result<(), ContractError> {
    if let Some(ref auth) = plan.service.auth {
        if auth.token_env.is_empty() {
            return Err(ContractError::config_validation(
                "service.auth.token_env",
                "token_env cannot be empty",
            ));
        }
        if auth.query_param.is_empty() {
            return Err(ContractError::config_validation(
                "service.auth.query_param",
                "query_param cannot be empty",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{AuthConfig, BatchConfig, ConfigVersion, ServiceConfig, TargetConfig};

    fn minimal_plan() -> FetchPlan {
        FetchPlan {
            version: ConfigVersion::V1,
            service: ServiceConfig {
                base_url: Some("https://eodhd.com/api".into()),
                ..Default::default()
            },
            batch: BatchConfig::default(),
            targets: vec![
                TargetConfig {
                    id: "aapl".into(),
                    url: "/fundamentals/AAPL.US".into(),
                    params: Default::default(),
                },
                TargetConfig {
                    id: "msft".into(),
                    url: "/fundamentals/MSFT.US".into(),
                    params: Default::default(),
                },
            ],
        }
    }

    #[test]
    fn test_valid_plan() {
        let plan = minimal_plan();
        assert!(validate(&plan).is_ok());
    }

    #[test]
    fn test_duplicate_target_id() {
        let mut plan = minimal_plan();
        plan.targets.push(plan.targets[0].clone());
        let result = validate(&plan);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("duplicate target id"), "got: {err}");
    }

    #[test]
    fn test_empty_target_id() {
        let mut plan = minimal_plan();
        plan.targets[1].id = String::new();
        let result = validate(&plan);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("cannot be empty"), "got: {err}");
    }

    #[test]
    fn test_relative_url_without_base() {
        let mut plan = minimal_plan();
        plan.service.base_url = None;
        let result = validate(&plan);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("requires service.base_url"), "got: {err}");
    }

    #[test]
    fn test_zero_budget() {
        let mut plan = minimal_plan();
        plan.batch.max_concurrent = 0;
        let result = validate(&plan);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("max_concurrent must be >= 1"), "got: {err}");
    }

    #[test]
    fn test_zero_timeout() {
        let mut plan = minimal_plan();
        plan.batch.timeout_secs = Some(0);
        let result = validate(&plan);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("timeout_secs"), "got: {err}");
    }

    #[test]
    fn test_empty_token_env() {
        let mut plan = minimal_plan();
        plan.service.auth = Some(AuthConfig {
            token_env: String::new(),
            ..Default::default()
        });
        let result = validate(&plan);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("token_env"), "got: {err}");
    }
}
