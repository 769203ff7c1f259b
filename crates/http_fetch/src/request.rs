//! Request planning: plan targets -> resolved `FetchRequest`s

use contracts::{ContractError, FetchPlan, FetchRequest, TargetConfig};

/// Resolve every plan target into a `FetchRequest`, preserving plan order
///
/// # Errors
/// `ContractError::ConfigValidation` for unparseable URLs. Relative target
/// urls require `service.base_url` (enforced by the plan validator; checked
/// again here for callers constructing plans by hand).
pub fn plan_requests(plan: &FetchPlan) -> Result<Vec<FetchRequest>, ContractError> {
    plan.targets
        .iter()
        .map(|target| resolve_target(target, plan.service.base_url.as_deref()))
        .collect()
}

fn resolve_target(
    target: &TargetConfig,
    base_url: Option<&str>,
) -> Result<FetchRequest, ContractError> {
    let resolved = if target.url.starts_with("http") {
        target.url.clone()
    } else {
        let base = base_url.ok_or_else(|| {
            ContractError::config_validation(
                format!("targets[{}].url", target.id),
                "relative url requires service.base_url",
            )
        })?;
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            target.url.trim_start_matches('/')
        )
    };

    let mut url = reqwest::Url::parse(&resolved).map_err(|e| {
        ContractError::config_validation(
            format!("targets[{}].url", target.id),
            format!("invalid url '{resolved}': {e}"),
        )
    })?;

    for (key, value) in &target.params {
        url.query_pairs_mut().append_pair(key, value);
    }

    Ok(FetchRequest::new(&target.id, url.as_str()))
}
