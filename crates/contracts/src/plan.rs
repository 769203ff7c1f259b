//! FetchPlan - Config Loader output
//!
//! Describes a complete fetch job: remote service, batch settings, targets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::BatchConfig;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete fetch job blueprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchPlan {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Remote service settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Concurrency budget and batch deadline
    #[serde(default)]
    pub batch: BatchConfig,

    /// Fetch targets, in submission order
    pub targets: Vec<TargetConfig>,
}

/// Remote service settings: base URL, client knobs, auth
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL that relative target urls are joined onto
    #[serde(default)]
    pub base_url: Option<String>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Connection establishment timeout (seconds)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// API token authentication (optional)
    #[serde(default)]
    pub auth: Option<AuthConfig>,
}

fn default_user_agent() -> String {
    format!("batch-fetcher/{}", env!("CARGO_PKG_VERSION"))
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            user_agent: default_user_agent(),
            connect_timeout_secs: default_connect_timeout_secs(),
            auth: None,
        }
    }
}

/// API token authentication settings
///
/// The token itself never appears in the plan file; it is read from the
/// named environment variable at client build time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable holding the token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Query parameter the token is sent as
    #[serde(default = "default_query_param")]
    pub query_param: String,
}

fn default_token_env() -> String {
    "EODHD_API_TOKEN".to_string()
}

fn default_query_param() -> String {
    "api_token".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
            query_param: default_query_param(),
        }
    }
}

/// One fetch target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Unique identifier (used in logs, metrics and reports)
    pub id: String,

    /// Absolute URL, or a path joined onto `service.base_url`
    pub url: String,

    /// Extra query parameters (ordered for stable URLs)
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_toml_minimal() {
        let content = r#"
[[targets]]
id = "github"
url = "https://api.github.com"
"#;
        let plan: FetchPlan = toml::from_str(content).unwrap();
        assert_eq!(plan.version, ConfigVersion::V1);
        assert_eq!(plan.targets.len(), 1);
        assert_eq!(plan.batch.max_concurrent, 5);
        assert!(plan.service.auth.is_none());
    }

    #[test]
    fn test_plan_toml_full() {
        let content = r#"
[service]
base_url = "https://eodhd.com/api"
connect_timeout_secs = 5

[service.auth]
token_env = "EODHD_API_TOKEN"

[batch]
max_concurrent = 3
timeout_secs = 60

[[targets]]
id = "aapl"
url = "/fundamentals/AAPL.US"
[targets.params]
fmt = "json"

[[targets]]
id = "msft"
url = "/fundamentals/MSFT.US"
"#;
        let plan: FetchPlan = toml::from_str(content).unwrap();
        assert_eq!(plan.service.base_url.as_deref(), Some("https://eodhd.com/api"));
        assert_eq!(plan.batch.max_concurrent, 3);
        assert_eq!(plan.targets[0].params.get("fmt").unwrap(), "json");
        let auth = plan.service.auth.unwrap();
        assert_eq!(auth.token_env, "EODHD_API_TOKEN");
        assert_eq!(auth.query_param, "api_token");
    }
}
