//! Shared HTTP client construction

use std::time::Duration;

use contracts::{ContractError, ServiceConfig};

/// Build the reqwest client shared by all requests of a batch
///
/// Connection-level knobs only; per-batch timing is owned by the engine's
/// deadline, not the client.
pub fn build_client(service: &ServiceConfig) -> Result<reqwest::Client, ContractError> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(service.connect_timeout_secs))
        .user_agent(service.user_agent.clone())
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .build()
        .map_err(|e| ContractError::Other(format!("failed to build http client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client_defaults() {
        let service = ServiceConfig::default();
        assert!(build_client(&service).is_ok());
    }
}
