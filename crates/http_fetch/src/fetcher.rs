//! HttpFetcher - the fetch operation handed to the fan-out engine

use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{debug, instrument};

use contracts::{ContractError, FetchRequest, FetchResponse, Operation, ServiceConfig};

use crate::client::build_client;

/// Fetch operation backed by a shared reqwest client
///
/// One GET per request. Non-success statuses and transport errors are
/// returned as per-request errors; the engine records them as failures
/// without touching sibling requests.
pub struct HttpFetcher {
    client: reqwest::Client,
    auth: Option<AuthToken>,
}

/// Resolved credential, appended to the URL at send time only
struct AuthToken {
    query_param: String,
    token: String,
}

impl HttpFetcher {
    /// Build a fetcher from service settings
    ///
    /// When auth is configured, the token is read from the environment
    /// variable named in the plan.
    ///
    /// # Errors
    /// - Client construction failure
    /// - Auth configured but the token variable is unset or empty
    pub fn from_service(service: &ServiceConfig) -> Result<Self, ContractError> {
        let client = build_client(service)?;

        let auth = match &service.auth {
            Some(auth) => {
                let token = std::env::var(&auth.token_env).ok().filter(|t| !t.is_empty());
                let token = token.ok_or_else(|| {
                    ContractError::config_validation(
                        "service.auth.token_env",
                        format!("environment variable '{}' is not set", auth.token_env),
                    )
                })?;
                Some(AuthToken {
                    query_param: auth.query_param.clone(),
                    token,
                })
            }
            None => None,
        };

        Ok(Self { client, auth })
    }

    /// Token with all but the last six characters hidden, for log output
    pub fn masked_token(&self) -> Option<String> {
        self.auth.as_ref().map(|auth| {
            if auth.token.len() > 6 {
                format!("{}{}", "*".repeat(10), &auth.token[auth.token.len() - 6..])
            } else {
                "****".to_string()
            }
        })
    }
}

impl Operation for HttpFetcher {
    type Request = FetchRequest;
    type Output = FetchResponse;

    #[instrument(
        name = "http_fetch",
        skip(self, request),
        fields(target_id = %request.id, url = %request.url)
    )]
    async fn apply(&self, request: &FetchRequest) -> Result<FetchResponse, ContractError> {
        let mut url = reqwest::Url::parse(&request.url)
            .map_err(|e| ContractError::network(&request.id, format!("invalid url: {e}")))?;

        if let Some(ref auth) = self.auth {
            url.query_pairs_mut()
                .append_pair(&auth.query_param, &auth.token);
        }

        let started = Instant::now();

        let response = self.client.get(url).send().await.map_err(|e| {
            counter!("batch_fetcher_fetches_total", "result" => "network").increment(1);
            ContractError::network(&request.id, e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            counter!("batch_fetcher_fetches_total", "result" => "status").increment(1);
            return Err(ContractError::Status {
                target: request.id.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            counter!("batch_fetcher_fetches_total", "result" => "network").increment(1);
            ContractError::network(&request.id, e.to_string())
        })?;

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        counter!("batch_fetcher_fetches_total", "result" => "success").increment(1);
        histogram!("batch_fetcher_fetch_duration_ms").record(elapsed_ms);

        debug!(
            target_id = %request.id,
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms,
            "Fetch complete"
        );

        Ok(FetchResponse {
            status: status.as_u16(),
            body,
        })
    }
}
