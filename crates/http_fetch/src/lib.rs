//! # HTTP Fetch
//!
//! Adapter between the fan-out engine and a remote REST service.
//!
//! Responsibilities:
//! - Plan `FetchRequest`s from a `FetchPlan` (base URL join, query params)
//! - Build the shared reqwest client
//! - Execute one GET per request, capturing status and body
//! - Inject the API token at send time, keeping logged URLs credential-free

mod client;
mod fetcher;
mod request;

pub use client::build_client;
pub use fetcher::HttpFetcher;
pub use request::plan_requests;

pub use contracts::{FetchRequest, FetchResponse};
