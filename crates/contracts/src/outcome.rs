//! Per-request outcome: a success value or a captured failure.
//!
//! One outcome per request, same cardinality and order as the input.
//! Failures are recorded, never propagated as batch errors.

use serde::{Deserialize, Serialize};

use crate::ContractError;

/// Result of one request within a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome<T> {
    /// The operation produced a value
    Success(T),
    /// The operation failed; the error is captured, not propagated
    Failure(Failure),
}

impl<T> Outcome<T> {
    /// True if this outcome carries a success value
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// True if this outcome carries a captured failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// Success value, if any
    pub fn success(&self) -> Option<&T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    /// Captured failure, if any
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(failure) => Some(failure),
        }
    }

    /// Consume the outcome, returning the success value if any
    pub fn into_success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }
}

/// A captured per-request failure: error kind plus message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Failure {
    /// Failure category (used for metric labels and reporting)
    pub kind: FailureKind,
    /// Human-readable description
    pub message: String,
}

impl Failure {
    /// Create a failure record
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<ContractError> for Failure {
    fn from(err: ContractError) -> Self {
        let kind = match &err {
            ContractError::Network { .. } => FailureKind::Network,
            ContractError::Status { .. } => FailureKind::Status,
            ContractError::Decode { .. } => FailureKind::Decode,
            _ => FailureKind::Other,
        };
        Self::new(kind, err.to_string())
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind.as_str(), self.message)
    }
}

/// Failure category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Transport-level error (connect, DNS, TLS, read)
    Network,
    /// Non-success HTTP status
    Status,
    /// Response body decoding failed
    Decode,
    /// The operation was cancelled before completing
    Cancelled,
    /// Anything else, including operation panics
    Other,
}

impl FailureKind {
    /// Stable label for metrics and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Network => "network",
            FailureKind::Status => "status",
            FailureKind::Decode => "decode",
            FailureKind::Cancelled => "cancelled",
            FailureKind::Other => "other",
        }
    }
}
