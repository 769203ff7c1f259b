//! Layered error definitions
//!
//! Categorized by source: config / batch / fetch

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Batch Errors =====
    /// Concurrency budget below the minimum of one permit
    #[error("invalid concurrency budget: must be >= 1, got {budget}")]
    InvalidBudget { budget: usize },

    /// Batch deadline elapsed before all outcomes were produced
    #[error("batch timed out after {timeout_ms}ms: {completed}/{total} requests finished")]
    BatchTimeout {
        timeout_ms: u64,
        completed: usize,
        total: usize,
    },

    // ===== Fetch Errors =====
    /// Transport-level failure reaching the remote service
    #[error("network error for '{target}': {message}")]
    Network { target: String, message: String },

    /// Remote service answered with a non-success status
    #[error("unexpected status {status} for '{target}'")]
    Status { target: String, status: u16 },

    /// Response body could not be decoded
    #[error("decode error for '{target}': {message}")]
    Decode { target: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create network error
    pub fn network(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create decode error
    pub fn decode(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            target: target.into(),
            message: message.into(),
        }
    }
}
