//! Fetch data structures exchanged between the planner, the HTTP operation
//! and callers.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::ContractError;

/// One planned HTTP GET
///
/// The url is fully resolved (base URL joined, query parameters appended)
/// but carries no credentials; auth is injected at send time so the request
/// can be logged as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Target identifier (from the plan)
    pub id: String,

    /// Resolved request URL, credential-free
    pub url: String,
}

impl FetchRequest {
    /// Create a request
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}

/// Captured HTTP response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,

    /// Raw response body
    #[serde(with = "serde_body")]
    pub body: Bytes,
}

impl FetchResponse {
    /// Body decoded as UTF-8 text (lossy)
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body parsed as JSON
    ///
    /// # Errors
    /// `ContractError::Decode` when the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self, target: &str) -> Result<T, ContractError> {
        serde_json::from_slice(&self.body).map_err(|e| ContractError::decode(target, e.to_string()))
    }
}

/// Body as text in human-readable formats (JSON reports), raw bytes elsewhere
mod serde_body {
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&String::from_utf8_lossy(bytes))
        } else {
            serializer.serialize_bytes(bytes)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Ok(Bytes::from(s.into_bytes()))
        } else {
            let v = Vec::<u8>::deserialize(deserializer)?;
            Ok(Bytes::from(v))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text() {
        let response = FetchResponse {
            status: 200,
            body: Bytes::from_static(b"hello"),
        };
        assert_eq!(response.text(), "hello");
    }

    #[test]
    fn test_response_json() {
        #[derive(Deserialize, Debug)]
        struct Quote {
            code: String,
        }

        let response = FetchResponse {
            status: 200,
            body: Bytes::from_static(br#"{"code": "AAPL"}"#),
        };
        let quote: Quote = response.json("aapl").unwrap();
        assert_eq!(quote.code, "AAPL");

        let bad = FetchResponse {
            status: 200,
            body: Bytes::from_static(b"<html>"),
        };
        let err = bad.json::<Quote>("aapl").unwrap_err();
        assert!(matches!(err, ContractError::Decode { .. }));
    }
}
