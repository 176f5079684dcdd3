//! HTTP collaborator boundary.
//!
//! DAOs only ever hand a relative path and [`RequestOptions`] to an
//! [`OnmsHttp`] implementation; base URL, authentication, timeouts and
//! connection reuse belong to the implementation.

mod reqwest_http;

use crate::filter::QueryParameters;
use async_trait::async_trait;
use onms_core::{Interface, OnmsResult};
use serde_json::Value;
use std::collections::BTreeMap;

pub use reqwest_http::ReqwestHttp;

/// Headers and query parameters for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// Request headers.
    pub headers: BTreeMap<String, String>,
    /// Query parameters.
    pub parameters: QueryParameters,
}

impl RequestOptions {
    /// Options asking for JSON with no query constraints.
    #[must_use]
    pub fn new() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        Self {
            headers,
            parameters: QueryParameters::new(),
        }
    }

    /// Replaces the query parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: QueryParameters) -> Self {
        self.parameters = parameters;
        self
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A decoded response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded JSON body; `Value::Null` when the body was empty.
    pub data: Value,
}

impl HttpResponse {
    /// Creates a response.
    #[must_use]
    pub const fn new(status: u16, data: Value) -> Self {
        Self { status, data }
    }

    /// A `200 OK` response carrying `data`.
    #[must_use]
    pub const fn ok(data: Value) -> Self {
        Self::new(200, data)
    }
}

/// Read access to the OpenNMS REST API.
#[async_trait]
pub trait OnmsHttp: Interface + Send + Sync {
    /// Issues a GET for `path` relative to the server's base URL.
    async fn get(&self, path: &str, options: &RequestOptions) -> OnmsResult<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_request_json() {
        let options = RequestOptions::default();
        assert_eq!(options.headers.get("Accept").map(String::as_str), Some("application/json"));
        assert!(options.parameters.is_empty());
    }
}
