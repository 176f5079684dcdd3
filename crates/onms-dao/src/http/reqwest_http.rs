//! reqwest-backed [`OnmsHttp`] implementation.

use super::{HttpResponse, OnmsHttp, RequestOptions};
use async_trait::async_trait;
use onms_config::ClientConfig;
use onms_core::{OnmsError, OnmsResult};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP transport for an OpenNMS server.
///
/// Joins relative paths onto the server's base URL and applies basic
/// authentication when credentials are configured.
pub struct ReqwestHttp {
    client: Client,
    base_url: String,
    credentials: Option<(String, Option<String>)>,
}

impl ReqwestHttp {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a transport for `base_url` with default settings.
    pub fn new(base_url: &str) -> OnmsResult<Self> {
        Self::build(base_url, Self::DEFAULT_TIMEOUT)
    }

    /// Creates a transport from client configuration.
    pub fn from_config(config: &ClientConfig) -> OnmsResult<Self> {
        let mut http = Self::build(&config.server.url, config.server.timeout())?;
        if let Some((username, password)) = config.auth.credentials() {
            http = http.with_credentials(username, password);
        }
        Ok(http)
    }

    /// Creates a transport with a preconfigured client.
    pub fn with_client(client: Client, base_url: &str) -> OnmsResult<Self> {
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url)?,
            credentials: None,
        })
    }

    /// Sets basic-auth credentials.
    #[must_use]
    pub fn with_credentials(mut self, username: &str, password: Option<&str>) -> Self {
        self.credentials = Some((username.to_string(), password.map(str::to_string)));
        self
    }

    fn build(base_url: &str, timeout: Duration) -> OnmsResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| OnmsError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Self::with_client(client, base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(base_url: &str) -> OnmsResult<String> {
    Url::parse(base_url).map_err(|e| {
        OnmsError::configuration(format!("Invalid server URL '{}': {}", base_url, e))
    })?;
    Ok(base_url.trim_end_matches('/').to_string())
}

fn query_pairs(options: &RequestOptions) -> Vec<(&str, &str)> {
    options
        .parameters
        .iter()
        .flat_map(|(key, value)| value.values().into_iter().map(move |v| (key.as_str(), v)))
        .collect()
}

#[async_trait]
impl OnmsHttp for ReqwestHttp {
    async fn get(&self, path: &str, options: &RequestOptions) -> OnmsResult<HttpResponse> {
        let url = self.url(path);
        debug!(%url, parameters = options.parameters.len(), "HTTP GET");

        let mut request = self.client.get(&url).query(&query_pairs(options));
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some((username, password)) = &self.credentials {
            request = request.basic_auth(username, password.as_deref());
        }

        let response = request
            .send()
            .await
            .map_err(|e| OnmsError::internal(format!("HTTP error: {}", e)))?;

        handle_response(path, response).await
    }
}

async fn handle_response(path: &str, response: reqwest::Response) -> OnmsResult<HttpResponse> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| OnmsError::internal(format!("HTTP body error: {}", e)))?;

    if !status.is_success() {
        return Err(map_http_error(status, path, &body));
    }

    let data = if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&body)?
    };

    debug!(status = status.as_u16(), "HTTP response decoded");
    Ok(HttpResponse::new(status.as_u16(), data))
}

fn map_http_error(status: StatusCode, path: &str, body: &str) -> OnmsError {
    match status {
        StatusCode::NOT_FOUND => OnmsError::NotFound {
            resource_type: "Resource",
            id: path.to_string(),
        },
        StatusCode::BAD_REQUEST => OnmsError::Validation(body.to_string()),
        StatusCode::UNAUTHORIZED => OnmsError::Unauthorized(body.to_string()),
        StatusCode::FORBIDDEN => OnmsError::Forbidden(body.to_string()),
        _ => OnmsError::Http {
            status: status.as_u16(),
            message: body.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::QueryValue;

    #[test]
    fn test_url_construction() {
        let http = ReqwestHttp::new("http://localhost:8980/opennms").unwrap();
        assert_eq!(http.url("rest/events"), "http://localhost:8980/opennms/rest/events");

        let http_trailing = ReqwestHttp::new("http://localhost:8980/opennms/").unwrap();
        assert_eq!(
            http_trailing.url("/api/v2/events"),
            "http://localhost:8980/opennms/api/v2/events"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(ReqwestHttp::new("not a url"), Err(OnmsError::Configuration(_))));
    }

    #[test]
    fn test_query_pairs_expand_multiple_values() {
        let mut options = RequestOptions::new();
        options.parameters.insert("limit".to_string(), QueryValue::from("10"));
        options.parameters.insert(
            "orderBy".to_string(),
            QueryValue::Multiple(vec!["a".to_string(), "b".to_string()]),
        );

        assert_eq!(
            query_pairs(&options),
            vec![("limit", "10"), ("orderBy", "a"), ("orderBy", "b")]
        );
    }

    #[test]
    fn test_map_http_error() {
        assert!(matches!(
            map_http_error(StatusCode::NOT_FOUND, "rest/events/1", ""),
            OnmsError::NotFound { ref id, .. } if id == "rest/events/1"
        ));
        assert!(matches!(
            map_http_error(StatusCode::UNAUTHORIZED, "p", ""),
            OnmsError::Unauthorized(_)
        ));
        assert!(matches!(
            map_http_error(StatusCode::INTERNAL_SERVER_ERROR, "p", "boom"),
            OnmsError::Http { status: 500, ref message } if message == "boom"
        ));
    }

    #[test]
    fn test_from_config_applies_credentials() {
        let mut config = ClientConfig::default();
        config.auth.username = Some("admin".to_string());
        config.auth.password = Some("admin".to_string());

        let http = ReqwestHttp::from_config(&config).unwrap();
        assert_eq!(http.credentials, Some(("admin".to_string(), Some("admin".to_string()))));
    }
}
