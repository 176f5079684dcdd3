//! Client configuration structures.

use onms_core::telemetry::TelemetryConfig;
use onms_core::{ApiVersion, ServerMetadata, ServerType};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server connection settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Credentials.
    #[serde(default)]
    pub auth: AuthConfig,

    /// API generation settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: TelemetryConfig,
}

impl ClientConfig {
    /// Builds the server metadata collaborator from the API settings.
    ///
    /// An explicit `api.version` wins; otherwise the version is derived from
    /// `api.server_version`. With neither set the legacy API is assumed.
    #[must_use]
    pub fn server_metadata(&self) -> ServerMetadata {
        match (self.api.version, &self.api.server_version) {
            (Some(version), _) => {
                ServerMetadata::with_api_version(ApiVersion::from_number(version))
            }
            (None, Some(server_version)) => {
                ServerMetadata::new(server_version.clone(), self.api.server_type)
            }
            (None, None) => ServerMetadata::with_api_version(ApiVersion::V1),
        }
    }
}

/// Server connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Display name of the server.
    pub name: String,
    /// Base URL of the OpenNMS web application.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "OpenNMS".to_string(),
            url: "http://localhost:8980/opennms/".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Returns the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Basic-auth credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Username.
    #[serde(default)]
    pub username: Option<String>,
    /// Password.
    #[serde(default)]
    pub password: Option<String>,
}

impl AuthConfig {
    /// Returns `(username, password)` when a username is configured.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, Option<&str>)> {
        self.username
            .as_deref()
            .map(|user| (user, self.password.as_deref()))
    }
}

/// API generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Force a specific API version (1 or 2).
    #[serde(default)]
    pub version: Option<u8>,
    /// Server version string used to derive the API version.
    #[serde(default)]
    pub server_version: Option<String>,
    /// Server product flavor.
    #[serde(default)]
    pub server_type: ServerType,
}

#[cfg(test)]
mod tests {
    use super::*;
    use onms_core::ServerMetadataSource;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.server.url, "http://localhost:8980/opennms/");
        assert_eq!(config.server.timeout(), Duration::from_secs(30));
        assert!(config.auth.credentials().is_none());
    }

    #[test]
    fn test_server_metadata_forced_version() {
        let mut config = ClientConfig::default();
        config.api.version = Some(2);
        config.api.server_version = Some("19.0.0".to_string());
        assert_eq!(config.server_metadata().api_version(), ApiVersion::V2);
    }

    #[test]
    fn test_server_metadata_derived_from_server_version() {
        let mut config = ClientConfig::default();
        config.api.server_version = Some("2018.1.2".to_string());
        config.api.server_type = ServerType::Meridian;
        assert_eq!(config.server_metadata().api_version(), ApiVersion::V2);
    }

    #[test]
    fn test_server_metadata_defaults_to_v1() {
        assert_eq!(ClientConfig::default().server_metadata().api_version(), ApiVersion::V1);
    }

    #[test]
    fn test_credentials() {
        let auth = AuthConfig {
            username: Some("admin".to_string()),
            password: Some("admin".to_string()),
        };
        assert_eq!(auth.credentials(), Some(("admin", Some("admin"))));
    }
}
