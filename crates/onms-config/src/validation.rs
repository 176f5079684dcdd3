//! Configuration validation.
//!
//! Collects every problem in one pass so a misconfigured client reports all
//! of them at startup instead of one per attempt.

use crate::ClientConfig;
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// Server URL is empty or does not parse.
    InvalidUrl { message: String },
    /// Server URL uses a scheme other than http/https.
    UnsupportedScheme { scheme: String },
    /// Timeout value must be positive.
    NonPositiveTimeout { name: String },
    /// A password was configured without a username.
    PasswordWithoutUsername,
    /// Forced API version is neither 1 nor 2.
    InvalidApiVersion { value: u8 },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl { message } => write!(f, "Invalid server URL: {}", message),
            Self::UnsupportedScheme { scheme } => {
                write!(f, "Unsupported URL scheme '{}' (expected http or https)", scheme)
            }
            Self::NonPositiveTimeout { name } => write!(f, "Timeout '{}' must be positive", name),
            Self::PasswordWithoutUsername => write!(f, "A password is configured but no username"),
            Self::InvalidApiVersion { value } => {
                write!(f, "Invalid API version: {} (must be 1 or 2)", value)
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire client configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &ClientConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_server(config, &mut errors);
        Self::validate_auth(config, &mut errors);
        Self::validate_api(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(config: &ClientConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.server.url.trim().is_empty() {
            errors.push(ConfigValidationError::InvalidUrl {
                message: "URL cannot be empty".to_string(),
            });
        } else {
            match Url::parse(&config.server.url) {
                Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
                    errors.push(ConfigValidationError::UnsupportedScheme {
                        scheme: url.scheme().to_string(),
                    });
                }
                Ok(_) => {}
                Err(e) => errors.push(ConfigValidationError::InvalidUrl {
                    message: e.to_string(),
                }),
            }
        }

        if config.server.timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "timeout_secs".to_string(),
            });
        }
    }

    fn validate_auth(config: &ClientConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.auth.username.is_none() && config.auth.password.is_some() {
            errors.push(ConfigValidationError::PasswordWithoutUsername);
        }
    }

    fn validate_api(config: &ClientConfig, errors: &mut Vec<ConfigValidationError>) {
        if let Some(value) = config.api.version {
            if value != 1 && value != 2 {
                errors.push(ConfigValidationError::InvalidApiVersion { value });
            }
        }
    }
}

/// Formats validation errors for display.
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, error));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config_passes() {
        assert!(ConfigValidator::validate(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_url() {
        let mut config = ClientConfig::default();
        config.server.url = "  ".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ConfigValidationError::InvalidUrl { .. })));
    }

    #[test]
    fn test_unparsable_url() {
        let mut config = ClientConfig::default();
        config.server.url = "not a url".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ConfigValidationError::InvalidUrl { .. })));
    }

    #[test]
    fn test_unsupported_scheme() {
        let mut config = ClientConfig::default();
        config.server.url = "ftp://demo.opennms.org/".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ConfigValidationError::UnsupportedScheme { scheme: "ftp".to_string() }]
        );
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ClientConfig::default();
        config.server.timeout_secs = 0;
        config.auth.password = Some("secret".to_string());
        config.api.version = Some(3);

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ConfigValidationError::PasswordWithoutUsername));
        assert!(errors.contains(&ConfigValidationError::InvalidApiVersion { value: 3 }));
    }

    #[test]
    fn test_format_validation_errors() {
        let output = format_validation_errors(&[ConfigValidationError::PasswordWithoutUsername]);
        assert!(output.starts_with("Configuration validation failed:"));
        assert!(output.contains("1. A password is configured but no username"));
    }
}
