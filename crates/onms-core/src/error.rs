//! Unified error type for the OpenNMS client.

use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for every layer of the OpenNMS client.
///
/// Errors fall into four families: transport failures reported by the HTTP
/// collaborator, shape errors when a response body does not have the
/// expected structure, value errors when a field carries an unknown or
/// malformed value, and not-found when a single-record fetch yields nothing.
#[derive(Error, Debug)]
pub enum OnmsError {
    // ============ Data Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Response body did not have the expected structure
    #[error("Expected {expected} but got \"{actual}\" instead")]
    Shape {
        expected: &'static str,
        actual: String,
    },

    /// A field carried a value outside its known domain
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    /// Configuration error (includes filters the server cannot express)
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Transport Errors ============
    /// Non-success HTTP status reported by the server
    #[error("Error {status}: {message}")]
    Http { status: u16, message: String },

    /// Request was rejected for missing or bad credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Request was rejected for insufficient permissions
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Server rejected the request as invalid
    #[error("Validation error: {0}")]
    Validation(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OnmsError {
    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a shape error naming the wire type actually encountered.
    #[must_use]
    pub fn shape<T: Into<String>>(expected: &'static str, actual: T) -> Self {
        Self::Shape {
            expected,
            actual: actual.into(),
        }
    }

    /// Creates a value error for an unrecognized or malformed field value.
    #[must_use]
    pub fn invalid_value<T: Into<String>>(field: &'static str, value: T) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }
}

impl From<serde_json::Error> for OnmsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = OnmsError::Http { status: 404, message: "blah".to_string() };
        assert_eq!(err.to_string(), "Error 404: blah");
    }

    #[test]
    fn test_shape_error_names_actual_type() {
        let err = OnmsError::shape("an array of events", "string");
        assert_eq!(err.to_string(), "Expected an array of events but got \"string\" instead");
    }

    #[test]
    fn test_invalid_value_names_label() {
        let err = OnmsError::invalid_value("severity", "BOGUS");
        assert!(err.to_string().contains("BOGUS"));
        assert!(err.to_string().contains("severity"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err: OnmsError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, OnmsError::Internal(ref msg) if msg.starts_with("JSON error")));
    }
}
