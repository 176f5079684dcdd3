//! Result type aliases for the OpenNMS client.

use crate::OnmsError;

/// A specialized `Result` type for OpenNMS client operations.
pub type OnmsResult<T> = Result<T, OnmsError>;
