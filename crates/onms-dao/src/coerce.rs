//! Total coercions from loosely-typed wire values.
//!
//! Every function here accepts any JSON value and never fails. A value that
//! is present but unusable comes back as [`Coerced::Malformed`] so callers can
//! decide whether the field matters enough to reject the record.

use chrono::{DateTime, Utc};
use onms_core::{OnmsError, OnmsResult};
use serde_json::Value;
use tracing::warn;

/// Result of coercing a wire value.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced<T> {
    /// The value was null or missing.
    Absent,
    /// The value was converted.
    Value(T),
    /// The value was present but could not be converted; holds the raw text.
    Malformed(String),
}

impl<T> Coerced<T> {
    /// Returns the converted value, discarding the reason it is missing.
    #[must_use]
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Absent | Self::Malformed(_) => None,
        }
    }

    /// Whether the value was null or missing.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Whether the value was present but unusable.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }

    /// Unwraps a field the record cannot do without.
    ///
    /// # Errors
    ///
    /// Returns [`OnmsError::InvalidValue`] when the value is absent or malformed.
    pub fn required(self, field: &'static str) -> OnmsResult<T> {
        match self {
            Self::Value(v) => Ok(v),
            Self::Absent => Err(OnmsError::invalid_value(field, "<missing>")),
            Self::Malformed(raw) => Err(OnmsError::invalid_value(field, raw)),
        }
    }

    /// Unwraps an optional field, logging and dropping malformed values.
    pub fn lenient(self, field: &'static str) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Absent => None,
            Self::Malformed(raw) => {
                warn!(field, value = %raw, "Ignoring malformed value");
                None
            }
        }
    }
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Coerces a number or numeric string to `f64`.
#[must_use]
pub fn to_number(value: Option<&Value>) -> Coerced<f64> {
    match value {
        None | Some(Value::Null) => Coerced::Absent,
        Some(Value::Number(n)) => n
            .as_f64()
            .map_or_else(|| Coerced::Malformed(n.to_string()), Coerced::Value),
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Coerced::Value(n),
            _ => Coerced::Malformed(s.clone()),
        },
        Some(other) => Coerced::Malformed(raw_text(other)),
    }
}

/// Coerces a number or numeric string to an integer; fractional values are
/// malformed.
///
/// Integral strings are parsed directly so ids beyond `f64` precision survive
/// unchanged.
#[must_use]
pub fn to_integer(value: Option<&Value>) -> Coerced<i64> {
    match value {
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return Coerced::Value(i);
            }
        }
        Some(Value::String(s)) => {
            if let Ok(i) = s.trim().parse::<i64>() {
                return Coerced::Value(i);
            }
        }
        _ => {}
    }

    match to_number(value) {
        Coerced::Absent => Coerced::Absent,
        Coerced::Malformed(raw) => Coerced::Malformed(raw),
        Coerced::Value(n) => {
            integral(n).map_or_else(|| Coerced::Malformed(n.to_string()), Coerced::Value)
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn integral(n: f64) -> Option<i64> {
    (n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64).then(|| n as i64)
}

/// Coerces epoch milliseconds (number or numeric string), an RFC 3339
/// string, or the server's `yyyy-MM-ddTHH:mm:ss.SSS±hhmm` form to a UTC
/// timestamp.
#[must_use]
pub fn to_date(value: Option<&Value>) -> Coerced<DateTime<Utc>> {
    match value {
        None | Some(Value::Null) => Coerced::Absent,
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral))
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map_or_else(|| Coerced::Malformed(n.to_string()), Coerced::Value),
        Some(Value::String(s)) => parse_date(s.trim())
            .map_or_else(|| Coerced::Malformed(s.clone()), Coerced::Value),
        Some(other) => Coerced::Malformed(raw_text(other)),
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(millis) = s.parse::<i64>() {
        return DateTime::<Utc>::from_timestamp_millis(millis);
    }
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Returns the JSON type name of a value as reported in shape errors.
#[must_use]
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reads a scalar field as text. Numbers and booleans are stringified;
/// null, arrays and objects yield `None`.
#[must_use]
pub fn to_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
