//! Payload shape normalization.
//!
//! The legacy API serializes a one-element collection as a bare object and
//! sometimes nests a collection one level under a singular wrapper key
//! (`{"parameter": [...]}`). Every collection, top-level or nested, goes
//! through [`RecordShape`] before any record is mapped.

use crate::coerce::json_type_name;
use onms_core::{OnmsError, OnmsResult};
use serde_json::Value;

/// Describes where a collection's records live and how to recognize one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordShape {
    /// Collection key in a response body, or wrapper key of a nested collection.
    pub key: &'static str,
    /// Key every record carries (e.g. `id`, `name`).
    pub identity_key: &'static str,
    /// Human description used in shape errors (e.g. `an array of events`).
    pub expected: &'static str,
}

impl RecordShape {
    /// Creates a record shape.
    #[must_use]
    pub const fn new(
        key: &'static str,
        identity_key: &'static str,
        expected: &'static str,
    ) -> Self {
        Self {
            key,
            identity_key,
            expected,
        }
    }

    /// Normalizes a nested collection that may be wrapped or bare, and a
    /// single record or an array of them.
    ///
    /// # Errors
    ///
    /// Returns a shape error naming the JSON type when the value is neither
    /// an array nor a recognizable record.
    pub fn normalize<'a>(&self, value: &'a Value) -> OnmsResult<Vec<&'a Value>> {
        self.to_sequence(unwrap_key(value, self.key))
    }

    /// Turns an already-unwrapped value into a sequence of records.
    ///
    /// # Errors
    ///
    /// Returns a shape error naming the JSON type when the value is neither
    /// an array nor an object carrying a non-null identity key.
    pub fn to_sequence<'a>(&self, value: &'a Value) -> OnmsResult<Vec<&'a Value>> {
        match value {
            Value::Array(items) => Ok(items.iter().collect()),
            Value::Object(map) if map.get(self.identity_key).is_some_and(|id| !id.is_null()) => {
                Ok(vec![value])
            }
            other => Err(OnmsError::shape(self.expected, json_type_name(other))),
        }
    }
}

/// Removes one level of wrapping when `value` is an object holding a
/// non-null `key`; otherwise returns `value` unchanged.
#[must_use]
pub fn unwrap_key<'a>(value: &'a Value, key: &str) -> &'a Value {
    match value.get(key) {
        Some(inner) if value.is_object() && !inner.is_null() => inner,
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PARAMS: RecordShape = RecordShape::new("parameter", "name", "an array of parameters");

    #[test]
    fn test_array_passes_through_in_order() {
        let value = json!([{"name": "a"}, {"name": "b"}]);
        let records = PARAMS.to_sequence(&value).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "a");
        assert_eq!(records[1]["name"], "b");
    }

    #[test]
    fn test_single_record_becomes_one_element() {
        let value = json!({"name": "a", "value": "1"});
        let records = PARAMS.to_sequence(&value).unwrap();
        assert_eq!(records, vec![&value]);
    }

    #[test]
    fn test_object_without_identity_is_shape_error() {
        let value = json!({"other": 1});
        let err = PARAMS.to_sequence(&value).unwrap_err();
        assert!(matches!(err, OnmsError::Shape { ref actual, .. } if actual == "object"));
    }

    #[test]
    fn test_object_with_null_identity_is_shape_error() {
        let value = json!({"name": null, "value": "1"});
        let err = PARAMS.to_sequence(&value).unwrap_err();
        assert!(matches!(err, OnmsError::Shape { ref actual, .. } if actual == "object"));
    }

    #[test]
    fn test_scalar_is_shape_error_naming_type() {
        for (value, name) in [(json!("x"), "string"), (json!(3), "number"), (json!(null), "null")] {
            let err = PARAMS.to_sequence(&value).unwrap_err();
            assert!(matches!(err, OnmsError::Shape { ref actual, .. } if actual == name));
        }
    }

    #[test]
    fn test_wrapped_and_bare_normalize_identically() {
        let bare = json!([{"name": "a"}, {"name": "b"}]);
        let wrapped = json!({"parameter": [{"name": "a"}, {"name": "b"}]});
        assert_eq!(PARAMS.normalize(&bare).unwrap(), PARAMS.normalize(&wrapped).unwrap());

        let single = json!({"name": "a"});
        let wrapped_single = json!({"parameter": {"name": "a"}});
        assert_eq!(PARAMS.normalize(&single).unwrap(), PARAMS.normalize(&wrapped_single).unwrap());
    }

    #[test]
    fn test_unwrap_key_ignores_null_and_non_objects() {
        let null_inner = json!({"parameter": null, "name": "x"});
        assert_eq!(unwrap_key(&null_inner, "parameter"), &null_inner);

        let array = json!([1, 2]);
        assert_eq!(unwrap_key(&array, "parameter"), &array);
    }
}
