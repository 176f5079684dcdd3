//! Event parameter value object.

use serde::{Deserialize, Serialize};

/// An immutable name/type/value triple attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    value: String,
}

impl Parameter {
    /// Creates a parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared value type (e.g. `string`, `Int32`).
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Value rendered as text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}
