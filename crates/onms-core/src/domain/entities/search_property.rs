//! Search property entity.

use crate::Entity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Describes one property an endpoint can be filtered or ordered by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchProperty {
    /// Property id as used in filter clauses (e.g. `eventSeverity`).
    pub id: String,

    /// Display name.
    pub name: Option<String>,

    /// Property value type (`INTEGER`, `STRING`, `TIMESTAMP`, ...).
    pub kind: Option<String>,

    /// Whether the property can be used for ordering.
    pub order_by: bool,

    /// Enumerated values, keyed by wire value.
    pub values: BTreeMap<String, String>,
}

impl Entity<String> for SearchProperty {
    fn id(&self) -> &String {
        &self.id
    }
}
