//! Monitored service type value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A monitored service type (ICMP, SNMP, HTTP, ...).
///
/// The id is authoritative: two instances with the same id are equal
/// regardless of their names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceType {
    /// Server-side service type id.
    pub id: i64,
    /// Display name.
    pub name: String,
}

impl ServiceType {
    /// Creates a service type.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl PartialEq for ServiceType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceType {}

impl Hash for ServiceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
