//! Event entity.

use crate::{Entity, Parameter, ServiceType, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// An OpenNMS event as returned by the events endpoint.
///
/// Only `id` is guaranteed; every other field mirrors whatever the server
/// chose to send.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event id.
    pub id: i64,

    /// Unique event identifier (e.g. `uei.opennms.org/nodes/nodeDown`).
    pub uei: Option<String>,

    /// Human-readable event label.
    pub label: Option<String>,

    /// Monitoring location the event originated from.
    pub location: Option<String>,

    /// Id of the node the event is associated with.
    pub node_id: Option<i64>,

    /// Label of the node the event is associated with.
    pub node_label: Option<String>,

    /// Interface address the event is associated with.
    pub ip_address: Option<IpAddr>,

    /// When the server persisted the event.
    pub create_time: Option<DateTime<Utc>>,

    /// When the event occurred.
    pub time: Option<DateTime<Utc>>,

    /// Component that emitted the event.
    pub source: Option<String>,

    /// Long description.
    pub description: Option<String>,

    /// Short log message.
    pub log_message: Option<String>,

    /// Event severity.
    pub severity: Option<Severity>,

    /// Service the event refers to.
    pub service: Option<ServiceType>,

    /// Event parameters in server order.
    pub parameters: Vec<Parameter>,
}

impl Event {
    /// Creates an event with only its id set.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Finds a parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name() == name)
    }
}

impl Entity<i64> for Event {
    fn id(&self) -> &i64 {
        &self.id
    }
}
