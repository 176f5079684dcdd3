//! Data access for OpenNMS events.

use super::support::{DaoSupport, Endpoint};
use super::Dao;
use crate::coerce::to_text;
use crate::filter::Filter;
use crate::http::{OnmsHttp, ReqwestHttp};
use crate::shape::RecordShape;
use async_trait::async_trait;
use onms_config::ClientConfig;
use onms_core::{
    Event, OnmsError, OnmsResult, Parameter, ServerMetadataSource, ServiceType, Severity,
};
use serde_json::Value;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Events in a collection response.
pub const EVENT_RECORDS: RecordShape = RecordShape::new("event", "id", "an array of events");

/// Parameters nested in an event record.
pub const EVENT_PARAMETERS: RecordShape =
    RecordShape::new("parameter", "name", "an array of event parameters");

/// Reads events from `rest/events` or `api/v2/events`, depending on the
/// server's API version.
pub struct EventDao {
    support: DaoSupport,
}

impl EventDao {
    /// Creates an event DAO.
    pub fn new(http: Arc<dyn OnmsHttp>, metadata: Arc<dyn ServerMetadataSource>) -> Self {
        Self {
            support: DaoSupport::new(http, metadata),
        }
    }

    /// Creates an event DAO talking to the configured server.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the server URL is invalid.
    pub fn from_config(config: &ClientConfig) -> OnmsResult<Self> {
        Ok(Self::new(
            Arc::new(ReqwestHttp::from_config(config)?),
            Arc::new(config.server_metadata()),
        ))
    }

    fn path(&self) -> &'static str {
        Endpoint::EVENTS.path(self.support.api_version())
    }
}

#[async_trait]
impl Dao<i64, Event> for EventDao {
    fn support(&self) -> &DaoSupport {
        &self.support
    }

    async fn get(&self, id: i64) -> OnmsResult<Event> {
        debug!("EventDao: get {}", id);
        let options = self.support.get_options(None)?;
        let path = format!("{}/{}", self.path(), id);

        let response = match self.support.http().get(&path, &options).await {
            Ok(response) => response,
            Err(OnmsError::NotFound { .. }) => return Err(OnmsError::not_found("Event", id)),
            Err(e) => return Err(e),
        };

        match &response.data {
            Value::Null => Err(OnmsError::not_found("Event", id)),
            Value::Object(map) if map.is_empty() => Err(OnmsError::not_found("Event", id)),
            data => self.from_data(data),
        }
    }

    async fn find(&self, filter: Option<&Filter>) -> OnmsResult<Vec<Event>> {
        debug!("EventDao: find filter={:?}", filter);
        let options = self.support.get_options(filter)?;
        let response = self.support.http().get(self.path(), &options).await?;

        self.support
            .collection(&response.data, &EVENT_RECORDS)?
            .into_iter()
            .map(|record| self.from_data(record))
            .collect()
    }

    fn from_data(&self, data: &Value) -> OnmsResult<Event> {
        let support = &self.support;
        let mut event = Event::new(support.to_integer(data.get("id")).required("id")?);

        event.uei = to_text(data.get("uei"));
        event.label = to_text(data.get("label"));
        event.location = to_text(data.get("location"));
        event.node_id = support.to_integer(data.get("nodeId")).lenient("nodeId");
        event.node_label = to_text(data.get("nodeLabel"));
        event.ip_address = ip_address(data.get("ipAddress"));
        event.create_time = support.to_date(data.get("createTime")).lenient("createTime");
        event.time = support.to_date(data.get("time")).lenient("time");
        event.source = to_text(data.get("source"));
        event.description = to_text(data.get("description"));
        event.log_message = to_text(data.get("logMessage"));

        if let Some(label) = to_text(data.get("severity")).filter(|s| !s.is_empty()) {
            event.severity = Some(Severity::for_label(&label)?);
        }

        if let Some(service) = data.get("serviceType").filter(|v| v.is_object()) {
            event.service = Some(ServiceType::new(
                support.to_integer(service.get("id")).required("serviceType.id")?,
                to_text(service.get("name")).unwrap_or_default(),
            ));
        }

        if let Some(parameters) = data.get("parameters").filter(|v| !v.is_null()) {
            event.parameters = EVENT_PARAMETERS
                .normalize(parameters)?
                .into_iter()
                .map(parameter_from_data)
                .collect();
        }

        Ok(event)
    }

    fn search_property_path(&self) -> String {
        format!("{}/properties", self.path())
    }
}

fn ip_address(value: Option<&Value>) -> Option<IpAddr> {
    let text = to_text(value)?;
    let trimmed = text.trim().trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse() {
        Ok(addr) => Some(addr),
        Err(_) => {
            warn!(field = "ipAddress", value = %text, "Ignoring malformed value");
            None
        }
    }
}

fn parameter_from_data(data: &Value) -> Parameter {
    Parameter::new(
        to_text(data.get("name")).unwrap_or_default(),
        to_text(data.get("type")).unwrap_or_default(),
        to_text(data.get("value")).unwrap_or_default(),
    )
}
