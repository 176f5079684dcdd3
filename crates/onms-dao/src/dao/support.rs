//! Helpers shared by every DAO.

use crate::coerce::{self, to_text, Coerced};
use crate::filter::Filter;
use crate::http::{OnmsHttp, RequestOptions};
use crate::shape::{unwrap_key, RecordShape};
use chrono::{DateTime, Utc};
use onms_core::{ApiVersion, OnmsError, OnmsResult, SearchProperty, ServerMetadataSource};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// Shape of a search property listing.
pub const SEARCH_PROPERTIES: RecordShape =
    RecordShape::new("searchProperty", "id", "an array of search properties");

/// A REST resource whose path differs between API generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    legacy: &'static str,
    v2: &'static str,
}

impl Endpoint {
    /// The events resource.
    pub const EVENTS: Self = Self::new("rest/events", "api/v2/events");

    /// Creates an endpoint from its legacy and v2 paths.
    #[must_use]
    pub const fn new(legacy: &'static str, v2: &'static str) -> Self {
        Self { legacy, v2 }
    }

    /// Returns the path for an API version.
    #[must_use]
    pub const fn path(&self, api_version: ApiVersion) -> &'static str {
        match api_version {
            ApiVersion::V2 => self.v2,
            ApiVersion::V1 => self.legacy,
        }
    }
}

/// State and helpers a concrete DAO composes.
///
/// Holds the HTTP and server-metadata collaborators and caches the API
/// version the first time it is needed.
pub struct DaoSupport {
    http: Arc<dyn OnmsHttp>,
    metadata: Arc<dyn ServerMetadataSource>,
    api_version: OnceLock<ApiVersion>,
}

impl DaoSupport {
    /// Creates support state over the given collaborators.
    pub fn new(http: Arc<dyn OnmsHttp>, metadata: Arc<dyn ServerMetadataSource>) -> Self {
        Self {
            http,
            metadata,
            api_version: OnceLock::new(),
        }
    }

    /// The HTTP collaborator.
    pub fn http(&self) -> &dyn OnmsHttp {
        self.http.as_ref()
    }

    /// API version of the server, resolved once per instance.
    pub fn api_version(&self) -> ApiVersion {
        *self.api_version.get_or_init(|| {
            let version = self.metadata.api_version();
            debug!(api_version = %version, "Resolved server API version");
            version
        })
    }

    /// Builds request options for an optional filter.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the filter cannot be expressed in
    /// the server's API version.
    pub fn get_options(&self, filter: Option<&Filter>) -> OnmsResult<RequestOptions> {
        let options = RequestOptions::new();
        match filter {
            Some(filter) => {
                let parameters = filter.to_query_parameters(self.api_version())?;
                Ok(options.with_parameters(parameters))
            }
            None => Ok(options),
        }
    }

    /// Extracts the record count from a response body.
    ///
    /// A bare number is the count; otherwise `count` then `totalCount` is
    /// consulted. Missing or unparsable counts are 0.
    pub fn get_count(&self, body: &Value) -> u64 {
        if body.is_number() {
            return count_value(body);
        }
        ["count", "totalCount"]
            .iter()
            .find_map(|key| body.get(*key).filter(|v| !v.is_null()))
            .map_or(0, count_value)
    }

    /// See [`coerce::to_number`].
    pub fn to_number(&self, value: Option<&Value>) -> Coerced<f64> {
        coerce::to_number(value)
    }

    /// See [`coerce::to_integer`].
    pub fn to_integer(&self, value: Option<&Value>) -> Coerced<i64> {
        coerce::to_integer(value)
    }

    /// See [`coerce::to_date`].
    pub fn to_date(&self, value: Option<&Value>) -> Coerced<DateTime<Utc>> {
        coerce::to_date(value)
    }

    /// Pulls the record sequence out of a collection response.
    ///
    /// An empty collection (count 0 or no body) yields no records. A
    /// positive count with no records under the collection key is a shape
    /// error, as is a working value that is neither an array nor a record.
    ///
    /// # Errors
    ///
    /// Returns [`OnmsError::Shape`] when the body does not match `shape`.
    pub fn collection<'a>(
        &self,
        body: &'a Value,
        shape: &RecordShape,
    ) -> OnmsResult<Vec<&'a Value>> {
        if body.is_null() {
            return Ok(Vec::new());
        }

        let count = self.get_count(body);
        if count == 0 {
            return Ok(Vec::new());
        }

        match body.get(shape.key) {
            None | Some(Value::Null) => Err(OnmsError::shape(shape.expected, "undefined")),
            Some(Value::Array(items)) if items.is_empty() => {
                Err(OnmsError::shape(shape.expected, format!("an empty array for count {}", count)))
            }
            Some(records) => shape.to_sequence(records),
        }
    }

    /// Fetches and decodes the search properties at `path`.
    ///
    /// # Errors
    ///
    /// Propagates transport failures and shape errors.
    pub async fn search_properties(&self, path: &str) -> OnmsResult<Vec<SearchProperty>> {
        let options = self.get_options(None)?;
        let response = self.http.get(path, &options).await?;
        if response.data.is_null() {
            return Ok(Vec::new());
        }
        SEARCH_PROPERTIES
            .normalize(&response.data)?
            .into_iter()
            .map(search_property_from_data)
            .collect()
    }
}

fn count_value(value: &Value) -> u64 {
    match coerce::to_integer(Some(value)) {
        Coerced::Value(n) => u64::try_from(n).unwrap_or(0),
        Coerced::Absent => 0,
        Coerced::Malformed(raw) => {
            warn!(count = %raw, "Unparsable record count");
            0
        }
    }
}

/// Builds a [`SearchProperty`] from one record of a property listing.
///
/// `values` may be a plain object or the legacy `{"entry": [{"key", "value"}]}`
/// form.
///
/// # Errors
///
/// Returns a value error when the record has no id.
pub fn search_property_from_data(data: &Value) -> OnmsResult<SearchProperty> {
    let id = to_text(data.get("id")).ok_or_else(|| OnmsError::invalid_value("id", "<missing>"))?;

    let mut values = BTreeMap::new();
    if let Some(raw) = data.get("values").filter(|v| !v.is_null()) {
        match unwrap_key(raw, "entry") {
            Value::Object(map) => {
                for (key, value) in map {
                    if let Some(text) = to_text(Some(value)) {
                        values.insert(key.clone(), text);
                    }
                }
            }
            Value::Array(entries) => {
                for entry in entries {
                    let key = to_text(entry.get("key"));
                    if let (Some(key), Some(value)) = (key, to_text(entry.get("value"))) {
                        values.insert(key, value);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(SearchProperty {
        id,
        name: to_text(data.get("name")),
        kind: to_text(data.get("type")),
        order_by: data.get("orderBy").and_then(Value::as_bool).unwrap_or(false),
        values,
    })
}
