//! DAO (Data Access Object) layer.
//!
//! Each DAO reads one OpenNMS REST resource, encoding filters for the
//! server's API version and normalizing the response into domain types.
//!
//! Hierarchy:
//! ```text
//! Dao (trait) → DaoSupport (shared helpers) → OnmsHttp → OpenNMS
//! ```

pub mod event_dao;
pub mod support;

pub use event_dao::EventDao;
pub use support::{search_property_from_data, DaoSupport, Endpoint, SEARCH_PROPERTIES};

use crate::filter::Filter;
use async_trait::async_trait;
use onms_core::{Entity, Interface, OnmsResult, SearchProperty};
use serde_json::Value;

/// Read access to one kind of OpenNMS record.
#[async_trait]
pub trait Dao<K, E>: Interface + Send + Sync
where
    K: Send + 'static,
    E: Entity<K> + Send + 'static,
{
    /// Shared helpers and collaborators.
    fn support(&self) -> &DaoSupport;

    /// Fetches one record by id.
    async fn get(&self, id: K) -> OnmsResult<E>;

    /// Fetches every record matching `filter`, in server order.
    async fn find(&self, filter: Option<&Filter>) -> OnmsResult<Vec<E>>;

    /// Maps one raw record into a domain value.
    fn from_data(&self, data: &Value) -> OnmsResult<E>;

    /// Path of the resource's search property listing.
    fn search_property_path(&self) -> String;

    /// Fetches the properties this resource can be filtered and ordered by.
    async fn search_properties(&self) -> OnmsResult<Vec<SearchProperty>> {
        self.support().search_properties(&self.search_property_path()).await
    }
}
