//! Shared fixtures for HTTP integration tests.

use onms_core::{ApiVersion, ServerMetadata};
use onms_dao::{EventDao, ReqwestHttp};
use std::sync::Arc;
use wiremock::MockServer;

/// A mock OpenNMS server and an event DAO pointed at it.
pub struct TestServer {
    pub server: MockServer,
}

impl TestServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn http(&self) -> ReqwestHttp {
        ReqwestHttp::new(&format!("{}/opennms/", self.server.uri()))
            .expect("Failed to build HTTP client")
    }

    pub fn event_dao(&self, version: ApiVersion) -> EventDao {
        self.event_dao_with(self.http(), version)
    }

    pub fn event_dao_with(&self, http: ReqwestHttp, version: ApiVersion) -> EventDao {
        EventDao::new(Arc::new(http), Arc::new(ServerMetadata::with_api_version(version)))
    }
}
