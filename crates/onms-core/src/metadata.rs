//! Server metadata: product flavor, version, and the REST API generation
//! those imply.

use crate::OnmsError;
use serde::{Deserialize, Serialize};
use shaku::Interface;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// REST API generation spoken by a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ApiVersion {
    /// Legacy XML-derived endpoints under `rest/`.
    #[default]
    V1,
    /// JSON-native endpoints under `api/v2/` with FIQL search.
    V2,
}

impl ApiVersion {
    /// Resolves a numeric version. `2` selects v2; everything else falls
    /// back to the legacy API.
    #[must_use]
    pub const fn from_number(n: u8) -> Self {
        match n {
            2 => Self::V2,
            _ => Self::V1,
        }
    }

    /// Returns the numeric version.
    #[must_use]
    pub const fn number(&self) -> u8 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
        }
    }
}

impl From<u8> for ApiVersion {
    fn from(n: u8) -> Self {
        Self::from_number(n)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}

/// OpenNMS product flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServerType {
    /// Community release, versioned by major number (e.g. `21.0.1`).
    #[default]
    Horizon,
    /// Enterprise release, versioned by year (e.g. `2018.1.0`).
    Meridian,
}

impl FromStr for ServerType {
    type Err = OnmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "horizon" => Ok(Self::Horizon),
            "meridian" => Ok(Self::Meridian),
            _ => Err(OnmsError::invalid_value("server_type", s)),
        }
    }
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizon => write!(f, "horizon"),
            Self::Meridian => write!(f, "meridian"),
        }
    }
}

/// Synchronous accessor for the API generation of the connected server.
///
/// DAOs consult this once per instance; detecting the server version is the
/// implementor's concern.
pub trait ServerMetadataSource: Interface + Send + Sync {
    /// Returns the resolved API version.
    fn api_version(&self) -> ApiVersion;
}

/// Metadata describing a connected OpenNMS server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerMetadata {
    /// Reported product version string.
    pub version: String,
    /// Product flavor.
    pub server_type: ServerType,
    forced_api_version: Option<ApiVersion>,
}

impl ServerMetadata {
    /// First Horizon major release that ships the v2 REST API.
    pub const HORIZON_V2_MAJOR: u32 = 21;
    /// First Meridian release year that ships the v2 REST API.
    pub const MERIDIAN_V2_YEAR: u32 = 2018;

    /// Creates metadata from a reported version string.
    #[must_use]
    pub fn new(version: impl Into<String>, server_type: ServerType) -> Self {
        Self {
            version: version.into(),
            server_type,
            forced_api_version: None,
        }
    }

    /// Creates metadata pinned to a specific API version.
    #[must_use]
    pub fn with_api_version(api_version: ApiVersion) -> Self {
        Self {
            version: String::new(),
            server_type: ServerType::default(),
            forced_api_version: Some(api_version),
        }
    }

    /// Returns the leading numeric component of the version string.
    #[must_use]
    pub fn major(&self) -> Option<u32> {
        self.version
            .trim()
            .split(|c: char| !c.is_ascii_digit())
            .next()
            .and_then(|m| m.parse().ok())
    }
}

impl ServerMetadataSource for ServerMetadata {
    fn api_version(&self) -> ApiVersion {
        if let Some(forced) = self.forced_api_version {
            return forced;
        }

        let Some(major) = self.major() else {
            warn!(version = %self.version, "Unparsable server version, assuming API v1");
            return ApiVersion::V1;
        };

        let threshold = match self.server_type {
            ServerType::Horizon => Self::HORIZON_V2_MAJOR,
            ServerType::Meridian => Self::MERIDIAN_V2_YEAR,
        };

        if major >= threshold {
            ApiVersion::V2
        } else {
            ApiVersion::V1
        }
    }
}
