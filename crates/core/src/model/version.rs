//! Dataset generation markers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The remote dataset's current generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct VersionDescriptor {
    /// Opaque generation marker. Only equality is meaningful.
    pub version_token: String,
    pub updated_at: DateTime<Utc>,
}

impl VersionDescriptor {
    pub fn new(version_token: impl Into<String>, updated_at: DateTime<Utc>) -> Self {
        Self { version_token: version_token.into(), updated_at }
    }
}

/// A version descriptor as recorded in the local store, plus when it was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct LocalVersionRecord {
    pub version_token: String,
    pub updated_at: DateTime<Utc>,
    pub last_sync: DateTime<Utc>,
}

impl LocalVersionRecord {
    pub fn from_descriptor(descriptor: VersionDescriptor, last_sync: DateTime<Utc>) -> Self {
        Self { version_token: descriptor.version_token, updated_at: descriptor.updated_at, last_sync }
    }

    pub fn matches(&self, remote: &VersionDescriptor) -> bool {
        self.version_token == remote.version_token
    }
}
