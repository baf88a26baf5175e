//! Remote data source abstraction.

use crate::Error;
use crate::model::{Dataset, VersionDescriptor};

/// The authoritative remote store, as seen by the sync engine.
///
/// Implemented over HTTP by `bizsync-client`; tests use scripted fakes.
#[async_trait::async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch the lightweight version descriptor. Carries no entity payload.
    async fn fetch_remote_version(&self) -> Result<VersionDescriptor, Error>;

    /// Fetch a full snapshot of every collection.
    async fn fetch_full_dataset(&self) -> Result<Dataset, Error>;
}
