//! Version comparison: decides whether the cache can be trusted.

use serde::{Deserialize, Serialize};

use super::source::RemoteSource;
use crate::Error;
use crate::model::{LocalVersionRecord, VersionDescriptor};

/// What a sync should do with the cached dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    /// The cache is authoritative; no full fetch.
    NoChange,
    /// The remote could not be asked; serve the cache and reconcile on a later sync.
    UseCacheThenBackgroundRefresh,
    /// Refetch and overwrite every collection.
    FullSync,
}

/// Compare the local record against the remote descriptor.
pub fn decide(local: Option<&LocalVersionRecord>, remote: &VersionDescriptor) -> SyncAction {
    match local {
        None => SyncAction::FullSync,
        Some(record) if record.matches(remote) => SyncAction::NoChange,
        Some(_) => SyncAction::FullSync,
    }
}

/// Result of asking the remote for its version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionCheck {
    Reachable { action: SyncAction, remote: VersionDescriptor },
    /// Only produced when a non-empty cache exists to fall back on.
    Unreachable { reason: String },
}

impl VersionCheck {
    pub fn action(&self) -> SyncAction {
        match self {
            VersionCheck::Reachable { action, .. } => *action,
            VersionCheck::Unreachable { .. } => SyncAction::UseCacheThenBackgroundRefresh,
        }
    }
}

/// Fetch the remote version and decide the sync action.
///
/// # Errors
///
/// Returns `Error::LoadFailed` if the remote is unreachable and there is no
/// cache to fall back on.
pub async fn check_version(
    source: &dyn RemoteSource, local: Option<&LocalVersionRecord>, cache_present: bool,
) -> Result<VersionCheck, Error> {
    match source.fetch_remote_version().await {
        Ok(remote) => {
            let action = decide(local, &remote);
            tracing::debug!(
                local = local.map(|r| r.version_token.as_str()).unwrap_or("<none>"),
                remote = %remote.version_token,
                ?action,
                "compared data versions"
            );
            Ok(VersionCheck::Reachable { action, remote })
        }
        Err(e) if cache_present => {
            tracing::warn!(error = %e, "version check failed, falling back to cached data");
            Ok(VersionCheck::Unreachable { reason: e.to_string() })
        }
        Err(e) => Err(Error::LoadFailed(format!("no cached data and version check failed: {e}"))),
    }
}
