//! Smart sync: cache-first load followed by a version-gated full refresh.
//!
//! ### Algorithm
//! 1. Under the working-copy lock, read both cached collections and the
//!    local version record. No patch can land between this read and step 2.
//! 2. Publish a non-empty cache to the working copy, then release the lock
//!    before any network call.
//! 3. Compare versions. An empty cache counts as "no version recorded".
//! 4. On `FullSync`, fetch the snapshot, drop records that would not survive
//!    a read, then commit collections and version record in one transaction
//!    and publish the result.
//! 5. Otherwise report the cache with `action = NoChange`, `from_cache = true`.
//!
//! ### Failure handling
//! - A failed full fetch never touches the store; the last-good cache is
//!   returned with a warning. With no cache it is a load error.
//! - A failed commit keeps the previous cache on display when one exists.
//! - A failed commit with no cache publishes the fetched dataset anyway, with
//!   a `PersistFailed` warning. This is the one case where the working copy
//!   holds data the store does not. The next smart sync is a cold start again
//!   and retries the commit.

use chrono::Utc;
use serde::Serialize;

use super::comparator::{self, SyncAction, VersionCheck};
use super::source::RemoteSource;
use super::working::WorkingCopy;
use crate::Error;
use crate::model::{Dataset, LocalVersionRecord};
use crate::store::LocalStore;

/// Non-blocking "data may be stale" signal attached to a sync outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, schemars::JsonSchema)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SyncWarning {
    VersionCheckFailed(String),
    FullFetchFailed(String),
    PersistFailed(String),
}

/// Result of a smart sync, with provenance.
#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct SyncOutcome {
    pub dataset: Dataset,
    pub action: SyncAction,
    /// True when `dataset` came from the local store rather than a fresh fetch.
    pub from_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<SyncWarning>,
}

impl SyncOutcome {
    fn cached(dataset: Dataset, warning: Option<SyncWarning>) -> Self {
        Self { dataset, action: SyncAction::NoChange, from_cache: true, warning }
    }

    /// Whether the caller should re-render.
    pub fn needs_render(&self) -> bool {
        self.action != SyncAction::NoChange
    }

    pub fn is_stale(&self) -> bool {
        self.warning.is_some()
    }
}

/// Run one smart sync against the store and remote.
///
/// # Errors
///
/// Returns `Error::LoadFailed` when there is no cache and the remote cannot
/// provide a dataset.
pub async fn smart_sync(
    store: &LocalStore, working: &WorkingCopy, source: &dyn RemoteSource,
) -> Result<SyncOutcome, Error> {
    let (cache_present, local) = {
        let mut view = working.lock().await;
        let cached = store.load_dataset().await;
        let cache_present = !cached.is_empty();
        let local = if cache_present { store.get_version().await } else { None };

        if cache_present {
            tracing::debug!(
                businesses = cached.businesses.len(),
                categories = cached.categories.len(),
                "publishing cached dataset"
            );
            *view = cached;
        }
        (cache_present, local)
    };

    let check = comparator::check_version(source, local.as_ref(), cache_present).await?;

    let remote = match check {
        VersionCheck::Reachable { action: SyncAction::FullSync, remote } => remote,
        VersionCheck::Reachable { .. } => {
            tracing::debug!("cache is current, skipping full fetch");
            return Ok(SyncOutcome::cached(working.snapshot().await, None));
        }
        VersionCheck::Unreachable { reason } => {
            return Ok(SyncOutcome::cached(working.snapshot().await, Some(SyncWarning::VersionCheckFailed(reason))));
        }
    };

    let mut dataset = match source.fetch_full_dataset().await {
        Ok(dataset) => dataset,
        Err(e) if cache_present => {
            tracing::warn!(error = %e, "full fetch failed, keeping cached dataset");
            return Ok(SyncOutcome::cached(working.snapshot().await, Some(SyncWarning::FullFetchFailed(e.to_string()))));
        }
        Err(e) => return Err(Error::LoadFailed(format!("no cached data and full fetch failed: {e}"))),
    };

    let dropped = dataset.retain_valid();
    if dropped > 0 {
        tracing::warn!(dropped, "skipping remote records without an id or name");
    }

    let record = LocalVersionRecord::from_descriptor(remote, Utc::now());
    let mut view = working.lock().await;

    if let Err(e) = store.commit_full_sync(&dataset, &record).await {
        tracing::warn!(error = %e, "failed to persist full sync");
        if cache_present {
            return Ok(SyncOutcome::cached((*view).clone(), Some(SyncWarning::PersistFailed(e.to_string()))));
        }
        *view = dataset.clone();
        return Ok(SyncOutcome {
            dataset,
            action: SyncAction::FullSync,
            from_cache: false,
            warning: Some(SyncWarning::PersistFailed(e.to_string())),
        });
    }

    *view = dataset.clone();
    drop(view);

    tracing::info!(
        version = %record.version_token,
        businesses = dataset.businesses.len(),
        categories = dataset.categories.len(),
        "full sync committed"
    );

    Ok(SyncOutcome { dataset, action: SyncAction::FullSync, from_cache: false, warning: None })
}
