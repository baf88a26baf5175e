//! Application-facing entry points of the sync engine.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;

use super::applier::PatchApplier;
use super::feed::{ChangeFeed, FeedSender, SubscriptionHandle};
use super::orchestrator::{self, SyncOutcome};
use super::source::RemoteSource;
use super::working::WorkingCopy;
use crate::Error;
use crate::model::{Business, Category, ChangeEvent, Dataset, Entity, EntityKind, LocalVersionRecord};
use crate::store::LocalStore;

/// Summary of what the local store currently holds.
#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct CacheInfo {
    pub businesses: usize,
    pub categories: usize,
    pub version: Option<LocalVersionRecord>,
}

/// A running change feed: push events through `sender`, stop with `subscription`.
#[derive(Debug)]
pub struct FeedHandle {
    pub sender: FeedSender,
    pub subscription: SubscriptionHandle,
    /// Resolves to the number of applied events once unsubscribed.
    pub task: JoinHandle<u64>,
}

/// One store, one working copy, one remote, shared by every entry point.
#[derive(Clone)]
pub struct SyncEngine {
    store: LocalStore,
    working: WorkingCopy,
    source: Arc<dyn RemoteSource>,
    refresh_version_on_event: bool,
}

impl SyncEngine {
    pub fn new(store: LocalStore, source: Arc<dyn RemoteSource>) -> Self {
        Self { store, working: WorkingCopy::new(), source, refresh_version_on_event: true }
    }

    pub fn with_version_refresh(mut self, enabled: bool) -> Self {
        self.refresh_version_on_event = enabled;
        self
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn working(&self) -> &WorkingCopy {
        &self.working
    }

    /// Cached businesses straight from the local store. No network.
    pub async fn cached_businesses(&self) -> Vec<Business> {
        self.store.get().await
    }

    /// Cached categories straight from the local store. No network.
    pub async fn cached_categories(&self) -> Vec<Category> {
        self.store.get().await
    }

    /// Publish whatever the local store holds to the working copy.
    pub async fn load_cached(&self) -> Dataset {
        let mut view = self.working.lock().await;
        let cached = self.store.load_dataset().await;
        if !cached.is_empty() {
            *view = cached.clone();
        }
        cached
    }

    pub async fn smart_sync(&self) -> Result<SyncOutcome, Error> {
        orchestrator::smart_sync(&self.store, &self.working, self.source.as_ref()).await
    }

    /// Run a smart sync on a background task, logging how it went.
    pub fn spawn_smart_sync(&self) -> JoinHandle<Result<SyncOutcome, Error>> {
        let engine = self.clone();
        tokio::spawn(async move {
            let result = engine.smart_sync().await;
            match &result {
                Ok(outcome) => tracing::info!(
                    action = ?outcome.action,
                    from_cache = outcome.from_cache,
                    businesses = outcome.dataset.businesses.len(),
                    warning = ?outcome.warning,
                    "startup sync finished"
                ),
                Err(e) => tracing::warn!(error = %e, "startup sync failed"),
            }
            result
        })
    }

    pub fn patch_applier(&self) -> PatchApplier {
        PatchApplier::new(self.store.clone(), self.working.clone(), self.source.clone())
            .with_version_refresh(self.refresh_version_on_event)
    }

    /// Apply an upserted business reported by the application's own feed wiring.
    pub async fn update_cached_business(&self, business: Business) -> Result<(), Error> {
        if !business.is_valid() {
            return Err(Error::InvalidInput("business needs a non-empty id and shop name".into()));
        }
        self.patch_applier().apply(&ChangeEvent::update(business)).await
    }

    /// Apply a business deletion reported by the application's own feed wiring.
    pub async fn delete_cached_business(&self, id: &str) -> Result<(), Error> {
        if id.trim().is_empty() {
            return Err(Error::InvalidInput("business id cannot be empty".into()));
        }
        self.patch_applier()
            .apply(&ChangeEvent::delete(EntityKind::Business, id))
            .await
    }

    /// Start an ordered change feed consumer on a background task.
    pub fn subscribe(&self, buffer: usize) -> FeedHandle {
        let (sender, subscription) = ChangeFeed::channel(buffer);
        let handle = subscription.handle();
        let applier = self.patch_applier();
        let task = tokio::spawn(applier.run(subscription));
        FeedHandle { sender, subscription: handle, task }
    }

    pub async fn cache_info(&self) -> CacheInfo {
        let dataset = self.store.load_dataset().await;
        CacheInfo {
            businesses: dataset.businesses.len(),
            categories: dataset.categories.len(),
            version: self.store.get_version().await,
        }
    }

    /// Drop the local cache and clear the working copy.
    ///
    /// The next smart sync is a cold start.
    pub async fn purge(&self) -> Result<u64, Error> {
        let mut view = self.working.lock().await;
        let deleted = self.store.purge().await?;
        *view = Dataset::default();
        tracing::info!(deleted, "local cache purged");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::SyncAction;
    use crate::sync::testing::{ScriptedSource, business, dataset};

    async fn engine(source: Arc<ScriptedSource>) -> SyncEngine {
        let store = LocalStore::open_in_memory().await.unwrap();
        SyncEngine::new(store, source)
    }

    #[tokio::test]
    async fn test_cached_reads_are_stable() {
        let source = Arc::new(ScriptedSource::new(Some("v1"), Some(dataset(&[("b1", "Bakery"), ("b2", "Tailor")]))));
        let engine = engine(source.clone()).await;
        engine.smart_sync().await.unwrap();

        let first = engine.cached_businesses().await;
        let second = engine.cached_businesses().await;
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(source.version_calls(), 1);
    }

    #[tokio::test]
    async fn test_second_start_serves_cache() {
        let source = Arc::new(ScriptedSource::new(Some("v1"), Some(dataset(&[("b1", "Bakery")]))));
        let engine = engine(source.clone()).await;

        let first = engine.smart_sync().await.unwrap();
        let second = engine.smart_sync().await.unwrap();

        assert_eq!(first.action, SyncAction::FullSync);
        assert_eq!(second.action, SyncAction::NoChange);
        assert!(second.from_cache);
        assert_eq!(source.dataset_calls(), 1);
    }

    #[tokio::test]
    async fn test_load_cached_paints_without_network() {
        let source = Arc::new(ScriptedSource::new(Some("v1"), Some(dataset(&[("b1", "Bakery")]))));
        let engine = engine(source.clone()).await;
        engine.smart_sync().await.unwrap();
        engine.working().replace(Dataset::default()).await;

        let painted = engine.load_cached().await;

        assert_eq!(painted.businesses.len(), 1);
        assert_eq!(engine.working().snapshot().await, painted);
        assert_eq!(source.version_calls(), 1);
    }

    #[tokio::test]
    async fn test_spawned_sync_fills_cold_cache() {
        let source = Arc::new(ScriptedSource::new(Some("v1"), Some(dataset(&[("b1", "Bakery")]))));
        let engine = engine(source.clone()).await;

        let outcome = engine.spawn_smart_sync().await.unwrap().unwrap();

        assert_eq!(outcome.action, SyncAction::FullSync);
        assert_eq!(engine.cached_businesses().await.len(), 1);
        assert_eq!(engine.working().snapshot().await, outcome.dataset);
        assert_eq!(engine.cache_info().await.version.unwrap().version_token, "v1");
    }

    #[tokio::test]
    async fn test_spawned_sync_reports_cold_offline_start() {
        let source = Arc::new(ScriptedSource::new(None, None));
        let engine = engine(source).await;

        let result = engine.spawn_smart_sync().await.unwrap();

        assert!(matches!(result, Err(Error::LoadFailed(_))));
        assert!(engine.working().snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_cached_business() {
        let source = Arc::new(ScriptedSource::new(Some("v1"), Some(dataset(&[("b1", "Bakery")]))));
        let engine = engine(source).await;
        engine.smart_sync().await.unwrap();

        engine.update_cached_business(business("b2", "Tailor")).await.unwrap();
        assert_eq!(engine.cached_businesses().await.len(), 2);
        assert!(engine.working().business("b2").await.is_some());

        engine.delete_cached_business("b1").await.unwrap();
        assert_eq!(engine.cached_businesses().await.len(), 1);
        assert!(engine.working().business("b1").await.is_none());

        assert!(matches!(engine.delete_cached_business(" ").await, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_update_without_shop_name_keeps_cache() {
        let source = Arc::new(ScriptedSource::new(Some("v1"), Some(dataset(&[("b1", "Bakery")]))));
        let engine = engine(source).await;
        engine.smart_sync().await.unwrap();

        let result = engine.update_cached_business(business("b1", " ")).await;

        assert!(matches!(result, Err(Error::InvalidInput(_))));
        let cached = engine.cached_businesses().await;
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].shop_name, "Bakery");
        assert_eq!(engine.working().snapshot().await, engine.store().load_dataset().await);
    }

    #[tokio::test]
    async fn test_subscribe_applies_and_unsubscribes() {
        let source = Arc::new(ScriptedSource::new(Some("v1"), Some(dataset(&[("b1", "Bakery")]))));
        let engine = engine(source).await.with_version_refresh(false);
        engine.smart_sync().await.unwrap();

        let feed = engine.subscribe(4);
        feed.sender.push(ChangeEvent::insert(business("b2", "Tailor"))).await.unwrap();
        feed.sender.push(ChangeEvent::delete(EntityKind::Business, "b1")).await.unwrap();
        drop(feed.sender);

        let applied = feed.task.await.unwrap();
        assert_eq!(applied, 2);
        let ids: Vec<String> = engine.cached_businesses().await.into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["b2"]);
    }

    #[tokio::test]
    async fn test_purge_forces_cold_start() {
        let source = Arc::new(ScriptedSource::new(Some("v1"), Some(dataset(&[("b1", "Bakery")]))));
        let engine = engine(source.clone()).await;
        engine.smart_sync().await.unwrap();

        let deleted = engine.purge().await.unwrap();
        assert_eq!(deleted, 3);
        assert!(engine.working().snapshot().await.is_empty());
        let info = engine.cache_info().await;
        assert_eq!(info.businesses, 0);
        assert!(info.version.is_none());

        let outcome = engine.smart_sync().await.unwrap();
        assert_eq!(outcome.action, SyncAction::FullSync);
        assert_eq!(source.dataset_calls(), 2);
    }
}
