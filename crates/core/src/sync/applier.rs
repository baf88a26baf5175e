//! Change feed patch applier.
//!
//! Folds pushed insert/update/delete events into the local store and the
//! working copy, one event at a time, in delivery order.
//!
//! ### Event semantics
//! - **insert / update**: upsert into the store and the working copy. An
//!   insert for a known id behaves as an update, an update for an unknown id
//!   behaves as an insert, so redelivery is harmless.
//! - **delete**: remove from both; an unknown id is a no-op.
//!
//! After each event the local version record is refreshed from the remote on
//! a best-effort basis. A failed refresh does not undo the data change; the
//! next smart sync reconciles any drift.
//!
//! ### Ordering precondition
//! Exactly one applier consumes a subscription. Events are never reordered or
//! batched, since later events may depend on earlier ones touching the same id.

use std::sync::Arc;

use chrono::Utc;

use super::feed::Subscription;
use super::source::RemoteSource;
use super::working::WorkingCopy;
use crate::Error;
use crate::model::{Business, Category, ChangeEvent, Dataset, Entity, EntityKind, EntityRecord, LocalVersionRecord};
use crate::store::LocalStore;

/// Lifecycle of one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    Subscribing,
    Active,
    Unsubscribed,
}

/// Applies change events to the local store and working copy.
pub struct PatchApplier {
    store: LocalStore,
    working: WorkingCopy,
    source: Arc<dyn RemoteSource>,
    refresh_version: bool,
    state: FeedState,
    applied: u64,
}

impl PatchApplier {
    pub fn new(store: LocalStore, working: WorkingCopy, source: Arc<dyn RemoteSource>) -> Self {
        Self { store, working, source, refresh_version: true, state: FeedState::Subscribing, applied: 0 }
    }

    /// Toggle the post-event version refresh.
    pub fn with_version_refresh(mut self, enabled: bool) -> Self {
        self.refresh_version = enabled;
        self
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    /// Number of events applied successfully.
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Consume a subscription until it is torn down.
    ///
    /// Returns the number of events applied.
    pub async fn run(mut self, mut subscription: Subscription) -> u64 {
        self.state = FeedState::Active;
        tracing::info!("change feed active");

        while let Some(event) = subscription.next().await {
            self.on_event(event).await;
        }

        self.state = FeedState::Unsubscribed;
        tracing::info!(applied = self.applied, "change feed unsubscribed");
        self.applied
    }

    /// Apply one event, logging rather than returning failures.
    pub async fn on_event(&mut self, event: ChangeEvent) {
        if self.state == FeedState::Unsubscribed {
            tracing::debug!(id = event.id(), "ignoring event after unsubscribe");
            return;
        }
        if let Err(e) = self.apply(&event).await {
            tracing::warn!(
                operation = %event.operation(),
                kind = %event.kind(),
                id = event.id(),
                error = %e,
                "failed to apply change event"
            );
        }
    }

    /// Apply one event and refresh the version record.
    ///
    /// # Errors
    ///
    /// Returns an error if the local store rejects the write; the working copy
    /// is left untouched in that case.
    pub async fn apply(&mut self, event: &ChangeEvent) -> Result<(), Error> {
        {
            let mut view = self.working.lock().await;
            match event {
                ChangeEvent::Insert(record) | ChangeEvent::Update(record) => match record {
                    EntityRecord::Business(b) => upsert(&self.store, &mut view, b).await?,
                    EntityRecord::Category(c) => upsert(&self.store, &mut view, c).await?,
                },
                ChangeEvent::Delete { kind: EntityKind::Business, id } => {
                    delete::<Business>(&self.store, &mut view, id).await?
                }
                ChangeEvent::Delete { kind: EntityKind::Category, id } => {
                    delete::<Category>(&self.store, &mut view, id).await?
                }
            }
        }

        self.applied += 1;
        tracing::debug!(operation = %event.operation(), kind = %event.kind(), id = event.id(), "applied change event");

        if self.refresh_version {
            self.refresh_version_record().await;
        }
        Ok(())
    }

    async fn refresh_version_record(&self) {
        // Without a recorded version there was never a full sync; recording
        // one now would make a partial cache look current.
        if self.store.get_version().await.is_none() {
            tracing::debug!("no version record yet, skipping refresh");
            return;
        }

        match self.source.fetch_remote_version().await {
            Ok(remote) => {
                let record = LocalVersionRecord::from_descriptor(remote, Utc::now());
                if let Err(e) = self.store.set_version(&record).await {
                    tracing::warn!(error = %e, "failed to store refreshed version record");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to refresh version record"),
        }
    }
}

async fn upsert<E: Entity>(store: &LocalStore, view: &mut Dataset, entity: &E) -> Result<(), Error> {
    store.upsert_one(entity).await?;
    view.upsert(entity.clone());
    Ok(())
}

async fn delete<E: Entity>(store: &LocalStore, view: &mut Dataset, id: &str) -> Result<(), Error> {
    store.delete_one::<E>(id).await?;
    view.remove::<E>(id);
    Ok(())
}
