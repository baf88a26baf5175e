//! Cache reconciliation: version comparison, smart sync, and change feed patches.

pub mod applier;
pub mod comparator;
pub mod engine;
pub mod feed;
pub mod orchestrator;
pub mod source;
#[cfg(test)]
pub(crate) mod testing;
pub mod working;

pub use applier::{FeedState, PatchApplier};
pub use comparator::{SyncAction, VersionCheck, decide};
pub use engine::{CacheInfo, FeedHandle, SyncEngine};
pub use feed::{ChangeFeed, FeedSender, Subscription, SubscriptionHandle};
pub use orchestrator::{SyncOutcome, SyncWarning, smart_sync};
pub use source::RemoteSource;
pub use working::WorkingCopy;
