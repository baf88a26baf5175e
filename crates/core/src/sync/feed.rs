//! Ordered change feed channel.
//!
//! The transport that receives pushed changes (a realtime socket, a tool call,
//! a test harness) holds a [`FeedSender`]; the patch applier consumes the
//! matching [`Subscription`]. Events come out in exactly the order they were
//! pushed. There must be a single consumer per subscription.

use tokio::sync::{mpsc, watch};

use crate::Error;
use crate::model::ChangeEvent;

/// Constructor for linked sender/subscription pairs.
pub struct ChangeFeed;

impl ChangeFeed {
    /// Create a bounded feed. `buffer` is clamped to at least one slot.
    pub fn channel(buffer: usize) -> (FeedSender, Subscription) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let (cancel_tx, cancel_rx) = watch::channel(false);
        (FeedSender { tx }, Subscription { rx, cancel_rx, handle: SubscriptionHandle { cancel_tx } })
    }
}

/// Producer side of a change feed.
#[derive(Debug, Clone)]
pub struct FeedSender {
    tx: mpsc::Sender<ChangeEvent>,
}

impl FeedSender {
    /// Push an event, waiting for buffer space.
    ///
    /// # Errors
    ///
    /// Returns `Error::FeedClosed` once the subscription is gone.
    pub async fn push(&self, event: ChangeEvent) -> Result<(), Error> {
        self.tx.send(event).await.map_err(|_| Error::FeedClosed)
    }
}

/// Tears a subscription down from outside the consuming task.
#[derive(Debug, Clone)]
pub struct SubscriptionHandle {
    cancel_tx: watch::Sender<bool>,
}

impl SubscriptionHandle {
    pub fn unsubscribe(&self) {
        self.cancel_tx.send_replace(true);
    }
}

/// Consumer side of a change feed.
#[derive(Debug)]
pub struct Subscription {
    rx: mpsc::Receiver<ChangeEvent>,
    cancel_rx: watch::Receiver<bool>,
    handle: SubscriptionHandle,
}

impl Subscription {
    pub fn handle(&self) -> SubscriptionHandle {
        self.handle.clone()
    }

    /// Next event in delivery order.
    ///
    /// Returns None after `unsubscribe` or once every sender is dropped and
    /// the buffer is drained. Events still buffered at unsubscribe are dropped.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        if *self.cancel_rx.borrow() {
            self.rx.close();
            return None;
        }

        tokio::select! {
            biased;
            _ = self.cancel_rx.changed() => {
                self.rx.close();
                None
            }
            event = self.rx.recv() => event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityKind;

    #[tokio::test]
    async fn test_events_arrive_in_push_order() {
        let (sender, mut subscription) = ChangeFeed::channel(8);
        for id in ["a", "b", "c"] {
            sender.push(ChangeEvent::delete(EntityKind::Business, id)).await.unwrap();
        }
        drop(sender);

        let mut ids = Vec::new();
        while let Some(event) = subscription.next().await {
            ids.push(event.id().to_string());
        }
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_unsubscribe_closes_feed() {
        let (sender, mut subscription) = ChangeFeed::channel(8);
        sender.push(ChangeEvent::delete(EntityKind::Business, "a")).await.unwrap();

        subscription.handle().unsubscribe();

        assert!(subscription.next().await.is_none());
        assert!(matches!(
            sender.push(ChangeEvent::delete(EntityKind::Business, "b")).await,
            Err(Error::FeedClosed)
        ));
    }
}
