//! Push fan-out to connected subscribers.
//!
//! Each subscriber owns a small bounded channel. [`BroadcastHub::on_snapshot`]
//! offers the new snapshot to every channel with `try_send` and moves on:
//! a full channel loses that send, and a closed channel removes its
//! subscriber. The fold loop calling the hub therefore never waits on a
//! socket.
//!
//! A lost send is recovered on the reading side: once a [`Subscription`]
//! has drained its queue it compares against the store and yields the
//! latest snapshot instead, so a reader that fell behind during a burst
//! still ends on the newest revision.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use playstatus_core::{PublishCallback, Snapshot, SnapshotStore};
use playstatus_types::SubscriberId;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info};

/// Receiving end of one subscriber's push channel.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    rx: mpsc::Receiver<Arc<Snapshot>>,
    store: SnapshotStore,
    last_seen: Option<u64>,
}

impl Subscription {
    /// The hub-assigned identity, used to unsubscribe.
    pub const fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next snapshot newer than the last one returned.
    ///
    /// Returns `None` once the hub has dropped this subscriber.
    pub async fn recv(&mut self) -> Option<Arc<Snapshot>> {
        loop {
            let mut snapshot = self.rx.recv().await?;
            if self.rx.is_empty() {
                let latest = self.store.current();
                if latest.revision() > snapshot.revision() {
                    snapshot = latest;
                }
            }
            if self
                .last_seen
                .is_some_and(|seen| snapshot.revision() <= seen)
            {
                continue;
            }
            self.last_seen = Some(snapshot.revision());
            return Some(snapshot);
        }
    }
}

#[derive(Debug)]
struct Subscriber {
    tx: mpsc::Sender<Arc<Snapshot>>,
    last_delivered: u64,
}

/// Outcome of offering one snapshot to every subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOut {
    /// Subscribers that accepted the snapshot.
    pub delivered: usize,
    /// Subscribers whose channel was full; the send was dropped.
    pub lagged: usize,
    /// Subscribers removed because their channel was closed.
    pub removed: usize,
}

/// Registry of push subscribers.
#[derive(Debug)]
pub struct BroadcastHub {
    store: SnapshotStore,
    buffer: usize,
    subscribers: Mutex<BTreeMap<SubscriberId, Subscriber>>,
}

impl BroadcastHub {
    /// Create a hub reading initial snapshots from `store`.
    ///
    /// `buffer` is the number of snapshots a subscriber may have queued;
    /// zero is treated as one.
    pub fn new(store: SnapshotStore, buffer: usize) -> Self {
        Self {
            store,
            buffer: buffer.max(1),
            subscribers: Mutex::new(BTreeMap::new()),
        }
    }

    /// Register a subscriber and queue the current snapshot as its first
    /// message.
    pub fn subscribe(&self) -> Subscription {
        let id = SubscriberId::new();
        let (tx, rx) = mpsc::channel(self.buffer);

        let mut subscribers = self.lock();
        // Read the store under the lock so a concurrent fan-out cannot slip
        // an older revision in after this one.
        let current = self.store.current();
        let last_delivered = current.revision();
        if tx.try_send(current).is_err() {
            debug!(%id, "Initial snapshot could not be queued");
        }
        subscribers.insert(id, Subscriber { tx, last_delivered });
        let count = subscribers.len();
        drop(subscribers);

        info!(%id, revision = last_delivered, subscribers = count, "Subscriber connected");
        Subscription {
            id,
            rx,
            store: self.store.clone(),
            last_seen: None,
        }
    }

    /// Remove a subscriber. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = self.lock().remove(&id).is_some();
        if removed {
            info!(%id, "Subscriber disconnected");
        }
        removed
    }

    /// Offer `snapshot` to every subscriber without blocking.
    pub fn on_snapshot(&self, snapshot: &Arc<Snapshot>) -> FanOut {
        let revision = snapshot.revision();
        let mut fan_out = FanOut::default();

        let mut subscribers = self.lock();
        subscribers.retain(|id, subscriber| {
            if revision <= subscriber.last_delivered {
                return true;
            }
            match subscriber.tx.try_send(Arc::clone(snapshot)) {
                Ok(()) => {
                    subscriber.last_delivered = revision;
                    fan_out.delivered = fan_out.delivered.saturating_add(1);
                    true
                }
                Err(TrySendError::Full(_)) => {
                    debug!(%id, revision, "Subscriber lagging, send dropped");
                    fan_out.lagged = fan_out.lagged.saturating_add(1);
                    true
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(%id, "Subscriber channel closed, removing");
                    fan_out.removed = fan_out.removed.saturating_add(1);
                    false
                }
            }
        });
        drop(subscribers);

        fan_out
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<SubscriberId, Subscriber>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl PublishCallback for BroadcastHub {
    fn on_publish(&self, snapshot: &Arc<Snapshot>) {
        let fan_out = self.on_snapshot(snapshot);
        debug!(
            revision = snapshot.revision(),
            delivered = fan_out.delivered,
            lagged = fan_out.lagged,
            removed = fan_out.removed,
            "Snapshot fanned out"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn snapshot(revision: u64) -> Arc<Snapshot> {
        Arc::new(Snapshot::new(revision, format!("{{\"revision\":{revision}}}")))
    }

    fn hub(buffer: usize) -> (SnapshotStore, BroadcastHub) {
        let store = SnapshotStore::new(Snapshot::new(0, String::from("{\"revision\":0}")));
        let hub = BroadcastHub::new(store.clone(), buffer);
        (store, hub)
    }

    fn publish(store: &SnapshotStore, hub: &BroadcastHub, revision: u64) -> FanOut {
        let snap = snapshot(revision);
        store.publish(Arc::clone(&snap));
        hub.on_snapshot(&snap)
    }

    #[tokio::test]
    async fn subscriber_receives_current_then_updates() {
        let (store, hub) = hub(4);
        let mut sub = hub.subscribe();
        assert_eq!(sub.recv().await.unwrap().revision(), 0);

        publish(&store, &hub, 1);
        publish(&store, &hub, 2);
        assert_eq!(sub.recv().await.unwrap().revision(), 1);
        assert_eq!(sub.recv().await.unwrap().revision(), 2);
    }

    #[tokio::test]
    async fn late_subscriber_starts_at_latest() {
        let (store, hub) = hub(1);
        publish(&store, &hub, 1);
        publish(&store, &hub, 2);

        let mut sub = hub.subscribe();
        assert_eq!(sub.recv().await.unwrap().revision(), 2);
    }

    #[tokio::test]
    async fn slow_subscriber_does_not_block_others() {
        let (store, hub) = hub(1);
        let stalled = hub.subscribe();
        let mut active = hub.subscribe();
        assert_eq!(active.recv().await.unwrap().revision(), 0);

        // `stalled` still holds revision 0 in its single slot.
        let fan_out = publish(&store, &hub, 1);
        assert_eq!(fan_out, FanOut { delivered: 1, lagged: 1, removed: 0 });
        assert_eq!(active.recv().await.unwrap().revision(), 1);

        let fan_out = publish(&store, &hub, 2);
        assert_eq!(fan_out.delivered, 1);
        assert_eq!(active.recv().await.unwrap().revision(), 2);
        assert_eq!(hub.subscriber_count(), 2);
        drop(stalled);
    }

    #[tokio::test]
    async fn lagging_subscriber_skips_to_newer_snapshot() {
        let (store, hub) = hub(1);
        let mut sub = hub.subscribe();

        // Revision 1 is dropped while 0 is queued; reading 0 off an empty
        // queue yields the store's 1 instead.
        assert_eq!(publish(&store, &hub, 1).lagged, 1);
        assert_eq!(sub.recv().await.unwrap().revision(), 1);
        publish(&store, &hub, 2);
        assert_eq!(sub.recv().await.unwrap().revision(), 2);
    }

    #[tokio::test]
    async fn reader_ends_on_latest_after_burst() {
        let (store, hub) = hub(1);
        let mut sub = hub.subscribe();
        assert_eq!(sub.recv().await.unwrap().revision(), 0);

        assert_eq!(publish(&store, &hub, 1).delivered, 1);
        assert_eq!(publish(&store, &hub, 2).lagged, 1);
        assert_eq!(publish(&store, &hub, 3).lagged, 1);

        // No further publish arrives, yet the reader still sees the last one.
        assert_eq!(sub.recv().await.unwrap().revision(), 3);
        assert!(sub.rx.is_empty());
    }

    #[tokio::test]
    async fn revision_already_read_from_store_is_skipped() {
        let (store, hub) = hub(4);
        let mut sub = hub.subscribe();
        assert_eq!(sub.recv().await.unwrap().revision(), 0);

        // The store runs ahead of the fan-out for revision 2.
        let first = snapshot(1);
        let second = snapshot(2);
        store.publish(Arc::clone(&first));
        store.publish(Arc::clone(&second));
        hub.on_snapshot(&first);
        assert_eq!(sub.recv().await.unwrap().revision(), 2);

        hub.on_snapshot(&second);
        publish(&store, &hub, 3);
        assert_eq!(sub.recv().await.unwrap().revision(), 3);
    }

    #[test]
    fn stale_revision_is_not_redelivered() {
        let (store, hub) = hub(4);
        let _sub = hub.subscribe();
        publish(&store, &hub, 1);

        let fan_out = hub.on_snapshot(&snapshot(1));
        assert_eq!(fan_out, FanOut::default());
    }

    #[test]
    fn closed_subscriber_is_removed() {
        let (store, hub) = hub(4);
        let sub = hub.subscribe();
        drop(sub);

        let fan_out = publish(&store, &hub, 1);
        assert_eq!(fan_out.removed, 1);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn unsubscribe_ends_the_stream() {
        let (_store, hub) = hub(4);
        let mut sub = hub.subscribe();
        assert!(hub.unsubscribe(sub.id()));
        assert!(!hub.unsubscribe(sub.id()));

        assert_eq!(sub.recv().await.unwrap().revision(), 0);
        assert!(sub.recv().await.is_none());
    }

    #[test]
    fn zero_buffer_is_clamped() {
        let (store, hub) = hub(0);
        let _sub = hub.subscribe();
        assert_eq!(publish(&store, &hub, 1).lagged, 1);
    }
}
