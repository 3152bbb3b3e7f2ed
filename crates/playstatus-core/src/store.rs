//! Latest-snapshot publication.
//!
//! [`SnapshotStore`] holds exactly one immutable [`Snapshot`]. The
//! aggregator replaces it wholesale after every fold; readers clone the
//! `Arc` and never observe a partially written body. The slot's lock is
//! held only for the pointer swap, so readers never wait on a fold.

use std::sync::Arc;

use tokio::sync::watch;

/// One rendered revision of the status document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    revision: u64,
    body: String,
}

impl Snapshot {
    /// Wrap a rendered body.
    pub const fn new(revision: u64, body: String) -> Self {
        Self { revision, body }
    }

    /// Revision this body was rendered at.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// The rendered JSON body.
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Single-writer, many-reader holder of the latest snapshot.
///
/// Cloning the store clones a handle to the same slot.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    tx: Arc<watch::Sender<Arc<Snapshot>>>,
}

impl SnapshotStore {
    /// Create a store holding `initial`.
    pub fn new(initial: Snapshot) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self { tx: Arc::new(tx) }
    }

    /// Replace the current snapshot.
    ///
    /// Publishing never blocks on readers and succeeds whether or not any
    /// watcher exists.
    pub fn publish(&self, snapshot: Arc<Snapshot>) {
        self.tx.send_replace(snapshot);
    }

    /// The latest published snapshot.
    ///
    /// Takes the slot's read lock just long enough to clone the `Arc`.
    pub fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.tx.borrow())
    }

    /// Revision of the latest published snapshot.
    pub fn revision(&self) -> u64 {
        self.tx.borrow().revision()
    }

    /// Watch for future publications.
    pub fn watch(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use std::thread;

    use super::*;

    fn snapshot(revision: u64) -> Arc<Snapshot> {
        Arc::new(Snapshot::new(revision, format!("{{\"revision\":{revision}}}")))
    }

    #[test]
    fn current_returns_latest() {
        let store = SnapshotStore::new(Snapshot::new(0, String::from("{}")));
        assert_eq!(store.revision(), 0);
        store.publish(snapshot(1));
        store.publish(snapshot(2));
        assert_eq!(store.current().revision(), 2);
        assert_eq!(store.current().body(), "{\"revision\":2}");
    }

    #[test]
    fn held_snapshot_is_unaffected_by_publish() {
        let store = SnapshotStore::new(Snapshot::new(0, String::from("{}")));
        let held = store.current();
        store.publish(snapshot(1));
        assert_eq!(held.revision(), 0);
        assert_eq!(held.body(), "{}");
    }

    #[tokio::test]
    async fn watchers_see_publications() {
        let store = SnapshotStore::new(Snapshot::new(0, String::from("{}")));
        let mut rx = store.watch();
        store.publish(snapshot(5));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().revision(), 5);
    }

    #[test]
    fn concurrent_readers_never_see_torn_snapshots() {
        let store = SnapshotStore::new(Snapshot::new(0, String::from("{\"revision\":0}")));
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    let mut last = 0;
                    for _ in 0..2_000 {
                        let snap = store.current();
                        assert_eq!(snap.body(), format!("{{\"revision\":{}}}", snap.revision()));
                        assert!(snap.revision() >= last);
                        last = snap.revision();
                    }
                })
            })
            .collect();

        for revision in 1..=1_000 {
            store.publish(snapshot(revision));
        }
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(store.revision(), 1_000);
    }
}
