//! The single writer of the status document.
//!
//! [`EventAggregator`] owns the [`StatusDocument`] and the revision counter.
//! For each event it folds, renders at the next revision, and publishes to
//! the [`SnapshotStore`]. [`run_aggregator`] drives it from the intake
//! queue and forwards every published snapshot to the registered
//! [`PublishCallback`]s, so the fold of event N completes before event N+1
//! is touched and snapshots leave in revision order.

use std::sync::Arc;

use playstatus_types::DomainEvent;
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::document::{StatusDocument, fold};
use crate::error::StatusError;
use crate::intake::IntakeReceiver;
use crate::render::render;
use crate::store::{Snapshot, SnapshotStore};

/// What the aggregator is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorPhase {
    /// Waiting for the next event.
    Idle,
    /// Folding and publishing an event.
    Folding,
}

/// Receives every snapshot the aggregator publishes, in revision order.
pub trait PublishCallback: Send + Sync {
    /// Called after `snapshot` has become the store's current snapshot.
    fn on_publish(&self, snapshot: &Arc<Snapshot>);
}

/// A publish callback that does nothing.
pub struct NoOpPublish;

impl PublishCallback for NoOpPublish {
    fn on_publish(&self, _snapshot: &Arc<Snapshot>) {}
}

/// Folds domain events into the status document and publishes snapshots.
#[derive(Debug)]
pub struct EventAggregator {
    document: StatusDocument,
    revision: u64,
    store: SnapshotStore,
    phase: AggregatorPhase,
}

impl EventAggregator {
    /// Create an aggregator whose store holds the rendered revision-0
    /// document.
    pub fn new(game: &GameConfig) -> Result<Self, StatusError> {
        let document = StatusDocument::new(game);
        let body = render(&document, 0)?;
        Ok(Self {
            document,
            revision: 0,
            store: SnapshotStore::new(Snapshot::new(0, body)),
            phase: AggregatorPhase::Idle,
        })
    }

    /// Fold one event, render it at the next revision, and publish.
    ///
    /// On a render failure nothing is published and the revision is left
    /// unchanged; the fold itself is kept so later events build on it.
    pub fn apply(&mut self, event: &DomainEvent) -> Result<Arc<Snapshot>, StatusError> {
        self.phase = AggregatorPhase::Folding;
        let result = self.fold_and_publish(event);
        self.phase = AggregatorPhase::Idle;
        result
    }

    fn fold_and_publish(&mut self, event: &DomainEvent) -> Result<Arc<Snapshot>, StatusError> {
        self.document = fold(std::mem::take(&mut self.document), event);
        let next = self.revision.saturating_add(1);
        let body = render(&self.document, next)?;
        let snapshot = Arc::new(Snapshot::new(next, body));
        self.revision = next;
        self.store.publish(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Revision of the last published snapshot.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Handle to the store this aggregator publishes to.
    pub fn store(&self) -> SnapshotStore {
        self.store.clone()
    }

    /// Current phase.
    pub const fn phase(&self) -> AggregatorPhase {
        self.phase
    }
}

/// Drain the intake, folding each event and notifying `callbacks`.
///
/// Returns the final revision once every intake handle has been dropped
/// and the queue is empty.
pub async fn run_aggregator(
    mut aggregator: EventAggregator,
    mut intake: IntakeReceiver,
    callbacks: Vec<Arc<dyn PublishCallback>>,
) -> u64 {
    info!(
        revision = aggregator.revision(),
        callbacks = callbacks.len(),
        "Aggregator starting"
    );

    while let Some(event) = intake.recv().await {
        match aggregator.apply(&event) {
            Ok(snapshot) => {
                debug!(
                    revision = snapshot.revision(),
                    kind = event.kind_name(),
                    "Snapshot published"
                );
                for callback in &callbacks {
                    callback.on_publish(&snapshot);
                }
            }
            Err(e) => {
                warn!(kind = event.kind_name(), error = %e, "Failed to render status; publish skipped");
            }
        }
    }

    info!(revision = aggregator.revision(), "Event intake closed, aggregator stopping");
    aggregator.revision()
}
