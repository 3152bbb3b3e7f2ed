//! Pending note cuts on the scoring hot path.
//!
//! A note cut is reported twice: once when the saber hits (accuracy known)
//! and once when the swing's follow-through has been measured (scores
//! known). Between the two, the cut is held in a [`PendingCut`] borrowed
//! from a [`RecyclablePool`] together with the [`CutListener`] to notify on
//! completion. [`CutTracker`] ties the pool to the event intake so both
//! reports reach the aggregator.

use std::sync::Arc;

use playstatus_types::{CutScores, DomainEvent, NoteCutResult};
use tracing::debug;

use crate::error::IntakeError;
use crate::intake::EventIntake;
use crate::pool::{PoolHandle, Recyclable, RecyclablePool};

/// Notified when scoring for a pending cut finishes.
pub trait CutListener: Send + Sync {
    /// Called with the completed cut, scores filled in.
    fn on_cut_finished(&self, result: &NoteCutResult);
}

/// A listener that ignores completions.
pub struct NoOpListener;

impl CutListener for NoOpListener {
    fn on_cut_finished(&self, _result: &NoteCutResult) {}
}

/// Pooled carrier for one in-flight note cut.
#[derive(Default)]
pub struct PendingCut {
    result: NoteCutResult,
    multiplier: u32,
    listener: Option<Arc<dyn CutListener>>,
}

impl PendingCut {
    /// The cut as measured so far.
    pub const fn result(&self) -> &NoteCutResult {
        &self.result
    }

    /// Combo multiplier at the moment of the cut.
    pub const fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Record the final scores and notify the listener.
    ///
    /// The listener is detached so it fires at most once.
    pub fn finish(&mut self, scores: CutScores) -> NoteCutResult {
        self.result.scores = Some(scores);
        if let Some(listener) = self.listener.take() {
            listener.on_cut_finished(&self.result);
        }
        self.result
    }
}

impl Recyclable for PendingCut {
    type Init = (NoteCutResult, u32, Arc<dyn CutListener>);

    fn spawn(init: Self::Init) -> Self {
        let mut cut = Self::default();
        cut.reinitialize(init);
        cut
    }

    fn reinitialize(&mut self, (result, multiplier, listener): Self::Init) {
        self.result = result;
        self.multiplier = multiplier;
        self.listener = Some(listener);
    }

    fn reset(&mut self) {
        self.result = NoteCutResult::default();
        self.multiplier = 0;
        self.listener = None;
    }
}

/// Drives pending cuts from the host's scoring context.
///
/// Both methods are non-blocking; the only allocation on the steady-state
/// path is the intake queue node.
pub struct CutTracker {
    pool: RecyclablePool<PendingCut>,
    intake: EventIntake,
}

impl CutTracker {
    /// Create a tracker with `capacity` pool slots reserved.
    pub fn new(intake: EventIntake, capacity: usize) -> Self {
        Self {
            pool: RecyclablePool::with_capacity(capacity),
            intake,
        }
    }

    /// Report a cut and hold it until its scoring finishes.
    ///
    /// Emits [`DomainEvent::NoteCut`].
    pub fn begin_cut(
        &mut self,
        result: NoteCutResult,
        multiplier: u32,
        listener: Arc<dyn CutListener>,
    ) -> Result<PoolHandle<PendingCut>, IntakeError> {
        self.intake.submit(DomainEvent::NoteCut(result))?;
        Ok(self.pool.acquire((result, multiplier, listener)))
    }

    /// Complete a held cut: notify its listener, emit
    /// [`DomainEvent::NoteFullyCut`], and return it to the pool.
    pub fn finish_cut(
        &mut self,
        handle: PoolHandle<PendingCut>,
        scores: CutScores,
    ) -> Result<(), IntakeError> {
        let finished = self.pool.get_mut(&handle).map(|cut| cut.finish(scores));
        self.pool.release(handle);
        match finished {
            Some(result) => self.intake.submit(DomainEvent::NoteFullyCut(result)),
            None => {
                debug!("Finished cut was no longer pending");
                Ok(())
            }
        }
    }

    /// Return a pending cut to the pool without finishing it. Its listener
    /// is dropped unfired.
    pub fn release(&mut self, handle: PoolHandle<PendingCut>) -> bool {
        self.pool.release(handle)
    }

    /// Drop every pending cut without notifying listeners, e.g. when the
    /// song ends with cuts still in flight.
    pub fn abandon_all(&mut self) -> usize {
        self.pool.despawn_all()
    }

    /// Borrow a pending cut.
    pub fn pending(&self, handle: &PoolHandle<PendingCut>) -> Option<&PendingCut> {
        self.pool.get(handle)
    }

    /// Number of cuts awaiting their scores.
    pub const fn pending_count(&self) -> usize {
        self.pool.live_count()
    }
}
