//! Newline-delimited JSON event feed.
//!
//! The host writes one [`DomainEvent`] per line to the daemon's stdin.
//! Most events go straight to the intake. Note cuts are routed through a
//! [`CutTracker`] so the cut and its later scoring report share one pooled
//! carrier, matched by note id.
//!
//! Lines are read on a dedicated OS thread ([`spawn_line_reader`]) and
//! forwarded over a channel. A read parked on that thread is not runtime
//! work, so the runtime can shut down while the host still holds stdin open.

use std::collections::BTreeMap;
use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread;

use playstatus_core::cut::{CutListener, CutTracker, PendingCut};
use playstatus_core::{EventIntake, IntakeError, PoolHandle};
use playstatus_types::{DomainEvent, NoteCutResult};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::DaemonError;

/// Logs completed cuts.
struct LoggingListener;

impl CutListener for LoggingListener {
    fn on_cut_finished(&self, result: &NoteCutResult) {
        debug!(
            note_id = result.note.note_id,
            score = result.scores.map(|s| s.total()),
            "Cut scoring finished"
        );
    }
}

/// Routes feed events to the intake.
pub struct Feed {
    intake: EventIntake,
    tracker: CutTracker,
    pending: BTreeMap<u32, PoolHandle<PendingCut>>,
    multiplier: u32,
    listener: Arc<dyn CutListener>,
}

impl Feed {
    /// Create a feed whose cut pool reserves `pool_capacity` slots.
    pub fn new(intake: EventIntake, pool_capacity: usize) -> Self {
        Self {
            tracker: CutTracker::new(intake.clone(), pool_capacity),
            intake,
            pending: BTreeMap::new(),
            multiplier: 1,
            listener: Arc::new(LoggingListener),
        }
    }

    /// Number of cuts waiting for their scoring report.
    pub const fn pending_cuts(&self) -> usize {
        self.tracker.pending_count()
    }

    /// Submit one event, pairing note cuts with their scoring reports.
    pub fn route(&mut self, event: DomainEvent) -> Result<(), IntakeError> {
        match event {
            DomainEvent::NoteCut(result) => {
                let handle =
                    self.tracker
                        .begin_cut(result, self.multiplier, Arc::clone(&self.listener))?;
                if let Some(previous) = self.pending.insert(result.note.note_id, handle) {
                    debug!(note_id = result.note.note_id, "Note cut reported twice");
                    self.tracker.release(previous);
                }
                Ok(())
            }
            DomainEvent::NoteFullyCut(result) => {
                let handle = self.pending.remove(&result.note.note_id);
                match (handle, result.scores) {
                    (Some(handle), Some(scores)) => self.tracker.finish_cut(handle, scores),
                    (handle, _) => {
                        if let Some(handle) = handle {
                            self.tracker.release(handle);
                        }
                        self.intake.submit(DomainEvent::NoteFullyCut(result))
                    }
                }
            }
            DomainEvent::MultiplierChanged { multiplier, .. } => {
                self.multiplier = multiplier;
                self.intake.submit(event)
            }
            DomainEvent::SongStart(_) | DomainEvent::SongEnd { .. } | DomainEvent::Menu => {
                self.abandon_pending();
                self.intake.submit(event)
            }
            other => self.intake.submit(other),
        }
    }

    /// Parse and route one line. Blank and malformed lines are skipped.
    pub fn handle_line(&mut self, line: &str) -> Result<(), IntakeError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        match serde_json::from_str::<DomainEvent>(line) {
            Ok(event) => self.route(event),
            Err(e) => {
                warn!(error = %e, "Skipping malformed feed line");
                Ok(())
            }
        }
    }

    fn abandon_pending(&mut self) {
        self.pending.clear();
        let abandoned = self.tracker.abandon_all();
        if abandoned > 0 {
            debug!(abandoned, "Pending cuts abandoned");
        }
    }
}

/// Receiving end of the line reader thread.
pub type LineReceiver = mpsc::Receiver<io::Result<String>>;

/// Start a detached thread that reads lines from `reader`.
///
/// At most `buffer` lines wait in the channel. The thread exits at end of
/// input, after forwarding a read error, or once the receiver is dropped.
pub fn spawn_line_reader<R>(reader: R, buffer: usize) -> Result<LineReceiver, DaemonError>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(buffer.max(1));
    thread::Builder::new()
        .name(String::from("playstatus-feed"))
        .spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        })?;
    Ok(rx)
}

/// Route lines from the reader thread until end of input.
///
/// Returns the number of lines read.
pub async fn run_feed(mut lines: LineReceiver, mut feed: Feed) -> Result<u64, DaemonError> {
    let mut count: u64 = 0;
    while let Some(line) = lines.recv().await {
        let line = line?;
        count = count.saturating_add(1);
        feed.handle_line(&line)?;
    }
    info!(lines = count, pending_cuts = feed.pending_cuts(), "Event feed ended");
    Ok(count)
}
