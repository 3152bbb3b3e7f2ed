//! Non-blocking event intake.
//!
//! The host calls [`EventIntake::submit`] from whatever thread emits the
//! event. Events queue in arrival order on an unbounded channel and are
//! folded one at a time by the aggregator task, so `submit` never waits on
//! folding or on push delivery.

use playstatus_types::DomainEvent;
use tokio::sync::mpsc;

use crate::error::IntakeError;

/// Receiving end of the intake, owned by the aggregator task.
pub type IntakeReceiver = mpsc::UnboundedReceiver<DomainEvent>;

/// Create a connected intake and receiver.
pub fn channel() -> (EventIntake, IntakeReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventIntake { tx }, rx)
}

/// Cloneable producer handle for domain events.
#[derive(Debug, Clone)]
pub struct EventIntake {
    tx: mpsc::UnboundedSender<DomainEvent>,
}

impl EventIntake {
    /// Queue one event for folding.
    ///
    /// Returns [`IntakeError::Closed`] once the aggregator has stopped.
    pub fn submit(&self, event: DomainEvent) -> Result<(), IntakeError> {
        self.tx.send(event).map_err(|_closed| IntakeError::Closed)
    }

    /// Whether the aggregator has stopped receiving.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
