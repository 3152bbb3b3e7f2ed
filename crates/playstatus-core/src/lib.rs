//! Status aggregation and snapshot publication for PlayStatus.
//!
//! This crate owns the path from a domain event to a published snapshot:
//! the event is queued on the intake, folded into the status document by
//! the single aggregator task, rendered to JSON at the next revision, and
//! published to the snapshot store for the server to read and push.
//!
//! # Modules
//!
//! - [`aggregator`] -- [`EventAggregator`] and the [`run_aggregator`] loop.
//! - [`config`] -- Configuration loading from `playstatus.yaml` into
//!   strongly-typed structs.
//! - [`cut`] -- Pending note cuts held in a pool between their two reports.
//! - [`document`] -- The status document and its pure [`fold`].
//! - [`error`] -- Pipeline error types.
//! - [`intake`] -- Non-blocking event submission.
//! - [`pool`] -- [`RecyclablePool`], the allocation-free object pool.
//! - [`render`] -- JSON rendering of the document.
//! - [`store`] -- [`SnapshotStore`], the latest-snapshot slot.
//!
//! [`fold`]: document::fold

pub mod aggregator;
pub mod config;
pub mod cut;
pub mod document;
pub mod error;
pub mod intake;
pub mod pool;
pub mod render;
pub mod store;

pub use aggregator::{AggregatorPhase, EventAggregator, PublishCallback, run_aggregator};
pub use config::{ConfigError, StatusConfig};
pub use cut::{CutListener, CutTracker, PendingCut};
pub use error::{IntakeError, StatusError};
pub use intake::{EventIntake, IntakeReceiver};
pub use pool::{PoolHandle, Recyclable, RecyclablePool};
pub use store::{Snapshot, SnapshotStore};
