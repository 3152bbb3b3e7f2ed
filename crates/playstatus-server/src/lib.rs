//! HTTP and `WebSocket` surface for PlayStatus.
//!
//! This crate provides an Axum server that exposes:
//!
//! - **Pull endpoint** (`GET /status.json`) serving the latest snapshot
//!   straight from the [`SnapshotStore`]
//! - **Push endpoint** (`GET /socket`) streaming every newer snapshot to
//!   `WebSocket` clients through the [`BroadcastHub`]
//!
//! Every other path answers `404` with an empty body.
//!
//! # Architecture
//!
//! The pull path never touches the hub, so stalled push clients cannot
//! starve it. The hub is registered with the aggregator as a
//! [`PublishCallback`] and fans each snapshot out with non-blocking sends.
//!
//! [`SnapshotStore`]: playstatus_core::SnapshotStore
//! [`PublishCallback`]: playstatus_core::PublishCallback

pub mod handlers;
pub mod hub;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use hub::{BroadcastHub, FanOut, Subscription};
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{StartupError, spawn_server};
pub use state::AppState;
