//! Shared type definitions for PlayStatus.
//!
//! This crate is the single source of truth for the values that flow from
//! the host game into the status pipeline and back out in the rendered
//! status document. Value types are exported to `TypeScript` via `ts-rs`
//! for overlay authors.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers (push subscribers)
//! - [`enums`] -- Enumeration types (scene, play state, rank, lighting)
//! - [`structs`] -- Song metadata, modifiers, and note cut values
//! - [`events`] -- The [`DomainEvent`] intake union

pub mod enums;
pub mod events;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    Axis, ColorType, CutDirection, EaseType, NoteType, PlayState, Rank, RotationDirection,
    SaberType, Scene, SongOutcome, SongSpeed, TransitionType,
};
pub use events::{BeatmapEvent, DomainEvent, LightColorEvent, LightRotationEvent, SongStart};
pub use ids::SubscriberId;
pub use structs::{
    BeatmapInfo, CutAccuracy, CutScores, Modifiers, NoteCutResult, NoteInfo, PlayerSettings,
    ScoreUpdate,
};
