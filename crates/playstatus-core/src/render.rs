//! Rendering the status document to its JSON wire form.
//!
//! The rendered body is what both `GET /status.json` and the push socket
//! carry. Its top level is
//!
//! ```json
//! { "version": "3.0.0", "revision": 7, "type": "LightColor", ...fields,
//!   "status": { "game": {...}, "beatmap": null, ... }, "noteCut": null }
//! ```
//!
//! The `type` tag names the most recent event. Beatmap event types carry
//! their fields from the last known lighting state; every other type
//! carries no extra fields. Absent sections render as explicit `null`
//! rather than being omitted, so a consumer can tell "not applicable" from
//! "missing".

use playstatus_types::{
    Axis, ColorType, EaseType, Modifiers, NoteCutResult, PlayerSettings, RotationDirection,
    TransitionType,
};
use serde::Serialize;

use crate::document::{
    BeatmapKind, BeatmapSection, EventKind, GameSection, LightingState, PerformanceSection,
    StatusDocument,
};
use crate::error::StatusError;

/// Wire format version.
pub const STATUS_VERSION: &str = "3.0.0";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusView<'a> {
    version: &'static str,
    revision: u64,
    #[serde(flatten)]
    event: EventView,
    status: SectionsView<'a>,
    note_cut: Option<&'a NoteCutResult>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionsView<'a> {
    game: &'a GameSection,
    beatmap: Option<&'a BeatmapSection>,
    performance: Option<&'a PerformanceSection>,
    #[serde(rename = "mod")]
    modifiers: Option<&'a Modifiers>,
    player_settings: Option<&'a PlayerSettings>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum EventView {
    Idle,
    SongStart,
    SongEnd,
    Menu,
    Pause,
    Resume,
    ScoreChanged,
    NoteCut,
    NoteFullyCut,
    NoteMissed,
    BombCut,
    BombMissed,
    ComboChanged,
    MultiplierChanged,
    EnergyChanged,
    #[serde(rename = "BPMChange")]
    BpmChange {
        bpm: f32,
    },
    #[serde(rename_all = "camelCase")]
    ColorBoost {
        boost_colors_are_on: bool,
    },
    #[serde(rename_all = "camelCase")]
    LightColor {
        group_id: i32,
        element_id: i32,
        transition_type: TransitionType,
        color_type: ColorType,
        brightness: f32,
        strobe_beat_frequency: i32,
    },
    #[serde(rename_all = "camelCase")]
    LightRotation {
        group_id: i32,
        element_id: i32,
        use_previous_event_value: bool,
        ease_type: EaseType,
        axis: Axis,
        loop_count: i32,
        rotation_direction: RotationDirection,
        rotation: f32,
    },
    SpawnRotation {
        rotation: f32,
    },
    Unknown,
}

impl EventView {
    const fn new(kind: EventKind, lighting: &LightingState) -> Self {
        match kind {
            EventKind::Idle => Self::Idle,
            EventKind::SongStart => Self::SongStart,
            EventKind::SongEnd => Self::SongEnd,
            EventKind::Menu => Self::Menu,
            EventKind::Pause => Self::Pause,
            EventKind::Resume => Self::Resume,
            EventKind::ScoreChanged => Self::ScoreChanged,
            EventKind::NoteCut => Self::NoteCut,
            EventKind::NoteFullyCut => Self::NoteFullyCut,
            EventKind::NoteMissed => Self::NoteMissed,
            EventKind::BombCut => Self::BombCut,
            EventKind::BombMissed => Self::BombMissed,
            EventKind::ComboChanged => Self::ComboChanged,
            EventKind::MultiplierChanged => Self::MultiplierChanged,
            EventKind::EnergyChanged => Self::EnergyChanged,
            EventKind::Beatmap(BeatmapKind::BpmChange) => Self::BpmChange { bpm: lighting.bpm },
            EventKind::Beatmap(BeatmapKind::ColorBoost) => Self::ColorBoost {
                boost_colors_are_on: lighting.boost_colors_are_on,
            },
            EventKind::Beatmap(BeatmapKind::LightColor) => Self::LightColor {
                group_id: lighting.group_id,
                element_id: lighting.element_id,
                transition_type: lighting.transition_type,
                color_type: lighting.color_type,
                brightness: lighting.brightness,
                strobe_beat_frequency: lighting.strobe_beat_frequency,
            },
            EventKind::Beatmap(BeatmapKind::LightRotation) => Self::LightRotation {
                group_id: lighting.group_id,
                element_id: lighting.element_id,
                use_previous_event_value: lighting.use_previous_event_value,
                ease_type: lighting.ease_type,
                axis: lighting.axis,
                loop_count: lighting.loop_count,
                rotation_direction: lighting.rotation_direction,
                rotation: lighting.rotation,
            },
            EventKind::Beatmap(BeatmapKind::SpawnRotation) => Self::SpawnRotation {
                rotation: lighting.rotation,
            },
            EventKind::Beatmap(BeatmapKind::Unknown) | EventKind::Unknown => Self::Unknown,
        }
    }
}

/// Render `document` at `revision` to its JSON body.
pub fn render(document: &StatusDocument, revision: u64) -> Result<String, StatusError> {
    let view = StatusView {
        version: STATUS_VERSION,
        revision,
        event: EventView::new(document.last_event, &document.lighting),
        status: SectionsView {
            game: &document.game,
            beatmap: document.beatmap.as_ref(),
            performance: document.performance.as_ref(),
            modifiers: document.modifiers.as_ref(),
            player_settings: document.player_settings.as_ref(),
        },
        note_cut: document.note_cut.as_ref(),
    };
    Ok(serde_json::to_string(&view)?)
}
