//! Domain events emitted by the host game.
//!
//! [`DomainEvent`] is the single intake type of the status pipeline. On the
//! wire it is an internally tagged JSON object keyed by `"kind"`; beatmap
//! lighting events nest a second tag, `"type"`. A `kind` or `type` this
//! build does not recognize deserializes to the `Unknown` variant instead
//! of failing, so a newer host never breaks an older status server.

use serde::{Deserialize, Serialize};

use crate::enums::{
    Axis, ColorType, EaseType, RotationDirection, SongOutcome, TransitionType,
};
use crate::structs::{
    BeatmapInfo, Modifiers, NoteCutResult, NoteInfo, PlayerSettings, ScoreUpdate,
};

/// Everything known when a song starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SongStart {
    /// Beatmap metadata.
    pub beatmap: BeatmapInfo,
    /// Active gameplay modifiers.
    pub modifiers: Modifiers,
    /// Player preferences.
    pub player_settings: PlayerSettings,
}

/// A discrete occurrence in the host game that may change visible status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DomainEvent {
    /// A song was loaded and started.
    SongStart(Box<SongStart>),
    /// The song ended.
    SongEnd {
        /// How it ended.
        outcome: SongOutcome,
    },
    /// The game returned to the menu.
    Menu,
    /// The song was paused.
    #[serde(rename_all = "camelCase")]
    Pause {
        /// Song time at the pause, in milliseconds.
        song_time_ms: u64,
    },
    /// The song was resumed.
    #[serde(rename_all = "camelCase")]
    Resume {
        /// Song time at the resume, in milliseconds.
        song_time_ms: u64,
    },
    /// Score totals changed.
    ScoreChanged(ScoreUpdate),
    /// A note was cut; final scores are not known yet.
    NoteCut(NoteCutResult),
    /// Scoring for a previously cut note finished.
    NoteFullyCut(NoteCutResult),
    /// A note passed without being cut.
    NoteMissed(NoteInfo),
    /// A bomb was cut.
    BombCut(NoteInfo),
    /// A bomb passed without being cut.
    BombMissed(NoteInfo),
    /// The combo counter changed.
    ComboChanged {
        /// Current combo.
        combo: u32,
    },
    /// The combo multiplier or its progress changed.
    MultiplierChanged {
        /// Current multiplier (1, 2, 4 or 8).
        multiplier: u32,
        /// Progress towards the next multiplier, 0.0 to 1.0.
        progress: f32,
    },
    /// The energy bar changed.
    EnergyChanged {
        /// Current energy, 0.0 to 1.0.
        energy: f32,
    },
    /// A beatmap lighting or timing event fired.
    Beatmap(BeatmapEvent),
    /// An event this build does not recognize.
    #[serde(other)]
    Unknown,
}

impl DomainEvent {
    /// Short name of the event kind, for logging.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::SongStart(_) => "songStart",
            Self::SongEnd { .. } => "songEnd",
            Self::Menu => "menu",
            Self::Pause { .. } => "pause",
            Self::Resume { .. } => "resume",
            Self::ScoreChanged(_) => "scoreChanged",
            Self::NoteCut(_) => "noteCut",
            Self::NoteFullyCut(_) => "noteFullyCut",
            Self::NoteMissed(_) => "noteMissed",
            Self::BombCut(_) => "bombCut",
            Self::BombMissed(_) => "bombMissed",
            Self::ComboChanged { .. } => "comboChanged",
            Self::MultiplierChanged { .. } => "multiplierChanged",
            Self::EnergyChanged { .. } => "energyChanged",
            Self::Beatmap(_) => "beatmap",
            Self::Unknown => "unknown",
        }
    }
}

/// Light color event payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LightColorEvent {
    /// Light group.
    pub group_id: i32,
    /// Light element within the group.
    pub element_id: i32,
    /// Blend with the previous event.
    pub transition_type: TransitionType,
    /// Color slot.
    pub color_type: ColorType,
    /// Brightness, 0.0 upwards.
    pub brightness: f32,
    /// Strobe frequency in beats, 0 for none.
    pub strobe_beat_frequency: i32,
}

/// Light rotation event payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LightRotationEvent {
    /// Light group.
    pub group_id: i32,
    /// Light element within the group.
    pub element_id: i32,
    /// Keep the previous rotation value.
    pub use_previous_event_value: bool,
    /// Easing curve.
    pub ease_type: EaseType,
    /// Rotation axis.
    pub axis: Axis,
    /// Extra full rotations.
    pub loop_count: i32,
    /// Rotation direction.
    pub rotation_direction: RotationDirection,
    /// Target rotation in degrees.
    pub rotation: f32,
}

/// A beatmap event (v3 beatmap format).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BeatmapEvent {
    /// Tempo change.
    #[serde(rename = "BPMChange")]
    BpmChange {
        /// New tempo.
        bpm: f32,
    },
    /// Boost colors toggled.
    #[serde(rename_all = "camelCase")]
    ColorBoost {
        /// Whether boost colors are now on.
        boost_colors_are_on: bool,
    },
    /// A light changed color.
    LightColor(LightColorEvent),
    /// A light rotated.
    LightRotation(LightRotationEvent),
    /// The note spawn direction rotated (360/90 degree maps).
    SpawnRotation {
        /// Rotation in degrees.
        rotation: f32,
    },
    /// A basic or unrecognized beatmap event.
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<DomainEvent> {
        serde_json::from_str(json).ok()
    }

    #[test]
    fn parses_tagged_events() {
        assert_eq!(
            parse(r#"{"kind":"comboChanged","combo":12}"#),
            Some(DomainEvent::ComboChanged { combo: 12 })
        );
        assert_eq!(
            parse(r#"{"kind":"pause","songTimeMs":4200}"#),
            Some(DomainEvent::Pause { song_time_ms: 4200 })
        );
    }

    #[test]
    fn parses_nested_beatmap_event() {
        let event = parse(
            r#"{"kind":"beatmap","type":"LightColor","groupId":1,"elementId":2,"brightness":0.5}"#,
        );
        let Some(DomainEvent::Beatmap(BeatmapEvent::LightColor(light))) = event else {
            panic!("expected a light color event, got {event:?}");
        };
        assert_eq!(light.group_id, 1);
        assert_eq!(light.element_id, 2);
        assert_eq!(light.color_type, ColorType::Color0);
    }

    #[test]
    fn parses_bpm_change_tag() {
        assert_eq!(
            parse(r#"{"kind":"beatmap","type":"BPMChange","bpm":120.0}"#),
            Some(DomainEvent::Beatmap(BeatmapEvent::BpmChange { bpm: 120.0 }))
        );
    }

    #[test]
    fn unrecognized_kinds_become_unknown() {
        assert_eq!(
            parse(r#"{"kind":"obstacleEnter"}"#),
            Some(DomainEvent::Unknown)
        );
        assert_eq!(
            parse(r#"{"kind":"beatmap","type":"Basic"}"#),
            Some(DomainEvent::Beatmap(BeatmapEvent::Unknown))
        );
    }

    #[test]
    fn kind_names_are_camel_case() {
        assert_eq!(DomainEvent::Menu.kind_name(), "menu");
        assert_eq!(
            DomainEvent::Beatmap(BeatmapEvent::Unknown).kind_name(),
            "beatmap"
        );
    }
}
