//! Value structs carried by domain events.
//!
//! These are plain data: song metadata, gameplay modifiers, player
//! settings, and the per-note cut measurements produced by the scoring
//! pipeline. The note types are `Copy` so they can be moved into pooled
//! carriers without touching the heap.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{CutDirection, NoteType, SaberType, SongSpeed};

// ---------------------------------------------------------------------------
// Song metadata
// ---------------------------------------------------------------------------

/// Static metadata of the beatmap being played.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase", default)]
pub struct BeatmapInfo {
    /// Song title.
    pub song_name: String,
    /// Song subtitle.
    pub song_sub_name: String,
    /// Song artist.
    pub song_author_name: String,
    /// Beatmap author.
    pub level_author_name: String,
    /// Hash of the song files, empty for built-in songs.
    pub song_hash: String,
    /// Level identifier.
    pub level_id: String,
    /// Song tempo in beats per minute.
    pub song_bpm: f32,
    /// Note jump speed.
    pub note_jump_speed: f32,
    /// Note jump start beat offset.
    pub note_jump_start_beat_offset: f32,
    /// Offset into the song at which play started, in milliseconds.
    pub song_time_offset_ms: u64,
    /// Song length in milliseconds.
    pub length_ms: u64,
    /// Difficulty name (e.g. `ExpertPlus`).
    pub difficulty: String,
    /// Beatmap characteristic (e.g. `Standard`, `OneSaber`).
    pub characteristic: String,
    /// Number of colored notes.
    pub notes_count: u32,
    /// Number of bombs.
    pub bombs_count: u32,
    /// Number of obstacles.
    pub obstacles_count: u32,
    /// Highest achievable score without modifiers.
    pub max_score: u32,
    /// Environment name.
    pub environment_name: String,
}

/// Gameplay modifiers active for the current song.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Modifiers {
    /// Total score multiplier from all modifiers.
    pub multiplier: f32,
    /// Energy never runs out; the run soft-fails instead.
    pub no_fail: bool,
    /// Any mistake fails the song.
    pub insta_fail: bool,
    /// Energy is a battery of discrete lives.
    pub battery_energy: bool,
    /// Arrows disappear before the note arrives.
    pub disappearing_arrows: bool,
    /// Notes are invisible until cut.
    pub ghost_notes: bool,
    /// Every note is a dot note.
    pub no_arrows: bool,
    /// Bombs are removed.
    pub no_bombs: bool,
    /// Obstacles are removed.
    pub no_walls: bool,
    /// Cut angle tolerance is reduced.
    pub strict_angles: bool,
    /// Notes are smaller.
    pub small_notes: bool,
    /// Pro mode scoring.
    pub pro_mode: bool,
    /// Zen mode (no notes, no score).
    pub zen_mode: bool,
    /// Song speed setting.
    pub song_speed: SongSpeed,
    /// Effective song speed multiplier.
    pub song_speed_multiplier: f32,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            no_fail: false,
            insta_fail: false,
            battery_energy: false,
            disappearing_arrows: false,
            ghost_notes: false,
            no_arrows: false,
            no_bombs: false,
            no_walls: false,
            strict_angles: false,
            small_notes: false,
            pro_mode: false,
            zen_mode: false,
            song_speed: SongSpeed::Normal,
            song_speed_multiplier: 1.0,
        }
    }
}

/// Player preferences relevant to an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct PlayerSettings {
    /// Sabers are swapped.
    pub left_handed: bool,
    /// Player height in meters.
    pub player_height: f32,
    /// Cut note debris is hidden.
    pub reduce_debris: bool,
    /// In-game HUD is hidden.
    pub no_hud: bool,
    /// Advanced HUD is shown.
    pub advanced_hud: bool,
    /// Song restarts automatically on fail.
    pub auto_restart: bool,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            left_handed: false,
            player_height: 1.8,
            reduce_debris: false,
            no_hud: false,
            advanced_hud: false,
            auto_restart: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

/// Identity and placement of a single note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase", default)]
pub struct NoteInfo {
    /// Index of the note within the beatmap.
    pub note_id: u32,
    /// Note kind.
    pub note_type: NoteType,
    /// Required cut direction.
    pub cut_direction: CutDirection,
    /// Horizontal lane (0-3).
    pub line: u32,
    /// Vertical layer (0-2).
    pub layer: u32,
    /// Seconds until the next colored note.
    pub time_to_next_note: f32,
}

/// Physical measurements of a cut, known at the moment the saber hits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct CutAccuracy {
    /// Saber was moving fast enough.
    pub speed_ok: bool,
    /// Swing matched the required direction.
    pub direction_ok: bool,
    /// The correct saber hit the note.
    pub saber_type_ok: bool,
    /// The note was cut before it was in range.
    pub was_cut_too_soon: bool,
    /// Saber which performed the cut.
    pub saber_type: SaberType,
    /// Saber speed at the cut.
    pub saber_speed: f32,
    /// Saber movement direction at the cut.
    pub saber_direction: [f32; 3],
    /// Cut timing deviation in seconds.
    pub time_deviation: f32,
    /// Angle between swing and required direction in degrees.
    pub cut_direction_deviation: f32,
    /// Cut point in world space.
    pub cut_point: [f32; 3],
    /// Cut plane normal.
    pub cut_normal: [f32; 3],
    /// Distance from the cut plane to the note center.
    pub cut_distance_to_center: f32,
}

impl CutAccuracy {
    /// Whether every correctness check passed, i.e. the cut counts as a hit.
    pub const fn all_ok(&self) -> bool {
        self.speed_ok && self.direction_ok && self.saber_type_ok && !self.was_cut_too_soon
    }
}

/// Final score components of a cut, known once the follow-through completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase", default)]
pub struct CutScores {
    /// Pre-swing score (0-70).
    pub before_cut: u32,
    /// Follow-through score (0-30).
    pub after_cut: u32,
    /// Center distance score (0-15).
    pub accuracy: u32,
    /// Combo multiplier applied to this note.
    pub multiplier: u32,
}

impl CutScores {
    /// Unmultiplied cut score.
    pub const fn raw(&self) -> u32 {
        self.before_cut
            .saturating_add(self.after_cut)
            .saturating_add(self.accuracy)
    }

    /// Cut score with the combo multiplier applied.
    pub const fn total(&self) -> u32 {
        self.raw().saturating_mul(self.multiplier)
    }
}

/// Everything known about one note cut.
///
/// `scores` is `None` while the cut's follow-through is still being
/// measured and `Some` once scoring has finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase", default)]
pub struct NoteCutResult {
    /// The note that was cut.
    pub note: NoteInfo,
    /// Measurements taken at the cut.
    pub accuracy: CutAccuracy,
    /// Final scores, once known.
    pub scores: Option<CutScores>,
}

/// Score totals reported by the scoring controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreUpdate {
    /// Score without modifier multiplier.
    pub raw_score: u32,
    /// Score with modifier multiplier.
    pub score: u32,
    /// Highest score achievable on the notes passed so far.
    pub current_max_score: u32,
}
