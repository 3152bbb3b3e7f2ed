//! Enumeration types carried by domain events and rendered into the
//! status document.
//!
//! Every enum renders as its variant name (e.g. `"Interpolate"`,
//! `"Color1"`), which is the form overlay clients already match on.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Game lifecycle
// ---------------------------------------------------------------------------

/// Which top-level scene the game is in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Scene {
    /// Main menu, song selection, results screen.
    #[default]
    Menu,
    /// A song is loaded and being played.
    Song,
}

/// Play state of the current song.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum PlayState {
    /// No song is loaded.
    #[default]
    Idle,
    /// The song is running.
    Playing,
    /// The song is paused.
    Paused,
    /// The song ran to completion.
    Finished,
    /// The player failed the song.
    Failed,
    /// The player left the song early.
    Quit,
}

/// How a song ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum SongOutcome {
    /// The song ran to completion.
    Finished,
    /// The player ran out of energy.
    Failed,
    /// The player left the song early.
    Quit,
}

impl From<SongOutcome> for PlayState {
    fn from(outcome: SongOutcome) -> Self {
        match outcome {
            SongOutcome::Finished => Self::Finished,
            SongOutcome::Failed => Self::Failed,
            SongOutcome::Quit => Self::Quit,
        }
    }
}

/// Score rank letter derived from the ratio of score to maximum score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Rank {
    /// 90% and above.
    #[default]
    SS,
    /// 80% and above.
    S,
    /// 65% and above.
    A,
    /// 50% and above.
    B,
    /// 35% and above.
    C,
    /// 20% and above.
    D,
    /// Below 20%.
    E,
}

impl Rank {
    /// Derive the rank for `score` out of `max_score`.
    ///
    /// A zero maximum (nothing scoreable has passed yet) counts as a
    /// perfect ratio.
    pub fn from_scores(score: u32, max_score: u32) -> Self {
        if max_score == 0 {
            return Self::SS;
        }
        let ratio = f64::from(score) / f64::from(max_score);
        if ratio >= 0.9 {
            Self::SS
        } else if ratio >= 0.8 {
            Self::S
        } else if ratio >= 0.65 {
            Self::A
        } else if ratio >= 0.5 {
            Self::B
        } else if ratio >= 0.35 {
            Self::C
        } else if ratio >= 0.2 {
            Self::D
        } else {
            Self::E
        }
    }
}

/// Song speed modifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum SongSpeed {
    /// 1.0x.
    #[default]
    Normal,
    /// 1.2x.
    Faster,
    /// 0.85x.
    Slower,
    /// 1.5x.
    SuperFast,
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

/// Kind of note object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum NoteType {
    /// Left-hand (red) note.
    #[default]
    NoteA,
    /// Right-hand (blue) note.
    NoteB,
    /// Bomb, must not be cut.
    Bomb,
}

/// Required cut direction of a note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum CutDirection {
    /// Upward swing.
    Up,
    /// Downward swing.
    Down,
    /// Leftward swing.
    Left,
    /// Rightward swing.
    Right,
    /// Up-left diagonal.
    UpLeft,
    /// Up-right diagonal.
    UpRight,
    /// Down-left diagonal.
    DownLeft,
    /// Down-right diagonal.
    DownRight,
    /// Dot note, any direction.
    #[default]
    Any,
    /// No direction (bombs).
    None,
}

/// Which saber performed a cut.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum SaberType {
    /// Left saber.
    #[default]
    SaberA,
    /// Right saber.
    SaberB,
}

// ---------------------------------------------------------------------------
// Beatmap lighting events
// ---------------------------------------------------------------------------

/// How a light color event blends with the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum TransitionType {
    /// Switch immediately.
    #[default]
    Instant,
    /// Interpolate from the previous value.
    Interpolate,
    /// Extend the previous value.
    Extend,
}

/// Environment color slot of a light.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ColorType {
    /// Primary environment color.
    #[default]
    Color0,
    /// Secondary environment color.
    Color1,
    /// White.
    ColorWhite,
}

/// Easing curve of a rotation event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum EaseType {
    /// No easing (step).
    #[default]
    None,
    /// Linear.
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in-out.
    InOutQuad,
}

/// Rotation axis of a light rotation event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Axis {
    /// X axis.
    #[default]
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

/// Direction of a light rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum RotationDirection {
    /// Shortest path.
    #[default]
    Automatic,
    /// Clockwise.
    Clockwise,
    /// Counter-clockwise.
    Counterclockwise,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rank_thresholds() {
        assert_eq!(Rank::from_scores(0, 0), Rank::SS);
        assert_eq!(Rank::from_scores(95, 100), Rank::SS);
        assert_eq!(Rank::from_scores(90, 100), Rank::SS);
        assert_eq!(Rank::from_scores(85, 100), Rank::S);
        assert_eq!(Rank::from_scores(70, 100), Rank::A);
        assert_eq!(Rank::from_scores(50, 100), Rank::B);
        assert_eq!(Rank::from_scores(40, 100), Rank::C);
        assert_eq!(Rank::from_scores(20, 100), Rank::D);
        assert_eq!(Rank::from_scores(5, 100), Rank::E);
    }

    #[test]
    fn outcome_maps_to_play_state() {
        assert_eq!(PlayState::from(SongOutcome::Failed), PlayState::Failed);
        assert_eq!(PlayState::from(SongOutcome::Quit), PlayState::Quit);
    }

    #[test]
    fn enums_render_as_variant_names() {
        let json = serde_json::to_string(&TransitionType::Interpolate).unwrap();
        assert_eq!(json, "\"Interpolate\"");
        let json = serde_json::to_string(&RotationDirection::Counterclockwise).unwrap();
        assert_eq!(json, "\"Counterclockwise\"");
    }
}
