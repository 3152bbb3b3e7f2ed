//! The mutable status document and the fold that advances it.
//!
//! [`fold`] is a pure, total function from `(StatusDocument, &DomainEvent)`
//! to the next document. Fields an event does not mention keep their last
//! known value. The only wholesale resets are explicit: [`DomainEvent::SongStart`]
//! starts fresh per-song state and [`DomainEvent::Menu`] returns to the idle
//! menu document.

use playstatus_types::{
    Axis, BeatmapEvent, BeatmapInfo, ColorType, DomainEvent, EaseType, Modifiers, NoteCutResult,
    NoteInfo, PlayState, PlayerSettings, Rank, RotationDirection, Scene, ScoreUpdate, SongStart,
    TransitionType,
};
use serde::Serialize;

use crate::config::GameConfig;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Process-wide game state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSection {
    /// Version of this status plugin.
    pub plugin_version: String,
    /// Version of the host game.
    pub game_version: String,
    /// Current scene.
    pub scene: Scene,
    /// Play state of the current song.
    pub play_state: PlayState,
}

/// The beatmap being played plus its runtime position.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatmapSection {
    /// Static beatmap metadata.
    #[serde(flatten)]
    pub info: BeatmapInfo,
    /// Whether the song is paused.
    pub paused: bool,
    /// Song time at the last pause or resume, in milliseconds.
    pub song_time_ms: u64,
}

/// Live player performance for the current song.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSection {
    /// Score without modifier multiplier.
    pub raw_score: u32,
    /// Score with modifier multiplier.
    pub score: u32,
    /// Highest achievable score on the notes passed so far.
    pub current_max_score: u32,
    /// Rank letter.
    pub rank: Rank,
    /// Colored notes that have passed the player.
    pub passed_notes: u32,
    /// Notes cut correctly.
    pub hit_notes: u32,
    /// Notes missed or cut badly.
    pub missed_notes: u32,
    /// Final score of the most recent fully scored cut.
    pub last_note_score: u32,
    /// Bombs that have passed the player.
    pub passed_bombs: u32,
    /// Bombs cut.
    pub hit_bombs: u32,
    /// Current combo.
    pub combo: u32,
    /// Highest combo this song.
    pub max_combo: u32,
    /// Combo multiplier.
    pub multiplier: u32,
    /// Progress towards the next multiplier.
    pub multiplier_progress: f32,
    /// Energy, 0.0 to 1.0.
    pub energy: f32,
    /// Energy ran out under No Fail.
    pub soft_failed: bool,
}

impl PerformanceSection {
    /// Fresh performance for a song played with `modifiers`.
    pub const fn new(modifiers: &Modifiers) -> Self {
        let energy = if modifiers.battery_energy || modifiers.insta_fail {
            1.0
        } else {
            0.5
        };
        Self {
            raw_score: 0,
            score: 0,
            current_max_score: 0,
            rank: Rank::SS,
            passed_notes: 0,
            hit_notes: 0,
            missed_notes: 0,
            last_note_score: 0,
            passed_bombs: 0,
            hit_bombs: 0,
            combo: 0,
            max_combo: 0,
            multiplier: 1,
            multiplier_progress: 0.0,
            energy,
            soft_failed: false,
        }
    }
}

/// Last known values of every beatmap event field.
///
/// Each beatmap event overwrites only its own fields; the rest persist until
/// a later event overwrites them or the document is reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingState {
    /// Tempo from the last BPM change.
    pub bpm: f32,
    /// Boost colors flag from the last color boost.
    pub boost_colors_are_on: bool,
    /// Group of the last light color or rotation event.
    pub group_id: i32,
    /// Element of the last light color or rotation event.
    pub element_id: i32,
    /// Transition of the last light color event.
    pub transition_type: TransitionType,
    /// Color of the last light color event.
    pub color_type: ColorType,
    /// Brightness of the last light color event.
    pub brightness: f32,
    /// Strobe frequency of the last light color event.
    pub strobe_beat_frequency: i32,
    /// Previous-value flag of the last rotation event.
    pub use_previous_event_value: bool,
    /// Easing of the last rotation event.
    pub ease_type: EaseType,
    /// Axis of the last rotation event.
    pub axis: Axis,
    /// Loop count of the last rotation event.
    pub loop_count: i32,
    /// Direction of the last rotation event.
    pub rotation_direction: RotationDirection,
    /// Rotation of the last light or spawn rotation event.
    pub rotation: f32,
}

impl Default for LightingState {
    fn default() -> Self {
        Self {
            bpm: 0.0,
            boost_colors_are_on: false,
            group_id: -1,
            element_id: -1,
            transition_type: TransitionType::Instant,
            color_type: ColorType::Color0,
            brightness: 0.0,
            strobe_beat_frequency: 0,
            use_previous_event_value: false,
            ease_type: EaseType::None,
            axis: Axis::X,
            loop_count: 0,
            rotation_direction: RotationDirection::Automatic,
            rotation: 0.0,
        }
    }
}

impl LightingState {
    fn apply(&mut self, event: &BeatmapEvent) {
        match *event {
            BeatmapEvent::BpmChange { bpm } => self.bpm = bpm,
            BeatmapEvent::ColorBoost {
                boost_colors_are_on,
            } => self.boost_colors_are_on = boost_colors_are_on,
            BeatmapEvent::LightColor(light) => {
                self.group_id = light.group_id;
                self.element_id = light.element_id;
                self.transition_type = light.transition_type;
                self.color_type = light.color_type;
                self.brightness = light.brightness;
                self.strobe_beat_frequency = light.strobe_beat_frequency;
            }
            BeatmapEvent::LightRotation(rotation) => {
                self.group_id = rotation.group_id;
                self.element_id = rotation.element_id;
                self.use_previous_event_value = rotation.use_previous_event_value;
                self.ease_type = rotation.ease_type;
                self.axis = rotation.axis;
                self.loop_count = rotation.loop_count;
                self.rotation_direction = rotation.rotation_direction;
                self.rotation = rotation.rotation;
            }
            BeatmapEvent::SpawnRotation { rotation } => self.rotation = rotation,
            BeatmapEvent::Unknown => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Event kind
// ---------------------------------------------------------------------------

/// Beatmap event variant reflected by the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatmapKind {
    /// Tempo change.
    BpmChange,
    /// Boost colors toggled.
    ColorBoost,
    /// Light color.
    LightColor,
    /// Light rotation.
    LightRotation,
    /// Spawn rotation.
    SpawnRotation,
    /// Unrecognized beatmap event.
    Unknown,
}

/// The kind of the most recent event folded into the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventKind {
    /// Nothing has been folded yet.
    #[default]
    Idle,
    /// Song started.
    SongStart,
    /// Song ended.
    SongEnd,
    /// Returned to menu.
    Menu,
    /// Paused.
    Pause,
    /// Resumed.
    Resume,
    /// Score changed.
    ScoreChanged,
    /// Note cut.
    NoteCut,
    /// Note fully scored.
    NoteFullyCut,
    /// Note missed.
    NoteMissed,
    /// Bomb cut.
    BombCut,
    /// Bomb missed.
    BombMissed,
    /// Combo changed.
    ComboChanged,
    /// Multiplier changed.
    MultiplierChanged,
    /// Energy changed.
    EnergyChanged,
    /// Beatmap event.
    Beatmap(BeatmapKind),
    /// Unrecognized event.
    Unknown,
}

impl EventKind {
    /// Kind of `event`.
    pub const fn of(event: &DomainEvent) -> Self {
        match event {
            DomainEvent::SongStart(_) => Self::SongStart,
            DomainEvent::SongEnd { .. } => Self::SongEnd,
            DomainEvent::Menu => Self::Menu,
            DomainEvent::Pause { .. } => Self::Pause,
            DomainEvent::Resume { .. } => Self::Resume,
            DomainEvent::ScoreChanged(_) => Self::ScoreChanged,
            DomainEvent::NoteCut(_) => Self::NoteCut,
            DomainEvent::NoteFullyCut(_) => Self::NoteFullyCut,
            DomainEvent::NoteMissed(_) => Self::NoteMissed,
            DomainEvent::BombCut(_) => Self::BombCut,
            DomainEvent::BombMissed(_) => Self::BombMissed,
            DomainEvent::ComboChanged { .. } => Self::ComboChanged,
            DomainEvent::MultiplierChanged { .. } => Self::MultiplierChanged,
            DomainEvent::EnergyChanged { .. } => Self::EnergyChanged,
            DomainEvent::Beatmap(beatmap) => Self::Beatmap(match beatmap {
                BeatmapEvent::BpmChange { .. } => BeatmapKind::BpmChange,
                BeatmapEvent::ColorBoost { .. } => BeatmapKind::ColorBoost,
                BeatmapEvent::LightColor(_) => BeatmapKind::LightColor,
                BeatmapEvent::LightRotation(_) => BeatmapKind::LightRotation,
                BeatmapEvent::SpawnRotation { .. } => BeatmapKind::SpawnRotation,
                BeatmapEvent::Unknown => BeatmapKind::Unknown,
            }),
            DomainEvent::Unknown => Self::Unknown,
        }
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The versioned aggregate owned by the aggregator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusDocument {
    /// Game section, always present.
    pub game: GameSection,
    /// Current beatmap, while a song is loaded.
    pub beatmap: Option<BeatmapSection>,
    /// Live performance, while a song is loaded.
    pub performance: Option<PerformanceSection>,
    /// Active modifiers, while a song is loaded.
    pub modifiers: Option<Modifiers>,
    /// Player settings, while a song is loaded.
    pub player_settings: Option<PlayerSettings>,
    /// Most recent note cut of the current song.
    pub note_cut: Option<NoteCutResult>,
    /// Last known beatmap event values.
    pub lighting: LightingState,
    /// Kind of the most recent event.
    pub last_event: EventKind,
}

impl StatusDocument {
    /// The idle menu document for a game with the given versions.
    pub fn new(game: &GameConfig) -> Self {
        Self {
            game: GameSection {
                plugin_version: game.plugin_version.clone(),
                game_version: game.game_version.clone(),
                scene: Scene::Menu,
                play_state: PlayState::Idle,
            },
            ..Self::default()
        }
    }

    fn start_song(&mut self, start: &SongStart) {
        self.game.scene = Scene::Song;
        self.game.play_state = PlayState::Playing;
        self.beatmap = Some(BeatmapSection {
            info: start.beatmap.clone(),
            paused: false,
            song_time_ms: start.beatmap.song_time_offset_ms,
        });
        self.performance = Some(PerformanceSection::new(&start.modifiers));
        self.modifiers = Some(start.modifiers);
        self.player_settings = Some(start.player_settings);
        self.note_cut = None;
        self.lighting = LightingState::default();
    }

    fn return_to_menu(&mut self) {
        self.game.scene = Scene::Menu;
        self.game.play_state = PlayState::Idle;
        self.beatmap = None;
        self.performance = None;
        self.modifiers = None;
        self.player_settings = None;
        self.note_cut = None;
        self.lighting = LightingState::default();
    }

    fn set_paused(&mut self, paused: bool, song_time_ms: u64) {
        self.game.play_state = if paused {
            PlayState::Paused
        } else {
            PlayState::Playing
        };
        if let Some(beatmap) = self.beatmap.as_mut() {
            beatmap.paused = paused;
            beatmap.song_time_ms = song_time_ms;
        }
    }

    fn with_performance(&mut self, update: impl FnOnce(&mut PerformanceSection)) {
        if let Some(performance) = self.performance.as_mut() {
            update(performance);
        }
    }

    fn record_score(&mut self, update: &ScoreUpdate) {
        self.with_performance(|p| {
            p.raw_score = update.raw_score;
            p.score = update.score;
            p.current_max_score = update.current_max_score;
            p.rank = Rank::from_scores(update.score, update.current_max_score);
        });
    }

    fn record_cut(&mut self, result: &NoteCutResult) {
        let hit = result.accuracy.all_ok();
        self.with_performance(|p| {
            p.passed_notes = p.passed_notes.saturating_add(1);
            if hit {
                p.hit_notes = p.hit_notes.saturating_add(1);
            } else {
                p.missed_notes = p.missed_notes.saturating_add(1);
            }
        });
        self.note_cut = Some(*result);
    }

    fn record_full_cut(&mut self, result: &NoteCutResult) {
        if let Some(scores) = result.scores {
            self.with_performance(|p| p.last_note_score = scores.total());
        }
        self.note_cut = Some(*result);
    }

    fn record_miss(&mut self, _note: &NoteInfo) {
        self.with_performance(|p| {
            p.passed_notes = p.passed_notes.saturating_add(1);
            p.missed_notes = p.missed_notes.saturating_add(1);
        });
    }

    fn record_energy(&mut self, energy: f32) {
        let no_fail = self.modifiers.is_some_and(|m| m.no_fail);
        self.with_performance(|p| {
            p.energy = energy;
            if no_fail && energy <= 0.0 {
                p.soft_failed = true;
            }
        });
    }
}

/// Apply one event to a document, producing the next document.
pub fn fold(mut document: StatusDocument, event: &DomainEvent) -> StatusDocument {
    match event {
        DomainEvent::SongStart(start) => document.start_song(start),
        DomainEvent::SongEnd { outcome } => document.game.play_state = PlayState::from(*outcome),
        DomainEvent::Menu => document.return_to_menu(),
        DomainEvent::Pause { song_time_ms } => document.set_paused(true, *song_time_ms),
        DomainEvent::Resume { song_time_ms } => document.set_paused(false, *song_time_ms),
        DomainEvent::ScoreChanged(update) => document.record_score(update),
        DomainEvent::NoteCut(result) => document.record_cut(result),
        DomainEvent::NoteFullyCut(result) => document.record_full_cut(result),
        DomainEvent::NoteMissed(note) => document.record_miss(note),
        DomainEvent::BombCut(_) => document.with_performance(|p| {
            p.passed_bombs = p.passed_bombs.saturating_add(1);
            p.hit_bombs = p.hit_bombs.saturating_add(1);
        }),
        DomainEvent::BombMissed(_) => document.with_performance(|p| {
            p.passed_bombs = p.passed_bombs.saturating_add(1);
        }),
        DomainEvent::ComboChanged { combo } => document.with_performance(|p| {
            p.combo = *combo;
            p.max_combo = p.max_combo.max(*combo);
        }),
        DomainEvent::MultiplierChanged {
            multiplier,
            progress,
        } => document.with_performance(|p| {
            p.multiplier = *multiplier;
            p.multiplier_progress = *progress;
        }),
        DomainEvent::EnergyChanged { energy } => document.record_energy(*energy),
        DomainEvent::Beatmap(beatmap) => document.lighting.apply(beatmap),
        DomainEvent::Unknown => {}
    }
    document.last_event = EventKind::of(event);
    document
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use playstatus_types::{
        CutAccuracy, CutScores, LightColorEvent, LightRotationEvent, SongOutcome,
    };

    use super::*;

    fn song_start() -> DomainEvent {
        DomainEvent::SongStart(Box::new(SongStart {
            beatmap: BeatmapInfo {
                song_name: String::from("Escape"),
                song_bpm: 175.0,
                notes_count: 400,
                ..BeatmapInfo::default()
            },
            modifiers: Modifiers::default(),
            player_settings: PlayerSettings::default(),
        }))
    }

    fn playing() -> StatusDocument {
        fold(StatusDocument::new(&GameConfig::default()), &song_start())
    }

    fn good_cut() -> NoteCutResult {
        NoteCutResult {
            accuracy: CutAccuracy {
                speed_ok: true,
                direction_ok: true,
                saber_type_ok: true,
                ..CutAccuracy::default()
            },
            ..NoteCutResult::default()
        }
    }

    #[test]
    fn new_document_is_idle_menu() {
        let doc = StatusDocument::new(&GameConfig::default());
        assert_eq!(doc.game.scene, Scene::Menu);
        assert_eq!(doc.game.play_state, PlayState::Idle);
        assert_eq!(doc.last_event, EventKind::Idle);
        assert!(doc.beatmap.is_none());
        assert_eq!(doc.lighting.group_id, -1);
    }

    #[test]
    fn song_start_populates_sections() {
        let doc = playing();
        assert_eq!(doc.game.scene, Scene::Song);
        assert_eq!(doc.game.play_state, PlayState::Playing);
        assert_eq!(doc.beatmap.as_ref().unwrap().info.song_name, "Escape");
        assert_eq!(doc.performance.unwrap().energy, 0.5);
        assert_eq!(doc.last_event, EventKind::SongStart);
    }

    #[test]
    fn battery_energy_starts_full() {
        let event = DomainEvent::SongStart(Box::new(SongStart {
            modifiers: Modifiers {
                battery_energy: true,
                ..Modifiers::default()
            },
            ..SongStart::default()
        }));
        let doc = fold(StatusDocument::default(), &event);
        assert_eq!(doc.performance.unwrap().energy, 1.0);
    }

    #[test]
    fn score_updates_rank() {
        let doc = fold(
            playing(),
            &DomainEvent::ScoreChanged(ScoreUpdate {
                raw_score: 700,
                score: 700,
                current_max_score: 1000,
            }),
        );
        let performance = doc.performance.unwrap();
        assert_eq!(performance.score, 700);
        assert_eq!(performance.rank, Rank::A);
    }

    #[test]
    fn cuts_and_misses_are_counted() {
        let mut bad = good_cut();
        bad.accuracy.direction_ok = false;

        let mut doc = playing();
        doc = fold(doc, &DomainEvent::NoteCut(good_cut()));
        doc = fold(doc, &DomainEvent::NoteCut(bad));
        doc = fold(doc, &DomainEvent::NoteMissed(NoteInfo::default()));
        doc = fold(doc, &DomainEvent::BombCut(NoteInfo::default()));
        doc = fold(doc, &DomainEvent::BombMissed(NoteInfo::default()));

        let p = doc.performance.unwrap();
        assert_eq!(p.passed_notes, 3);
        assert_eq!(p.hit_notes, 1);
        assert_eq!(p.missed_notes, 2);
        assert_eq!(p.passed_bombs, 2);
        assert_eq!(p.hit_bombs, 1);
        assert_eq!(doc.note_cut, Some(bad));
    }

    #[test]
    fn full_cut_records_last_note_score() {
        let mut result = good_cut();
        result.scores = Some(CutScores {
            before_cut: 70,
            after_cut: 30,
            accuracy: 15,
            multiplier: 2,
        });
        let doc = fold(playing(), &DomainEvent::NoteFullyCut(result));
        assert_eq!(doc.performance.unwrap().last_note_score, 230);
        assert_eq!(doc.note_cut.unwrap().scores, result.scores);
    }

    #[test]
    fn combo_tracks_maximum() {
        let mut doc = playing();
        for combo in [5, 12, 0, 3] {
            doc = fold(doc, &DomainEvent::ComboChanged { combo });
        }
        let p = doc.performance.unwrap();
        assert_eq!(p.combo, 3);
        assert_eq!(p.max_combo, 12);
    }

    #[test]
    fn energy_depletion_soft_fails_under_no_fail() {
        let start = DomainEvent::SongStart(Box::new(SongStart {
            modifiers: Modifiers {
                no_fail: true,
                ..Modifiers::default()
            },
            ..SongStart::default()
        }));
        let doc = fold(StatusDocument::default(), &start);
        let doc = fold(doc, &DomainEvent::EnergyChanged { energy: 0.0 });
        assert!(doc.performance.unwrap().soft_failed);

        let doc = fold(playing(), &DomainEvent::EnergyChanged { energy: 0.0 });
        assert!(!doc.performance.unwrap().soft_failed);
    }

    #[test]
    fn pause_and_resume_track_song_time() {
        let doc = fold(playing(), &DomainEvent::Pause { song_time_ms: 4200 });
        assert_eq!(doc.game.play_state, PlayState::Paused);
        assert!(doc.beatmap.as_ref().unwrap().paused);

        let doc = fold(doc, &DomainEvent::Resume { song_time_ms: 4200 });
        assert_eq!(doc.game.play_state, PlayState::Playing);
        assert_eq!(doc.beatmap.as_ref().unwrap().song_time_ms, 4200);
        assert!(!doc.beatmap.as_ref().unwrap().paused);
    }

    #[test]
    fn rotation_persists_across_bpm_change() {
        let rotate = DomainEvent::Beatmap(BeatmapEvent::LightRotation(LightRotationEvent {
            group_id: 4,
            rotation: 90.0,
            ..LightRotationEvent::default()
        }));
        let doc = fold(playing(), &rotate);
        let doc = fold(doc, &DomainEvent::Beatmap(BeatmapEvent::BpmChange { bpm: 120.0 }));
        assert_eq!(doc.lighting.bpm, 120.0);
        assert_eq!(doc.lighting.rotation, 90.0);
        assert_eq!(doc.lighting.group_id, 4);
        assert_eq!(doc.last_event, EventKind::Beatmap(BeatmapKind::BpmChange));
    }

    #[test]
    fn spawn_rotation_overwrites_rotation_only() {
        let light = DomainEvent::Beatmap(BeatmapEvent::LightColor(LightColorEvent {
            group_id: 1,
            element_id: 2,
            ..LightColorEvent::default()
        }));
        let doc = fold(playing(), &light);
        let doc = fold(
            doc,
            &DomainEvent::Beatmap(BeatmapEvent::SpawnRotation { rotation: 15.0 }),
        );
        assert_eq!(doc.lighting.rotation, 15.0);
        assert_eq!(doc.lighting.group_id, 1);
        assert_eq!(doc.lighting.element_id, 2);
    }

    #[test]
    fn song_end_keeps_performance() {
        let doc = fold(playing(), &DomainEvent::ComboChanged { combo: 9 });
        let doc = fold(
            doc,
            &DomainEvent::SongEnd {
                outcome: SongOutcome::Failed,
            },
        );
        assert_eq!(doc.game.play_state, PlayState::Failed);
        assert_eq!(doc.performance.unwrap().combo, 9);
    }

    #[test]
    fn menu_resets_song_state() {
        let doc = fold(
            playing(),
            &DomainEvent::Beatmap(BeatmapEvent::ColorBoost {
                boost_colors_are_on: true,
            }),
        );
        let doc = fold(doc, &DomainEvent::Menu);
        assert_eq!(doc.game.scene, Scene::Menu);
        assert!(doc.beatmap.is_none());
        assert!(doc.performance.is_none());
        assert_eq!(doc.lighting, LightingState::default());
        assert_eq!(doc.game.plugin_version, GameConfig::default().plugin_version);
    }

    #[test]
    fn unknown_event_only_changes_kind() {
        let before = playing();
        let after = fold(before.clone(), &DomainEvent::Unknown);
        assert_eq!(after.last_event, EventKind::Unknown);
        assert_eq!(after.performance, before.performance);
        assert_eq!(after.lighting, before.lighting);
    }

    #[test]
    fn performance_events_in_menu_are_ignored() {
        let doc = fold(
            StatusDocument::default(),
            &DomainEvent::ComboChanged { combo: 3 },
        );
        assert!(doc.performance.is_none());
        assert_eq!(doc.last_event, EventKind::ComboChanged);
    }
}
