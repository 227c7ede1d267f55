//! Commands flowing into the session and events flowing out of it.
//!
//! The core never polls input devices or touches a canvas/audio device;
//! hosts translate raw input into [`GameCommand`]s and react to the
//! [`GameEvent`]s returned from each tick.

use glam::IVec2;
use strum_macros::Display;

use crate::direction::Direction;
use crate::session::SessionState;

/// A discrete control intent delivered by the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameCommand {
    /// Steer the player; takes effect at the next legal turning point.
    Steer(Direction),
    /// Start a new game (the `N` key).
    NewGame,
    /// Toggle the pause state (the `P` key).
    TogglePause,
    /// Toggle the persisted mute preference (the `S` key).
    ToggleSound,
}

/// A named audio cue the host should play (if sound is enabled).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AudioCue {
    Start,
    Correct,
    Wrong,
    Die,
    EatGhost,
}

/// Visual tone of a feedback message.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FeedbackTone {
    Neutral,
    Positive,
    Negative,
}

/// Identifies which agent an [`GameEvent::AgentMoved`] report is about.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AgentKind {
    Player,
    /// Enemy roster index.
    Enemy(usize),
}

/// Something the host should react to after a tick or command.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Play a named audio cue.
    Audio(AudioCue),
    /// An agent occupies a new position (sub-cell units); renderers use the
    /// pair to invalidate exactly the affected cells.
    AgentMoved { agent: AgentKind, from: IVec2, to: IVec2 },
    /// The state machine entered a new state.
    StateEntered(SessionState),
    /// HUD feedback text changed.
    Feedback { tone: FeedbackTone, message: String },
    /// A new question prompt should be displayed.
    QuestionPresented { prompt: String },
    /// A new phase began (1-based display number).
    PhaseStarted { number: usize, title: String },
    /// The countdown display changed; shown once per elapsed second.
    CountdownTick(u32),
    /// Floating score text at a board position (sub-cell units).
    ScoreAwarded { points: u32, at: IVec2 },
    /// Lives/score/streak changed; the HUD should be re-read.
    StatsChanged,
    /// The sound preference flipped; the host persists it under
    /// [`crate::constants::MUTE_PREFERENCE_KEY`].
    SoundToggled { enabled: bool },
    /// Image assets for the pending question should be fetched. The host
    /// reports each key back via `asset_loaded` with this generation.
    AssetsRequested { generation: u64, keys: Vec<String> },
    /// No lives remain; the session returned to `Waiting`.
    GameOver,
}
