//! Host-supplied JSON configuration: raw serde shapes, normalization with
//! documented defaults, and validation into the quiz domain types.

use glam::IVec2;
use serde::Deserialize;
use tracing::warn;

use crate::ai::{AiMode, EnemyAi};
use crate::constants::PLAYER_START_CELL;
use crate::error::ConfigError;
use crate::quiz::{Answer, Order, Phase, Question};

/// Top-level configuration document: `{ "settings": {...}, "phases": [...] }`.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    #[serde(default)]
    pub settings: RawSettings,
    #[serde(default)]
    pub phases: Vec<RawPhase>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawSettings {
    pub initial_lives: Option<f64>,
    pub max_lives: Option<f64>,
    pub life_reward_on_correct: Option<f64>,
    pub life_penalty_wrong: Option<f64>,
    pub life_penalty_ghost: Option<f64>,
    pub power_duration_seconds: Option<f64>,
    pub transition_delay_seconds: Option<f64>,
    pub answer_scale: Option<f64>,
    pub ghost_speed_modifier: Option<f64>,
    pub question_order: Option<String>,
    pub phase_order: Option<String>,
    #[serde(default)]
    pub answer_slots: Vec<RawSlot>,
    pub player_start: Option<RawSlot>,
    pub audio_root: Option<String>,
    #[serde(rename = "ghostAI", default)]
    pub ghost_ai: RawEnemyAi,
}

#[derive(Debug, Deserialize, Copy, Clone)]
pub struct RawSlot {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawEnemyAi {
    pub mode: Option<String>,
    pub path_refresh_interval: Option<f64>,
    pub random_deviation: Option<f64>,
    pub flee_multiplier: Option<f64>,
    pub use_home_tile: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPhase {
    pub id: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub questions: Vec<RawQuestion>,
    pub ghost_speed_modifier: Option<f64>,
    pub power_duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuestion {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub answers: Vec<RawAnswer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnswer {
    pub text: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub correct: bool,
    pub feedback: Option<String>,
    pub grants_power: Option<bool>,
    pub power_duration: Option<f64>,
}

/// Normalized global settings; every field has been defaulted or clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub initial_lives: i32,
    pub max_lives: i32,
    pub life_reward_on_correct: u32,
    pub life_penalty_wrong: u32,
    pub life_penalty_ghost: u32,
    pub power_duration_seconds: f64,
    pub transition_delay_seconds: f64,
    pub answer_scale: f64,
    pub ghost_speed_modifier: f64,
    pub question_order: Order,
    pub phase_order: Order,
    pub answer_slots: Vec<IVec2>,
    pub player_start: IVec2,
    pub audio_root: String,
    pub enemy_ai: EnemyAi,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            initial_lives: 3,
            max_lives: 5,
            life_reward_on_correct: 1,
            life_penalty_wrong: 1,
            life_penalty_ghost: 1,
            power_duration_seconds: 8.0,
            transition_delay_seconds: 2.0,
            answer_scale: 1.0,
            ghost_speed_modifier: 1.0,
            question_order: Order::Sequential,
            phase_order: Order::Sequential,
            answer_slots: Vec::new(),
            player_start: PLAYER_START_CELL,
            audio_root: "assets/audio/".into(),
            enemy_ai: EnemyAi::default(),
        }
    }
}

impl Settings {
    /// Applies the documented defaulting and clamping rules to a raw
    /// settings block. Unrecognized values fall back silently, mirroring a
    /// forgiving host-config loader; only AI mode typos get a warning.
    pub fn normalize(raw: RawSettings) -> Settings {
        let defaults = Settings::default();

        let initial_lives = match raw.initial_lives {
            Some(v) if v > 0.0 => v as i32,
            _ => defaults.initial_lives,
        };
        let max_lives = match raw.max_lives {
            Some(v) if v >= initial_lives as f64 => v as i32,
            _ => initial_lives.max(5),
        };

        let order = |value: Option<String>| {
            value
                .as_deref()
                .and_then(|s| s.parse::<Order>().ok())
                .unwrap_or_default()
        };

        Settings {
            initial_lives,
            max_lives,
            life_reward_on_correct: raw.life_reward_on_correct.map_or(1, |v| v.max(0.0) as u32),
            life_penalty_wrong: raw.life_penalty_wrong.map_or(1, |v| v.max(0.0) as u32),
            life_penalty_ghost: raw.life_penalty_ghost.map_or(1, |v| v.max(0.0) as u32),
            power_duration_seconds: raw.power_duration_seconds.filter(|&v| v.is_finite() && v > 0.0).unwrap_or(8.0),
            transition_delay_seconds: raw.transition_delay_seconds.filter(|&v| v.is_finite() && v > 0.0).unwrap_or(2.0),
            answer_scale: raw.answer_scale.filter(|&v| v.is_finite() && v > 0.0).unwrap_or(1.0),
            ghost_speed_modifier: raw.ghost_speed_modifier.filter(|&v| v.is_finite() && v > 0.0).unwrap_or(1.0),
            question_order: order(raw.question_order),
            phase_order: order(raw.phase_order),
            answer_slots: raw.answer_slots.iter().map(round_slot).collect(),
            player_start: raw.player_start.as_ref().map_or(PLAYER_START_CELL, round_slot),
            audio_root: raw.audio_root.unwrap_or(defaults.audio_root),
            enemy_ai: normalize_ai(raw.ghost_ai),
        }
    }
}

fn round_slot(slot: &RawSlot) -> IVec2 {
    IVec2::new(slot.x.round() as i32, slot.y.round() as i32)
}

fn normalize_ai(raw: RawEnemyAi) -> EnemyAi {
    let defaults = EnemyAi::default();
    let mode = match raw.mode.as_deref() {
        None => defaults.mode,
        Some(s) => s.parse::<AiMode>().unwrap_or_else(|_| {
            warn!(mode = s, "unknown enemy AI mode, falling back to chase");
            AiMode::Chase
        }),
    };
    EnemyAi {
        mode,
        path_refresh_interval: match raw.path_refresh_interval {
            Some(v) if v.is_finite() && v >= 1.0 => v as u32,
            _ => defaults.path_refresh_interval,
        },
        random_deviation: raw
            .random_deviation
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(0.0)
            .min(1.0),
        flee_multiplier: raw
            .flee_multiplier
            .filter(|&v| v.is_finite() && v > 0.0)
            .unwrap_or(defaults.flee_multiplier),
        use_home_tile: raw.use_home_tile != Some(false),
    }
}

/// A fully validated game configuration.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub settings: Settings,
    pub phases: Vec<Phase>,
}

impl GameConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json(text: &str) -> Result<GameConfig, ConfigError> {
        let raw: RawConfig = serde_json::from_str(text)?;
        GameConfig::from_raw(raw)
    }

    /// Validates a raw document: phases and questions must be non-empty and
    /// every question needs at least one answer flagged correct.
    pub fn from_raw(raw: RawConfig) -> Result<GameConfig, ConfigError> {
        if raw.phases.is_empty() {
            return Err(ConfigError::NoPhases);
        }

        let settings = Settings::normalize(raw.settings);
        let mut phases = Vec::with_capacity(raw.phases.len());
        for (index, raw_phase) in raw.phases.into_iter().enumerate() {
            if raw_phase.questions.is_empty() {
                return Err(ConfigError::EmptyPhase { phase: index + 1 });
            }
            let title = raw_phase
                .title
                .or(raw_phase.id)
                .unwrap_or_else(|| (index + 1).to_string());

            let mut questions = Vec::with_capacity(raw_phase.questions.len());
            for raw_question in raw_phase.questions {
                questions.push(validate_question(raw_question)?);
            }
            phases.push(Phase {
                title,
                questions,
                ghost_speed_modifier: raw_phase.ghost_speed_modifier.filter(|&v| v.is_finite() && v > 0.0),
                power_duration: raw_phase.power_duration.filter(|&v| v.is_finite() && v > 0.0),
            });
        }

        Ok(GameConfig { settings, phases })
    }
}

fn validate_question(raw: RawQuestion) -> Result<Question, ConfigError> {
    if raw.answers.is_empty() {
        return Err(ConfigError::NoAnswers { question: raw.prompt });
    }
    if !raw.answers.iter().any(|a| a.correct) {
        return Err(ConfigError::NoCorrectAnswer { question: raw.prompt });
    }
    let answers = raw
        .answers
        .into_iter()
        .map(|a| Answer {
            text: a.text,
            image: a.image,
            correct: a.correct,
            feedback: a.feedback,
            grants_power: a.grants_power != Some(false),
            power_duration: a.power_duration.filter(|&v| v.is_finite() && v > 0.0),
        })
        .collect();
    Ok(Question { prompt: raw.prompt, answers })
}
