//! Centralized error types for the quiz-maze core.
//!
//! This module defines all error types used throughout the crate, providing a
//! consistent error handling approach.

/// Main error type for the quiz-maze core.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Board parsing error: {0}")]
    Parse(#[from] ParseError),

    #[error("Answer placement error: {0}")]
    Placement(#[from] PlacementError),
}

/// Errors produced while validating host-supplied configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("No phases configured")]
    NoPhases,

    #[error("Phase {phase} has no questions")]
    EmptyPhase { phase: usize },

    #[error("Question {question:?} has no answer options")]
    NoAnswers { question: String },

    #[error("Question {question:?} has no answer flagged correct")]
    NoCorrectAnswer { question: String },

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error type for board parsing operations.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("Unknown character in board: {0}")]
    UnknownCharacter(char),

    #[error("Board row {row} is {len} cells wide, expected {expected}")]
    BadRowWidth { row: usize, len: usize, expected: usize },
}

/// Errors raised while placing answer pickups for a question.
///
/// These abort only the current question setup, never the tick loop.
#[derive(thiserror::Error, Debug)]
pub enum PlacementError {
    #[error("Not enough valid answer slots: needed {needed}, found {found}")]
    InsufficientSlots { needed: usize, found: usize },

    #[error("No reachable floor cells around the player start {0}")]
    StartUnreachable(glam::IVec2),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
