//! Lives, score, and streak bookkeeping, plus the power-window timer.

use crate::constants::{BONUS_LIFE_SCORE, TICKS_PER_SECOND};

/// Player statistics shown on the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub lives: i32,
    pub correct: u32,
    pub streak: u32,
    pub score: u32,
}

impl Stats {
    pub fn new(initial_lives: i32) -> Self {
        Stats { lives: initial_lives, correct: 0, streak: 0, score: 0 }
    }

    /// Adds `amount` lives, capped at `max_lives`.
    pub fn gain_lives(&mut self, amount: u32, max_lives: i32) {
        for _ in 0..amount {
            self.lives = (self.lives + 1).min(max_lives);
        }
    }

    /// Removes `amount` lives; may go to zero or below, the session treats
    /// anything non-positive as game over.
    pub fn lose_lives(&mut self, amount: u32) {
        self.lives -= amount as i32;
    }

    /// Adds to the score. Returns true when the total crossed the bonus-life
    /// threshold with this addition (the extra life is uncapped).
    pub fn add_score(&mut self, points: u32) -> bool {
        let before = self.score;
        self.score += points;
        if self.score >= BONUS_LIFE_SCORE && before < BONUS_LIFE_SCORE {
            self.lives += 1;
            return true;
        }
        false
    }
}

/// The time-limited window during which all enemies are vulnerable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PowerState {
    pub active: bool,
    pub expires: u64,
    pub duration: f64,
}

impl PowerState {
    /// Opens a window of `duration` seconds starting at `tick`.
    pub fn activate(&mut self, tick: u64, duration: f64) {
        self.active = true;
        self.duration = duration;
        self.expires = tick + (duration * TICKS_PER_SECOND as f64).round() as u64;
    }

    pub fn deactivate(&mut self) {
        *self = PowerState::default();
    }

    /// True when the window is open but its expiry tick has passed.
    pub fn is_expired(&self, tick: u64) -> bool {
        self.active && tick >= self.expires
    }

    /// Seconds left in the window, for HUD display. Zero when inactive.
    pub fn remaining_seconds(&self, tick: u64) -> f64 {
        if !self.active || tick >= self.expires {
            return 0.0;
        }
        (self.expires - tick) as f64 / TICKS_PER_SECOND as f64
    }
}
