//! Enemy agents: movement with fractional speed carry, vulnerability and
//! capture timers, and bounded direction re-resolution against walls.

use glam::IVec2;
use smallvec::SmallVec;

use crate::constants::{
    BOARD_CELL_SIZE, CAPTURE_RECOVERY_SECONDS, CELL_UNITS, ENEMY_HOME_CELL, ENEMY_STEP_NORMAL,
    ENEMY_STEP_RETURNING, ENEMY_STEP_VULNERABLE, MAX_DIRECTION_RETRIES, TELEPORT_ROW,
    TICKS_PER_SECOND,
};
use crate::direction::Direction;
use crate::map::Maze;
use crate::motion::{self, StepBudget};

/// An enemy agent.
///
/// Enemies always have a direction of travel; when every candidate direction
/// is walled off within the retry budget they simply hold position for the
/// tick. Timers are ticks of the session clock.
#[derive(Debug, Clone)]
pub struct Ghost {
    position: IVec2,
    direction: Direction,
    vulnerable_since: Option<u64>,
    captured_since: Option<u64>,
    budget: StepBudget,
}

impl Ghost {
    pub fn new() -> Self {
        Ghost {
            position: motion::to_units(ENEMY_HOME_CELL),
            direction: Direction::Left,
            vulnerable_since: None,
            captured_since: None,
            budget: StepBudget::default(),
        }
    }

    /// Returns the enemy to its home cell with all timers cleared.
    pub fn reset(&mut self) {
        *self = Ghost::new();
    }

    /// Position in sub-cell units.
    pub fn position(&self) -> IVec2 {
        self.position
    }

    /// The cell the enemy currently occupies.
    pub fn cell(&self) -> IVec2 {
        motion::cell_of(self.position)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// A vulnerable enemy can be captured and flees the player.
    pub fn is_vulnerable(&self) -> bool {
        self.vulnerable_since.is_some()
    }

    /// A returning enemy was captured and is retreating home; it is drawn
    /// hidden and collides with nothing.
    pub fn is_returning(&self) -> bool {
        self.captured_since.is_some()
    }

    /// An enemy that ends the player's life on contact.
    pub fn is_dangerous(&self) -> bool {
        !self.is_vulnerable() && !self.is_returning()
    }

    /// Marks the enemy vulnerable and reverses it away from the player.
    pub fn make_vulnerable(&mut self, tick: u64) {
        self.vulnerable_since = Some(tick);
        self.direction = self.direction.opposite();
    }

    /// Clears vulnerability, e.g. when the power window closes.
    pub fn clear_vulnerable(&mut self) {
        self.vulnerable_since = None;
    }

    /// Marks the enemy captured; it starts retreating home at once.
    pub fn capture(&mut self, tick: u64) {
        self.captured_since = Some(tick);
        self.vulnerable_since = None;
    }

    /// Per-tick timer housekeeping: a captured enemy rejoins the chase after
    /// its recovery window.
    pub fn update(&mut self, tick: u64) {
        if let Some(since) = self.captured_since {
            if tick.saturating_sub(since) >= CAPTURE_RECOVERY_SECONDS * TICKS_PER_SECOND as u64 {
                self.captured_since = None;
                self.vulnerable_since = None;
            }
        }
    }

    /// Base step in units per tick, before the phase speed multiplier.
    fn base_step(&self) -> i32 {
        if self.is_returning() {
            ENEMY_STEP_RETURNING
        } else if self.is_vulnerable() {
            ENEMY_STEP_VULNERABLE
        } else {
            ENEMY_STEP_NORMAL
        }
    }

    /// Advances one tick. On a cell boundary `choose` picks the direction for
    /// this tick given the directions already found blocked; a choice that
    /// runs into a wall is added to the blocked list and re-resolved, up to
    /// [`MAX_DIRECTION_RETRIES`] attempts.
    pub fn step<F>(&mut self, maze: &Maze, multiplier: f64, mut choose: F)
    where
        F: FnMut(&Ghost, &[Direction]) -> Direction,
    {
        let step = self.budget.advance(self.base_step(), multiplier);
        if step == 0 {
            return;
        }
        let on_grid = motion::on_cell(self.position);
        let mut blocked: SmallVec<[Direction; 4]> = SmallVec::new();

        for _ in 0..MAX_DIRECTION_RETRIES {
            let dir = if on_grid { choose(self, &blocked) } else { self.direction };
            let delta = dir.as_ivec2();
            let pos = IVec2::new(
                motion::add_bounded(self.position.x, delta.x * step),
                motion::add_bounded(self.position.y, delta.y * step),
            );

            if on_grid && maze.is_wall(motion::next_cell(pos, dir)) {
                if blocked.contains(&dir) {
                    // The resolver is out of options; stand still this tick.
                    return;
                }
                blocked.push(dir);
                continue;
            }

            self.direction = dir;
            self.position = self.wrap(pos, dir);
            return;
        }
    }

    /// Horizontal wraparound inside the teleport lane.
    fn wrap(&self, mut pos: IVec2, dir: Direction) -> IVec2 {
        let lane = TELEPORT_ROW * CELL_UNITS;
        let right_edge = BOARD_CELL_SIZE.x as i32 * CELL_UNITS;
        if pos.y == lane {
            if dir == Direction::Right && pos.x >= right_edge {
                pos.x = -CELL_UNITS;
            } else if dir == Direction::Left && pos.x <= -CELL_UNITS {
                pos.x = right_edge;
            }
        }
        pos
    }
}

impl Default for Ghost {
    fn default() -> Self {
        Self::new()
    }
}
