//! The player agent: steering intent, grid-constrained movement, and
//! teleport-lane wraparound.

use glam::IVec2;

use crate::constants::{BOARD_CELL_SIZE, CELL_UNITS, PLAYER_START_CELL, PLAYER_STEP, TELEPORT_ROW};
use crate::direction::Direction;
use crate::map::Maze;
use crate::motion;

/// The player-controlled agent.
///
/// `direction` is the direction of travel; `None` means the player ran into a
/// wall and is stopped until a new legal steer arrives. `desired` is the last
/// steer command, held until it becomes legal. `facing` never goes `None` so
/// hosts always have a sprite orientation to draw.
#[derive(Debug, Clone)]
pub struct Player {
    position: IVec2,
    direction: Option<Direction>,
    desired: Option<Direction>,
    facing: Direction,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Player {
            position: motion::to_units(PLAYER_START_CELL),
            direction: Some(Direction::Left),
            desired: Some(Direction::Left),
            facing: Direction::Left,
        }
    }

    /// Returns the player to its spawn, traveling left.
    pub fn reset(&mut self) {
        *self = Player::new();
    }

    /// Position in sub-cell units.
    pub fn position(&self) -> IVec2 {
        self.position
    }

    /// The cell the player currently occupies.
    pub fn cell(&self) -> IVec2 {
        motion::cell_of(self.position)
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Sprite orientation: the last direction actually traveled.
    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// Records a steering intent. It is applied on the next [`Self::step`]
    /// where it is legal: colinear reversals apply anywhere, perpendicular
    /// turns only on a cell boundary with open floor ahead.
    pub fn steer(&mut self, dir: Direction) {
        self.desired = Some(dir);
    }

    /// Advances one tick. Stops (direction `None`) when a wall is reached on
    /// a cell boundary; wraps horizontally when leaving the teleport lane.
    pub fn step(&mut self, maze: &Maze) {
        let mut next_pos: Option<IVec2> = None;

        if let Some(due) = self.desired {
            if self.direction != Some(due) {
                let candidate = self.position + due.as_ivec2() * PLAYER_STEP;
                let colinear = self.direction.is_some_and(|dir| dir.is_colinear(due));
                if colinear || (motion::on_cell(self.position) && maze.is_floor(motion::next_cell(candidate, due))) {
                    self.direction = Some(due);
                    next_pos = Some(candidate);
                }
            }
        }

        let Some(dir) = self.direction else { return };
        let mut pos = next_pos.unwrap_or(self.position + dir.as_ivec2() * PLAYER_STEP);

        if motion::on_cell(self.position) && maze.is_wall(motion::next_cell(pos, dir)) {
            self.direction = None;
            return;
        }
        self.facing = dir;

        let lane = TELEPORT_ROW * CELL_UNITS;
        let right_edge = BOARD_CELL_SIZE.x as i32 * CELL_UNITS;
        if pos.y == lane {
            if dir == Direction::Right && pos.x >= right_edge {
                pos.x = -CELL_UNITS;
            } else if dir == Direction::Left && pos.x <= -(CELL_UNITS + PLAYER_STEP) {
                pos.x = right_edge;
            }
        }

        self.position = pos;
    }
}
