//! Sub-cell coordinate helpers shared by the player and enemy movement code.
//!
//! Agents live in "units": ten units per cell, so a position is grid-aligned
//! exactly when both coordinates are multiples of [`CELL_UNITS`].

use glam::IVec2;

use crate::constants::CELL_UNITS;
use crate::direction::Direction;

/// True when `pos` sits exactly on a cell boundary on both axes. Turning and
/// wall checks only apply at these positions.
pub fn on_cell(pos: IVec2) -> bool {
    pos.x % CELL_UNITS == 0 && pos.y % CELL_UNITS == 0
}

/// The cell a unit position occupies, rounding each axis to the nearest cell
/// center (ties round up).
pub fn cell_of(pos: IVec2) -> IVec2 {
    IVec2::new(round_to_cell(pos.x), round_to_cell(pos.y))
}

/// Converts a cell coordinate to its grid-aligned unit position.
pub fn to_units(cell: IVec2) -> IVec2 {
    cell * CELL_UNITS
}

/// The cell an agent at `pos` is about to enter when traveling in `dir`:
/// the moving axis rounds toward the next boundary in the direction of
/// travel, the perpendicular axis rounds to the nearest cell.
pub fn next_cell(pos: IVec2, dir: Direction) -> IVec2 {
    match dir {
        Direction::Right => IVec2::new(ceil_to_cell(pos.x), round_to_cell(pos.y)),
        Direction::Left => IVec2::new(floor_to_cell(pos.x), round_to_cell(pos.y)),
        Direction::Down => IVec2::new(round_to_cell(pos.x), ceil_to_cell(pos.y)),
        Direction::Up => IVec2::new(round_to_cell(pos.x), floor_to_cell(pos.y)),
    }
}

/// Adds `delta` to a single-axis position without letting a mid-cell agent
/// skip past the boundary it is approaching. Aligned positions move freely.
/// The remainder is Euclidean so the clamp also holds at negative
/// coordinates inside the teleport lane.
pub fn add_bounded(pos: i32, delta: i32) -> i32 {
    let rem = pos.rem_euclid(CELL_UNITS);
    if rem == 0 {
        return pos + delta;
    }
    let moved = rem + delta;
    if moved > CELL_UNITS {
        pos + (CELL_UNITS - rem)
    } else if moved < 0 {
        pos - rem
    } else {
        pos + delta
    }
}

/// Fractional step accumulator: per-tick distances are scaled by a speed
/// multiplier and the sub-unit remainder carries into the next tick, so the
/// long-run average speed matches the multiplier exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepBudget {
    carry: f64,
}

impl StepBudget {
    /// Whole units to move this tick for a `base`-unit step under
    /// `multiplier`. Never negative, and capped at [`CELL_UNITS`]: wall
    /// checks happen at boundary moments, so an agent may cross at most one
    /// boundary per tick. Whole units beyond the cap are dropped (only the
    /// sub-unit fraction carries), so a capped tick never banks a later
    /// burst.
    pub fn advance(&mut self, base: i32, multiplier: f64) -> i32 {
        let raw = base as f64 * multiplier + self.carry;
        let whole = raw.floor();
        self.carry = raw - whole;
        (whole as i32).clamp(0, CELL_UNITS)
    }

    pub fn reset(&mut self) {
        self.carry = 0.0;
    }
}

fn floor_to_cell(v: i32) -> i32 {
    v.div_euclid(CELL_UNITS)
}

fn ceil_to_cell(v: i32) -> i32 {
    v.div_euclid(CELL_UNITS) + if v.rem_euclid(CELL_UNITS) == 0 { 0 } else { 1 }
}

fn round_to_cell(v: i32) -> i32 {
    (2 * v + CELL_UNITS).div_euclid(2 * CELL_UNITS)
}
