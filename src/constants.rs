//! This module contains all the constants used by the simulation core.

use glam::{IVec2, UVec2};

/// Fixed simulation rate, in ticks per second. The host timer is expected to
/// invoke [`crate::session::GameSession::tick`] at this rate.
pub const TICKS_PER_SECOND: u32 = 30;

/// Sub-cell coordinate granularity: 10 units span one grid cell, so an agent
/// is aligned with the grid exactly when both coordinates are multiples of 10.
pub const CELL_UNITS: i32 = 10;

/// The size of the game board, in cells.
pub const BOARD_CELL_SIZE: UVec2 = UVec2::new(19, 22);

/// The single row on which crossing the left/right boundary wraps the agent
/// to the opposite side.
pub const TELEPORT_ROW: i32 = 10;

/// The cell the player occupies at the start of every level.
pub const PLAYER_START_CELL: IVec2 = IVec2::new(9, 12);

/// The cell enemies spawn at, and retreat toward after being captured.
pub const ENEMY_HOME_CELL: IVec2 = IVec2::new(9, 8);

/// Player step size, in sub-cell units per tick.
pub const PLAYER_STEP: i32 = 2;

/// Enemy base step sizes, in sub-cell units per tick (before the phase speed
/// multiplier is applied).
pub const ENEMY_STEP_NORMAL: i32 = 2;
pub const ENEMY_STEP_VULNERABLE: i32 = 1;
pub const ENEMY_STEP_RETURNING: i32 = 4;

/// Seconds displayed by the pre-level countdown.
pub const COUNTDOWN_SECONDS: u32 = 5;

/// Length of the death animation, in ticks.
pub const DEATH_TICKS: u64 = (TICKS_PER_SECOND as u64) * 2;

/// Length of the freeze after an enemy is captured, in ticks.
pub const EATEN_PAUSE_TICKS: u64 = (TICKS_PER_SECOND as u64) / 3;

/// Seconds a captured enemy spends retreating before resuming normal behavior.
pub const CAPTURE_RECOVERY_SECONDS: u64 = 3;

/// Agent-to-agent collision radius, in sub-cell units.
pub const COLLISION_RADIUS: i32 = 10;

/// Score awarded per capture is `capture_index * CAPTURE_SCORE_STEP` within
/// one power window.
pub const CAPTURE_SCORE_STEP: u32 = 50;

/// Crossing this score grants a single bonus life.
pub const BONUS_LIFE_SCORE: u32 = 10_000;

/// Upper bound on direction-resolution retries within a single tick.
pub const MAX_DIRECTION_RETRIES: usize = 4;

/// Key under which the host persists the boolean mute preference.
pub const MUTE_PREFERENCE_KEY: &str = "soundDisabled";

/// The raw layout of the game board, as rows of characters.
///
/// `#` wall, `.` pellet, `o` power pellet, `B` block, space empty. Pellets and
/// power pellets are sanitized to empty on reset; answer pickups replace the
/// pellet mechanic in this game. Row 10 is the teleport row: both ends are
/// open floor.
pub const RAW_BOARD: [&str; BOARD_CELL_SIZE.y as usize] = [
    "###################",
    "#o.......#.......o#",
    "#.##.###.#.###.##.#",
    "#.................#",
    "#.##.#.#####.#.##.#",
    "#....#...#...#....#",
    "####.#.......#.####",
    "####.#.## ##.#.####",
    "#....#.#B B#.#....#",
    "#.##.#.#####.#.##.#",
    "    .....#.....    ",
    "####.##.###.##.####",
    "#.................#",
    "#.##.###.#.###.##.#",
    "#....#...#...#....#",
    "##.#.###.#.###.#.##",
    "#..##.##.#.##.##..#",
    "#o.#...........#.o#",
    "#.#.##.##.##.##.#.#",
    "#.................#",
    "#.#####.#.#.#####.#",
    "###################",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_board_dimensions() {
        assert_eq!(RAW_BOARD.len(), BOARD_CELL_SIZE.y as usize);
        for row in RAW_BOARD.iter() {
            assert_eq!(row.len(), BOARD_CELL_SIZE.x as usize);
        }
    }

    #[test]
    fn test_raw_board_boundaries() {
        assert!(RAW_BOARD[0].chars().all(|c| c == '#'));
        assert!(RAW_BOARD[RAW_BOARD.len() - 1].chars().all(|c| c == '#'));
    }

    #[test]
    fn test_teleport_row_open() {
        let row = RAW_BOARD[TELEPORT_ROW as usize];
        assert_eq!(row.chars().next().unwrap(), ' ');
        assert_eq!(row.chars().last().unwrap(), ' ');
    }

    #[test]
    fn test_start_cells_are_floor() {
        for cell in [PLAYER_START_CELL, ENEMY_HOME_CELL] {
            let c = RAW_BOARD[cell.y as usize].as_bytes()[cell.x as usize] as char;
            assert!(matches!(c, '.' | 'o' | ' '), "cell {cell} is {c:?}");
        }
    }

    #[test]
    fn test_power_pellet_count() {
        let count: usize = RAW_BOARD.iter().map(|row| row.chars().filter(|&c| c == 'o').count()).sum();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_timing_constants() {
        assert_eq!(DEATH_TICKS, 60);
        assert_eq!(EATEN_PAUSE_TICKS, 10);
    }
}
