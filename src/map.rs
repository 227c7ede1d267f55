//! Maze model: static layout, cell classification, and reachability queries.
//!
//! The maze is the leaf dependency of the crate: movement, targeting, and
//! answer placement all consult it but never own it.

use glam::IVec2;
use pathfinding::prelude::{bfs, bfs_reach};

use crate::constants::{RAW_BOARD, TELEPORT_ROW};
use crate::direction::{Direction, DIRECTIONS};
use crate::error::ParseError;

/// An enum representing the different kinds of cells on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// A wall cell.
    Wall,
    /// An open floor cell.
    Empty,
    /// A regular pellet (sanitized to [`Cell::Empty`] on reset).
    Pellet,
    /// A power pellet (sanitized to [`Cell::Empty`] on reset).
    Power,
    /// A block: not a wall, but not walkable either.
    Block,
}

impl Cell {
    /// Floor cells are the cells agents may occupy.
    pub fn is_floor(self) -> bool {
        matches!(self, Cell::Empty | Cell::Pellet | Cell::Power)
    }

    fn from_char(c: char) -> Result<Cell, ParseError> {
        match c {
            '#' => Ok(Cell::Wall),
            '.' => Ok(Cell::Pellet),
            'o' => Ok(Cell::Power),
            'B' => Ok(Cell::Block),
            ' ' => Ok(Cell::Empty),
            _ => Err(ParseError::UnknownCharacter(c)),
        }
    }
}

/// The maze grid: an immutable parsed layout plus a mutable working copy that
/// is re-derived (and pellet-sanitized) on every level reset.
///
/// All queries are bounds-checked; out-of-bounds cells are neither wall nor
/// floor, which lets agents run one cell off-board inside the teleport row.
#[derive(Debug, Clone)]
pub struct Maze {
    layout: Vec<Cell>,
    cells: Vec<Cell>,
    width: i32,
    height: i32,
}

impl Maze {
    /// Parses a raw board into a maze. Row widths must match the first row.
    pub fn parse(rows: &[&str]) -> Result<Self, ParseError> {
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut layout = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let len = row.chars().count();
            if len != width {
                return Err(ParseError::BadRowWidth {
                    row: y,
                    len,
                    expected: width,
                });
            }
            for c in row.chars() {
                layout.push(Cell::from_char(c)?);
            }
        }

        let mut maze = Maze {
            cells: layout.clone(),
            layout,
            width: width as i32,
            height: rows.len() as i32,
        };
        maze.reset();
        Ok(maze)
    }

    /// The built-in board every session plays on.
    pub fn standard() -> Result<Self, ParseError> {
        Self::parse(&RAW_BOARD)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// The working cell at `cell`, or `None` out of bounds.
    pub fn cell_at(&self, cell: IVec2) -> Option<Cell> {
        self.in_bounds(cell).then(|| self.cells[(cell.y * self.width + cell.x) as usize])
    }

    /// Overwrites a working cell. Out-of-range writes are ignored.
    pub fn set_cell(&mut self, cell: IVec2, kind: Cell) {
        if self.in_bounds(cell) {
            self.cells[(cell.y * self.width + cell.x) as usize] = kind;
        }
    }

    pub fn is_wall(&self, cell: IVec2) -> bool {
        self.cell_at(cell) == Some(Cell::Wall)
    }

    pub fn is_floor(&self, cell: IVec2) -> bool {
        self.cell_at(cell).is_some_and(Cell::is_floor)
    }

    /// Re-derives the working grid from the immutable layout, replacing
    /// pellet and power markers with empty floor (answer pickups replace the
    /// pellet mechanic).
    pub fn reset(&mut self) {
        self.cells.clear();
        self.cells.extend(self.layout.iter().map(|&cell| match cell {
            Cell::Pellet | Cell::Power => Cell::Empty,
            other => other,
        }));
    }

    /// The neighboring cell in `dir`, wrapping horizontally on the teleport
    /// row. No floor check; the result may be out of bounds.
    pub fn wrap_step(&self, cell: IVec2, dir: Direction) -> IVec2 {
        let mut next = cell + dir.as_ivec2();
        if next.y == TELEPORT_ROW {
            if next.x < 0 {
                next.x = self.width - 1;
            } else if next.x >= self.width {
                next.x = 0;
            }
        }
        next
    }

    /// Like [`Maze::wrap_step`], but only yields walkable destinations.
    pub fn step_floor(&self, cell: IVec2, dir: Direction) -> Option<IVec2> {
        let next = self.wrap_step(cell, dir);
        self.is_floor(next).then_some(next)
    }

    /// Every floor cell reachable from `start` (inclusive), found by flood
    /// fill through floor neighbors. Empty when `start` is not floor.
    pub fn reachable_from(&self, start: IVec2) -> Vec<IVec2> {
        if !self.is_floor(start) {
            return Vec::new();
        }
        bfs_reach(start, |&cell| {
            DIRECTIONS.iter().filter_map(move |&dir| self.step_floor(cell, dir)).collect::<Vec<_>>()
        })
        .collect()
    }

    /// The closest floor cell to `origin` by hop count, searching through
    /// non-floor cells as well (wraparound-aware). Used to repair non-floor
    /// targeting anchors.
    pub fn nearest_floor(&self, origin: IVec2) -> Option<IVec2> {
        if !self.in_bounds(origin) {
            return None;
        }
        let path = bfs(
            &origin,
            |&cell| {
                DIRECTIONS
                    .iter()
                    .map(move |&dir| self.wrap_step(cell, dir))
                    .filter(|&next| self.in_bounds(next))
                    .collect::<Vec<_>>()
            },
            |&cell| self.is_floor(cell),
        )?;
        path.last().copied()
    }

    /// All floor cells, in row-major order.
    pub fn floor_cells(&self) -> Vec<IVec2> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| IVec2::new(x, y)))
            .filter(|&cell| self.is_floor(cell))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ENEMY_HOME_CELL, PLAYER_START_CELL};

    #[test]
    fn test_standard_board_parses() {
        let maze = Maze::standard().unwrap();
        assert_eq!(maze.width(), 19);
        assert_eq!(maze.height(), 22);
    }

    #[test]
    fn test_out_of_bounds_is_neither_wall_nor_floor() {
        let maze = Maze::standard().unwrap();
        let oob = IVec2::new(-1, 5);
        assert!(!maze.is_wall(oob));
        assert!(!maze.is_floor(oob));
        assert_eq!(maze.cell_at(oob), None);
    }

    #[test]
    fn test_reset_sanitizes_pellets() {
        let mut maze = Maze::standard().unwrap();
        maze.set_cell(PLAYER_START_CELL, Cell::Wall);
        maze.reset();
        assert_eq!(maze.cell_at(PLAYER_START_CELL), Some(Cell::Empty));
        // No pellet or power cell survives sanitization.
        for cell in maze.floor_cells() {
            assert_eq!(maze.cell_at(cell), Some(Cell::Empty));
        }
    }

    #[test]
    fn test_wrap_step_on_teleport_row() {
        let maze = Maze::standard().unwrap();
        let left_end = IVec2::new(0, TELEPORT_ROW);
        let right_end = IVec2::new(maze.width() - 1, TELEPORT_ROW);
        assert_eq!(maze.wrap_step(left_end, Direction::Left), right_end);
        assert_eq!(maze.wrap_step(right_end, Direction::Right), left_end);
    }

    #[test]
    fn test_start_cells_connected() {
        let maze = Maze::standard().unwrap();
        let reachable = maze.reachable_from(PLAYER_START_CELL);
        assert!(reachable.contains(&ENEMY_HOME_CELL));
        // The builtin board is fully connected.
        assert_eq!(reachable.len(), maze.floor_cells().len());
    }

    #[test]
    fn test_nearest_floor_repairs_wall_target() {
        let maze = Maze::standard().unwrap();
        // (0, 0) is a corner wall; some adjacent floor must be found.
        let repaired = maze.nearest_floor(IVec2::new(0, 0)).unwrap();
        assert!(maze.is_floor(repaired));
    }

    #[test]
    fn test_bad_row_width() {
        let err = Maze::parse(&["###", "##"]).unwrap_err();
        assert!(matches!(err, ParseError::BadRowWidth { row: 1, .. }));
    }

    #[test]
    fn test_unknown_character() {
        let err = Maze::parse(&["#Z#"]).unwrap_err();
        assert!(matches!(err, ParseError::UnknownCharacter('Z')));
    }
}
