//! Breadth-first distance fields used to rank enemy pursuit and retreat moves.

use std::collections::VecDeque;

use glam::IVec2;

use crate::direction::DIRECTIONS;
use crate::map::Maze;

/// Sentinel distance for cells no path reaches.
pub const UNREACHABLE: u32 = u32::MAX;

/// Per-cell shortest-hop-count map from a single target cell, respecting
/// walls and the horizontal wraparound row.
#[derive(Debug, Clone)]
pub struct DistanceField {
    values: Vec<u32>,
    width: i32,
    target: IVec2,
}

impl DistanceField {
    /// Builds hop counts outward from `target` through floor cells.
    ///
    /// Returns `None` when the target itself is not a floor cell; callers
    /// repair such targets via [`Maze::nearest_floor`] first.
    pub fn build(maze: &Maze, target: IVec2) -> Option<Self> {
        if !maze.is_floor(target) {
            return None;
        }

        let (width, height) = (maze.width(), maze.height());
        let mut values = vec![UNREACHABLE; (width * height) as usize];
        let mut queue = VecDeque::new();

        values[(target.y * width + target.x) as usize] = 0;
        queue.push_back(target);

        while let Some(cell) = queue.pop_front() {
            let base = values[(cell.y * width + cell.x) as usize];
            for dir in DIRECTIONS {
                if let Some(next) = maze.step_floor(cell, dir) {
                    let idx = (next.y * width + next.x) as usize;
                    if values[idx] == UNREACHABLE {
                        values[idx] = base + 1;
                        queue.push_back(next);
                    }
                }
            }
        }

        Some(DistanceField { values, width, target })
    }

    /// The cell this field is anchored to.
    pub fn target(&self) -> IVec2 {
        self.target
    }

    /// Hop count from `cell` to the target; [`UNREACHABLE`] for walls,
    /// disconnected cells, and out-of-bounds queries.
    pub fn get(&self, cell: IVec2) -> u32 {
        let idx = cell.y * self.width + cell.x;
        if cell.x < 0 || cell.x >= self.width || idx < 0 {
            return UNREACHABLE;
        }
        self.values.get(idx as usize).copied().unwrap_or(UNREACHABLE)
    }
}

/// Lazily rebuilt [`DistanceField`]: the cached field is reused until the
/// target cell changes or a configured tick interval elapses, whichever
/// comes first.
#[derive(Debug, Default)]
pub struct FieldCache {
    field: Option<DistanceField>,
    built_at: u64,
}

impl FieldCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the cached field, forcing a rebuild on the next [`Self::ensure`].
    pub fn invalidate(&mut self) {
        self.field = None;
    }

    /// Returns a field anchored at `target` (repaired to the nearest floor
    /// cell when the target is not walkable), rebuilding if stale.
    pub fn ensure(&mut self, maze: &Maze, target: IVec2, tick: u64, refresh_interval: u32) -> Option<&DistanceField> {
        let anchor = if maze.is_floor(target) {
            Some(target)
        } else {
            maze.nearest_floor(target)
        };
        let Some(anchor) = anchor else {
            self.field = None;
            return None;
        };

        let interval = refresh_interval.max(1) as u64;
        let stale = match &self.field {
            None => true,
            Some(field) => field.target() != anchor || tick.saturating_sub(self.built_at) >= interval,
        };

        if stale {
            if let Some(field) = DistanceField::build(maze, anchor) {
                self.field = Some(field);
                self.built_at = tick;
            }
        }
        self.field.as_ref()
    }

    /// The cached field, if any, without freshness checks.
    pub fn field(&self) -> Option<&DistanceField> {
        self.field.as_ref()
    }
}
