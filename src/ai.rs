//! Enemy direction selection: distance-field ranking with configurable
//! randomness, plus the fallback chain used when no ranked choice exists.

use glam::IVec2;
use rand::Rng;
use smallvec::SmallVec;

use crate::direction::{Direction, DIRECTIONS};
use crate::field::{DistanceField, FieldCache, UNREACHABLE};
use crate::map::Maze;

/// How enemies pick directions at cell boundaries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, strum_macros::EnumString, strum_macros::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AiMode {
    /// Uniform choice among open directions.
    Random,
    /// Distance-field pursuit (and retreat while vulnerable).
    #[default]
    Chase,
    /// Chase, but each decision takes the random branch with probability 0.35.
    Hybrid,
}

/// Probability that a hybrid-mode decision ignores the distance field.
const HYBRID_RANDOM_CHANCE: f64 = 0.35;

/// Validated enemy AI configuration, immutable for the duration of a phase.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyAi {
    pub mode: AiMode,
    /// Ticks between forced pursuit-field rebuilds.
    pub path_refresh_interval: u32,
    /// Probability of taking the second-best ranked candidate.
    pub random_deviation: f64,
    /// Widens the pool of acceptable flee directions; candidates within this
    /// factor of the best distance are drawn from uniformly.
    pub flee_multiplier: f64,
    /// Whether captured enemies retreat along a home-anchored field.
    pub use_home_tile: bool,
}

impl Default for EnemyAi {
    fn default() -> Self {
        EnemyAi {
            mode: AiMode::Chase,
            path_refresh_interval: 6,
            random_deviation: 0.0,
            flee_multiplier: 1.5,
            use_home_tile: true,
        }
    }
}

/// The pair of cached distance fields enemies steer by: one anchored to the
/// player (pursuit and flee), one to the enemy home cell (retreat).
#[derive(Debug, Default)]
pub struct Targeting {
    pub chase: FieldCache,
    pub home: FieldCache,
}

impl Targeting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops both cached fields; called on level resets.
    pub fn invalidate(&mut self) {
        self.chase.invalidate();
        self.home.invalidate();
    }
}

/// Per-decision view of the enemy consulting the AI.
#[derive(Debug, Copy, Clone)]
pub struct AiQuery {
    pub cell: IVec2,
    pub direction: Direction,
    pub vulnerable: bool,
    pub returning: bool,
}

#[derive(Debug, Copy, Clone)]
struct Candidate {
    direction: Direction,
    value: u32,
    straight: bool,
}

/// Ranks open candidate directions by distance field and picks one, or
/// `None` when the field offers no guidance (the caller then falls back to
/// the random policy).
///
/// Pursuing enemies minimize distance to the player; vulnerable enemies
/// maximize it; returning enemies minimize distance to home.
pub fn suggest<R: Rng>(
    ai: &EnemyAi,
    maze: &Maze,
    targeting: &Targeting,
    query: &AiQuery,
    blocked: &[Direction],
    rng: &mut R,
) -> Option<Direction> {
    if ai.mode == AiMode::Random {
        return None;
    }
    if ai.mode == AiMode::Hybrid && rng.random_bool(HYBRID_RANDOM_CHANCE) {
        return None;
    }

    let fleeing = query.vulnerable && !query.returning;
    let field: &DistanceField = if query.returning && ai.use_home_tile {
        targeting.home.field()?
    } else {
        targeting.chase.field()?
    };

    if field.get(query.cell) == UNREACHABLE {
        return None;
    }

    let mut candidates: SmallVec<[Candidate; 4]> = SmallVec::new();
    for dir in DIRECTIONS {
        if blocked.contains(&dir) {
            continue;
        }
        let Some(next) = maze.step_floor(query.cell, dir) else { continue };
        let value = field.get(next);
        if value == UNREACHABLE {
            continue;
        }
        candidates.push(Candidate { direction: dir, value, straight: dir == query.direction });
    }
    if candidates.is_empty() {
        return None;
    }

    // Pursuit and retreat want the smallest distance, fleeing the largest;
    // ties prefer continuing straight.
    candidates.sort_by(|a, b| {
        let ord = if fleeing { b.value.cmp(&a.value) } else { a.value.cmp(&b.value) };
        ord.then_with(|| b.straight.cmp(&a.straight))
    });

    if ai.random_deviation > 0.0 && candidates.len() > 1 && rng.random_bool(ai.random_deviation.min(1.0)) {
        return Some(candidates[1].direction);
    }

    if fleeing && ai.flee_multiplier > 0.0 && candidates.len() > 1 {
        let best = candidates[0].value as f64;
        let pool: SmallVec<[Direction; 4]> = candidates
            .iter()
            .filter(|c| c.value as f64 * ai.flee_multiplier >= best)
            .map(|c| c.direction)
            .collect();
        if pool.len() > 1 {
            return Some(pool[rng.random_range(0..pool.len())]);
        }
    }

    Some(candidates[0].direction)
}

/// Uniform choice among open, non-blocked directions; when every open
/// direction is blocked, all four become eligible again so a direction is
/// always produced.
pub fn random_direction<R: Rng>(maze: &Maze, cell: IVec2, blocked: &[Direction], rng: &mut R) -> Direction {
    let open: SmallVec<[Direction; 4]> = DIRECTIONS
        .iter()
        .copied()
        .filter(|dir| !blocked.contains(dir) && maze.step_floor(cell, *dir).is_some())
        .collect();
    if open.is_empty() {
        DIRECTIONS[rng.random_range(0..DIRECTIONS.len())]
    } else {
        open[rng.random_range(0..open.len())]
    }
}

/// Full direction-resolution chain for one enemy decision: ranked AI
/// suggestion, then random policy, then continuing straight, with left as
/// the final fallback.
pub fn resolve<R: Rng>(
    ai: &EnemyAi,
    maze: &Maze,
    targeting: &Targeting,
    query: &AiQuery,
    blocked: &[Direction],
    rng: &mut R,
) -> Direction {
    if let Some(dir) = suggest(ai, maze, targeting, query, blocked, rng) {
        if !blocked.contains(&dir) {
            return dir;
        }
    }
    let dir = random_direction(maze, query.cell, blocked, rng);
    if !blocked.contains(&dir) {
        return dir;
    }
    if !blocked.contains(&query.direction) {
        return query.direction;
    }
    Direction::Left
}
