use glam::IVec2;
use mazequiz::constants::{BOARD_CELL_SIZE, CELL_UNITS, ENEMY_HOME_CELL, TELEPORT_ROW};
use mazequiz::direction::{Direction, DIRECTIONS};
use mazequiz::field::{DistanceField, UNREACHABLE};
use mazequiz::ghost::Ghost;
use mazequiz::map::Maze;
use mazequiz::motion::{self, StepBudget};
use mazequiz::player::Player;
use pretty_assertions::assert_eq;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

/// The direction that moves `cell` one hop closer to the field's target,
/// skipping anything in `blocked`.
fn descend(maze: &Maze, field: &DistanceField, cell: IVec2, blocked: &[Direction]) -> Option<Direction> {
    DIRECTIONS
        .iter()
        .copied()
        .filter(|dir| !blocked.contains(dir))
        .filter_map(|dir| {
            let next = maze.step_floor(cell, dir)?;
            let value = field.get(next);
            (value != UNREACHABLE).then_some((dir, value))
        })
        .min_by_key(|&(_, value)| value)
        .map(|(dir, _)| dir)
}

#[test]
fn test_ghost_navigates_to_arbitrary_targets() {
    let maze = Maze::standard().expect("builtin board parses");
    let targets = [
        IVec2::new(1, 1),
        IVec2::new(17, 20),
        IVec2::new(0, TELEPORT_ROW),
    ];

    for target in targets {
        let field = DistanceField::build(&maze, target).expect("target is floor");
        let mut ghost = Ghost::new();
        let mut arrived = false;

        for _ in 0..1000 {
            ghost.step(&maze, 1.0, |g, blocked| {
                descend(&maze, &field, g.cell(), blocked).unwrap_or_else(|| g.direction())
            });
            assert!(!maze.is_wall(ghost.cell()), "enemy in wall at {}", ghost.cell());
            if ghost.cell() == target && motion::on_cell(ghost.position()) {
                arrived = true;
                break;
            }
        }
        assert!(arrived, "enemy never reached {target}");
    }
}

#[test]
fn test_ghost_random_walk_stays_on_floor() {
    let maze = Maze::standard().expect("builtin board parses");
    let mut rng = SmallRng::seed_from_u64(7);
    let mut ghost = Ghost::new();

    for _ in 0..3000 {
        ghost.step(&maze, 1.0, |g, blocked| {
            let open: Vec<Direction> = DIRECTIONS
                .iter()
                .copied()
                .filter(|dir| !blocked.contains(dir) && maze.step_floor(g.cell(), *dir).is_some())
                .collect();
            open.choose(&mut rng).copied().unwrap_or_else(|| g.direction())
        });
        assert!(!maze.is_wall(ghost.cell()), "enemy in wall at {}", ghost.cell());
    }
}

#[test]
fn test_player_random_steering_stays_on_floor() {
    let maze = Maze::standard().expect("builtin board parses");
    let mut rng = SmallRng::seed_from_u64(11);
    let mut player = Player::new();

    for step in 0..3000 {
        if step % 7 == 0 {
            if let Some(dir) = DIRECTIONS.choose(&mut rng) {
                player.steer(*dir);
            }
        }
        player.step(&maze);
        assert!(!maze.is_wall(player.cell()), "player in wall at {}", player.cell());
    }
}

#[test]
fn test_player_navigates_and_wraps_through_the_lane() {
    let maze = Maze::standard().expect("builtin board parses");
    let lane_west = IVec2::new(0, TELEPORT_ROW);
    let field = DistanceField::build(&maze, lane_west).expect("lane end is floor");
    let mut player = Player::new();

    let mut at_lane = false;
    for _ in 0..2000 {
        if motion::on_cell(player.position()) {
            if let Some(dir) = descend(&maze, &field, player.cell(), &[]) {
                player.steer(dir);
            }
        }
        player.step(&maze);
        if player.cell() == lane_west && motion::on_cell(player.position()) {
            at_lane = true;
            break;
        }
    }
    assert!(at_lane, "player never reached the teleport lane");

    // Keep heading left off the board; the wrap lands on the east edge.
    player.steer(Direction::Left);
    let right_edge = BOARD_CELL_SIZE.x as i32 * CELL_UNITS;
    let mut wrapped = false;
    for _ in 0..12 {
        player.step(&maze);
        if player.position() == IVec2::new(right_edge, TELEPORT_ROW * CELL_UNITS) {
            wrapped = true;
        }
    }
    assert!(wrapped, "player never wrapped to the east edge");
}

#[test]
fn test_enemy_home_is_connected_to_player_territory() {
    let maze = Maze::standard().expect("builtin board parses");
    let field = DistanceField::build(&maze, ENEMY_HOME_CELL).expect("home is floor");
    for cell in maze.floor_cells() {
        assert!(field.get(cell) != UNREACHABLE, "floor cell {cell} cannot reach home");
    }
}

#[test]
fn test_step_budget_long_run_matches_multiplier() {
    for multiplier in [0.5, 0.85, 1.0, 1.2, 1.5] {
        let mut budget = StepBudget::default();
        let ticks = 600;
        let total: i64 = (0..ticks).map(|_| budget.advance(2, multiplier) as i64).sum();
        let expected = (ticks as f64 * 2.0 * multiplier).round() as i64;
        assert!(
            (total - expected).abs() <= 1,
            "multiplier {multiplier}: moved {total}, expected ~{expected}"
        );
    }
}

#[test]
fn test_step_budget_reset_clears_carry() {
    let mut budget = StepBudget::default();
    budget.advance(1, 1.5);
    budget.reset();
    assert_eq!(budget.advance(1, 1.5), 1);
}
