//! Answer pickup placement: reachable-slot selection per question and the
//! circular collision tests the player runs into.

use std::collections::HashSet;

use glam::IVec2;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::constants::CELL_UNITS;
use crate::error::PlacementError;
use crate::map::Maze;
use crate::motion;
use crate::quiz::{Answer, Question};

/// A placed answer pickup. `anchor` is in sub-cell units at the slot's cell
/// origin; collision is a Euclidean-distance test against it.
#[derive(Debug, Clone)]
pub struct AnswerItem {
    pub answer: Answer,
    pub anchor: IVec2,
    pub radius: f64,
    pub active: bool,
    /// Set once the host reports the answer's image fetched; hosts draw a
    /// placeholder disc until then.
    pub sprite_ready: bool,
}

impl AnswerItem {
    pub fn collides(&self, pos: IVec2) -> bool {
        if !self.active {
            return false;
        }
        let delta = (pos - self.anchor).as_dvec2();
        delta.length() <= self.radius
    }
}

/// Selects slots for each question's answers and tracks the placed items.
///
/// Slot tiers, each shuffled independently: explicitly configured slots,
/// then any floor cell reachable from the player start, then any floor cell
/// at all. The player-start cell itself is never eligible. The assignment of
/// answers to slots is shuffled separately so the correct answer's position
/// stays unpredictable.
#[derive(Debug)]
pub struct AnswerBoard {
    configured: Vec<IVec2>,
    reachable: Vec<IVec2>,
    fallback: Vec<IVec2>,
    reachable_lookup: HashSet<IVec2>,
    player_start: IVec2,
    answer_scale: f64,
    items: Vec<AnswerItem>,
}

impl AnswerBoard {
    pub fn new(
        maze: &Maze,
        configured: Vec<IVec2>,
        answer_scale: f64,
        player_start: IVec2,
    ) -> Result<Self, PlacementError> {
        if !maze.is_floor(player_start) {
            return Err(PlacementError::StartUnreachable(player_start));
        }
        let mut board = AnswerBoard {
            configured,
            reachable: Vec::new(),
            fallback: Vec::new(),
            reachable_lookup: HashSet::new(),
            player_start,
            answer_scale,
            items: Vec::new(),
        };
        board.recompute(maze);
        Ok(board)
    }

    /// Rebuilds the reachability caches; called on level reset.
    pub fn recompute(&mut self, maze: &Maze) {
        let allowed = |cell: &IVec2| *cell != self.player_start;
        self.reachable = maze.reachable_from(self.player_start);
        let raw_fallback = if self.reachable.is_empty() { maze.floor_cells() } else { self.reachable.clone() };
        self.reachable_lookup = raw_fallback.iter().copied().filter(allowed).collect();
        self.fallback = raw_fallback.into_iter().filter(allowed).collect();
        self.reachable.retain(allowed);
    }

    fn slot_is_valid(&self, maze: &Maze, slot: IVec2) -> bool {
        maze.is_floor(slot) && self.reachable_lookup.contains(&slot) && slot != self.player_start
    }

    /// Picks `count` distinct slots from the tiered pools.
    fn select_slots<R: Rng>(&self, maze: &Maze, count: usize, rng: &mut R) -> Result<Vec<IVec2>, PlacementError> {
        let mut configured: Vec<IVec2> =
            self.configured.iter().copied().filter(|&slot| self.slot_is_valid(maze, slot)).collect();
        let mut reachable: Vec<IVec2> =
            self.reachable.iter().copied().filter(|&slot| self.slot_is_valid(maze, slot)).collect();
        let mut fallback = self.fallback.clone();
        configured.shuffle(rng);
        reachable.shuffle(rng);
        fallback.shuffle(rng);

        let mut selected = Vec::with_capacity(count);
        let mut used = HashSet::new();
        for pool in [configured, reachable, fallback] {
            for slot in pool {
                if selected.len() == count {
                    break;
                }
                if used.insert(slot) {
                    selected.push(slot);
                }
            }
        }

        if selected.len() < count {
            return Err(PlacementError::InsufficientSlots { needed: count, found: selected.len() });
        }
        Ok(selected)
    }

    /// Places one item per answer for a fresh question, replacing any
    /// previous items.
    pub fn set_question<R: Rng>(&mut self, maze: &Maze, question: &Question, rng: &mut R) -> Result<(), PlacementError> {
        let slots = self.select_slots(maze, question.answers.len(), rng)?;
        let mut answers = question.answers.clone();
        answers.shuffle(rng);

        let radius = CELL_UNITS as f64 * self.answer_scale.max(0.6);
        self.items = answers
            .into_iter()
            .zip(slots)
            .map(|(answer, slot)| AnswerItem {
                answer,
                anchor: motion::to_units(slot),
                radius,
                active: true,
                sprite_ready: false,
            })
            .collect();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[AnswerItem] {
        &self.items
    }

    /// Image asset keys for the currently placed items.
    pub fn image_keys(&self) -> Vec<String> {
        self.items.iter().filter_map(|item| item.answer.image.clone()).collect()
    }

    /// Marks items bearing `image` as ready to draw.
    pub fn mark_sprite_ready(&mut self, image: &str) {
        for item in &mut self.items {
            if item.answer.image.as_deref() == Some(image) {
                item.sprite_ready = true;
            }
        }
    }

    /// Index of the first active item colliding with `pos` (sub-cell units).
    pub fn check_collision(&self, pos: IVec2) -> Option<usize> {
        self.items.iter().position(|item| item.collides(pos))
    }

    /// Deactivates and removes the item, returning its answer. Sibling items
    /// are untouched.
    pub fn consume(&mut self, index: usize) -> Option<Answer> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        Some(item.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PLAYER_START_CELL;
    use pretty_assertions::assert_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn board(maze: &Maze) -> AnswerBoard {
        AnswerBoard::new(maze, Vec::new(), 1.0, PLAYER_START_CELL).unwrap()
    }

    fn answer(text: &str, correct: bool) -> Answer {
        Answer {
            text: Some(text.into()),
            image: None,
            correct,
            feedback: None,
            grants_power: true,
            power_duration: None,
        }
    }

    fn question(count: usize) -> Question {
        Question {
            prompt: "q".into(),
            answers: (0..count).map(|i| answer(&i.to_string(), i == 0)).collect(),
        }
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(3)
    }

    #[test]
    fn test_selects_distinct_floor_slots() {
        let maze = Maze::standard().unwrap();
        let mut board = board(&maze);
        let mut rng = rng();
        board.set_question(&maze, &question(4), &mut rng).unwrap();

        assert_eq!(board.items().len(), 4);
        let mut cells = HashSet::new();
        for item in board.items() {
            let cell = item.anchor / CELL_UNITS;
            assert!(maze.is_floor(cell), "slot {cell} is not floor");
            assert_ne!(cell, PLAYER_START_CELL);
            assert!(cells.insert(cell), "slot {cell} selected twice");
        }
    }

    #[test]
    fn test_configured_slots_preferred() {
        let maze = Maze::standard().unwrap();
        let configured = vec![IVec2::new(1, 1), IVec2::new(17, 1)];
        let mut board = AnswerBoard::new(&maze, configured.clone(), 1.0, PLAYER_START_CELL).unwrap();
        let mut rng = rng();
        board.set_question(&maze, &question(2), &mut rng).unwrap();

        let placed: HashSet<IVec2> = board.items().iter().map(|i| i.anchor / CELL_UNITS).collect();
        assert_eq!(placed, configured.into_iter().collect());
    }

    #[test]
    fn test_invalid_configured_slots_skipped() {
        let maze = Maze::standard().unwrap();
        // A wall, the player start, and an out-of-bounds cell are all invalid.
        let configured = vec![IVec2::new(0, 0), PLAYER_START_CELL, IVec2::new(50, 50)];
        let mut board = AnswerBoard::new(&maze, configured, 1.0, PLAYER_START_CELL).unwrap();
        let mut rng = rng();
        board.set_question(&maze, &question(3), &mut rng).unwrap();
        for item in board.items() {
            let cell = item.anchor / CELL_UNITS;
            assert!(maze.is_floor(cell));
            assert_ne!(cell, PLAYER_START_CELL);
        }
    }

    #[test]
    fn test_insufficient_slots_errors() {
        let maze = Maze::parse(&["#####", "#...#", "#####"]).unwrap();
        let mut board = AnswerBoard::new(&maze, Vec::new(), 1.0, IVec2::new(1, 1)).unwrap();
        let mut rng = rng();
        // Three floor cells minus the start leaves two slots for four answers.
        let err = board.set_question(&maze, &question(4), &mut rng).unwrap_err();
        assert!(matches!(err, PlacementError::InsufficientSlots { needed: 4, found: 2 }));
    }

    #[test]
    fn test_start_must_be_floor() {
        let maze = Maze::standard().unwrap();
        let err = AnswerBoard::new(&maze, Vec::new(), 1.0, IVec2::new(0, 0)).unwrap_err();
        assert!(matches!(err, PlacementError::StartUnreachable(_)));
    }

    #[test]
    fn test_collision_radius() {
        let maze = Maze::standard().unwrap();
        let mut board = board(&maze);
        let mut rng = rng();
        board.set_question(&maze, &question(1), &mut rng).unwrap();
        let anchor = board.items()[0].anchor;

        assert_eq!(board.check_collision(anchor), Some(0));
        assert_eq!(board.check_collision(anchor + IVec2::new(10, 0)), Some(0));
        assert_eq!(board.check_collision(anchor + IVec2::new(8, 8)), None);
    }

    #[test]
    fn test_consume_removes_item() {
        let maze = Maze::standard().unwrap();
        let mut board = board(&maze);
        let mut rng = rng();
        board.set_question(&maze, &question(3), &mut rng).unwrap();

        let consumed = board.consume(1).unwrap();
        assert_eq!(board.items().len(), 2);
        assert!(board.items().iter().all(|item| item.answer != consumed));
    }

    #[test]
    fn test_small_radius_floor() {
        let maze = Maze::standard().unwrap();
        // Scales below 0.6 clamp to a 6-unit radius.
        let mut board = AnswerBoard::new(&maze, Vec::new(), 0.2, PLAYER_START_CELL).unwrap();
        let mut rng = rng();
        board.set_question(&maze, &question(1), &mut rng).unwrap();
        assert_eq!(board.items()[0].radius, 6.0);
    }
}
