//! Quiz domain model: phases, questions, answers, and the cursor that walks
//! them in configured order.

use rand::seq::SliceRandom;
use rand::Rng;
use strum_macros::{Display, EnumString};

/// One selectable answer pickup.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: Option<String>,
    /// Image asset key, fetched by the host before the question starts.
    pub image: Option<String>,
    pub correct: bool,
    /// Feedback text shown when this answer is consumed.
    pub feedback: Option<String>,
    /// Whether consuming this (correct) answer opens a power window.
    pub grants_power: bool,
    /// Power window override in seconds, taking precedence over the phase
    /// and global durations.
    pub power_duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub prompt: String,
    pub answers: Vec<Answer>,
}

/// A themed group of questions sharing enemy speed and power settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    pub title: String,
    pub questions: Vec<Question>,
    pub ghost_speed_modifier: Option<f64>,
    pub power_duration: Option<f64>,
}

/// Sequencing policy for phases and for questions within a phase.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Order {
    #[default]
    Sequential,
    Random,
}

/// Result of advancing the cursor past the current question.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Advance {
    /// True exactly when the advance crossed a phase boundary (including the
    /// wrap from the last phase back to the first).
    pub phase_changed: bool,
}

/// Walks phases and questions strictly forward, reshuffling each sequence as
/// it is entered when the respective order is random, and wrapping to the
/// first phase after the last.
///
/// Construction requires at least one phase with at least one question each;
/// [`crate::config`] validates this before a cursor exists.
#[derive(Debug, Clone)]
pub struct QuestionCursor {
    phases: Vec<Phase>,
    phase_order: Order,
    question_order: Order,
    phase_seq: Vec<usize>,
    question_seq: Vec<usize>,
    phase_index: usize,
    question_index: usize,
}

impl QuestionCursor {
    pub fn new<R: Rng>(phases: Vec<Phase>, phase_order: Order, question_order: Order, rng: &mut R) -> Self {
        let mut cursor = QuestionCursor {
            phases,
            phase_order,
            question_order,
            phase_seq: Vec::new(),
            question_seq: Vec::new(),
            phase_index: 0,
            question_index: 0,
        };
        cursor.reset(rng);
        cursor
    }

    /// Rewinds to the first phase and question, reshuffling random orders.
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        self.phase_index = 0;
        self.reset_phase_sequence(rng);
        self.reset_question_sequence(rng);
    }

    fn reset_phase_sequence<R: Rng>(&mut self, rng: &mut R) {
        self.phase_seq = (0..self.phases.len()).collect();
        if self.phase_order == Order::Random {
            self.phase_seq.shuffle(rng);
        }
    }

    fn reset_question_sequence<R: Rng>(&mut self, rng: &mut R) {
        let phase = &self.phases[self.phase_seq[self.phase_index]];
        self.question_seq = (0..phase.questions.len()).collect();
        if self.question_order == Order::Random {
            self.question_seq.shuffle(rng);
        }
        self.question_index = 0;
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    /// 1-based phase position for HUD display.
    pub fn phase_number(&self) -> usize {
        self.phase_index + 1
    }

    pub fn current_phase(&self) -> &Phase {
        &self.phases[self.phase_seq[self.phase_index]]
    }

    pub fn current_question(&self) -> &Question {
        &self.current_phase().questions[self.question_seq[self.question_index]]
    }

    /// Moves to the next question, rolling into the next phase (or wrapping
    /// to phase 0, with a fresh phase shuffle) when the current phase is
    /// exhausted.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) -> Advance {
        self.question_index += 1;
        if self.question_index < self.question_seq.len() {
            return Advance { phase_changed: false };
        }

        self.phase_index += 1;
        if self.phase_index >= self.phase_seq.len() {
            self.reset_phase_sequence(rng);
            self.phase_index = 0;
        }
        self.reset_question_sequence(rng);
        Advance { phase_changed: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn answer(correct: bool) -> Answer {
        Answer {
            text: Some(if correct { "yes" } else { "no" }.into()),
            image: None,
            correct,
            feedback: None,
            grants_power: true,
            power_duration: None,
        }
    }

    fn question(prompt: &str) -> Question {
        Question { prompt: prompt.into(), answers: vec![answer(true), answer(false)] }
    }

    fn phases() -> Vec<Phase> {
        vec![
            Phase {
                title: "first".into(),
                questions: vec![question("a"), question("b")],
                ghost_speed_modifier: None,
                power_duration: None,
            },
            Phase {
                title: "second".into(),
                questions: vec![question("c")],
                ghost_speed_modifier: None,
                power_duration: None,
            },
        ]
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(11)
    }

    #[test]
    fn test_sequential_walk() {
        let mut rng = rng();
        let mut cursor = QuestionCursor::new(phases(), Order::Sequential, Order::Sequential, &mut rng);
        assert_eq!(cursor.current_question().prompt, "a");

        assert_eq!(cursor.advance(&mut rng).phase_changed, false);
        assert_eq!(cursor.current_question().prompt, "b");

        assert_eq!(cursor.advance(&mut rng).phase_changed, true);
        assert_eq!(cursor.current_phase().title, "second");
        assert_eq!(cursor.current_question().prompt, "c");
        assert_eq!(cursor.phase_number(), 2);
    }

    #[test]
    fn test_wraps_to_first_phase() {
        let mut rng = rng();
        let mut cursor = QuestionCursor::new(phases(), Order::Sequential, Order::Sequential, &mut rng);
        cursor.advance(&mut rng);
        cursor.advance(&mut rng);
        // Last question of the last phase: advancing wraps to phase 0.
        let advance = cursor.advance(&mut rng);
        assert!(advance.phase_changed);
        assert_eq!(cursor.phase_number(), 1);
        assert_eq!(cursor.current_question().prompt, "a");
    }

    #[test]
    fn test_random_order_is_permutation() {
        let mut rng = rng();
        let many: Vec<Question> = (0..8).map(|i| question(&i.to_string())).collect();
        let phase = Phase {
            title: "only".into(),
            questions: many,
            ghost_speed_modifier: None,
            power_duration: None,
        };
        let mut cursor = QuestionCursor::new(vec![phase], Order::Sequential, Order::Random, &mut rng);

        let mut seen = vec![cursor.current_question().prompt.clone()];
        for _ in 0..7 {
            assert!(!cursor.advance(&mut rng).phase_changed);
            seen.push(cursor.current_question().prompt.clone());
        }
        seen.sort();
        let mut expected: Vec<String> = (0..8).map(|i| i.to_string()).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_reset_rewinds() {
        let mut rng = rng();
        let mut cursor = QuestionCursor::new(phases(), Order::Sequential, Order::Sequential, &mut rng);
        cursor.advance(&mut rng);
        cursor.advance(&mut rng);
        cursor.reset(&mut rng);
        assert_eq!(cursor.phase_number(), 1);
        assert_eq!(cursor.current_question().prompt, "a");
    }

    #[test]
    fn test_order_parses() {
        assert_eq!("random".parse::<Order>().unwrap(), Order::Random);
        assert_eq!("Sequential".parse::<Order>().unwrap(), Order::Sequential);
        assert!("shuffled".parse::<Order>().is_err());
    }
}
