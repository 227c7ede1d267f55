//! The game session aggregate: the fixed-timestep state machine driving
//! agents, quiz flow, scoring, and the events hosts react to.

use glam::IVec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use smallvec::SmallVec;
use strum_macros::Display;
use tracing::{debug, error, info};

use crate::ai::{self, AiMode, AiQuery, Targeting};
use crate::assets::{AssetBatch, BatchProgress};
use crate::config::{GameConfig, Settings};
use crate::constants::{
    COLLISION_RADIUS, COUNTDOWN_SECONDS, CAPTURE_SCORE_STEP, DEATH_TICKS, EATEN_PAUSE_TICKS,
    ENEMY_HOME_CELL, TICKS_PER_SECOND,
};
use crate::error::GameResult;
use crate::events::{AgentKind, AudioCue, FeedbackTone, GameCommand, GameEvent};
use crate::ghost::Ghost;
use crate::map::Maze;
use crate::placement::{AnswerBoard, AnswerItem};
use crate::player::Player;
use crate::quiz::{Answer, Question, QuestionCursor};
use crate::stats::{PowerState, Stats};

/// Number of enemies in play.
const ENEMY_COUNT: usize = 4;

const FEEDBACK_READY: &str = "Collect the correct option to answer!";
const FEEDBACK_CORRECT: &str = "Correct! Great work.";
const FEEDBACK_WRONG: &str = "Wrong answer. Try another option!";
const FEEDBACK_CAUGHT: &str = "An enemy caught you!";
const FEEDBACK_GAME_OVER: &str = "Game over! Press N to restart.";
const FEEDBACK_ASSETS_FAILED: &str = "Could not load the question media. Press N to restart.";

/// The game-phase state machine's states.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum SessionState {
    /// Idle; waiting for a new game.
    Waiting,
    /// Pre-level countdown before play begins.
    Countdown,
    /// Live simulation.
    Playing,
    /// Short freeze after an enemy capture.
    EatenPause,
    /// Death animation window.
    Dying,
    /// Delay between a correct answer and the next question.
    QuestionPause,
    /// Pause toggle; resumes to the stored prior state.
    Paused,
}

/// Everything one running game owns: maze, agents, quiz cursor, placed
/// answers, targeting caches, stats, and the state machine itself.
///
/// Hosts drive it with [`GameSession::tick`] at [`TICKS_PER_SECOND`], feed it
/// [`GameCommand`]s, and resolve asset batches via
/// [`GameSession::asset_loaded`]; every call returns the [`GameEvent`]s it
/// produced.
pub struct GameSession {
    settings: Settings,
    maze: Maze,
    player: Player,
    ghosts: SmallVec<[Ghost; ENEMY_COUNT]>,
    cursor: QuestionCursor,
    board: AnswerBoard,
    targeting: Targeting,
    batch: AssetBatch,
    stats: Stats,
    power: PowerState,
    state: SessionState,
    stored: SessionState,
    tick: u64,
    timer_start: u64,
    last_countdown: Option<i64>,
    eaten_count: u32,
    pending_phase_change: Option<bool>,
    ghost_speed_multiplier: f64,
    sound_enabled: bool,
    rng: SmallRng,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Builds a session from a validated configuration, seeding the RNG from
    /// the operating system.
    pub fn new(config: GameConfig) -> GameResult<Self> {
        Self::with_rng(config, SmallRng::from_os_rng())
    }

    /// Deterministic construction for tests and replays.
    pub fn with_seed(config: GameConfig, seed: u64) -> GameResult<Self> {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, mut rng: SmallRng) -> GameResult<Self> {
        let GameConfig { settings, phases } = config;
        let maze = Maze::standard()?;
        let board = AnswerBoard::new(&maze, settings.answer_slots.clone(), settings.answer_scale, settings.player_start)?;
        let cursor = QuestionCursor::new(phases, settings.phase_order, settings.question_order, &mut rng);

        let mut session = GameSession {
            stats: Stats::new(settings.initial_lives),
            settings,
            maze,
            player: Player::new(),
            ghosts: (0..ENEMY_COUNT).map(|_| Ghost::new()).collect(),
            cursor,
            board,
            targeting: Targeting::new(),
            batch: AssetBatch::new(),
            power: PowerState::default(),
            state: SessionState::Waiting,
            stored: SessionState::Waiting,
            tick: 0,
            timer_start: 0,
            last_countdown: None,
            eaten_count: 0,
            pending_phase_change: None,
            ghost_speed_multiplier: 1.0,
            sound_enabled: true,
            rng,
            events: Vec::new(),
        };
        session.apply_phase_settings();
        info!(phases = session.cursor.phase_count(), "session ready");
        Ok(session)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn power(&self) -> &PowerState {
        &self.power
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn answer_items(&self) -> &[AnswerItem] {
        self.board.items()
    }

    pub fn current_question(&self) -> &Question {
        self.cursor.current_question()
    }

    pub fn phase_number(&self) -> usize {
        self.cursor.phase_number()
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Restores the persisted mute preference at startup.
    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
    }

    /// Applies one host command.
    pub fn handle_command(&mut self, command: GameCommand) -> Vec<GameEvent> {
        match command {
            GameCommand::NewGame => self.start_new_game(),
            GameCommand::TogglePause => self.toggle_pause(),
            GameCommand::ToggleSound => {
                self.sound_enabled = !self.sound_enabled;
                let enabled = self.sound_enabled;
                self.events.push(GameEvent::SoundToggled { enabled });
            }
            GameCommand::Steer(dir) => {
                if self.state != SessionState::Paused {
                    self.player.steer(dir);
                }
            }
        }
        std::mem::take(&mut self.events)
    }

    /// Reports one asset from a prefetch batch. Stale generations no-op; the
    /// level starts once the current batch fully resolves. A failed fetch
    /// still counts as resolved, its item just keeps the placeholder sprite.
    pub fn asset_loaded(&mut self, generation: u64, key: &str, ok: bool) -> Vec<GameEvent> {
        if ok {
            self.board.mark_sprite_ready(key);
        } else {
            debug!(key, "asset fetch failed, keeping placeholder");
        }
        if self.batch.resolve(generation, key) == BatchProgress::Complete {
            self.maze.reset();
            self.start_level();
        }
        std::mem::take(&mut self.events)
    }

    /// Reports that an entire prefetch batch failed (e.g. the host lost
    /// connectivity). The session surfaces a visible error and waits for a
    /// new game instead of blocking on keys that will never arrive.
    pub fn asset_batch_failed(&mut self, generation: u64) -> Vec<GameEvent> {
        if generation == self.batch.generation() && !self.batch.is_complete() {
            error!(generation, "asset batch failed");
            self.batch.abort();
            self.board.clear();
            self.push_feedback(FeedbackTone::Negative, FEEDBACK_ASSETS_FAILED);
        }
        std::mem::take(&mut self.events)
    }

    /// Advances the simulation one fixed step.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        if self.state != SessionState::Paused {
            self.tick += 1;
        }

        if self.power.is_expired(self.tick) {
            self.deactivate_power();
        }

        match self.state {
            SessionState::Playing => self.step_world(),
            SessionState::EatenPause => {
                if self.tick - self.timer_start > EATEN_PAUSE_TICKS {
                    self.set_state(SessionState::Playing);
                }
            }
            SessionState::Dying => {
                if self.tick - self.timer_start > DEATH_TICKS {
                    self.life_lost_to_enemy();
                }
            }
            SessionState::Countdown => self.step_countdown(),
            SessionState::QuestionPause => {
                if self.tick - self.timer_start >= self.transition_ticks() {
                    self.process_pending_question();
                }
            }
            SessionState::Waiting | SessionState::Paused => {}
        }

        std::mem::take(&mut self.events)
    }

    fn set_state(&mut self, state: SessionState) {
        debug!(from = %self.state, to = %state, tick = self.tick, "state change");
        self.state = state;
        self.events.push(GameEvent::StateEntered(state));
    }

    fn toggle_pause(&mut self) {
        if self.state == SessionState::Paused {
            let stored = self.stored;
            self.set_state(stored);
        } else {
            self.stored = self.state;
            self.set_state(SessionState::Paused);
        }
    }

    fn transition_ticks(&self) -> u64 {
        let ticks = (self.settings.transition_delay_seconds * TICKS_PER_SECOND as f64).round() as i64;
        ticks.max(1) as u64
    }

    fn apply_phase_settings(&mut self) {
        self.ghost_speed_multiplier = self
            .cursor
            .current_phase()
            .ghost_speed_modifier
            .unwrap_or(self.settings.ghost_speed_modifier);
    }

    fn start_new_game(&mut self) {
        info!("new game");
        self.cursor.reset(&mut self.rng);
        self.apply_phase_settings();
        self.stats = Stats::new(self.settings.initial_lives);
        self.power = PowerState::default();
        self.eaten_count = 0;
        self.set_state(SessionState::Waiting);
        self.player.reset();
        self.targeting.invalidate();
        self.maze.reset();
        self.board.recompute(&self.maze);
        self.events.push(GameEvent::StatsChanged);
        self.push_feedback(FeedbackTone::Neutral, FEEDBACK_READY);
        self.prepare_question();
    }

    /// Places answers for the cursor's current question and kicks off the
    /// asset prefetch; the level starts when the batch resolves.
    fn prepare_question(&mut self) {
        let question = self.cursor.current_question().clone();
        self.events.push(GameEvent::QuestionPresented { prompt: question.prompt.clone() });

        if let Err(err) = self.board.set_question(&self.maze, &question, &mut self.rng) {
            error!(%err, "question setup failed");
            self.board.clear();
            self.push_feedback(FeedbackTone::Negative, &err.to_string());
            return;
        }

        let keys = self.board.image_keys();
        let generation = self.batch.begin(keys.clone());
        if self.batch.is_complete() {
            self.start_level();
        } else {
            self.events.push(GameEvent::AssetsRequested { generation, keys });
        }
    }

    fn start_level(&mut self) {
        self.player.reset();
        for ghost in &mut self.ghosts {
            ghost.reset();
        }
        self.targeting.invalidate();
        self.events.push(GameEvent::Audio(AudioCue::Start));
        self.timer_start = self.tick;
        self.last_countdown = None;
        self.set_state(SessionState::Countdown);
    }

    fn step_countdown(&mut self) {
        let elapsed = self.tick - self.timer_start;
        let remaining = COUNTDOWN_SECONDS as i64 - (elapsed / TICKS_PER_SECOND as u64) as i64;
        if remaining <= 0 {
            self.set_state(SessionState::Playing);
        } else if self.last_countdown != Some(remaining) {
            self.last_countdown = Some(remaining);
            self.events.push(GameEvent::CountdownTick(remaining as u32));
        }
    }

    /// One live simulation step: targeting, enemy moves, player move, answer
    /// pickups, then enemy contact.
    fn step_world(&mut self) {
        self.ensure_fields();
        self.move_ghosts();

        let from = self.player.position();
        self.player.step(&self.maze);
        let to = self.player.position();
        if from != to {
            self.events.push(GameEvent::AgentMoved { agent: AgentKind::Player, from, to });
        }
        self.ensure_fields();

        if let Some(index) = self.board.check_collision(self.player.position()) {
            if let Some(answer) = self.board.consume(index) {
                if answer.correct {
                    self.handle_correct_answer(answer);
                } else {
                    self.handle_wrong_answer(answer);
                }
            }
            if self.state != SessionState::Playing {
                return;
            }
        }

        for index in 0..self.ghosts.len() {
            if !collided(self.player.position(), self.ghosts[index].position()) {
                continue;
            }
            if self.ghosts[index].is_vulnerable() {
                self.capture_enemy(index);
            } else if self.ghosts[index].is_dangerous() {
                self.events.push(GameEvent::Audio(AudioCue::Die));
                self.timer_start = self.tick;
                self.set_state(SessionState::Dying);
            }
        }
    }

    fn ensure_fields(&mut self) {
        if self.settings.enemy_ai.mode != AiMode::Random {
            self.targeting.chase.ensure(
                &self.maze,
                self.player.cell(),
                self.tick,
                self.settings.enemy_ai.path_refresh_interval,
            );
        }
        if self.settings.enemy_ai.use_home_tile {
            // The home anchor never moves, so the refresh interval is moot.
            self.targeting.home.ensure(&self.maze, ENEMY_HOME_CELL, self.tick, u32::MAX);
        }
    }

    fn move_ghosts(&mut self) {
        let maze = &self.maze;
        let targeting = &self.targeting;
        let enemy_ai = &self.settings.enemy_ai;
        let rng = &mut self.rng;
        let multiplier = self.ghost_speed_multiplier;
        let tick = self.tick;

        let mut moves: SmallVec<[(usize, IVec2, IVec2); ENEMY_COUNT]> = SmallVec::new();
        for (index, ghost) in self.ghosts.iter_mut().enumerate() {
            ghost.update(tick);
            let from = ghost.position();
            ghost.step(maze, multiplier, |g, blocked| {
                let query = AiQuery {
                    cell: g.cell(),
                    direction: g.direction(),
                    vulnerable: g.is_vulnerable(),
                    returning: g.is_returning(),
                };
                ai::resolve(enemy_ai, maze, targeting, &query, blocked, rng)
            });
            if ghost.position() != from {
                moves.push((index, from, ghost.position()));
            }
        }
        for (index, from, to) in moves {
            self.events.push(GameEvent::AgentMoved { agent: AgentKind::Enemy(index), from, to });
        }
    }

    /// An enemy was touched while vulnerable: capture it and freeze briefly.
    /// Each capture within one power window is worth one more score step
    /// than the last.
    fn capture_enemy(&mut self, index: usize) {
        let at = self.ghosts[index].position();
        self.ghosts[index].capture(self.tick);
        self.eaten_count += 1;
        let points = self.eaten_count * CAPTURE_SCORE_STEP;

        self.events.push(GameEvent::Audio(AudioCue::EatGhost));
        self.events.push(GameEvent::ScoreAwarded { points, at });
        self.stats.add_score(points);
        self.events.push(GameEvent::StatsChanged);
        self.timer_start = self.tick;
        self.set_state(SessionState::EatenPause);
    }

    fn handle_correct_answer(&mut self, answer: Answer) {
        self.events.push(GameEvent::Audio(AudioCue::Correct));
        self.stats.correct += 1;
        self.stats.streak += 1;
        if self.settings.life_reward_on_correct > 0 {
            self.stats.gain_lives(self.settings.life_reward_on_correct, self.settings.max_lives);
        }
        self.events.push(GameEvent::StatsChanged);

        let message = answer.feedback.clone().unwrap_or_else(|| FEEDBACK_CORRECT.into());
        self.push_feedback(FeedbackTone::Positive, &message);

        if answer.grants_power {
            let duration = answer
                .power_duration
                .or(self.cursor.current_phase().power_duration)
                .unwrap_or(self.settings.power_duration_seconds);
            self.activate_power(duration);
        }
        self.schedule_next_question();
    }

    fn handle_wrong_answer(&mut self, answer: Answer) {
        self.events.push(GameEvent::Audio(AudioCue::Wrong));
        self.stats.streak = 0;
        self.events.push(GameEvent::StatsChanged);
        if self.apply_life_penalty(self.settings.life_penalty_wrong.max(1)) {
            return;
        }
        let message = answer.feedback.clone().unwrap_or_else(|| FEEDBACK_WRONG.into());
        self.push_feedback(FeedbackTone::Negative, &message);
        self.deactivate_power();
        self.start_level();
    }

    /// End of the death animation: pay the penalty and either restart the
    /// level (same question, same pickups) or end the game.
    fn life_lost_to_enemy(&mut self) {
        if self.apply_life_penalty(self.settings.life_penalty_ghost.max(1)) {
            return;
        }
        self.stats.streak = 0;
        self.push_feedback(FeedbackTone::Negative, FEEDBACK_CAUGHT);
        self.deactivate_power();
        self.start_level();
    }

    /// Returns true when the penalty ended the game.
    fn apply_life_penalty(&mut self, amount: u32) -> bool {
        self.stats.lose_lives(amount);
        self.events.push(GameEvent::StatsChanged);
        if self.stats.lives <= 0 {
            self.game_over();
            return true;
        }
        false
    }

    fn game_over(&mut self) {
        info!(score = self.stats.score, correct = self.stats.correct, "game over");
        self.power.deactivate();
        self.set_state(SessionState::Waiting);
        self.push_feedback(FeedbackTone::Negative, FEEDBACK_GAME_OVER);
        self.events.push(GameEvent::GameOver);
    }

    /// Opens a power window: enemies reverse, slow down, and become
    /// capturable; the capture bonus ladder starts over.
    fn activate_power(&mut self, duration: f64) {
        self.power.activate(self.tick, duration);
        self.eaten_count = 0;
        for ghost in &mut self.ghosts {
            ghost.make_vulnerable(self.tick);
        }
    }

    fn deactivate_power(&mut self) {
        self.power.deactivate();
        for ghost in &mut self.ghosts {
            ghost.clear_vulnerable();
        }
    }

    fn schedule_next_question(&mut self) {
        let advance = self.cursor.advance(&mut self.rng);
        self.pending_phase_change = Some(advance.phase_changed);
        self.timer_start = self.tick;
        self.set_state(SessionState::QuestionPause);
    }

    fn process_pending_question(&mut self) {
        let Some(phase_changed) = self.pending_phase_change.take() else { return };
        if phase_changed {
            self.apply_phase_settings();
            let number = self.cursor.phase_number();
            let title = self.cursor.current_phase().title.clone();
            self.push_feedback(FeedbackTone::Neutral, &format!("New phase: {title}"));
            self.events.push(GameEvent::PhaseStarted { number, title });
        }
        self.prepare_question();
    }

    fn push_feedback(&mut self, tone: FeedbackTone, message: &str) {
        self.events.push(GameEvent::Feedback { tone, message: message.to_string() });
    }
}

fn collided(player: IVec2, enemy: IVec2) -> bool {
    (player - enemy).as_dvec2().length() < COLLISION_RADIUS as f64
}
