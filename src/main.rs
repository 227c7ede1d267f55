//! Headless demo driver: loads a question configuration, runs a scripted
//! session at the fixed tick rate, and logs the events a real host would
//! render.

use std::collections::VecDeque;

use anyhow::{Context, Result};
use tracing::{debug, info, trace};
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use mazequiz::config::GameConfig;
use mazequiz::direction::Direction;
use mazequiz::events::{GameCommand, GameEvent};
use mazequiz::session::{GameSession, SessionState};

const DEFAULT_TICKS: u64 = 3600;

fn main() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish()
        .with(ErrorLayer::default());
    tracing::subscriber::set_global_default(subscriber).context("could not set tracing subscriber")?;

    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| "config/questions.json".into());
    let ticks = match args.next() {
        Some(raw) => raw.parse::<u64>().with_context(|| format!("invalid tick count {raw:?}"))?,
        None => DEFAULT_TICKS,
    };

    let text = std::fs::read_to_string(&config_path)
        .with_context(|| format!("could not read configuration at {config_path:?}"))?;
    let config = GameConfig::from_json(&text).context("invalid configuration")?;
    let mut session = GameSession::new(config)?;

    let events = session.handle_command(GameCommand::NewGame);
    drain_events(&mut session, events);

    // A fixed steering script keeps the run deterministic enough to watch.
    let script = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
    let mut next_turn = 0usize;

    for step in 0..ticks {
        if session.state() == SessionState::Playing && step % 45 == 0 {
            let events = session.handle_command(GameCommand::Steer(script[next_turn % script.len()]));
            drain_events(&mut session, events);
            next_turn += 1;
        }
        let events = session.tick();
        drain_events(&mut session, events);
    }

    let stats = session.stats();
    info!(
        score = stats.score,
        correct = stats.correct,
        lives = stats.lives,
        state = %session.state(),
        "demo run finished"
    );
    Ok(())
}

/// Reacts to session events the way a host front end would; asset batches
/// resolve instantly since the demo has nothing to fetch.
fn drain_events(session: &mut GameSession, events: Vec<GameEvent>) {
    let mut queue: VecDeque<GameEvent> = events.into();
    while let Some(event) = queue.pop_front() {
        match event {
            GameEvent::AssetsRequested { generation, keys } => {
                for key in keys {
                    queue.extend(session.asset_loaded(generation, &key, true));
                }
            }
            GameEvent::Audio(cue) => {
                if session.sound_enabled() {
                    debug!(%cue, "audio cue");
                }
            }
            GameEvent::AgentMoved { agent, from, to } => trace!(?agent, %from, %to, "agent moved"),
            GameEvent::StateEntered(state) => debug!(%state, "state entered"),
            GameEvent::Feedback { tone, message } => {
                if !message.is_empty() {
                    info!(?tone, message, "feedback");
                }
            }
            GameEvent::QuestionPresented { prompt } => info!(prompt, "question"),
            GameEvent::PhaseStarted { number, title } => info!(number, title, "phase started"),
            GameEvent::CountdownTick(seconds) => debug!(seconds, "countdown"),
            GameEvent::ScoreAwarded { points, at } => debug!(points, %at, "score awarded"),
            GameEvent::StatsChanged => {
                let stats = session.stats();
                debug!(lives = stats.lives, score = stats.score, streak = stats.streak, "stats");
            }
            GameEvent::SoundToggled { enabled } => info!(enabled, "sound toggled"),
            GameEvent::GameOver => info!("game over"),
        }
    }
}
