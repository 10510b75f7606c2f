//! Ball Breaker entry point
//!
//! Runs the simulation headless with a scripted pilot: useful for balance
//! runs and as a smoke test of the full loop. A renderer front-end drives
//! the same `tick` with real input instead.

use std::path::Path;

use glam::Vec2;

use ball_breaker::consts::*;
use ball_breaker::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use ball_breaker::{HighScores, Tuning};

const HIGHSCORE_PATH: &str = "highscores.json";
const TUNING_PATH: &str = "tuning.json";

/// Cap headless runs at three simulated minutes
const MAX_TICKS: u64 = 60 * 180;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xBA11);

    let mut state = GameState::new(seed);
    state.tuning = Tuning::load(Path::new(TUNING_PATH));
    log::info!("Ball Breaker (headless) starting with seed {seed}");

    tick(
        &mut state,
        &TickInput {
            start: true,
            ..Default::default()
        },
        SIM_DT,
    );

    while state.phase != GamePhase::GameOver && state.time_ticks < MAX_TICKS {
        let input = pilot_input(&state);
        tick(&mut state, &input, SIM_DT);
        for event in state.drain_events() {
            report(&event);
        }
    }

    println!(
        "seed {seed}: score {} | wave level {} | player level {} | kills {} | {:.0}s survived",
        state.score,
        state.level,
        state.player_level,
        state.kills,
        state.time_ticks as f32 * SIM_DT,
    );

    let path = Path::new(HIGHSCORE_PATH);
    let mut scores = HighScores::load_from(path);
    if let Some(rank) = scores.add_score(state.score, state.level, unix_ms()) {
        println!("high score rank #{rank}");
        if let Err(err) = scores.save_to(path) {
            log::warn!("could not save high scores: {err}");
        }
    }
}

/// A simple deterministic pilot: sweep beneath the spawn lanes and keep
/// firing; always take the first upgrade on offer.
fn pilot_input(state: &GameState) -> TickInput {
    if state.phase == GamePhase::Upgrade {
        return TickInput {
            choose: Some(0),
            ..Default::default()
        };
    }
    let t = state.time_ticks as f32 * SIM_DT;
    TickInput {
        move_to: Some(Vec2::new(
            ARENA_WIDTH / 2.0 + (t * 0.6).sin() * 250.0,
            ARENA_HEIGHT - 80.0,
        )),
        fire: true,
        ..Default::default()
    }
}

fn report(event: &GameEvent) {
    match event {
        GameEvent::UpgradeOffered { choices } => {
            log::info!(
                "upgrade offered: {} / {} / {}",
                choices[0].name(),
                choices[1].name(),
                choices[2].name()
            );
        }
        GameEvent::LevelUp { player_level } => log::info!("reached player level {player_level}"),
        GameEvent::BossSpawned { level } => log::info!("boss incoming at level {level}"),
        GameEvent::GameOver { score, level } => {
            log::info!("game over: score {score}, level {level}")
        }
        GameEvent::ChainArc { .. } => {}
    }
}

fn unix_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}
