//! Orbit Duel entry point
//!
//! Native builds have no display collaborator, so the binary plays a headless
//! duel between two aiming bots and logs every match event.
//!
//! Usage: `orbit-duel [settings.json] [seed]`

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use orbit_duel::scene::{ButtonBounds, PointerEvent};
use orbit_duel::sim::{MatchEvent, PointerButton, TurnPhase};
use orbit_duel::{DuelError, Game, Settings};

/// Simulated display refresh (60 Hz)
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Safety cap on simulated frames (10 minutes of play)
const MAX_FRAMES: u32 = 60 * 60 * 10;
/// Rounds a bot must win to end the duel
const WINNING_SCORE: u32 = 3;
/// Aim scatter around the opponent, in arena units
const AIM_SCATTER: f32 = 40.0;

fn main() {
    env_logger::init();
    log::info!("Orbit Duel (headless) starting...");

    if let Err(err) = run() {
        log::error!("Duel aborted: {err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), DuelError> {
    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };
    let seed = match args.next() {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|e| DuelError::InvalidSettings(format!("seed {raw:?}: {e}")))?,
        None => 0x0D0E_1D0E,
    };

    let play_button = ButtonBounds::new(Vec2::ZERO, Vec2::new(200.0, 60.0));
    let mut game = Game::with_default_scenes(settings, seed, play_button)?;

    // Press "play" on the title screen
    let click = PointerEvent {
        button: PointerButton::Primary,
        screen: Vec2::new(100.0, 30.0),
    };
    game.pointer_down(&click)?;
    game.pointer_up(&click)?;

    let mut bot_rng = Pcg32::seed_from_u64(seed ^ 0xB07);
    let mut aim: Option<Vec2> = None;
    let mut time_ms = 0.0;

    for _ in 0..MAX_FRAMES {
        let Some(state) = game.current_match() else {
            break;
        };

        // Pick a fresh aim point at the start of every turn
        if state.phase == TurnPhase::Idle && aim.is_none() {
            let scatter = Vec2::new(
                bot_rng.random_range(-AIM_SCATTER..AIM_SCATTER),
                bot_rng.random_range(-AIM_SCATTER..AIM_SCATTER),
            );
            aim = Some(state.opponent_ship().pos + scatter);
        }

        game.frame(time_ms, aim, Vec2::ZERO)?;
        time_ms += FRAME_MS;

        let idle = game
            .current_match()
            .is_some_and(|m| m.phase == TurnPhase::Idle);
        if idle && aim.is_some() {
            game.pointer_down(&click)?;
            game.pointer_up(&click)?;
            aim = None;
        }

        let Some(state) = game.current_match_mut() else {
            break;
        };
        for event in state.drain_events() {
            report(&event);
        }
        if state.scores.iter().any(|&s| s >= WINNING_SCORE) {
            break;
        }
    }

    if let Some(state) = game.current_match() {
        println!(
            "Final score after {} shots over {} rounds: {} - {}",
            state.shots_fired, state.round, state.scores[0], state.scores[1]
        );
    }
    Ok(())
}

fn report(event: &MatchEvent) {
    match event {
        MatchEvent::RoundStarted { round, first } => {
            log::info!("Round {round}: {first:?} opens");
        }
        MatchEvent::ShotFired { player, velocity } => {
            log::info!("{player:?} fires at speed {:.1}", velocity.length());
        }
        MatchEvent::Impact { player, point, kind } => {
            log::info!("{player:?}'s shot: {kind:?} at ({:.1}, {:.1})", point.x, point.y);
        }
        MatchEvent::TurnPassed { to } => log::debug!("Turn passes to {to:?}"),
        MatchEvent::ShipDestroyed { loser, winner } => {
            println!("{winner:?} destroys {loser:?}!");
        }
    }
}
