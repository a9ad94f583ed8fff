//! Per-frame match update and the turn state machine
//!
//! One call to [`tick`] per display refresh. Within a frame the order is:
//! shot simulation, then preview and derived visuals, then effect timers.

use glam::Vec2;

use super::collision::{CollisionKind, classify};
use super::effects::{DeathBurst, Explosion};
use super::gravity::Gravity;
use super::preview::{TrajectoryPreview, hide_markers};
use super::state::{MatchEvent, MatchState, TurnPhase};
use crate::clamp_length_or;
use crate::consts::{ANIMATION_CYCLE, EFFECT_TICK_MS, MAX_EFFECT_TICKS};
use crate::error::DuelError;
use crate::settings::Settings;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Milliseconds since the previous frame
    pub delta_ms: f32,
    /// World-space point under the cursor (from the display collaborator)
    pub pointer_target: Option<Vec2>,
}

/// Pointer buttons as delivered by the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// Launch velocity for a shot from `from` aimed at `target`.
///
/// Shared by live shots and the preview so both always agree.
pub fn aim_velocity(from: Vec2, target: Vec2, settings: &Settings) -> Vec2 {
    clamp_length_or(
        target - from,
        settings.min_aim_speed,
        settings.max_aim_speed,
        Vec2::X,
    )
}

/// Advance the match by one frame
pub fn tick(state: &mut MatchState, input: &FrameInput) -> Result<(), DuelError> {
    let delta_ms = input.delta_ms.max(0.0);
    if input.pointer_target.is_some() {
        state.pointer_target = input.pointer_target;
    }

    match state.phase {
        TurnPhase::InFlight => advance_shot(state, delta_ms),
        TurnPhase::Idle => update_preview(state),
        TurnPhase::Resolving => {}
    }

    animate(state);
    advance_effects(state, delta_ms);

    if state.phase == TurnPhase::Resolving {
        let burning = state
            .death_burst
            .as_ref()
            .map(|burst| burst.elapsed_ms)
            .unwrap_or(0.0);
        if burning >= state.settings.death_burst_duration_ms {
            // The destroyed side opens the next round
            let next = state.player.opponent();
            state.start_round(next)?;
        }
    }

    state.animation_frame = (state.animation_frame + 1) % ANIMATION_CYCLE;
    Ok(())
}

/// Fire from the current player's ship toward the pointer.
///
/// Only valid while Idle with a known pointer target; returns whether a shot
/// was launched.
pub fn fire(state: &mut MatchState) -> bool {
    if state.phase != TurnPhase::Idle {
        return false;
    }
    let Some(target) = state.pointer_target else {
        log::debug!("Fire ignored: no pointer target yet");
        return false;
    };

    let origin = state.current_ship().pos;
    let velocity = aim_velocity(origin, target, &state.settings);
    state.projectile.launch(origin, velocity);
    hide_markers(&mut state.markers);
    state.phase = TurnPhase::InFlight;
    state.shots_fired += 1;

    log::debug!(
        "{:?} fires from {:?} with velocity {:?}",
        state.player,
        origin,
        velocity
    );
    state.events.push(MatchEvent::ShotFired {
        player: state.player,
        velocity,
    });
    true
}

/// One coarse integration step for the live shot, then resolve its outcome
fn advance_shot(state: &mut MatchState, delta_ms: f32) {
    let gravity = Gravity::from_settings(&state.settings);
    let dt = delta_ms / state.settings.frame_time_scale_ms;

    let projectile = &mut state.projectile;
    let force = gravity.step(
        &mut projectile.pos,
        &mut projectile.vel,
        dt,
        &state.level.planets,
    );
    projectile.force = force;
    projectile.accel = force;

    let point = projectile.pos;
    let shooter = state.player;
    let kind = classify(
        point,
        shooter,
        &state.level,
        state.settings.opponent_hit_radius,
    );

    match kind {
        CollisionKind::None => {}
        CollisionKind::OutOfBounds | CollisionKind::PlanetHit => {
            state.explosions.push(Explosion::new(point));
            state.projectile.visible = false;
            state.phase = TurnPhase::Idle;
            state.player = shooter.opponent();

            log::debug!("{:?} shot ended with {:?} at {:?}", shooter, kind, point);
            state.events.push(MatchEvent::Impact {
                player: shooter,
                point,
                kind,
            });
            state.events.push(MatchEvent::TurnPassed { to: state.player });
        }
        CollisionKind::OpponentHit => {
            let loser = shooter.opponent();
            state.explosions.push(Explosion::new(point));
            state.projectile.visible = false;
            hide_markers(&mut state.markers);
            state.phase = TurnPhase::Resolving;

            let wreck = state.level.ship_mut(loser);
            wreck.destroyed = true;
            let wreck_pos = wreck.pos;
            state.death_burst = Some(DeathBurst::new(
                wreck_pos,
                state.settings.death_burst_radius,
                state.settings.death_burst_interval_ms,
            ));
            state.scores[shooter.index()] += 1;

            log::info!(
                "{:?} destroyed {:?} (score {} - {})",
                shooter,
                loser,
                state.scores[0],
                state.scores[1]
            );
            state.events.push(MatchEvent::Impact {
                player: shooter,
                point,
                kind,
            });
            state.events.push(MatchEvent::ShipDestroyed {
                loser,
                winner: shooter,
            });
        }
    }
}

/// Recompute the trajectory preview for the current aim
fn update_preview(state: &mut MatchState) {
    let Some(target) = state.pointer_target else {
        hide_markers(&mut state.markers);
        return;
    };
    let origin = state.current_ship().pos;
    let velocity = aim_velocity(origin, target, &state.settings);
    let preview = TrajectoryPreview::new(&state.level, &state.settings, state.player);
    preview.trace(origin, velocity, &mut state.markers);
}

/// Ship heading, ship bob and planet spin
fn animate(state: &mut MatchState) {
    use std::f32::consts::{FRAC_PI_2, PI};

    if state.phase == TurnPhase::Idle {
        if let Some(target) = state.pointer_target {
            let ship = state.level.ship_mut(state.player);
            let dir = (target - ship.pos).normalize_or_zero();
            if dir != Vec2::ZERO {
                ship.heading = dir.y.atan2(dir.x) + FRAC_PI_2;
            }
        }
    }

    let frame = state.animation_frame as f32;
    let tilt = ((frame - 15.0) / 30.0 * PI).sin() / 8.0;
    for ship in state.level.ships.iter_mut().filter(|s| !s.destroyed) {
        ship.tilt = tilt;
    }

    for planet in &mut state.level.planets {
        planet.spin += glam::Vec3::splat(0.01);
    }
}

/// Explosion fade on the fixed effect tick, plus the death burst
fn advance_effects(state: &mut MatchState, delta_ms: f32) {
    state.effect_accumulator_ms += delta_ms;
    let mut ticks = 0;
    while state.effect_accumulator_ms >= EFFECT_TICK_MS && ticks < MAX_EFFECT_TICKS {
        state.effect_accumulator_ms -= EFFECT_TICK_MS;
        for explosion in &mut state.explosions {
            explosion.advance();
        }
        ticks += 1;
    }
    if ticks == MAX_EFFECT_TICKS {
        // Drop the backlog after a long stall
        state.effect_accumulator_ms = state.effect_accumulator_ms.min(EFFECT_TICK_MS);
    }
    state.explosions.retain(|e| !e.finished());

    if let Some(burst) = state.death_burst.as_mut() {
        let spawns = burst.advance(delta_ms, &mut state.rng);
        state
            .explosions
            .extend(spawns.into_iter().map(Explosion::new));
    }
}

impl MatchState {
    /// Advance one display frame
    pub fn frame(&mut self, input: &FrameInput) -> Result<(), DuelError> {
        tick(self, input)
    }

    /// Primary press fires while Idle; other buttons are ignored
    pub fn pointer_down(&mut self, button: PointerButton) -> bool {
        button == PointerButton::Primary && fire(self)
    }

    /// Releases carry no meaning during a match
    pub fn pointer_up(&mut self, _button: PointerButton) {}

    /// Brightness of the preview markers over the animation cycle (0 to 1/6)
    pub fn marker_pulse(&self) -> f32 {
        let half = ANIMATION_CYCLE / 2;
        let phase = if self.animation_frame > half {
            ANIMATION_CYCLE - self.animation_frame
        } else {
            self.animation_frame
        };
        phase as f32 / 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::Level;
    use crate::sim::state::{Arena, Planet, Player, Ship};
    use glam::Vec3;

    fn duel(ship2: Vec2, planets: Vec<Planet>) -> MatchState {
        let level = Level::new(
            Arena::new(Vec2::new(150.0, 100.0)),
            [
                Ship::new(Vec2::new(-50.0, 0.0), 7.05, Player::First),
                Ship::new(ship2, 7.05, Player::Second),
            ],
            planets,
        );
        let mut state = MatchState::with_level(Settings::default(), level, 1);
        state.drain_events();
        state
    }

    fn frame(delta_ms: f32, target: Vec2) -> FrameInput {
        FrameInput {
            delta_ms,
            pointer_target: Some(target),
        }
    }

    fn run_until_idle_or_resolving(state: &mut MatchState) {
        for _ in 0..1000 {
            if state.phase != TurnPhase::InFlight {
                return;
            }
            let input = FrameInput {
                delta_ms: 50.0,
                pointer_target: None,
            };
            tick(state, &input).expect("tick");
        }
        panic!("shot never resolved");
    }

    #[test]
    fn test_aim_clamp() {
        let settings = Settings::default();
        let fast = aim_velocity(Vec2::ZERO, Vec2::new(300.0, 400.0), &settings);
        assert!((fast.length() - 120.0).abs() < 1e-3);

        let slow = aim_velocity(Vec2::ZERO, Vec2::new(0.3, 0.4), &settings);
        assert!((slow.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_fire_requires_idle_and_target() {
        let mut state = duel(Vec2::new(50.0, 40.0), Vec::new());
        assert!(!state.pointer_down(PointerButton::Primary));

        state.pointer_target = Some(Vec2::new(0.0, 0.0));
        assert!(!state.pointer_down(PointerButton::Secondary));
        assert!(state.pointer_down(PointerButton::Primary));
        assert_eq!(state.phase, TurnPhase::InFlight);
        assert!(!state.pointer_down(PointerButton::Primary));
        assert_eq!(state.shots_fired, 1);
    }

    #[test]
    fn test_preview_only_while_idle() {
        let mut state = duel(Vec2::new(50.0, 40.0), Vec::new());
        tick(&mut state, &frame(16.0, Vec2::new(0.0, 50.0))).expect("tick");
        assert!(state.preview_active());
        assert!(!state.projectile.visible);

        state.pointer_down(PointerButton::Primary);
        assert!(!state.preview_active());
        assert!(state.projectile.visible);

        tick(&mut state, &frame(16.0, Vec2::new(0.0, 50.0))).expect("tick");
        assert_eq!(state.phase, TurnPhase::InFlight);
        assert!(!state.preview_active());
    }

    #[test]
    fn test_first_step_of_flight() {
        let mut state = duel(Vec2::new(50.0, 40.0), Vec::new());
        tick(&mut state, &frame(16.0, Vec2::new(200.0, 0.0))).expect("tick");
        state.pointer_down(PointerButton::Primary);
        assert!((state.projectile.vel - Vec2::new(120.0, 0.0)).length() < 1e-4);

        tick(&mut state, &frame(50.0, Vec2::new(200.0, 0.0))).expect("tick");
        assert!((state.projectile.pos - Vec2::new(-38.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_planet_hit_passes_turn() {
        let planet = Planet::new(Vec2::new(0.0, 0.0), 10.0, 14.1, Vec3::ZERO);
        let mut state = duel(Vec2::new(50.0, 40.0), vec![planet]);
        state.pointer_target = Some(Vec2::new(0.0, 0.0));
        state.pointer_down(PointerButton::Primary);

        run_until_idle_or_resolving(&mut state);
        assert_eq!(state.phase, TurnPhase::Idle);
        assert_eq!(state.player, Player::Second);
        assert!(!state.projectile.visible);
        assert_eq!(state.explosions.len(), 1);

        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            MatchEvent::Impact {
                kind: CollisionKind::PlanetHit,
                ..
            }
        )));
        assert!(events.contains(&MatchEvent::TurnPassed { to: Player::Second }));
    }

    #[test]
    fn test_opponent_hit_resolves_then_new_round() {
        let mut state = duel(Vec2::new(50.0, 0.0), Vec::new());
        state.pointer_target = Some(Vec2::new(200.0, 0.0));
        state.pointer_down(PointerButton::Primary);

        run_until_idle_or_resolving(&mut state);
        assert_eq!(state.phase, TurnPhase::Resolving);
        assert_eq!(state.player, Player::First);
        assert!(state.level.ships[1].destroyed);
        assert_eq!(state.scores, [1, 0]);
        assert!(state.death_burst.is_some());

        // No firing and no preview while the wreck burns
        assert!(!state.pointer_down(PointerButton::Primary));
        for _ in 0..10 {
            tick(&mut state, &frame(100.0, Vec2::new(0.0, 0.0))).expect("tick");
            assert_eq!(state.player, Player::First);
            assert!(!state.preview_active());
        }
        assert!(state.explosions.len() > 1);

        // Burn out the remaining burst time; a fresh level starts
        for _ in 0..25 {
            tick(&mut state, &frame(100.0, Vec2::new(0.0, 0.0))).expect("tick");
        }
        assert_eq!(state.phase, TurnPhase::Idle);
        assert_eq!(state.player, Player::Second);
        assert_eq!(state.round, 2);
        assert!(state.death_burst.is_none());
        assert!(state.level.ships.iter().all(|s| !s.destroyed));
    }

    #[test]
    fn test_explosions_fade_out() {
        let mut state = duel(Vec2::new(50.0, 40.0), Vec::new());
        state.explosions.push(Explosion::new(Vec2::ZERO));
        let input = FrameInput {
            delta_ms: 1000.0 / 60.0 + 0.01,
            pointer_target: None,
        };
        for _ in 0..40 {
            tick(&mut state, &input).expect("tick");
        }
        assert!(state.explosions.is_empty());
    }

    #[test]
    fn test_long_frame_gap_is_bounded() {
        let mut state = duel(Vec2::new(50.0, 0.0), Vec::new());
        state.pointer_target = Some(Vec2::new(200.0, 0.0));
        state.pointer_down(PointerButton::Primary);
        run_until_idle_or_resolving(&mut state);
        assert_eq!(state.phase, TurnPhase::Resolving);
        state.drain_events();

        // A stall of almost a week arrives as one frame
        let input = FrameInput {
            delta_ms: 6.0e8,
            pointer_target: None,
        };
        tick(&mut state, &input).expect("tick");

        assert!(state.effect_accumulator_ms <= EFFECT_TICK_MS);
        assert_eq!(state.phase, TurnPhase::Idle);
        assert_eq!(state.round, 2);
        assert!(state.death_burst.is_none());

        // Later frames keep ticking normally
        tick(&mut state, &frame(16.0, Vec2::ZERO)).expect("tick");
        assert_eq!(state.phase, TurnPhase::Idle);
    }

    #[test]
    fn test_long_frame_gap_fades_explosions_in_steps() {
        let mut state = duel(Vec2::new(50.0, 40.0), Vec::new());
        state.explosions.push(Explosion::new(Vec2::ZERO));
        let input = FrameInput {
            delta_ms: 6.0e8,
            pointer_target: None,
        };
        tick(&mut state, &input).expect("tick");

        // Only the capped number of fade ticks ran
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.explosions[0].stage, 25 * MAX_EFFECT_TICKS);
        assert!(state.effect_accumulator_ms <= EFFECT_TICK_MS);
    }

    #[test]
    fn test_heading_follows_pointer() {
        let mut state = duel(Vec2::new(50.0, 40.0), Vec::new());
        tick(&mut state, &frame(16.0, Vec2::new(-50.0, 30.0))).expect("tick");
        let heading = state.level.ships[0].heading;
        assert!((heading - std::f32::consts::PI).abs() < 1e-5);
    }

    #[test]
    fn test_marker_pulse_cycle() {
        let mut state = duel(Vec2::new(50.0, 40.0), Vec::new());
        assert_eq!(state.marker_pulse(), 0.0);
        state.animation_frame = 30;
        assert!((state.marker_pulse() - 30.0 / 180.0).abs() < 1e-6);
        state.animation_frame = 45;
        assert!((state.marker_pulse() - 15.0 / 180.0).abs() < 1e-6);
    }
}
