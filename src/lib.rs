//! Orbit Duel - a two-player orbital artillery game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level generation, gravity, collisions, turns)
//! - `scene`: Scene capability trait, menu/game scenes and the scene registry
//! - `game`: Frame timing, zoom and input dispatch to the active scene
//! - `settings`: Data-driven simulation constants
//! - `error`: Error types shared across the crate

pub mod error;
pub mod game;
pub mod scene;
pub mod settings;
pub mod sim;

pub use error::DuelError;
pub use game::Game;
pub use settings::Settings;

use glam::{Vec2, Vec3};
use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Gravitational constant used by the integrator
    pub const GRAVITY_CONSTANT: f32 = 10.0;
    /// Smallest distance used in the inverse-square law
    pub const MIN_GRAVITY_DISTANCE: f32 = 0.01;

    /// Arena dimensions (full extents; half of each is the playable bound)
    pub const ARENA_WIDTH: f32 = 300.0;
    pub const ARENA_HEIGHT: f32 = 200.0;

    /// Frame milliseconds per simulation time unit for in-flight shots
    pub const FRAME_TIME_SCALE_MS: f32 = 500.0;

    /// Aim velocity bounds (shared by live shots and the preview)
    pub const MIN_AIM_SPEED: f32 = 1.0;
    pub const MAX_AIM_SPEED: f32 = 120.0;

    /// Fixed hit radius of the opposing ship
    pub const OPPONENT_HIT_RADIUS: f32 = 7.0;

    /// Trajectory preview
    pub const PREVIEW_MARKERS: usize = 5;
    pub const PREVIEW_TIME: f32 = 0.2;
    pub const PREVIEW_SUBSTEPS: u32 = 100;

    /// Level layout
    pub const PLANET_COUNT: usize = 20;
    pub const PLANET_RADIUS_MIN: f32 = 8.0;
    pub const PLANET_RADIUS_MAX: f32 = 15.0;
    /// Ship model bounding box edge (after scaling)
    pub const SHIP_EXTENT: f32 = 10.0;
    /// Clearance radius used when placing a ship, keeps the two ships apart
    pub const SHIP_SPACING: f32 = 150.0;
    pub const PLACEMENT_ATTEMPTS: u32 = 10_000;
    pub const LEVEL_ATTEMPTS: u32 = 10;

    /// Death burst
    pub const DEATH_BURST_INTERVAL_MS: f32 = 250.0;
    pub const DEATH_BURST_RADIUS: f32 = 5.0;
    pub const DEATH_BURST_DURATION_MS: f32 = 3000.0;

    /// Effect animation tick (explosion fade runs at 60 Hz)
    pub const EFFECT_TICK_MS: f32 = 1000.0 / 60.0;
    /// Max effect ticks (and death burst spawns) caught up in one frame
    pub const MAX_EFFECT_TICKS: u32 = 8;
    /// Frames in one ship bob / marker pulse cycle
    pub const ANIMATION_CYCLE: u32 = 60;

    /// Ratio between a bounding box half-edge and the body's placement size
    pub const BOUNDING_MARGIN: f32 = 1.41;
}

/// Placement size of a body from its bounding box extents
#[inline]
pub fn size_from_extents(extents: Vec2) -> f32 {
    extents.x.max(extents.y) / 2.0 * consts::BOUNDING_MARGIN
}

/// Clamp a vector's length into `[min, max]`.
///
/// A zero-length vector has no direction to scale, so it is replaced by
/// `fallback` scaled to `min`.
#[inline]
pub fn clamp_length_or(v: Vec2, min: f32, max: f32, fallback: Vec2) -> Vec2 {
    let len_sq = v.length_squared();
    if len_sq == 0.0 || !len_sq.is_finite() {
        fallback * min
    } else if len_sq < min * min {
        v * (min / len_sq.sqrt())
    } else if len_sq > max * max {
        v * (max / len_sq.sqrt())
    } else {
        v
    }
}

/// Uniformly distributed point on the surface of a sphere
pub fn random_sphere_point<R: Rng + ?Sized>(rng: &mut R, center: Vec3, radius: f32) -> Vec3 {
    use std::f32::consts::TAU;

    let u: f32 = rng.random();
    let v: f32 = rng.random();
    let theta = TAU * u;
    let phi = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();

    center
        + Vec3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_clamp_length_bounds() {
        let fast = clamp_length_or(Vec2::new(300.0, 400.0), 1.0, 120.0, Vec2::X);
        assert!((fast.length() - 120.0).abs() < 1e-4);
        assert!((fast.normalize() - Vec2::new(0.6, 0.8)).length() < 1e-5);

        let slow = clamp_length_or(Vec2::new(0.3, 0.4), 1.0, 120.0, Vec2::X);
        assert!((slow.length() - 1.0).abs() < 1e-5);

        let mid = clamp_length_or(Vec2::new(30.0, 40.0), 1.0, 120.0, Vec2::X);
        assert_eq!(mid, Vec2::new(30.0, 40.0));
    }

    #[test]
    fn test_clamp_length_zero_uses_fallback() {
        let v = clamp_length_or(Vec2::ZERO, 1.0, 120.0, Vec2::NEG_X);
        assert_eq!(v, Vec2::NEG_X);
    }

    #[test]
    fn test_size_from_extents() {
        let size = size_from_extents(Vec2::new(10.0, 4.0));
        assert!((size - 7.05).abs() < 1e-5);
    }

    #[test]
    fn test_random_sphere_point_on_surface() {
        let mut rng = Pcg32::seed_from_u64(7);
        let center = Vec3::new(10.0, -5.0, 0.0);
        for _ in 0..100 {
            let p = random_sphere_point(&mut rng, center, 5.0);
            assert!(((p - center).length() - 5.0).abs() < 1e-3);
        }
    }
}
