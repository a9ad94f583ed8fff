//! Shot collision classification
//!
//! Checks run in a fixed precedence: arena bounds, then planets, then the
//! opposing ship. The first match wins, so a point that is both outside the
//! arena and inside a planet reports `OutOfBounds`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::Level;
use super::state::{Arena, Planet, Player};

/// Outcome of testing a projectile position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    None,
    OutOfBounds,
    PlanetHit,
    OpponentHit,
}

impl CollisionKind {
    /// Whether the shot ends here
    #[inline]
    pub fn is_hit(self) -> bool {
        self != CollisionKind::None
    }
}

/// Point strictly inside a circle (`d² − r² < 0`)
#[inline]
pub fn point_in_circle(p: Vec2, center: Vec2, radius: f32) -> bool {
    p.distance_squared(center) - radius * radius < 0.0
}

/// Check a point against the arena's half-extents
#[inline]
pub fn out_of_bounds(p: Vec2, arena: &Arena) -> bool {
    !arena.contains(p)
}

/// Check a point against every planet
pub fn hits_planet(p: Vec2, planets: &[Planet]) -> bool {
    planets
        .iter()
        .any(|planet| point_in_circle(p, planet.pos, planet.radius))
}

/// Classify a projectile position for a shot fired by `shooter`.
///
/// The opposing ship uses the fixed `opponent_radius`, not its placement size.
pub fn classify(p: Vec2, shooter: Player, level: &Level, opponent_radius: f32) -> CollisionKind {
    if out_of_bounds(p, &level.arena) {
        return CollisionKind::OutOfBounds;
    }
    if hits_planet(p, &level.planets) {
        return CollisionKind::PlanetHit;
    }
    let opponent = level.ship(shooter.opponent());
    if point_in_circle(p, opponent.pos, opponent_radius) {
        return CollisionKind::OpponentHit;
    }
    CollisionKind::None
}
