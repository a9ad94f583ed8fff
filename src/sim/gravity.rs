//! Projectile integration under planetary gravity
//!
//! Each planet is a uniform sphere of density 1, so its pull is
//! `G * (4/3 π r³) / d²` toward its center. Integration is semi-implicit
//! Euler: velocity first, then position with the updated velocity.

use glam::Vec2;

use super::state::Planet;
use crate::settings::Settings;

/// Point-mass gravity integrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    /// Gravitational constant
    pub constant: f32,
    /// Distance floor for the inverse-square law
    pub min_distance: f32,
}

impl Gravity {
    pub fn new(constant: f32, min_distance: f32) -> Self {
        Self {
            constant,
            min_distance,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.gravity_constant, settings.min_gravity_distance)
    }

    /// Total gravitational force on a unit mass at `pos`
    pub fn force_at(&self, pos: Vec2, planets: &[Planet]) -> Vec2 {
        planets.iter().fold(Vec2::ZERO, |total, planet| {
            let to_planet = planet.pos - pos;
            let d = to_planet.length().max(self.min_distance);
            let magnitude = self.constant * planet.mass() / (d * d);
            total + to_planet.normalize_or_zero() * magnitude
        })
    }

    /// Advance `pos`/`vel` by one sub-step of `dt`; returns the force applied
    pub fn step(&self, pos: &mut Vec2, vel: &mut Vec2, dt: f32, planets: &[Planet]) -> Vec2 {
        let force = self.force_at(*pos, planets);
        *vel += force * dt;
        *pos += *vel * dt;
        force
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn planet_at(pos: Vec2, radius: f32) -> Planet {
        Planet::new(pos, radius, radius * 1.41, Vec3::ZERO)
    }

    #[test]
    fn test_no_planets_is_linear_motion() {
        let gravity = Gravity::new(10.0, 0.01);
        let mut pos = Vec2::new(-50.0, 0.0);
        let mut vel = Vec2::new(120.0, 0.0);

        let force = gravity.step(&mut pos, &mut vel, 0.1, &[]);
        assert_eq!(force, Vec2::ZERO);
        assert_eq!(vel, Vec2::new(120.0, 0.0));
        assert!((pos - Vec2::new(-38.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_planet_on_axis_has_no_cross_force() {
        let gravity = Gravity::new(10.0, 0.01);
        let planets = [planet_at(Vec2::new(40.0, 0.0), 10.0)];
        let force = gravity.force_at(Vec2::new(-20.0, 0.0), &planets);

        assert_eq!(force.y, 0.0);
        assert!(force.x > 0.0);
        let expected = 10.0 * planets[0].mass() / (60.0 * 60.0);
        assert!((force.x - expected).abs() < 1e-3);
    }

    #[test]
    fn test_velocity_updates_before_position() {
        let gravity = Gravity::new(10.0, 0.01);
        let planets = [planet_at(Vec2::new(0.0, 10.0), 1.0)];
        let mut pos = Vec2::ZERO;
        let mut vel = Vec2::ZERO;
        let dt = 0.5;

        let force = gravity.step(&mut pos, &mut vel, dt, &planets);
        // Semi-implicit Euler moves the body on the very first step
        assert!((vel - force * dt).length() < 1e-6);
        assert!((pos - force * dt * dt).length() < 1e-6);
        assert!(pos.y > 0.0);
    }

    #[test]
    fn test_forces_superpose() {
        let gravity = Gravity::new(10.0, 0.01);
        let planets = [
            planet_at(Vec2::new(-30.0, 0.0), 5.0),
            planet_at(Vec2::new(30.0, 0.0), 5.0),
        ];
        let force = gravity.force_at(Vec2::ZERO, &planets);
        assert!(force.length() < 1e-3);
    }

    #[test]
    fn test_zero_distance_is_finite() {
        let gravity = Gravity::new(10.0, 0.01);
        let planets = [planet_at(Vec2::new(5.0, 5.0), 8.0)];
        let mut pos = Vec2::new(5.0, 5.0);
        let mut vel = Vec2::new(1.0, 0.0);
        gravity.step(&mut pos, &mut vel, 0.01, &planets);
        assert!(pos.is_finite());
        assert!(vel.is_finite());

        // Just off-center the floor caps the magnitude
        let near = gravity.force_at(Vec2::new(5.0, 5.0001), &planets);
        assert!(near.is_finite());
        assert!(near.length() <= 10.0 * planets[0].mass() / (0.01 * 0.01) + 1.0);
    }
}
