//! Trajectory preview
//!
//! Runs the same integrator and collision checks as a live shot, but with many
//! fine sub-steps per marker. Recomputed from scratch every frame while the
//! shooter is aiming.

use glam::Vec2;

use super::collision::classify;
use super::gravity::Gravity;
use super::level::Level;
use super::state::{Player, TraceMarker};
use crate::settings::Settings;

/// Predicts where a shot would travel
#[derive(Debug, Clone, Copy)]
pub struct TrajectoryPreview<'a> {
    pub level: &'a Level,
    pub gravity: Gravity,
    pub shooter: Player,
    pub opponent_radius: f32,
    /// Integrator sub-steps between two markers
    pub substeps: u32,
    pub substep_dt: f32,
}

impl<'a> TrajectoryPreview<'a> {
    pub fn new(level: &'a Level, settings: &Settings, shooter: Player) -> Self {
        Self {
            level,
            gravity: Gravity::from_settings(settings),
            shooter,
            opponent_radius: settings.opponent_hit_radius,
            substeps: settings.preview_substeps,
            substep_dt: settings.preview_substep_dt(),
        }
    }

    /// Fill `markers` with the predicted path from `origin` at `velocity`.
    ///
    /// On a predicted collision the marker is pulled back one sub-step and
    /// every later marker is hidden at that same point.
    pub fn trace(&self, origin: Vec2, velocity: Vec2, markers: &mut [TraceMarker]) {
        let mut pos = origin;
        let mut vel = velocity;
        let mut collided = false;

        for marker in markers.iter_mut() {
            if !collided {
                for _ in 0..self.substeps {
                    self.gravity
                        .step(&mut pos, &mut vel, self.substep_dt, &self.level.planets);
                    if classify(pos, self.shooter, self.level, self.opponent_radius).is_hit() {
                        pos -= vel * self.substep_dt;
                        collided = true;
                        break;
                    }
                }
                marker.visible = true;
            } else {
                marker.visible = false;
            }
            marker.pos = pos;
        }
    }
}

/// Hide every marker
pub fn hide_markers(markers: &mut [TraceMarker]) {
    for marker in markers {
        marker.visible = false;
    }
}
