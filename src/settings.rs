//! Simulation settings
//!
//! Every tunable constant of a match lives here and is passed into the
//! simulation at construction. Defaults mirror [`crate::consts`]; a JSON file
//! may override any subset of fields.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::DuelError;

/// Match settings (immutable once a match starts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Physics ===
    /// Gravitational constant `G`
    pub gravity_constant: f32,
    /// Floor applied to the projectile-planet distance
    pub min_gravity_distance: f32,
    /// Milliseconds of frame time per simulation time unit
    pub frame_time_scale_ms: f32,

    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Aiming ===
    pub min_aim_speed: f32,
    pub max_aim_speed: f32,
    /// Fixed hit radius of the opposing ship
    pub opponent_hit_radius: f32,

    // === Trajectory preview ===
    pub preview_markers: usize,
    /// Simulated time covered by each marker
    pub preview_time: f32,
    /// Integrator sub-steps per marker
    pub preview_substeps: u32,

    // === Level generation ===
    pub planet_count: usize,
    pub planet_radius_min: f32,
    pub planet_radius_max: f32,
    /// Ship bounding box edge length
    pub ship_extent: f32,
    /// Clearance radius used when placing ships
    pub ship_spacing: f32,
    /// Random samples per body before the level is discarded
    pub placement_attempts: u32,
    /// Whole-level regenerations before giving up
    pub level_attempts: u32,

    // === Death burst ===
    pub death_burst_interval_ms: f32,
    pub death_burst_radius: f32,
    /// How long the destroyed ship burns before the next round starts
    pub death_burst_duration_ms: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gravity_constant: GRAVITY_CONSTANT,
            min_gravity_distance: MIN_GRAVITY_DISTANCE,
            frame_time_scale_ms: FRAME_TIME_SCALE_MS,

            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            min_aim_speed: MIN_AIM_SPEED,
            max_aim_speed: MAX_AIM_SPEED,
            opponent_hit_radius: OPPONENT_HIT_RADIUS,

            preview_markers: PREVIEW_MARKERS,
            preview_time: PREVIEW_TIME,
            preview_substeps: PREVIEW_SUBSTEPS,

            planet_count: PLANET_COUNT,
            planet_radius_min: PLANET_RADIUS_MIN,
            planet_radius_max: PLANET_RADIUS_MAX,
            ship_extent: SHIP_EXTENT,
            ship_spacing: SHIP_SPACING,
            placement_attempts: PLACEMENT_ATTEMPTS,
            level_attempts: LEVEL_ATTEMPTS,

            death_burst_interval_ms: DEATH_BURST_INTERVAL_MS,
            death_burst_radius: DEATH_BURST_RADIUS,
            death_burst_duration_ms: DEATH_BURST_DURATION_MS,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, DuelError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DuelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Arena half-extents, the bound used by placement and out-of-bounds checks
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.arena_width / 2.0, self.arena_height / 2.0)
    }

    /// Duration of one preview sub-step
    pub fn preview_substep_dt(&self) -> f32 {
        self.preview_time / self.preview_substeps as f32
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), DuelError> {
        let positive = [
            ("gravity_constant", self.gravity_constant),
            ("min_gravity_distance", self.min_gravity_distance),
            ("frame_time_scale_ms", self.frame_time_scale_ms),
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("min_aim_speed", self.min_aim_speed),
            ("opponent_hit_radius", self.opponent_hit_radius),
            ("preview_time", self.preview_time),
            ("planet_radius_min", self.planet_radius_min),
            ("ship_extent", self.ship_extent),
            ("death_burst_interval_ms", self.death_burst_interval_ms),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(DuelError::InvalidSettings(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        if self.max_aim_speed < self.min_aim_speed {
            return Err(DuelError::InvalidSettings(format!(
                "max_aim_speed ({}) is below min_aim_speed ({})",
                self.max_aim_speed, self.min_aim_speed
            )));
        }
        if self.planet_radius_max < self.planet_radius_min {
            return Err(DuelError::InvalidSettings(format!(
                "planet_radius_max ({}) is below planet_radius_min ({})",
                self.planet_radius_max, self.planet_radius_min
            )));
        }
        if self.preview_substeps == 0 {
            return Err(DuelError::InvalidSettings(
                "preview_substeps must be at least 1".to_string(),
            ));
        }
        if self.placement_attempts == 0 || self.level_attempts == 0 {
            return Err(DuelError::InvalidSettings(
                "placement_attempts and level_attempts must be at least 1".to_string(),
            ));
        }
        let non_negative = [
            ("ship_spacing", self.ship_spacing),
            ("death_burst_radius", self.death_burst_radius),
            ("death_burst_duration_ms", self.death_burst_duration_ms),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(DuelError::InvalidSettings(format!(
                    "{name} cannot be negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}
