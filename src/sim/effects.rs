//! Cosmetic effects driven by accumulated frame time
//!
//! Explosions fade on a fixed 60 Hz effect tick; the death burst spawns a new
//! explosion around the destroyed ship at a fixed real-time interval. Both are
//! plain state advanced from the match frame, so tearing down a level drops
//! them with it.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_EFFECT_TICKS;
use crate::random_sphere_point;

/// Color stage at which the fade switches from cooling to shrinking
const COOL_STAGE_LIMIT: u32 = 0xBB;
/// Stage advance per effect tick while cooling
const COOL_STEP: u32 = 25;
/// Effect ticks spent shrinking from full size to nothing
const SHRINK_TICKS: u32 = 20;

/// A short-lived fireball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    /// Color stage (0 = hot orange, rising toward red)
    pub stage: u32,
    /// Effect ticks spent shrinking so far
    pub shrink: u32,
}

impl Explosion {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            stage: 0,
            shrink: 0,
        }
    }

    /// Size multiplier (1 = full size)
    pub fn scale(&self) -> f32 {
        1.0 - self.shrink.min(SHRINK_TICKS) as f32 / SHRINK_TICKS as f32
    }

    /// Green channel of the fireball color (red is always 1, blue 0)
    pub fn heat(&self) -> f32 {
        COOL_STAGE_LIMIT.saturating_sub(self.stage) as f32 / 256.0
    }

    /// Advance one effect tick
    pub fn advance(&mut self) {
        if self.stage <= COOL_STAGE_LIMIT {
            self.stage += COOL_STEP;
        } else {
            self.shrink = (self.shrink + 1).min(SHRINK_TICKS);
        }
    }

    pub fn finished(&self) -> bool {
        self.shrink >= SHRINK_TICKS
    }
}

/// Repeating explosions around a destroyed ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathBurst {
    pub target: Vec2,
    pub radius: f32,
    pub interval_ms: f32,
    /// Time since the last spawn
    accumulator_ms: f32,
    /// Time since the burst started
    pub elapsed_ms: f32,
}

impl DeathBurst {
    pub fn new(target: Vec2, radius: f32, interval_ms: f32) -> Self {
        Self {
            target,
            radius,
            interval_ms,
            accumulator_ms: 0.0,
            elapsed_ms: 0.0,
        }
    }

    /// Advance by `delta_ms`, returning the spawn points that came due
    pub fn advance<R: Rng + ?Sized>(&mut self, delta_ms: f32, rng: &mut R) -> Vec<Vec2> {
        self.elapsed_ms += delta_ms;
        self.accumulator_ms += delta_ms;

        let mut spawns = Vec::new();
        let cap = MAX_EFFECT_TICKS as usize;
        while self.accumulator_ms >= self.interval_ms && spawns.len() < cap {
            self.accumulator_ms -= self.interval_ms;
            let p = random_sphere_point(rng, self.target.extend(0.0), self.radius);
            spawns.push(p.truncate());
        }
        if spawns.len() == cap {
            self.accumulator_ms = self.accumulator_ms.min(self.interval_ms);
        }
        spawns
    }
}
