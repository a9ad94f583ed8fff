//! Level generation
//!
//! Ships and planets are dropped at uniformly random points inside the arena
//! and rejected while they overlap anything placed before them. A body that
//! cannot be placed within its sample budget invalidates the whole level,
//! which is then regenerated from scratch a bounded number of times.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::{Arena, Planet, Player, Ship};
use crate::error::DuelError;
use crate::settings::Settings;
use crate::size_from_extents;

/// Inner placement failure (recovered by regenerating the level)
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LevelError {
    #[error("no free position for a body of size {size} after {attempts} samples")]
    PlacementExhausted { size: f32, attempts: u32 },
}

/// Snapshot of an already placed body, used only for overlap tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pos: Vec2,
    pub r: f32,
}

impl Placement {
    /// Whether a circle of radius `r` at `pos` intersects this placement
    #[inline]
    pub fn overlaps(&self, pos: Vec2, r: f32) -> bool {
        let reach = self.r + r;
        self.pos.distance_squared(pos) < reach * reach
    }
}

/// Rejection sampler over the arena
pub struct Placer<'a, R: Rng + ?Sized> {
    arena: Arena,
    rng: &'a mut R,
    max_attempts: u32,
    placed: Vec<Placement>,
}

impl<'a, R: Rng + ?Sized> Placer<'a, R> {
    pub fn new(arena: Arena, rng: &'a mut R, max_attempts: u32) -> Self {
        Self {
            arena,
            rng,
            max_attempts,
            placed: Vec::new(),
        }
    }

    /// Find a free spot for a body of placement size `size`, accepted only if
    /// `constraint` also holds, and record it with radius `record_r`.
    pub fn place(
        &mut self,
        size: f32,
        record_r: f32,
        constraint: impl Fn(Vec2) -> bool,
    ) -> Result<Vec2, LevelError> {
        for _ in 0..self.max_attempts {
            let pos = self.arena.random_point(&mut *self.rng);
            if !constraint(pos) {
                continue;
            }
            if self.placed.iter().any(|p| p.overlaps(pos, size)) {
                continue;
            }
            self.placed.push(Placement { pos, r: record_r });
            return Ok(pos);
        }
        Err(LevelError::PlacementExhausted {
            size,
            attempts: self.max_attempts,
        })
    }

    pub fn rng(&mut self) -> &mut R {
        &mut *self.rng
    }
}

/// Static layout of one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub arena: Arena,
    pub ships: [Ship; 2],
    pub planets: Vec<Planet>,
}

impl Level {
    /// Build a level from explicit positions (scripted rounds and tests)
    pub fn new(arena: Arena, ships: [Ship; 2], planets: Vec<Planet>) -> Self {
        Self {
            arena,
            ships,
            planets,
        }
    }

    pub fn ship(&self, player: Player) -> &Ship {
        &self.ships[player.index()]
    }

    pub fn ship_mut(&mut self, player: Player) -> &mut Ship {
        &mut self.ships[player.index()]
    }

    /// Generate a level, regenerating from scratch when a body cannot be placed
    pub fn generate<R: Rng + ?Sized>(settings: &Settings, rng: &mut R) -> Result<Self, DuelError> {
        settings.validate()?;
        let mut attempt = 1;
        loop {
            match Self::try_generate(settings, rng) {
                Ok(level) => {
                    log::debug!(
                        "Level generated on attempt {} ({} planets)",
                        attempt,
                        level.planets.len()
                    );
                    return Ok(level);
                }
                Err(err) if attempt < settings.level_attempts => {
                    log::warn!("Error while generating level: {err}. Regenerating...");
                    attempt += 1;
                }
                Err(last) => {
                    log::error!("Giving up on level generation after {attempt} attempts: {last}");
                    return Err(DuelError::LevelGenerationExhausted {
                        attempts: attempt,
                        last,
                    });
                }
            }
        }
    }

    /// A single generation pass: both ships, then every planet
    fn try_generate<R: Rng + ?Sized>(settings: &Settings, rng: &mut R) -> Result<Self, LevelError> {
        let arena = Arena::from_settings(settings);
        let mut placer = Placer::new(arena, rng, settings.placement_attempts);

        let ship_size = size_from_extents(Vec2::splat(settings.ship_extent));
        // Ships keep to their own half of the arena
        let first = placer.place(settings.ship_spacing, ship_size, |p| p.x < 0.0)?;
        let second = placer.place(settings.ship_spacing, ship_size, |p| p.x > 0.0)?;
        let ships = [
            Ship::new(first, ship_size, Player::First),
            Ship::new(second, ship_size, Player::Second),
        ];

        let mut planets = Vec::with_capacity(settings.planet_count);
        for _ in 0..settings.planet_count {
            let radius = if settings.planet_radius_max > settings.planet_radius_min {
                placer
                    .rng()
                    .random_range(settings.planet_radius_min..settings.planet_radius_max)
            } else {
                settings.planet_radius_min
            };
            let size = size_from_extents(Vec2::splat(radius * 2.0));
            let pos = placer.place(size, size, |_| true)?;
            let spin = random_rotation(placer.rng());
            planets.push(Planet::new(pos, radius, size, spin));
        }

        Ok(Self {
            arena,
            ships,
            planets,
        })
    }
}

fn random_rotation<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    use std::f32::consts::TAU;
    Vec3::new(
        rng.random::<f32>() * TAU,
        rng.random::<f32>() * TAU,
        rng.random::<f32>() * TAU,
    )
}
