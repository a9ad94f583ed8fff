//! Match state and core simulation types
//!
//! Everything the display collaborator reads each frame lives here: ship and
//! planet layout, the projectile, preview markers and live explosions.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CollisionKind;
use super::effects::{DeathBurst, Explosion};
use super::level::Level;
use crate::error::DuelError;
use crate::settings::Settings;

/// One of the two duelling players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    First,
    Second,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::First, Player::Second];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }

    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
}

/// Current phase of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Waiting for the current player to aim and fire; preview is live
    Idle,
    /// A shot is travelling
    InFlight,
    /// The opponent was hit; death burst plays until the round ends
    Resolving,
}

/// Rectangular play bound, stored as half-extents around the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub half_extents: Vec2,
}

impl Arena {
    pub fn new(half_extents: Vec2) -> Self {
        Self { half_extents }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.half_extents())
    }

    /// Whether a point lies inside the bound (edges included)
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x.abs() <= self.half_extents.x && p.y.abs() <= self.half_extents.y
    }

    /// Uniform random point inside the bound
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let x = (rng.random::<f32>() - 0.5) * 2.0 * self.half_extents.x;
        let y = (rng.random::<f32>() - 0.5) * 2.0 * self.half_extents.y;
        Vec2::new(x, y)
    }
}

/// A player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub owner: Player,
    pub pos: Vec2,
    /// Bounding-box derived placement size
    pub size: f32,
    /// Facing angle in radians (turns toward the pointer while aiming)
    pub heading: f32,
    /// Idle bob angle
    pub tilt: f32,
    pub visible: bool,
    pub destroyed: bool,
}

impl Ship {
    pub fn new(pos: Vec2, size: f32, owner: Player) -> Self {
        // Ships start facing each other
        let heading = match owner {
            Player::First => std::f32::consts::FRAC_PI_2,
            Player::Second => std::f32::consts::FRAC_PI_2 + std::f32::consts::PI,
        };
        Self {
            owner,
            pos,
            size,
            heading,
            tilt: 0.0,
            visible: true,
            destroyed: false,
        }
    }
}

/// A gravity well
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planet {
    pub pos: Vec2,
    /// Sphere radius; drives both mass and collision
    pub radius: f32,
    /// Bounding-box derived placement size
    pub size: f32,
    /// Cosmetic rotation (radians per axis)
    pub spin: Vec3,
    pub visible: bool,
}

impl Planet {
    pub fn new(pos: Vec2, radius: f32, size: f32, spin: Vec3) -> Self {
        Self {
            pos,
            radius,
            size,
            spin,
            visible: true,
        }
    }

    /// Mass proxy: volume of a unit-density sphere
    #[inline]
    pub fn mass(&self) -> f32 {
        4.0 / 3.0 * std::f32::consts::PI * self.radius.powi(3)
    }
}

/// The shell fired by the current player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Scratch: last acceleration applied by the integrator
    pub accel: Vec2,
    /// Scratch: last accumulated gravitational force
    pub force: Vec2,
    pub visible: bool,
}

impl Projectile {
    /// Reset for a fresh shot
    pub fn launch(&mut self, pos: Vec2, vel: Vec2) {
        self.pos = pos;
        self.vel = vel;
        self.accel = Vec2::ZERO;
        self.force = Vec2::ZERO;
        self.visible = true;
    }
}

/// One point of the trajectory preview
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceMarker {
    pub pos: Vec2,
    pub visible: bool,
}

/// Notifications for the display/audio side, drained once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum MatchEvent {
    /// A new round began on a fresh level
    RoundStarted { round: u32, first: Player },
    ShotFired { player: Player, velocity: Vec2 },
    /// A shot ended; `point` is where the explosion was spawned
    Impact {
        player: Player,
        point: Vec2,
        kind: CollisionKind,
    },
    TurnPassed { to: Player },
    ShipDestroyed { loser: Player, winner: Player },
}

/// Complete match state (owned by the match controller)
pub struct MatchState {
    pub settings: Settings,
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub level: Level,
    pub projectile: Projectile,
    pub markers: Vec<TraceMarker>,
    pub phase: TurnPhase,
    /// Whose turn it is
    pub player: Player,
    /// Last world-space point under the cursor, if the cursor ever hit the arena plane
    pub pointer_target: Option<Vec2>,
    pub explosions: Vec<Explosion>,
    pub death_burst: Option<DeathBurst>,
    /// Frame time not yet consumed by effect ticks
    pub(crate) effect_accumulator_ms: f32,
    /// Position within the ship bob / marker pulse cycle
    pub animation_frame: u32,
    pub round: u32,
    pub scores: [u32; 2],
    pub shots_fired: u32,
    pub(crate) events: Vec<MatchEvent>,
}

impl MatchState {
    /// Start a match on a freshly generated level
    pub fn new(settings: Settings, seed: u64) -> Result<Self, DuelError> {
        settings.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let level = Level::generate(&settings, &mut rng)?;
        log::info!("Match initialized with seed: {}", seed);
        Ok(Self::assemble(settings, seed, rng, level))
    }

    /// Start a match on a fixed level
    pub fn with_level(settings: Settings, level: Level, seed: u64) -> Self {
        Self::assemble(settings, seed, Pcg32::seed_from_u64(seed), level)
    }

    fn assemble(settings: Settings, seed: u64, rng: Pcg32, level: Level) -> Self {
        let markers = vec![TraceMarker::default(); settings.preview_markers];
        let mut state = Self {
            settings,
            seed,
            rng,
            level,
            projectile: Projectile::default(),
            markers,
            phase: TurnPhase::Idle,
            player: Player::First,
            pointer_target: None,
            explosions: Vec::new(),
            death_burst: None,
            effect_accumulator_ms: 0.0,
            animation_frame: 0,
            round: 1,
            scores: [0; 2],
            shots_fired: 0,
            events: Vec::new(),
        };
        state.events.push(MatchEvent::RoundStarted {
            round: 1,
            first: Player::First,
        });
        state
    }

    /// Replace the level with a new one and hand the first move to `first`.
    ///
    /// Clears the death burst and every transient effect of the old level.
    pub fn start_round(&mut self, first: Player) -> Result<(), DuelError> {
        self.level = Level::generate(&self.settings, &mut self.rng)?;
        self.death_burst = None;
        self.explosions.clear();
        self.effect_accumulator_ms = 0.0;
        self.projectile = Projectile::default();
        for marker in &mut self.markers {
            *marker = TraceMarker::default();
        }
        self.phase = TurnPhase::Idle;
        self.player = first;
        self.round += 1;
        log::info!("Round {} started, {:?} moves first", self.round, first);
        self.events.push(MatchEvent::RoundStarted {
            round: self.round,
            first,
        });
        Ok(())
    }

    pub fn current_ship(&self) -> &Ship {
        self.level.ship(self.player)
    }

    pub fn opponent_ship(&self) -> &Ship {
        self.level.ship(self.player.opponent())
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether any trajectory marker is currently shown
    pub fn preview_active(&self) -> bool {
        self.markers.iter().any(|m| m.visible)
    }
}
