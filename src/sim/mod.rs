//! Deterministic simulation module
//!
//! All duel logic lives here. This module must stay pure and deterministic:
//! - Seeded RNG only (level layout, death burst points)
//! - Time enters only through the frame delta
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod gravity;
pub mod level;
pub mod preview;
pub mod state;
pub mod tick;

pub use collision::{CollisionKind, classify};
pub use effects::{DeathBurst, Explosion};
pub use gravity::Gravity;
pub use level::{Level, LevelError, Placer};
pub use preview::TrajectoryPreview;
pub use state::{
    Arena, MatchEvent, MatchState, Planet, Player, Projectile, Ship, TraceMarker, TurnPhase,
};
pub use tick::{FrameInput, PointerButton, aim_velocity, fire, tick};
