//! Error types
//!
//! Level generation failures are retried locally (see [`crate::sim::level`]);
//! everything that reaches [`DuelError`] means the match or the scene setup
//! cannot continue.

use thiserror::Error;

use crate::sim::level::LevelError;

/// Top-level error for match setup and scene management
#[derive(Debug, Error)]
pub enum DuelError {
    /// Every level regeneration attempt failed to place all bodies
    #[error("level generation failed after {attempts} attempts: {last}")]
    LevelGenerationExhausted { attempts: u32, last: LevelError },

    /// A scene id was registered twice
    #[error("scene {0} already exists")]
    DuplicateScene(String),

    /// A scene id was requested that was never registered
    #[error("scene {0} does not exist")]
    UnknownScene(String),

    /// Settings values that the simulation cannot run with
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("failed to read settings file: {0}")]
    SettingsIo(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    SettingsParse(#[from] serde_json::Error),
}
