//=========================================================================
// Errors
//=========================================================================
//
// Fallible surfaces only: level content, settings, and the platform
// event loop. Rejected gameplay requests are not errors; they return
// `false` and log a warning.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use thiserror::Error;

//=== ConfigError =========================================================

/// Level catalog and settings failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("StartLevel requested without a level number")]
    MissingLevelNumber,

    #[error("level {0} is not in the catalog")]
    UnknownLevel(u32),

    #[error("level {number} is defined more than once")]
    DuplicateLevel { number: u32 },

    #[error("piece '{piece}' in level {level} has fewer than 3 shape points")]
    DegenerateShape { level: u32, piece: String },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

//=== PlatformError =======================================================

/// Windowing failures. Fatal: the engine cannot run without an event loop.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] winit::error::EventLoopError),

    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] winit::error::EventLoopError),
}

//=== PuzzleError =========================================================

/// Anything that stops the simulation.
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

//=========================================================================
// Unit Tests
//=========================================================================
