//! Playback engine abstraction
//!
//! The engine is the one shared mutable resource of an instance. Calls are
//! not reentrant; [`crate::Session`] serializes every access behind a lock.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No medium has been opened yet
    #[error("Player not initialized")]
    NotInitialized,

    /// The requested medium does not exist
    #[error("File does not exist: {0}")]
    FileNotFound(PathBuf),

    /// Backend-specific failure
    #[error("Engine error: {0}")]
    Backend(String),
}

/// Coarse engine state reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    /// No medium opened
    #[default]
    Idle,
    /// Medium opened, not running
    Stopped,
    /// Running
    Playing,
    /// Paused mid-medium
    Paused,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EngineState::Idle => "Idle",
            EngineState::Stopped => "Stopped",
            EngineState::Playing => "Playing",
            EngineState::Paused => "Paused",
        };
        f.write_str(text)
    }
}

/// A local media player.
///
/// Every operation must be safe to apply twice in a row with the same
/// effect as applying it once: a lost reply makes the peer retry, and the
/// retried command lands on an engine that already executed it.
pub trait PlaybackEngine: Send {
    /// Open a medium, replacing any current one
    fn open(&mut self, path: &Path) -> Result<(), EngineError>;

    /// Start or resume playback
    fn play(&mut self) -> Result<(), EngineError>;

    /// Pause playback. Pausing a paused engine is a no-op.
    fn pause(&mut self) -> Result<(), EngineError>;

    /// Stop and rewind to the start
    fn stop(&mut self) -> Result<(), EngineError>;

    /// Current position in milliseconds
    fn position_ms(&self) -> u64;

    /// Duration in milliseconds, 0 when unknown
    fn duration_ms(&self) -> u64;

    /// Jump to an absolute position in milliseconds
    fn set_position_ms(&mut self, ms: u64) -> Result<(), EngineError>;

    /// Whether a medium is open
    fn is_loaded(&self) -> bool;

    /// Coarse state for display
    fn state(&self) -> EngineState;
}
