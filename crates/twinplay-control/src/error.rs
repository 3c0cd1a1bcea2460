//! Error types for paired playback
use thiserror::Error;
use twinplay_core::EngineError;

/// Why a synchronized action did not happen.
///
/// Every variant is fatal to the attempted action only. The `Display`
/// text is what the control surface shows.
#[derive(Error, Debug)]
pub enum SyncError {
    /// No partner address configured
    #[error("Partner URL not set.")]
    NotConfigured,

    /// Readiness gate not satisfied
    #[error("Not ready: {0}")]
    NotReady(String),

    /// All attempts failed at the network layer
    #[error("Failed to connect to partner.")]
    Unreachable,

    /// The partner answered but refused the command
    #[error("Partner rejected the command: {0}")]
    RemoteRejected(String),

    /// No medium loaded on the local engine
    #[error("Player not initialized")]
    EngineUninitialized,

    /// Other local engine failure
    #[error("Engine error: {0}")]
    Engine(EngineError),

    /// Invalid user input
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The control server could not listen
    #[error("Failed to bind control server: {0}")]
    Bind(String),

    /// HTTP stack error outside a command exchange
    #[error("HTTP error: {0}")]
    Http(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<EngineError> for SyncError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotInitialized => SyncError::EngineUninitialized,
            other => SyncError::Engine(other),
        }
    }
}

/// Result type for synchronization operations
pub type Result<T> = std::result::Result<T, SyncError>;
