//! TwinPlay Core - Domain Model for Paired Playback
//!
//! This crate contains the state shared by both halves of a paired playback
//! instance, including:
//! - Commands exchanged between peers and absolute playback positions
//! - The readiness gate (which side has a medium loaded)
//! - The playback engine abstraction
//! - The instance-scoped [`Session`] owning the engine handle
//! - Status events published to the control surface
//! - Configuration and logging settings
//!
//! Networking lives in `twinplay-control`; engine backends live in
//! `twinplay-media`.

#![warn(missing_docs)]

pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod logging;
pub mod peer;
pub mod readiness;
pub mod session;
pub mod status;

// --- Re-exports grouped by category ---

// Protocol values
pub use command::{Command, PlaybackPosition};
pub use peer::PeerAddress;

// Readiness
pub use readiness::{ReadinessPhase, ReadinessState};

// Engine & Session
pub use engine::{EngineError, EngineState, PlaybackEngine};
pub use session::{Applied, MediaInfo, Progress, Session};

// Status
pub use status::{status_channel, StatusEvent, StatusReceiver, StatusSender};

// Configuration & Logging
pub use config::{
    AppConfig, ConfigError, EngineBackend, EngineConfig, PeerConfig, RetryConfig, ServerConfig,
};
pub use logging::LogConfig;
