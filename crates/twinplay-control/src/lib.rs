//! TwinPlay Control - Paired Playback Synchronization Protocol
//!
//! This crate keeps two instances of the player in lock-step:
//! - **Control Server**: HTTP endpoint the partner uses to drive our engine
//! - **Retry Policy**: bounded retry around outbound delivery
//! - **Command Dispatcher**: sends a command to the partner and reports
//!   whether it was confirmed, enforcing the readiness gate first
//! - **PlaybackSync**: what a control surface calls; applies each action
//!   locally only after the partner confirmed it
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use twinplay_control::{CommandDispatcher, ControlServer, PlaybackSync, RetryPolicy};
//! use twinplay_core::{status_channel, ServerConfig, Session};
//! use twinplay_media::HeadlessEngine;
//!
//! # async fn run() -> twinplay_control::Result<()> {
//! let session = Arc::new(Session::new(Box::new(HeadlessEngine::new())));
//! let server = ControlServer::bind(&ServerConfig::default(), session.clone()).await?;
//! let _handle = server.spawn();
//!
//! let (status, _events) = status_channel();
//! let dispatcher = CommandDispatcher::new(session, RetryPolicy::default(), status)?;
//! let sync = PlaybackSync::new(dispatcher);
//! sync.set_peer("http://192.168.1.20:5000")?;
//! sync.play().await?;
//! # Ok(())
//! # }
//! ```

/// Outbound command delivery and the readiness gate
pub mod dispatcher;
/// Error types
pub mod error;
/// Wire format shared by server and client
pub mod protocol;
/// Bounded retry for outbound requests
pub mod retry;
/// Control-surface facade
pub mod sync;
/// Control server
pub mod web;

// Re-exports
pub use dispatcher::CommandDispatcher;
pub use error::{Result, SyncError};
pub use protocol::{route_for, CommandResult, ControlReply, ReplyStatus};
pub use retry::RetryPolicy;
pub use sync::PlaybackSync;
pub use web::ControlServer;
