//! Instance-scoped session
//!
//! One [`Session`] per running instance owns the playback engine, the
//! readiness flags, the configured peer and the loaded medium. The control
//! server and the command dispatcher share it through an `Arc`; nothing
//! here is process-global.

use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::clock::format_clock;
use crate::engine::{EngineError, EngineState, PlaybackEngine};
use crate::{Command, PeerAddress, PlaybackPosition, ReadinessPhase, ReadinessState};

/// Outcome of applying a [`Command`] to this instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Playback started
    Play,
    /// Playback paused
    Pause,
    /// Playback stopped
    Stop,
    /// Engine moved to the given absolute position
    Seek(PlaybackPosition),
    /// Answer to a readiness query: whether a medium is loaded here
    Readiness(bool),
    /// This side is now marked loaded
    Loaded,
}

/// Snapshot of the loaded medium for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaInfo {
    /// Path of the loaded medium
    pub path: Option<PathBuf>,
    /// Engine state
    pub state: EngineState,
    /// Current position in milliseconds
    pub position_ms: u64,
    /// Duration in milliseconds, 0 when unknown
    pub duration_ms: u64,
}

impl fmt::Display for MediaInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string());
        writeln!(f, "Media Path: {}", path)?;
        writeln!(f, "Player State: {}", self.state)?;
        writeln!(f, "Current Time: {}", format_clock(self.position_ms))?;
        write!(f, "Total Duration: {}", format_clock(self.duration_ms))
    }
}

/// Playback progress for the control surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Current position in milliseconds
    pub position_ms: u64,
    /// Duration in milliseconds, 0 when unknown
    pub duration_ms: u64,
}

impl Progress {
    /// Completed fraction in percent, `None` when the duration is unknown
    pub fn percent(&self) -> Option<f64> {
        if self.duration_ms == 0 {
            return None;
        }
        let ratio = self.position_ms as f64 / self.duration_ms as f64;
        Some((ratio * 100.0).clamp(0.0, 100.0))
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {}",
            format_clock(self.position_ms),
            format_clock(self.duration_ms)
        )?;
        if let Some(pct) = self.percent() {
            write!(f, " ({:.0}%)", pct)?;
        }
        Ok(())
    }
}

/// State of one paired playback instance
pub struct Session {
    engine: Mutex<Box<dyn PlaybackEngine>>,
    readiness: Mutex<ReadinessState>,
    peer: RwLock<Option<PeerAddress>>,
    media: RwLock<Option<PathBuf>>,
}

impl Session {
    /// Create a session around an engine. Nothing is loaded yet.
    pub fn new(engine: Box<dyn PlaybackEngine>) -> Self {
        Self {
            engine: Mutex::new(engine),
            readiness: Mutex::new(ReadinessState::default()),
            peer: RwLock::new(None),
            media: RwLock::new(None),
        }
    }

    /// Create a session with a peer already configured
    pub fn with_peer(engine: Box<dyn PlaybackEngine>, peer: Option<PeerAddress>) -> Self {
        let session = Self::new(engine);
        *session.peer.write() = peer;
        session
    }

    // --- Peer ---

    /// Currently configured peer
    pub fn peer(&self) -> Option<PeerAddress> {
        self.peer.read().clone()
    }

    /// Replace the configured peer
    pub fn set_peer(&self, peer: PeerAddress) {
        let mut current = self.peer.write();
        if current.as_ref() != Some(&peer) {
            info!("Partner set to {}", peer);
            *current = Some(peer);
        }
    }

    // --- Readiness ---

    /// Snapshot of both load flags
    pub fn readiness(&self) -> ReadinessState {
        *self.readiness.lock()
    }

    /// Current gate phase
    pub fn phase(&self) -> ReadinessPhase {
        self.readiness.lock().phase()
    }

    /// Whether a medium is loaded here
    pub fn is_local_loaded(&self) -> bool {
        self.readiness.lock().local_loaded
    }

    /// Mark this side as loaded
    pub fn mark_local_loaded(&self) {
        self.readiness.lock().local_loaded = true;
    }

    /// Record the peer's latest readiness answer
    pub fn set_remote_loaded(&self, loaded: bool) {
        let mut readiness = self.readiness.lock();
        if readiness.remote_loaded != loaded {
            debug!("Partner readiness changed to {}", loaded);
        }
        readiness.remote_loaded = loaded;
    }

    // --- Engine ---

    /// Open a medium on the local engine and mark this side loaded.
    pub fn open_media(&self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EngineError::FileNotFound(path.to_path_buf()));
        }

        self.engine.lock().open(path)?;
        *self.media.write() = Some(path.to_path_buf());
        self.mark_local_loaded();
        info!("Opened medium {:?}", path);
        Ok(())
    }

    /// Apply a command to this instance.
    ///
    /// This is the single apply step used both by the control server for
    /// inbound requests and by the dispatcher's caller after the peer
    /// confirmed. The engine lock is held for this call only.
    pub fn apply(&self, command: &Command) -> Result<Applied, EngineError> {
        let applied = match *command {
            Command::QueryReadiness => Applied::Readiness(self.is_local_loaded()),
            Command::NotifyLoaded => {
                self.mark_local_loaded();
                Applied::Loaded
            }
            Command::Play => {
                self.with_loaded_engine(|engine| engine.play().map(|_| Applied::Play))?
            }
            Command::Pause => {
                self.with_loaded_engine(|engine| engine.pause().map(|_| Applied::Pause))?
            }
            Command::Stop => {
                self.with_loaded_engine(|engine| engine.stop().map(|_| Applied::Stop))?
            }
            Command::Seek(position) => self.with_loaded_engine(|engine| {
                engine
                    .set_position_ms(position.as_millis())
                    .map(|_| Applied::Seek(position))
            })?,
        };
        debug!("Applied {} locally", command);
        Ok(applied)
    }

    fn with_loaded_engine<T>(
        &self,
        f: impl FnOnce(&mut dyn PlaybackEngine) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let mut engine = self.engine.lock();
        if !engine.is_loaded() {
            return Err(EngineError::NotInitialized);
        }
        f(engine.as_mut())
    }

    /// Current local position
    pub fn position(&self) -> PlaybackPosition {
        PlaybackPosition::from_millis(self.engine.lock().position_ms())
    }

    /// Length of the loaded medium, zero when unknown
    pub fn duration(&self) -> PlaybackPosition {
        PlaybackPosition::from_millis(self.engine.lock().duration_ms())
    }

    /// Current progress
    pub fn progress(&self) -> Progress {
        let engine = self.engine.lock();
        Progress {
            position_ms: engine.position_ms(),
            duration_ms: engine.duration_ms(),
        }
    }

    /// Snapshot of the loaded medium
    pub fn media_info(&self) -> MediaInfo {
        let path = self.media.read().clone();
        let engine = self.engine.lock();
        MediaInfo {
            path,
            state: engine.state(),
            position_ms: engine.position_ms(),
            duration_ms: engine.duration_ms(),
        }
    }
}
