//! Headless playback engine
//!
//! Keeps playback state and a position that advances with a monotonic
//! clock while playing. Nothing is decoded or rendered, which makes it
//! suitable for running a control-only instance and for tests.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;
use twinplay_core::{EngineError, EngineState, PlaybackEngine};

/// Engine without any media output
#[derive(Debug)]
pub struct HeadlessEngine {
    path: Option<PathBuf>,
    state: EngineState,
    /// Position accumulated up to `resumed_at`
    base: Duration,
    /// Set while playing
    resumed_at: Option<Instant>,
    duration: Option<Duration>,
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessEngine {
    /// Create an engine with nothing loaded and unknown durations
    pub fn new() -> Self {
        Self {
            path: None,
            state: EngineState::Idle,
            base: Duration::ZERO,
            resumed_at: None,
            duration: None,
        }
    }

    /// Report a fixed duration for every opened medium
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    fn elapsed(&self) -> Duration {
        let running = self
            .resumed_at
            .map(|at| at.elapsed())
            .unwrap_or(Duration::ZERO);
        let position = self.base + running;
        match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        }
    }

    fn freeze(&mut self) {
        self.base = self.elapsed();
        self.resumed_at = None;
    }

    fn ensure_loaded(&self) -> Result<(), EngineError> {
        if self.path.is_some() {
            Ok(())
        } else {
            Err(EngineError::NotInitialized)
        }
    }
}

impl PlaybackEngine for HeadlessEngine {
    fn open(&mut self, path: &Path) -> Result<(), EngineError> {
        debug!("Headless engine opening {:?}", path);
        self.path = Some(path.to_path_buf());
        self.state = EngineState::Stopped;
        self.base = Duration::ZERO;
        self.resumed_at = None;
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        self.ensure_loaded()?;
        if self.resumed_at.is_none() {
            self.resumed_at = Some(Instant::now());
        }
        self.state = EngineState::Playing;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), EngineError> {
        self.ensure_loaded()?;
        if self.state == EngineState::Playing {
            self.freeze();
            self.state = EngineState::Paused;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        self.ensure_loaded()?;
        self.base = Duration::ZERO;
        self.resumed_at = None;
        self.state = EngineState::Stopped;
        Ok(())
    }

    fn position_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    fn duration_ms(&self) -> u64 {
        self.duration.map(|d| d.as_millis() as u64).unwrap_or(0)
    }

    fn set_position_ms(&mut self, ms: u64) -> Result<(), EngineError> {
        self.ensure_loaded()?;
        let mut target = Duration::from_millis(ms);
        if let Some(duration) = self.duration {
            target = target.min(duration);
        }
        self.base = target;
        if self.resumed_at.is_some() {
            self.resumed_at = Some(Instant::now());
        }
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.path.is_some()
    }

    fn state(&self) -> EngineState {
        self.state
    }
}
