//! MPV-based playback engine using libmpv2
//!
//! Opens a regular mpv output window and drives it through properties and
//! commands. Stop is implemented as pause plus rewind so the medium stays
//! loaded and a later Play resumes from the start.

use std::path::{Path, PathBuf};
use tracing::{error, info};
use twinplay_core::{EngineError, EngineState, PlaybackEngine};

use libmpv2::Mpv;

use crate::{MediaError, Result};

/// Playback through an embedded mpv instance
pub struct MpvEngine {
    mpv: Mpv,
    path: Option<PathBuf>,
    stopped: bool,
}

impl MpvEngine {
    /// Create an mpv instance with nothing loaded
    pub fn new() -> Result<Self> {
        let mpv = Mpv::new().map_err(|e| {
            error!("Failed to create MPV instance: {}", e);
            MediaError::InitFailed(format!("MPV init failed: {}", e))
        })?;

        mpv.set_property("keep-open", true).ok(); // Don't unload at end of file
        mpv.set_property("idle", true).ok();

        Ok(Self {
            mpv,
            path: None,
            stopped: true,
        })
    }

    fn ensure_loaded(&self) -> std::result::Result<(), EngineError> {
        if self.path.is_some() {
            Ok(())
        } else {
            Err(EngineError::NotInitialized)
        }
    }

    fn set_paused(&self, paused: bool) -> std::result::Result<(), EngineError> {
        self.mpv
            .set_property("pause", paused)
            .map_err(|e| EngineError::Backend(format!("MPV pause failed: {}", e)))
    }

    fn seek_secs(&self, secs: f64) -> std::result::Result<(), EngineError> {
        self.mpv
            .command("seek", &[&secs.to_string(), "absolute"])
            .map_err(|e| EngineError::Backend(format!("MPV seek failed: {}", e)))
    }

    fn secs_property(&self, name: &str) -> u64 {
        let secs = self.mpv.get_property::<f64>(name).unwrap_or(0.0);
        (secs.max(0.0) * 1000.0) as u64
    }
}

impl PlaybackEngine for MpvEngine {
    fn open(&mut self, path: &Path) -> std::result::Result<(), EngineError> {
        info!("Opening medium with MPV: {:?}", path);

        let path_str = path
            .to_str()
            .ok_or_else(|| EngineError::Backend("Invalid path encoding".to_string()))?;

        // Load paused; playback starts only on a confirmed Play
        self.set_paused(true)?;
        self.mpv.command("loadfile", &[path_str]).map_err(|e| {
            error!("Failed to load file: {}", e);
            EngineError::Backend(format!("MPV loadfile failed: {}", e))
        })?;

        self.path = Some(path.to_path_buf());
        self.stopped = true;
        Ok(())
    }

    fn play(&mut self) -> std::result::Result<(), EngineError> {
        self.ensure_loaded()?;
        self.set_paused(false)?;
        self.stopped = false;
        Ok(())
    }

    fn pause(&mut self) -> std::result::Result<(), EngineError> {
        self.ensure_loaded()?;
        self.set_paused(true)
    }

    fn stop(&mut self) -> std::result::Result<(), EngineError> {
        self.ensure_loaded()?;
        self.set_paused(true)?;
        self.seek_secs(0.0)?;
        self.stopped = true;
        Ok(())
    }

    fn position_ms(&self) -> u64 {
        self.secs_property("time-pos")
    }

    fn duration_ms(&self) -> u64 {
        self.secs_property("duration")
    }

    fn set_position_ms(&mut self, ms: u64) -> std::result::Result<(), EngineError> {
        self.ensure_loaded()?;
        self.seek_secs(ms as f64 / 1000.0)
    }

    fn is_loaded(&self) -> bool {
        self.path.is_some()
    }

    fn state(&self) -> EngineState {
        if self.path.is_none() {
            return EngineState::Idle;
        }
        if self.stopped {
            return EngineState::Stopped;
        }
        match self.mpv.get_property::<bool>("pause") {
            Ok(true) => EngineState::Paused,
            _ => EngineState::Playing,
        }
    }
}
