//! TwinPlay Media - Playback Engine Backends
//!
//! This crate provides implementations of
//! [`PlaybackEngine`](twinplay_core::PlaybackEngine):
//! - [`HeadlessEngine`]: simulated clock, no output; the default
//! - `MpvEngine`: libmpv playback (requires the `libmpv` feature)

use thiserror::Error;
use twinplay_core::{EngineBackend, PlaybackEngine};

pub mod headless;
#[cfg(feature = "libmpv")]
pub mod mpv_engine;

pub use headless::HeadlessEngine;
#[cfg(feature = "libmpv")]
pub use mpv_engine::MpvEngine;

/// Media errors
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Engine backend '{0}' is not available in this build")]
    BackendUnavailable(EngineBackend),

    #[error("Engine init failed: {0}")]
    InitFailed(String),
}

/// Result type for media operations
pub type Result<T> = std::result::Result<T, MediaError>;

/// Create the engine for a configured backend
pub fn open_engine(backend: EngineBackend) -> Result<Box<dyn PlaybackEngine>> {
    match backend {
        EngineBackend::Headless => Ok(Box::new(HeadlessEngine::new())),
        #[cfg(feature = "libmpv")]
        EngineBackend::Mpv => Ok(Box::new(MpvEngine::new()?)),
        #[cfg(not(feature = "libmpv"))]
        EngineBackend::Mpv => Err(MediaError::BackendUnavailable(backend)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_headless() {
        let engine = open_engine(EngineBackend::Headless).unwrap();
        assert!(!engine.is_loaded());
    }

    #[cfg(not(feature = "libmpv"))]
    #[test]
    fn test_mpv_unavailable_without_feature() {
        let result = open_engine(EngineBackend::Mpv);
        assert!(matches!(
            result,
            Err(MediaError::BackendUnavailable(EngineBackend::Mpv))
        ));
    }
}
