//! Readiness gate state
//!
//! Playback commands may only run once both peers have a medium loaded.
//! `local_loaded` flips when a medium opens here; `remote_loaded` is a
//! snapshot of the peer's last answer and is refreshed before every
//! playback command, since the peer can reload at any time.

use std::fmt;

/// Load flags for both sides of the pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadinessState {
    /// A medium has been opened on this instance
    pub local_loaded: bool,
    /// The peer last reported a medium loaded
    pub remote_loaded: bool,
}

/// Gate phase derived from [`ReadinessState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessPhase {
    /// Nothing loaded here
    NoFile,
    /// Loaded here, peer not (yet) confirmed
    LocalLoaded,
    /// Both sides confirmed loaded
    BothLoaded,
}

impl ReadinessState {
    /// Current gate phase
    pub fn phase(&self) -> ReadinessPhase {
        match (self.local_loaded, self.remote_loaded) {
            (false, _) => ReadinessPhase::NoFile,
            (true, false) => ReadinessPhase::LocalLoaded,
            (true, true) => ReadinessPhase::BothLoaded,
        }
    }

    /// Whether playback commands are currently permitted
    pub fn permits_playback(&self) -> bool {
        self.phase() == ReadinessPhase::BothLoaded
    }
}

impl fmt::Display for ReadinessPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ReadinessPhase::NoFile => "no file loaded",
            ReadinessPhase::LocalLoaded => "loaded locally, waiting for partner",
            ReadinessPhase::BothLoaded => "loaded on both devices",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases() {
        let mut state = ReadinessState::default();
        assert_eq!(state.phase(), ReadinessPhase::NoFile);
        assert!(!state.permits_playback());

        // Peer readiness alone does not open the gate
        state.remote_loaded = true;
        assert_eq!(state.phase(), ReadinessPhase::NoFile);

        state.remote_loaded = false;
        state.local_loaded = true;
        assert_eq!(state.phase(), ReadinessPhase::LocalLoaded);
        assert!(!state.permits_playback());

        state.remote_loaded = true;
        assert_eq!(state.phase(), ReadinessPhase::BothLoaded);
        assert!(state.permits_playback());
    }
}
