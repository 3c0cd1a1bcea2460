//! Commands exchanged between paired instances

use std::fmt;

use crate::clock;

/// An absolute playback position in whole seconds.
///
/// Seeks always carry the target position, never a delta from the current
/// one, so both peers land on the same second regardless of when each side
/// read its own clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PlaybackPosition(u64);

impl PlaybackPosition {
    /// Start of the medium
    pub const ZERO: Self = Self(0);

    /// Create a position from whole seconds
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Create a position from milliseconds, truncating to whole seconds
    pub fn from_millis(ms: u64) -> Self {
        Self(ms / 1000)
    }

    /// Position in seconds
    pub fn as_secs(self) -> u64 {
        self.0
    }

    /// Position in milliseconds, as engines expect it
    pub fn as_millis(self) -> u64 {
        self.0.saturating_mul(1000)
    }

    /// Resolve a relative skip into an absolute position, clamped at zero.
    pub fn offset_by(self, delta_secs: i64) -> Self {
        if delta_secs.is_negative() {
            Self(self.0.saturating_sub(delta_secs.unsigned_abs()))
        } else {
            Self(self.0.saturating_add(delta_secs as u64))
        }
    }
}

impl fmt::Display for PlaybackPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&clock::format_clock(self.as_millis()))
    }
}

/// A command one peer sends to the other's control server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start or resume playback
    Play,
    /// Pause playback (sets paused, never toggles)
    Pause,
    /// Stop playback and rewind
    Stop,
    /// Jump to an absolute position
    Seek(PlaybackPosition),
    /// Ask whether the receiving side has a medium loaded
    QueryReadiness,
    /// Tell the receiving side to mark itself as loaded
    NotifyLoaded,
}

impl Command {
    /// Whether this command changes playback and is therefore gated on both
    /// sides having a medium loaded.
    pub fn is_playback(&self) -> bool {
        matches!(
            self,
            Command::Play | Command::Pause | Command::Stop | Command::Seek(_)
        )
    }

    /// Short lowercase name used in logs and replies
    pub fn name(&self) -> &'static str {
        match self {
            Command::Play => "play",
            Command::Pause => "pause",
            Command::Stop => "stop",
            Command::Seek(_) => "seek",
            Command::QueryReadiness => "is_file_loaded",
            Command::NotifyLoaded => "load_file",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Seek(pos) => write!(f, "seek to {}", pos),
            other => f.write_str(other.name()),
        }
    }
}
