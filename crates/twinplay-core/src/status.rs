//! Status events for the control surface
//!
//! Dispatch can run on a background task, so progress is published as
//! discrete events instead of being written into shared UI state.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::fmt;

use crate::Command;

/// A status transition the control surface should display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    /// No medium chosen yet
    NoFile,
    /// A command was attempted without a partner address
    PeerNotConfigured,
    /// First attempt towards the partner is in flight
    Connecting,
    /// The partner answered
    Connected,
    /// An attempt failed at the network layer and another one follows
    Retrying {
        /// Attempt that just failed (1-based)
        attempt: u32,
        /// Total attempts allowed
        of: u32,
    },
    /// Every attempt failed at the network layer
    Unreachable,
    /// The partner refused the command
    Rejected(String),
    /// A medium was opened here; the partner is being checked
    FileLoadedLocally,
    /// Both sides have a medium loaded
    BothLoaded,
    /// The partner has no medium loaded
    PeerNotLoaded,
    /// Playback controls should be enabled or disabled
    ControlsEnabled(bool),
    /// A command was confirmed by the partner and applied here
    Applied(Command),
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusEvent::NoFile => f.write_str("No file chosen."),
            StatusEvent::PeerNotConfigured => f.write_str("Partner URL not set."),
            StatusEvent::Connecting => f.write_str("Trying to connect with partner..."),
            StatusEvent::Connected => f.write_str("Connected successfully."),
            StatusEvent::Retrying { attempt, of } => {
                write!(f, "Failed to connect. Retrying... ({}/{})", attempt, of)
            }
            StatusEvent::Unreachable => f.write_str("Failed to connect to partner."),
            StatusEvent::Rejected(reason) => write!(f, "Partner rejected the command: {}", reason),
            StatusEvent::FileLoadedLocally => {
                f.write_str("File loaded locally. Checking partner...")
            }
            StatusEvent::BothLoaded => f.write_str("File loaded in both devices."),
            StatusEvent::PeerNotLoaded => {
                f.write_str("File not loaded on partner. Controls disabled.")
            }
            StatusEvent::ControlsEnabled(true) => f.write_str("Controls enabled."),
            StatusEvent::ControlsEnabled(false) => f.write_str("Controls disabled."),
            StatusEvent::Applied(command) => write!(f, "Applied {} on both devices.", command),
        }
    }
}

/// Publishing half of the status channel.
///
/// Sending never blocks and never fails the caller; events published after
/// the control surface went away are dropped.
#[derive(Debug, Clone)]
pub struct StatusSender {
    tx: Sender<StatusEvent>,
}

impl StatusSender {
    /// Publish an event
    pub fn publish(&self, event: StatusEvent) {
        let _ = self.tx.send(event);
    }
}

/// Consuming half of the status channel
pub type StatusReceiver = Receiver<StatusEvent>;

/// Create a connected status channel
pub fn status_channel() -> (StatusSender, StatusReceiver) {
    let (tx, rx) = unbounded();
    (StatusSender { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_control_surface_wording() {
        assert_eq!(
            StatusEvent::Unreachable.to_string(),
            "Failed to connect to partner."
        );
        assert_eq!(
            StatusEvent::Retrying { attempt: 1, of: 3 }.to_string(),
            "Failed to connect. Retrying... (1/3)"
        );
        assert_eq!(
            StatusEvent::PeerNotConfigured.to_string(),
            "Partner URL not set."
        );
    }

    #[test]
    fn test_channel_delivers_in_order() {
        let (tx, rx) = status_channel();
        tx.publish(StatusEvent::Connecting);
        tx.publish(StatusEvent::Connected);

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![StatusEvent::Connecting, StatusEvent::Connected]
        );
    }

    #[test]
    fn test_publish_after_receiver_dropped() {
        let (tx, rx) = status_channel();
        drop(rx);
        tx.publish(StatusEvent::Connecting);
    }
}
