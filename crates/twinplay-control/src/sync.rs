use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use twinplay_core::{
    clock, Command, MediaInfo, PeerAddress, PlaybackPosition, Progress, ReadinessPhase, Session,
    StatusEvent,
};

use crate::{CommandDispatcher, Result, SyncError};

/// Synchronized playback actions for a control surface.
///
/// Each action is dispatched to the partner first and applied to the
/// local engine only once the partner confirmed it.
pub struct PlaybackSync {
    dispatcher: CommandDispatcher,
}

impl PlaybackSync {
    pub fn new(dispatcher: CommandDispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    pub fn session(&self) -> &Arc<Session> {
        self.dispatcher.session()
    }

    /// Configure the partner address
    pub fn set_peer(&self, url: &str) -> Result<PeerAddress> {
        let peer = PeerAddress::parse(url)
            .ok_or_else(|| SyncError::InvalidParameter("partner URL is empty".to_string()))?;
        self.session().set_peer(peer.clone());
        Ok(peer)
    }

    /// Open a medium locally, then check whether the partner has one too.
    ///
    /// Only a missing or unopenable local file is an error; an unreachable
    /// or unloaded partner leaves the gate in `LocalLoaded` and controls
    /// disabled.
    pub async fn open_media(&self, path: impl AsRef<Path>) -> Result<ReadinessPhase> {
        let status = self.dispatcher.status();
        self.session().open_media(path)?;
        status.publish(StatusEvent::FileLoadedLocally);

        match self.dispatcher.check_peer_ready().await {
            Ok(true) => {
                status.publish(StatusEvent::BothLoaded);
                status.publish(StatusEvent::ControlsEnabled(true));
            }
            Ok(false) => {
                status.publish(StatusEvent::PeerNotLoaded);
                status.publish(StatusEvent::ControlsEnabled(false));
            }
            Err(err) => {
                warn!("Could not check partner readiness: {}", err);
                status.publish(StatusEvent::ControlsEnabled(false));
            }
        }
        Ok(self.session().phase())
    }

    pub async fn play(&self) -> Result<()> {
        self.run(Command::Play).await
    }

    pub async fn pause(&self) -> Result<()> {
        self.run(Command::Pause).await
    }

    pub async fn stop(&self) -> Result<()> {
        self.run(Command::Stop).await
    }

    /// Seek both sides to an absolute position in seconds
    pub async fn seek_to(&self, secs: u64) -> Result<()> {
        self.run(Command::Seek(PlaybackPosition::from_secs(secs)))
            .await
    }

    /// Seek both sides to a dotted clock time (`HH.MM.SS`)
    pub async fn seek_to_clock(&self, text: &str) -> Result<()> {
        let secs = clock::parse_clock(text).ok_or_else(|| {
            SyncError::InvalidParameter(
                "Invalid time format. Please use HH.MM.SS format.".to_string(),
            )
        })?;
        self.seek_to(secs).await
    }

    /// Skip forward or back relative to the local position.
    ///
    /// The target is resolved here, once, from our own clock and sent as an
    /// absolute seek; the partner never sees the delta.
    pub async fn skip(&self, delta_secs: i64) -> Result<()> {
        let target = self.session().position().offset_by(delta_secs);
        self.run(Command::Seek(target)).await
    }

    /// Tell the partner to mark itself loaded
    pub async fn notify_loaded(&self) -> Result<()> {
        self.dispatcher.try_dispatch(Command::NotifyLoaded).await?;
        Ok(())
    }

    pub fn media_info(&self) -> MediaInfo {
        self.session().media_info()
    }

    pub fn progress(&self) -> Progress {
        self.session().progress()
    }

    pub fn phase(&self) -> ReadinessPhase {
        self.session().phase()
    }

    async fn run(&self, command: Command) -> Result<()> {
        self.dispatcher.try_dispatch(command).await?;

        // Partner confirmed; a local failure now is reported, not rolled back
        self.session().apply(&command)?;
        info!(%command, "Applied on both devices");
        self.dispatcher
            .status()
            .publish(StatusEvent::Applied(command));
        Ok(())
    }
}
