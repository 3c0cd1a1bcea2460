use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, info, warn};
use twinplay_core::{Command, PeerAddress, Session, StatusEvent, StatusSender};

use crate::protocol::{route_for, CommandResult, ControlReply};
use crate::{Result, RetryPolicy, SyncError};

/// Sends commands to the partner's control server.
///
/// A `true` from [`dispatch`](Self::dispatch) means the partner applied the
/// command and the caller may now apply the identical command locally.
/// The dispatcher itself never touches the local engine: ordering the
/// local apply after the remote confirmation is what keeps a failed
/// exchange from leaving the two sides in different states.
pub struct CommandDispatcher {
    session: Arc<Session>,
    client: Client,
    retry: RetryPolicy,
    status: StatusSender,
}

impl CommandDispatcher {
    pub fn new(session: Arc<Session>, retry: RetryPolicy, status: StatusSender) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| SyncError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            session,
            client,
            retry,
            status,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn status(&self) -> &StatusSender {
        &self.status
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Whether the partner confirmed `command`.
    pub async fn dispatch(&self, command: Command) -> bool {
        match self.try_dispatch(command).await {
            Ok(_) => true,
            Err(err) => {
                debug!(%command, "Dispatch failed: {}", err);
                false
            }
        }
    }

    /// Like [`dispatch`](Self::dispatch), but keeps the reason for failure.
    ///
    /// Playback commands pass the readiness gate first: the local side must
    /// have a medium loaded and the partner is asked again every time. A
    /// closed gate fails the command without sending it.
    pub async fn try_dispatch(&self, command: Command) -> Result<ControlReply> {
        let peer = self.peer()?;

        if command.is_playback() {
            self.ensure_ready(&peer).await?;
        }

        let reply = self.send(&peer, command).await?;
        if let Command::Seek(position) = command {
            if reply.time != Some(position.as_secs()) {
                warn!(
                    requested = position.as_secs(),
                    applied = ?reply.time,
                    "Partner echoed a different seek position"
                );
            }
        }

        info!(%command, %peer, "Partner confirmed command");
        Ok(reply)
    }

    /// Ask the partner whether it has a medium loaded and record the answer.
    pub async fn check_peer_ready(&self) -> Result<bool> {
        let peer = self.peer()?;
        self.query_readiness(&peer).await
    }

    fn peer(&self) -> Result<PeerAddress> {
        self.session.peer().ok_or_else(|| {
            self.status.publish(StatusEvent::PeerNotConfigured);
            SyncError::NotConfigured
        })
    }

    async fn ensure_ready(&self, peer: &PeerAddress) -> Result<()> {
        if !self.session.is_local_loaded() {
            self.status.publish(StatusEvent::NoFile);
            return Err(SyncError::NotReady("no file loaded locally".to_string()));
        }

        self.query_readiness(peer).await?;
        if !self.session.readiness().permits_playback() {
            self.status.publish(StatusEvent::PeerNotLoaded);
            self.status.publish(StatusEvent::ControlsEnabled(false));
            return Err(SyncError::NotReady("file not loaded on partner".to_string()));
        }
        Ok(())
    }

    async fn query_readiness(&self, peer: &PeerAddress) -> Result<bool> {
        let reply = self.send(peer, Command::QueryReadiness).await?;
        let loaded = reply.file_loaded.unwrap_or(false);
        self.session.set_remote_loaded(loaded);
        Ok(loaded)
    }

    async fn send(&self, peer: &PeerAddress, command: Command) -> Result<ControlReply> {
        let (method, path) = route_for(&command);
        let url = peer.join(&path);
        debug!(%command, %url, "Sending command to partner");

        match self
            .retry
            .send(&self.client, method, &url, &self.status)
            .await
        {
            CommandResult::Success(reply) => Ok(reply),
            CommandResult::Failure(err) => {
                if let SyncError::RemoteRejected(reason) = &err {
                    self.status.publish(StatusEvent::Rejected(reason.clone()));
                }
                Err(err)
            }
        }
    }
}
