//! TwinPlay - Paired playback across two devices
//!
//! Runs one instance of a pair: the control server the partner talks to,
//! plus the console that drives local and partner playback together.

#![warn(missing_docs)]

mod cli;
mod console;
mod logging_setup;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use twinplay_control::{CommandDispatcher, ControlServer, PlaybackSync, RetryPolicy};
use twinplay_core::{status_channel, Session};

use crate::cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.resolve_config()?;

    let _log_guard = logging_setup::init(&config.logging)?;
    info!("Starting TwinPlay v{}", env!("CARGO_PKG_VERSION"));

    let engine = twinplay_media::open_engine(config.engine.backend)
        .with_context(|| format!("Failed to create {} engine", config.engine.backend))?;

    let peer = config.peer.address();
    match &peer {
        Some(peer) => info!("Partner: {}", peer),
        None => warn!("No partner configured; use 'peer <url>' to set one"),
    }
    let session = Arc::new(Session::with_peer(engine, peer));

    // Failing to bind is fatal
    let server = ControlServer::bind(&config.server, session.clone())
        .await
        .context("Failed to start control server")?;
    let server_task = server.spawn();

    let (status, events) = status_channel();
    let retry = RetryPolicy::from(&config.retry);
    info!(
        attempts = retry.attempts(),
        timeout = ?retry.timeout(),
        pause = ?retry.pause(),
        "Partner commands give up after at most {:?}",
        retry.worst_case()
    );
    let dispatcher = CommandDispatcher::new(session, retry, status)?;
    let sync = Arc::new(PlaybackSync::new(dispatcher));

    if let Some(path) = &args.file {
        match sync.open_media(path).await {
            Ok(phase) => info!("Opened {:?} ({})", path, phase),
            Err(e) => error!("Failed to open {:?}: {}", path, e),
        }
    }

    console::run(sync, events).await?;

    server_task.abort();
    info!("TwinPlay shut down");
    Ok(())
}
