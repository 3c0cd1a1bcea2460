use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use twinplay_core::{AppConfig, EngineBackend};

/// Command-line arguments. Values given here override the config file.
#[derive(Debug, Parser)]
#[command(name = "twinplay", version, about = "Keep playback in lock-step with a partner device")]
pub struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "TWINPLAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Interface the control server binds to
    #[arg(long, env = "TWINPLAY_HOST")]
    pub host: Option<String>,

    /// Port the control server listens on
    #[arg(short, long, env = "TWINPLAY_PORT")]
    pub port: Option<u16>,

    /// Partner base URL, e.g. http://192.168.1.20:5000
    #[arg(long, env = "TWINPLAY_PEER")]
    pub peer: Option<String>,

    /// Medium to open at startup
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Playback engine: headless or mpv
    #[arg(long, env = "TWINPLAY_BACKEND")]
    pub backend: Option<EngineBackend>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TWINPLAY_LOG")]
    pub log_level: Option<String>,
}

impl Args {
    /// Load the config file (if any) and apply overrides
    pub fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)
                .with_context(|| format!("Failed to load config {:?}", path))?,
            None => AppConfig::default(),
        };

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(peer) = &self.peer {
            config.peer.url = Some(peer.clone());
        }
        if let Some(backend) = self.backend {
            config.engine.backend = backend;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}
