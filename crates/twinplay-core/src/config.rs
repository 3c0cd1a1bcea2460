//! Instance configuration
//!
//! Loaded from a TOML file; every field has a default so an empty file (or
//! no file at all) yields a working instance listening on port 5000.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::{LogConfig, PeerAddress};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading the file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this schema
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Control server settings
    pub server: ServerConfig,
    /// Paired instance
    pub peer: PeerConfig,
    /// Outbound retry policy
    pub retry: RetryConfig,
    /// Engine selection
    pub engine: EngineConfig,
    /// Logging
    pub logging: LogConfig,
}

/// Control server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind; the peer must be able to reach it
    pub host: String,
    /// TCP port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Paired instance settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerConfig {
    /// Base URL of the peer's control server
    pub url: Option<String>,
}

impl PeerConfig {
    /// Parsed peer address, if one is configured and non-blank
    pub fn address(&self) -> Option<PeerAddress> {
        self.url.as_deref().and_then(PeerAddress::parse)
    }
}

/// Outbound retry settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per command, including the first
    pub attempts: u32,
    /// Per-attempt network timeout in milliseconds
    pub timeout_ms: u64,
    /// Pause between attempts in milliseconds
    pub pause_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            timeout_ms: 5000,
            pause_ms: 500,
        }
    }
}

impl RetryConfig {
    /// Per-attempt timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Pause between attempts
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

/// Which playback engine to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineBackend {
    /// In-process engine with a simulated clock and no output
    #[default]
    Headless,
    /// libmpv
    Mpv,
}

impl FromStr for EngineBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "headless" => Ok(EngineBackend::Headless),
            "mpv" => Ok(EngineBackend::Mpv),
            other => Err(ConfigError::Invalid(format!("unknown engine backend '{}'", other))),
        }
    }
}

impl fmt::Display for EngineBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineBackend::Headless => f.write_str("headless"),
            EngineBackend::Mpv => f.write_str("mpv"),
        }
    }
}

/// Engine settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Backend to use
    pub backend: EngineBackend,
}

impl AppConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.attempts == 0 {
            return Err(ConfigError::Invalid("retry.attempts must be at least 1".to_string()));
        }
        if self.retry.timeout_ms == 0 {
            return Err(ConfigError::Invalid("retry.timeout_ms must be positive".to_string()));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid("server.host is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.retry.attempts, 3);
        assert_eq!(config.retry.timeout(), Duration::from_secs(5));
        assert_eq!(config.retry.pause(), Duration::from_millis(500));
        assert_eq!(config.engine.backend, EngineBackend::Headless);
        assert!(config.peer.address().is_none());
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = AppConfig::from_toml_str(
            r#"
            [server]
            port = 6000

            [peer]
            url = "192.168.1.20:5000"

            [engine]
            backend = "mpv"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 6000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(
            config.peer.address().unwrap().as_str(),
            "http://192.168.1.20:5000"
        );
        assert_eq!(config.engine.backend, EngineBackend::Mpv);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.retry, RetryConfig::default());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let err = AppConfig::from_toml_str("[retry]\nattempts = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("MPV".parse::<EngineBackend>().unwrap(), EngineBackend::Mpv);
        assert_eq!(
            "headless".parse::<EngineBackend>().unwrap(),
            EngineBackend::Headless
        );
        assert!("vlc".parse::<EngineBackend>().is_err());
    }
}
