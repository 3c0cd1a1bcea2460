//! Logging configuration
//!
//! The subscriber itself is installed by the binary; this module only
//! describes what to install and manages the log directory.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use tracing::Level;

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Minimum level (`trace`, `debug`, `info`, `warn`, `error`)
    pub level: String,
    /// Log to stderr
    pub console_output: bool,
    /// Log to a daily file in `log_directory`
    pub file_output: bool,
    /// Directory for log files
    pub log_directory: PathBuf,
    /// How many log files to keep; older ones are deleted at startup
    pub max_log_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console_output: true,
            file_output: false,
            log_directory: default_log_directory(),
            max_log_files: 10,
        }
    }
}

fn default_log_directory() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("twinplay").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

const LOG_PREFIX: &str = "twinplay-";
const LOG_SUFFIX: &str = ".log";

impl LogConfig {
    /// Parse the configured level, falling back to INFO
    pub fn parse_level(&self) -> Level {
        self.level.parse().unwrap_or(Level::INFO)
    }

    /// Path of today's log file
    pub fn current_log_path(&self) -> PathBuf {
        let date = chrono::Local::now().format("%Y-%m-%d");
        self.log_directory
            .join(format!("{}{}{}", LOG_PREFIX, date, LOG_SUFFIX))
    }

    /// Create the log directory if it is missing
    pub fn ensure_log_directory(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.log_directory)
    }

    /// Delete the oldest log files beyond `max_log_files`.
    ///
    /// Returns how many files were removed. Only files named like ours are
    /// touched.
    pub fn cleanup_old_logs(&self) -> io::Result<usize> {
        if !self.log_directory.exists() {
            return Ok(0);
        }

        let mut logs: Vec<PathBuf> = std::fs::read_dir(&self.log_directory)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with(LOG_PREFIX) && n.ends_with(LOG_SUFFIX))
                    .unwrap_or(false)
            })
            .collect();

        if logs.len() <= self.max_log_files {
            return Ok(0);
        }

        // Date-stamped names sort chronologically
        logs.sort();
        let excess = logs.len() - self.max_log_files;
        for path in &logs[..excess] {
            std::fs::remove_file(path)?;
        }
        Ok(excess)
    }
}
