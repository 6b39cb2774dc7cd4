//! Configuration management for chunkdex.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{ChunkdexError, Result};
use crate::core::indexer::chunker::DEFAULT_MAX_CHUNK_SIZE;
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Indexing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Chunk rollover threshold (chunks hold up to this + 1 entries)
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,
}

/// Worker pool configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkerConfig {
    /// Number of indexing worker threads
    #[serde(default = "default_num_workers")]
    pub num_workers: usize,

    /// Pending requests each worker queues before dispatch waits
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ChunkdexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(ChunkdexError::ConfigError(format!(
                "Unknown log format '{other}' (expected 'compact' or 'json')"
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive (overridden by RUST_LOG)
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

// Default value functions
fn default_max_chunk_size() -> usize {
    DEFAULT_MAX_CHUNK_SIZE
}

fn default_num_workers() -> usize {
    1
}

fn default_queue_depth() -> usize {
    64
}

fn default_log_level() -> String {
    "chunkdex=info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: default_max_chunk_size(),
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            num_workers: default_num_workers(),
            queue_depth: default_queue_depth(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ChunkdexError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// This method uses XDG Base Directory specification for file locations.
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. CHUNKDEX_CONFIG env var
    /// 2. XDG config file (~/.config/chunkdex/config.toml)
    /// 3. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("CHUNKDEX_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else {
                Self::default()
            }
        };

        config.merge_env()?;
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    ///
    /// Unparseable numbers are ignored; an unknown log format is an
    /// error.
    pub fn merge_env(&mut self) -> Result<()> {
        if let Ok(size) = env::var("CHUNKDEX_MAX_CHUNK_SIZE") {
            if let Ok(size) = size.parse() {
                self.indexing.max_chunk_size = size;
            }
        }

        if let Ok(workers) = env::var("CHUNKDEX_WORKERS") {
            if let Ok(n) = workers.parse() {
                self.worker.num_workers = n;
            }
        }
        if let Ok(depth) = env::var("CHUNKDEX_QUEUE_DEPTH") {
            if let Ok(d) = depth.parse() {
                self.worker.queue_depth = d;
            }
        }

        if let Ok(level) = env::var("CHUNKDEX_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = env::var("CHUNKDEX_LOG_FORMAT") {
            self.logging.format = format.parse()?;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.indexing.max_chunk_size == 0 {
            return Err(ChunkdexError::ConfigError(
                "Max chunk size must be non-zero".to_string(),
            ));
        }

        if self.worker.num_workers == 0 {
            return Err(ChunkdexError::ConfigError(
                "Worker count must be non-zero".to_string(),
            ));
        }

        if self.worker.queue_depth == 0 {
            return Err(ChunkdexError::ConfigError(
                "Queue depth must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}
