//! Engine configuration.
//!
//! The host constructs an `EngineConfig` (or parses one from a TOML
//! snippet) and hands it to the engine. Defaults match the tuning the
//! engine was designed around: small read chunks drained in bursts, a flush
//! threshold that bounds surface-edit size, and a stable `TERM` so child
//! processes detect capabilities deterministically.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration for the terminal engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Value forced into the child's `TERM` environment variable.
    #[serde(default = "default_term")]
    pub term: String,

    /// Maximum bytes per read from the pseudo-terminal master.
    #[serde(default = "default_read_chunk")]
    pub read_chunk: usize,

    /// Pending-buffer size above which output is flushed to the surface.
    #[serde(default = "default_flush_threshold")]
    pub flush_threshold: usize,

    /// How long the read loop sleeps between bursts when no output is
    /// available, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Working directory for spawned children. `None` inherits the host's.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            term: default_term(),
            read_chunk: default_read_chunk(),
            flush_threshold: default_flush_threshold(),
            poll_interval_ms: default_poll_interval_ms(),
            working_dir: None,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from a TOML snippet; missing fields take
    /// their defaults.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse engine config")
    }

    /// Serialize the configuration to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize engine config")
    }
}

fn default_term() -> String {
    "xterm-256color".to_string()
}

fn default_read_chunk() -> usize {
    100
}

fn default_flush_threshold() -> usize {
    3000
}

fn default_poll_interval_ms() -> u64 {
    20
}
