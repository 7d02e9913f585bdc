// File: src/config.rs
// Purpose: Configuration parsing from vigil.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::comments::DEFAULT_AUTHOR;
use crate::simulator::{SubmissionDelays, COMMENT_POST_DELAY, LOGIN_DELAY, REGISTER_DELAY};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub submission: SubmissionConfig,

    #[serde(default)]
    pub comments: CommentsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Simulated backend latency, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    #[serde(default = "default_login_delay_ms")]
    pub login_delay_ms: u64,

    #[serde(default = "default_register_delay_ms")]
    pub register_delay_ms: u64,

    #[serde(default = "default_comment_delay_ms")]
    pub comment_delay_ms: u64,
}

/// Comment board settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentsConfig {
    /// Author label attached to every posted comment
    #[serde(default = "default_author")]
    pub author: String,

    /// Start the board with the fixture comments
    #[serde(default = "default_true")]
    pub seed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// tracing-subscriber filter used when RUST_LOG is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_login_delay_ms() -> u64 {
    LOGIN_DELAY.as_millis() as u64
}

fn default_register_delay_ms() -> u64 {
    REGISTER_DELAY.as_millis() as u64
}

fn default_comment_delay_ms() -> u64 {
    COMMENT_POST_DELAY.as_millis() as u64
}

fn default_author() -> String {
    DEFAULT_AUTHOR.to_string()
}

fn default_filter() -> String {
    "vigil=info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            login_delay_ms: default_login_delay_ms(),
            register_delay_ms: default_register_delay_ms(),
            comment_delay_ms: default_comment_delay_ms(),
        }
    }
}

impl SubmissionConfig {
    pub fn delays(&self) -> SubmissionDelays {
        SubmissionDelays {
            login: Duration::from_millis(self.login_delay_ms),
            register: Duration::from_millis(self.register_delay_ms),
            post_comment: Duration::from_millis(self.comment_delay_ms),
        }
    }
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            author: default_author(),
            seed: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./vigil.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("vigil.toml")
    }
}
