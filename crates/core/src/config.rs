//! Explorer configuration.
//!
//! Every path has an environment override so tests and hosts can redirect
//! caches without touching the user's home directory.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const GRAMMAR_DIR_ENV: &str = "TREESCOPE_GRAMMAR_DIR";
pub const GRAMMAR_URL_ENV: &str = "TREESCOPE_GRAMMAR_URL";
pub const STATE_DIR_ENV: &str = "TREESCOPE_STATE_DIR";
pub const LOG_DIR_ENV: &str = "TREESCOPE_LOG_DIR";

pub const DEFAULT_GRAMMAR_URL: &str = "https://tree-sitter.github.io";
pub const DEFAULT_QUERY_MATCH_LIMIT: u32 = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Local directory holding downloaded grammar libraries.
    pub grammar_dir: PathBuf,
    /// Remote location grammars are fetched from when missing locally.
    pub grammar_base_url: String,
    /// Directory of the on-disk session store.
    pub state_dir: PathBuf,
    /// Directory of the rolling log files.
    pub log_dir: PathBuf,
    /// Upper bound of in-progress matches kept by the query cursor.
    pub query_match_limit: u32,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            grammar_dir: default_grammar_dir(),
            grammar_base_url: std::env::var(GRAMMAR_URL_ENV)
                .unwrap_or_else(|_| DEFAULT_GRAMMAR_URL.to_string()),
            state_dir: default_state_dir(),
            log_dir: default_log_dir(),
            query_match_limit: DEFAULT_QUERY_MATCH_LIMIT,
        }
    }
}

impl ExplorerConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn with_grammar_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.grammar_dir = dir.into();
        self
    }

    pub fn with_state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state_dir = dir.into();
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }
}

fn home_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
}

/// Grammar cache location, supporting the TREESCOPE_GRAMMAR_DIR env var.
pub fn default_grammar_dir() -> PathBuf {
    if let Ok(env_dir) = std::env::var(GRAMMAR_DIR_ENV) {
        return PathBuf::from(env_dir);
    }
    dirs::cache_dir()
        .map(|dir| dir.join("treescope").join("grammars"))
        .unwrap_or_else(|| home_dir().join(".treescope").join("grammars"))
}

/// Session store location, supporting the TREESCOPE_STATE_DIR env var.
pub fn default_state_dir() -> PathBuf {
    if let Ok(env_dir) = std::env::var(STATE_DIR_ENV) {
        return PathBuf::from(env_dir);
    }
    home_dir().join(".treescope").join("sessions")
}

pub fn default_log_dir() -> PathBuf {
    if let Ok(env_dir) = std::env::var(LOG_DIR_ENV) {
        return PathBuf::from(env_dir);
    }
    home_dir().join(".treescope").join("logs")
}
