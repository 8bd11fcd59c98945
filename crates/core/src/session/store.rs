//! Persisted view state.
//!
//! Suspended sessions are written as MessagePack blobs, one file per
//! document, named by the xxh3 hash of the document URI. The view wire
//! format is JSON.

use crate::config::ExplorerConfig;
use crate::error::Result;
use std::path::{Path, PathBuf};
use treescope_api::SessionState;
use xxhash_rust::xxh3::xxh3_64;

pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &ExplorerConfig) -> Self {
        Self::new(config.state_dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the state of `uri`.
    pub fn path_for(&self, uri: &str) -> PathBuf {
        let hash = xxh3_64(uri.as_bytes());
        self.dir.join(format!("{:016x}.state", hash))
    }

    pub fn save(&self, state: &SessionState) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&state.doc_uri);
        // Named (map) encoding: optional fields are skipped when absent.
        let bytes = rmp_serde::to_vec_named(state)?;
        std::fs::write(&path, bytes)?;
        tracing::debug!("Saved session state for {} to {}", state.doc_uri, path.display());
        Ok(path)
    }

    /// Load the state saved for `uri`.
    ///
    /// Returns `Ok(None)` when nothing is stored or the blob is unreadable;
    /// an unreadable blob is removed.
    pub fn load(&self, uri: &str) -> Result<Option<SessionState>> {
        let path = self.path_for(uri);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = std::fs::read(&path)?;
        match rmp_serde::from_slice::<SessionState>(&bytes) {
            Ok(state) if state.doc_uri == uri => Ok(Some(state)),
            Ok(state) => {
                tracing::warn!(
                    "Session state at {} belongs to {}, not {}",
                    path.display(),
                    state.doc_uri,
                    uri
                );
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to decode session state at {}: {}. Discarding it.",
                    path.display(),
                    e
                );
                let _ = std::fs::remove_file(&path);
                Ok(None)
            }
        }
    }

    pub fn remove(&self, uri: &str) -> Result<bool> {
        let path = self.path_for(uri);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)?;
        Ok(true)
    }
}

/// Encode `state` in the JSON form the view persists.
pub fn encode_state(state: &SessionState) -> Result<String> {
    Ok(serde_json::to_string(state)?)
}

pub fn decode_state(json: &str) -> Result<SessionState> {
    Ok(serde_json::from_str(json)?)
}
