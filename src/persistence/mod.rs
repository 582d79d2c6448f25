/*!
 * State Persistence
 *
 * Saves and loads engine snapshots as pretty-printed JSON. Writes go to a
 * sibling temporary file that is renamed over the target, so a crash never
 * leaves a truncated state file behind.
 */

use crate::engine::Snapshot;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Persistence errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum PersistenceError {
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Malformed state file {path}: {message}")]
    Format { path: String, message: String },
}

impl PersistenceError {
    fn io(path: &Path, err: io::Error) -> Self {
        PersistenceError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    fn format(path: &Path, err: serde_json::Error) -> Self {
        PersistenceError::Format {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

/// JSON snapshot file
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `snapshot`, replacing any previous file
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let json =
            serde_json::to_vec_pretty(snapshot).map_err(|e| PersistenceError::format(&self.path, e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
        }

        let tmp = self.temp_path();
        let write = || -> io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&json)?;
            file.write_all(b"\n")?;
            file.sync_all()
        };
        if let Err(e) = write() {
            let _ = fs::remove_file(&tmp);
            return Err(PersistenceError::io(&tmp, e));
        }
        fs::rename(&tmp, &self.path).map_err(|e| PersistenceError::io(&self.path, e))?;

        info!(
            path = %self.path.display(),
            bytes = json.len(),
            processes = snapshot.processes.len(),
            "Saved state"
        );
        Ok(())
    }

    /// Read the saved snapshot; `Ok(None)` when no file exists yet
    pub fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No saved state");
                return Ok(None);
            }
            Err(e) => return Err(PersistenceError::io(&self.path, e)),
        };

        let snapshot: Snapshot =
            serde_json::from_slice(&bytes).map_err(|e| PersistenceError::format(&self.path, e))?;
        info!(
            path = %self.path.display(),
            blocks = snapshot.blocks.len(),
            processes = snapshot.processes.len(),
            "Loaded state"
        );
        Ok(Some(snapshot))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
