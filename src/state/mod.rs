//! Active-session state file.
//!
//! A single small JSON document, `{"session_id": N}`, lets the application
//! resume the same serving session after a restart. Only the identifier is
//! stored; date, meal kind, and groups are always re-derived from the
//! session row to avoid divergence. Absence or `-1` means no active session.

use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{domain::RecordId, errors::StorageError, utils::paths};

const NO_SESSION: i64 = -1;
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Serialize, Deserialize)]
struct SessionState {
    session_id: i64,
}

/// Reads and writes the session state file with atomic tmp-file staging.
pub struct SessionStateFile {
    path: PathBuf,
}

impl SessionStateFile {
    pub fn new() -> Self {
        Self {
            path: paths::session_state_file(),
        }
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The persisted active-session id, `None` for absent file, sentinel
    /// value, or an unreadable document.
    pub fn load(&self) -> Result<Option<RecordId>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)?;
        let state: SessionState = match serde_json::from_str(&data) {
            Ok(state) => state,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "unreadable session state file");
                return Ok(None);
            }
        };
        if state.session_id <= 0 {
            return Ok(None);
        }
        Ok(Some(state.session_id as RecordId))
    }

    /// Persists the active-session id, or the sentinel when `None`.
    pub fn save(&self, session_id: Option<RecordId>) -> Result<(), StorageError> {
        let state = SessionState {
            session_id: session_id.map_or(NO_SESSION, |id| id as i64),
        };
        let json = serde_json::to_string_pretty(&state)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = tmp_path(&self.path);
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Resets the file back to the no-session sentinel.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.save(None)
    }
}

impl Default for SessionStateFile {
    fn default() -> Self {
        Self::new()
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}
