//! # Snapshot Files
//!
//! One JSON document holds everything the CLI persists: issues, the status
//! changes recorded against them, the event feed and the search counters. Indexes are never
//! stored; they are rebuilt from the records on every start.
//!
//! Saves are atomic: the new document goes to `<file>.tmp`, the previous
//! file is kept as `<file>.bak`, then the temporary file is renamed over
//! the original. Loading falls back to the backup when the main file is
//! missing or unreadable.

use civic_core::{CivicError, CoreConfig, EventItem, Issue, SearchRecord, Session, StatusUpdate};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Maximum snapshot size accepted on load.
pub const MAX_SNAPSHOT_SIZE: u64 = 100 * 1024 * 1024;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub issues: Vec<Issue>,
    pub status_updates: Vec<StatusUpdate>,
    pub events: Vec<EventItem>,
    pub searches: SearchRecord,
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Path of the backup kept next to `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    sibling(path, ".bak")
}

fn temp_path(path: &Path) -> PathBuf {
    sibling(path, ".tmp")
}

fn read_file(path: &Path) -> Result<Snapshot, CivicError> {
    let size = fs::metadata(path)
        .map_err(|e| CivicError::Io(e.to_string()))?
        .len();
    if size > MAX_SNAPSHOT_SIZE {
        return Err(CivicError::InvalidInput(format!(
            "{} is {} bytes (limit {})",
            path.display(),
            size,
            MAX_SNAPSHOT_SIZE
        )));
    }
    let text = fs::read_to_string(path).map_err(|e| CivicError::Io(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| CivicError::Deserialization(e.to_string()))
}

impl Snapshot {
    /// Load `path`, then its backup, then an empty snapshot.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            match read_file(path) {
                Ok(snapshot) => return snapshot,
                Err(e) => tracing::warn!(path = %path.display(), "snapshot unreadable: {}", e),
            }
        }

        let backup = backup_path(path);
        if backup.exists() {
            match read_file(&backup) {
                Ok(snapshot) => {
                    tracing::warn!(path = %backup.display(), "restored snapshot from backup");
                    return snapshot;
                }
                Err(e) => tracing::warn!(path = %backup.display(), "backup unreadable: {}", e),
            }
        }

        tracing::info!(path = %path.display(), "no snapshot found, starting empty");
        Self::default()
    }

    /// Write atomically, keeping the previous file as a backup.
    pub fn save(&self, path: &Path) -> Result<(), CivicError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| CivicError::Io(format!("{}: {}", parent.display(), e)))?;
        }

        let tmp = temp_path(path);
        let write_result = (|| -> Result<(), CivicError> {
            let file = File::create(&tmp)
                .map_err(|e| CivicError::Io(format!("{}: {}", tmp.display(), e)))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, self)
                .map_err(|e| CivicError::Serialization(e.to_string()))?;
            writer
                .flush()
                .map_err(|e| CivicError::Io(format!("{}: {}", tmp.display(), e)))?;
            let file = writer
                .into_inner()
                .map_err(|e| CivicError::Io(format!("{}: {}", tmp.display(), e)))?;
            file.sync_all()
                .map_err(|e| CivicError::Io(format!("{}: {}", tmp.display(), e)))
        })();

        if let Err(error) = write_result {
            let _ = fs::remove_file(&tmp);
            return Err(error);
        }

        if path.exists() {
            fs::copy(path, backup_path(path))
                .map_err(|e| CivicError::Io(format!("{}: {}", path.display(), e)))?;
        }
        fs::rename(&tmp, path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            CivicError::Io(format!("{} -> {}: {}", tmp.display(), path.display(), e))
        })?;

        tracing::debug!(
            path = %path.display(),
            issues = self.issues.len(),
            updates = self.status_updates.len(),
            "snapshot saved"
        );
        Ok(())
    }

    /// Build a session holding every record of this snapshot.
    pub fn to_session(&self, config: CoreConfig) -> Result<Session, CivicError> {
        let mut session = Session::with_config(config)?;
        session.load_snapshot(self.issues.iter().cloned());
        session.apply_status_updates(&self.status_updates);
        session.load_events(self.events.iter().cloned());
        session.restore_searches(&self.searches);
        Ok(session)
    }
}
