//! Probe history persistence
//!
//! Appends probe records to a JSON file and rotates out the oldest ones.

use crate::models::ProbeRecord;
use crate::{IolatError, Result, APP_NAME, HISTORY_FILE, MAX_HISTORY_ENTRIES};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Probe history storage manager
#[derive(Debug)]
pub struct ProbeHistory {
    history_path: PathBuf,
}

/// On-disk layout of the history file
#[derive(Debug, Serialize, Deserialize)]
struct HistoryFile {
    version: u32,
    records: Vec<ProbeRecord>,
}

impl ProbeHistory {
    /// Open the history at the standard data location
    pub fn new() -> Result<Self> {
        Ok(Self::at(Self::history_file_path()?))
    }

    /// Open the history at an explicit path
    pub fn at(history_path: impl Into<PathBuf>) -> Self {
        Self {
            history_path: history_path.into(),
        }
    }

    /// Uses $DATA_HOME/iolat/probes.json
    pub fn history_file_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir().ok_or_else(|| {
            IolatError::PersistenceError("Unable to determine data directory".to_string())
        })?;

        Ok(data_dir.join(APP_NAME).join(HISTORY_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.history_path
    }

    /// Load all records, oldest first
    pub fn load(&self) -> Result<Vec<ProbeRecord>> {
        if !self.history_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.history_path).map_err(|e| {
            IolatError::PersistenceError(format!(
                "Failed to read history file {}: {}",
                self.history_path.display(),
                e
            ))
        })?;

        let file: HistoryFile = serde_json::from_str(&content).map_err(|e| {
            IolatError::PersistenceError(format!(
                "Failed to parse history file {}: {}",
                self.history_path.display(),
                e
            ))
        })?;

        Ok(file.records)
    }

    /// Append a record, keeping at most MAX_HISTORY_ENTRIES
    pub fn append(&self, record: ProbeRecord) -> Result<()> {
        let mut records = self.load()?;
        records.push(record);

        if records.len() > MAX_HISTORY_ENTRIES {
            let skip = records.len() - MAX_HISTORY_ENTRIES;
            records.drain(..skip);
        }

        self.save(records)
    }

    fn save(&self, records: Vec<ProbeRecord>) -> Result<()> {
        if let Some(parent) = self.history_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                IolatError::PersistenceError(format!(
                    "Failed to create history directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = serde_json::to_string_pretty(&HistoryFile {
            version: 1,
            records,
        })?;

        fs::write(&self.history_path, content).map_err(|e| {
            IolatError::PersistenceError(format!(
                "Failed to write history file {}: {}",
                self.history_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }

    pub fn clear(&self) -> Result<()> {
        if self.history_path.exists() {
            fs::remove_file(&self.history_path).map_err(|e| {
                IolatError::PersistenceError(format!(
                    "Failed to remove history file {}: {}",
                    self.history_path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// The most recent `count` records, oldest first
    pub fn recent(&self, count: usize) -> Result<Vec<ProbeRecord>> {
        let mut records = self.load()?;
        if records.len() > count {
            records.drain(..records.len() - count);
        }
        Ok(records)
    }
}
