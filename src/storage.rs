//! Storage layer for mytasks
//!
//! Every record type lives in its own JSON array file inside one data
//! directory:
//!
//! ```text
//! <data-dir>/
//!   mytasks.toml          # Optional configuration
//!   task_lists.json       # [TaskList, ...]
//!   tasks.json            # [Task, ...]
//!   workspaces.json       # [Workspace, ...]
//!   *.json.lock           # Advisory lock sidecars
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::config::CONFIG_FILE;
use crate::error::Result;
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};

pub const TASK_LISTS_FILE: &str = "task_lists.json";
pub const TASKS_FILE: &str = "tasks.json";
pub const WORKSPACES_FILE: &str = "workspaces.json";

/// Records read from one file, plus how many were dropped as malformed
#[derive(Debug)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
        }
    }
}

/// Storage manager rooted at one data directory
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
    lock_timeout_ms: u64,
}

impl Storage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn task_lists_file(&self) -> PathBuf {
        self.data_dir.join(TASK_LISTS_FILE)
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir.join(TASKS_FILE)
    }

    pub fn workspaces_file(&self) -> PathBuf {
        self.data_dir.join(WORKSPACES_FILE)
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    // =========================================================================
    // Directory initialization
    // =========================================================================

    /// Create the data directory if needed
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    // =========================================================================
    // File I/O helpers
    // =========================================================================

    /// Write a slice as a pretty-printed JSON array, atomically and under lock
    pub fn write_json<T: Serialize>(&self, path: &Path, records: &[T]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        lock::write_atomic_locked(path, json.as_bytes(), self.lock_timeout_ms)?;
        tracing::debug!(path = %path.display(), count = records.len(), "rewrote data file");
        Ok(())
    }

    /// Read a JSON array leniently.
    ///
    /// A missing file is empty. A file that does not parse, or whose top level
    /// is not an array, is logged and treated as empty. Elements that fail to
    /// decode are skipped one by one.
    pub fn read_json_array<T: DeserializeOwned>(&self, path: &Path) -> Result<Loaded<T>> {
        let content = match lock::read_locked_str(path, self.lock_timeout_ms)? {
            Some(content) => content,
            None => return Ok(Loaded::default()),
        };
        if content.trim().is_empty() {
            return Ok(Loaded::default());
        }

        let value: serde_json::Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "data file is not valid JSON, treating as empty");
                return Ok(Loaded::default());
            }
        };
        let items = match value {
            serde_json::Value::Array(items) => items,
            _ => {
                tracing::warn!(path = %path.display(), "data file is not a JSON array, treating as empty");
                return Ok(Loaded::default());
            }
        };

        let mut loaded = Loaded {
            records: Vec::with_capacity(items.len()),
            skipped: 0,
        };
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<T>(item) {
                Ok(record) => loaded.records.push(record),
                Err(err) => {
                    loaded.skipped += 1;
                    tracing::warn!(
                        path = %path.display(),
                        index,
                        error = %err,
                        "skipping malformed record"
                    );
                }
            }
        }
        Ok(loaded)
    }
}
