//! Storage layout for taskshard
//!
//! # Directory Structure
//!
//! ```text
//! storage/                      # Storage root
//!   lastID.json                 # Counter: {"lastID": <n>}
//!   .lock                       # Writer lock held by mutating commands
//!   tasks/                      # Shards
//!     <year>/<month>.json       # {"<id>": Task, ...}
//!   index/                      # Range index
//!     <year>.json               # {"<month>": [first] | [first, last], ...}
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::lock;

/// Name of the writer lock file under the storage root
pub const LOCK_FILE: &str = ".lock";

/// Resolved storage paths
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
    tasks_dir: PathBuf,
    index_dir: PathBuf,
    counter_file: PathBuf,
}

impl Storage {
    /// Create a storage layout with the default directory names under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let mut config = StorageConfig::default();
        config.root = root.into();
        Self::from_config(&config)
    }

    /// Create a storage layout from configuration
    pub fn from_config(config: &StorageConfig) -> Self {
        let root = config.root.clone();
        Self {
            tasks_dir: root.join(config.tasks_dir.trim()),
            index_dir: root.join(config.index_dir.trim()),
            counter_file: root.join(config.counter_file.trim()),
            root,
        }
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding `<year>/<month>.json` shards
    pub fn tasks_dir(&self) -> &Path {
        &self.tasks_dir
    }

    /// Directory holding `<year>.json` range index files
    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }

    pub fn counter_file(&self) -> &Path {
        &self.counter_file
    }

    pub fn lock_file(&self) -> PathBuf {
        self.root.join(LOCK_FILE)
    }

    /// Shard path for a creation period
    pub fn shard_path(&self, year: i32, month: u32) -> PathBuf {
        shard_path(&self.tasks_dir, &year.to_string(), month)
    }

    /// Range index path for a year
    pub fn index_path(&self, year: i32) -> PathBuf {
        self.index_dir.join(format!("{year}.json"))
    }

    // =========================================================================
    // Directory initialization
    // =========================================================================

    /// Create the root, shard and index directories
    ///
    /// Idempotent; existing files are left alone.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::create_dir_all(&self.tasks_dir)?;
        fs::create_dir_all(&self.index_dir)?;
        Ok(())
    }

    /// Ensure the directories a write into `year` needs exist
    pub fn prepare_year(&self, year: i32) -> Result<()> {
        fs::create_dir_all(self.tasks_dir.join(year.to_string()))?;
        fs::create_dir_all(&self.index_dir)?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.tasks_dir.is_dir() && self.index_dir.is_dir()
    }
}

/// Shard path under a tasks directory; `year` is kept as the on-disk name
pub(crate) fn shard_path(tasks_dir: &Path, year: &str, month: u32) -> PathBuf {
    tasks_dir.join(year).join(format!("{month}.json"))
}

// =========================================================================
// File I/O helpers
// =========================================================================

/// Read a JSON document, treating "nothing there yet" as the default value
///
/// A missing file, an empty file, and content that ends mid-document all
/// yield `T::default()`. Any other malformed content is `Error::Decode`.
pub(crate) fn read_json_or_default<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
        Err(err) => return Err(Error::Io(err)),
    };
    decode_or_default(path, &content)
}

pub(crate) fn decode_or_default<T>(path: &Path, content: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match serde_json::from_str(content) {
        Ok(value) => Ok(value),
        Err(err) if err.is_eof() => Ok(T::default()),
        Err(source) => Err(Error::Decode {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Serialize to pretty JSON and atomically replace `path`
pub(crate) fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(data)?;
    json.push('\n');
    lock::write_atomic(path, json.as_bytes())
}
