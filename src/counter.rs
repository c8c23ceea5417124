//! Counter store: the highest task ID ever allocated.
//!
//! Read-modify-write with no locking; callers keep to one writer.

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::storage;

/// JSON field holding the counter value
const LAST_ID_LABEL: &str = "lastID";

/// Handle on the counter file
#[derive(Debug, Clone)]
pub struct CounterStore {
    path: PathBuf,
}

impl CounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the last allocated ID
    ///
    /// On first launch the file is created empty and 0 is returned, as is a
    /// record without the `lastID` label. Any other malformed content,
    /// truncated documents included, is a decode error. A missing parent
    /// directory is an I/O error.
    pub fn read(&self) -> Result<i64> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;

        if content.trim().is_empty() {
            return Ok(0);
        }
        let record: BTreeMap<String, i64> =
            serde_json::from_str(&content).map_err(|source| Error::Decode {
                path: self.path.clone(),
                source,
            })?;
        Ok(record.get(LAST_ID_LABEL).copied().unwrap_or(0))
    }

    /// Replace the stored value
    pub fn write(&self, id: i64) -> Result<()> {
        let record = BTreeMap::from([(LAST_ID_LABEL, id)]);
        storage::write_json(&self.path, &record)
    }
}
