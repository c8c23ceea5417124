//! Concurrent ID locator
//!
//! Resolves a task ID to the shard that should hold it by scanning every
//! year index file in parallel. One worker runs per year file; the first
//! month range containing the ID wins and the remaining workers are told to
//! stop at their next comparison.
//!
//! Ranges normally do not overlap, since IDs are allocated in creation order,
//! but nothing prevents it (a clock moved backwards can file a new ID into an
//! older month). When several ranges contain the ID, whichever worker reports
//! first wins, so the chosen shard may differ between runs.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;

use crate::error::{Error, Result};
use crate::index::{self, YearIndex};
use crate::storage;

/// Finds the shard for an ID via the range index
#[derive(Debug, Clone)]
pub struct Locator {
    index_dir: PathBuf,
    tasks_dir: PathBuf,
}

impl Locator {
    pub fn new(index_dir: impl Into<PathBuf>, tasks_dir: impl Into<PathBuf>) -> Self {
        Self {
            index_dir: index_dir.into(),
            tasks_dir: tasks_dir.into(),
        }
    }

    /// Path of the shard whose index range contains `id`
    ///
    /// The returned shard is not guaranteed to still hold the task: deleted
    /// IDs keep resolving because ranges are never narrowed. Year files that
    /// fail to decode are skipped; an unreadable index directory is an error.
    pub fn locate(&self, id: i64) -> Result<PathBuf> {
        let years = self.load_years()?;
        if years.is_empty() {
            return Err(Error::TaskNotFound(id));
        }

        tracing::debug!(id, years = years.len(), "searching year indexes");
        let cancelled = AtomicBool::new(false);
        let (tx, rx) = mpsc::channel::<PathBuf>();

        let found = thread::scope(|scope| {
            for (year, months) in &years {
                let tx = tx.clone();
                let cancelled = &cancelled;
                scope.spawn(move || {
                    for (month, range) in months {
                        if cancelled.load(Ordering::Relaxed) {
                            return;
                        }
                        if range.contains(id) {
                            // Unbounded channel: a late send never blocks the worker.
                            let _ = tx.send(storage::shard_path(&self.tasks_dir, year, *month));
                            return;
                        }
                    }
                });
            }
            drop(tx);

            // Err here means every worker finished without a hit.
            let found = rx.recv().ok();
            cancelled.store(true, Ordering::Relaxed);
            found
        });

        match found {
            Some(path) => {
                tracing::debug!(id, path = %path.display(), "located task shard");
                Ok(path)
            }
            None => Err(Error::TaskNotFound(id)),
        }
    }

    /// Decode every year index file, keyed by year name
    fn load_years(&self) -> Result<Vec<(String, YearIndex)>> {
        let mut years = Vec::new();
        for entry in fs::read_dir(&self.index_dir)? {
            let path = entry?.path();
            let Some(year) = year_from_index_path(&path) else {
                continue;
            };
            match index::load(&path) {
                Ok(months) => years.push((year, months)),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable year index");
                }
            }
        }
        Ok(years)
    }
}

fn year_from_index_path(path: &Path) -> Option<String> {
    if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
        return None;
    }
    path.file_stem()?.to_str().map(str::to_string)
}
