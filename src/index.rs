//! Range index
//!
//! One `<year>.json` file per year maps each month to the first and the most
//! recently written task ID of that month's shard. It is a two-bound summary,
//! not a membership list: bounds are never narrowed on delete, so an ID inside
//! a month's range is only a hint that the shard is worth reading. Callers
//! must confirm presence in the shard itself.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::shard;
use crate::storage::{self, Storage};

/// IDs observed in one month's shard
///
/// Stored on disk as `[first]` or `[first, last]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub enum IdRange {
    /// Only one task has been created in the month so far
    Single(i64),
    /// First ID seen and most recent ID seen
    Span { first: i64, last: i64 },
}

impl IdRange {
    pub fn first(&self) -> i64 {
        match *self {
            IdRange::Single(id) => id,
            IdRange::Span { first, .. } => first,
        }
    }

    pub fn last(&self) -> i64 {
        match *self {
            IdRange::Single(id) => id,
            IdRange::Span { last, .. } => last,
        }
    }

    /// Whether the month's shard may hold `id` (inclusive on both ends)
    pub fn contains(&self, id: i64) -> bool {
        match *self {
            IdRange::Single(only) => id == only,
            IdRange::Span { first, last } => first <= id && id <= last,
        }
    }

    /// Fold a newly created ID into the range
    ///
    /// The first bound never moves; the second always becomes `id`.
    pub fn extend(self, id: i64) -> Self {
        IdRange::Span {
            first: self.first(),
            last: id,
        }
    }
}

impl TryFrom<Vec<i64>> for IdRange {
    type Error = String;

    fn try_from(ids: Vec<i64>) -> std::result::Result<Self, Self::Error> {
        match ids.as_slice() {
            [] => Err("empty id range".to_string()),
            [only] => Ok(IdRange::Single(*only)),
            // Extra trailing elements are ignored; only the two bounds matter.
            [first, last, ..] => Ok(IdRange::Span {
                first: *first,
                last: *last,
            }),
        }
    }
}

impl From<IdRange> for Vec<i64> {
    fn from(range: IdRange) -> Self {
        match range {
            IdRange::Single(id) => vec![id],
            IdRange::Span { first, last } => vec![first, last],
        }
    }
}

/// One year's index, keyed by month (1-12)
pub type YearIndex = BTreeMap<u32, IdRange>;

/// Load a year's index; missing, empty, or truncated files are empty
pub fn load(path: &Path) -> Result<YearIndex> {
    storage::read_json_or_default(path)
}

/// Replace a year's index file
pub fn save(path: &Path, index: &YearIndex) -> Result<()> {
    storage::write_json(path, index)
}

/// Record a newly created task ID for `month`
pub fn record(index: &mut YearIndex, month: u32, id: i64) {
    let range = match index.get(&month) {
        None => IdRange::Single(id),
        Some(existing) => existing.extend(id),
    };
    index.insert(month, range);
}

/// Outcome of re-deriving the index from shard contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RebuildReport {
    /// Year index files written
    pub years: usize,
    /// Months that ended up with a range
    pub months: usize,
    /// Shard files skipped (bad name or undecodable)
    pub skipped: usize,
    /// Highest task ID found in any shard
    pub max_id: i64,
}

/// Re-derive every year's index from the shards on disk
///
/// Each non-empty shard gets `[min]` or `[min, max]` of the IDs it actually
/// holds. Year files are overwritten, so stale months disappear.
pub fn rebuild(storage: &Storage) -> Result<RebuildReport> {
    let mut report = RebuildReport::default();
    let tasks_dir = storage.tasks_dir();
    if !tasks_dir.is_dir() {
        return Ok(report);
    }

    fs::create_dir_all(storage.index_dir())?;

    for entry in fs::read_dir(tasks_dir)? {
        let entry = entry?;
        let year_path = entry.path();
        if !year_path.is_dir() {
            continue;
        }
        let year = match entry.file_name().to_str().and_then(|s| s.parse::<i32>().ok()) {
            Some(year) => year,
            None => {
                tracing::warn!(path = %year_path.display(), "skipping non-year directory");
                continue;
            }
        };

        let mut year_index = YearIndex::new();
        for shard_entry in fs::read_dir(&year_path)? {
            let shard_path = shard_entry?.path();
            if !shard_path.is_file() {
                continue;
            }
            let Some(month) = month_from_shard_path(&shard_path) else {
                tracing::warn!(path = %shard_path.display(), "skipping unrecognised shard file");
                report.skipped += 1;
                continue;
            };

            let shard = match shard::load(&shard_path) {
                Ok(shard) => shard,
                Err(err) => {
                    tracing::warn!(path = %shard_path.display(), error = %err, "skipping undecodable shard");
                    report.skipped += 1;
                    continue;
                }
            };

            let (Some(&min), Some(&max)) = (shard.keys().next(), shard.keys().next_back()) else {
                continue;
            };
            let range = if min == max {
                IdRange::Single(min)
            } else {
                IdRange::Span { first: min, last: max }
            };
            year_index.insert(month, range);
            report.max_id = report.max_id.max(max);
        }

        save(&storage.index_path(year), &year_index)?;
        report.years += 1;
        report.months += year_index.len();
        tracing::debug!(year, months = year_index.len(), "rebuilt year index");
    }

    Ok(report)
}

fn month_from_shard_path(path: &Path) -> Option<u32> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
        return None;
    }
    let month = path.file_stem()?.to_str()?.parse::<u32>().ok()?;
    (1..=12).contains(&month).then_some(month)
}
