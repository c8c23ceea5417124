//! Shard codec
//!
//! A shard is one `<year>/<month>.json` file mapping task ID to task. Loads
//! are tolerant of shards that were never written (or were cut short), saves
//! replace the whole file. Writes to one shard are not coordinated here.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::storage;
use crate::task::Task;

/// Contents of one shard, keyed by task ID
pub type Shard = BTreeMap<i64, Task>;

/// Load a shard; missing, empty, or truncated files are empty shards
pub fn load(path: &Path) -> Result<Shard> {
    storage::read_json_or_default(path)
}

/// Replace a shard's file with `shard`
pub fn save(path: &Path, shard: &Shard) -> Result<()> {
    tracing::debug!(path = %path.display(), tasks = shard.len(), "saving shard");
    storage::write_json(path, shard)
}
