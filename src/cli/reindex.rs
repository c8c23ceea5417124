//! taskshard reindex command implementation
//!
//! Re-derives every year's range index from the shards on disk.

use std::path::PathBuf;

use crate::error::Result;
use crate::lock::FileLock;
use crate::output::{emit_success, HumanOutput, OutputOptions};

use super::open_store;

/// Options for `taskshard reindex`
pub struct ReindexOptions {
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct ReindexReport {
    years: usize,
    months: usize,
    skipped: usize,
    max_id: i64,
    last_id: i64,
}

pub fn run(options: ReindexOptions) -> Result<()> {
    let (store, config) = open_store(options.root, options.config)?;
    let _lock = FileLock::acquire(store.storage().lock_file(), config.lock.timeout_ms)?;

    let rebuilt = store.rebuild_index()?;
    let report = ReindexReport {
        years: rebuilt.years,
        months: rebuilt.months,
        skipped: rebuilt.skipped,
        max_id: rebuilt.max_id,
        last_id: store.last_id()?,
    };

    let mut human = HumanOutput::new(format!(
        "taskshard reindex: {} year(s), {} month(s)",
        report.years, report.months
    ));
    human.push_summary("index", store.storage().index_dir().display().to_string());
    human.push_summary("highest stored id", report.max_id.to_string());
    human.push_summary("counter", report.last_id.to_string());
    if report.skipped > 0 {
        human.push_warning(format!(
            "{} shard file(s) skipped; run with RUST_LOG=warn for paths",
            report.skipped
        ));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "reindex",
        &report,
        Some(&human),
    )
}
