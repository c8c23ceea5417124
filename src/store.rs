//! Task operations
//!
//! `TaskStore` composes the counter, shard codec, range index and locator into
//! the record lifecycle. It owns its counter handle; nothing here is global.
//! Writers must be serialized by the caller: neither the counter nor the
//! shards are locked.

use chrono::{DateTime, Datelike, Local};

use crate::counter::CounterStore;
use crate::error::{Error, Result};
use crate::index::{self, RebuildReport};
use crate::locator::Locator;
use crate::shard;
use crate::storage::Storage;
use crate::task::{DateFilter, Task};

/// Source of "now" for timestamps and the current shard period
pub type Clock = fn() -> DateTime<Local>;

/// Task lifecycle and queries over one storage root
#[derive(Debug, Clone)]
pub struct TaskStore {
    storage: Storage,
    counter: CounterStore,
    locator: Locator,
    clock: Clock,
}

impl TaskStore {
    pub fn new(storage: Storage) -> Self {
        let counter = CounterStore::new(storage.counter_file());
        let locator = Locator::new(storage.index_dir(), storage.tasks_dir());
        Self {
            storage,
            counter,
            locator,
            clock: Local::now,
        }
    }

    /// Replace the wall clock (tests pin dates with this)
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Highest ID allocated so far (0 before the first create)
    pub fn last_id(&self) -> Result<i64> {
        self.counter.read()
    }

    /// Allocate the next ID and persist a new task in the current month
    ///
    /// Persists shard, counter, then index. The steps are not transactional:
    /// a failure part way leaves earlier steps in place.
    pub fn create(&self, description: &str, done: bool) -> Result<Task> {
        let id = self.counter.read()? + 1;
        let now = (self.clock)();
        let task = Task::new(id, description, done, now);
        let (year, month) = (task.year(), task.month());

        self.storage.prepare_year(year)?;

        let shard_path = self.storage.shard_path(year, month);
        let mut tasks = shard::load(&shard_path)?;
        tasks.insert(id, task.clone());
        shard::save(&shard_path, &tasks)?;

        self.counter.write(id)?;

        let index_path = self.storage.index_path(year);
        let mut year_index = index::load(&index_path)?;
        index::record(&mut year_index, month, id);
        index::save(&index_path, &year_index)?;

        tracing::info!(id, year, month, "created task");
        Ok(task)
    }

    /// Set `done`, and the description when `description` is non-empty
    pub fn update(&self, id: i64, done: bool, description: Option<&str>) -> Result<Task> {
        let shard_path = self.locator.locate(id)?;
        let mut tasks = shard::load(&shard_path)?;
        let task = tasks.get_mut(&id).ok_or(Error::TaskNotFound(id))?;

        if let Some(description) = description.filter(|d| !d.is_empty()) {
            task.description = description.to_string();
        }
        task.done = done;
        task.updated_at = (self.clock)();
        let updated = task.clone();

        shard::save(&shard_path, &tasks)?;
        tracing::info!(id, done, "updated task");
        Ok(updated)
    }

    /// Remove a task from its shard
    ///
    /// Returns `None` when the located shard no longer holds `id`; the shard
    /// is left untouched in that case. The range index is never narrowed.
    pub fn delete(&self, id: i64) -> Result<Option<Task>> {
        let shard_path = self.locator.locate(id)?;
        let mut tasks = shard::load(&shard_path)?;

        let Some(removed) = tasks.remove(&id) else {
            tracing::debug!(id, "task already absent from its shard");
            return Ok(None);
        };
        shard::save(&shard_path, &tasks)?;

        tracing::info!(id, "deleted task");
        Ok(Some(removed))
    }

    /// Fetch one task, confirming presence in the located shard
    pub fn get_by_id(&self, id: i64) -> Result<Task> {
        let shard_path = self.locator.locate(id)?;
        let mut tasks = shard::load(&shard_path)?;
        tasks.remove(&id).ok_or(Error::TaskNotFound(id))
    }

    /// Tasks created today, walking down from `last_id`
    ///
    /// Only the shard holding `last_id` is read. The walk stops at the first
    /// ID that is missing or was not created today, so tasks from today that
    /// landed in a previous month's shard are not reported.
    pub fn get_today(&self, last_id: i64) -> Result<Vec<Task>> {
        if last_id <= 0 {
            return Ok(Vec::new());
        }
        let shard_path = match self.locator.locate(last_id) {
            Ok(path) => path,
            Err(err) if err.is_not_found() => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        let mut tasks = shard::load(&shard_path)?;
        let today = (self.clock)().date_naive();

        let mut found = Vec::new();
        let mut id = last_id;
        while id > 0 {
            match tasks.remove(&id) {
                Some(task) if task.created_on(today) => found.push(task),
                _ => break,
            }
            id -= 1;
        }
        Ok(found)
    }

    /// Today's tasks, starting from the stored counter
    pub fn today(&self) -> Result<Vec<Task>> {
        let last_id = self.counter.read()?;
        self.get_today(last_id)
    }

    /// Every task in the filter's month shard, ordered by ID
    ///
    /// `filter.day` does not narrow the result.
    pub fn get_by_date(&self, filter: DateFilter) -> Result<Vec<Task>> {
        let shard_path = self.storage.shard_path(filter.year, filter.month);
        tracing::debug!(year = filter.year, month = filter.month, "listing shard");
        Ok(shard::load(&shard_path)?.into_values().collect())
    }

    /// Re-derive the range index from shard contents
    ///
    /// Also moves the counter up to the highest stored ID when it lags, so the
    /// next create cannot hand out an ID that is already in use.
    pub fn rebuild_index(&self) -> Result<RebuildReport> {
        let report = index::rebuild(&self.storage)?;

        let last_id = self.counter.read()?;
        if report.max_id > last_id {
            tracing::warn!(from = last_id, to = report.max_id, "counter behind stored tasks; advancing");
            self.counter.write(report.max_id)?;
        }

        tracing::info!(years = report.years, months = report.months, skipped = report.skipped, "rebuilt range index");
        Ok(report)
    }

    /// Current date as a listing filter
    pub fn today_filter(&self) -> DateFilter {
        DateFilter::today((self.clock)())
    }

    /// Current year and month of the store's clock
    pub fn current_period(&self) -> (i32, u32) {
        let now = (self.clock)();
        (now.year(), now.month())
    }
}
