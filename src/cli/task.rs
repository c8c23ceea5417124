//! taskshard task command implementations
//!
//! add, update, delete, get, today and list. Mutating commands hold the
//! writer lock for their whole duration.

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::lock::FileLock;
use crate::output::{emit_success, format_task_line, HumanOutput, OutputOptions};
use crate::task::{DateFilter, Task};

use super::open_store;

/// Options for `taskshard add`
pub struct AddOptions {
    pub description: String,
    pub done: bool,
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for `taskshard update`
pub struct UpdateOptions {
    pub id: i64,
    pub done: bool,
    pub description: Option<String>,
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for commands addressing one task (`get`, `delete`)
pub struct IdOptions {
    pub id: i64,
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for `taskshard today`
pub struct TodayOptions {
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for `taskshard list`
pub struct ListOptions {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct DeleteReport {
    id: i64,
    deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<Task>,
}

#[derive(serde::Serialize)]
struct ListReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<DateFilter>,
    count: usize,
    tasks: Vec<Task>,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    if options.description.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "description cannot be blank".to_string(),
        ));
    }

    let (store, config) = open_store(options.root, options.config)?;
    let _lock = FileLock::acquire(store.storage().lock_file(), config.lock.timeout_ms)?;

    let task = store.create(&options.description, options.done)?;

    let mut human = HumanOutput::new(format!("taskshard add: created task {}", task.id));
    push_task_summary(&mut human, &task);
    human.push_summary(
        "shard",
        store
            .storage()
            .shard_path(task.year(), task.month())
            .display()
            .to_string(),
    );

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "add",
        &task,
        Some(&human),
    )
}

pub fn run_update(options: UpdateOptions) -> Result<()> {
    validate_id(options.id)?;

    let (store, config) = open_store(options.root, options.config)?;
    let _lock = FileLock::acquire(store.storage().lock_file(), config.lock.timeout_ms)?;

    let task = store.update(options.id, options.done, options.description.as_deref())?;

    let mut human = HumanOutput::new(format!("taskshard update: task {}", task.id));
    push_task_summary(&mut human, &task);

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "update",
        &task,
        Some(&human),
    )
}

pub fn run_delete(options: IdOptions) -> Result<()> {
    validate_id(options.id)?;

    let (store, config) = open_store(options.root, options.config)?;
    let _lock = FileLock::acquire(store.storage().lock_file(), config.lock.timeout_ms)?;

    let removed = store.delete(options.id)?;

    let mut human = match &removed {
        Some(task) => {
            let mut human =
                HumanOutput::new(format!("taskshard delete: removed task {}", task.id));
            push_task_summary(&mut human, task);
            human
        }
        None => {
            let mut human = HumanOutput::new(format!(
                "taskshard delete: task {} was already gone",
                options.id
            ));
            human.push_warning("the range index still covers this ID; nothing was changed");
            human
        }
    };
    human.push_next_step("taskshard today");

    let report = DeleteReport {
        id: options.id,
        deleted: removed.is_some(),
        task: removed,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "delete",
        &report,
        Some(&human),
    )
}

pub fn run_get(options: IdOptions) -> Result<()> {
    validate_id(options.id)?;

    let (store, _config) = open_store(options.root, options.config)?;
    let task = store.get_by_id(options.id)?;

    let mut human = HumanOutput::new(format!("taskshard get: task {}", task.id));
    push_task_summary(&mut human, &task);
    human.push_summary("updated", task.updated_at.to_rfc3339());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "get",
        &task,
        Some(&human),
    )
}

pub fn run_today(options: TodayOptions) -> Result<()> {
    let (store, _config) = open_store(options.root, options.config)?;
    let tasks = store.today()?;

    let mut human = HumanOutput::new(format!("taskshard today: {} task(s)", tasks.len()));
    for task in &tasks {
        human.push_detail(format_task_line(task));
    }
    if tasks.is_empty() {
        human.push_next_step("taskshard add \"<description>\"");
    }

    let report = ListReport {
        filter: None,
        count: tasks.len(),
        tasks,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "today",
        &report,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let (store, _config) = open_store(options.root, options.config)?;

    let today = store.today_filter();
    let mut filter = DateFilter::new(
        options.year.unwrap_or(today.year),
        options.month.unwrap_or(today.month),
    );
    if let Some(day) = options.day {
        filter = filter.with_day(day);
    }

    let tasks = store.get_by_date(filter)?;

    let mut human = HumanOutput::new(format!(
        "taskshard list: {}-{:02}: {} task(s)",
        filter.year,
        filter.month,
        tasks.len()
    ));
    for task in &tasks {
        human.push_detail(format_task_line(task));
    }
    if filter.day.is_some() {
        human.push_warning("--day is recorded but the whole month is listed");
    }

    let report = ListReport {
        filter: Some(filter),
        count: tasks.len(),
        tasks,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "list",
        &report,
        Some(&human),
    )
}

fn validate_id(id: i64) -> Result<()> {
    if id <= 0 {
        return Err(Error::InvalidArgument(format!(
            "task id must be positive, got {id}"
        )));
    }
    Ok(())
}

fn push_task_summary(human: &mut HumanOutput, task: &Task) {
    human.push_summary("id", task.id.to_string());
    human.push_summary("description", task.description.clone());
    human.push_summary("done", task.done.to_string());
    human.push_summary("created", task.created_at.to_rfc3339());
}
