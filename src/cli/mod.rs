//! Command-line interface for taskshard
//!
//! This module defines the CLI structure using clap derive macros.
//! Handlers live in submodules and call into [`TaskStore`].

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::store::TaskStore;
use crate::storage::Storage;

mod reindex;
mod task;

/// taskshard - month-sharded task storage
///
/// Tasks live in one JSON file per creation month; a per-year range index
/// resolves task IDs to their shard.
#[derive(Parser, Debug)]
#[command(name = "taskshard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Storage root (overrides storage.root from the config file)
    #[arg(long, global = true, env = "TASKSHARD_ROOT")]
    pub root: Option<PathBuf>,

    /// Path to a taskshard.toml (defaults to ./taskshard.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a task in the current month's shard
    Add {
        /// Task description
        description: String,

        /// Mark the task done on creation
        #[arg(long)]
        done: bool,
    },

    /// Update a task's status and, optionally, its description
    Update {
        /// Task ID
        id: i64,

        /// Mark the task done (omit to mark it not done)
        #[arg(long)]
        done: bool,

        /// New description (empty keeps the current one)
        #[arg(long = "desc")]
        description: Option<String>,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: i64,
    },

    /// Show one task
    Get {
        /// Task ID
        id: i64,
    },

    /// List tasks created today
    Today,

    /// List every task in a month's shard
    List {
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Month 1-12 (defaults to the current month)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Day 1-31 (recorded in the output; the whole month is listed)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=31))]
        day: Option<u32>,
    },

    /// Rebuild the range index from shard contents
    Reindex,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Add { description, done } => task::run_add(task::AddOptions {
                description,
                done,
                root: self.root,
                config: self.config,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Update {
                id,
                done,
                description,
            } => task::run_update(task::UpdateOptions {
                id,
                done,
                description,
                root: self.root,
                config: self.config,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Delete { id } => task::run_delete(task::IdOptions {
                id,
                root: self.root,
                config: self.config,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Get { id } => task::run_get(task::IdOptions {
                id,
                root: self.root,
                config: self.config,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Today => task::run_today(task::TodayOptions {
                root: self.root,
                config: self.config,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::List { year, month, day } => task::run_list(task::ListOptions {
                year,
                month,
                day,
                root: self.root,
                config: self.config,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Reindex => reindex::run(reindex::ReindexOptions {
                root: self.root,
                config: self.config,
                json: self.json,
                quiet: self.quiet,
            }),
        }
    }
}

/// Resolve configuration, apply `--root`, and bootstrap the storage tree
pub(crate) fn open_store(
    root: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<(TaskStore, Config)> {
    let mut config = match config_path {
        Some(path) => Config::load(&path)?,
        None => Config::load_from_dir(&std::env::current_dir()?),
    };
    if let Some(root) = root {
        config.storage.root = root;
    }

    let storage = Storage::from_config(&config.storage);
    storage.init()?;
    tracing::debug!(root = %storage.root().display(), "opened storage");

    Ok((TaskStore::new(storage), config))
}
