//! taskshard - month-sharded task storage
//!
//! Tasks are persisted as JSON, one shard per calendar month of creation.
//! A per-year range index records the first and latest ID written into each
//! month so an ID can be resolved to its shard without reading every shard.
//!
//! # Core Concepts
//!
//! - **Shards**: `<year>/<month>.json` files mapping task ID to task
//! - **Counter**: the highest ID ever allocated; IDs are never reused
//! - **Range index**: `[first, last]` per month, a hint and not a membership set
//! - **Locator**: parallel search over year index files
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `taskshard.toml`
//! - `error`: Error types and result aliases
//! - `storage`: Directory layout and JSON file helpers
//! - `lock`: Atomic file replace and the writer lock
//! - `task`: Task records and date filters
//! - `shard`, `counter`, `index`, `locator`: persistence building blocks
//! - `store`: Task operations over one storage root
//! - `output`: Human and JSON output for the CLI

pub mod cli;
pub mod config;
pub mod counter;
pub mod error;
pub mod index;
pub mod locator;
pub mod lock;
pub mod output;
pub mod shard;
pub mod storage;
pub mod store;
pub mod task;

pub use error::{Error, Result};
pub use store::TaskStore;
