#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use chrono::{DateTime, Local, TimeZone};
use tempfile::TempDir;

use taskshard::storage::Storage;
use taskshard::store::{Clock, TaskStore};

/// A storage root in a temp directory, initialized and ready for writes
pub struct TestStore {
    dir: TempDir,
    storage: Storage,
}

impl TestStore {
    pub fn init() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let storage = Storage::new(dir.path().join("storage"));
        storage
            .init()
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        Ok(Self { dir, storage })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn root(&self) -> &Path {
        self.storage.root()
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Store pinned to `clock`
    pub fn store(&self, clock: Clock) -> TaskStore {
        TaskStore::new(self.storage.clone()).with_clock(clock)
    }

    pub fn write_index(&self, year: i32, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.storage.index_path(year);
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_json(&self, path: &Path) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }
}

pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("unambiguous local time")
}

pub fn jan_31_2025() -> DateTime<Local> {
    at(2025, 1, 31, 18)
}

pub fn feb_1_2025() -> DateTime<Local> {
    at(2025, 2, 1, 9)
}

pub fn jun_14_2025() -> DateTime<Local> {
    at(2025, 6, 14, 9)
}

pub fn dec_31_2025() -> DateTime<Local> {
    at(2025, 12, 31, 12)
}

pub fn jan_1_2026() -> DateTime<Local> {
    at(2026, 1, 1, 12)
}

/// `taskshard` binary rooted at `root`, run from `cwd` so no stray config is picked up
pub fn taskshard_cmd(cwd: &Path, root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("taskshard").expect("binary");
    cmd.current_dir(cwd)
        .env_remove("TASKSHARD_ROOT")
        .env_remove("RUST_LOG")
        .arg("--root")
        .arg(root);
    cmd
}
