//! Task records and query filters.

use chrono::{DateTime, Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// A persisted task
///
/// `id` and `created_at` are set once; `updated_at` moves on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: i64,
    pub description: String,
    pub done: bool,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

impl Task {
    pub fn new(id: i64, description: impl Into<String>, done: bool, now: DateTime<Local>) -> Self {
        Self {
            id,
            description: description.into(),
            done,
            created_at: now,
            updated_at: now,
        }
    }

    /// Calendar year of the owning shard
    pub fn year(&self) -> i32 {
        self.created_at.year()
    }

    /// Calendar month (1-12) of the owning shard
    pub fn month(&self) -> u32 {
        self.created_at.month()
    }

    pub fn created_on(&self, date: NaiveDate) -> bool {
        self.created_at.date_naive() == date
    }
}

/// Year/month selector for listing a shard
///
/// `day` is carried for callers but does not narrow the result: a listing
/// returns the whole month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateFilter {
    pub year: i32,
    pub month: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
}

impl DateFilter {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            day: None,
        }
    }

    pub fn with_day(mut self, day: u32) -> Self {
        self.day = Some(day);
        self
    }

    /// Filter for the date of `now`, day included
    pub fn today(now: DateTime<Local>) -> Self {
        Self::new(now.year(), now.month()).with_day(now.day())
    }
}
