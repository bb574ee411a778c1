//! Stored task and completion-mark structures.
//!
//! A `Task` wraps a validated `ScheduleRule` with the bookkeeping the store needs:
//! identity, soft-delete state and timestamps. A `DoneMark` records that a task was
//! completed for one period.

use serde::{Deserialize, Serialize};

use crate::rule::ScheduleRule;

/// A household task with its schedule rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub rule: ScheduleRule,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub deleted_at_utc: Option<i64>,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

impl Task {
    pub fn name(&self) -> &str {
        self.rule.name()
    }
}

/// Completion of a task for a year, or for one month of that year.
///
/// The store keeps at most one mark per (task_id, year, month).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoneMark {
    pub task_id: u64,
    pub year: i32,
    #[serde(default)]
    pub month: Option<u32>,
    pub completed_at_utc: i64,
}

impl DoneMark {
    /// Whether this mark covers the given period.
    pub fn matches(&self, task_id: u64, year: i32, month: Option<u32>) -> bool {
        self.task_id == task_id && self.year == year && self.month == month
    }
}
