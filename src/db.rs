//! Task file storage and calendar queries.
//!
//! This module provides the `Database` struct holding tasks and completion marks,
//! its JSON persistence, and the month/season queries the CLI and the calendar UI
//! are built on.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::fields::Season;
use crate::recurrence::occurrence_day;
use crate::rule::ScheduleRule;
use crate::task::{DoneMark, Task};

/// In-memory database of tasks and completion marks.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Database {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub done_marks: Vec<DoneMark>,
}

impl Database {
    /// Load the database from a JSON file; a missing file is an empty database.
    ///
    /// Every stored rule is re-validated while parsing.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "task file missing, starting empty");
            return Ok(Database::default());
        }
        let buf = fs::read_to_string(path)?;
        let db: Database = serde_json::from_str(&buf)?;
        debug!(path = %path.display(), tasks = db.tasks.len(), marks = db.done_marks.len(), "loaded task file");
        Ok(db)
    }

    /// Save database to JSON file using atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(self)?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(&tmp, path)?;
        debug!(path = %path.display(), "saved task file");
        Ok(())
    }

    /// Generate the next available task ID.
    pub fn next_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Get a task by ID, deleted or not.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a mutable reference to a task by ID.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Tasks that have not been soft-deleted.
    pub fn active(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.is_deleted)
    }

    /// Store a new task and return its ID.
    pub fn add_task(&mut self, rule: ScheduleRule, now_utc: i64) -> u64 {
        let id = self.next_id();
        info!(id, name = rule.name(), "adding task");
        self.tasks.push(Task {
            id,
            rule,
            is_deleted: false,
            deleted_at_utc: None,
            created_at_utc: now_utc,
            updated_at_utc: now_utc,
        });
        id
    }

    /// Replace the rule of an active task.
    pub fn update_rule(&mut self, id: u64, rule: ScheduleRule, now_utc: i64) -> Result<()> {
        let task = self
            .get_mut(id)
            .filter(|t| !t.is_deleted)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        info!(id, name = rule.name(), "updating task");
        task.rule = rule;
        task.updated_at_utc = now_utc;
        Ok(())
    }

    /// Mark a task deleted; it stays in the file but drops out of every listing.
    pub fn soft_delete(&mut self, id: u64, now_utc: i64) -> Result<()> {
        let task = self
            .get_mut(id)
            .filter(|t| !t.is_deleted)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        info!(id, name = task.name(), "deleting task");
        task.is_deleted = true;
        task.deleted_at_utc = Some(now_utc);
        task.updated_at_utc = now_utc;
        Ok(())
    }

    /// Whether the task is marked done for the period.
    pub fn is_done(&self, task_id: u64, year: i32, month: Option<u32>) -> bool {
        self.done_marks.iter().any(|m| m.matches(task_id, year, month))
    }

    /// Done for the month itself or through a whole-year mark.
    pub fn is_done_in_month(&self, task_id: u64, year: i32, month: u32) -> bool {
        self.is_done(task_id, year, Some(month)) || self.is_done(task_id, year, None)
    }

    /// Flip the completion mark for (task, year, month) and return the new state.
    pub fn toggle_done(&mut self, task_id: u64, year: i32, month: Option<u32>, now_utc: i64) -> Result<bool> {
        if self.get(task_id).is_none() {
            return Err(Error::TaskNotFound(task_id.to_string()));
        }
        if let Some(pos) = self.done_marks.iter().position(|m| m.matches(task_id, year, month)) {
            self.done_marks.remove(pos);
            info!(task_id, year, ?month, "cleared done mark");
            Ok(false)
        } else {
            self.done_marks.push(DoneMark { task_id, year, month, completed_at_utc: now_utc });
            info!(task_id, year, ?month, "marked done");
            Ok(true)
        }
    }

    /// Day of month → active tasks occurring that day, names in order.
    pub fn month_agenda(&self, year: i32, month: u32) -> BTreeMap<u32, Vec<&Task>> {
        let mut by_day: BTreeMap<u32, Vec<&Task>> = BTreeMap::new();
        for (day, task) in self.month_list(year, month) {
            by_day.entry(day).or_default().push(task);
        }
        by_day
    }

    /// Active tasks occurring in (year, month) with their day, sorted by day then name.
    pub fn month_list(&self, year: i32, month: u32) -> Vec<(u32, &Task)> {
        let mut items: Vec<(u32, &Task)> = self
            .active()
            .filter_map(|t| occurrence_day(&t.rule, year, month).map(|d| (d, t)))
            .collect();
        items.sort_by_key(|(day, t)| (*day, t.name().to_lowercase(), t.id));
        debug!(year, month, count = items.len(), "resolved month occurrences");
        items
    }

    /// Active tasks belonging to a season, ordered by month, day and name.
    ///
    /// Tasks without a month or day sort after those with one.
    pub fn season_list(&self, season: Season) -> Vec<&Task> {
        let mut items: Vec<&Task> = self
            .active()
            .filter(|t| t.rule.season() == Some(season))
            .collect();
        items.sort_by_key(|t| {
            (
                t.rule.month().unwrap_or(u32::MAX),
                t.rule.day().unwrap_or(u32::MAX),
                t.name().to_lowercase(),
                t.id,
            )
        });
        items
    }
}

/// Resolve a task identifier (either ID or name) to the ID of an active task.
/// Names match case-insensitively and must be unique.
pub fn resolve_task_identifier(identifier: &str, db: &Database) -> Result<u64> {
    if let Ok(id) = identifier.trim().parse::<u64>() {
        return match db.get(id) {
            Some(t) if !t.is_deleted => Ok(id),
            _ => Err(Error::TaskNotFound(format!("ID {id}"))),
        };
    }

    let wanted = identifier.trim().to_lowercase();
    let matches: Vec<&Task> = db.active().filter(|t| t.name().to_lowercase() == wanted).collect();

    match matches.as_slice() {
        [] => Err(Error::TaskNotFound(format!("'{}'", identifier))),
        [only] => Ok(only.id),
        many => Err(Error::AmbiguousTask {
            name: identifier.to_string(),
            ids: many.iter().map(|t| t.id.to_string()).collect::<Vec<_>>().join(", "),
        }),
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}
