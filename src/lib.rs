//! # yearwheel - household year-wheel calendar
//!
//! Recurring household tasks ("clean the gutters every spring", "VAT return on the
//! 10th every quarter", "bins out the last Monday of the month") and the calendar
//! arithmetic that places them on concrete days.
//!
//! ## Core Concepts
//!
//! - **Schedule rules**: exactly one of an exact day, an ordinal weekday
//!   ("2nd Tuesday", "last Friday") or a bare season, repeated yearly,
//!   semiannually, quarterly or monthly from an anchor month
//! - **Resolution**: whether and on which day a rule fires in a given (year, month)
//! - **Descriptions**: readable schedule summaries and season derivation
//! - **Completion marks**: per task, per year or per (year, month)
//!
//! ## Module Organization
//!
//! - `fields`: enumerations a rule is built from
//! - `rule`: rule drafts, validated rules and the validator
//! - `recurrence`: occurrence resolution
//! - `describe`: descriptions, season derivation and label tables
//! - `calendar`: Monday-first month grids
//! - `task`, `db`: stored tasks, completion marks and JSON persistence
//! - `config`: `config.toml` loading
//! - `cli`, `cmd`: the `yw` command line
//! - `tui`: the interactive month calendar

pub mod calendar;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod db;
pub mod describe;
pub mod error;
pub mod fields;
pub mod recurrence;
pub mod rule;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod run;
}

pub use error::{Error, Result};
pub use rule::{validate, RuleDraft, Schedule, ScheduleRule};
