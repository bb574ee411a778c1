//! Command implementations for the CLI interface.
//!
//! This module contains the subcommand definitions and their handlers: creating and
//! editing tasks, month and season listings, the text calendar, completion marks and
//! the interactive calendar.

use std::io;
use std::path::Path;

use chrono::{Datelike, Local, NaiveDate, TimeZone, Utc};
use clap::{Args, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use tracing::warn;

use crate::calendar::{next_month, prev_month, MonthGrid};
use crate::cli::Cli;
use crate::config::Config;
use crate::db::*;
use crate::describe::*;
use crate::error::{Error, Result};
use crate::fields::*;
use crate::recurrence::{occurrence_months, upcoming};
use crate::rule::{validate, RuleDraft, ScheduleRule};
use crate::task::Task;
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive calendar.
    Ui,

    /// Add a new task.
    Add {
        /// What needs doing.
        name: String,
        #[command(flatten)]
        rule: RuleArgs,
    },

    /// Change the schedule or details of a task.
    Edit {
        /// Task ID or name to edit
        id: String,
        /// New name.
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        rule: RuleArgs,
        /// Remove the anchor month.
        #[arg(long)]
        clear_month: bool,
        /// Remove the exact day.
        #[arg(long)]
        clear_day: bool,
        /// Remove the weekday and week rank.
        #[arg(long)]
        clear_weekday: bool,
        /// Remove the explicit season (it is derived again from the month).
        #[arg(long)]
        clear_season: bool,
    },

    /// List the tasks that fall in a month, by day.
    List {
        /// Month 1-12 (default: current month).
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        /// Year (default: current year).
        #[arg(long)]
        year: Option<i32>,
    },

    /// List the tasks belonging to a season.
    Season {
        /// spring | summer | autumn | winter
        #[arg(value_enum)]
        season: Season,
    },

    /// Print a month calendar with its tasks.
    Calendar {
        /// Year (default: current year).
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12 (default: current month).
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },

    /// View a single task by ID or name.
    View {
        /// Task ID or name to view
        id: String,
    },

    /// Delete a task by ID or name (it is kept in the file, hidden from listings).
    Delete {
        /// Task ID or name to delete
        id: String,
    },

    /// Toggle the done mark of a task for a month or a whole year.
    Done {
        /// Task ID or name
        id: String,
        /// Year (default: current year).
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12 (default: current month).
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12), conflicts_with = "whole_year")]
        month: Option<u32>,
        /// Mark the whole year rather than a single month.
        #[arg(long)]
        whole_year: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Schedule fields shared by `add` and `edit`.
#[derive(Args, Debug, Default)]
pub struct RuleArgs {
    /// Free-text notes.
    #[arg(long)]
    pub notes: Option<String>,
    /// Anchor month 1-12.
    #[arg(long)]
    pub month: Option<u32>,
    /// Exact day of month 1-31.
    #[arg(long)]
    pub day: Option<u32>,
    /// Weekday 0-6 (0 = Monday), used with --week-rank.
    #[arg(long)]
    pub weekday: Option<u32>,
    /// Which occurrence of the weekday: 1st | 2nd | 3rd | 4th | last.
    #[arg(long, value_enum)]
    pub week_rank: Option<WeekRank>,
    /// yearly | semiannual | quarterly | monthly (add defaults to yearly).
    #[arg(long, value_enum)]
    pub recurrence: Option<Recurrence>,
    /// spring | summer | autumn | winter (derived from the month when omitted).
    #[arg(long, value_enum)]
    pub season: Option<Season>,
}

impl RuleArgs {
    /// Overlay the fields given on the command line onto a draft.
    pub fn apply(&self, draft: &mut RuleDraft) {
        if let Some(notes) = &self.notes {
            draft.notes = notes.clone();
        }
        if self.month.is_some() {
            draft.month = self.month;
        }
        if self.day.is_some() {
            draft.day = self.day;
        }
        if self.weekday.is_some() {
            draft.weekday = self.weekday;
        }
        if self.week_rank.is_some() {
            draft.week_rank = self.week_rank;
        }
        if let Some(recurrence) = self.recurrence {
            draft.recurrence = recurrence;
        }
        if self.season.is_some() {
            draft.season = self.season;
        }
    }
}

/// Settings every command reads.
pub struct Context<'a> {
    pub db_path: &'a Path,
    pub config: &'a Config,
    pub locale: Locale,
    pub today: NaiveDate,
}

fn validated(draft: &RuleDraft) -> Result<ScheduleRule> {
    validate(draft).map_err(|e| {
        warn!(error = %e, field = ?e.field(), "rejected schedule");
        Error::from(e)
    })
}

/// Launch the interactive calendar.
pub fn cmd_ui(ctx: &Context) -> Result<()> {
    run_tui(ctx.db_path, ctx.locale, ctx.config.calendar.show_done)?;
    Ok(())
}

/// Add a new task to the database.
pub fn cmd_add(db: &mut Database, ctx: &Context, name: String, args: RuleArgs) -> Result<()> {
    let mut draft = RuleDraft { name, ..RuleDraft::default() };
    args.apply(&mut draft);
    let rule = validated(&draft)?;
    let summary = describe(&rule, ctx.locale);

    let id = db.add_task(rule, Utc::now().timestamp());
    db.save(ctx.db_path)?;
    println!("Added task {id}: {summary}");
    Ok(())
}

/// Edit an existing task; the merged fields are validated as a whole.
#[allow(clippy::too_many_arguments)]
pub fn cmd_edit(
    db: &mut Database,
    ctx: &Context,
    id: String,
    name: Option<String>,
    args: RuleArgs,
    clear_month: bool,
    clear_day: bool,
    clear_weekday: bool,
    clear_season: bool,
) -> Result<()> {
    let task_id = resolve_task_identifier(&id, db)?;
    let Some(task) = db.get(task_id) else {
        return Err(Error::TaskNotFound(id));
    };

    // Carries only an explicit season, so a derived one follows a new month.
    let mut draft = task.rule.to_draft();
    if clear_month {
        draft.month = None;
    }
    if clear_day {
        draft.day = None;
    }
    if clear_weekday {
        draft.weekday = None;
        draft.week_rank = None;
    }
    if clear_season {
        draft.season = None;
    }
    if let Some(name) = name {
        draft.name = name;
    }
    args.apply(&mut draft);

    let rule = validated(&draft)?;
    let summary = describe(&rule, ctx.locale);
    db.update_rule(task_id, rule, Utc::now().timestamp())?;
    db.save(ctx.db_path)?;
    println!("Updated task {task_id}: {summary}");
    Ok(())
}

fn done_marker(db: &Database, task: &Task, year: i32, month: u32) -> &'static str {
    if db.is_done_in_month(task.id, year, month) {
        "[x]"
    } else {
        "[ ]"
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// List the tasks of one month, ordered by day then name.
pub fn cmd_list(db: &Database, ctx: &Context, month: Option<u32>, year: Option<i32>) -> Result<()> {
    let year = year.unwrap_or(ctx.today.year());
    let month = month.unwrap_or(ctx.today.month());

    println!("{} {}", month_label(month, ctx.locale), year);
    println!("{:<4} {:<5} {:<4} {:<28} {}", "Day", "ID", "Done", "Task", "Schedule");
    let mut shown = 0;
    for (day, task) in db.month_list(year, month) {
        if !ctx.config.calendar.show_done && db.is_done_in_month(task.id, year, month) {
            continue;
        }
        println!(
            "{:<4} {:<5} {:<4} {:<28} {}",
            day,
            task.id,
            done_marker(db, task, year, month),
            truncate(task.name(), 28),
            describe(&task.rule, ctx.locale)
        );
        shown += 1;
    }
    if shown == 0 {
        println!("  -");
    }
    Ok(())
}

/// List the tasks of one season, ordered by month, day and name.
pub fn cmd_season(db: &Database, ctx: &Context, season: Season) -> Result<()> {
    let label = season_label(season, ctx.locale);
    println!("{}", capitalize(label));
    println!("{:<5} {:<28} {:<18} {}", "ID", "Task", "When", "Schedule");
    let tasks = db.season_list(season);
    if tasks.is_empty() {
        println!("  -");
    }
    for task in tasks {
        println!(
            "{:<5} {:<28} {:<18} {}",
            task.id,
            truncate(task.name(), 28),
            short_when(&task.rule, ctx.locale),
            describe(&task.rule, ctx.locale)
        );
    }
    Ok(())
}

/// Print a month grid followed by the tasks of each day.
pub fn cmd_calendar(db: &Database, ctx: &Context, year: Option<i32>, month: Option<u32>) -> Result<()> {
    let year = year.unwrap_or(ctx.today.year());
    let month = month.unwrap_or(ctx.today.month());
    let grid = MonthGrid::new(year, month)
        .ok_or_else(|| Error::InvalidArgument(format!("no such month: {year}-{month}")))?;
    let agenda = db.month_agenda(year, month);
    let week_numbers = ctx.config.calendar.week_numbers;

    let title = format!("{} {}", month_label(month, ctx.locale), year);
    let width: usize = if week_numbers { 32 } else { 28 };
    println!("{:^width$}", title);

    let mut header = String::new();
    if week_numbers {
        header.push_str("Wk  ");
    }
    for h in weekday_headers(ctx.locale) {
        header.push_str(&format!("{:>3} ", h));
    }
    println!("{}", header.trim_end());

    let iso = grid.iso_weeks();
    for (row, week) in grid.weeks.iter().enumerate() {
        let mut line = String::new();
        if week_numbers {
            line.push_str(&format!("{:>2}  ", iso.get(row).copied().unwrap_or(0)));
        }
        for cell in week {
            match cell {
                Some(day) => {
                    let marker = if NaiveDate::from_ymd_opt(year, month, *day) == Some(ctx.today) {
                        '<'
                    } else if agenda.contains_key(day) {
                        '*'
                    } else {
                        ' '
                    };
                    line.push_str(&format!("{:>3}{}", day, marker));
                }
                None => line.push_str("    "),
            }
        }
        println!("{}", line.trim_end());
    }

    println!();
    if agenda.is_empty() {
        println!("No tasks this month.");
    }
    for (day, tasks) in &agenda {
        for task in tasks {
            if !ctx.config.calendar.show_done && db.is_done_in_month(task.id, year, month) {
                continue;
            }
            println!("{:>3} {} {} (#{})", day, done_marker(db, task, year, month), task.name(), task.id);
        }
    }

    let (py, pm) = prev_month(year, month);
    let (ny, nm) = next_month(year, month);
    println!();
    println!("prev: yw calendar --year {py} --month {pm}   next: yw calendar --year {ny} --month {nm}");
    Ok(())
}

/// View detailed information about a specific task.
pub fn cmd_view(db: &Database, ctx: &Context, id: String) -> Result<()> {
    let task_id = resolve_task_identifier(&id, db)?;
    let Some(task) = db.get(task_id) else {
        return Err(Error::TaskNotFound(id));
    };
    let rule = &task.rule;
    let locale = ctx.locale;

    println!("ID:           {}", task.id);
    println!("Name:         {}", rule.name());
    println!("Schedule:     {}", describe(rule, locale));
    println!("When:         {}", short_when(rule, locale));
    println!("Recurrence:   {}", recurrence_label(rule.recurrence(), locale));
    println!("Season:       {}", rule.season().map(|s| season_label(s, locale)).unwrap_or("-"));
    let months = occurrence_months(rule);
    println!(
        "Months:       {}",
        if months.is_empty() {
            "-".to_string()
        } else {
            months.iter().map(|&m| month_label(m, locale)).collect::<Vec<_>>().join(", ")
        }
    );
    println!("Created UTC:  {}", format_timestamp(task.created_at_utc));
    println!("Updated UTC:  {}", format_timestamp(task.updated_at_utc));
    println!("Notes:\n{}\n", if rule.notes().is_empty() { "-" } else { rule.notes() });

    let next = upcoming(rule, ctx.today, 12);
    if next.is_empty() {
        println!("Upcoming:     - (no fixed day)");
    } else {
        println!("Upcoming:");
        for date in next {
            let done = if db.is_done_in_month(task.id, date.year(), date.month()) { " [x]" } else { "" };
            println!("  {}{}", date.format("%Y-%m-%d %a"), done);
        }
    }
    Ok(())
}

fn format_timestamp(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "-".into())
}

/// Soft-delete a task.
pub fn cmd_delete(db: &mut Database, ctx: &Context, id: String) -> Result<()> {
    let task_id = resolve_task_identifier(&id, db)?;
    db.soft_delete(task_id, Utc::now().timestamp())?;
    db.save(ctx.db_path)?;
    println!("Deleted task {task_id}");
    Ok(())
}

/// Toggle the done mark of a task for a month or a whole year.
pub fn cmd_done(
    db: &mut Database,
    ctx: &Context,
    id: String,
    year: Option<i32>,
    month: Option<u32>,
    whole_year: bool,
) -> Result<()> {
    let task_id = resolve_task_identifier(&id, db)?;
    let year = year.unwrap_or(ctx.today.year());
    let period = if whole_year { None } else { Some(month.unwrap_or(ctx.today.month())) };

    let done = db.toggle_done(task_id, year, period, Utc::now().timestamp())?;
    db.save(ctx.db_path)?;

    let name = db.get(task_id).map(|t| t.name().to_string()).unwrap_or_default();
    let when = match period {
        Some(m) => format!("{} {}", month_label(m, ctx.locale), year),
        None => year.to_string(),
    };
    if done {
        println!("Marked '{name}' done for {when}");
    } else {
        println!("Cleared done mark of '{name}' for {when}");
    }
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "yw", &mut io::stdout());
}

/// Today's date in local time.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
