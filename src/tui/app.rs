//! Month calendar interface.
//!
//! This module implements the interactive calendar: a Monday-first month grid with
//! per-day task counts, the task list of the selected day, and completion toggling
//! for the shown month.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::warn;

use crate::calendar::{next_month, prev_month, MonthGrid};
use crate::db::Database;
use crate::describe::{derive_season, describe, month_label, season_label, weekday_headers};
use crate::error::Result;
use crate::fields::Locale;
use crate::recurrence::days_in_month;
use crate::task::Task;
use crate::tui::colors::{season_color, text_on};

/// Main calendar application state
pub struct CalendarApp {
    db: Database,
    db_path: PathBuf,
    locale: Locale,
    show_done: bool,
    today: NaiveDate,
    year: i32,
    month: u32,
    selected_day: u32,
    task_list_state: ListState,
    status_message: String,
}

impl CalendarApp {
    /// Open the calendar on today's month.
    pub fn new(db_path: &Path, locale: Locale, show_done: bool) -> Result<Self> {
        let db = Database::load(db_path)?;
        let today = Local::now().date_naive();
        let mut app = CalendarApp {
            db,
            db_path: db_path.to_path_buf(),
            locale,
            show_done,
            today,
            year: today.year(),
            month: today.month(),
            selected_day: today.day(),
            task_list_state: ListState::default(),
            status_message: String::new(),
        };
        app.reset_task_selection();
        Ok(app)
    }

    fn is_done(&self, task: &Task) -> bool {
        self.db.is_done_in_month(task.id, self.year, self.month)
    }

    /// Tasks falling on the selected day, names in order.
    fn day_tasks(&self) -> Vec<&Task> {
        self.db
            .month_list(self.year, self.month)
            .into_iter()
            .filter(|(day, task)| *day == self.selected_day && (self.show_done || !self.is_done(task)))
            .map(|(_, task)| task)
            .collect()
    }

    fn reset_task_selection(&mut self) {
        let any = !self.day_tasks().is_empty();
        self.task_list_state.select(if any { Some(0) } else { None });
    }

    fn selected_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.selected_day)
    }

    fn select_date(&mut self, date: NaiveDate) {
        self.year = date.year();
        self.month = date.month();
        self.selected_day = date.day();
        self.reset_task_selection();
    }

    /// Move the selected day, crossing into neighbouring months as needed.
    fn move_days(&mut self, delta: i64) {
        if let Some(date) = self
            .selected_date()
            .and_then(|d| d.checked_add_signed(chrono::Duration::days(delta)))
        {
            self.select_date(date);
        }
    }

    fn shift_month(&mut self, forward: bool) {
        let (year, month) = if forward {
            next_month(self.year, self.month)
        } else {
            prev_month(self.year, self.month)
        };
        let last = days_in_month(year, month).unwrap_or(28);
        self.year = year;
        self.month = month;
        self.selected_day = self.selected_day.min(last);
        self.reset_task_selection();
    }

    fn move_task_selection(&mut self, down: bool) {
        let count = self.day_tasks().len();
        if count == 0 {
            return;
        }
        let current = self.task_list_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1).min(count - 1)
        } else {
            current.saturating_sub(1)
        };
        self.task_list_state.select(Some(next));
    }

    /// Toggle the done mark of the selected task for the shown month.
    ///
    /// A task done only through a whole-year mark has that mark cleared instead.
    fn toggle_selected_done(&mut self) {
        let Some(index) = self.task_list_state.selected() else {
            self.status_message = "No task on this day".to_string();
            return;
        };
        let Some((id, name)) = self.day_tasks().get(index).map(|t| (t.id, t.name().to_string())) else {
            return;
        };

        let whole_year = !self.db.is_done(id, self.year, Some(self.month)) && self.db.is_done(id, self.year, None);
        let period = if whole_year { None } else { Some(self.month) };
        let toggled = self
            .db
            .toggle_done(id, self.year, period, Utc::now().timestamp())
            .and_then(|done| self.db.save(&self.db_path).map(|_| done));
        match toggled {
            Ok(true) => self.status_message = format!("'{}' marked as done", name),
            Ok(false) if whole_year => {
                self.status_message = format!("'{}' no longer done for {}", name, self.year)
            }
            Ok(false) => self.status_message = format!("'{}' marked as not done", name),
            Err(e) => {
                warn!(error = %e, "could not save done mark");
                self.status_message = format!("Error saving: {}", e);
            }
        }
        // The task may have dropped out of the list when done tasks are hidden.
        let count = self.day_tasks().len();
        if count == 0 {
            self.task_list_state.select(None);
        } else if index >= count {
            self.task_list_state.select(Some(count - 1));
        }
    }

    /// Handle keyboard input; returns true when the user asked to quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(false);
                }
                self.status_message.clear();

                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                    KeyCode::Left => self.move_days(-1),
                    KeyCode::Right => self.move_days(1),
                    KeyCode::Up => self.move_days(-7),
                    KeyCode::Down => self.move_days(7),
                    KeyCode::Char('n') | KeyCode::PageDown => self.shift_month(true),
                    KeyCode::Char('p') | KeyCode::PageUp => self.shift_month(false),
                    KeyCode::Char('t') => {
                        let today = self.today;
                        self.select_date(today);
                    }
                    KeyCode::Char('j') => self.move_task_selection(true),
                    KeyCode::Char('k') => self.move_task_selection(false),
                    KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected_done(),
                    _ => {}
                }
            }
        }
        Ok(false)
    }

    fn theme(&self) -> Color {
        season_color(derive_season(self.month))
    }

    /// Render the whole screen
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Grid and day panel
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        self.render_header(f, chunks[0]);
        self.render_grid(f, body[0]);
        self.render_day_panel(f, body[1]);
        self.render_status_bar(f, chunks[2]);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let season = season_label(derive_season(self.month), self.locale);
        let header_text = vec![Line::from(vec![
            Span::styled(
                format!("{} {}", month_label(self.month, self.locale).to_uppercase(), self.year),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                season.to_string(),
                Style::default().fg(self.theme()).add_modifier(Modifier::ITALIC),
            ),
        ])];

        let header = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_grid(&self, f: &mut Frame, area: Rect) {
        let Some(grid) = MonthGrid::new(self.year, self.month) else {
            return;
        };
        let agenda = self.db.month_agenda(self.year, self.month);

        let mut rows = vec![Constraint::Length(1)];
        rows.extend(grid.weeks.iter().map(|_| Constraint::Ratio(1, grid.weeks.len() as u32)));
        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(rows)
            .split(area);

        let columns = [Constraint::Ratio(1, 7); 7];
        let header_cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(columns)
            .split(row_areas[0]);
        for (i, label) in weekday_headers(self.locale).iter().enumerate() {
            let style = if i >= 5 {
                Style::default().fg(Color::Red)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            f.render_widget(
                Paragraph::new(*label).style(style).alignment(Alignment::Center),
                header_cells[i],
            );
        }

        for (row, week) in grid.weeks.iter().enumerate() {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(columns)
                .split(row_areas[row + 1]);
            for (col, day) in week.iter().enumerate() {
                let Some(day) = *day else {
                    continue;
                };
                let tasks = agenda.get(&day).map(Vec::as_slice).unwrap_or(&[]);
                let done = tasks.iter().filter(|t| self.is_done(t)).count();
                let is_selected = day == self.selected_day;
                let is_today = NaiveDate::from_ymd_opt(self.year, self.month, day) == Some(self.today);

                let border_style = if is_selected {
                    Style::default().fg(self.theme()).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                let day_style = if is_today {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };

                let mut lines = vec![Line::from(Span::styled(day.to_string(), day_style))];
                if !tasks.is_empty() {
                    let marker = if done == tasks.len() { "✓" } else { "●" };
                    lines.push(Line::from(format!("{} {}/{}", marker, done, tasks.len())));
                }

                let cell = Paragraph::new(lines)
                    .block(Block::default().borders(Borders::ALL).border_style(border_style));
                f.render_widget(cell, cells[col]);
            }
        }
    }

    fn render_day_panel(&mut self, f: &mut Frame, area: Rect) {
        let title = match self.selected_date() {
            Some(date) => format!("{}", date.format("%Y-%m-%d %A")),
            None => "-".to_string(),
        };

        let items: Vec<ListItem> = self
            .day_tasks()
            .iter()
            .map(|task| {
                let check = if self.is_done(task) { "[x]" } else { "[ ]" };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::raw(format!("{} ", check)),
                        Span::styled(task.name().to_string(), Style::default().add_modifier(Modifier::BOLD)),
                        Span::styled(format!("  #{}", task.id), Style::default().fg(Color::DarkGray)),
                    ]),
                    Line::from(Span::styled(
                        format!("    {}", describe(&task.rule, self.locale)),
                        Style::default().fg(Color::Gray),
                    )),
                ])
            })
            .collect();

        if items.is_empty() {
            let empty = Paragraph::new("No tasks on this day")
                .block(Block::default().borders(Borders::ALL).title(title))
                .wrap(Wrap { trim: true });
            f.render_widget(empty, area);
            return;
        }

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol("► ");
        f.render_stateful_widget(list, area, &mut self.task_list_state);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            let count: usize = self.db.month_agenda(self.year, self.month).values().map(Vec::len).sum();
            format!(
                "Tasks this month: {} | ←↑↓→: Day | n/p: Month | t: Today | j/k: Task | Space: Done | q: Quit",
                count
            )
        };

        let theme = self.theme();
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(theme).fg(text_on(theme)))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main event loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Recurrence;
    use crate::rule::{validate, RuleDraft};

    fn app_with_monthly_task() -> (tempfile::TempDir, CalendarApp) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let mut db = Database::default();
        let draft = RuleDraft {
            name: "Water plants".into(),
            day: Some(1),
            recurrence: Recurrence::Monthly,
            ..RuleDraft::default()
        };
        db.add_task(validate(&draft).unwrap(), 0);
        db.save(&path).unwrap();
        let mut app = CalendarApp::new(&path, Locale::En, true).unwrap();
        app.select_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        (dir, app)
    }

    #[test]
    fn test_day_navigation_crosses_months() {
        let (_dir, mut app) = app_with_monthly_task();
        app.move_days(-1);
        assert_eq!((app.year, app.month, app.selected_day), (2024, 2, 29));
        app.move_days(7);
        assert_eq!((app.year, app.month, app.selected_day), (2024, 3, 7));
    }

    #[test]
    fn test_month_shift_clamps_day() {
        let (_dir, mut app) = app_with_monthly_task();
        app.select_date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        app.shift_month(true);
        assert_eq!((app.year, app.month, app.selected_day), (2024, 2, 29));
        app.shift_month(false);
        app.shift_month(false);
        assert_eq!((app.year, app.month), (2023, 12));
    }

    #[test]
    fn test_toggle_done_persists() {
        let (dir, mut app) = app_with_monthly_task();
        assert_eq!(app.day_tasks().len(), 1);
        assert_eq!(app.task_list_state.selected(), Some(0));
        app.toggle_selected_done();
        let reloaded = Database::load(&dir.path().join("tasks.json")).unwrap();
        assert!(reloaded.is_done(1, 2024, Some(3)));
    }

    #[test]
    fn test_toggle_clears_covering_whole_year_mark() {
        let (dir, mut app) = app_with_monthly_task();
        app.db.toggle_done(1, 2024, None, 0).unwrap();
        assert!(app.is_done(app.day_tasks()[0]));

        app.toggle_selected_done();
        assert_eq!(app.status_message, "'Water plants' no longer done for 2024");
        assert!(app.db.done_marks.is_empty());
        let reloaded = Database::load(&dir.path().join("tasks.json")).unwrap();
        assert!(!reloaded.is_done_in_month(1, 2024, 3));
    }

    #[test]
    fn test_hidden_done_tasks_leave_the_day_list() {
        let (_dir, mut app) = app_with_monthly_task();
        app.show_done = false;
        app.toggle_selected_done();
        assert!(app.day_tasks().is_empty());
        assert_eq!(app.task_list_state.selected(), None);
    }
}
