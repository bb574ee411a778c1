//! Month grid layout for calendar views.

use chrono::{Datelike, NaiveDate};

use crate::recurrence::days_in_month;

/// One month laid out in Monday-first weeks; days outside the month are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<[Option<u32>; 7]>,
}

impl MonthGrid {
    /// Lay out (year, month). Returns `None` for a month outside 1-12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let days = days_in_month(year, month)?;
        let lead = first.weekday().num_days_from_monday() as usize;

        let mut weeks = Vec::new();
        let mut week = [None; 7];
        let mut col = lead;
        for day in 1..=days {
            week[col] = Some(day);
            col += 1;
            if col == 7 {
                weeks.push(week);
                week = [None; 7];
                col = 0;
            }
        }
        if col > 0 {
            weeks.push(week);
        }
        Some(MonthGrid { year, month, weeks })
    }

    /// Row and column of a day within the grid.
    pub fn position_of(&self, day: u32) -> Option<(usize, usize)> {
        self.weeks.iter().enumerate().find_map(|(row, week)| {
            week.iter().position(|d| *d == Some(day)).map(|col| (row, col))
        })
    }

    /// ISO week number of each grid row, taken from its first in-month day.
    pub fn iso_weeks(&self) -> Vec<u32> {
        self.weeks
            .iter()
            .filter_map(|week| {
                let day = week.iter().flatten().next()?;
                NaiveDate::from_ymd_opt(self.year, self.month, *day).map(|d| d.iso_week().week())
            })
            .collect()
    }

    pub fn days(&self) -> u32 {
        self.weeks.iter().flatten().flatten().count() as u32
    }
}

/// The month before (year, month), wrapping into the previous year.
pub fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// The month after (year, month), wrapping into the next year.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}
