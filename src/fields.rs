//! Enumerations and field types for schedule rules.
//!
//! This module defines the structured values a rule is built from: how the anchor
//! month repeats across the year, which occurrence of a weekday is meant, the
//! meteorological season and the label locale.

use std::fmt;

use chrono::Weekday;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How the anchor month repeats across the year.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Recurrence {
    #[default]
    Yearly,
    Semiannual,
    Quarterly,
    Monthly,
}

impl Recurrence {
    /// Month offsets from the anchor that belong to one cycle.
    pub fn cycle_offsets(self) -> &'static [u32] {
        match self {
            Recurrence::Yearly => &[0],
            Recurrence::Semiannual => &[0, 6],
            Recurrence::Quarterly => &[0, 3, 6, 9],
            Recurrence::Monthly => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        }
    }

    /// Whether rules with this recurrence need an anchor month whatever their kind.
    pub fn requires_anchor(self) -> bool {
        matches!(self, Recurrence::Quarterly | Recurrence::Semiannual)
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            Recurrence::Yearly => "yearly",
            Recurrence::Semiannual => "semiannual",
            Recurrence::Quarterly => "quarterly",
            Recurrence::Monthly => "monthly",
        };
        f.write_str(key)
    }
}

/// Ordinal occurrence of a weekday within a month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
pub enum WeekRank {
    #[serde(rename = "1")]
    #[value(name = "1st", alias = "1")]
    First,
    #[serde(rename = "2")]
    #[value(name = "2nd", alias = "2")]
    Second,
    #[serde(rename = "3")]
    #[value(name = "3rd", alias = "3")]
    Third,
    #[serde(rename = "4")]
    #[value(name = "4th", alias = "4")]
    Fourth,
    #[serde(rename = "last")]
    #[value(name = "last")]
    Last,
}

impl WeekRank {
    /// Zero-based index into the month's matching weekdays, `None` for `Last`.
    pub fn index(self) -> Option<usize> {
        match self {
            WeekRank::First => Some(0),
            WeekRank::Second => Some(1),
            WeekRank::Third => Some(2),
            WeekRank::Fourth => Some(3),
            WeekRank::Last => None,
        }
    }
}

/// Meteorological seasons (Northern hemisphere).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Season {
    Spring,
    Summer,
    #[value(alias = "fall")]
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    /// The three months grouped into this season.
    pub fn months(self) -> [u32; 3] {
        match self {
            Season::Spring => [3, 4, 5],
            Season::Summer => [6, 7, 8],
            Season::Autumn => [9, 10, 11],
            Season::Winter => [12, 1, 2],
        }
    }
}

/// Label tables available for descriptions and listings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    #[default]
    En,
    Nb,
}

/// Weekdays indexed Monday = 0 through Sunday = 6.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Map a Monday-based index onto a weekday.
pub fn weekday_from_index(index: u32) -> Option<Weekday> {
    WEEKDAYS.get(index as usize).copied()
}

/// Monday-based index of a weekday.
pub fn weekday_index(weekday: Weekday) -> u32 {
    weekday.num_days_from_monday()
}
