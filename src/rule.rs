//! Schedule rules and their validation.
//!
//! A `RuleDraft` is the flat, per-field form a task arrives in from the CLI or the
//! task file. `validate` is the only way from a draft to a `ScheduleRule`, whose
//! `Schedule` variant makes "exactly one schedule kind" a structural property.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::describe::derive_season;
use crate::error::{Field, ValidationError};
use crate::fields::*;

/// Unvalidated rule fields, mutually exclusive by convention only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDraft {
    pub name: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub day: Option<u32>,
    #[serde(default)]
    pub weekday: Option<u32>,
    #[serde(default)]
    pub week_rank: Option<WeekRank>,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub season: Option<Season>,
}

/// When within a month (or season) a rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// A fixed day of the month.
    ExactDate { day: u32 },
    /// The Nth (or last) given weekday of the month.
    OrdinalWeekday { weekday: Weekday, rank: WeekRank },
    /// No particular day, only a season for coarse listing.
    SeasonOnly { season: Season },
}

/// A validated schedule rule.
///
/// Serializes in the flat draft form and deserializes through `validate`, so a
/// rule read back from disk satisfies the same invariants as a freshly entered one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RuleDraft", into = "RuleDraft")]
pub struct ScheduleRule {
    name: String,
    notes: String,
    recurrence: Recurrence,
    month: Option<u32>,
    schedule: Schedule,
    /// Season of a dated schedule, explicit or derived from `month`.
    dated_season: Option<Season>,
    /// Whether `dated_season` was given rather than derived.
    season_explicit: bool,
}

impl ScheduleRule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn recurrence(&self) -> Recurrence {
        self.recurrence
    }

    /// Anchor month, if the rule has one.
    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    /// Display season: the season of a season-only rule, otherwise the explicit
    /// or derived season of the dated rule.
    pub fn season(&self) -> Option<Season> {
        match self.schedule {
            Schedule::SeasonOnly { season } => Some(season),
            _ => self.dated_season,
        }
    }

    /// Exact day of month for exact-date rules.
    pub fn day(&self) -> Option<u32> {
        match self.schedule {
            Schedule::ExactDate { day } => Some(day),
            _ => None,
        }
    }

    /// Whether the season was given explicitly rather than derived from the month.
    pub fn season_is_explicit(&self) -> bool {
        match self.schedule {
            Schedule::SeasonOnly { .. } => true,
            _ => self.season_explicit,
        }
    }

    /// Flatten back into the per-field form, e.g. as the base for an edit.
    ///
    /// Only an explicit season is carried over; a derived one is derived again
    /// when the draft is validated, so it follows a changed month.
    pub fn to_draft(&self) -> RuleDraft {
        let mut draft = RuleDraft {
            name: self.name.clone(),
            notes: self.notes.clone(),
            month: self.month,
            recurrence: self.recurrence,
            season: if self.season_is_explicit() { self.season() } else { None },
            ..RuleDraft::default()
        };
        match self.schedule {
            Schedule::ExactDate { day } => draft.day = Some(day),
            Schedule::OrdinalWeekday { weekday, rank } => {
                draft.weekday = Some(weekday_index(weekday));
                draft.week_rank = Some(rank);
            }
            Schedule::SeasonOnly { .. } => {}
        }
        draft
    }
}

impl From<ScheduleRule> for RuleDraft {
    fn from(rule: ScheduleRule) -> Self {
        rule.to_draft()
    }
}

impl TryFrom<RuleDraft> for ScheduleRule {
    type Error = ValidationError;

    fn try_from(draft: RuleDraft) -> Result<Self, Self::Error> {
        validate(&draft)
    }
}

/// Fill in the season from the anchor month when none was given.
///
/// Returns a new draft; the input is left untouched.
pub fn with_derived_season(draft: &RuleDraft) -> RuleDraft {
    let mut out = draft.clone();
    if out.season.is_none() {
        out.season = out.month.map(derive_season);
    }
    out
}

fn check_range(field: Field, value: Option<u32>) -> Result<(), ValidationError> {
    let (min, max) = field.bounds();
    match value {
        Some(v) if v < min || v > max => Err(ValidationError::OutOfRange { field, value: v }),
        _ => Ok(()),
    }
}

/// Validate a draft into a schedule rule.
pub fn validate(draft: &RuleDraft) -> Result<ScheduleRule, ValidationError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    check_range(Field::Month, draft.month)?;
    check_range(Field::Day, draft.day)?;
    check_range(Field::Weekday, draft.weekday)?;

    let has_ordinal_part = draft.weekday.is_some() || draft.week_rank.is_some();
    if draft.day.is_some() && has_ordinal_part {
        return Err(ValidationError::MixedScheduleKinds);
    }

    if draft.month.is_none() && draft.recurrence.requires_anchor() {
        return Err(ValidationError::MissingAnchorMonth { recurrence: draft.recurrence });
    }

    // The kind is chosen from the fields as given; a derived season never
    // turns a bare month into a season-only rule.
    let schedule = match (draft.day, draft.weekday, draft.week_rank) {
        (Some(day), None, None) => Schedule::ExactDate { day },
        (None, Some(index), Some(rank)) => {
            let weekday = weekday_from_index(index)
                .ok_or(ValidationError::OutOfRange { field: Field::Weekday, value: index })?;
            Schedule::OrdinalWeekday { weekday, rank }
        }
        (None, None, None) => match draft.season {
            Some(season) => Schedule::SeasonOnly { season },
            None => return Err(ValidationError::IncompleteSchedule),
        },
        // Weekday without rank or rank without weekday.
        _ => return Err(ValidationError::IncompleteSchedule),
    };

    let dated = !matches!(schedule, Schedule::SeasonOnly { .. });
    if dated && draft.recurrence == Recurrence::Yearly && draft.month.is_none() {
        return Err(ValidationError::MissingAnchorMonth { recurrence: Recurrence::Yearly });
    }

    let derived = with_derived_season(draft);
    Ok(ScheduleRule {
        name: name.to_string(),
        notes: derived.notes.trim().to_string(),
        recurrence: derived.recurrence,
        month: derived.month,
        schedule,
        dated_season: if dated { derived.season } else { None },
        season_explicit: dated && draft.season.is_some(),
    })
}
