//! Occurrence resolution.
//!
//! Decides whether a rule fires in a given month and on which day. Everything here
//! is a pure function of the rule and the (year, month) asked about.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::fields::Recurrence;
use crate::rule::{Schedule, ScheduleRule};

/// Months of one cycle starting at `anchor`, in cycle order.
///
/// `((anchor - 1 + k) mod 12) + 1` for each offset `k` of the recurrence.
pub fn cycle_months(recurrence: Recurrence, anchor: u32) -> Vec<u32> {
    recurrence
        .cycle_offsets()
        .iter()
        .map(|k| ((anchor + 11 + k) % 12) + 1)
        .collect()
}

/// Every month of the year in which the rule occurs, in cycle order from the anchor.
///
/// Monthly rules occur in all months whether or not they carry an anchor; the other
/// recurrences occur nowhere without one.
pub fn occurrence_months(rule: &ScheduleRule) -> Vec<u32> {
    match (rule.recurrence(), rule.month()) {
        (Recurrence::Monthly, anchor) => cycle_months(Recurrence::Monthly, anchor.unwrap_or(1)),
        (recurrence, Some(anchor)) => cycle_months(recurrence, anchor),
        (_, None) => Vec::new(),
    }
}

/// Whether the rule occurs in `month` (1-12) of any year.
pub fn occurs_in_month(rule: &ScheduleRule, month: u32) -> bool {
    occurrence_months(rule).contains(&month)
}

/// Number of days in the Gregorian (year, month), `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some(first_of_next.signed_duration_since(first).num_days() as u32)
}

/// Days of (year, month) that fall on `weekday`, ascending.
pub fn weekday_dates(year: i32, month: u32, weekday: Weekday) -> Vec<u32> {
    let Some(days) = days_in_month(year, month) else {
        return Vec::new();
    };
    (1..=days)
        .filter(|&d| {
            NaiveDate::from_ymd_opt(year, month, d).map(|date| date.weekday()) == Some(weekday)
        })
        .collect()
}

/// Day of the month on which the rule fires in (year, month).
///
/// Exact dates that do not exist in the month are skipped rather than clamped,
/// an ordinal past the number of matching weekdays yields nothing, and
/// season-only rules never produce a day.
pub fn occurrence_day(rule: &ScheduleRule, year: i32, month: u32) -> Option<u32> {
    if !occurs_in_month(rule, month) {
        return None;
    }
    match rule.schedule() {
        Schedule::ExactDate { day } => {
            let last = days_in_month(year, month)?;
            (day <= last).then_some(day)
        }
        Schedule::OrdinalWeekday { weekday, rank } => {
            let dates = weekday_dates(year, month, weekday);
            match rank.index() {
                Some(i) => dates.get(i).copied(),
                None => dates.last().copied(),
            }
        }
        Schedule::SeasonOnly { .. } => None,
    }
}

/// The concrete date of the rule's occurrence in (year, month), if any.
pub fn occurrence_date(rule: &ScheduleRule, year: i32, month: u32) -> Option<NaiveDate> {
    let day = occurrence_day(rule, year, month)?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// The next `count` occurrence dates on or after `from`.
///
/// Looks at most ten years ahead, so rules whose date never exists (e.g. a yearly
/// 31 April) return fewer dates.
pub fn upcoming(rule: &ScheduleRule, from: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut out = Vec::with_capacity(count);
    let (mut year, mut month) = (from.year(), from.month());
    for _ in 0..120 {
        if out.len() >= count {
            break;
        }
        if let Some(date) = occurrence_date(rule, year, month) {
            if date >= from {
                out.push(date);
            }
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Season, WeekRank};
    use crate::rule::{validate, RuleDraft};

    fn rule(draft: RuleDraft) -> ScheduleRule {
        validate(&draft).unwrap()
    }

    fn named() -> RuleDraft {
        RuleDraft { name: "Task".into(), ..RuleDraft::default() }
    }

    #[test]
    fn test_monthly_occurs_every_month() {
        let r = rule(RuleDraft { day: Some(1), recurrence: Recurrence::Monthly, ..named() });
        for m in 1..=12 {
            assert!(occurs_in_month(&r, m), "month {m}");
        }
        let anchored = rule(RuleDraft {
            month: Some(7),
            day: Some(1),
            recurrence: Recurrence::Monthly,
            ..named()
        });
        assert!((1..=12).all(|m| occurs_in_month(&anchored, m)));
    }

    #[test]
    fn test_cycle_sizes_for_every_anchor() {
        for anchor in 1..=12 {
            let mut q = cycle_months(Recurrence::Quarterly, anchor);
            q.sort_unstable();
            q.dedup();
            assert_eq!(q.len(), 4, "quarterly anchor {anchor}");
            assert!(q.iter().all(|m| (1..=12).contains(m)));

            let mut s = cycle_months(Recurrence::Semiannual, anchor);
            s.sort_unstable();
            s.dedup();
            assert_eq!(s.len(), 2, "semiannual anchor {anchor}");
        }
    }

    #[test]
    fn test_quarterly_wraps_around_year_end() {
        assert_eq!(cycle_months(Recurrence::Quarterly, 11), vec![11, 2, 5, 8]);
        assert_eq!(cycle_months(Recurrence::Semiannual, 9), vec![9, 3]);
        assert_eq!(cycle_months(Recurrence::Yearly, 12), vec![12]);
    }

    #[test]
    fn test_yearly_matches_only_anchor() {
        let r = rule(RuleDraft { month: Some(6), day: Some(21), ..named() });
        assert!(occurs_in_month(&r, 6));
        assert!(!occurs_in_month(&r, 7));
        let season_only = rule(RuleDraft { season: Some(Season::Summer), ..named() });
        assert!((1..=12).all(|m| !occurs_in_month(&season_only, m)));
    }

    #[test]
    fn test_day_31_skips_short_months() {
        let r = rule(RuleDraft { day: Some(31), recurrence: Recurrence::Monthly, ..named() });
        for m in [4, 6, 9, 11] {
            assert_eq!(occurrence_day(&r, 2023, m), None, "month {m}");
        }
        for m in [1, 3, 5, 7, 8, 10, 12] {
            assert_eq!(occurrence_day(&r, 2023, m), Some(31), "month {m}");
        }
    }

    #[test]
    fn test_february_29_only_in_leap_years() {
        let r = rule(RuleDraft { month: Some(2), day: Some(29), ..named() });
        assert_eq!(occurrence_day(&r, 2024, 2), Some(29));
        assert_eq!(occurrence_day(&r, 2023, 2), None);
        assert_eq!(occurrence_day(&r, 1900, 2), None);
        assert_eq!(occurrence_day(&r, 2000, 2), Some(29));
    }

    #[test]
    fn test_last_friday_of_february_2021() {
        let r = rule(RuleDraft {
            month: Some(2),
            weekday: Some(4),
            week_rank: Some(WeekRank::Last),
            ..named()
        });
        assert_eq!(occurrence_day(&r, 2021, 2), Some(26));
    }

    #[test]
    fn test_second_tuesday_when_month_starts_on_tuesday() {
        // 1 June 2021 is a Tuesday.
        let r = rule(RuleDraft {
            month: Some(6),
            weekday: Some(1),
            week_rank: Some(WeekRank::Second),
            ..named()
        });
        assert_eq!(occurrence_day(&r, 2021, 6), Some(8));
    }

    #[test]
    fn test_fourth_and_missing_fifth_weekday() {
        // February 2021 has exactly four Mondays: 1, 8, 15, 22.
        assert_eq!(weekday_dates(2021, 2, Weekday::Mon), vec![1, 8, 15, 22]);
        let r = rule(RuleDraft {
            weekday: Some(0),
            week_rank: Some(WeekRank::Fourth),
            recurrence: Recurrence::Monthly,
            ..named()
        });
        assert_eq!(occurrence_day(&r, 2021, 2), Some(22));
    }

    #[test]
    fn test_season_only_never_has_a_day() {
        let r = rule(RuleDraft {
            month: Some(1),
            season: Some(Season::Winter),
            recurrence: Recurrence::Quarterly,
            ..named()
        });
        assert!(occurs_in_month(&r, 4));
        assert_eq!(occurrence_day(&r, 2024, 4), None);
    }

    #[test]
    fn test_quarterly_exact_date_resolution() {
        let r = rule(RuleDraft {
            month: Some(2),
            day: Some(10),
            recurrence: Recurrence::Quarterly,
            ..named()
        });
        let fired: Vec<u32> = (1..=12).filter(|&m| occurrence_day(&r, 2024, m).is_some()).collect();
        assert_eq!(fired, vec![2, 5, 8, 11]);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 12), Some(31));
        assert_eq!(days_in_month(2023, 4), Some(30));
        assert_eq!(days_in_month(2023, 13), None);
    }

    #[test]
    fn test_upcoming_crosses_year_end() {
        let r = rule(RuleDraft {
            month: Some(1),
            day: Some(15),
            recurrence: Recurrence::Semiannual,
            ..named()
        });
        let from = NaiveDate::from_ymd_opt(2024, 7, 20).unwrap();
        let next = upcoming(&r, from, 3);
        assert_eq!(
            next,
            vec![
                NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                NaiveDate::from_ymd_opt(2025, 7, 15).unwrap(),
                NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            ]
        );
    }
}
