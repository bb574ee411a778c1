//! Human-readable schedule descriptions and static label tables.
//!
//! Month lists in descriptions come from `recurrence::occurrence_months`, the same
//! function the resolver uses, so a description never names a month the rule does
//! not occur in.

use chrono::Weekday;

use crate::fields::*;
use crate::recurrence::occurrence_months;
use crate::rule::{Schedule, ScheduleRule};

/// Season of a month by the meteorological Northern-hemisphere convention.
pub fn derive_season(month: u32) -> Season {
    match month {
        3..=5 => Season::Spring,
        6..=8 => Season::Summer,
        9..=11 => Season::Autumn,
        _ => Season::Winter,
    }
}

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];
const MONTHS_NB: [&str; 12] = [
    "januar", "februar", "mars", "april", "mai", "juni",
    "juli", "august", "september", "oktober", "november", "desember",
];
const WEEKDAYS_EN: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];
const WEEKDAYS_NB: [&str; 7] = ["mandag", "tirsdag", "onsdag", "torsdag", "fredag", "lørdag", "søndag"];

/// Full month name, or "?" outside 1-12.
pub fn month_label(month: u32, locale: Locale) -> &'static str {
    let table = match locale {
        Locale::En => &MONTHS_EN,
        Locale::Nb => &MONTHS_NB,
    };
    month
        .checked_sub(1)
        .and_then(|i| table.get(i as usize))
        .copied()
        .unwrap_or("?")
}

pub fn weekday_label(weekday: Weekday, locale: Locale) -> &'static str {
    let i = weekday_index(weekday) as usize;
    match locale {
        Locale::En => WEEKDAYS_EN[i],
        Locale::Nb => WEEKDAYS_NB[i],
    }
}

/// Two-letter weekday headers, Monday first.
pub fn weekday_headers(locale: Locale) -> [&'static str; 7] {
    match locale {
        Locale::En => ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"],
        Locale::Nb => ["Ma", "Ti", "On", "To", "Fr", "Lø", "Sø"],
    }
}

pub fn season_label(season: Season, locale: Locale) -> &'static str {
    match (locale, season) {
        (Locale::En, Season::Spring) => "spring",
        (Locale::En, Season::Summer) => "summer",
        (Locale::En, Season::Autumn) => "autumn",
        (Locale::En, Season::Winter) => "winter",
        (Locale::Nb, Season::Spring) => "vår",
        (Locale::Nb, Season::Summer) => "sommer",
        (Locale::Nb, Season::Autumn) => "høst",
        (Locale::Nb, Season::Winter) => "vinter",
    }
}

pub fn recurrence_label(recurrence: Recurrence, locale: Locale) -> &'static str {
    match (locale, recurrence) {
        (Locale::En, Recurrence::Yearly) => "Every year",
        (Locale::En, Recurrence::Semiannual) => "Twice a year",
        (Locale::En, Recurrence::Quarterly) => "Every quarter",
        (Locale::En, Recurrence::Monthly) => "Every month",
        (Locale::Nb, Recurrence::Yearly) => "Årlig",
        (Locale::Nb, Recurrence::Semiannual) => "Halvårlig",
        (Locale::Nb, Recurrence::Quarterly) => "Kvartalsvis",
        (Locale::Nb, Recurrence::Monthly) => "Månedlig",
    }
}

pub fn rank_label(rank: WeekRank, locale: Locale) -> &'static str {
    match (locale, rank) {
        (Locale::En, WeekRank::First) => "1st",
        (Locale::En, WeekRank::Second) => "2nd",
        (Locale::En, WeekRank::Third) => "3rd",
        (Locale::En, WeekRank::Fourth) => "4th",
        (Locale::En, WeekRank::Last) => "last",
        (Locale::Nb, WeekRank::First) => "første",
        (Locale::Nb, WeekRank::Second) => "andre",
        (Locale::Nb, WeekRank::Third) => "tredje",
        (Locale::Nb, WeekRank::Fourth) => "fjerde",
        (Locale::Nb, WeekRank::Last) => "siste",
    }
}

fn month_list(months: &[u32], locale: Locale) -> String {
    months
        .iter()
        .map(|&m| month_label(m, locale))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Describe when a rule fires, e.g. "Every quarter on day 10 (February, May,
/// August, November)" or "Every year on the last Friday of February".
pub fn describe(rule: &ScheduleRule, locale: Locale) -> String {
    let head = recurrence_label(rule.recurrence(), locale);
    let months = occurrence_months(rule);
    let single_month = match rule.recurrence() {
        Recurrence::Yearly => rule.month(),
        _ => None,
    };

    let when = match (rule.schedule(), locale) {
        (Schedule::ExactDate { day }, Locale::En) => match single_month {
            Some(m) => format!("on {} {}", day, month_label(m, locale)),
            None => format!("on day {day}"),
        },
        (Schedule::ExactDate { day }, Locale::Nb) => match single_month {
            Some(m) => format!("den {}. {}", day, month_label(m, locale)),
            None => format!("den {day}."),
        },
        (Schedule::OrdinalWeekday { weekday, rank }, Locale::En) => {
            let base = format!("on the {} {}", rank_label(rank, locale), weekday_label(weekday, locale));
            match single_month {
                Some(m) => format!("{base} of {}", month_label(m, locale)),
                None => base,
            }
        }
        (Schedule::OrdinalWeekday { weekday, rank }, Locale::Nb) => {
            let base = format!("{} {}", rank_label(rank, locale), weekday_label(weekday, locale));
            match single_month {
                Some(m) => format!("{base} i {}", month_label(m, locale)),
                None => base,
            }
        }
        (Schedule::SeasonOnly { season }, Locale::En) => match single_month {
            Some(m) => format!("in {} ({})", month_label(m, locale), season_label(season, locale)),
            None => format!("in {}", season_label(season, locale)),
        },
        (Schedule::SeasonOnly { season }, Locale::Nb) => match single_month {
            Some(m) => format!("i {} ({})", month_label(m, locale), season_label(season, locale)),
            None => format!("på {}en", season_label(season, locale)),
        },
    };

    match rule.recurrence() {
        Recurrence::Quarterly | Recurrence::Semiannual => {
            format!("{head} {when} ({})", month_list(&months, locale))
        }
        Recurrence::Yearly | Recurrence::Monthly => format!("{head} {when}"),
    }
}

/// Compact timing label for listings: "15.03 (spring)", "last Fri", "spring".
pub fn short_when(rule: &ScheduleRule, locale: Locale) -> String {
    let season = rule.season().map(|s| season_label(s, locale));
    match rule.schedule() {
        Schedule::ExactDate { day } => match (rule.month(), season) {
            (Some(m), Some(s)) => format!("{day:02}.{m:02} ({s})"),
            (Some(m), None) => format!("{day:02}.{m:02}"),
            (None, _) => format!("day {day:02}"),
        },
        Schedule::OrdinalWeekday { weekday, rank } => {
            let name = weekday_label(weekday, locale);
            let short: String = name.chars().take(3).collect();
            format!("{} {}", rank_label(rank, locale), short)
        }
        Schedule::SeasonOnly { season } => season_label(season, locale).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::occurs_in_month;
    use crate::rule::{validate, RuleDraft};

    fn rule(draft: RuleDraft) -> ScheduleRule {
        validate(&draft).unwrap()
    }

    fn named() -> RuleDraft {
        RuleDraft { name: "Task".into(), ..RuleDraft::default() }
    }

    #[test]
    fn test_derive_season_consistent_with_grouping() {
        for m in 1..=12 {
            assert!(derive_season(m).months().contains(&m), "month {m}");
        }
        assert_eq!(derive_season(3), Season::Spring);
        assert_eq!(derive_season(8), Season::Summer);
        assert_eq!(derive_season(11), Season::Autumn);
        assert_eq!(derive_season(12), Season::Winter);
        assert_eq!(derive_season(2), Season::Winter);
    }

    #[test]
    fn test_describe_yearly_exact() {
        let r = rule(RuleDraft { month: Some(3), day: Some(15), ..named() });
        assert_eq!(describe(&r, Locale::En), "Every year on 15 March");
        assert_eq!(describe(&r, Locale::Nb), "Årlig den 15. mars");
    }

    #[test]
    fn test_describe_ordinal() {
        let r = rule(RuleDraft {
            month: Some(2),
            weekday: Some(4),
            week_rank: Some(WeekRank::Last),
            ..named()
        });
        assert_eq!(describe(&r, Locale::En), "Every year on the last Friday of February");
        let monthly = rule(RuleDraft {
            weekday: Some(1),
            week_rank: Some(WeekRank::Second),
            recurrence: Recurrence::Monthly,
            ..named()
        });
        assert_eq!(describe(&monthly, Locale::En), "Every month on the 2nd Tuesday");
        assert_eq!(describe(&monthly, Locale::Nb), "Månedlig andre tirsdag");
    }

    #[test]
    fn test_describe_quarterly_lists_cycle() {
        let r = rule(RuleDraft {
            month: Some(11),
            day: Some(10),
            recurrence: Recurrence::Quarterly,
            ..named()
        });
        assert_eq!(
            describe(&r, Locale::En),
            "Every quarter on day 10 (November, February, May, August)"
        );
    }

    #[test]
    fn test_describe_season_only() {
        let r = rule(RuleDraft { season: Some(Season::Autumn), ..named() });
        assert_eq!(describe(&r, Locale::En), "Every year in autumn");
        assert_eq!(describe(&r, Locale::Nb), "Årlig på høsten");
    }

    #[test]
    fn test_described_months_match_resolver() {
        for recurrence in [Recurrence::Quarterly, Recurrence::Semiannual] {
            for anchor in 1..=12 {
                let r = rule(RuleDraft {
                    month: Some(anchor),
                    day: Some(1),
                    recurrence,
                    ..named()
                });
                let text = describe(&r, Locale::En);
                for m in 1..=12 {
                    let named_in_text = text.contains(month_label(m, Locale::En));
                    assert_eq!(
                        named_in_text,
                        occurs_in_month(&r, m),
                        "{recurrence} anchor {anchor} month {m}: {text}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_short_when() {
        let r = rule(RuleDraft { month: Some(3), day: Some(5), ..named() });
        assert_eq!(short_when(&r, Locale::En), "05.03 (spring)");
        let o = rule(RuleDraft {
            month: Some(1),
            weekday: Some(4),
            week_rank: Some(WeekRank::Last),
            ..named()
        });
        assert_eq!(short_when(&o, Locale::En), "last Fri");
    }

    #[test]
    fn test_month_label_bounds() {
        assert_eq!(month_label(1, Locale::En), "January");
        assert_eq!(month_label(12, Locale::Nb), "desember");
        assert_eq!(month_label(0, Locale::En), "?");
        assert_eq!(month_label(13, Locale::En), "?");
    }
}
