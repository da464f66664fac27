//! Calendar pattern cascade
//!
//! Date and time parameters accept many surface syntaxes at several
//! granularities. Each granularity has a handful of syntaxes, and each
//! syntax a single form (`2012-06`) and a two-ended form
//! (`2011-05 - 2012-06`). The date and time modules walk these in a fixed
//! order and take the first match.

pub mod date;
pub mod time;

use crate::config::constants::calendar;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

pub use date::{parse_date, parse_date_range, DateValue};
pub use time::{parse_time, parse_time_range};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Second,
    Minute,
    Hour,
    Day,
    YearMonth,
    Year,
    MonthDay,
    Month,
}

impl Granularity {
    /// Regex bodies for this granularity, one capture group per component
    fn syntaxes(&self) -> &'static [&'static str] {
        match self {
            Granularity::Second => &[
                r"(\d{4})(\d{2})(\d{2})(\d{2})(\d{2})(\d{2})",
                r"(\d{4})-(\d\d?)-(\d\d?)\s+(\d\d?):(\d\d?):(\d\d?)",
                r"(\d{4})/(\d\d?)/(\d\d?)\s+(\d\d?):(\d\d?):(\d\d?)",
            ],
            Granularity::Minute => &[
                r"(\d{4})(\d{2})(\d{2})(\d{2})(\d{2})",
                r"(\d{4})-(\d\d?)-(\d\d?)\s+(\d\d?):(\d\d?)",
                r"(\d{4})/(\d\d?)/(\d\d?)\s+(\d\d?):(\d\d?)",
            ],
            Granularity::Hour => &[
                r"(\d{4})(\d{2})(\d{2})(\d{2})",
                r"(\d{4})-(\d\d?)-(\d\d?)\s+(\d\d?)",
                r"(\d{4})/(\d\d?)/(\d\d?)\s+(\d\d?)",
            ],
            Granularity::Day => &[
                r"(\d{4})(\d{2})(\d{2})",
                r"(\d{4})-(\d\d?)-(\d\d?)",
                r"(\d{4})/(\d\d?)/(\d\d?)",
            ],
            Granularity::YearMonth => &[
                r"(\d{4})(\d{2})",
                r"(\d{4})-(\d\d?)",
                r"(\d{4})/(\d\d?)",
            ],
            Granularity::Year => &[r"(\d{4})"],
            Granularity::MonthDay => &[r"(\d{2})(\d{2})", r"(\d\d?)-(\d\d?)", r"(\d\d?)/(\d\d?)"],
            Granularity::Month => &[r"(\d\d?)"],
        }
    }

    fn arity(&self) -> usize {
        match self {
            Granularity::Second => 6,
            Granularity::Minute => 5,
            Granularity::Hour => 4,
            Granularity::Day => 3,
            Granularity::YearMonth | Granularity::MonthDay => 2,
            Granularity::Year | Granularity::Month => 1,
        }
    }

    const ALL: [Granularity; 8] = [
        Granularity::Second,
        Granularity::Minute,
        Granularity::Hour,
        Granularity::Day,
        Granularity::YearMonth,
        Granularity::Year,
        Granularity::MonthDay,
        Granularity::Month,
    ];
}

struct Syntax {
    granularity: Granularity,
    single: Regex,
    pair: Regex,
}

fn compile(source: &str) -> Regex {
    Regex::new(source).unwrap_or_else(|e| panic!("calendar pattern {source:?} is invalid: {e}"))
}

fn syntaxes() -> &'static [Syntax] {
    static SYNTAXES: OnceLock<Vec<Syntax>> = OnceLock::new();
    SYNTAXES.get_or_init(|| {
        Granularity::ALL
            .iter()
            .flat_map(|g| {
                g.syntaxes().iter().map(move |body| Syntax {
                    granularity: *g,
                    single: compile(&format!(r"^{body}$")),
                    pair: compile(&format!(r"^{body}\s*-\s*{body}$")),
                })
            })
            .collect()
    })
}

/// Calendar fields read from one end of a matched pattern. Fields finer
/// than the granularity are left at their lowest value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFields {
    pub granularity: Granularity,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl CalendarFields {
    fn from_components(granularity: Granularity, parts: &[u32]) -> Option<Self> {
        let mut fields = CalendarFields {
            granularity,
            year: 0,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        };
        match granularity {
            Granularity::MonthDay => {
                fields.month = parts[0];
                fields.day = parts[1];
            }
            Granularity::Month => fields.month = parts[0],
            _ => {
                fields.year = i32::try_from(parts[0]).ok()?;
                let targets = [
                    &mut fields.month,
                    &mut fields.day,
                    &mut fields.hour,
                    &mut fields.minute,
                    &mut fields.second,
                ];
                for (target, value) in targets.into_iter().zip(&parts[1..]) {
                    *target = *value;
                }
            }
        }
        fields.is_valid().then_some(fields)
    }

    fn is_valid(&self) -> bool {
        if self.granularity == Granularity::Year && self.year <= calendar::MIN_YEAR_ONLY {
            return false;
        }
        (1..=calendar::MAX_MONTH).contains(&self.month)
            && (1..=calendar::MAX_DAY).contains(&self.day)
            && self.hour <= calendar::MAX_HOUR
            && self.minute <= calendar::MAX_MINUTE
            && self.second <= calendar::MAX_SECOND
    }

    /// `MMDD` as a number, e.g. 1225 for December 25th
    pub fn month_day(&self) -> u32 {
        self.month * 100 + self.day
    }

    /// Earliest calendar day the fields cover
    pub fn first_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// Latest calendar day the fields cover
    pub fn last_date(&self) -> Option<NaiveDate> {
        match self.granularity {
            Granularity::Year => NaiveDate::from_ymd_opt(self.year, 12, 31),
            Granularity::YearMonth => last_day_of_month(self.year, self.month),
            _ => self.first_date(),
        }
    }

    pub fn first_instant(&self) -> Option<DateTime<Utc>> {
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, self.second)?;
        Some(Utc.from_utc_datetime(&NaiveDateTime::new(self.first_date()?, time)))
    }

    pub fn last_instant(&self) -> Option<DateTime<Utc>> {
        let (hour, minute, second) = match self.granularity {
            Granularity::Second => (self.hour, self.minute, self.second),
            Granularity::Minute => (self.hour, self.minute, 59),
            Granularity::Hour => (self.hour, 59, 59),
            _ => (23, 59, 59),
        };
        let time = NaiveTime::from_hms_opt(hour, minute, second)?;
        Some(Utc.from_utc_datetime(&NaiveDateTime::new(self.last_date()?, time)))
    }

    /// Sort key for putting two ends of a calendar range in order
    fn sort_key(&self) -> (i32, u32, u32, u32, u32, u32) {
        (
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        )
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

fn components(caps: &regex::Captures<'_>, offset: usize, arity: usize) -> Option<Vec<u32>> {
    (1..=arity)
        .map(|i| caps.get(offset + i)?.as_str().parse().ok())
        .collect()
}

/// First syntax of `granularity` whose single form matches all of `raw`
pub fn match_single(granularity: Granularity, raw: &str) -> Option<CalendarFields> {
    let arity = granularity.arity();
    syntaxes()
        .iter()
        .filter(|s| s.granularity == granularity)
        .find_map(|s| {
            let caps = s.single.captures(raw)?;
            CalendarFields::from_components(granularity, &components(&caps, 0, arity)?)
        })
}

/// First syntax of `granularity` whose two-ended form matches all of
/// `raw`. Both ends must use the same syntax.
pub fn match_pair(granularity: Granularity, raw: &str) -> Option<(CalendarFields, CalendarFields)> {
    let arity = granularity.arity();
    syntaxes()
        .iter()
        .filter(|s| s.granularity == granularity)
        .find_map(|s| {
            let caps = s.pair.captures(raw)?;
            let from = CalendarFields::from_components(granularity, &components(&caps, 0, arity)?)?;
            let to = CalendarFields::from_components(granularity, &components(&caps, arity, arity)?)?;
            Some((from, to))
        })
}

/// Puts two ends in calendar order, for granularities that carry a year
fn chronological(
    from: CalendarFields,
    to: CalendarFields,
) -> (CalendarFields, CalendarFields) {
    if from.sort_key() > to.sort_key() {
        (to, from)
    } else {
        (from, to)
    }
}
