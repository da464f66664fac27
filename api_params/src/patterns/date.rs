use super::{chronological, match_pair, match_single, CalendarFields, Granularity};
use crate::range::{OrderedRange, RangeOrdering, RangeValue};
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// A date parameter value. Month-day and month values recur every year
/// and are kept apart from full dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateValue {
    Date(NaiveDate),
    /// `MMDD`, e.g. 1225
    MonthDay(u32),
    Month(u32),
}

impl RangeOrdering for DateValue {
    fn range_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (DateValue::Date(a), DateValue::Date(b)) => Some(a.cmp(b)),
            (DateValue::MonthDay(a), DateValue::MonthDay(b)) => Some(a.cmp(b)),
            (DateValue::Month(a), DateValue::Month(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            DateValue::MonthDay(md) => write!(f, "{:02}-{:02}", md / 100, md % 100),
            DateValue::Month(m) => write!(f, "{}", m),
        }
    }
}

const DATE_CASCADE: [Granularity; 5] = [
    Granularity::Day,
    Granularity::YearMonth,
    Granularity::Year,
    Granularity::MonthDay,
    Granularity::Month,
];

/// A single full date: `20120626`, `2012-06-26`, `2012/6/26`
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    match_single(Granularity::Day, raw.trim())?.first_date()
}

/// A date or date range at any granularity. Two-ended forms are tried
/// before single forms, finest granularity first, so "2-5" is a month
/// range and not a month-day.
pub fn parse_date_range(raw: &str) -> Option<RangeValue<DateValue>> {
    let raw = raw.trim();
    DATE_CASCADE
        .iter()
        .find_map(|g| match_pair(*g, raw).map(|(from, to)| pair_value(from, to)))
        .or_else(|| {
            DATE_CASCADE
                .iter()
                .find_map(|g| match_single(*g, raw).map(single_value))
        })
        .flatten()
}

fn single_value(fields: CalendarFields) -> Option<RangeValue<DateValue>> {
    match fields.granularity {
        Granularity::MonthDay => {
            let md = DateValue::MonthDay(fields.month_day());
            Some(RangeValue::Range(OrderedRange::leave_order(md, md)))
        }
        Granularity::Month => {
            let m = DateValue::Month(fields.month);
            Some(RangeValue::Range(OrderedRange::leave_order(m, m)))
        }
        Granularity::Day => Some(RangeValue::Scalar(DateValue::Date(fields.first_date()?))),
        _ => Some(RangeValue::Range(OrderedRange::new(
            DateValue::Date(fields.first_date()?),
            DateValue::Date(fields.last_date()?),
        ))),
    }
}

fn pair_value(from: CalendarFields, to: CalendarFields) -> Option<RangeValue<DateValue>> {
    let range = match from.granularity {
        Granularity::MonthDay => OrderedRange::leave_order(
            DateValue::MonthDay(from.month_day()),
            DateValue::MonthDay(to.month_day()),
        ),
        Granularity::Month => {
            OrderedRange::leave_order(DateValue::Month(from.month), DateValue::Month(to.month))
        }
        _ => {
            let (from, to) = chronological(from, to);
            OrderedRange::new(
                DateValue::Date(from.first_date()?),
                DateValue::Date(to.last_date()?),
            )
        }
    };
    Some(RangeValue::Range(range))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> DateValue {
        DateValue::Date(NaiveDate::from_ymd_opt(y, m, day).unwrap())
    }

    fn range(from: DateValue, to: DateValue) -> Option<RangeValue<DateValue>> {
        Some(RangeValue::Range(OrderedRange::leave_order(from, to)))
    }

    #[test]
    fn test_scalar_dates() {
        let expected = NaiveDate::from_ymd_opt(2012, 6, 26);
        assert_eq!(parse_date("20120626"), expected);
        assert_eq!(parse_date("2012-06-26"), expected);
        assert_eq!(parse_date("2012/06/26"), expected);
        assert_eq!(parse_date("2012-6-7"), NaiveDate::from_ymd_opt(2012, 6, 7));
    }

    #[test]
    fn test_scalar_date_rejections() {
        for bad in ["", "2012-06/7", "2012 6/7", "6/26/2012", "today", "2012-02-30", "2012-06"] {
            assert_eq!(parse_date(bad), None, "{bad}");
        }
    }

    #[test]
    fn test_exact_day_is_scalar() {
        assert_eq!(
            parse_date_range("2020-02-15"),
            Some(RangeValue::Scalar(d(2020, 2, 15)))
        );
    }

    #[test]
    fn test_month_spans() {
        for raw in ["201206", "2012-6", "2012/06"] {
            assert_eq!(parse_date_range(raw), range(d(2012, 6, 1), d(2012, 6, 30)), "{raw}");
        }
        assert_eq!(parse_date_range("2012"), range(d(2012, 1, 1), d(2012, 12, 31)));
    }

    #[test]
    fn test_recurring_singles() {
        assert_eq!(
            parse_date_range("6"),
            range(DateValue::Month(6), DateValue::Month(6))
        );
        assert_eq!(
            parse_date_range("6/13"),
            range(DateValue::MonthDay(613), DateValue::MonthDay(613))
        );
        assert_eq!(
            parse_date_range("1225"),
            range(DateValue::MonthDay(1225), DateValue::MonthDay(1225))
        );
    }

    #[test]
    fn test_day_ranges() {
        for raw in [
            "20110513-20120615",
            "2011-05-13-2012-06-15",
            "2011-5-13-2012-6-15",
            "2011/05/13 - 2012/06/15",
        ] {
            assert_eq!(parse_date_range(raw), range(d(2011, 5, 13), d(2012, 6, 15)), "{raw}");
        }
    }

    #[test]
    fn test_month_and_year_ranges() {
        for raw in ["201105-201206", "2011-5-2012-6", "2011/05 - 2012/06"] {
            assert_eq!(parse_date_range(raw), range(d(2011, 5, 1), d(2012, 6, 30)), "{raw}");
        }
        assert_eq!(parse_date_range("2011-2012"), range(d(2011, 1, 1), d(2012, 12, 31)));
        assert_eq!(parse_date_range("2012-2011"), range(d(2011, 1, 1), d(2012, 12, 31)));
    }

    #[test]
    fn test_recurring_ranges_keep_written_order() {
        assert_eq!(
            parse_date_range("2-5"),
            range(DateValue::Month(2), DateValue::Month(5))
        );
        assert_eq!(
            parse_date_range("10-3"),
            range(DateValue::Month(10), DateValue::Month(3))
        );
        assert_eq!(
            parse_date_range("0612-0623"),
            range(DateValue::MonthDay(612), DateValue::MonthDay(623))
        );
        assert_eq!(
            parse_date_range("12-25-1-1"),
            range(DateValue::MonthDay(1225), DateValue::MonthDay(101))
        );
    }

    #[test]
    fn test_range_rejections() {
        for bad in ["", "today", "13", "2012-13", "2012-02-31", "2012-06-31-2012-07-01"] {
            assert_eq!(parse_date_range(bad), None, "{bad}");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(d(2012, 6, 7).to_string(), "2012-06-07");
        assert_eq!(DateValue::MonthDay(613).to_string(), "06-13");
        assert_eq!(DateValue::Month(6).to_string(), "6");
    }
}
