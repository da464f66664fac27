use super::{chronological, match_pair, match_single, CalendarFields, Granularity};
use crate::range::{OrderedRange, RangeValue};
use chrono::{DateTime, Utc};

const TIME_CASCADE: [Granularity; 6] = [
    Granularity::Second,
    Granularity::Minute,
    Granularity::Hour,
    Granularity::Day,
    Granularity::YearMonth,
    Granularity::Year,
];

/// A single instant, which must be given to the second:
/// `20120625103456`, `2012-06-25 10:34:56`, `2012/06/25 10:34:56`
pub fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    match_single(Granularity::Second, raw.trim())?.first_instant()
}

/// An instant or a span of time. Anything coarser than a second expands
/// to the whole span it names: a minute runs `:00` to `:59`, a day
/// `00:00:00` to `23:59:59`, a year January 1st to December 31st.
pub fn parse_time_range(raw: &str) -> Option<RangeValue<DateTime<Utc>>> {
    let raw = raw.trim();
    TIME_CASCADE
        .iter()
        .find_map(|g| match_pair(*g, raw).map(|(from, to)| pair_value(from, to)))
        .or_else(|| {
            TIME_CASCADE
                .iter()
                .find_map(|g| match_single(*g, raw).map(single_value))
        })
        .flatten()
}

fn single_value(fields: CalendarFields) -> Option<RangeValue<DateTime<Utc>>> {
    let first = fields.first_instant()?;
    if fields.granularity == Granularity::Second {
        return Some(RangeValue::Scalar(first));
    }
    Some(RangeValue::Range(OrderedRange::new(
        first,
        fields.last_instant()?,
    )))
}

fn pair_value(from: CalendarFields, to: CalendarFields) -> Option<RangeValue<DateTime<Utc>>> {
    let (from, to) = chronological(from, to);
    Some(RangeValue::Range(OrderedRange::new(
        from.first_instant()?,
        to.last_instant()?,
    )))
}
