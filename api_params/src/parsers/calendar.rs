use super::ScalarParser;
use crate::context::ParseEnv;
use crate::error::{ErrorKind, ParseResult};
use crate::patterns::{self, DateValue};
use crate::range::RangeValue;
use chrono::{DateTime, Utc};

/// Calendar dates. A single value must be a full date; ranges accept every
/// granularity of the date cascade.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateParser;

impl ScalarParser for DateParser {
    type Output = DateValue;

    fn type_name(&self) -> &'static str {
        "date"
    }

    fn parse_str(&self, _env: &ParseEnv<'_>, raw: &str) -> ParseResult<DateValue> {
        patterns::parse_date(raw)
            .map(DateValue::Date)
            .ok_or_else(|| ErrorKind::bad_value(raw, self.type_name()).into())
    }

    fn parse_range_str(&self, _env: &ParseEnv<'_>, raw: &str) -> ParseResult<RangeValue<DateValue>> {
        patterns::parse_date_range(raw)
            .ok_or_else(|| ErrorKind::bad_value(raw, "date_range").into())
    }
}

/// UTC instants. A single value must be given to the second.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeParser;

impl ScalarParser for TimeParser {
    type Output = DateTime<Utc>;

    fn type_name(&self) -> &'static str {
        "time"
    }

    fn parse_str(&self, _env: &ParseEnv<'_>, raw: &str) -> ParseResult<DateTime<Utc>> {
        patterns::parse_time(raw).ok_or_else(|| ErrorKind::bad_value(raw, self.type_name()).into())
    }

    fn parse_range_str(
        &self,
        _env: &ParseEnv<'_>,
        raw: &str,
    ) -> ParseResult<RangeValue<DateTime<Utc>>> {
        patterns::parse_time_range(raw)
            .ok_or_else(|| ErrorKind::bad_value(raw, "time_range").into())
    }
}
