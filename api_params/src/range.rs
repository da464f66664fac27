//! Inclusive ranges whose ends are normalized on construction

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Ordering used when normalizing the two ends of a range.
///
/// Returning `None` means the pair has no meaningful order, and the range
/// keeps the ends as written.
pub trait RangeOrdering {
    fn range_cmp(&self, other: &Self) -> Option<Ordering>;
}

macro_rules! natural_range_ordering {
    ($($t:ty),* $(,)?) => {
        $(
            impl RangeOrdering for $t {
                fn range_cmp(&self, other: &Self) -> Option<Ordering> {
                    self.partial_cmp(other)
                }
            }
        )*
    };
}

natural_range_ordering!(i32, i64, u32, u64, f64, bool, String, NaiveDate, DateTime<Utc>);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderedRange<T> {
    begin: T,
    end: T,
}

impl<T: RangeOrdering> OrderedRange<T> {
    /// Builds a range, swapping the ends when `from` sorts after `to`.
    pub fn new(from: T, to: T) -> Self {
        Self::with_order(from, to, false)
    }

    /// Builds a range exactly as written. Used for cyclic values where
    /// "November to February" is meaningful.
    pub fn leave_order(from: T, to: T) -> Self {
        Self::with_order(from, to, true)
    }

    pub fn with_order(from: T, to: T, leave_order: bool) -> Self {
        if !leave_order && from.range_cmp(&to) == Some(Ordering::Greater) {
            Self {
                begin: to,
                end: from,
            }
        } else {
            Self {
                begin: from,
                end: to,
            }
        }
    }

    /// True when `begin <= value <= end`
    pub fn includes(&self, value: &T) -> bool {
        matches!(
            self.begin.range_cmp(value),
            Some(Ordering::Less | Ordering::Equal)
        ) && matches!(
            value.range_cmp(&self.end),
            Some(Ordering::Less | Ordering::Equal)
        )
    }

    /// True for a range kept in written order whose begin sorts after its end
    pub fn wraps(&self) -> bool {
        self.begin.range_cmp(&self.end) == Some(Ordering::Greater)
    }
}

impl<T> OrderedRange<T> {
    pub fn begin(&self) -> &T {
        &self.begin
    }

    pub fn end(&self) -> &T {
        &self.end
    }

    pub fn into_parts(self) -> (T, T) {
        (self.begin, self.end)
    }
}

impl<T: fmt::Display> fmt::Display for OrderedRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.begin, self.end)
    }
}

/// Result of a range-capable parse: a single value or a two-ended range
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RangeValue<T> {
    Scalar(T),
    Range(OrderedRange<T>),
}

impl<T> RangeValue<T> {
    pub fn is_range(&self) -> bool {
        matches!(self, RangeValue::Range(_))
    }

    pub fn as_scalar(&self) -> Option<&T> {
        match self {
            RangeValue::Scalar(value) => Some(value),
            RangeValue::Range(_) => None,
        }
    }

    pub fn as_range(&self) -> Option<&OrderedRange<T>> {
        match self {
            RangeValue::Scalar(_) => None,
            RangeValue::Range(range) => Some(range),
        }
    }
}

impl<T: fmt::Display> fmt::Display for RangeValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeValue::Scalar(value) => value.fmt(f),
            RangeValue::Range(range) => range.fmt(f),
        }
    }
}
