//! Typed parameter parsers
//!
//! Each parser turns one trimmed string into one typed value. Lists,
//! ranges and lists of ranges are built on top by the composition
//! helpers in `composite`, so a parser only has to know its own scalar
//! syntax. Parsers that need a different range grammar (dates, times,
//! enumerations) override `parse_range_str`.

pub mod calendar;
pub mod composite;
pub mod geo;
pub mod reference;
pub mod scalar;

use crate::context::ParseEnv;
use crate::error::ParseResult;
use crate::range::{RangeOrdering, RangeValue};
use std::fmt;

pub use calendar::{DateParser, TimeParser};
pub use geo::{AltitudeParser, LatitudeParser, LongitudeParser};
pub use reference::{EntityParser, ObjectParser, PlaceNameParser};
pub use scalar::{
    BooleanParser, EnumParser, FloatParser, IntegerLimit, IntegerParser, LocaleParser,
    StringParser,
};

pub trait ScalarParser {
    type Output: Clone + fmt::Debug + RangeOrdering;

    /// Type recorded in declarations and echoed in bad-value errors
    fn type_name(&self) -> &'static str;

    /// Constraints this parser enforces, listed in usage output
    fn declaration_args(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn parse_str(&self, env: &ParseEnv<'_>, raw: &str) -> ParseResult<Self::Output>;

    /// Keep range ends as written instead of sorting them
    fn leave_order(&self) -> bool {
        false
    }

    /// One `from-to` pair split on a single unescaped dash, or a scalar
    fn parse_range_str(&self, env: &ParseEnv<'_>, raw: &str) -> ParseResult<RangeValue<Self::Output>>
    where
        Self: Sized,
    {
        composite::parse_range_pair(self, env, raw)
    }

    /// Value used when the parameter is absent and the caller gave no default
    fn fallback(&self, _env: &ParseEnv<'_>) -> Option<Self::Output> {
        None
    }
}

/// Outcome of pulling one parameter
#[derive(Debug, Clone, PartialEq)]
pub enum Param<T> {
    /// Parsed from the request
    Parsed(T),
    /// Not in the request; caller default or parser fallback
    Defaulted(T),
    Absent,
}

impl<T> Param<T> {
    pub(crate) fn absent_or(default: Option<T>) -> Self {
        match default {
            Some(value) => Param::Defaulted(value),
            None => Param::Absent,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Param::Parsed(value) | Param::Defaulted(value) => Some(value),
            Param::Absent => None,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Param::Parsed(value) | Param::Defaulted(value) => Some(value),
            Param::Absent => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Param::Parsed(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Param::Absent)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Param<U> {
        match self {
            Param::Parsed(value) => Param::Parsed(f(value)),
            Param::Defaulted(value) => Param::Defaulted(f(value)),
            Param::Absent => Param::Absent,
        }
    }
}

/// Per-call options. `D` is the shape of the result: `T` for scalars,
/// `Vec<T>` for lists, `RangeValue<T>` for ranges.
#[derive(Debug, Clone)]
pub struct ParseArgs<D> {
    pub default: Option<D>,
    pub help: Option<String>,
    /// Name shown to users in place of the key
    pub as_name: Option<String>,
}

impl<D> Default for ParseArgs<D> {
    fn default() -> Self {
        Self {
            default: None,
            help: None,
            as_name: None,
        }
    }
}

impl<D> ParseArgs<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_value(mut self, value: D) -> Self {
        self.default = Some(value);
        self
    }

    pub fn help(mut self, text: &str) -> Self {
        self.help = Some(text.to_string());
        self
    }

    pub fn as_name(mut self, name: &str) -> Self {
        self.as_name = Some(name.to_string());
        self
    }
}
