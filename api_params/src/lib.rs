//! # api_params - typed request parameter parsing
//!
//! Turns the string-valued parameters of an API request into validated,
//! typed values. Each parameter is pulled through a `ParseContext`, which
//! records a declaration for it; once an action has pulled everything it
//! needs, `done_parsing` reports unused parameters, unexpected uploads or
//! a help request.

/// Compile a regex literal once and hand back a `&'static Regex`.
macro_rules! static_regex {
    ($pattern:expr) => {{
        static REGEX: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        REGEX.get_or_init(|| regex::Regex::new($pattern).expect("regex literal is valid"))
    }};
}

pub mod config;
#[macro_use]
pub mod logging;
pub mod context;
pub mod coordinates;
pub mod declaration;
pub mod entity;
pub mod error;
pub mod parsers;
pub mod patterns;
pub mod range;

#[cfg(test)]
mod testing;

// Re-export key types for library consumers
pub use context::{ParseContext, ParseEnv, RequestParams};
pub use declaration::{DeclarationRegistry, ParameterDeclaration, ParserKind};
pub use error::{ErrorKind, ErrorReport, Limit, ParseError, ParseResult};
pub use parsers::{Param, ParseArgs, ScalarParser};
pub use range::{OrderedRange, RangeValue};

pub mod prelude {
    pub use crate::config::{ParserPreferences, RuntimeConfig};
    pub use crate::context::{ParseContext, ParseEnv, RequestParams};
    pub use crate::entity::{Actor, Entity, EntityKind, EntityLookup, InMemoryStore, Relation};
    pub use crate::error::{ErrorKind, ParseError, ParseResult};
    pub use crate::parsers::{
        AltitudeParser, BooleanParser, DateParser, EntityParser, EnumParser, FloatParser,
        IntegerParser, LatitudeParser, LocaleParser, LongitudeParser, ObjectParser, Param,
        ParseArgs, PlaceNameParser, ScalarParser, StringParser, TimeParser,
    };
    pub use crate::patterns::DateValue;
    pub use crate::range::{OrderedRange, RangeValue};
}
