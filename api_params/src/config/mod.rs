//! Parser configuration
//!
//! Two layers, as in the rest of the workspace: fixed policy constants that
//! shape how values are interpreted, and runtime preferences that can be
//! tuned per deployment through TOML files or `API_PARAMS_*` environment
//! variables.

pub mod constants;
pub mod runtime;

pub use runtime::{
    ConfigError, LoggingPreferences, ParserPreferences, RuntimeConfig,
};
