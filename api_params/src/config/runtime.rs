// RUNTIME PREFERENCES

use super::constants::{locale, request};
use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration value '{field}' is invalid: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserPreferences {
    /// Locale returned when a locale parameter is absent
    pub default_locale: String,

    /// Locales a locale parameter may name
    pub supported_locales: Vec<String>,

    /// Extra words read as `true` by the boolean parser, e.g. "oui"
    pub localized_true: Vec<String>,

    /// Extra words read as `false` by the boolean parser
    pub localized_false: Vec<String>,

    /// Key that requests a usage listing
    pub help_key: String,

    /// Keys that carry an upload payload
    pub upload_keys: Vec<String>,

    /// Keys never reported as unused (transport-level keys such as `format`)
    pub ignored_keys: Vec<String>,
}

impl Default for ParserPreferences {
    fn default() -> Self {
        Self {
            default_locale: env::var("API_PARAMS_DEFAULT_LOCALE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| locale::DEFAULT_LOCALE.to_string()),
            supported_locales: env_list("API_PARAMS_SUPPORTED_LOCALES")
                .unwrap_or_else(|| to_owned_list(&locale::SUPPORTED_LOCALES)),
            localized_true: env_list("API_PARAMS_LOCALIZED_TRUE").unwrap_or_default(),
            localized_false: env_list("API_PARAMS_LOCALIZED_FALSE").unwrap_or_default(),
            help_key: env::var("API_PARAMS_HELP_KEY")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| request::HELP_KEY.to_string()),
            upload_keys: env_list("API_PARAMS_UPLOAD_KEYS")
                .unwrap_or_else(|| to_owned_list(&request::UPLOAD_KEYS)),
            ignored_keys: env_list("API_PARAMS_IGNORED_KEYS").unwrap_or_default(),
        }
    }
}

impl ParserPreferences {
    pub fn is_supported_locale(&self, code: &str) -> bool {
        self.supported_locales
            .iter()
            .any(|l| l.eq_ignore_ascii_case(code))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to emit JSON lines instead of plain text
    pub use_structured_logging: bool,

    /// Whether to write events to the console at all. Hosts that already
    /// run a `log` backend keep it when this is off and route events there.
    pub enable_console_logging: bool,

    /// Minimum level to emit
    pub min_log_level: LogLevel,

    /// Whether every declared parameter is logged at debug level
    pub log_declarations: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var("API_PARAMS_LOGGING_USE_STRUCTURED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var("API_PARAMS_LOGGING_ENABLE_CONSOLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var("API_PARAMS_LOGGING_MIN_LEVEL")
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            log_declarations: env::var("API_PARAMS_LOGGING_LOG_DECLARATIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub parser: ParserPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse a TOML document; sections and fields left out keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let parser = &self.parser;
        if parser.help_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "parser.help_key".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if parser.supported_locales.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "parser.supported_locales".to_string(),
                reason: "at least one locale is required".to_string(),
            });
        }
        if !parser.is_supported_locale(&parser.default_locale) {
            return Err(ConfigError::InvalidValue {
                field: "parser.default_locale".to_string(),
                reason: format!(
                    "'{}' is not one of the supported locales",
                    parser.default_locale
                ),
            });
        }
        Ok(())
    }
}

fn env_list(name: &str) -> Option<Vec<String>> {
    let raw = env::var(name).ok()?;
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Environment variable names for configuration
pub mod env_vars {
    pub const DEFAULT_LOCALE: &str = "API_PARAMS_DEFAULT_LOCALE";
    pub const SUPPORTED_LOCALES: &str = "API_PARAMS_SUPPORTED_LOCALES";
    pub const LOCALIZED_TRUE: &str = "API_PARAMS_LOCALIZED_TRUE";
    pub const LOCALIZED_FALSE: &str = "API_PARAMS_LOCALIZED_FALSE";
    pub const HELP_KEY: &str = "API_PARAMS_HELP_KEY";
    pub const UPLOAD_KEYS: &str = "API_PARAMS_UPLOAD_KEYS";
    pub const IGNORED_KEYS: &str = "API_PARAMS_IGNORED_KEYS";

    pub const LOGGING_USE_STRUCTURED: &str = "API_PARAMS_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "API_PARAMS_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "API_PARAMS_LOGGING_MIN_LEVEL";
    pub const LOGGING_LOG_DECLARATIONS: &str = "API_PARAMS_LOGGING_LOG_DECLARATIONS";
}
