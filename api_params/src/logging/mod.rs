//! Global logging
//!
//! A process-wide `LoggingService` set once at startup. Until it is set,
//! every logging call is a silent no-op, so library users that never
//! initialize logging pay nothing beyond an atomic load.

pub mod codes;
pub mod events;
pub mod macros;
pub mod service;

use crate::config::LoggingPreferences;
use crate::log_success;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
#[cfg(feature = "log-bridge")]
pub use service::LogBridge;
pub use service::{
    ConsoleLogger, Logger, LoggingService, MemoryLogger, SilentLogger, StructuredLogger,
};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

/// Initialize global logging from preferences
pub fn init_global_logging(prefs: &LoggingPreferences) -> Result<(), String> {
    let service = Arc::new(service::create_configured_service(prefs));
    init_global_logging_with_service(service)?;

    log_success!(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
        "min_level" => prefs.min_log_level.as_str()
    );
    Ok(())
}

/// Initialize with custom service (hosts and tests)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

pub fn debug_enabled() -> bool {
    try_get_global_logger().is_some_and(|logger| logger.should_log(LogLevel::Debug))
}

/// Used by the `log_error!` macro
pub fn log_error_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    log_event_with_context(LogEvent::error(code, message), context);
}

/// Used by the `log_success!` macro
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    log_event_with_context(LogEvent::success(code, message), context);
}

pub fn log_event_with_context(mut event: LogEvent, context: Vec<(&str, &str)>) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    logger.log_event(event);
}

/// Safe error logging, falls back to stderr when uninitialized
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_error(code, message);
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}
