//! Global logging for pylex
//!
//! Thread-safe global logger, per-file error collection for cargo-style summaries and the
//! macro interface used throughout the scanner.

pub mod codes;
pub mod collector;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use collector::{ErrorCollector, FileProcessingContext, ProcessingSummary};
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();
static GLOBAL_ERROR_COLLECTOR: OnceLock<Arc<ErrorCollector>> = OnceLock::new();

thread_local! {
    static FILE_CONTEXT: RefCell<Option<FileProcessingContext>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging system from the configured preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;
    init_global_logging_with_service(Arc::new(LoggingService::with_config()))?;

    for code in [
        codes::system::INTERNAL_ERROR,
        codes::file_processing::FILE_NOT_FOUND,
        codes::indentation::EXPECTED_INDENTED_BLOCK,
        codes::statement::MISSING_COLON,
    ] {
        if codes::get_description(code.as_str()) == "Unknown error" {
            return Err(format!("Missing metadata for error code: {}", code));
        }
    }

    crate::log_success!(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized"
    );

    Ok(())
}

/// Initialize with custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized")?;

    GLOBAL_ERROR_COLLECTOR
        .set(Arc::new(ErrorCollector::new()))
        .map_err(|_| "Global error collector already initialized")?;

    Ok(())
}

// ============================================================================
// GLOBAL ACCESS
// ============================================================================

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

pub fn try_get_global_error_collector() -> Option<&'static ErrorCollector> {
    GLOBAL_ERROR_COLLECTOR
        .get()
        .map(|collector| collector.as_ref())
}

// ============================================================================
// FILE CONTEXT MANAGEMENT
// ============================================================================

/// Set file context for current thread
pub fn set_file_context(file_path: PathBuf, file_id: usize) {
    let context = FileProcessingContext::new(file_path, file_id);

    if let Some(collector) = try_get_global_error_collector() {
        collector.record_file_context(context.clone());
    }

    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(context);
    });
}

pub fn clear_file_context() {
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Execute function with file context
pub fn with_file_context<F, R>(file_path: PathBuf, file_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_file_context(file_path, file_id);
    let result = f();
    clear_file_context();
    result
}

/// Get current file context (used by macros)
pub fn get_current_file_context() -> Option<FileProcessingContext> {
    FILE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

fn attach_file_context(event: LogEvent) -> LogEvent {
    if !config::include_file_context() {
        return event;
    }
    match get_current_file_context() {
        Some(file_ctx) => event
            .with_context("file", &file_ctx.file_path.display().to_string())
            .with_context("file_id", &file_ctx.file_id.to_string()),
        None => event,
    }
}

fn dispatch(event: LogEvent, collect: bool) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event.clone());
    }

    if collect {
        if let (Some(file_ctx), Some(collector)) =
            (get_current_file_context(), try_get_global_error_collector())
        {
            collector.record_event(&file_ctx.file_path, event);
        }
    }
}

/// Log error with context (used by log_error! macro)
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let mut event = LogEvent::error(code, config::truncate_message(message));

    if let Some(s) = span {
        event = event.with_span(s);
    }

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch(attach_file_context(event), true);
}

/// Log warning with context (used by log_warning! macro)
pub fn log_warning_with_context(
    code: Option<Code>,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let message = config::truncate_message(message);
    let mut event = match code {
        Some(code) => LogEvent::warning_with_code(code, message),
        None => LogEvent::warning(message),
    };

    if let Some(s) = span {
        event = event.with_span(s);
    }

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch(attach_file_context(event), true);
}

/// Log success with context (used by log_success! macro)
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::success(code, config::truncate_message(message));

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch(attach_file_context(event), false);
}

/// Log info with context (used by log_info! macro)
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::info(config::truncate_message(message));

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch(attach_file_context(event), false);
}

// ============================================================================
// SUMMARIES
// ============================================================================

/// Print cargo-style summary of everything collected so far
pub fn print_cargo_style_summary() {
    if !config::use_cargo_style_output() {
        return;
    }
    if let Some(collector) = try_get_global_error_collector() {
        print!("{}", collector::format_cargo_style_errors(collector));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_context_management() {
        let file_path = PathBuf::from("context.py");

        set_file_context(file_path.clone(), 1);
        let context = get_current_file_context();
        assert_eq!(context.map(|c| c.file_path), Some(file_path));

        clear_file_context();
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_with_file_context() {
        let file_path = PathBuf::from("scoped.py");

        let result = with_file_context(file_path.clone(), 2, || {
            let context = get_current_file_context();
            assert_eq!(context.map(|c| c.file_path), Some(file_path.clone()));
            42
        });

        assert_eq!(result, 42);
        assert!(get_current_file_context().is_none());
    }
}
