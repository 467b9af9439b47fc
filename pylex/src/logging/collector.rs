//! Per-file event collection with cargo-style output

use super::events::LogEvent;
use crate::config::compile_time::logging::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

// ============================================================================
// FILE PROCESSING CONTEXT
// ============================================================================

/// Context information for the file being scanned
#[derive(Debug, Clone)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
    pub start_time: Instant,
}

impl FileProcessingContext {
    pub fn new(file_path: PathBuf, file_id: usize) -> Self {
        Self {
            file_path,
            file_id,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

// ============================================================================
// PROCESSING SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_files: usize,
    pub clean_files: usize,
    pub failed_files: usize,
    pub files_with_warnings: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_processing_time: Duration,
    pub average_file_time: Duration,
}

// ============================================================================
// ERROR COLLECTOR
// ============================================================================

/// Thread-safe collector grouping events by source file
pub struct ErrorCollector {
    file_events: Mutex<BTreeMap<PathBuf, Vec<LogEvent>>>,
    file_contexts: Mutex<BTreeMap<PathBuf, FileProcessingContext>>,
    processing_start: Instant,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            file_events: Mutex::new(BTreeMap::new()),
            file_contexts: Mutex::new(BTreeMap::new()),
            processing_start: Instant::now(),
        }
    }

    /// Record an event for a specific file
    pub fn record_event(&self, file_path: &Path, event: LogEvent) {
        let mut events = lock(&self.file_events);
        let file_events = events.entry(file_path.to_path_buf()).or_default();

        if file_events.len() < MAX_LOG_EVENTS_PER_FILE {
            file_events.push(event);
        } else if file_events.len() == MAX_LOG_EVENTS_PER_FILE {
            file_events.push(LogEvent::warning(&format!(
                "Too many events for file (limit: {})",
                MAX_LOG_EVENTS_PER_FILE
            )));
        }
    }

    pub fn record_file_context(&self, context: FileProcessingContext) {
        lock(&self.file_contexts).insert(context.file_path.clone(), context);
    }

    pub fn get_all_file_events(&self) -> BTreeMap<PathBuf, Vec<LogEvent>> {
        lock(&self.file_events).clone()
    }

    pub fn get_summary(&self) -> ProcessingSummary {
        let events = lock(&self.file_events);
        let contexts = lock(&self.file_contexts);

        let mut summary = ProcessingSummary {
            total_files: events.len(),
            total_processing_time: self.processing_start.elapsed(),
            ..ProcessingSummary::default()
        };

        let mut total_file_time = Duration::ZERO;
        let mut timed_files = 0u32;

        for (file_path, file_events) in events.iter() {
            let errors = file_events.iter().filter(|e| e.is_error()).count();
            let warnings = file_events.iter().filter(|e| e.is_warning()).count();

            if errors > 0 {
                summary.failed_files += 1;
            } else if warnings > 0 {
                summary.files_with_warnings += 1;
            } else {
                summary.clean_files += 1;
            }

            summary.total_errors += errors;
            summary.total_warnings += warnings;

            if let Some(context) = contexts.get(file_path) {
                total_file_time += context.elapsed();
                timed_files += 1;
            }
        }

        if timed_files > 0 {
            summary.average_file_time = total_file_time / timed_files;
        }

        summary
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// CARGO-STYLE FORMATTING
// ============================================================================

fn push_context(output: &mut String, event: &LogEvent) {
    let mut keys: Vec<_> = event
        .context
        .keys()
        .filter(|key| key.as_str() != "file" && key.as_str() != "file_id")
        .collect();
    keys.sort();
    for key in keys {
        output.push_str(&format!("  = {}: {}\n", key, event.context[key]));
    }
}

fn location(file_path: &Path, event: &LogEvent) -> String {
    event
        .span
        .as_ref()
        .map(|s| {
            format!(
                " --> {}:{}:{}",
                file_path.display(),
                s.start().line,
                s.start().column
            )
        })
        .unwrap_or_default()
}

/// Format collected errors and warnings the way cargo prints them
pub fn format_cargo_style_errors(collector: &ErrorCollector) -> String {
    let mut output = String::new();

    for (file_path, events) in &collector.get_all_file_events() {
        let errors: Vec<_> = events.iter().filter(|e| e.is_error()).collect();
        let warnings: Vec<_> = events.iter().filter(|e| e.is_warning()).collect();

        if errors.is_empty() && warnings.is_empty() {
            continue;
        }

        output.push_str(&format!("Checking {}...\n", file_path.display()));

        for event in errors {
            output.push_str(&format!(
                "error[{}]: {}{}\n",
                event.code.as_str(),
                event.message,
                location(file_path, event)
            ));
            output.push_str(&format!(
                "  = severity: {}, category: {}\n",
                event.severity(),
                event.category()
            ));
            push_context(&mut output, event);

            let action = event.recommended_action();
            if action != "No specific action available" {
                output.push_str(&format!("  = help: {}\n", action));
            }
        }

        for event in warnings {
            output.push_str(&format!(
                "warning[{}]: {}{}\n",
                event.code.as_str(),
                event.message,
                location(file_path, event)
            ));
            push_context(&mut output, event);
        }

        output.push('\n');
    }

    let summary = collector.get_summary();
    if summary.total_errors > 0 {
        output.push_str(&format!("Total errors: {}\n", summary.total_errors));
    }
    if summary.total_warnings > 0 {
        output.push_str(&format!("Total warnings: {}\n", summary.total_warnings));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use crate::utils::{Position, Span};

    #[test]
    fn test_record_and_summarize() {
        let collector = ErrorCollector::new();
        let broken = PathBuf::from("broken.py");
        let clean = PathBuf::from("clean.py");

        collector.record_event(
            &broken,
            LogEvent::error(codes::lexical::MALFORMED_NUMBER, "malformed number literal '1e'"),
        );
        collector.record_event(&clean, LogEvent::info("scanned"));

        let summary = collector.get_summary();
        assert_eq!(summary.total_files, 2);
        assert_eq!(summary.failed_files, 1);
        assert_eq!(summary.clean_files, 1);
        assert_eq!(summary.total_errors, 1);
        assert!(collector.get_all_file_events()[&clean].iter().all(|e| !e.is_error()));
    }

    #[test]
    fn test_cargo_style_output() {
        let collector = ErrorCollector::new();
        let path = PathBuf::from("sample.py");
        let span = Span::new(Position::new(0, 3, 9), Position::new(1, 3, 10));

        collector.record_event(
            &path,
            LogEvent::error(codes::lexical::INVALID_CHARACTER, "invalid character '$'")
                .with_span(span)
                .with_context("character", "$"),
        );

        let output = format_cargo_style_errors(&collector);
        assert!(output.contains("error[E034]: invalid character '$' --> sample.py:3:9"));
        assert!(output.contains("category: Lexical"));
        assert!(output.contains("= character: $"));
        assert!(output.contains("Total errors: 1"));
    }
}
