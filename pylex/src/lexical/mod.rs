//! Lexical analysis for indentation-sensitive source
//!
//! [`Scanner`] folds over the physical lines of a source once, emitting tokens lazily and
//! collecting diagnostics and symbol declarations as it goes. [`scan_source`] runs a scanner to
//! completion and returns the full [`ScanReport`].

pub mod classifier;
pub mod indentation;
pub mod report;
pub mod scanner;
pub mod source;
pub mod state;
pub mod statement;

use crate::config::compile_time::lexical::{
    DEFAULT_TAB_WIDTH, MAX_LINE_LENGTH_CEILING, MAX_TAB_WIDTH,
};
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;

pub use indentation::{BlockResolution, IndentationTracker, ScopeFrame, ScopeId, ScopeStack};
pub use report::{format_symbol_table, format_token_table, ScanMetrics, ScanReport};
pub use scanner::Scanner;
pub use source::{LogicalLine, SourceModel};

/// Per-scan settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub tab_width: usize,
    /// Lines longer than this are logged as warnings and counted
    pub max_line_length: Option<usize>,
    pub collect_detailed_metrics: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            max_line_length: None,
            collect_detailed_metrics: false,
        }
    }
}

impl From<&LexicalPreferences> for ScanConfig {
    fn from(preferences: &LexicalPreferences) -> Self {
        Self {
            tab_width: preferences.tab_width,
            max_line_length: preferences.max_line_length,
            collect_detailed_metrics: preferences.collect_detailed_metrics,
        }
    }
}

impl ScanConfig {
    /// Clamp values into the compile-time bounds
    pub fn normalized(&self) -> Self {
        Self {
            tab_width: self.tab_width.clamp(1, MAX_TAB_WIDTH),
            max_line_length: self
                .max_line_length
                .map(|limit| limit.clamp(1, MAX_LINE_LENGTH_CEILING)),
            collect_detailed_metrics: self.collect_detailed_metrics,
        }
    }
}

/// Scan `source` to completion
pub fn scan_source(source: &str, config: &ScanConfig) -> ScanReport {
    Scanner::new(source, config).into_report()
}

/// Check that every diagnostic code is registered with metadata (for system startup)
pub fn validate_lexical_codes() -> Result<(), String> {
    let diagnostic_codes = [
        codes::indentation::EXPECTED_INDENTED_BLOCK,
        codes::indentation::UNEXPECTED_INDENT,
        codes::indentation::UNMATCHED_DEDENT,
        codes::lexical::UNTERMINATED_STRING,
        codes::lexical::UNCLOSED_BLOCK_COMMENT,
        codes::lexical::MALFORMED_NUMBER,
        codes::lexical::INVALID_IDENTIFIER,
        codes::lexical::INVALID_CHARACTER,
        codes::statement::MISSING_RIGHT_HAND_SIDE,
        codes::statement::MISSING_CONDITION,
        codes::statement::MISSING_COLON,
        codes::statement::MULTIPLE_STATEMENTS,
        codes::symbols::UNDECLARED_VARIABLE,
    ];

    for code in &diagnostic_codes {
        let Some(metadata) = codes::get_error_metadata(code.as_str()) else {
            return Err(format!(
                "Diagnostic code {} not found in metadata registry",
                code.as_str()
            ));
        };
        if !metadata.recoverable {
            return Err(format!(
                "Diagnostic code {} must be recoverable",
                code.as_str()
            ));
        }
    }

    crate::log_debug!("Lexical limits initialized",
        "default_tab_width" => DEFAULT_TAB_WIDTH,
        "max_tab_width" => MAX_TAB_WIDTH,
        "max_line_length_ceiling" => MAX_LINE_LENGTH_CEILING
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_is_clamped() {
        let config = ScanConfig {
            tab_width: 0,
            max_line_length: Some(usize::MAX),
            collect_detailed_metrics: false,
        }
        .normalized();
        assert_eq!(config.tab_width, 1);
        assert_eq!(config.max_line_length, Some(MAX_LINE_LENGTH_CEILING));
    }

    #[test]
    fn test_diagnostic_codes_registered() {
        assert_eq!(validate_lexical_codes(), Ok(()));
    }

    #[test]
    fn test_scan_is_idempotent() {
        let source = "x = 1\nif x:\n    y = x $ 2\n";
        let first = scan_source(source, &ScanConfig::default());
        let second = scan_source(source, &ScanConfig::default());
        assert_eq!(first.tokens, second.tokens);
        assert_eq!(first.diagnostics, second.diagnostics);
    }
}
