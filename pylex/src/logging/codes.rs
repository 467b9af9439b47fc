//! Consolidated error codes and classification system
//!
//! Single source of truth for every code emitted by the scanner, the file processor and the
//! pipeline, together with the metadata used by cargo-style reporting.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Critical" => Some(Severity::Critical),
            "High" => Some(Severity::High),
            "Medium" => Some(Severity::Medium),
            "Low" => Some(Severity::Low),
            _ => None,
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const CONFIGURATION_ERROR: Code = Code::new("ERR003");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const TOO_MANY_LINES: Code = Code::new("E013");
}

/// Indentation error codes, one per sub-case of an indentation error
pub mod indentation {
    use super::Code;

    pub const EXPECTED_INDENTED_BLOCK: Code = Code::new("E020");
    pub const UNEXPECTED_INDENT: Code = Code::new("E021");
    pub const UNMATCHED_DEDENT: Code = Code::new("E022");
}

/// Character-level lexical error codes
pub mod lexical {
    use super::Code;

    pub const UNTERMINATED_STRING: Code = Code::new("E030");
    pub const UNCLOSED_BLOCK_COMMENT: Code = Code::new("E031");
    pub const MALFORMED_NUMBER: Code = Code::new("E032");
    pub const INVALID_IDENTIFIER: Code = Code::new("E033");
    pub const INVALID_CHARACTER: Code = Code::new("E034");
}

/// Statement shape error codes
pub mod statement {
    use super::Code;

    pub const MISSING_RIGHT_HAND_SIDE: Code = Code::new("E040");
    pub const MISSING_CONDITION: Code = Code::new("E041");
    pub const MISSING_COLON: Code = Code::new("E042");
    pub const MULTIPLE_STATEMENTS: Code = Code::new("E043");
}

/// Symbol table error codes
pub mod symbols {
    use super::Code;

    pub const UNDECLARED_VARIABLE: Code = Code::new("E050");
}

/// Warning codes
pub mod warnings {
    use super::Code;

    pub const LINE_TOO_LONG: Code = Code::new("W001");
    pub const LARGE_FILE: Code = Code::new("W002");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    // General success codes
    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");

    // File processing success codes
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const FILE_VALIDATION_PASSED: Code = Code::new("I007");

    // Scanner success codes
    pub const SCAN_COMPLETE: Code = Code::new("I020");
    pub const LEXICAL_VALIDATION_PASSED: Code = Code::new("I021");

    // Symbol success codes
    pub const SYMBOL_TABLE_COMPLETE: Code = Code::new("I050");

    // Pipeline success codes
    pub const PIPELINE_COMPLETE: Code = Code::new("I090");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

/// Initialize and get the error registry
fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            // System errors
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Critical internal system error",
                "File a bug report with the input that triggered it",
            ),
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "System initialization failure",
                "Check logging configuration and environment variables",
            ),
            ErrorMetadata::new(
                "ERR003",
                "System",
                Severity::High,
                false,
                true,
                "Invalid runtime configuration",
                "Fix the configuration file or PYLEX_* environment variables",
            ),
            // File processing errors
            ErrorMetadata::new(
                "E005",
                "FileProcessing",
                Severity::High,
                false,
                true,
                "Source file not found",
                "Verify the file path exists and is accessible",
            ),
            ErrorMetadata::new(
                "E006",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "Source file does not have the .py extension",
                "Rename the file or disable PYLEX_REQUIRE_PY_EXTENSION",
            ),
            ErrorMetadata::new(
                "E007",
                "FileProcessing",
                Severity::High,
                false,
                true,
                "Source file exceeds the maximum size",
                "Split the file or raise max_file_size in the build profile",
            ),
            ErrorMetadata::new(
                "E008",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "Source file is empty",
                "Provide a file with content",
            ),
            ErrorMetadata::new(
                "E009",
                "FileProcessing",
                Severity::High,
                false,
                true,
                "Permission denied reading source file",
                "Check file permissions",
            ),
            ErrorMetadata::new(
                "E010",
                "FileProcessing",
                Severity::High,
                false,
                true,
                "Source file is not valid UTF-8",
                "Convert the file to UTF-8",
            ),
            ErrorMetadata::new(
                "E011",
                "FileProcessing",
                Severity::High,
                false,
                true,
                "I/O error while reading source file",
                "Check disk and file system health",
            ),
            ErrorMetadata::new(
                "E012",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "Invalid source file path",
                "Pass a path to a regular file",
            ),
            ErrorMetadata::new(
                "E013",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "Source file has too many lines for analysis",
                "Split the file or raise max_line_count_for_analysis",
            ),
            // Indentation errors
            ErrorMetadata::new(
                "E020",
                "Indentation",
                Severity::High,
                true,
                false,
                "Expected an indented block after a block-opening line",
                "Indent the body of the block deeper than its header",
            ),
            ErrorMetadata::new(
                "E021",
                "Indentation",
                Severity::High,
                true,
                false,
                "Unexpected indent",
                "Remove the extra indentation or add the missing block header",
            ),
            ErrorMetadata::new(
                "E022",
                "Indentation",
                Severity::High,
                true,
                false,
                "Indentation does not match any outer level",
                "Align the line with one of the enclosing blocks",
            ),
            // Lexical errors
            ErrorMetadata::new(
                "E030",
                "Lexical",
                Severity::High,
                true,
                false,
                "Unterminated string literal",
                "Close the string with its opening quote",
            ),
            ErrorMetadata::new(
                "E031",
                "Lexical",
                Severity::High,
                true,
                false,
                "Unclosed block comment",
                "Close the block comment with a matching triple quote",
            ),
            ErrorMetadata::new(
                "E032",
                "Lexical",
                Severity::Medium,
                true,
                false,
                "Malformed number literal",
                "Use at most one decimal point and give the exponent digits",
            ),
            ErrorMetadata::new(
                "E033",
                "Lexical",
                Severity::Medium,
                true,
                false,
                "Invalid identifier",
                "Identifiers start with a letter or underscore and contain no spaces",
            ),
            ErrorMetadata::new(
                "E034",
                "Lexical",
                Severity::Medium,
                true,
                false,
                "Invalid character",
                "Remove the character or move it into a string or comment",
            ),
            // Statement errors
            ErrorMetadata::new(
                "E040",
                "Statement",
                Severity::Medium,
                true,
                false,
                "Assignment is missing its right-hand side",
                "Provide a value after the assignment operator",
            ),
            ErrorMetadata::new(
                "E041",
                "Statement",
                Severity::Medium,
                true,
                false,
                "Control statement is missing its condition",
                "Add a condition between the keyword and the colon",
            ),
            ErrorMetadata::new(
                "E042",
                "Statement",
                Severity::Medium,
                true,
                false,
                "Block-opening statement is missing its colon",
                "End the statement header with ':'",
            ),
            ErrorMetadata::new(
                "E043",
                "Statement",
                Severity::Medium,
                true,
                false,
                "Multiple statements on one line without a separator",
                "Put each statement on its own line or separate them with ';'",
            ),
            // Symbol errors
            ErrorMetadata::new(
                "E050",
                "Symbols",
                Severity::Medium,
                true,
                false,
                "Variable used before declaration",
                "Assign the variable before reading it",
            ),
            // Warnings
            ErrorMetadata::new(
                "W001",
                "Style",
                Severity::Low,
                true,
                false,
                "Line exceeds the configured maximum length",
                "Wrap the line or raise PYLEX_MAX_LINE_LENGTH",
            ),
            ErrorMetadata::new(
                "W002",
                "FileProcessing",
                Severity::Low,
                true,
                false,
                "Source file is larger than the large-file threshold",
                "Expect longer scan times",
            ),
            // Success codes
            ErrorMetadata::new(
                "I001",
                "General",
                Severity::Low,
                true,
                false,
                "Operation completed successfully",
                "No action required",
            ),
            ErrorMetadata::new(
                "I004",
                "System",
                Severity::Low,
                true,
                false,
                "System initialization completed",
                "No action required",
            ),
            ErrorMetadata::new(
                "I006",
                "FileProcessing",
                Severity::Low,
                true,
                false,
                "File processed successfully",
                "Proceed to scanning",
            ),
            ErrorMetadata::new(
                "I007",
                "FileProcessing",
                Severity::Low,
                true,
                false,
                "File validation passed",
                "No action required",
            ),
            ErrorMetadata::new(
                "I020",
                "Lexical",
                Severity::Low,
                true,
                false,
                "Scan completed",
                "Review the reported diagnostics, if any",
            ),
            ErrorMetadata::new(
                "I021",
                "Lexical",
                Severity::Low,
                true,
                false,
                "Lexical code registry validated",
                "No action required",
            ),
            ErrorMetadata::new(
                "I050",
                "Symbols",
                Severity::Low,
                true,
                false,
                "Symbol table built",
                "No action required",
            ),
            ErrorMetadata::new(
                "I090",
                "Pipeline",
                Severity::Low,
                true,
                false,
                "Pipeline completed",
                "No action required",
            ),
        ];

        let mut registry = HashMap::with_capacity(entries.len());
        for metadata in entries {
            registry.insert(metadata.code, metadata);
        }
        registry
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
