pub mod config;
pub mod diagnostics;
pub mod file_processor;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod symbols;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use diagnostics::{Diagnostic, DiagnosticKind, IndentationIssue};
pub use lexical::{scan_source, ScanConfig, ScanReport, Scanner};
pub use pipeline::{PipelineError, PipelineResult};
pub use tokens::{Token, TokenKind};
