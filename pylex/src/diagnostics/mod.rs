//! Typed diagnostics and the append-only reporter that collects them

pub mod kind;
pub mod reporter;

pub use kind::{DiagnosticKind, IndentationIssue, LexicalIssue};
pub use reporter::{Diagnostic, ErrorReporter};
