//! Shared location types used by the scanner, diagnostics and logging

pub mod span;

pub use span::{Position, SourceMap, Span};
