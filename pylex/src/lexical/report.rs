//! Scan output: tokens, diagnostics, the symbol snapshot and metrics

use crate::diagnostics::Diagnostic;
use crate::lexical::source::LogicalLine;
use crate::symbols::SymbolSnapshot;
use crate::tokens::{Token, TokenKind, TokenStream};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Counters accumulated while scanning
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanMetrics {
    pub lines: usize,
    pub blank_lines: usize,
    pub comment_lines: usize,
    pub token_count: usize,
    /// Per-kind counts; only filled when detailed metrics are enabled
    pub kind_counts: BTreeMap<TokenKind, usize>,
    /// Deepest scope nesting reached, counting the global scope
    pub max_depth: usize,
    pub long_lines: usize,
    pub diagnostics: usize,
}

impl ScanMetrics {
    pub(crate) fn record_line(&mut self, line: &LogicalLine<'_>) {
        self.lines += 1;
        if line.is_blank() {
            self.blank_lines += 1;
        } else if line.is_comment_only() {
            self.comment_lines += 1;
        }
    }

    pub(crate) fn record_token(&mut self, token: &Token, detailed: bool) {
        self.token_count += 1;
        if detailed {
            *self.kind_counts.entry(token.kind).or_insert(0) += 1;
        }
    }

    pub(crate) fn record_depth(&mut self, depth: usize) {
        self.max_depth = self.max_depth.max(depth);
    }
}

/// Everything a scan produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
    pub symbols: SymbolSnapshot,
    pub metrics: ScanMetrics,
}

impl ScanReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn token_stream(&self) -> TokenStream {
        TokenStream::new(self.tokens.clone())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Line, kind and lexeme of every token
pub fn format_token_table(tokens: &[Token]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<6} {:<7} {:<14} LEXEME", "LINE", "COLUMN", "KIND");
    for token in tokens {
        let _ = writeln!(
            out,
            "{:<6} {:<7} {:<14} {}",
            token.line,
            token.column,
            token.kind.as_str(),
            token.lexeme.escape_debug()
        );
    }
    out
}

pub fn format_symbol_table(symbols: &SymbolSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<20} {:<14} {:<20} {:<8} HINT",
        "ID", "NAME", "KIND", "SCOPE", "LINE"
    );
    for record in &symbols.entries {
        let _ = writeln!(
            out,
            "{:<4} {:<20} {:<14} {:<20} {:<8} {}",
            record.id,
            record.name,
            record.kind.as_str(),
            record.scope,
            record.line,
            record.value_hint.map(|h| h.as_str()).unwrap_or("-")
        );
    }
    out
}
