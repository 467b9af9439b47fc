use super::kind::{DiagnosticKind, LexicalIssue};
use crate::log_error;
use crate::utils::{Position, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A recorded lexical error. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub line: usize,
    pub column: usize,
    pub message: String,
    /// Offending source text, when the issue points at one
    pub lexeme: Option<String>,
    #[serde(skip)]
    offset: usize,
}

impl Diagnostic {
    pub fn start(&self) -> Position {
        Position::new(self.offset, self.line, self.column)
    }

    /// Span of the offending text; zero-width for indentation problems
    pub fn span(&self) -> Span {
        match &self.lexeme {
            Some(lexeme) => {
                let first_line = lexeme.split('\n').next().unwrap_or_default();
                Span::covering(self.start(), first_line)
            }
            None => Span::point(self.start()),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.line, self.column, self.kind, self.message
        )
    }
}

/// Append-only sink shared by every stage of a scan
#[derive(Debug, Default)]
pub struct ErrorReporter {
    diagnostics: Vec<Diagnostic>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue at `at` and log it
    pub fn report(&mut self, issue: LexicalIssue, at: Position) {
        let diagnostic = Diagnostic {
            kind: issue.kind(),
            line: at.line,
            column: at.column,
            message: issue.to_string(),
            lexeme: issue.lexeme(),
            offset: at.offset,
        };

        log_error!(issue.error_code(), &diagnostic.message,
            span = diagnostic.span(),
            "kind" => diagnostic.kind,
            "line" => diagnostic.line,
            "column" => diagnostic.column
        );

        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::IndentationIssue;

    #[test]
    fn test_reports_are_appended_in_order() {
        let mut reporter = ErrorReporter::new();
        reporter.report(
            LexicalIssue::InvalidCharacter { character: '$' },
            Position::new(6, 1, 7),
        );
        reporter.report(LexicalIssue::ExpectedIndentedBlock, Position::new(9, 2, 1));

        let diagnostics = reporter.diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::InvalidCharacter);
        assert_eq!(diagnostics[0].lexeme.as_deref(), Some("$"));
        assert_eq!(diagnostics[0].span().len(), 1);
        assert_eq!(
            diagnostics[1].kind,
            DiagnosticKind::IndentationError(IndentationIssue::ExpectedIndentedBlock)
        );
        assert!(diagnostics[1].span().is_empty());
        assert_eq!(
            diagnostics[1].to_string(),
            "2:1: IndentationError: expected an indented block"
        );
    }

    #[test]
    fn test_counts_by_kind() {
        let mut reporter = ErrorReporter::new();
        for column in [1, 5] {
            reporter.report(
                LexicalIssue::undeclared_variable("x"),
                Position::new(column - 1, 1, column),
            );
        }

        assert_eq!(reporter.count_of(DiagnosticKind::UndeclaredVariable), 2);
        assert_eq!(reporter.count_of(DiagnosticKind::MissingColon), 0);
        assert_eq!(reporter.into_diagnostics().len(), 2);
    }
}
