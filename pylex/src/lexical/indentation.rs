//! Indentation tracking: INDENT/DEDENT emission and the scope stack
//!
//! Scope frames live in an arena addressed by [`ScopeId`] and are never removed, so symbol
//! entries can keep pointing at the frame they were declared in after the block closes. The
//! stack itself is the list of currently open ids, innermost last.

use crate::config::compile_time::symbols::INITIAL_SCOPE_CAPACITY;
use crate::diagnostics::{ErrorReporter, LexicalIssue};
use crate::lexical::source::LogicalLine;
use crate::log_debug;
use crate::tokens::{Token, TokenKind};
use crate::utils::Position;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeId(usize);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeFrame {
    pub label: String,
    pub width: usize,
    pub parent: Option<ScopeId>,
    pub opened_at_line: usize,
}

#[derive(Debug, Clone)]
pub struct ScopeStack {
    frames: Vec<ScopeFrame>,
    open: Vec<ScopeId>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// Starts with the global frame at width 0
    pub fn new() -> Self {
        let mut frames = Vec::with_capacity(INITIAL_SCOPE_CAPACITY);
        frames.push(ScopeFrame {
            label: "global".to_string(),
            width: 0,
            parent: None,
            opened_at_line: 0,
        });
        let mut open = Vec::with_capacity(INITIAL_SCOPE_CAPACITY);
        open.push(ScopeId::GLOBAL);
        Self { frames, open }
    }

    pub fn push(&mut self, label: impl Into<String>, width: usize, line: usize) -> ScopeId {
        let id = ScopeId(self.frames.len());
        self.frames.push(ScopeFrame {
            label: label.into(),
            width,
            parent: Some(self.current()),
            opened_at_line: line,
        });
        self.open.push(id);
        id
    }

    /// Close the innermost frame; the global frame stays open
    pub fn pop(&mut self) -> Option<ScopeId> {
        if self.open.len() > 1 {
            self.open.pop()
        } else {
            None
        }
    }

    pub fn current(&self) -> ScopeId {
        self.open.last().copied().unwrap_or(ScopeId::GLOBAL)
    }

    /// Open frames, outermost first
    pub fn open(&self) -> &[ScopeId] {
        &self.open
    }

    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn top_width(&self) -> usize {
        self.frame(self.current()).map(|f| f.width).unwrap_or(0)
    }

    pub fn frame(&self, id: ScopeId) -> Option<&ScopeFrame> {
        self.frames.get(id.0)
    }

    /// Every frame ever opened, in opening order
    pub fn frames(&self) -> &[ScopeFrame] {
        &self.frames
    }

    pub fn label(&self, id: ScopeId) -> &str {
        self.frame(id).map(|f| f.label.as_str()).unwrap_or("<unknown>")
    }

    /// Nesting depth of a frame counting the global frame as 1
    pub fn depth_of(&self, id: ScopeId) -> usize {
        let mut depth = 1;
        let mut cursor = self.frame(id).and_then(|f| f.parent);
        while let Some(parent) = cursor {
            depth += 1;
            cursor = self.frame(parent).and_then(|f| f.parent);
        }
        depth
    }
}

/// Outcome of an expected block on the line that should have opened it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockResolution {
    /// No block was expected
    NotExpected,
    Opened(ScopeId),
    /// Expected block was not indented
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ExpectedBlock {
    label: String,
}

#[derive(Debug, Clone)]
pub struct IndentationTracker {
    scopes: ScopeStack,
    previous_width: usize,
    expecting: Option<ExpectedBlock>,
}

impl Default for IndentationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl IndentationTracker {
    pub fn new() -> Self {
        Self {
            scopes: ScopeStack::new(),
            previous_width: 0,
            expecting: None,
        }
    }

    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    /// The next indented line opens a frame with this label
    pub fn expect_block(&mut self, label: impl Into<String>) {
        self.expecting = Some(ExpectedBlock {
            label: label.into(),
        });
    }

    /// Handle the indentation of a line that starts a statement
    pub fn on_line(
        &mut self,
        line: &LogicalLine<'_>,
        reporter: &mut ErrorReporter,
        out: &mut VecDeque<Token>,
    ) -> BlockResolution {
        let width = line.indent_width;

        if let Some(expected) = self.expecting.take() {
            if width > self.previous_width {
                let id = self.scopes.push(expected.label, width, line.number);
                self.emit(TokenKind::Indent, line.start(), out);
                self.previous_width = width;
                return BlockResolution::Opened(id);
            }

            reporter.report(LexicalIssue::ExpectedIndentedBlock, line.content_start());
            if width < self.previous_width {
                self.dedent_to(width, line, reporter, out);
            }
            return BlockResolution::Missing;
        }

        if width > self.previous_width {
            reporter.report(LexicalIssue::UnexpectedIndent, line.content_start());
            self.scopes
                .push(format!("indent@{}", line.number), width, line.number);
            self.emit(TokenKind::Indent, line.start(), out);
            self.previous_width = width;
        } else if width < self.previous_width {
            self.dedent_to(width, line, reporter, out);
        }

        BlockResolution::NotExpected
    }

    fn dedent_to(
        &mut self,
        width: usize,
        line: &LogicalLine<'_>,
        reporter: &mut ErrorReporter,
        out: &mut VecDeque<Token>,
    ) {
        while self.scopes.top_width() > width && self.scopes.pop().is_some() {
            self.emit(TokenKind::Dedent, line.start(), out);
        }

        if self.scopes.top_width() != width {
            reporter.report(LexicalIssue::UnmatchedDedent { width }, line.content_start());
            self.scopes
                .push(format!("indent@{}", line.number), width, line.number);
            self.emit(TokenKind::Indent, line.start(), out);
        }
        self.previous_width = width;
    }

    /// Close every open frame at end of input; a pending expectation is dropped
    pub fn finish(&mut self, at: Position, out: &mut VecDeque<Token>) {
        self.expecting = None;
        while self.scopes.pop().is_some() {
            self.emit(TokenKind::Dedent, at, out);
        }
        self.previous_width = 0;
    }

    fn emit(&self, kind: TokenKind, at: Position, out: &mut VecDeque<Token>) {
        log_debug!("Structural token",
            "kind" => kind,
            "line" => at.line,
            "depth" => self.scopes.depth()
        );
        out.push_back(Token::structural(kind, at));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticKind, IndentationIssue};
    use crate::lexical::source::SourceModel;

    fn kinds(out: &VecDeque<Token>) -> Vec<TokenKind> {
        out.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_block_open_and_close() {
        let model = SourceModel::new("if x:\n    y\n        z\nw\n", 4);
        let lines: Vec<_> = model.lines().collect();
        let mut tracker = IndentationTracker::new();
        let mut reporter = ErrorReporter::new();
        let mut out = VecDeque::new();

        tracker.on_line(&lines[0], &mut reporter, &mut out);
        tracker.expect_block("if@1");
        let opened = tracker.on_line(&lines[1], &mut reporter, &mut out);
        assert!(matches!(opened, BlockResolution::Opened(_)));
        assert_eq!(tracker.scopes().depth(), 2);

        tracker.on_line(&lines[2], &mut reporter, &mut out);
        assert_eq!(
            reporter.diagnostics()[0].kind,
            DiagnosticKind::IndentationError(IndentationIssue::UnexpectedIndent)
        );
        assert_eq!(tracker.scopes().depth(), 3);

        tracker.on_line(&lines[3], &mut reporter, &mut out);
        assert_eq!(
            kinds(&out),
            vec![
                TokenKind::Indent,
                TokenKind::Indent,
                TokenKind::Dedent,
                TokenKind::Dedent
            ]
        );
        assert_eq!(tracker.scopes().depth(), 1);
        assert_eq!(reporter.len(), 1);
    }

    #[test]
    fn test_expected_block_missing() {
        let model = SourceModel::new("if True:\nprint(1)\n", 4);
        let lines: Vec<_> = model.lines().collect();
        let mut tracker = IndentationTracker::new();
        let mut reporter = ErrorReporter::new();
        let mut out = VecDeque::new();

        tracker.on_line(&lines[0], &mut reporter, &mut out);
        tracker.expect_block("if@1");
        let resolution = tracker.on_line(&lines[1], &mut reporter, &mut out);

        assert_eq!(resolution, BlockResolution::Missing);
        assert!(out.is_empty());
        let diagnostic = &reporter.diagnostics()[0];
        assert_eq!(
            diagnostic.kind,
            DiagnosticKind::IndentationError(IndentationIssue::ExpectedIndentedBlock)
        );
        assert_eq!(diagnostic.line, 2);
    }

    #[test]
    fn test_dedent_between_levels() {
        let model = SourceModel::new("if a:\n    if b:\n        c\n  d\n", 4);
        let lines: Vec<_> = model.lines().collect();
        let mut tracker = IndentationTracker::new();
        let mut reporter = ErrorReporter::new();
        let mut out = VecDeque::new();

        tracker.on_line(&lines[0], &mut reporter, &mut out);
        tracker.expect_block("if@1");
        tracker.on_line(&lines[1], &mut reporter, &mut out);
        tracker.expect_block("if@2");
        tracker.on_line(&lines[2], &mut reporter, &mut out);
        tracker.on_line(&lines[3], &mut reporter, &mut out);

        assert_eq!(out.iter().filter(|t| t.kind == TokenKind::Dedent).count(), 2);
        assert_eq!(
            reporter.diagnostics()[0].kind,
            DiagnosticKind::IndentationError(IndentationIssue::UnmatchedDedent)
        );
        assert_eq!(reporter.diagnostics()[0].line, 4);
        assert_eq!(tracker.scopes().depth(), 2);
        assert_eq!(tracker.scopes().label(tracker.scopes().current()), "indent@4");
    }

    #[test]
    fn test_unmatched_width_is_reported_once() {
        let source = "a\nif a:\n    if a:\n        c\n  if a:\n      y\n  z\n";
        let model = SourceModel::new(source, 4);
        let lines: Vec<_> = model.lines().collect();
        let mut tracker = IndentationTracker::new();
        let mut reporter = ErrorReporter::new();
        let mut out = VecDeque::new();

        for (index, line) in lines.iter().enumerate() {
            tracker.on_line(line, &mut reporter, &mut out);
            if matches!(index, 1 | 2 | 4) {
                tracker.expect_block(format!("if@{}", line.number));
            }
        }
        tracker.finish(model.end_position(), &mut out);

        let unmatched: Vec<_> = reporter.diagnostics().iter().map(|d| d.line).collect();
        assert_eq!(unmatched, vec![5]);
        let indents = out.iter().filter(|t| t.kind == TokenKind::Indent).count();
        let dedents = out.iter().filter(|t| t.kind == TokenKind::Dedent).count();
        assert_eq!(indents, dedents);
    }

    #[test]
    fn test_finish_flushes_open_frames() {
        let mut tracker = IndentationTracker::new();
        let mut out = VecDeque::new();
        let model = SourceModel::new("def f():\n    x\n", 4);
        let lines: Vec<_> = model.lines().collect();
        let mut reporter = ErrorReporter::new();

        tracker.on_line(&lines[0], &mut reporter, &mut out);
        tracker.expect_block("f");
        tracker.on_line(&lines[1], &mut reporter, &mut out);
        tracker.finish(model.end_position(), &mut out);

        assert_eq!(kinds(&out), vec![TokenKind::Indent, TokenKind::Dedent]);
        assert_eq!(tracker.scopes().depth(), 1);
        assert_eq!(tracker.scopes().frames()[1].label, "f");
        assert_eq!(tracker.scopes().depth_of(ScopeId(1)), 2);
    }
}
