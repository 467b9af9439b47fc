//! Streaming scanner that drives the line model, indentation tracker, classifier and statement
//! analysis, yielding tokens lazily.

use crate::config::compile_time::lexical::TOKEN_BUFFER_CAPACITY;
use crate::diagnostics::{Diagnostic, ErrorReporter};
use crate::lexical::classifier::TokenClassifier;
use crate::lexical::indentation::{BlockResolution, IndentationTracker, ScopeStack};
use crate::lexical::report::{ScanMetrics, ScanReport};
use crate::lexical::source::{LogicalLine, LogicalLines, SourceModel};
use crate::lexical::state::ScanState;
use crate::lexical::statement::StatementAnalyzer;
use crate::lexical::ScanConfig;
use crate::logging::codes;
use crate::symbols::{log_symbol_summary, Declaration, SymbolTable};
use crate::tokens::{Token, TokenKind};
use crate::utils::Position;
use crate::{log_debug, log_success, log_warning};
use std::collections::VecDeque;

pub struct Scanner<'a> {
    lines: LogicalLines<'a>,
    end: Position,
    config: ScanConfig,
    tracker: IndentationTracker,
    state: ScanState,
    symbols: SymbolTable,
    reporter: ErrorReporter,
    buffer: VecDeque<Token>,
    /// Tokens of the statement being assembled, across continuation lines
    statement: Vec<Token>,
    /// Parameters waiting for the block their header announced
    pending_locals: Vec<Declaration>,
    metrics: ScanMetrics,
    finished: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, config: &ScanConfig) -> Self {
        let config = config.normalized();
        let model = SourceModel::new(source, config.tab_width);

        log_debug!("Starting scan",
            "bytes" => source.len(),
            "tab_width" => config.tab_width
        );

        Self {
            lines: model.lines(),
            end: model.end_position(),
            config,
            tracker: IndentationTracker::new(),
            state: ScanState::default(),
            symbols: SymbolTable::new(),
            reporter: ErrorReporter::new(),
            buffer: VecDeque::with_capacity(TOKEN_BUFFER_CAPACITY),
            statement: Vec::new(),
            pending_locals: Vec::new(),
            metrics: ScanMetrics {
                max_depth: 1,
                ..ScanMetrics::default()
            },
            finished: false,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.reporter.diagnostics()
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn scopes(&self) -> &ScopeStack {
        self.tracker.scopes()
    }

    /// Drain the remaining tokens and collect everything the scan produced
    pub fn into_report(mut self) -> ScanReport {
        let tokens: Vec<Token> = self.by_ref().collect();

        self.metrics.diagnostics = self.reporter.len();
        let symbols = self.symbols.snapshot(self.tracker.scopes());
        log_symbol_summary(&symbols);

        ScanReport {
            tokens,
            diagnostics: self.reporter.into_diagnostics(),
            symbols,
            metrics: self.metrics,
        }
    }

    fn process_line(&mut self, line: LogicalLine<'a>) {
        self.metrics.record_line(&line);
        self.check_line_length(&line);

        if !self.state.is_continuation() && !line.is_blank() && !line.is_comment_only() {
            let resolution = self
                .tracker
                .on_line(&line, &mut self.reporter, &mut self.buffer);
            self.resolve_pending_locals(resolution);
            self.metrics.record_depth(self.tracker.scopes().depth());
        }

        let at_statement_start = self.statement.iter().all(|t| t.kind == TokenKind::Comment);
        let tokens = TokenClassifier::new(line, &mut self.state, &mut self.reporter)
            .scan(at_statement_start);
        self.statement.extend(tokens.iter().cloned());
        self.buffer.extend(tokens);

        if !self.state.is_continuation() {
            self.complete_statement();
        }
    }

    fn check_line_length(&mut self, line: &LogicalLine<'_>) {
        let Some(limit) = self.config.max_line_length else {
            return;
        };
        let length = line.char_len();
        if length > limit {
            self.metrics.long_lines += 1;
            log_warning!(
                code = codes::warnings::LINE_TOO_LONG,
                "Line exceeds maximum length",
                "line" => line.number,
                "length" => length,
                "limit" => limit
            );
        }
    }

    fn complete_statement(&mut self) {
        if self.statement.is_empty() {
            return;
        }
        let statement = std::mem::take(&mut self.statement);

        let opening =
            StatementAnalyzer::new(&mut self.symbols, self.tracker.scopes(), &mut self.reporter)
                .analyze(&statement);

        if let Some(opening) = opening {
            log_debug!("Block header",
                "keyword" => opening.keyword.as_str(),
                "label" => opening.label.as_str()
            );
            self.tracker.expect_block(opening.label);
            self.pending_locals = opening.locals;
        }
    }

    fn resolve_pending_locals(&mut self, resolution: BlockResolution) {
        match resolution {
            BlockResolution::Opened(scope) => {
                for local in std::mem::take(&mut self.pending_locals) {
                    self.symbols.declare_local(local, scope);
                }
            }
            BlockResolution::Missing => self.declare_pending_in_open_scopes(),
            BlockResolution::NotExpected => {}
        }
    }

    fn declare_pending_in_open_scopes(&mut self) {
        for local in std::mem::take(&mut self.pending_locals) {
            self.symbols.declare(local, self.tracker.scopes().open());
        }
    }

    fn finish_input(&mut self) {
        if let Some(token) = TokenClassifier::finish_open(&mut self.state, &mut self.reporter) {
            self.statement.push(token.clone());
            self.buffer.push_back(token);
        }
        self.complete_statement();
        self.declare_pending_in_open_scopes();

        self.tracker.finish(self.end, &mut self.buffer);
        self.buffer
            .push_back(Token::structural(TokenKind::EndOfInput, self.end));
        self.finished = true;

        log_success!(
            codes::success::SCAN_COMPLETE,
            "Scan completed",
            "lines" => self.metrics.lines,
            "diagnostics" => self.reporter.len(),
            "symbols" => self.symbols.len()
        );
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.buffer.pop_front() {
                self.metrics
                    .record_token(&token, self.config.collect_detailed_metrics);
                return Some(token);
            }
            if self.finished {
                return None;
            }
            match self.lines.next() {
                Some(line) => self.process_line(line),
                None => self.finish_input(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticKind, IndentationIssue};
    use crate::symbols::SymbolKind;

    fn scan(source: &str) -> ScanReport {
        Scanner::new(source, &ScanConfig::default()).into_report()
    }

    fn kinds(report: &ScanReport) -> Vec<TokenKind> {
        report.tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokens_are_lazy() {
        let mut scanner = Scanner::new("a = 1\nb = 2\n", &ScanConfig::default());
        let first = scanner.next().expect("first token");
        assert_eq!(first.lexeme, "a");
        assert!(scanner.diagnostics().is_empty());
        assert_eq!(scanner.symbols().len(), 1);
        assert_eq!(scanner.symbols().entries()[0].name, "a");
    }

    #[test]
    fn test_nested_blocks_balance() {
        let report = scan("def f(a):\n    if a:\n        return a\n    return 0\nprint(f(1))\n");
        assert!(report.is_clean(), "{:?}", report.diagnostics);
        let stream = report.token_stream();
        assert_eq!(stream.count_of(TokenKind::Indent), 2);
        assert_eq!(stream.count_of(TokenKind::Dedent), 2);
        assert_eq!(report.tokens.last().map(|t| t.kind), Some(TokenKind::EndOfInput));
        assert_eq!(report.metrics.max_depth, 3);

        let param = report.symbols.find("a").expect("parameter recorded");
        assert_eq!(param.kind, SymbolKind::Parameter);
        assert_eq!(param.scope, "f");
    }

    #[test]
    fn test_dedents_precede_next_statement() {
        let report = scan("if x:\n    y = 1\nz = 2");
        let tail: Vec<_> = kinds(&report).into_iter().skip_while(|k| *k != TokenKind::Dedent).collect();
        assert_eq!(tail[0], TokenKind::Dedent);
        assert_eq!(report.tokens.iter().find(|t| t.kind == TokenKind::Dedent).map(|t| t.line), Some(3));
    }

    #[test]
    fn test_end_of_input_closes_open_blocks() {
        let report = scan("class A:\n    def m(self):\n        pass");
        let stream = report.token_stream();
        assert_eq!(stream.count_of(TokenKind::Indent), stream.count_of(TokenKind::Dedent));
        let eoi = report.tokens.last().expect("end of input");
        assert_eq!((eoi.line, eoi.column), (3, 13));
    }

    #[test]
    fn test_continuation_lines_skip_indentation() {
        let report = scan("total = sum([\n        1,\n    2])\nprint(total)\n");
        assert!(report.is_clean(), "{:?}", report.diagnostics);
        assert_eq!(report.token_stream().count_of(TokenKind::Indent), 0);
    }

    #[test]
    fn test_missing_block_declares_params_in_enclosing_scope() {
        let report = scan("def f(a):\nprint(a)\n");
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(
            report.diagnostics[0].kind,
            DiagnosticKind::IndentationError(IndentationIssue::ExpectedIndentedBlock)
        );
        assert_eq!(report.symbols.find("a").map(|r| r.scope.as_str()), Some("global"));
    }

    #[test]
    fn test_long_lines_counted() {
        let config = ScanConfig {
            max_line_length: Some(5),
            ..ScanConfig::default()
        };
        let report = Scanner::new("x = 1\nlonger = 2\n", &config).into_report();
        assert_eq!(report.metrics.long_lines, 1);
        assert!(report.is_clean());
    }

    #[test]
    fn test_detailed_metrics() {
        let config = ScanConfig {
            collect_detailed_metrics: true,
            ..ScanConfig::default()
        };
        let report = Scanner::new("x = 1\n", &config).into_report();
        assert_eq!(report.metrics.token_count, 4);
        assert_eq!(report.metrics.kind_counts.get(&TokenKind::Identifier), Some(&1));
    }
}
