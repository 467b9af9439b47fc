//! Statement-level checks on a completed logical statement
//!
//! Runs once per statement after its last physical line is classified. Detects missing
//! conditions, colons and right-hand sides, juxtaposed statements and stray identifiers, and
//! feeds bindings and reads into the symbol table.

use crate::diagnostics::{ErrorReporter, LexicalIssue};
use crate::lexical::indentation::ScopeStack;
use crate::symbols::{Declaration, SymbolKind, SymbolTable, ValueHint};
use crate::tokens::token::is_block_keyword;
use crate::tokens::{Token, TokenKind};

/// A header line that wants an indented body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOpening {
    /// Frame label: the defined name for `def`/`class`, `<keyword>@<line>` otherwise
    pub label: String,
    pub keyword: String,
    /// Names local to the new frame (function parameters)
    pub locals: Vec<Declaration>,
}

/// Names found in an expression, grouped by how they are resolved
#[derive(Debug, Default)]
struct ExpressionNames<'t> {
    reads: Vec<&'t Token>,
    /// Lambda parameters and comprehension targets
    bound: Vec<&'t Token>,
    /// Targets of `:=`
    walrus: Vec<&'t Token>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExpressionMode {
    Normal,
    ComprehensionTarget(usize),
    LambdaParams(usize),
}

fn opens_bracket(token: &Token) -> bool {
    token.kind == TokenKind::Delimiter && matches!(token.lexeme.as_str(), "(" | "[" | "{")
}

fn closes_bracket(token: &Token) -> bool {
    token.kind == TokenKind::Delimiter && matches!(token.lexeme.as_str(), ")" | "]" | "}")
}

fn track_depth(depth: &mut usize, token: &Token) {
    if opens_bracket(token) {
        *depth += 1;
    } else if closes_bracket(token) {
        *depth = depth.saturating_sub(1);
    }
}

/// Identifiers that act as keywords only when they lead a block header
const SOFT_KEYWORDS: &[&str] = &["match", "case"];

/// The statement ends with `:` outside any bracket
fn ends_with_block_colon(tokens: &[&Token]) -> bool {
    let Some((last, rest)) = tokens.split_last() else {
        return false;
    };
    let mut depth = 0usize;
    for token in rest {
        track_depth(&mut depth, token);
    }
    depth == 0 && last.is_delimiter(":")
}

/// `match command:` or `case [x, y]:`
fn is_soft_keyword_header(tokens: &[&Token]) -> bool {
    tokens.len() > 2
        && tokens[0].is_identifier()
        && SOFT_KEYWORDS.contains(&tokens[0].lexeme.as_str())
        && ends_with_block_colon(tokens)
}

/// Split on tokens matching `is_separator` outside brackets; empty parts are dropped
fn split_top_level<'p, 't>(
    tokens: &'p [&'t Token],
    is_separator: impl Fn(&Token) -> bool,
) -> Vec<&'p [&'t Token]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        if depth == 0 && is_separator(token) {
            if i > start {
                parts.push(&tokens[start..i]);
            }
            start = i + 1;
        }
        track_depth(&mut depth, token);
    }
    if start < tokens.len() {
        parts.push(&tokens[start..]);
    }
    parts
}

/// First index of a token matching `predicate` outside brackets
fn find_top_level(tokens: &[&Token], predicate: impl Fn(&Token) -> bool) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        if depth == 0 && predicate(token) {
            return Some(i);
        }
        track_depth(&mut depth, token);
    }
    None
}

fn collect_expression<'t>(tokens: &[&'t Token]) -> ExpressionNames<'t> {
    let mut names = ExpressionNames::default();
    let mut mode = ExpressionMode::Normal;
    let mut depth = 0usize;

    for (i, &token) in tokens.iter().enumerate() {
        let prev = i.checked_sub(1).and_then(|p| tokens.get(p)).copied();
        let next = tokens.get(i + 1).copied();

        match token.kind {
            TokenKind::Delimiter => {
                track_depth(&mut depth, token);
                if mode == ExpressionMode::LambdaParams(depth) && token.is_delimiter(":") {
                    mode = ExpressionMode::Normal;
                }
            }
            TokenKind::Keyword => match token.lexeme.as_str() {
                "for" => mode = ExpressionMode::ComprehensionTarget(depth),
                "in" if mode == ExpressionMode::ComprehensionTarget(depth) => {
                    mode = ExpressionMode::Normal
                }
                "lambda" => mode = ExpressionMode::LambdaParams(depth),
                _ => {}
            },
            TokenKind::Identifier => {
                if prev.is_some_and(|p| p.is_delimiter(".")) {
                    continue;
                }
                match mode {
                    ExpressionMode::ComprehensionTarget(_) => names.bound.push(token),
                    ExpressionMode::LambdaParams(_) => {
                        let is_param = prev.is_some_and(|p| {
                            p.is_keyword("lambda")
                                || p.is_delimiter(",")
                                || p.is_operator("*")
                                || p.is_operator("**")
                        });
                        if is_param {
                            names.bound.push(token);
                        } else {
                            names.reads.push(token);
                        }
                    }
                    ExpressionMode::Normal => {
                        if next.is_some_and(|n| n.is_operator(":=")) {
                            names.walrus.push(token);
                        } else if depth > 0 && next.is_some_and(|n| n.is_operator("=")) {
                            // keyword argument name
                        } else {
                            names.reads.push(token);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    names
}

/// Split an assignment target into bound names and names it reads
fn split_target<'t>(target: &[&'t Token], bindings: &mut Vec<&'t Token>, reads: &mut Vec<&'t Token>) {
    let (names, annotation) = match find_top_level(target, |t| t.is_delimiter(":")) {
        Some(colon) => (&target[..colon], &target[colon + 1..]),
        None => (target, &target[target.len()..]),
    };
    reads.extend(collect_expression(annotation).reads);

    // true for grouping brackets, false for calls and subscripts
    let mut brackets: Vec<bool> = Vec::new();
    for (i, &token) in names.iter().enumerate() {
        let prev = i.checked_sub(1).and_then(|p| names.get(p)).copied();
        let next = names.get(i + 1).copied();

        if opens_bracket(token) {
            brackets.push(prev.map_or(true, |p| !p.ends_operand()));
            continue;
        }
        if closes_bracket(token) {
            brackets.pop();
            continue;
        }
        if !token.is_identifier() || prev.is_some_and(|p| p.is_delimiter(".")) {
            continue;
        }

        let unpacking = brackets.iter().all(|grouping| *grouping);
        let accessed = next.is_some_and(|n| n.is_delimiter(".") || n.is_delimiter("(") || n.is_delimiter("["));
        if unpacking && !accessed {
            bindings.push(token);
        } else if !brackets.is_empty() && next.is_some_and(|n| n.is_operator("=")) {
            // keyword argument inside a call target
        } else {
            reads.push(token);
        }
    }
}

pub struct StatementAnalyzer<'r> {
    symbols: &'r mut SymbolTable,
    scopes: &'r ScopeStack,
    reporter: &'r mut ErrorReporter,
}

impl<'r> StatementAnalyzer<'r> {
    pub fn new(
        symbols: &'r mut SymbolTable,
        scopes: &'r ScopeStack,
        reporter: &'r mut ErrorReporter,
    ) -> Self {
        Self {
            symbols,
            scopes,
            reporter,
        }
    }

    /// Analyse one logical statement; returns the block it opens, if any
    pub fn analyze(&mut self, tokens: &[Token]) -> Option<BlockOpening> {
        let significant: Vec<&Token> = tokens
            .iter()
            .filter(|t| {
                !matches!(
                    t.kind,
                    TokenKind::Comment
                        | TokenKind::Indent
                        | TokenKind::Dedent
                        | TokenKind::EndOfInput
                )
            })
            .collect();

        let mut opening = None;
        for part in split_top_level(&significant, |t| t.is_delimiter(";")) {
            let simples = if is_soft_keyword_header(part) {
                vec![part]
            } else {
                self.split_juxtaposed(part)
            };
            for simple in simples {
                opening = self.analyze_simple(simple);
            }
        }
        opening
    }

    /// Break a statement where an operand is directly followed by another operand.
    ///
    /// A lone identifier before the break is a stray name (`he llo = 1`); anything longer is a
    /// complete statement followed by a second one on the same line.
    fn split_juxtaposed<'p, 't>(&mut self, part: &'p [&'t Token]) -> Vec<&'p [&'t Token]> {
        let mut segments = Vec::new();
        let mut start = 0;
        let mut depth = 0usize;

        for i in 0..part.len() {
            if i > start && depth == 0 {
                let (prev, next) = (part[i - 1], part[i]);
                let from_import = part[start].is_keyword("from") && next.is_keyword("import");
                let both_strings = prev.kind == TokenKind::String && next.kind == TokenKind::String;

                if prev.ends_operand() && next.starts_operand() && !both_strings && !from_import {
                    if i - start == 1 && part[start].is_identifier() {
                        self.reporter.report(
                            LexicalIssue::invalid_identifier(&part[start].lexeme),
                            part[start].start(),
                        );
                    } else {
                        self.reporter
                            .report(LexicalIssue::multiple_statements(&next.lexeme), next.start());
                        segments.push(&part[start..i]);
                    }
                    start = i;
                }
            }
            track_depth(&mut depth, part[i]);
        }

        if start < part.len() {
            segments.push(&part[start..]);
        }
        segments
    }

    fn analyze_simple(&mut self, tokens: &[&Token]) -> Option<BlockOpening> {
        let first = *tokens.first()?;
        let keyword_led = first.kind == TokenKind::Keyword
            && (is_block_keyword(&first.lexeme) || first.is_keyword("async"));

        if !keyword_led && ends_with_block_colon(tokens) {
            return Some(self.analyze_colon_header(tokens));
        }

        if first.kind == TokenKind::Keyword {
            match first.lexeme.as_str() {
                kw if is_block_keyword(kw) => return self.analyze_block(tokens),
                "async" => return self.analyze_simple(&tokens[1..]),
                "import" => self.declare_imports(&tokens[1..]),
                "from" => {
                    if let Some(at) = tokens.iter().position(|t| t.is_keyword("import")) {
                        self.declare_imports(&tokens[at + 1..]);
                    }
                }
                "global" | "nonlocal" => {
                    for name in tokens[1..].iter().filter(|t| t.is_identifier()) {
                        self.declare(name, SymbolKind::Variable, None);
                    }
                }
                _ => self.analyze_assignment(tokens),
            }
            return None;
        }

        self.analyze_assignment(tokens);
        None
    }

    fn analyze_block(&mut self, tokens: &[&Token]) -> Option<BlockOpening> {
        let keyword = tokens[0];
        let kw = keyword.lexeme.as_str();
        let colon = find_top_level(tokens, |t| t.is_delimiter(":"));
        let header = &tokens[1..colon.unwrap_or(tokens.len())];

        if matches!(kw, "if" | "elif" | "while" | "for") && header.is_empty() {
            self.reporter
                .report(LexicalIssue::missing_condition(kw), keyword.start());
        } else if colon.is_none() {
            self.reporter
                .report(LexicalIssue::missing_colon(kw), keyword.start());
        }

        let named = header.first().filter(|t| t.is_identifier());
        let label = match (kw, named) {
            ("def" | "class", Some(name)) => name.lexeme.clone(),
            _ => format!("{}@{}", kw, keyword.line),
        };

        let locals = match kw {
            "def" => self.analyze_def(header),
            "class" => {
                if let Some(name) = named {
                    self.declare(name, SymbolKind::Class, None);
                    self.analyze_expression(&header[1..]);
                } else {
                    self.analyze_expression(header);
                }
                Vec::new()
            }
            "for" => {
                self.analyze_for(header);
                Vec::new()
            }
            "with" | "except" => {
                self.analyze_as_clauses(header);
                Vec::new()
            }
            _ => {
                self.analyze_expression(header);
                Vec::new()
            }
        };

        let body = colon.map(|c| &tokens[c + 1..]).unwrap_or_default();
        if body.is_empty() {
            return Some(BlockOpening {
                label,
                keyword: kw.to_string(),
                locals,
            });
        }

        // one-line body: `if ready: start()`
        for local in locals {
            self.symbols.declare(local, self.scopes.open());
        }
        for simple in self.split_juxtaposed(body) {
            self.analyze_simple(simple);
        }
        None
    }

    /// Any other statement ending in `:` also wants an indented body
    fn analyze_colon_header(&mut self, tokens: &[&Token]) -> BlockOpening {
        let lead = tokens[0];
        let header = &tokens[..tokens.len() - 1];

        if is_soft_keyword_header(tokens) && lead.lexeme == "case" {
            self.analyze_case_pattern(&header[1..]);
        } else if is_soft_keyword_header(tokens) {
            self.analyze_expression(&header[1..]);
        } else {
            self.analyze_expression(header);
        }

        BlockOpening {
            label: format!("{}@{}", lead.lexeme, lead.line),
            keyword: lead.lexeme.clone(),
            locals: Vec::new(),
        }
    }

    /// Bare names in a pattern capture; dotted names and class patterns are reads
    fn analyze_case_pattern(&mut self, pattern: &[&Token]) {
        let (pattern, guard) = match find_top_level(pattern, |t| t.is_keyword("if")) {
            Some(at) => (&pattern[..at], &pattern[at + 1..]),
            None => (pattern, &pattern[pattern.len()..]),
        };

        let mut reads = Vec::new();
        for (i, &token) in pattern.iter().enumerate() {
            if !token.is_identifier() || token.lexeme == "_" {
                continue;
            }
            if i > 0 && pattern[i - 1].is_delimiter(".") {
                continue;
            }
            match pattern.get(i + 1) {
                // keyword pattern `Point(x=0)`
                Some(next) if next.is_operator("=") => {}
                Some(next) if next.is_delimiter(".") || next.is_delimiter("(") => {
                    reads.push(token)
                }
                _ => self.declare(token, SymbolKind::Variable, None),
            }
        }
        self.resolve_reads(&reads);
        self.analyze_expression(guard);
    }

    fn analyze_def(&mut self, header: &[&Token]) -> Vec<Declaration> {
        let Some(name) = header.first().copied().filter(|t| t.is_identifier()) else {
            self.analyze_expression(header);
            return Vec::new();
        };
        self.declare(name, SymbolKind::Function, None);

        let mut locals = Vec::new();
        let mut reads = Vec::new();
        let mut depth = 0usize;
        for (i, &token) in header.iter().enumerate().skip(1) {
            track_depth(&mut depth, token);
            if !token.is_identifier() {
                continue;
            }
            let prev = header[i - 1];
            let is_param = depth == 1
                && (prev.is_delimiter("(")
                    || prev.is_delimiter(",")
                    || prev.is_operator("*")
                    || prev.is_operator("**"));
            if is_param {
                locals.push(Declaration::new(token, SymbolKind::Parameter));
            } else if !prev.is_delimiter(".") {
                reads.push(token);
            }
        }

        self.resolve_reads(&reads);
        locals
    }

    fn analyze_for(&mut self, header: &[&Token]) {
        let Some(at) = find_top_level(header, |t| t.is_keyword("in")) else {
            for target in header.iter().filter(|t| t.is_identifier()) {
                self.declare(target, SymbolKind::LoopVariable, None);
            }
            return;
        };

        self.analyze_expression(&header[at + 1..]);

        let mut bindings = Vec::new();
        let mut reads = Vec::new();
        split_target(&header[..at], &mut bindings, &mut reads);
        self.resolve_reads(&reads);
        for target in bindings {
            self.declare(target, SymbolKind::LoopVariable, None);
        }
    }

    /// `with a as b, c as d` and `except E as e`
    fn analyze_as_clauses(&mut self, header: &[&Token]) {
        let mut bindings = Vec::new();
        for item in split_top_level(header, |t| t.is_delimiter(",")) {
            match find_top_level(item, |t| t.is_keyword("as")) {
                Some(at) => {
                    self.analyze_expression(&item[..at]);
                    let mut reads = Vec::new();
                    split_target(&item[at + 1..], &mut bindings, &mut reads);
                    self.resolve_reads(&reads);
                }
                None => self.analyze_expression(item),
            }
        }
        for name in bindings {
            self.declare(name, SymbolKind::Variable, None);
        }
    }

    /// `import a.b as c, d` declares `c` and `d`
    fn declare_imports(&mut self, names: &[&Token]) {
        let names: Vec<&Token> = names
            .iter()
            .copied()
            .filter(|t| !t.is_delimiter("(") && !t.is_delimiter(")"))
            .collect();
        for item in split_top_level(&names, |t| t.is_delimiter(",")) {
            let alias = item
                .iter()
                .position(|t| t.is_keyword("as"))
                .and_then(|at| item.get(at + 1));
            let name = alias.or_else(|| item.iter().find(|t| t.is_identifier()));
            if let Some(name) = name {
                self.declare(name, SymbolKind::Import, None);
            }
        }
    }

    fn analyze_assignment(&mut self, tokens: &[&Token]) {
        let mut operators = Vec::new();
        let mut depth = 0usize;
        for (i, token) in tokens.iter().enumerate() {
            if depth == 0 && token.is_keyword("lambda") {
                break;
            }
            if depth == 0 && token.is_assignment_operator() {
                operators.push(i);
            }
            track_depth(&mut depth, token);
        }

        let Some(&last) = operators.last() else {
            self.analyze_expression(tokens);
            return;
        };

        if last + 1 == tokens.len() {
            self.reporter.report(
                LexicalIssue::missing_right_hand_side(&tokens[last].lexeme),
                tokens[last].start(),
            );
        }

        let value = &tokens[last + 1..];
        let augmented = operators.iter().any(|&i| !tokens[i].is_operator("="));

        let mut bindings = Vec::new();
        let mut target_reads = Vec::new();
        let mut start = 0;
        for &op in &operators {
            split_target(&tokens[start..op], &mut bindings, &mut target_reads);
            start = op + 1;
        }
        if augmented {
            target_reads.extend(bindings.iter().copied());
        }

        let value_names = collect_expression(value);
        for name in value_names.bound.iter().chain(&value_names.walrus) {
            self.declare(name, SymbolKind::Variable, None);
        }
        self.resolve_reads(&value_names.reads);
        self.resolve_reads(&target_reads);

        let hint = if operators.len() == 1 && !augmented && bindings.len() == 1 {
            ValueHint::infer(&value.iter().map(|t| (*t).clone()).collect::<Vec<_>>())
        } else {
            None
        };
        for target in bindings {
            self.declare(target, SymbolKind::Variable, hint);
        }
    }

    fn analyze_expression(&mut self, tokens: &[&Token]) {
        let names = collect_expression(tokens);
        for name in names.bound.iter().chain(&names.walrus) {
            self.declare(name, SymbolKind::Variable, None);
        }
        self.resolve_reads(&names.reads);
    }

    fn resolve_reads(&mut self, reads: &[&Token]) {
        for read in reads {
            if !self.symbols.is_visible(&read.lexeme, self.scopes.open()) {
                self.reporter
                    .report(LexicalIssue::undeclared_variable(&read.lexeme), read.start());
            }
        }
    }

    fn declare(&mut self, token: &Token, kind: SymbolKind, hint: Option<ValueHint>) {
        let declaration = Declaration::new(token, kind).with_value_hint(hint);
        self.symbols.declare(declaration, self.scopes.open());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use crate::lexical::classifier::TokenClassifier;
    use crate::lexical::source::SourceModel;
    use crate::lexical::state::ScanState;

    struct Outcome {
        opening: Option<BlockOpening>,
        reporter: ErrorReporter,
        symbols: SymbolTable,
    }

    /// Classify a single-line statement and analyse it at global scope
    fn analyze(text: &str) -> Outcome {
        let model = SourceModel::new(text, 4);
        let mut state = ScanState::default();
        let mut reporter = ErrorReporter::new();
        let mut tokens = Vec::new();
        for line in model.lines() {
            let at_start = tokens.is_empty();
            tokens.extend(TokenClassifier::new(line, &mut state, &mut reporter).scan(at_start));
        }

        let scopes = ScopeStack::new();
        let mut symbols = SymbolTable::new();
        let opening = StatementAnalyzer::new(&mut symbols, &scopes, &mut reporter).analyze(&tokens);
        Outcome {
            opening,
            reporter,
            symbols,
        }
    }

    fn kinds(outcome: &Outcome) -> Vec<DiagnosticKind> {
        outcome.reporter.diagnostics().iter().map(|d| d.kind).collect()
    }

    #[test]
    fn test_missing_right_hand_side() {
        let outcome = analyze("y = ");
        assert_eq!(kinds(&outcome), vec![DiagnosticKind::MissingRightHandSide]);
        assert_eq!(outcome.reporter.diagnostics()[0].column, 3);
    }

    #[test]
    fn test_missing_condition_takes_precedence() {
        for source in ["if:", "while:", "for:", "if"] {
            let outcome = analyze(source);
            assert_eq!(kinds(&outcome), vec![DiagnosticKind::MissingCondition], "{source}");
        }
    }

    #[test]
    fn test_missing_colon_still_opens_block() {
        let outcome = analyze("if True");
        assert_eq!(kinds(&outcome), vec![DiagnosticKind::MissingColon]);
        assert_eq!(outcome.opening.map(|o| o.label), Some("if@1".to_string()));
    }

    #[test]
    fn test_trailing_colon_opens_block() {
        let outcome = analyze("match command:");
        assert_eq!(kinds(&outcome), vec![DiagnosticKind::UndeclaredVariable]);
        let opening = outcome.opening.expect("header opens a block");
        assert_eq!((opening.label.as_str(), opening.keyword.as_str()), ("match@1", "match"));

        let outcome = analyze("case Point(x=0, y=depth) if depth > 1:");
        assert_eq!(kinds(&outcome), vec![DiagnosticKind::UndeclaredVariable]);
        assert_eq!(outcome.reporter.diagnostics()[0].lexeme.as_deref(), Some("Point"));
        assert_eq!(outcome.symbols.entries()[0].name, "depth");
        assert_eq!(outcome.opening.map(|o| o.label), Some("case@1".to_string()));

        let outcome = analyze("names = {1: \"one\", 2: \"two\"}");
        assert!(outcome.opening.is_none());
        assert!(outcome.reporter.is_empty());
    }

    #[test]
    fn test_stray_identifier() {
        let outcome = analyze("he llo = \"Hello\"");
        assert_eq!(kinds(&outcome), vec![DiagnosticKind::InvalidIdentifier]);
        assert_eq!(outcome.reporter.diagnostics()[0].lexeme.as_deref(), Some("he"));
        assert!(outcome.symbols.lookup("llo", &[crate::lexical::indentation::ScopeId::GLOBAL]).is_some());
    }

    #[test]
    fn test_multiple_statements_per_line() {
        let outcome = analyze("X = 10 y=20");
        assert_eq!(kinds(&outcome), vec![DiagnosticKind::MultipleStatementsPerLine]);
        assert_eq!(outcome.reporter.diagnostics()[0].column, 8);
        assert_eq!(outcome.symbols.len(), 2);
    }

    #[test]
    fn test_read_before_declaration() {
        let outcome = analyze("x = x + 1");
        assert_eq!(kinds(&outcome), vec![DiagnosticKind::UndeclaredVariable]);
        assert_eq!(outcome.reporter.diagnostics()[0].column, 5);
        assert_eq!(outcome.symbols.len(), 1);
    }

    #[test]
    fn test_attribute_and_keyword_argument_names_are_not_reads() {
        let outcome = analyze("items = []; print(items.count, sep=\",\", end=str(len(items)))");
        assert!(outcome.reporter.is_empty());
    }

    #[test]
    fn test_def_collects_parameters() {
        let outcome = analyze("def area(width, height=1, *rest, **extra) -> float:");
        assert!(outcome.reporter.is_empty());
        let opening = outcome.opening.expect("def opens a block");
        assert_eq!(opening.label, "area");
        let params: Vec<_> = opening.locals.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(params, vec!["width", "height", "rest", "extra"]);
        assert_eq!(outcome.symbols.entries()[0].kind, SymbolKind::Function);
    }

    #[test]
    fn test_comprehension_and_lambda_names_are_bound() {
        let outcome = analyze("squares = [n * n for n in range(10) if n]");
        assert!(outcome.reporter.is_empty());

        let outcome = analyze("double = lambda v, w=2: v * w");
        assert!(outcome.reporter.is_empty());
    }

    #[test]
    fn test_one_line_body_is_analysed() {
        let outcome = analyze("if True: flag = missing");
        assert!(outcome.opening.is_none());
        assert_eq!(kinds(&outcome), vec![DiagnosticKind::UndeclaredVariable]);
        assert_eq!(outcome.symbols.entries()[0].name, "flag");
    }

    #[test]
    fn test_imports_and_as_targets() {
        let outcome = analyze("import os.path as osp, sys");
        let names: Vec<_> = outcome.symbols.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["osp", "sys"]);

        let outcome = analyze("from collections import (deque, OrderedDict as OD)");
        assert!(outcome.reporter.is_empty());
        let names: Vec<_> = outcome.symbols.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["deque", "OD"]);

        let outcome = analyze("with open(\"f\") as handle:");
        assert!(outcome.reporter.is_empty());
        assert_eq!(outcome.symbols.entries()[0].name, "handle");
    }

    #[test]
    fn test_subscript_target_reads_container() {
        let outcome = analyze("table[key] = 1");
        assert_eq!(
            kinds(&outcome),
            vec![
                DiagnosticKind::UndeclaredVariable,
                DiagnosticKind::UndeclaredVariable
            ]
        );
        assert!(outcome.symbols.is_empty());
    }

    #[test]
    fn test_value_hint_recorded() {
        let outcome = analyze("count = 10");
        assert_eq!(outcome.symbols.entries()[0].value_hint, Some(ValueHint::Int));

        let outcome = analyze("a, b = 1, 2");
        assert_eq!(outcome.symbols.len(), 2);
        assert_eq!(outcome.symbols.entries()[0].value_hint, None);
    }
}
