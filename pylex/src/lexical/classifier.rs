//! Partitions one physical line into lexemes and assigns token kinds
//!
//! The classifier is created per line and threads the [`ScanState`] explicitly: an open
//! triple-quoted construct or an unclosed bracket survives into the next line through it.

use crate::diagnostics::{ErrorReporter, LexicalIssue};
use crate::lexical::source::LogicalLine;
use crate::lexical::state::{Continuation, OpenConstruct, ScanState};
use crate::tokens::token::{
    is_delimiter, is_identifier_continue, is_identifier_start, is_keyword, match_operator,
};
use crate::tokens::{Token, TokenKind};
use crate::utils::Position;

/// Shape of a digit-led run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberForm {
    Valid,
    /// Second decimal point, empty exponent, bad hex digits
    Malformed,
    /// Digits followed by name characters, e.g. `1variable`
    IdentifierLike,
}

/// Validate a digit-led lexeme
pub fn classify_number(text: &str) -> NumberForm {
    let lower = text.to_ascii_lowercase();
    if let Some(digits) = lower.strip_prefix("0x") {
        let valid =
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit() || c == '_');
        return if valid {
            NumberForm::Valid
        } else {
            NumberForm::Malformed
        };
    }

    let chars: Vec<char> = text.chars().collect();
    let digits = |i: &mut usize| -> usize {
        let start = *i;
        while chars
            .get(*i)
            .is_some_and(|c| c.is_ascii_digit() || *c == '_')
        {
            *i += 1;
        }
        *i - start
    };

    let mut i = 0;
    digits(&mut i);
    if chars.get(i) == Some(&'.') {
        i += 1;
        digits(&mut i);
    }

    if matches!(chars.get(i), Some('e' | 'E')) {
        let mut j = i + 1;
        let signed = matches!(chars.get(j), Some('+' | '-'));
        if signed {
            j += 1;
        }
        if digits(&mut j) == 0 {
            let tail = &chars[j..];
            return if tail.is_empty() || signed || tail.contains(&'.') {
                NumberForm::Malformed
            } else {
                NumberForm::IdentifierLike
            };
        }
        i = j;
    }

    match chars.get(i) {
        None => NumberForm::Valid,
        Some('j' | 'J') if i + 1 == chars.len() => NumberForm::Valid,
        Some('.') => NumberForm::Malformed,
        Some(_) if chars[i..].contains(&'.') => NumberForm::Malformed,
        Some(_) => NumberForm::IdentifierLike,
    }
}

fn is_string_prefix(word: &str) -> bool {
    matches!(
        word.to_ascii_lowercase().as_str(),
        "f" | "r" | "b" | "u" | "fr" | "rf" | "br" | "rb"
    )
}

pub struct TokenClassifier<'a, 'r> {
    line: LogicalLine<'a>,
    chars: Vec<(usize, char)>,
    pos: usize,
    state: &'r mut ScanState,
    reporter: &'r mut ErrorReporter,
    tokens: Vec<Token>,
    at_statement_start: bool,
}

impl<'a, 'r> TokenClassifier<'a, 'r> {
    pub fn new(
        line: LogicalLine<'a>,
        state: &'r mut ScanState,
        reporter: &'r mut ErrorReporter,
    ) -> Self {
        Self {
            chars: line.text.char_indices().collect(),
            line,
            pos: 0,
            state,
            reporter,
            tokens: Vec::new(),
            at_statement_start: false,
        }
    }

    /// Classify the whole line. `at_statement_start` is true when nothing but comments
    /// precedes this line in the current statement.
    pub fn scan(mut self, at_statement_start: bool) -> Vec<Token> {
        self.at_statement_start = at_statement_start;

        if self.state.open.is_some() {
            self.continue_open();
        }

        while let Some(c) = self.peek(self.pos) {
            let start = self.pos;
            match c {
                ' ' | '\t' | '\x0c' => self.pos += 1,
                '#' => {
                    self.pos = self.chars.len();
                    self.push(TokenKind::Comment, start, self.pos);
                }
                '"' | '\'' => self.scan_string(start, 0),
                c if c.is_ascii_digit() => self.scan_number(start),
                c if is_identifier_start(c) => self.scan_word(start),
                c => self.scan_symbol(start, c),
            }
        }

        self.tokens
    }

    /// Close an open construct at end of input, reporting it
    pub fn finish_open(state: &mut ScanState, reporter: &mut ErrorReporter) -> Option<Token> {
        let continuation = state.open.take()?;
        let text = continuation
            .text
            .strip_suffix('\n')
            .unwrap_or(&continuation.text)
            .to_string();

        let (kind, issue) = match continuation.construct {
            OpenConstruct::BlockComment => (
                TokenKind::Comment,
                LexicalIssue::unclosed_block_comment(&text),
            ),
            OpenConstruct::TripleString => {
                (TokenKind::String, LexicalIssue::unterminated_string(&text))
            }
        };
        reporter.report(issue, continuation.start);
        Some(Token::new(kind, text, continuation.start))
    }

    // === CURSOR HELPERS ===

    fn peek(&self, i: usize) -> Option<char> {
        self.chars.get(i).map(|(_, c)| *c)
    }

    fn byte_at(&self, i: usize) -> usize {
        self.chars
            .get(i)
            .map(|(byte, _)| *byte)
            .unwrap_or(self.line.text.len())
    }

    fn position(&self, i: usize) -> Position {
        Position::new(self.line.offset + self.byte_at(i), self.line.number, i + 1)
    }

    fn slice(&self, from: usize, to: usize) -> &'a str {
        let text: &'a str = self.line.text;
        &text[self.byte_at(from)..self.byte_at(to)]
    }

    fn push(&mut self, kind: TokenKind, from: usize, to: usize) {
        let token = Token::new(kind, self.slice(from, to), self.position(from));
        if kind != TokenKind::Comment {
            self.at_statement_start = token.is_delimiter(";") && self.state.bracket_depth == 0;
        }
        self.tokens.push(token);
    }

    // === LEXEME SCANNERS ===

    fn scan_word(&mut self, start: usize) {
        let mut end = start;
        while self.peek(end).is_some_and(is_identifier_continue) {
            end += 1;
        }

        let word = self.slice(start, end);
        if is_string_prefix(word) && matches!(self.peek(end), Some('"' | '\'')) {
            self.scan_string(start, end - start);
            return;
        }

        let kind = if is_keyword(word) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.pos = end;
        self.push(kind, start, end);
    }

    fn scan_number(&mut self, start: usize) {
        let is_hex =
            self.peek(start) == Some('0') && matches!(self.peek(start + 1), Some('x' | 'X'));
        let mut i = start;
        while let Some(c) = self.peek(i) {
            let exponent_sign = matches!(c, '+' | '-')
                && !is_hex
                && matches!(self.peek(i - 1), Some('e' | 'E'))
                && self.chars[start..i - 1]
                    .iter()
                    .all(|(_, d)| d.is_ascii_digit() || *d == '.' || *d == '_');

            if c.is_alphanumeric() || c == '_' || c == '.' || exponent_sign {
                i += 1;
            } else {
                break;
            }
        }

        self.pos = i;
        self.push(TokenKind::Number, start, i);

        let lexeme = self.slice(start, i);
        match classify_number(lexeme) {
            NumberForm::Valid => {}
            NumberForm::Malformed => self
                .reporter
                .report(LexicalIssue::malformed_number(lexeme), self.position(start)),
            NumberForm::IdentifierLike => self
                .reporter
                .report(LexicalIssue::invalid_identifier(lexeme), self.position(start)),
        }
    }

    fn scan_string(&mut self, start: usize, prefix_len: usize) {
        let quote_at = start + prefix_len;
        let Some(quote) = self.peek(quote_at) else {
            return;
        };
        let triple =
            self.peek(quote_at + 1) == Some(quote) && self.peek(quote_at + 2) == Some(quote);

        if triple {
            let block_comment = self.at_statement_start && self.state.bracket_depth == 0;
            match self.find_triple_close(quote_at + 3, quote) {
                Some(end) => {
                    self.pos = end;
                    let kind = if block_comment {
                        TokenKind::Comment
                    } else {
                        TokenKind::String
                    };
                    self.push(kind, start, end);
                }
                None => {
                    let construct = if block_comment {
                        OpenConstruct::BlockComment
                    } else {
                        OpenConstruct::TripleString
                    };
                    let mut text = self.slice(start, self.chars.len()).to_string();
                    text.push('\n');
                    self.state.open = Some(Continuation {
                        construct,
                        delimiter: if quote == '"' { "\"\"\"" } else { "'''" },
                        text,
                        start: self.position(start),
                    });
                    self.at_statement_start = false;
                    self.pos = self.chars.len();
                }
            }
            return;
        }

        let mut i = quote_at + 1;
        loop {
            match self.peek(i) {
                None => {
                    let end = self.chars.len();
                    self.pos = end;
                    self.push(TokenKind::String, start, end);
                    let lexeme = self.slice(start, end);
                    self.reporter
                        .report(LexicalIssue::unterminated_string(lexeme), self.position(start));
                    // the next line starts a fresh statement
                    self.state.reset_brackets();
                    return;
                }
                Some('\\') => i += 2,
                Some(c) if c == quote => {
                    i += 1;
                    break;
                }
                Some(_) => i += 1,
            }
        }

        self.pos = i;
        self.push(TokenKind::String, start, i);
    }

    /// Index just past the closing triple quote
    fn find_triple_close(&self, from: usize, quote: char) -> Option<usize> {
        let mut i = from;
        while let Some(c) = self.peek(i) {
            if c == '\\' {
                i += 2;
                continue;
            }
            if c == quote && self.peek(i + 1) == Some(quote) && self.peek(i + 2) == Some(quote) {
                return Some(i + 3);
            }
            i += 1;
        }
        None
    }

    fn continue_open(&mut self) {
        let Some(mut continuation) = self.state.open.take() else {
            return;
        };
        let quote = continuation.delimiter.chars().next().unwrap_or('"');

        match self.find_triple_close(0, quote) {
            Some(end) => {
                continuation.text.push_str(self.slice(0, end));
                let kind = match continuation.construct {
                    OpenConstruct::BlockComment => TokenKind::Comment,
                    OpenConstruct::TripleString => TokenKind::String,
                };
                self.tokens
                    .push(Token::new(kind, continuation.text, continuation.start));
                if kind != TokenKind::Comment {
                    self.at_statement_start = false;
                }
                self.pos = end;
            }
            None => {
                continuation.text.push_str(self.line.text);
                continuation.text.push('\n');
                self.state.open = Some(continuation);
                self.pos = self.chars.len();
            }
        }
    }

    fn scan_symbol(&mut self, start: usize, c: char) {
        let rest = self.slice(start, self.chars.len());
        if let Some(op) = match_operator(rest) {
            let end = start + op.chars().count();
            self.pos = end;
            self.push(TokenKind::Operator, start, end);
            return;
        }

        if is_delimiter(c) {
            match c {
                '(' | '[' | '{' => self.state.open_bracket(),
                ')' | ']' | '}' => self.state.close_bracket(),
                _ => {}
            }
            self.pos = start + 1;
            self.push(TokenKind::Delimiter, start, start + 1);
            return;
        }

        self.reporter
            .report(LexicalIssue::InvalidCharacter { character: c }, self.position(start));
        self.pos = start + 1;
    }
}
