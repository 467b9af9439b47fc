//! Source location tracking
//!
//! Lines and columns are 1-based; columns count characters of the raw line, so a tab
//! occupies one column here even though it widens indentation.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, in characters)
    pub column: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Offset 0, line 1, column 1
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Advance position by one character
    pub fn advance(self, ch: char) -> Self {
        match ch {
            '\n' => Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
            },
            _ => Self {
                offset: self.offset + ch.len_utf8(),
                line: self.line,
                column: self.column + 1,
            },
        }
    }

    /// Advance position over a whole string
    pub fn advance_str(self, s: &str) -> Self {
        s.chars().fold(self, |pos, ch| pos.advance(ch))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text from start to end position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Span covering `text` starting at `start`
    pub fn covering(start: Position, text: &str) -> Self {
        Self::new(start, start.advance_str(text))
    }

    /// Zero-width span, used for structural tokens
    pub fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Source text for this span; `None` when the span does not fit the input
    pub fn slice<'a>(&self, input: &'a str) -> Option<&'a str> {
        input.get(self.start.offset..self.end.offset)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A source map that tracks line starts for position lookup and error rendering
#[derive(Debug, Clone)]
pub struct SourceMap {
    pub source: String,
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: String) -> Self {
        let mut line_starts = vec![0];
        for (offset, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(offset + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// Get a line of text by line number (1-based), without its terminator
    pub fn get_line(&self, line_num: usize) -> Option<&str> {
        let line_idx = line_num.checked_sub(1)?;
        let start = *self.line_starts.get(line_idx)?;
        let end = match self.line_starts.get(line_idx + 1) {
            Some(next) => next - 1,
            None => self.source.len(),
        };

        self.source
            .get(start..end)
            .map(|line| line.trim_end_matches('\r'))
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Format an error message with the offending line and a caret underline
    pub fn format_error(&self, span: &Span, message: &str) -> String {
        let mut result = String::new();

        result.push_str(&format!("error: {}\n", message));
        result.push_str(&format!(
            "  --> {}:{}\n",
            span.start.line, span.start.column
        ));

        if let Some(line) = self.get_line(span.start.line) {
            let line_num_str = span.start.line.to_string();
            let padding = " ".repeat(line_num_str.len());

            result.push_str(&format!(" {} |\n", padding));
            result.push_str(&format!("{} | {}\n", line_num_str, line));

            let line_chars = line.chars().count();
            let span_len = if span.start.line == span.end.line {
                span.end.column.saturating_sub(span.start.column)
            } else {
                (line_chars + 1).saturating_sub(span.start.column)
            };

            result.push_str(&format!(
                " {} | {}{}\n",
                padding,
                " ".repeat(span.start.column.saturating_sub(1)),
                "^".repeat(span_len.max(1))
            ));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_counts_characters() {
        let pos = Position::start().advance_str("a\tb");
        assert_eq!(pos.column, 4);
        assert_eq!(pos.offset, 3);

        let pos = Position::start().advance_str("x = \"é\"\ny");
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 2);
    }

    #[test]
    fn test_get_line() {
        let map = SourceMap::new("x = 1\r\nif x:\n    y = 2".to_string());

        assert_eq!(map.line_count(), 3);
        assert_eq!(map.get_line(1), Some("x = 1"));
        assert_eq!(map.get_line(3), Some("    y = 2"));
        assert_eq!(map.get_line(4), None);
        assert_eq!(map.get_line(0), None);
    }

    #[test]
    fn test_format_error_underlines_span() {
        let map = SourceMap::new("numb2 = 1.1.0".to_string());
        let start = Position::new(8, 1, 9);
        let span = Span::covering(start, "1.1.0");

        let rendered = map.format_error(&span, "malformed number literal '1.1.0'");
        assert!(rendered.contains("--> 1:9"));
        assert!(rendered.contains("1 | numb2 = 1.1.0"));
        assert!(rendered.contains("        ^^^^^"));
        assert_eq!(span.slice(&map.source), Some("1.1.0"));
    }

    #[test]
    fn test_point_span_is_empty() {
        let point = Span::point(Position::new(4, 1, 5));
        assert!(point.is_empty());
        assert_eq!(point.len(), 0);
        assert_eq!(point.to_string(), "1:5-5");

        let keyword = Span::covering(Position::start(), "while");
        assert_eq!(keyword.len(), 5);
        assert_eq!(keyword.to_string(), "1:1-6");
    }
}
