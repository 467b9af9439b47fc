//! Source text split into physical lines with measured indentation

use crate::utils::Position;

/// One physical line of source. `text` excludes the line terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalLine<'a> {
    /// 1-based line number
    pub number: usize,
    pub text: &'a str,
    /// Leading whitespace width with tabs expanded
    pub indent_width: usize,
    /// Byte offset of the first character in the source
    pub offset: usize,
}

impl<'a> LogicalLine<'a> {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn is_comment_only(&self) -> bool {
        self.content().starts_with('#')
    }

    /// Text after the leading whitespace
    pub fn content(&self) -> &'a str {
        self.text.trim_start_matches(is_indent_char)
    }

    /// Number of leading whitespace characters
    pub fn indent_chars(&self) -> usize {
        self.text.chars().take_while(|c| is_indent_char(*c)).count()
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Position of column 1
    pub fn start(&self) -> Position {
        Position::new(self.offset, self.number, 1)
    }

    /// Position of the first non-whitespace character
    pub fn content_start(&self) -> Position {
        let skipped = self.text.len() - self.content().len();
        Position::new(self.offset + skipped, self.number, self.indent_chars() + 1)
    }
}

fn is_indent_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Indentation width of `text`; a tab advances to the next multiple of `tab_width`
pub fn measure_indentation(text: &str, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    text.chars()
        .take_while(|c| is_indent_char(*c))
        .fold(0, |width, c| match c {
            '\t' => (width / tab_width + 1) * tab_width,
            ' ' => width + 1,
            _ => width,
        })
}

/// Raw source plus the tab width used for indentation
#[derive(Debug, Clone, Copy)]
pub struct SourceModel<'a> {
    source: &'a str,
    tab_width: usize,
}

impl<'a> SourceModel<'a> {
    pub fn new(source: &'a str, tab_width: usize) -> Self {
        Self { source, tab_width }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// A fresh pass over the lines; calling again restarts from the top
    pub fn lines(&self) -> LogicalLines<'a> {
        LogicalLines {
            source: self.source,
            tab_width: self.tab_width,
            offset: 0,
            number: 0,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    /// Where END_OF_INPUT sits: after a trailing newline it opens the next line,
    /// otherwise it follows the last character
    pub fn end_position(&self) -> Position {
        let len = self.source.len();
        if self.source.is_empty() {
            return Position::start();
        }
        if self.source.ends_with('\n') {
            return Position::new(len, self.line_count() + 1, 1);
        }
        match self.lines().last() {
            Some(line) => Position::new(len, line.number, line.char_len() + 1),
            None => Position::start(),
        }
    }
}

/// Lazy iterator over the physical lines of a source
#[derive(Debug, Clone)]
pub struct LogicalLines<'a> {
    source: &'a str,
    tab_width: usize,
    offset: usize,
    number: usize,
}

impl<'a> Iterator for LogicalLines<'a> {
    type Item = LogicalLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.source.get(self.offset..)?;
        if rest.is_empty() {
            return None;
        }

        let (raw, consumed) = match rest.find('\n') {
            Some(end) => (&rest[..end], end + 1),
            None => (rest, rest.len()),
        };
        let text = raw.strip_suffix('\r').unwrap_or(raw);

        self.number += 1;
        let line = LogicalLine {
            number: self.number,
            text,
            indent_width: measure_indentation(text, self.tab_width),
            offset: self.offset,
        };
        self.offset += consumed;
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_indentation_expands_tabs() {
        assert_eq!(measure_indentation("    x", 4), 4);
        assert_eq!(measure_indentation("\tx", 4), 4);
        assert_eq!(measure_indentation("  \tx", 4), 4);
        assert_eq!(measure_indentation("     \tx", 4), 8);
        assert_eq!(measure_indentation("\tx", 8), 8);
        assert_eq!(measure_indentation("x", 4), 0);
    }

    #[test]
    fn test_trailing_newline_adds_no_line() {
        let model = SourceModel::new("a = 1\nb = 2\n", 4);
        let lines: Vec<_> = model.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].text, "b = 2");
        assert_eq!(lines[1].offset, 6);
        assert_eq!(model.end_position(), Position::new(12, 3, 1));

        let model = SourceModel::new("a = 1", 4);
        assert_eq!(model.line_count(), 1);
        assert_eq!(model.end_position(), Position::new(5, 1, 6));

        assert_eq!(SourceModel::new("", 4).line_count(), 0);
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let model = SourceModel::new("if x:\r\n\r\n    # note\r\n    y\r\n", 4);
        let lines: Vec<_> = model.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].text, "if x:");
        assert!(lines[1].is_blank());
        assert!(lines[2].is_comment_only());
        assert_eq!(lines[3].indent_width, 4);
        assert_eq!(lines[3].content_start().column, 5);
    }

    #[test]
    fn test_lines_are_restartable() {
        let model = SourceModel::new("a\nb\n", 4);
        let first: Vec<_> = model.lines().map(|l| l.text).collect();
        let second: Vec<_> = model.lines().map(|l| l.text).collect();
        assert_eq!(first, second);
    }
}
