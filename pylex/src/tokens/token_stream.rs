//! Completed token sequence: structural checks, counts and source reconstruction

use crate::tokens::token::{Token, TokenKind};

/// The ordered output of a scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    // === COUNTS ===

    pub fn count_of(&self, kind: TokenKind) -> usize {
        self.tokens.iter().filter(|t| t.kind == kind).count()
    }

    /// Running INDENT/DEDENT balance; never negative for a well-formed stream
    pub fn max_depth(&self) -> usize {
        let mut depth = 0usize;
        let mut max = 0usize;
        for token in &self.tokens {
            match token.kind {
                TokenKind::Indent => {
                    depth += 1;
                    max = max.max(depth);
                }
                TokenKind::Dedent => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        max
    }

    pub fn is_balanced(&self) -> bool {
        self.count_of(TokenKind::Indent) == self.count_of(TokenKind::Dedent)
    }

    pub fn has_end_of_input(&self) -> bool {
        self.tokens
            .last()
            .is_some_and(|token| token.kind == TokenKind::EndOfInput)
    }

    /// Rebuild source text from lexemes using line/column deltas.
    ///
    /// Gaps between tokens are filled with spaces, so the result only matches the input when
    /// indentation uses spaces and no characters were skipped.
    pub fn reconstruct_source(&self) -> String {
        let mut out = String::new();
        let mut line = 1usize;
        let mut column = 1usize;

        for token in &self.tokens {
            if matches!(token.kind, TokenKind::Indent | TokenKind::Dedent) {
                continue;
            }

            while line < token.line {
                out.push('\n');
                line += 1;
                column = 1;
            }
            if token.kind == TokenKind::EndOfInput {
                break;
            }

            if token.column > column {
                out.extend(std::iter::repeat(' ').take(token.column - column));
                column = token.column;
            }

            for ch in token.lexeme.chars() {
                out.push(ch);
                if ch == '\n' {
                    line += 1;
                    column = 1;
                } else {
                    column += 1;
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    fn token(kind: TokenKind, lexeme: &str, offset: usize, line: usize, column: usize) -> Token {
        Token::new(kind, lexeme, Position::new(offset, line, column))
    }

    fn sample() -> TokenStream {
        TokenStream::new(vec![
            token(TokenKind::Keyword, "if", 0, 1, 1),
            token(TokenKind::Identifier, "x", 3, 1, 4),
            token(TokenKind::Delimiter, ":", 4, 1, 5),
            token(TokenKind::Comment, "# yes", 6, 1, 7),
            Token::structural(TokenKind::Indent, Position::new(12, 2, 1)),
            token(TokenKind::Keyword, "pass", 16, 2, 5),
            Token::structural(TokenKind::Dedent, Position::new(21, 3, 1)),
            Token::structural(TokenKind::EndOfInput, Position::new(21, 3, 1)),
        ])
    }

    #[test]
    fn test_counts_and_balance() {
        let stream = sample();
        assert!(stream.is_balanced());
        assert!(stream.has_end_of_input());
        assert_eq!(stream.max_depth(), 1);
        assert_eq!(stream.count_of(TokenKind::Keyword), 2);
        assert_eq!(stream.count_of(TokenKind::String), 0);
        assert_eq!(stream.len(), 8);
    }

    #[test]
    fn test_reconstruct_source() {
        assert_eq!(sample().reconstruct_source(), "if x: # yes\n    pass\n");
    }
}
