//! Token kinds, the token value, and the fixed keyword/operator tables
use crate::utils::{Position, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification assigned to every lexeme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Number,
    String,
    Operator,
    Delimiter,
    Comment,
    Indent,
    Dedent,
    EndOfInput,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Delimiter => "DELIMITER",
            TokenKind::Comment => "COMMENT",
            TokenKind::Indent => "INDENT",
            TokenKind::Dedent => "DEDENT",
            TokenKind::EndOfInput => "END_OF_INPUT",
        }
    }

    /// INDENT, DEDENT and END_OF_INPUT carry no source text
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            TokenKind::Indent | TokenKind::Dedent | TokenKind::EndOfInput
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified lexeme with its source location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text; empty for structural tokens
    pub lexeme: String,
    /// 1-based physical line of the first character
    pub line: usize,
    /// 1-based character column of the first character
    pub column: usize,
    /// Byte offset of the first character in the source
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, start: Position) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line: start.line,
            column: start.column,
            offset: start.offset,
        }
    }

    /// INDENT, DEDENT or END_OF_INPUT at the given position
    pub fn structural(kind: TokenKind, at: Position) -> Self {
        debug_assert!(kind.is_structural());
        Self::new(kind, String::new(), at)
    }

    pub fn start(&self) -> Position {
        Position::new(self.offset, self.line, self.column)
    }

    pub fn span(&self) -> Span {
        Span::covering(self.start(), &self.lexeme)
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.lexeme == word
    }

    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.lexeme == op
    }

    pub fn is_delimiter(&self, delim: &str) -> bool {
        self.kind == TokenKind::Delimiter && self.lexeme == delim
    }

    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    /// `=` or any augmented/walrus assignment operator
    pub fn is_assignment_operator(&self) -> bool {
        self.kind == TokenKind::Operator && is_assignment_operator(&self.lexeme)
    }

    /// Token that can close an operand: a name, a literal, or a closing bracket
    pub fn ends_operand(&self) -> bool {
        match self.kind {
            TokenKind::Identifier | TokenKind::Number | TokenKind::String => true,
            TokenKind::Delimiter => matches!(self.lexeme.as_str(), ")" | "]" | "}"),
            TokenKind::Keyword => matches!(self.lexeme.as_str(), "True" | "False" | "None"),
            _ => false,
        }
    }

    /// Token that can only begin a new operand or statement
    pub fn starts_operand(&self) -> bool {
        match self.kind {
            TokenKind::Identifier | TokenKind::Number | TokenKind::String => true,
            TokenKind::Keyword => STATEMENT_KEYWORDS.contains(&self.lexeme.as_str()),
            _ => false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.is_structural() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} '{}'", self.kind, self.lexeme)
        }
    }
}

pub const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Names that are always visible without a declaration
pub const BUILTINS: &[&str] = &[
    "print", "input", "len", "range", "str", "int", "float", "bool", "list", "dict", "set",
    "tuple", "lower", "upper", "open", "enumerate", "zip", "map", "filter", "sorted", "reversed",
    "max", "min", "sum", "abs", "round", "any", "all", "isinstance", "type", "super", "object",
    "repr", "format", "iter", "next", "hasattr", "getattr", "setattr", "id", "chr", "ord",
    "Exception", "ValueError", "TypeError", "KeyError", "IndexError", "RuntimeError",
    "StopIteration", "NotImplementedError", "__name__", "__file__",
];

/// Keywords that open an indented block and therefore need a trailing colon
pub const BLOCK_KEYWORDS: &[&str] = &[
    "if", "elif", "else", "for", "while", "def", "class", "try", "except", "finally", "with",
];

/// Keywords that can only begin a statement
pub const STATEMENT_KEYWORDS: &[&str] = &[
    "def", "class", "return", "import", "pass", "break", "continue", "while", "for", "del",
    "global", "nonlocal", "assert", "with", "try", "raise",
];

/// Operators longest first so the first prefix match is the maximal munch
pub const OPERATORS: &[&str] = &[
    "**=", "//=", ">>=", "<<=", "**", "//", "==", "!=", "<=", ">=", "+=", "-=", "*=", "/=",
    "%=", "&=", "|=", "^=", "->", "<<", ">>", ":=", "+", "-", "*", "/", "%", "=", "<", ">",
    "&", "|", "^", "~", "@",
];

pub const DELIMITERS: &[char] = &['(', ')', '[', ']', '{', '}', ',', ':', '.', ';'];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains(&name)
}

pub fn is_block_keyword(word: &str) -> bool {
    BLOCK_KEYWORDS.contains(&word)
}

pub fn is_assignment_operator(op: &str) -> bool {
    matches!(
        op,
        "=" | "+=" | "-=" | "*=" | "/=" | "//=" | "%=" | "**=" | "&=" | "|=" | "^=" | ">>="
            | "<<=" | ":="
    )
}

/// Longest operator at the start of `rest`
pub fn match_operator(rest: &str) -> Option<&'static str> {
    OPERATORS.iter().copied().find(|op| rest.starts_with(op))
}

pub fn is_delimiter(ch: char) -> bool {
    DELIMITERS.contains(&ch)
}

pub fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

pub fn is_identifier_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
