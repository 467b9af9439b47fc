//! Diagnostic taxonomy and the payload-carrying issue descriptions

use crate::logging::codes;
use crate::logging::Code;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndentationIssue {
    ExpectedIndentedBlock,
    UnexpectedIndent,
    UnmatchedDedent,
}

/// Kind of lexical-level error recorded during a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    IndentationError(IndentationIssue),
    UnterminatedStringLiteral,
    UnclosedBlockComment,
    MissingRightHandSide,
    InvalidIdentifier,
    MalformedNumberLiteral,
    MissingCondition,
    MissingColon,
    UndeclaredVariable,
    InvalidCharacter,
    MultipleStatementsPerLine,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IndentationError(_) => "IndentationError",
            Self::UnterminatedStringLiteral => "UnterminatedStringLiteral",
            Self::UnclosedBlockComment => "UnclosedBlockComment",
            Self::MissingRightHandSide => "MissingRightHandSide",
            Self::InvalidIdentifier => "InvalidIdentifier",
            Self::MalformedNumberLiteral => "MalformedNumberLiteral",
            Self::MissingCondition => "MissingCondition",
            Self::MissingColon => "MissingColon",
            Self::UndeclaredVariable => "UndeclaredVariable",
            Self::InvalidCharacter => "InvalidCharacter",
            Self::MultipleStatementsPerLine => "MultipleStatementsPerLine",
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::IndentationError(IndentationIssue::ExpectedIndentedBlock) => {
                codes::indentation::EXPECTED_INDENTED_BLOCK
            }
            Self::IndentationError(IndentationIssue::UnexpectedIndent) => {
                codes::indentation::UNEXPECTED_INDENT
            }
            Self::IndentationError(IndentationIssue::UnmatchedDedent) => {
                codes::indentation::UNMATCHED_DEDENT
            }
            Self::UnterminatedStringLiteral => codes::lexical::UNTERMINATED_STRING,
            Self::UnclosedBlockComment => codes::lexical::UNCLOSED_BLOCK_COMMENT,
            Self::MalformedNumberLiteral => codes::lexical::MALFORMED_NUMBER,
            Self::InvalidIdentifier => codes::lexical::INVALID_IDENTIFIER,
            Self::InvalidCharacter => codes::lexical::INVALID_CHARACTER,
            Self::MissingRightHandSide => codes::statement::MISSING_RIGHT_HAND_SIDE,
            Self::MissingCondition => codes::statement::MISSING_CONDITION,
            Self::MissingColon => codes::statement::MISSING_COLON,
            Self::MultipleStatementsPerLine => codes::statement::MULTIPLE_STATEMENTS,
            Self::UndeclaredVariable => codes::symbols::UNDECLARED_VARIABLE,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A detected problem with the data needed to describe it
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexicalIssue {
    #[error("expected an indented block")]
    ExpectedIndentedBlock,

    #[error("unexpected indent")]
    UnexpectedIndent,

    #[error("indentation does not match any outer level (width {width})")]
    UnmatchedDedent { width: usize },

    #[error("unterminated string literal")]
    UnterminatedString { lexeme: String },

    #[error("unclosed block comment")]
    UnclosedBlockComment { lexeme: String },

    #[error("missing expression after '{operator}'")]
    MissingRightHandSide { operator: String },

    #[error("invalid identifier '{lexeme}'")]
    InvalidIdentifier { lexeme: String },

    #[error("malformed number literal '{lexeme}'")]
    MalformedNumber { lexeme: String },

    #[error("missing condition after '{keyword}'")]
    MissingCondition { keyword: String },

    #[error("expected ':' at end of '{keyword}' statement")]
    MissingColon { keyword: String },

    #[error("use of undeclared variable '{name}'")]
    UndeclaredVariable { name: String },

    #[error("invalid character '{character}'")]
    InvalidCharacter { character: char },

    #[error("multiple statements on one line")]
    MultipleStatements { lexeme: String },
}

impl LexicalIssue {
    pub fn unterminated_string(lexeme: &str) -> Self {
        Self::UnterminatedString {
            lexeme: lexeme.to_string(),
        }
    }

    pub fn unclosed_block_comment(lexeme: &str) -> Self {
        Self::UnclosedBlockComment {
            lexeme: lexeme.to_string(),
        }
    }

    pub fn missing_right_hand_side(operator: &str) -> Self {
        Self::MissingRightHandSide {
            operator: operator.to_string(),
        }
    }

    pub fn invalid_identifier(lexeme: &str) -> Self {
        Self::InvalidIdentifier {
            lexeme: lexeme.to_string(),
        }
    }

    pub fn malformed_number(lexeme: &str) -> Self {
        Self::MalformedNumber {
            lexeme: lexeme.to_string(),
        }
    }

    pub fn missing_condition(keyword: &str) -> Self {
        Self::MissingCondition {
            keyword: keyword.to_string(),
        }
    }

    pub fn missing_colon(keyword: &str) -> Self {
        Self::MissingColon {
            keyword: keyword.to_string(),
        }
    }

    pub fn undeclared_variable(name: &str) -> Self {
        Self::UndeclaredVariable {
            name: name.to_string(),
        }
    }

    pub fn multiple_statements(lexeme: &str) -> Self {
        Self::MultipleStatements {
            lexeme: lexeme.to_string(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::ExpectedIndentedBlock => {
                DiagnosticKind::IndentationError(IndentationIssue::ExpectedIndentedBlock)
            }
            Self::UnexpectedIndent => {
                DiagnosticKind::IndentationError(IndentationIssue::UnexpectedIndent)
            }
            Self::UnmatchedDedent { .. } => {
                DiagnosticKind::IndentationError(IndentationIssue::UnmatchedDedent)
            }
            Self::UnterminatedString { .. } => DiagnosticKind::UnterminatedStringLiteral,
            Self::UnclosedBlockComment { .. } => DiagnosticKind::UnclosedBlockComment,
            Self::MissingRightHandSide { .. } => DiagnosticKind::MissingRightHandSide,
            Self::InvalidIdentifier { .. } => DiagnosticKind::InvalidIdentifier,
            Self::MalformedNumber { .. } => DiagnosticKind::MalformedNumberLiteral,
            Self::MissingCondition { .. } => DiagnosticKind::MissingCondition,
            Self::MissingColon { .. } => DiagnosticKind::MissingColon,
            Self::UndeclaredVariable { .. } => DiagnosticKind::UndeclaredVariable,
            Self::InvalidCharacter { .. } => DiagnosticKind::InvalidCharacter,
            Self::MultipleStatements { .. } => DiagnosticKind::MultipleStatementsPerLine,
        }
    }

    pub fn error_code(&self) -> Code {
        self.kind().error_code()
    }

    /// Source text the issue points at, when it has one
    pub fn lexeme(&self) -> Option<String> {
        match self {
            Self::ExpectedIndentedBlock
            | Self::UnexpectedIndent
            | Self::UnmatchedDedent { .. } => None,
            Self::UnterminatedString { lexeme }
            | Self::UnclosedBlockComment { lexeme }
            | Self::InvalidIdentifier { lexeme }
            | Self::MalformedNumber { lexeme }
            | Self::MultipleStatements { lexeme } => Some(lexeme.clone()),
            Self::MissingRightHandSide { operator } => Some(operator.clone()),
            Self::MissingCondition { keyword } | Self::MissingColon { keyword } => {
                Some(keyword.clone())
            }
            Self::UndeclaredVariable { name } => Some(name.clone()),
            Self::InvalidCharacter { character } => Some(character.to_string()),
        }
    }
}
