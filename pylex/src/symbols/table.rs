//! Per-scope identifier declarations and use-before-declaration lookup

use crate::config::compile_time::symbols::INITIAL_SYMBOL_CAPACITY;
use crate::lexical::indentation::{ScopeId, ScopeStack};
use crate::tokens::token::{is_builtin, Token, TokenKind};
use crate::utils::Position;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// How a name came into existence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Variable,
    Function,
    Class,
    Parameter,
    Import,
    LoopVariable,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Function => "function",
            SymbolKind::Class => "class",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Import => "import",
            SymbolKind::LoopVariable => "loop_variable",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shape of the value first assigned to a variable, when the right-hand side is one literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueHint {
    Int,
    Float,
    String,
    Bool,
    None,
    List,
    Tuple,
    Dict,
    Call,
}

impl ValueHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueHint::Int => "int",
            ValueHint::Float => "float",
            ValueHint::String => "string",
            ValueHint::Bool => "bool",
            ValueHint::None => "none",
            ValueHint::List => "list",
            ValueHint::Tuple => "tuple",
            ValueHint::Dict => "dict",
            ValueHint::Call => "call",
        }
    }

    /// Infer a hint from right-hand side tokens
    pub fn infer(rhs: &[Token]) -> Option<Self> {
        let first = rhs.first()?;
        let last = rhs.last()?;

        if rhs.len() == 1 {
            return match first.kind {
                TokenKind::Number => Some(number_hint(&first.lexeme)),
                TokenKind::String => Some(ValueHint::String),
                TokenKind::Keyword => match first.lexeme.as_str() {
                    "True" | "False" => Some(ValueHint::Bool),
                    "None" => Some(ValueHint::None),
                    _ => None,
                },
                _ => None,
            };
        }

        if !encloses(rhs) {
            return None;
        }
        match (first.lexeme.as_str(), last.lexeme.as_str()) {
            ("[", "]") => Some(ValueHint::List),
            ("(", ")") => Some(ValueHint::Tuple),
            ("{", "}") => Some(ValueHint::Dict),
            _ if first.is_identifier() && rhs[1].is_delimiter("(") && last.is_delimiter(")") => {
                Some(ValueHint::Call)
            }
            _ => None,
        }
    }
}

fn number_hint(lexeme: &str) -> ValueHint {
    let lower = lexeme.to_ascii_lowercase();
    if lower.starts_with("0x") {
        ValueHint::Int
    } else if lower.contains('.') || lower.contains('e') {
        ValueHint::Float
    } else {
        ValueHint::Int
    }
}

/// True when the bracket opened by the first bracket token closes on the last token
fn encloses(rhs: &[Token]) -> bool {
    let Some(open_at) = rhs
        .iter()
        .position(|t| t.kind == TokenKind::Delimiter && matches!(t.lexeme.as_str(), "(" | "[" | "{"))
    else {
        return false;
    };
    if open_at > 1 {
        return false;
    }

    let mut depth = 0usize;
    for (i, token) in rhs.iter().enumerate().skip(open_at) {
        match token.lexeme.as_str() {
            "(" | "[" | "{" if token.kind == TokenKind::Delimiter => depth += 1,
            ")" | "]" | "}" if token.kind == TokenKind::Delimiter => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i == rhs.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub id: usize,
    pub name: String,
    /// Scope that was innermost when the name was declared
    pub scope: ScopeId,
    pub line: usize,
    pub column: usize,
    pub kind: SymbolKind,
    pub value_hint: Option<ValueHint>,
}

/// A name being introduced, before it is placed in a scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub at: Position,
    pub kind: SymbolKind,
    pub value_hint: Option<ValueHint>,
}

impl Declaration {
    pub fn new(token: &Token, kind: SymbolKind) -> Self {
        Self {
            name: token.lexeme.clone(),
            at: token.start(),
            kind,
            value_hint: None,
        }
    }

    pub fn with_value_hint(mut self, hint: Option<ValueHint>) -> Self {
        self.value_hint = hint;
        self
    }
}

/// Entries are never removed during a scan
#[derive(Debug, Clone)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
    by_name: HashMap<String, Vec<usize>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(INITIAL_SYMBOL_CAPACITY),
            by_name: HashMap::new(),
        }
    }

    /// Visible entry for `name`, searching the open scopes innermost first
    pub fn lookup(&self, name: &str, open_scopes: &[ScopeId]) -> Option<&SymbolEntry> {
        let candidates = self.by_name.get(name)?;
        open_scopes.iter().rev().find_map(|scope| {
            candidates
                .iter()
                .rev()
                .map(|&i| &self.entries[i])
                .find(|entry| entry.scope == *scope)
        })
    }

    /// Builtins are always visible
    pub fn is_visible(&self, name: &str, open_scopes: &[ScopeId]) -> bool {
        is_builtin(name) || self.lookup(name, open_scopes).is_some()
    }

    /// Reuse a visible entry or insert one in the innermost open scope; returns the entry id
    pub fn declare(&mut self, declaration: Declaration, open_scopes: &[ScopeId]) -> usize {
        if let Some(existing) = self.lookup(&declaration.name, open_scopes) {
            return existing.id;
        }
        let scope = open_scopes.last().copied().unwrap_or(ScopeId::GLOBAL);
        self.insert(declaration, scope)
    }

    /// Insert in `scope` unless that exact scope already has the name, shadowing outer entries
    pub fn declare_local(&mut self, declaration: Declaration, scope: ScopeId) -> usize {
        if let Some(existing) = self.lookup(&declaration.name, &[scope]) {
            return existing.id;
        }
        self.insert(declaration, scope)
    }

    fn insert(&mut self, declaration: Declaration, scope: ScopeId) -> usize {
        let id = self.entries.len();
        self.by_name
            .entry(declaration.name.clone())
            .or_default()
            .push(id);
        self.entries.push(SymbolEntry {
            id,
            name: declaration.name,
            scope,
            line: declaration.at.line,
            column: declaration.at.column,
            kind: declaration.kind,
            value_hint: declaration.value_hint,
        });
        id
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    pub fn get(&self, id: usize) -> Option<&SymbolEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Owned, serializable view with scope labels resolved
    pub fn snapshot(&self, scopes: &ScopeStack) -> SymbolSnapshot {
        SymbolSnapshot {
            entries: self
                .entries
                .iter()
                .map(|entry| SymbolRecord {
                    id: entry.id,
                    name: entry.name.clone(),
                    kind: entry.kind,
                    scope: scopes.label(entry.scope).to_string(),
                    scope_depth: scopes.depth_of(entry.scope),
                    line: entry.line,
                    column: entry.column,
                    value_hint: entry.value_hint,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub id: usize,
    pub name: String,
    pub kind: SymbolKind,
    pub scope: String,
    /// Nesting depth of the declaring scope; the global scope is 1
    pub scope_depth: usize,
    pub line: usize,
    pub column: usize,
    pub value_hint: Option<ValueHint>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSnapshot {
    pub entries: Vec<SymbolRecord>,
}

impl SymbolSnapshot {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&SymbolRecord> {
        self.entries.iter().find(|record| record.name == name)
    }

    pub fn all_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SymbolRecord> {
        self.entries.iter().filter(move |record| record.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str, line: usize, column: usize) -> Token {
        Token::new(TokenKind::Identifier, name, Position::new(0, line, column))
    }

    fn tok(kind: TokenKind, lexeme: &str) -> Token {
        Token::new(kind, lexeme, Position::start())
    }

    #[test]
    fn test_declare_reuses_visible_entry() {
        let mut scopes = ScopeStack::new();
        let global = scopes.current();
        let mut table = SymbolTable::new();

        let first = table.declare(
            Declaration::new(&ident("count", 1, 1), SymbolKind::Variable),
            scopes.open(),
        );

        let inner = scopes.push("if@2", 4, 2);
        let again = table.declare(
            Declaration::new(&ident("count", 3, 5), SymbolKind::Variable),
            scopes.open(),
        );

        assert_eq!(first, again);
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].scope, global);
        assert!(table.lookup("count", &[global, inner]).is_some());
    }

    #[test]
    fn test_declare_local_shadows_outer_entry() {
        let mut scopes = ScopeStack::new();
        let mut table = SymbolTable::new();
        table.declare(
            Declaration::new(&ident("x", 1, 1), SymbolKind::Variable),
            scopes.open(),
        );

        let body = scopes.push("f", 4, 2);
        table.declare_local(Declaration::new(&ident("x", 2, 7), SymbolKind::Parameter), body);

        assert_eq!(table.len(), 2);
        let visible = table.lookup("x", scopes.open()).map(|e| e.kind);
        assert_eq!(visible, Some(SymbolKind::Parameter));

        scopes.pop();
        let visible = table.lookup("x", scopes.open()).map(|e| e.kind);
        assert_eq!(visible, Some(SymbolKind::Variable));
    }

    #[test]
    fn test_inner_declaration_not_visible_outside() {
        let mut scopes = ScopeStack::new();
        let mut table = SymbolTable::new();
        scopes.push("while@1", 4, 1);
        table.declare(
            Declaration::new(&ident("tmp", 2, 5), SymbolKind::Variable),
            scopes.open(),
        );
        scopes.pop();

        assert!(!table.is_visible("tmp", scopes.open()));
        assert!(table.is_visible("print", scopes.open()));
    }

    #[test]
    fn test_value_hint_inference() {
        let number = |s: &str| vec![tok(TokenKind::Number, s)];
        assert_eq!(ValueHint::infer(&number("10")), Some(ValueHint::Int));
        assert_eq!(ValueHint::infer(&number("2.5")), Some(ValueHint::Float));
        assert_eq!(ValueHint::infer(&number("0xFF")), Some(ValueHint::Int));
        assert_eq!(ValueHint::infer(&number("1e5")), Some(ValueHint::Float));
        assert_eq!(
            ValueHint::infer(&[tok(TokenKind::Keyword, "None")]),
            Some(ValueHint::None)
        );

        let list = vec![
            tok(TokenKind::Delimiter, "["),
            tok(TokenKind::Number, "1"),
            tok(TokenKind::Delimiter, "]"),
        ];
        assert_eq!(ValueHint::infer(&list), Some(ValueHint::List));

        let call = vec![
            ident("input", 1, 1),
            tok(TokenKind::Delimiter, "("),
            tok(TokenKind::Delimiter, ")"),
        ];
        assert_eq!(ValueHint::infer(&call), Some(ValueHint::Call));

        let sum = vec![
            tok(TokenKind::Number, "1"),
            tok(TokenKind::Operator, "+"),
            tok(TokenKind::Number, "2"),
        ];
        assert_eq!(ValueHint::infer(&sum), None);

        let two_calls = vec![
            ident("f", 1, 1),
            tok(TokenKind::Delimiter, "("),
            tok(TokenKind::Delimiter, ")"),
            tok(TokenKind::Operator, "+"),
            ident("g", 1, 7),
            tok(TokenKind::Delimiter, "("),
            tok(TokenKind::Delimiter, ")"),
        ];
        assert_eq!(ValueHint::infer(&two_calls), None);
    }

    #[test]
    fn test_snapshot_resolves_labels() {
        let mut scopes = ScopeStack::new();
        let mut table = SymbolTable::new();
        let body = scopes.push("greet", 4, 1);
        table.declare_local(
            Declaration::new(&ident("name", 1, 11), SymbolKind::Parameter),
            body,
        );

        let snapshot = table.snapshot(&scopes);
        let record = snapshot.find("name").cloned();
        assert_eq!(record.as_ref().map(|r| r.scope.as_str()), Some("greet"));
        assert_eq!(record.map(|r| r.scope_depth), Some(2));
    }
}
