//! Symbol table for use-before-declaration detection
//!
//! Names are declared per scope as assignment-like statements are analysed. Scope identity comes
//! from the indentation tracker's frame arena, so a lookup walks the currently open frames from
//! innermost to outermost.

use crate::logging::codes;
use crate::{log_debug, log_success};

pub mod table;

pub use table::{
    Declaration, SymbolEntry, SymbolKind, SymbolRecord, SymbolSnapshot, SymbolTable, ValueHint,
};

/// Log the completed table
pub fn log_symbol_summary(snapshot: &SymbolSnapshot) {
    for record in &snapshot.entries {
        log_debug!("Symbol declared",
            "id" => record.id,
            "name" => record.name.as_str(),
            "kind" => record.kind,
            "scope" => record.scope.as_str()
        );
    }

    let functions = snapshot
        .entries
        .iter()
        .filter(|r| r.kind == SymbolKind::Function)
        .count();
    let classes = snapshot
        .entries
        .iter()
        .filter(|r| r.kind == SymbolKind::Class)
        .count();

    log_success!(
        codes::success::SYMBOL_TABLE_COMPLETE,
        "Symbol table completed",
        "symbols" => snapshot.len(),
        "functions" => functions,
        "classes" => classes
    );
}
