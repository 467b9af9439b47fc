//! Scanner state carried from one physical line to the next

use crate::utils::Position;

/// A triple-quoted construct still waiting for its closing quotes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenConstruct {
    TripleString,
    BlockComment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Continuation {
    pub construct: OpenConstruct,
    /// `"""` or `'''`
    pub delimiter: &'static str,
    /// Text so far, including the newlines crossed
    pub text: String,
    pub start: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    pub bracket_depth: usize,
    pub open: Option<Continuation>,
}

impl ScanState {
    /// Next line belongs to the current statement
    pub fn is_continuation(&self) -> bool {
        self.bracket_depth > 0 || self.open.is_some()
    }

    pub fn open_bracket(&mut self) {
        self.bracket_depth += 1;
    }

    pub fn reset_brackets(&mut self) {
        self.bracket_depth = 0;
    }

    /// Never drops below zero on unbalanced closers
    pub fn close_bracket(&mut self) {
        self.bracket_depth = self.bracket_depth.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_depth_saturates() {
        let mut state = ScanState::default();
        state.close_bracket();
        assert_eq!(state.bracket_depth, 0);

        state.open_bracket();
        assert!(state.is_continuation());
        state.close_bracket();
        state.close_bracket();
        assert!(!state.is_continuation());

        state.open_bracket();
        state.open_bracket();
        state.reset_brackets();
        assert!(!state.is_continuation());
    }
}
