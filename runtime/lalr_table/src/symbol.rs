//! Compact identifiers for grammar symbols, automaton states, and rules.
//!
//! Terminals and nonterminals share one numeric space: terminals occupy the
//! low codes (`0..terminal_count`), nonterminals follow. Code `0` is reserved
//! for the end-of-input terminal in every grammar.

use std::fmt;

/// A grammar symbol code.
///
/// Terminals come first in the numeric space, nonterminals after them; the
/// split point is [`Grammar::terminal_count`](crate::Grammar::terminal_count).
/// The absence of a symbol is modeled as `Option<SymbolId>`, never as a
/// reserved code.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct SymbolId(u16);

impl SymbolId {
    /// The end-of-input terminal. Reserved in every grammar.
    pub const END: SymbolId = SymbolId(0);

    /// Create from a raw code.
    #[inline]
    pub const fn new(code: u16) -> Self {
        SymbolId(code)
    }

    /// Get the raw code.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Whether this is the end-of-input terminal.
    #[inline]
    pub const fn is_end(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sym{}", self.0)
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_end() {
            write!(f, "$")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// An automaton state number.
///
/// State `0` is the synthetic start state that occupies slot 0 of the parse
/// stack for the whole parse.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct StateId(u16);

impl StateId {
    /// The start state.
    pub const START: StateId = StateId(0);

    /// Create from a raw state number.
    #[inline]
    pub const fn new(state: u16) -> Self {
        StateId(state)
    }

    /// Get the raw state number.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A grammar rule number, assigned in the order rules are declared.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct RuleId(u16);

impl RuleId {
    /// Create from a raw rule number.
    #[inline]
    pub const fn new(rule: u16) -> Self {
        RuleId(rule)
    }

    /// Get the raw rule number.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_symbol_is_code_zero() {
        assert_eq!(SymbolId::END.raw(), 0);
        assert!(SymbolId::END.is_end());
        assert!(!SymbolId::new(1).is_end());
    }

    #[test]
    fn display_marks_end_of_input() {
        assert_eq!(SymbolId::END.to_string(), "$");
        assert_eq!(SymbolId::new(7).to_string(), "7");
        assert_eq!(format!("{:?}", StateId::new(3)), "s3");
        assert_eq!(format!("{:?}", RuleId::new(2)), "r2");
    }
}
