//! Grammar rules as the engine sees them: an LHS nonterminal and an arity.

use crate::symbol::SymbolId;

/// One grammar rule, reduced to what a reduction needs: the nonterminal it
/// produces and how many stack frames it consumes.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Rule {
    /// The nonterminal on the left-hand side.
    pub lhs: SymbolId,
    /// Number of right-hand-side symbols, i.e. frames popped per reduction.
    pub rhs_len: u16,
}

impl Rule {
    /// Create a rule.
    #[inline]
    pub const fn new(lhs: SymbolId, rhs_len: u16) -> Self {
        Rule { lhs, rhs_len }
    }
}
