//! The semantic-action seam between the engine and the caller.
//!
//! The engine drives the automaton; the caller supplies one [`Semantics`]
//! implementation that builds whatever the grammar's rules produce. The
//! implementation is also the parser context: action bodies mutate it freely
//! (accumulating an AST, attaching diagnostics), and the caller takes it back
//! with [`Parser::into_semantics`](crate::Parser::into_semantics).
//!
//! Ownership contract: every right-hand-side value handed to
//! [`Semantics::reduce`] is either taken out of [`RhsValues`] exactly once or
//! dropped when the reduction returns. The engine enforces the "exactly once"
//! half through `Option` slots; Rust's drop glue supplies the rest.

use lalr_table::{RuleId, StateId, SymbolId};

/// The semantic values of a rule's right-hand side, in grammar order.
///
/// Index 0 is the leftmost RHS symbol. [`take`](RhsValues::take) moves a
/// value out; values never taken are dropped immediately after the action
/// body returns.
#[derive(Debug)]
pub struct RhsValues<'a, V> {
    slots: &'a mut [Option<V>],
}

impl<'a, V> RhsValues<'a, V> {
    pub(crate) fn new(slots: &'a mut [Option<V>]) -> Self {
        RhsValues { slots }
    }

    /// Number of right-hand-side symbols in the rule being reduced.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Move the value at RHS position `index` out.
    ///
    /// `None` when the position is out of range or its value was already
    /// taken; a value can only ever be moved out once.
    pub fn take(&mut self, index: usize) -> Option<V> {
        self.slots.get_mut(index).and_then(Option::take)
    }
}

/// Semantic actions and error hooks for one grammar.
///
/// One instance drives one parse. `reduce` is invoked exactly once per
/// reduction, synchronously, before the consumed stack frames are discarded.
pub trait Semantics {
    /// The semantic value carried on every stack frame.
    ///
    /// `Default` supplies the empty value pushed under the error symbol
    /// during recovery and the value for rules with nothing to produce.
    /// Value cleanup is the type's own `Drop`; the engine never dispatches
    /// destruction on symbol codes.
    type Value: Default;

    /// Produce the left-hand-side value for a completed rule.
    ///
    /// Take what the rule consumes out of `rhs`; leftovers are dropped as
    /// soon as this returns. Return [`Default::default`] for rules whose
    /// nonterminal carries no value.
    fn reduce(&mut self, rule: RuleId, rhs: RhsValues<'_, Self::Value>) -> Self::Value;

    /// A syntax error was detected and is being reported.
    ///
    /// `lookahead` is the offending terminal and `value` its semantic value
    /// (absent for the re-fed end-of-input sentinel). Suppressed reports,
    /// meaning errors inside the cooldown window, never reach this hook.
    fn syntax_error(&mut self, state: StateId, lookahead: SymbolId, value: Option<&Self::Value>);

    /// Recovery exhausted the stack, or end-of-input arrived while
    /// recovering. The parse is abandoned.
    fn parse_failed(&mut self) {}

    /// The bounded stack overflowed. The parse is abandoned.
    fn stack_overflow(&mut self) {}
}
