//! Validation errors for grammar table construction.

use crate::symbol::{RuleId, StateId, SymbolId};
use thiserror::Error;

/// Why a [`GrammarBuilder`](crate::GrammarBuilder) refused to build a table.
///
/// The engine trusts a built table completely, so everything a lookup could
/// trip over is rejected here instead.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum GrammarError {
    #[error("a grammar needs at least the end-of-input terminal")]
    NoTerminals,

    #[error("terminal count {terminals} exceeds symbol count {symbols}")]
    TerminalsExceedSymbols { terminals: u16, symbols: u16 },

    #[error("a grammar needs at least one state")]
    NoStates,

    #[error("symbol {0} is out of range")]
    SymbolOutOfRange(SymbolId),

    #[error("state {0} is out of range")]
    StateOutOfRange(StateId),

    #[error("rule {0} is out of range")]
    RuleOutOfRange(RuleId),

    #[error("rule {rule} has terminal {lhs} on its left-hand side")]
    RuleLhsIsTerminal { rule: RuleId, lhs: SymbolId },

    #[error("state {state} already has an action for symbol {symbol}")]
    DuplicateAction { state: StateId, symbol: SymbolId },

    #[error("action for state {state} is keyed by nonterminal {symbol}")]
    ActionOnNonterminal { state: StateId, symbol: SymbolId },

    #[error("goto for state {state} is keyed by terminal {symbol}")]
    GotoOnTerminal { state: StateId, symbol: SymbolId },

    #[error("fallback for {from} maps to {to}, which has a fallback itself")]
    FallbackChain { from: SymbolId, to: SymbolId },

    #[error("fallback is keyed by nonterminal {0}")]
    FallbackOnNonterminal(SymbolId),

    #[error("error symbol {0} must be a terminal")]
    ErrorSymbolNotTerminal(SymbolId),
}
