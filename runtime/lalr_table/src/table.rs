//! The packed grammar table.
//!
//! Memory stays proportional to grammar size rather than `states × symbols`:
//! every state's action row is packed into one shared pool at a per-state
//! offset, with a parallel check array recording which symbol each pool slot
//! was packed for. A probe computes `offset + symbol`, verifies the check
//! entry, and falls through to the state's default action on a mismatch.
//!
//! The table is pure data. It never calls out, it is immutable after
//! [`GrammarBuilder::build`](crate::GrammarBuilder::build), and it is `Sync`,
//! so one table may be shared by any number of parser instances across
//! threads.

use crate::rule::Rule;
use crate::symbol::{RuleId, StateId, SymbolId};

/// One entry of the action table.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Action {
    /// Push the lookahead and move to this state.
    Shift(StateId),
    /// Reduce by this rule.
    Reduce(RuleId),
    /// The parse is complete.
    Accept,
    /// No legal continuation; the engine enters error handling.
    Error,
}

/// Per-state offset for a state with no packed entries.
pub(crate) const NO_OFFSET: i32 = i32::MIN;

/// Check-array value for a pool slot no state has claimed.
pub(crate) const EMPTY_SLOT: u16 = u16::MAX;

/// An immutable, packed LALR grammar table.
///
/// Built offline by a grammar compiler (or in-process through
/// [`GrammarBuilder`](crate::GrammarBuilder)) and interpreted generically by
/// the engine: array lookups and bounds checks only, never grammar-specific
/// branches.
#[derive(Clone, Debug)]
pub struct Grammar {
    pub(crate) terminal_count: u16,
    pub(crate) symbol_count: u16,
    pub(crate) state_count: u16,
    pub(crate) rules: Vec<Rule>,

    /// Shared pool of actions, one slot per packed (state, symbol) pair.
    pub(crate) pool: Vec<Action>,
    /// Symbol each pool slot was packed for; [`EMPTY_SLOT`] where unclaimed.
    pub(crate) check: Vec<u16>,
    /// Per-state offset into the pool for terminal lookups.
    pub(crate) shift_ofst: Vec<i32>,
    /// Per-state offset into the pool for nonterminal (goto) lookups.
    pub(crate) goto_ofst: Vec<i32>,
    /// Per-state action when no packed entry matches.
    pub(crate) defaults: Vec<Action>,

    /// `fallback[terminal]` is the substitute tried when the terminal itself
    /// has no packed entry. Targets never have fallbacks of their own.
    pub(crate) fallback: Vec<Option<SymbolId>>,
    pub(crate) error_symbol: Option<SymbolId>,

    /// Diagnostic metadata only; never consulted for control flow.
    pub(crate) symbol_names: Vec<Box<str>>,
    pub(crate) rule_names: Vec<Box<str>>,
}

impl Grammar {
    /// Number of terminal symbols, including the end-of-input terminal.
    #[inline]
    pub fn terminal_count(&self) -> u16 {
        self.terminal_count
    }

    /// Total number of symbols (terminals then nonterminals).
    #[inline]
    pub fn symbol_count(&self) -> u16 {
        self.symbol_count
    }

    /// Number of automaton states.
    #[inline]
    pub fn state_count(&self) -> u16 {
        self.state_count
    }

    /// Number of rules.
    #[inline]
    pub fn rule_count(&self) -> u16 {
        self.rules.len() as u16
    }

    /// Whether `sym` is a terminal.
    #[inline]
    pub fn is_terminal(&self, sym: SymbolId) -> bool {
        sym.raw() < self.terminal_count
    }

    /// The reserved error symbol, if the grammar designates one.
    #[inline]
    pub fn error_symbol(&self) -> Option<SymbolId> {
        self.error_symbol
    }

    /// Look up a rule. `None` only for rule numbers the table never issued.
    #[inline]
    pub fn rule(&self, rule: RuleId) -> Option<Rule> {
        self.rules.get(rule.raw() as usize).copied()
    }

    /// The fallback terminal for `sym`, if one is mapped.
    #[inline]
    pub fn fallback(&self, sym: SymbolId) -> Option<SymbolId> {
        self.fallback.get(sym.raw() as usize).copied().flatten()
    }

    /// Probe the packed action row of `state` for terminal `sym`.
    ///
    /// Returns `None` on a check-array miss; the caller decides whether to
    /// retry with a fallback terminal or take the default action. This split
    /// keeps the substitution policy in the engine, not the table.
    pub fn probe_shift(&self, state: StateId, sym: SymbolId) -> Option<Action> {
        self.probe(self.shift_ofst.get(state.raw() as usize).copied()?, sym)
    }

    /// Probe the packed goto row of `state` for nonterminal `nt`.
    ///
    /// Only meaningful immediately after a reduction.
    pub fn probe_goto(&self, state: StateId, nt: SymbolId) -> Option<StateId> {
        match self.probe(self.goto_ofst.get(state.raw() as usize).copied()?, nt) {
            Some(Action::Shift(next)) => Some(next),
            _ => None,
        }
    }

    /// The action taken by `state` when no packed entry matches.
    pub fn default_action(&self, state: StateId) -> Action {
        self.defaults
            .get(state.raw() as usize)
            .copied()
            .unwrap_or(Action::Error)
    }

    /// The display name of a symbol; `"?"` when the table carries no names.
    pub fn symbol_name(&self, sym: SymbolId) -> &str {
        self.symbol_names
            .get(sym.raw() as usize)
            .map_or("?", |name| name)
    }

    /// The display name of a rule; `"?"` when the table carries no names.
    pub fn rule_name(&self, rule: RuleId) -> &str {
        self.rule_names
            .get(rule.raw() as usize)
            .map_or("?", |name| name)
    }

    fn probe(&self, ofst: i32, sym: SymbolId) -> Option<Action> {
        if ofst == NO_OFFSET {
            return None;
        }
        let idx = usize::try_from(ofst.checked_add(i32::from(sym.raw()))?).ok()?;
        if self.check.get(idx).copied()? == sym.raw() {
            self.pool.get(idx).copied()
        } else {
            None
        }
    }
}
