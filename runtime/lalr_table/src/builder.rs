//! Construction and packing of grammar tables.
//!
//! An offline grammar compiler resolves conflicts and computes the automaton;
//! this builder is the serializer for its output. It accepts the dense form
//! (rules, per-state actions and gotos, defaults, fallbacks) and emits the
//! packed representation the engine interprets: every state row is placed
//! into one shared action pool at the first offset where it does not collide
//! with rows already placed, with slot reuse allowed when the claimed symbol
//! and action are identical.

use rustc_hash::FxHashSet;

use crate::error::GrammarError;
use crate::rule::Rule;
use crate::symbol::{RuleId, StateId, SymbolId};
use crate::table::{Action, Grammar, EMPTY_SLOT, NO_OFFSET};

#[derive(Clone, Debug)]
struct StateRow {
    /// Terminal-keyed actions.
    actions: Vec<(SymbolId, Action)>,
    /// Nonterminal-keyed successor states.
    gotos: Vec<(SymbolId, StateId)>,
    /// Action taken when no packed entry matches the lookahead.
    default_action: Action,
}

/// Builder for a packed [`Grammar`].
///
/// The first state created is the start state (state 0). `build` validates
/// everything the engine would otherwise have to distrust, then packs.
#[derive(Clone, Debug)]
pub struct GrammarBuilder {
    terminals: u16,
    symbols: u16,
    rules: Vec<Rule>,
    states: Vec<StateRow>,
    fallback: Vec<(SymbolId, SymbolId)>,
    error_symbol: Option<SymbolId>,
    symbol_names: Vec<Box<str>>,
    rule_names: Vec<Box<str>>,
}

impl GrammarBuilder {
    /// Start a grammar with `terminals` terminal codes (code 0 is the
    /// end-of-input terminal) out of `symbols` total symbol codes.
    pub fn new(terminals: u16, symbols: u16) -> Self {
        GrammarBuilder {
            terminals,
            symbols,
            rules: Vec::new(),
            states: Vec::new(),
            fallback: Vec::new(),
            error_symbol: None,
            symbol_names: vec![Box::from(""); symbols as usize],
            rule_names: Vec::new(),
        }
    }

    /// Declare a rule producing `lhs` from `rhs_len` right-hand-side symbols.
    pub fn rule(&mut self, lhs: SymbolId, rhs_len: u16) -> RuleId {
        let id = RuleId::new(self.rules.len() as u16);
        self.rules.push(Rule::new(lhs, rhs_len));
        self.rule_names.push(Box::from(""));
        id
    }

    /// Append a state. The first state declared is the start state.
    pub fn state(&mut self) -> StateId {
        let id = StateId::new(self.states.len() as u16);
        self.states.push(StateRow {
            actions: Vec::new(),
            gotos: Vec::new(),
            default_action: Action::Error,
        });
        id
    }

    /// Record the action `state` takes on terminal `symbol`.
    pub fn action(&mut self, state: StateId, symbol: SymbolId, action: Action) -> &mut Self {
        if let Some(row) = self.states.get_mut(state.raw() as usize) {
            row.actions.push((symbol, action));
        }
        self
    }

    /// Record the goto `state` takes after a reduction to nonterminal `nt`.
    pub fn goto(&mut self, state: StateId, nt: SymbolId, to: StateId) -> &mut Self {
        if let Some(row) = self.states.get_mut(state.raw() as usize) {
            row.gotos.push((nt, to));
        }
        self
    }

    /// Record the action `state` takes when no packed entry matches.
    pub fn default_action(&mut self, state: StateId, action: Action) -> &mut Self {
        if let Some(row) = self.states.get_mut(state.raw() as usize) {
            row.default_action = action;
        }
        self
    }

    /// Map terminal `from` to substitute terminal `to` when `from` has no
    /// packed entry ("keyword softening").
    pub fn fallback(&mut self, from: SymbolId, to: SymbolId) -> &mut Self {
        self.fallback.push((from, to));
        self
    }

    /// Designate the reserved error-recovery symbol.
    pub fn error_symbol(&mut self, sym: SymbolId) -> &mut Self {
        self.error_symbol = Some(sym);
        self
    }

    /// Attach a display name to a symbol. Diagnostic metadata only;
    /// out-of-range codes are ignored.
    pub fn symbol_name(&mut self, sym: SymbolId, name: &str) -> &mut Self {
        if let Some(slot) = self.symbol_names.get_mut(sym.raw() as usize) {
            *slot = Box::from(name);
        }
        self
    }

    /// Attach a display name to a rule. Diagnostic metadata only;
    /// out-of-range rules are ignored.
    pub fn rule_name(&mut self, rule: RuleId, name: &str) -> &mut Self {
        if let Some(slot) = self.rule_names.get_mut(rule.raw() as usize) {
            *slot = Box::from(name);
        }
        self
    }

    /// Validate and pack.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        self.validate()?;

        let mut pool = Vec::new();
        let mut check = Vec::new();
        let mut shift_ofst = Vec::with_capacity(self.states.len());
        let mut goto_ofst = Vec::with_capacity(self.states.len());
        let mut defaults = Vec::with_capacity(self.states.len());

        for row in &self.states {
            shift_ofst.push(pack_row(&mut pool, &mut check, &row.actions));
            let gotos: Vec<(SymbolId, Action)> = row
                .gotos
                .iter()
                .map(|&(nt, to)| (nt, Action::Shift(to)))
                .collect();
            goto_ofst.push(pack_row(&mut pool, &mut check, &gotos));
            defaults.push(row.default_action);
        }

        let mut fallback = vec![None; self.terminals as usize];
        for &(from, to) in &self.fallback {
            if let Some(slot) = fallback.get_mut(from.raw() as usize) {
                *slot = Some(to);
            }
        }

        Ok(Grammar {
            terminal_count: self.terminals,
            symbol_count: self.symbols,
            state_count: self.states.len() as u16,
            rules: self.rules,
            pool,
            check,
            shift_ofst,
            goto_ofst,
            defaults,
            fallback,
            error_symbol: self.error_symbol,
            symbol_names: self.symbol_names,
            rule_names: self.rule_names,
        })
    }

    fn validate(&self) -> Result<(), GrammarError> {
        if self.terminals == 0 {
            return Err(GrammarError::NoTerminals);
        }
        if self.terminals > self.symbols {
            return Err(GrammarError::TerminalsExceedSymbols {
                terminals: self.terminals,
                symbols: self.symbols,
            });
        }
        if self.states.is_empty() {
            return Err(GrammarError::NoStates);
        }

        for (i, rule) in self.rules.iter().enumerate() {
            let id = RuleId::new(i as u16);
            if rule.lhs.raw() >= self.symbols {
                return Err(GrammarError::SymbolOutOfRange(rule.lhs));
            }
            if rule.lhs.raw() < self.terminals {
                return Err(GrammarError::RuleLhsIsTerminal { rule: id, lhs: rule.lhs });
            }
        }

        for (i, row) in self.states.iter().enumerate() {
            let state = StateId::new(i as u16);
            let mut claimed = FxHashSet::default();
            for &(sym, action) in &row.actions {
                if sym.raw() >= self.symbols {
                    return Err(GrammarError::SymbolOutOfRange(sym));
                }
                if sym.raw() >= self.terminals {
                    return Err(GrammarError::ActionOnNonterminal { state, symbol: sym });
                }
                if !claimed.insert(sym.raw()) {
                    return Err(GrammarError::DuplicateAction { state, symbol: sym });
                }
                self.check_action(action)?;
            }
            for &(nt, to) in &row.gotos {
                if nt.raw() >= self.symbols {
                    return Err(GrammarError::SymbolOutOfRange(nt));
                }
                if nt.raw() < self.terminals {
                    return Err(GrammarError::GotoOnTerminal { state, symbol: nt });
                }
                if !claimed.insert(nt.raw()) {
                    return Err(GrammarError::DuplicateAction { state, symbol: nt });
                }
                self.check_state(to)?;
            }
            self.check_action(row.default_action)?;
        }

        let fallback_sources: FxHashSet<u16> =
            self.fallback.iter().map(|&(from, _)| from.raw()).collect();
        for &(from, to) in &self.fallback {
            if from.raw() >= self.terminals {
                return Err(GrammarError::FallbackOnNonterminal(from));
            }
            if to.raw() >= self.terminals {
                return Err(GrammarError::FallbackOnNonterminal(to));
            }
            // Substitution must converge after one step, so a fallback target
            // may not have a fallback of its own. This also rejects self-maps.
            if fallback_sources.contains(&to.raw()) {
                return Err(GrammarError::FallbackChain { from, to });
            }
        }

        if let Some(err_sym) = self.error_symbol {
            if err_sym.raw() >= self.terminals {
                return Err(GrammarError::ErrorSymbolNotTerminal(err_sym));
            }
        }
        Ok(())
    }

    fn check_action(&self, action: Action) -> Result<(), GrammarError> {
        match action {
            Action::Shift(state) => self.check_state(state),
            Action::Reduce(rule) => {
                if (rule.raw() as usize) < self.rules.len() {
                    Ok(())
                } else {
                    Err(GrammarError::RuleOutOfRange(rule))
                }
            }
            Action::Accept | Action::Error => Ok(()),
        }
    }

    fn check_state(&self, state: StateId) -> Result<(), GrammarError> {
        if (state.raw() as usize) < self.states.len() {
            Ok(())
        } else {
            Err(GrammarError::StateOutOfRange(state))
        }
    }
}

/// Pack one state row into the shared pool, first-fit.
///
/// Returns the offset such that `offset + symbol` indexes the row's entries,
/// or [`NO_OFFSET`] for a row with no entries. A slot already claimed by
/// another row is reusable when both its check symbol and action coincide.
fn pack_row(pool: &mut Vec<Action>, check: &mut Vec<u16>, entries: &[(SymbolId, Action)]) -> i32 {
    let Some(min_sym) = entries.iter().map(|&(sym, _)| sym.raw()).min() else {
        return NO_OFFSET;
    };

    let mut ofst = -i32::from(min_sym);
    loop {
        if row_fits(pool, check, entries, ofst) {
            place_row(pool, check, entries, ofst);
            return ofst;
        }
        // Terminates: at `ofst == pool.len()` every slot is a fresh append.
        ofst += 1;
    }
}

fn row_fits(pool: &[Action], check: &[u16], entries: &[(SymbolId, Action)], ofst: i32) -> bool {
    entries.iter().all(|&(sym, action)| {
        let idx = ofst + i32::from(sym.raw());
        if idx < 0 {
            return false;
        }
        match (pool.get(idx as usize), check.get(idx as usize)) {
            (Some(&slot_action), Some(&slot_check)) => {
                slot_check == EMPTY_SLOT || (slot_check == sym.raw() && slot_action == action)
            }
            _ => true,
        }
    })
}

fn place_row(pool: &mut Vec<Action>, check: &mut Vec<u16>, entries: &[(SymbolId, Action)], ofst: i32) {
    for &(sym, action) in entries {
        let idx = (ofst + i32::from(sym.raw())) as usize;
        if idx >= pool.len() {
            pool.resize(idx + 1, Action::Error);
            check.resize(idx + 1, EMPTY_SLOT);
        }
        pool[idx] = action;
        check[idx] = sym.raw();
    }
}
