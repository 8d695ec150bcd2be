//! The automaton core.
//!
//! [`Parser::feed`] interprets the grammar table: look up the action for
//! (state, lookahead), shift or chain reductions, and hand syntax errors to
//! the recovery protocol. One call runs until the terminal is consumed or
//! the parse accepts or dies; control only then returns.

use lalr_table::{Action, Grammar, RuleId, StateId, SymbolId};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, trace};

use crate::recovery::Recovery;
use crate::semantics::{RhsValues, Semantics};
use crate::stack::{Frame, Stack};
use crate::trace::{NopTracer, Tracer};

/// Conditions that end a parse abnormally.
///
/// All of them are terminal for the instance: the engine never resumes after
/// a fatal report, and every later `feed` returns the same error. Owned
/// semantic values are released before the error is returned.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Error)]
pub enum FatalError {
    /// The bounded parse stack was exhausted.
    #[error("parse stack overflow")]
    StackOverflow,

    /// Error recovery ran out of stack, or end-of-input arrived while an
    /// error was unresolved.
    #[error("syntax error recovery failed")]
    ParseFailed,

    /// The table contradicted itself: a reduction deeper than the stack, a
    /// rule number the table never issued, or a missing goto entry.
    /// Unreachable for tables built by `lalr_table::GrammarBuilder`.
    #[error("grammar table is internally inconsistent")]
    MalformedTable,

    /// `feed` was called after the parse already accepted.
    #[error("parse already finished")]
    Finished,
}

/// What a successful `feed` call tells the caller.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ParseStatus {
    /// The terminal was consumed; feed the next one.
    Continue,
    /// The accept action fired; the parse is complete.
    Accepted,
}

/// Tunable engine policy.
#[derive(Copy, Clone, Debug)]
pub struct ParserConfig {
    /// Maximum stack depth in frames, counting the synthetic slot 0.
    /// Exceeding it is a fatal, non-recoverable condition.
    pub max_depth: usize,
    /// Shifts required after a handled syntax error before the next error is
    /// reported instead of suppressed.
    pub error_cooldown: u32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_depth: 512,
            error_cooldown: 3,
        }
    }
}

enum Phase {
    Active,
    Accepted,
    Failed(FatalError),
}

/// A single parse in progress.
///
/// Owns the bounded stack, the recovery state, and the caller's [`Semantics`]
/// instance. Non-reentrant: an action body must not drive the parser it was
/// called from. Independent instances may share one [`Grammar`] across
/// threads; the table is read-only.
pub struct Parser<'g, S: Semantics, T: Tracer = NopTracer> {
    grammar: &'g Grammar,
    stack: Stack<S::Value>,
    semantics: S,
    tracer: T,
    recovery: Recovery,
    phase: Phase,
}

impl<'g, S: Semantics> Parser<'g, S> {
    /// Create a parser with default policy and no tracing.
    pub fn new(grammar: &'g Grammar, semantics: S) -> Self {
        Self::with_config(grammar, semantics, ParserConfig::default())
    }

    /// Create a parser with explicit policy and no tracing.
    pub fn with_config(grammar: &'g Grammar, semantics: S, config: ParserConfig) -> Self {
        Self::with_tracer(grammar, semantics, NopTracer, config)
    }
}

impl<'g, S: Semantics, T: Tracer> Parser<'g, S, T> {
    /// Create a parser with an injected trace hook.
    pub fn with_tracer(grammar: &'g Grammar, semantics: S, tracer: T, config: ParserConfig) -> Self {
        let mut stack = Stack::new(config.max_depth.max(1));
        // Slot 0: the synthetic start state. The limit was clamped to fit it.
        let _ = stack.push(Frame {
            state: StateId::START,
            symbol: SymbolId::END,
            value: S::Value::default(),
        });
        Parser {
            grammar,
            stack,
            semantics,
            tracer,
            recovery: Recovery::new(config.error_cooldown),
            phase: Phase::Active,
        }
    }

    /// Feed one terminal and its semantic value.
    ///
    /// Ownership of `value` transfers to the engine: it ends up on the stack
    /// (shift), inside a reduction, or dropped (error recovery discard).
    /// Runs shifts and chained reductions until the terminal is consumed or
    /// the parse accepts or fails.
    pub fn feed(&mut self, lookahead: SymbolId, value: S::Value) -> Result<ParseStatus, FatalError> {
        match self.phase {
            Phase::Active => {}
            Phase::Accepted => return Err(FatalError::Finished),
            Phase::Failed(error) => return Err(error),
        }
        let mut value = Some(value);
        loop {
            let state = self.state();
            match self.next_action(state, lookahead) {
                Action::Shift(next) => {
                    trace!(
                        state = state.raw(),
                        next = next.raw(),
                        sym = self.grammar.symbol_name(lookahead),
                        "shift"
                    );
                    self.tracer
                        .shift(next, lookahead, self.grammar.symbol_name(lookahead));
                    self.push_frame(next, lookahead, value.take().unwrap_or_default())?;
                    self.recovery.on_shift();
                    if lookahead.is_end() {
                        // The end sentinel re-feeds itself until accept.
                        continue;
                    }
                    return Ok(ParseStatus::Continue);
                }
                Action::Reduce(rule) => self.reduce(rule)?,
                Action::Accept => {
                    debug!("accept");
                    self.tracer.accept();
                    self.stack.clear();
                    self.phase = Phase::Accepted;
                    return Ok(ParseStatus::Accepted);
                }
                Action::Error => {
                    if let Some(status) = self.recover(state, lookahead, &mut value)? {
                        return Ok(status);
                    }
                    // The error symbol was shifted; retry the same lookahead.
                }
            }
        }
    }

    /// Signal end of input.
    ///
    /// Equivalent to feeding [`SymbolId::END`] with an empty value; any
    /// trailing reductions run before the accept.
    pub fn finish(&mut self) -> Result<(), FatalError> {
        match self.feed(SymbolId::END, S::Value::default())? {
            ParseStatus::Accepted => Ok(()),
            // The end sentinel cannot be consumed without accepting.
            ParseStatus::Continue => Err(self.fail(FatalError::ParseFailed)),
        }
    }

    /// The caller's semantics/context object.
    pub fn semantics(&self) -> &S {
        &self.semantics
    }

    /// Mutable access to the semantics/context object.
    pub fn semantics_mut(&mut self) -> &mut S {
        &mut self.semantics
    }

    /// Consume the parser and hand the semantics/context object back.
    /// Any values still on the stack are dropped.
    pub fn into_semantics(self) -> S {
        self.semantics
    }

    /// The injected trace hook.
    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    /// Current stack depth in frames, including the synthetic slot 0.
    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    fn state(&self) -> StateId {
        self.stack.top().map_or(StateId::START, |frame| frame.state)
    }

    /// The action for (state, lookahead): packed probe, then at most one
    /// fallback substitution, then the state's default.
    fn next_action(&mut self, state: StateId, lookahead: SymbolId) -> Action {
        if let Some(action) = self.grammar.probe_shift(state, lookahead) {
            return action;
        }
        if let Some(substitute) = self.grammar.fallback(lookahead) {
            // A self-mapping fallback must not retry forever.
            if substitute != lookahead {
                trace!(
                    from = self.grammar.symbol_name(lookahead),
                    to = self.grammar.symbol_name(substitute),
                    "fallback"
                );
                self.tracer.fallback(
                    self.grammar.symbol_name(lookahead),
                    self.grammar.symbol_name(substitute),
                );
                if let Some(action) = self.grammar.probe_shift(state, substitute) {
                    return action;
                }
            }
        }
        self.grammar.default_action(state)
    }

    fn reduce(&mut self, rule_id: RuleId) -> Result<(), FatalError> {
        let Some(rule) = self.grammar.rule(rule_id) else {
            return Err(self.fail(FatalError::MalformedTable));
        };
        let arity = usize::from(rule.rhs_len);
        // Reductions never consume slot 0; anything deeper is a table bug.
        if self.stack.depth() <= arity {
            return Err(self.fail(FatalError::MalformedTable));
        }
        trace!(
            rule = rule_id.raw(),
            name = self.grammar.rule_name(rule_id),
            "reduce"
        );
        self.tracer.reduce(rule_id, self.grammar.rule_name(rule_id));

        let mut rhs: SmallVec<[Option<S::Value>; 8]> = SmallVec::with_capacity(arity);
        for _ in 0..arity {
            match self.stack.pop() {
                Some(frame) => rhs.push(Some(frame.value)),
                None => return Err(self.fail(FatalError::MalformedTable)),
            }
        }
        rhs.reverse();
        let lhs = self.semantics.reduce(rule_id, RhsValues::new(&mut rhs));
        // RHS values the action body did not take are released here.
        drop(rhs);

        let below = self.state();
        let Some(next) = self.goto_state(below, rule.lhs) else {
            return Err(self.fail(FatalError::MalformedTable));
        };
        self.push_frame(next, rule.lhs, lhs)
    }

    /// Goto lookup after a reduction: packed probe, then the exposed state's
    /// default, same as the action table.
    fn goto_state(&self, state: StateId, lhs: SymbolId) -> Option<StateId> {
        self.grammar.probe_goto(state, lhs).or_else(|| {
            match self.grammar.default_action(state) {
                Action::Shift(next) => Some(next),
                _ => None,
            }
        })
    }

    /// Handle an `Error` action. `Ok(None)` means the error symbol was
    /// pushed and the same lookahead should be retried; `Ok(Some(_))` means
    /// the lookahead was consumed (discarded).
    fn recover(
        &mut self,
        state: StateId,
        lookahead: SymbolId,
        value: &mut Option<S::Value>,
    ) -> Result<Option<ParseStatus>, FatalError> {
        if self.recovery.should_report() {
            debug!(
                state = state.raw(),
                sym = self.grammar.symbol_name(lookahead),
                "syntax error"
            );
            self.tracer
                .syntax_error(lookahead, self.grammar.symbol_name(lookahead));
            self.semantics.syntax_error(state, lookahead, value.as_ref());
        }

        let Some(err_sym) = self.grammar.error_symbol() else {
            // No error symbol: drop the offending token and carry on,
            // failing only when the dropped token was the end sentinel.
            self.recovery.begin(false);
            self.discard(lookahead, value);
            if lookahead.is_end() {
                return Err(self.parse_failed());
            }
            return Ok(Some(ParseStatus::Continue));
        };

        let top_is_error = self.stack.top().is_some_and(|frame| frame.symbol == err_sym);
        if self.recovery.active() || top_is_error {
            // A previous error is still unresolved: eat tokens until one
            // shifts past the error symbol.
            self.discard(lookahead, value);
            if lookahead.is_end() {
                return Err(self.parse_failed());
            }
            return Ok(Some(ParseStatus::Continue));
        }

        if lookahead.is_end() {
            // Recovery cannot resynchronize past the end sentinel.
            self.discard(lookahead, value);
            return Err(self.parse_failed());
        }

        // Pop frames until a state that shifts the error symbol.
        loop {
            let Some(top) = self.stack.top() else {
                // Stack exhausted: unrecoverable.
                self.discard(lookahead, value);
                return Err(self.parse_failed());
            };
            if let Some(next) = error_shift(self.grammar, top.state, err_sym) {
                self.tracer
                    .shift(next, err_sym, self.grammar.symbol_name(err_sym));
                self.push_frame(next, err_sym, S::Value::default())?;
                self.recovery.begin(true);
                return Ok(None);
            }
            trace!(state = top.state.raw(), "pop during recovery");
            drop(self.stack.pop());
        }
    }

    fn discard(&mut self, lookahead: SymbolId, value: &mut Option<S::Value>) {
        trace!(sym = self.grammar.symbol_name(lookahead), "discard");
        self.tracer
            .discard(lookahead, self.grammar.symbol_name(lookahead));
        drop(value.take());
    }

    fn parse_failed(&mut self) -> FatalError {
        self.semantics.parse_failed();
        self.fail(FatalError::ParseFailed)
    }

    fn push_frame(
        &mut self,
        state: StateId,
        symbol: SymbolId,
        value: S::Value,
    ) -> Result<(), FatalError> {
        if let Err(frame) = self.stack.push(Frame { state, symbol, value }) {
            debug!(depth = self.stack.depth(), "stack overflow");
            drop(frame);
            self.semantics.stack_overflow();
            return Err(self.fail(FatalError::StackOverflow));
        }
        Ok(())
    }

    /// Abandon the parse: release every owned value, latch the error.
    fn fail(&mut self, error: FatalError) -> FatalError {
        self.stack.clear();
        self.phase = Phase::Failed(error);
        error
    }
}

/// Whether `state` can shift the error symbol, consulting the default action
/// the same way a normal lookup would.
fn error_shift(grammar: &Grammar, state: StateId, err_sym: SymbolId) -> Option<StateId> {
    let action = grammar
        .probe_shift(state, err_sym)
        .unwrap_or_else(|| grammar.default_action(state));
    match action {
        Action::Shift(next) => Some(next),
        _ => None,
    }
}
