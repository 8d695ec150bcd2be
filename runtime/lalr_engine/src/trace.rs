//! Injected trace hook.
//!
//! The engine reports each shift, reduction, error event, and the final
//! accept to a caller-supplied [`Tracer`], using the name metadata attached
//! to the grammar table. Names are diagnostics only; the engine never
//! branches on them. The default [`NopTracer`] compiles away entirely;
//! there is no process-wide trace stream to configure.

use lalr_table::{RuleId, StateId, SymbolId};

/// Observer for automaton activity. All methods default to no-ops.
pub trait Tracer {
    /// A terminal (or the error symbol) is about to be shifted into `state`.
    fn shift(&mut self, _state: StateId, _symbol: SymbolId, _name: &str) {}

    /// A rule is about to be reduced.
    fn reduce(&mut self, _rule: RuleId, _name: &str) {}

    /// The parse is about to accept.
    fn accept(&mut self) {}

    /// A syntax error is being reported (suppressed errors are not traced).
    fn syntax_error(&mut self, _symbol: SymbolId, _name: &str) {}

    /// The lookahead is being discarded during error recovery.
    fn discard(&mut self, _symbol: SymbolId, _name: &str) {}

    /// The lookahead had no table entry and its fallback terminal is being
    /// tried instead.
    fn fallback(&mut self, _from: &str, _to: &str) {}
}

/// The default tracer: does nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NopTracer;

impl Tracer for NopTracer {}
