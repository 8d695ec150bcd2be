//! Packed LALR grammar tables.
//!
//! This crate defines the table format a table-driven parser engine
//! interprets: shift/goto offsets into a shared action pool, a
//! lookahead-verification array, per-state default actions, rule arities, and
//! an optional fallback-terminal mapping. The tables are immutable data; the
//! engine that executes them lives in `lalr_engine`, and the grammar compiler
//! that computes them is a separate offline tool.
//!
//! [`GrammarBuilder`] is the one way to construct a [`Grammar`]: it validates
//! the dense description and performs the first-fit offset packing that keeps
//! table size proportional to the grammar rather than `states × symbols`.

mod builder;
mod error;
mod rule;
mod symbol;
mod table;

pub use builder::GrammarBuilder;
pub use error::GrammarError;
pub use rule::Rule;
pub use symbol::{RuleId, StateId, SymbolId};
pub use table::{Action, Grammar};
