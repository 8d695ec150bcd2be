//! Table-driven LALR parser engine.
//!
//! A generic interpreter for the packed grammar tables defined by
//! `lalr_table`. The caller's tokenizer feeds one terminal and its semantic
//! value per [`Parser::feed`] call; the engine shifts, chains reductions,
//! dispatches rule actions through the caller's [`Semantics`] implementation,
//! and runs the single-error-symbol recovery protocol on syntax errors.
//!
//! Semantic values live on the bounded parse stack and follow Rust ownership
//! end to end: moved in by `feed`, moved out exactly once by a reduction (or
//! dropped if the rule ignores them), and released wholesale when the parse
//! ends or the parser is dropped.
//!
//! The engine is single-threaded and non-reentrant per instance; independent
//! instances may share one read-only [`Grammar`](lalr_table::Grammar) across
//! threads.

mod machine;
mod recovery;
mod semantics;
mod stack;
mod trace;

pub use machine::{FatalError, ParseStatus, Parser, ParserConfig};
pub use semantics::{RhsValues, Semantics};
pub use trace::{NopTracer, Tracer};

#[cfg(test)]
mod tests;
