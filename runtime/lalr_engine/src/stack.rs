//! The bounded parse stack.
//!
//! A LIFO of `(state, symbol, value)` frames. Slot 0 holds the synthetic
//! start state for the whole parse, so the stack is never empty while the
//! parse is active. Depth is bounded: a push past the limit fails without
//! touching the stack, and the engine treats that as fatal.

use lalr_table::{StateId, SymbolId};

/// One stack frame: the automaton state entered when the symbol was pushed,
/// the symbol's code, and the semantic value the frame owns.
#[derive(Debug)]
pub(crate) struct Frame<V> {
    pub state: StateId,
    pub symbol: SymbolId,
    pub value: V,
}

/// Bounded frame stack. The limit counts frames including slot 0.
#[derive(Debug)]
pub(crate) struct Stack<V> {
    frames: Vec<Frame<V>>,
    limit: usize,
}

impl<V> Stack<V> {
    pub fn new(limit: usize) -> Self {
        Stack {
            frames: Vec::new(),
            limit,
        }
    }

    /// Push a frame. On a full stack this refuses and hands the frame back,
    /// having mutated nothing; the caller owns the fatal-error handling.
    pub fn push(&mut self, frame: Frame<V>) -> Result<(), Frame<V>> {
        if self.frames.len() >= self.limit {
            return Err(frame);
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Frame<V>> {
        self.frames.pop()
    }

    pub fn top(&self) -> Option<&Frame<V>> {
        self.frames.last()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Drop every frame, top to bottom. Each owned value is dropped exactly
    /// once. Runs on accept cleanup, on stack overflow, and from `Drop`.
    pub fn clear(&mut self) {
        while self.frames.pop().is_some() {}
    }
}

impl<V> Drop for Stack<V> {
    fn drop(&mut self) {
        // Vec would drop bottom-up; frames release top-down.
        self.clear();
    }
}
