//! Engine tests.
//!
//! Organized by concern:
//! - `fixtures`: hand-built grammar tables and recording test doubles
//! - `machine`: shift/reduce/accept driving, fallback, stack overflow
//! - `recovery`: the error-symbol protocol and the suppression window
//! - `properties`: leak-freedom and determinism over generated inputs
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod machine;
