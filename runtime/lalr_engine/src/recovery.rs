//! Error-recovery bookkeeping.
//!
//! Tracks the two recovery facts the automaton consults: whether an
//! unresolved error symbol is in play, and the shift-countdown that
//! suppresses cascading reports. A pristine parser always reports its first
//! error; after that, each handled error replenishes the countdown, every
//! successful shift decrements it, and further errors are reported only once
//! it has reached zero again.

/// Recovery state for one parser instance.
#[derive(Debug)]
pub(crate) struct Recovery {
    /// Shifts remaining before another error may be reported.
    credit: i64,
    /// Replenishment value, configurable policy (3 by default).
    cooldown: u32,
    /// An error symbol was pushed and no terminal has been shifted since.
    active: bool,
}

impl Recovery {
    pub fn new(cooldown: u32) -> Self {
        Recovery {
            // Below zero so the first error of a pristine parse reports.
            credit: -1,
            cooldown,
            active: false,
        }
    }

    /// A terminal was shifted: the suppression window shrinks and any
    /// in-progress recovery is resolved.
    pub fn on_shift(&mut self) {
        self.credit = self.credit.saturating_sub(1);
        self.active = false;
    }

    /// Whether an error-symbol recovery is still unresolved.
    pub fn active(&self) -> bool {
        self.active
    }

    /// Whether the next syntax error is reported rather than suppressed.
    pub fn should_report(&self) -> bool {
        self.credit <= 0
    }

    /// An error was handled; open a fresh suppression window. `active` marks
    /// whether an error symbol is now on the stack awaiting resolution.
    pub fn begin(&mut self, active: bool) {
        self.credit = i64::from(self.cooldown);
        self.active = active;
    }
}
