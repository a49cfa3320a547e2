//! The scheduler: the machine's monotonic cycle counter.

use crate::{Cycles, MasterClock};

/// Owns the monotonic cycle count.
///
/// The CPU reports cycles per instruction; the machine advances the
/// scheduler by that amount. External components (renderer, audio) read
/// `now` but never advance it.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    clock: MasterClock,
    now: Cycles,
}

impl Scheduler {
    #[must_use]
    pub const fn new(clock: MasterClock) -> Self {
        Self {
            clock,
            now: Cycles::ZERO,
        }
    }

    #[must_use]
    pub const fn clock(&self) -> MasterClock {
        self.clock
    }

    /// The current cycle count.
    #[must_use]
    pub const fn now(&self) -> Cycles {
        self.now
    }

    /// Advance time by `cycles`.
    pub fn advance(&mut self, cycles: u64) {
        self.now += Cycles::new(cycles);
    }
}
