//! Interrupt and reset signal lines.

use std::sync::{Mutex, PoisonError};

use crate::SourceId;

/// The three signal lines a 65C02-class machine exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalLine {
    Irq,
    Nmi,
    Reset,
}

#[derive(Default)]
struct NmiState {
    /// Sources currently holding the line low.
    sources: Vec<SourceId>,
    /// Edge latch: set on the first assertion, cleared only by the CPU
    /// acknowledging it. Multiple edges before acknowledgement collapse.
    latched: bool,
}

#[derive(Default)]
struct ResetState {
    sources: Vec<SourceId>,
    /// Set when the last asserter releases the line; the machine consumes
    /// this to sequence a reset.
    released: bool,
}

/// Edge/level-tracked IRQ, NMI and RESET lines.
///
/// IRQ is level-triggered: asserted while any asserter holds it. NMI is
/// edge-triggered and latched. RESET sequences a CPU reset on deassertion.
///
/// Each line is guarded by its own short critical section so device threads
/// (timer cards, UI) may assert and release without coordinating with the
/// emulation thread. Re-asserting a line already held by the same source is
/// idempotent.
#[derive(Default)]
pub struct SignalBus {
    irq: Mutex<Vec<SourceId>>,
    nmi: Mutex<NmiState>,
    reset: Mutex<ResetState>,
}

impl SignalBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assert a line on behalf of `source`.
    pub fn assert(&self, line: SignalLine, source: SourceId) {
        match line {
            SignalLine::Irq => {
                let mut sources = lock(&self.irq);
                if !sources.contains(&source) {
                    sources.push(source);
                }
            }
            SignalLine::Nmi => {
                let mut nmi = lock(&self.nmi);
                if nmi.sources.is_empty() {
                    nmi.latched = true;
                }
                if !nmi.sources.contains(&source) {
                    nmi.sources.push(source);
                }
            }
            SignalLine::Reset => {
                let mut reset = lock(&self.reset);
                if !reset.sources.contains(&source) {
                    reset.sources.push(source);
                }
            }
        }
    }

    /// Release `source`'s hold on a line. A level line stays asserted
    /// while any other source remains.
    pub fn deassert(&self, line: SignalLine, source: SourceId) {
        match line {
            SignalLine::Irq => {
                lock(&self.irq).retain(|s| *s != source);
            }
            SignalLine::Nmi => {
                lock(&self.nmi).sources.retain(|s| *s != source);
            }
            SignalLine::Reset => {
                let mut reset = lock(&self.reset);
                let was_held = !reset.sources.is_empty();
                reset.sources.retain(|s| *s != source);
                if was_held && reset.sources.is_empty() {
                    reset.released = true;
                }
            }
        }
    }

    /// True while any source holds IRQ low.
    #[must_use]
    pub fn irq_asserted(&self) -> bool {
        !lock(&self.irq).is_empty()
    }

    /// The sources currently holding IRQ, for diagnostics.
    #[must_use]
    pub fn irq_sources(&self) -> Vec<SourceId> {
        lock(&self.irq).clone()
    }

    /// True if an unacknowledged NMI edge is latched.
    #[must_use]
    pub fn nmi_latched(&self) -> bool {
        lock(&self.nmi).latched
    }

    /// Consume the NMI edge latch (CPU acknowledgement). Returns the
    /// previous latch state.
    pub fn take_nmi(&self) -> bool {
        let mut nmi = lock(&self.nmi);
        std::mem::take(&mut nmi.latched)
    }

    /// True while any source holds RESET.
    #[must_use]
    pub fn reset_asserted(&self) -> bool {
        !lock(&self.reset).sources.is_empty()
    }

    /// Consume the "RESET was released" event.
    pub fn take_reset_release(&self) -> bool {
        let mut reset = lock(&self.reset);
        std::mem::take(&mut reset.released)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
