//! The Pocket2e machine: CPU, bus, traps, scheduler, and signal lines.

use std::sync::Arc;

use emu_core::{Bus, Cpu, Cycles, MasterClock, Scheduler, SignalBus};
use wdc_65c02::Wdc65c02;

use crate::bus::Pocket2eBus;
use crate::config::{Pocket2eConfig, CLOCK_HZ};
use crate::traps::TrapRegistry;
use crate::BuildError;

/// An assembled Pocket2e.
///
/// The machine owns everything; `step` and `run` must be called from one
/// thread. External components interact through the shared [`SignalBus`]
/// and side-effect-free peeks only.
pub struct Pocket2e {
    cpu: Wdc65c02,
    bus: Pocket2eBus,
    traps: TrapRegistry,
    scheduler: Scheduler,
    signals: Arc<SignalBus>,
}

impl Pocket2e {
    pub fn new(config: &Pocket2eConfig) -> Result<Self, BuildError> {
        Ok(Self {
            cpu: Wdc65c02::new(),
            bus: Pocket2eBus::new(config)?,
            traps: TrapRegistry::new(),
            scheduler: Scheduler::new(MasterClock::new(CLOCK_HZ)),
            signals: Arc::new(SignalBus::new()),
        })
    }

    #[must_use]
    pub fn cpu(&self) -> &Wdc65c02 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Wdc65c02 {
        &mut self.cpu
    }

    #[must_use]
    pub fn bus(&self) -> &Pocket2eBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Pocket2eBus {
        &mut self.bus
    }

    #[must_use]
    pub fn traps(&self) -> &TrapRegistry {
        &self.traps
    }

    pub fn traps_mut(&mut self) -> &mut TrapRegistry {
        &mut self.traps
    }

    /// The shared signal bus. Devices and UI threads clone this handle to
    /// assert IRQ/NMI/RESET.
    #[must_use]
    pub fn signals(&self) -> Arc<SignalBus> {
        Arc::clone(&self.signals)
    }

    /// The scheduler's monotonic cycle count.
    #[must_use]
    pub fn now(&self) -> Cycles {
        self.scheduler.now()
    }

    /// Cold/warm reset: CPU vectors and halt state, slot cards. Language
    /// Card and aux-memory latches keep their state on a warm reset.
    pub fn reset(&mut self) {
        self.cpu.clear_stop_request();
        self.cpu.reset(&mut self.bus);
        self.bus.reset();
    }

    /// Advance the machine by one instruction. Returns cycles consumed
    /// (0 when halted or stop-requested).
    pub fn step(&mut self) -> u32 {
        if self.signals.take_reset_release() {
            self.reset();
        }
        if self.signals.take_nmi() {
            self.cpu.nmi();
        }
        self.cpu.set_irq_line(self.signals.irq_asserted());

        let cycles = self.cpu.step_with(&mut self.bus, Some(&mut self.traps));
        self.scheduler.advance(u64::from(cycles));
        cycles
    }

    /// Run from `entry_point` until the CPU halts or a stop is requested.
    pub fn execute(&mut self, entry_point: u16) {
        self.cpu.regs.pc = entry_point;
        while !self.cpu.is_halted() && !self.cpu.stop_requested() {
            if self.step() == 0 {
                break;
            }
        }
    }

    /// Side-effect-free read, safe for renderers and debuggers.
    pub fn peek(&mut self, address: u16) -> u8 {
        self.bus.peek(address)
    }

    /// Debug write; lands even in ROM.
    pub fn poke(&mut self, address: u16, value: u8) {
        self.bus.poke(address, value);
    }
}
