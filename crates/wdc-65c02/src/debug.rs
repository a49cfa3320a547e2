//! Debug step hooks.
//!
//! A listener observes every step and may ask the CPU to stop or to start
//! the step somewhere else. Attaching a listener is cycle-neutral: events
//! are built from side-effect-free peeks and register copies.

use crate::opcodes::AddressingMode;
use crate::{HaltReason, Registers};

/// What a listener sees for one step.
#[derive(Debug, Clone, Copy)]
pub struct StepEvent {
    /// PC at the start of the step.
    pub pc: u16,
    pub opcode: u8,
    pub mnemonic: &'static str,
    pub mode: AddressingMode,
    /// Operand bytes following the opcode; only the first
    /// `operand_count` are meaningful.
    pub operands: [u8; 2],
    pub operand_count: u8,
    /// Register snapshot: pre-step for `on_before_step`, post-step for
    /// `on_after_step`.
    pub registers: Registers,
    pub halted: bool,
    pub halt_reason: Option<HaltReason>,
    /// Cycles consumed by the step (0 in before-step events).
    pub cycles: u32,
}

/// Requests a listener may make during `on_before_step`.
#[derive(Debug, Default)]
pub struct StepControl {
    stop: bool,
    pc_override: Option<u16>,
}

impl StepControl {
    /// Ask the CPU to stop. The *next* step observes the request, returns
    /// 0 cycles, and leaves all state untouched.
    pub fn request_stop(&mut self) {
        self.stop = true;
    }

    /// Start this step from a different address.
    pub fn override_pc(&mut self, pc: u16) {
        self.pc_override = Some(pc);
    }

    #[must_use]
    pub(crate) fn stop_requested(&self) -> bool {
        self.stop
    }

    #[must_use]
    pub(crate) fn pc_override(&self) -> Option<u16> {
        self.pc_override
    }
}

/// Before/after-step listener contract.
pub trait StepListener {
    fn on_before_step(&mut self, _event: &StepEvent, _control: &mut StepControl) {}
    fn on_after_step(&mut self, _event: &StepEvent) {}
}
