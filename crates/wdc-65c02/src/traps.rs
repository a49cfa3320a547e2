//! The trap seam: execution intercepts consulted before dispatch.
//!
//! A machine may substitute a host-provided handler for the emulated code
//! at selected addresses (monitor ROM entry points, OS syscalls, slot
//! firmware). The CPU consults the hook after the before-step listener and
//! before the opcode fetch; traps never fire on data accesses.

use emu_core::Bus;

use crate::Registers;

/// How the CPU resumes after a trap handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnMethod {
    /// Pop a return address from the emulated stack and add one, exactly
    /// as RTS would.
    Rts,
    /// Pop P and then the return address, exactly as RTI would.
    Rti,
    /// No synthesised return: jump to `return_address` if given, otherwise
    /// trust the handler to have set PC itself.
    #[default]
    None,
}

/// What a trap handler did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrapResult {
    /// Cycles to charge for the replaced routine.
    pub cycles_consumed: u16,
    pub return_method: ReturnMethod,
    /// Explicit redirect target, used when `return_method` is `None`.
    pub return_address: Option<u16>,
}

impl TrapResult {
    /// Handler replaced a subroutine: synthesise an RTS.
    #[must_use]
    pub const fn rts(cycles_consumed: u16) -> Self {
        Self {
            cycles_consumed,
            return_method: ReturnMethod::Rts,
            return_address: None,
        }
    }

    /// Handler replaced an interrupt service routine: synthesise an RTI.
    #[must_use]
    pub const fn rti(cycles_consumed: u16) -> Self {
        Self {
            cycles_consumed,
            return_method: ReturnMethod::Rti,
            return_address: None,
        }
    }

    /// Handler wants execution to continue at `target`.
    #[must_use]
    pub const fn redirect(cycles_consumed: u16, target: u16) -> Self {
        Self {
            cycles_consumed,
            return_method: ReturnMethod::None,
            return_address: Some(target),
        }
    }

    /// Handler set PC itself (or left it alone).
    #[must_use]
    pub const fn handled(cycles_consumed: u16) -> Self {
        Self {
            cycles_consumed,
            return_method: ReturnMethod::None,
            return_address: None,
        }
    }
}

/// The CPU view a trap handler operates on: the full register file plus
/// the bus, through which it may read, write, and `poke`.
pub struct TrapFrame<'a> {
    pub regs: &'a mut Registers,
    pub bus: &'a mut dyn Bus,
}

/// An execution-intercept table consulted once per instruction.
///
/// Returning `None` means "no trap here, fetch normally". Returning
/// `Some(result)` means the handler replaced the instruction (and possibly
/// the whole routine) at `pc`.
pub trait InstructionTrap {
    fn try_execute(&mut self, pc: u16, frame: &mut TrapFrame<'_>) -> Option<TrapResult>;
}
