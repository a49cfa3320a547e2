//! WDC 65C02 CPU emulator.
//!
//! This implements the CMOS 65C02 instruction set: the full documented
//! NMOS set with the CMOS fixes (JMP indirect page-boundary bug removed,
//! D cleared on interrupt entry, valid N/Z in decimal mode), the CMOS
//! additions (BRA, PHX/PHY/PLX/PLY, STZ, TRB/TSB, BIT immediate, INC/DEC
//! on the accumulator, zero-page indirect addressing, JMP (abs,X)), the
//! Rockwell bit instructions (RMB/SMB/BBR/BBS), and the WAI/STP halt
//! instructions.
//!
//! Execution is instruction-stepped: each `step` runs one instruction to
//! completion and returns its cycle cost from the 65C02 reference table,
//! including page-cross and branch penalties. Undefined opcodes halt the
//! CPU after one cycle rather than executing as no-ops, so runaway code is
//! caught instead of silently skidding through garbage.
//!
//! Two seams let a host wrap execution without touching the interpreter:
//! an [`InstructionTrap`] hook consulted once per instruction (used for
//! ROM call interception), and a [`StepListener`] that observes every step
//! and may request a stop.

use emu_core::{Bus, Cpu};

mod addressing;
mod debug;
mod flags;
mod opcodes;
mod registers;
mod traps;

pub use debug::{StepControl, StepEvent, StepListener};
pub use flags::Status;
pub use opcodes::{AddressingMode, OpcodeInfo, OPCODES};
pub use registers::Registers;
pub use traps::{InstructionTrap, ReturnMethod, TrapFrame, TrapResult};

/// NMI vector.
pub const VECTOR_NMI: u16 = 0xFFFA;
/// Reset vector.
pub const VECTOR_RESET: u16 = 0xFFFC;
/// IRQ/BRK vector.
pub const VECTOR_IRQ: u16 = 0xFFFE;

/// Why the CPU is halted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// STP executed; only reset restarts the CPU.
    Stp,
    /// WAI executed; an interrupt resumes execution.
    Wai,
    /// An undefined opcode was fetched.
    IllegalOpcode,
}

/// The WDC 65C02 CPU.
pub struct Wdc65c02 {
    /// The architectural register file.
    pub regs: Registers,
    /// Total cycles executed, for debugging and access stamping.
    pub(crate) cycles: u64,
    halt: Option<HaltReason>,
    pending_stop: bool,
    /// NMI edge latch.
    nmi_pending: bool,
    /// IRQ level, sampled at the top of each step.
    irq_line: bool,
    debugger: Option<Box<dyn StepListener>>,
}

impl Wdc65c02 {
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            cycles: 0,
            halt: None,
            pending_stop: false,
            nmi_pending: false,
            irq_line: false,
            debugger: None,
        }
    }

    /// Total cycles executed since construction.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    #[must_use]
    pub fn halt_reason(&self) -> Option<HaltReason> {
        self.halt
    }

    /// True when the CPU is halted by STP, WAI, or an undefined opcode.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halt.is_some()
    }

    /// Assert or release the level-triggered IRQ line. The level is
    /// re-examined at the top of every step.
    pub fn set_irq_line(&mut self, asserted: bool) {
        self.irq_line = asserted;
    }

    /// Latch a non-maskable interrupt edge.
    pub fn nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// The current program counter.
    #[must_use]
    pub fn pc(&self) -> u16 {
        self.regs.pc
    }

    /// Ask the CPU to stop. The next step returns 0 cycles and leaves all
    /// state untouched; the request stays pending until cleared.
    pub fn request_stop(&mut self) {
        self.pending_stop = true;
    }

    pub fn clear_stop_request(&mut self) {
        self.pending_stop = false;
    }

    #[must_use]
    pub fn stop_requested(&self) -> bool {
        self.pending_stop
    }

    pub fn attach_debugger(&mut self, listener: Box<dyn StepListener>) {
        self.debugger = Some(listener);
    }

    pub fn detach_debugger(&mut self) -> Option<Box<dyn StepListener>> {
        self.debugger.take()
    }

    /// Execute one instruction, consulting `traps` before dispatch.
    ///
    /// Step order: halt check, stop-request check, interrupt check (NMI
    /// wins over IRQ; IRQ is masked by I), before-step hook, trap check,
    /// fetch/decode/execute, after-step hook.
    pub fn step_with<B: Bus>(
        &mut self,
        bus: &mut B,
        mut traps: Option<&mut dyn InstructionTrap>,
    ) -> u32 {
        match self.halt {
            Some(HaltReason::Stp | HaltReason::IllegalOpcode) => return 0,
            Some(HaltReason::Wai) => {
                let wake = self.nmi_pending
                    || (self.irq_line && !self.regs.p.is_interrupt_disabled());
                if wake {
                    self.halt = None;
                } else {
                    return 0;
                }
            }
            None => {}
        }

        if self.pending_stop {
            return 0;
        }

        if self.nmi_pending {
            self.nmi_pending = false;
            return self.interrupt_sequence(bus, VECTOR_NMI, "NMI");
        }
        if self.irq_line && !self.regs.p.is_interrupt_disabled() {
            return self.interrupt_sequence(bus, VECTOR_IRQ, "IRQ");
        }

        if self.debugger.is_some() {
            let event = self.make_event(bus, self.regs.pc, 0);
            let mut control = StepControl::default();
            if let Some(listener) = self.debugger.as_deref_mut() {
                listener.on_before_step(&event, &mut control);
            }
            if control.stop_requested() {
                self.pending_stop = true;
            }
            if let Some(pc) = control.pc_override() {
                self.regs.pc = pc;
            }
        }

        // Trap check: a hook here replaces the instruction (and usually
        // the whole ROM routine) at PC. Traps only ever fire on
        // instruction dispatch, never on data accesses.
        if let Some(hook) = traps.as_deref_mut() {
            let pc = self.regs.pc;
            let result = {
                let mut frame = TrapFrame {
                    regs: &mut self.regs,
                    bus: &mut *bus,
                };
                hook.try_execute(pc, &mut frame)
            };
            if let Some(result) = result {
                match result.return_method {
                    ReturnMethod::Rts => {
                        let ret = self.pull_word(bus);
                        self.regs.pc = ret.wrapping_add(1);
                    }
                    ReturnMethod::Rti => {
                        let p = self.pull(bus);
                        self.regs.p = Status::from_stack(p);
                        self.regs.pc = self.pull_word(bus);
                    }
                    ReturnMethod::None => {
                        if let Some(target) = result.return_address {
                            self.regs.pc = target;
                        }
                        // Otherwise the handler set PC itself.
                    }
                }
                let cycles = u32::from(result.cycles_consumed);
                self.cycles += u64::from(cycles);
                self.emit_after(bus, pc, cycles);
                return cycles;
            }
        }

        let pc_before = self.regs.pc;
        let opcode = self.fetch(bus);
        let cycles = self.execute(bus, opcode);
        self.cycles += u64::from(cycles);
        self.emit_after(bus, pc_before, cycles);
        cycles
    }

    /// Push PC and P (B clear), set I, clear D, load the vector.
    fn interrupt_sequence(&mut self, bus: &mut impl Bus, vector: u16, label: &'static str) -> u32 {
        let pc_before = self.regs.pc;
        self.push_word(bus, self.regs.pc);
        let p = self.regs.p.for_push(false);
        self.push(bus, p);
        self.regs.p.insert(Status::INTERRUPT_DISABLE);
        self.regs.p.remove(Status::DECIMAL);
        self.regs.pc = self.read_word(bus, vector);
        self.cycles += 7;

        if self.debugger.is_some() {
            let event = StepEvent {
                pc: pc_before,
                opcode: 0,
                mnemonic: label,
                mode: AddressingMode::Implied,
                operands: [0; 2],
                operand_count: 0,
                registers: self.regs,
                halted: false,
                halt_reason: None,
                cycles: 7,
            };
            if let Some(listener) = self.debugger.as_deref_mut() {
                listener.on_after_step(&event);
            }
        }
        7
    }

    /// Build a step event from peeks and register copies; never perturbs
    /// machine state, keeping debugger attachment cycle-neutral.
    fn make_event(&self, bus: &mut impl Bus, pc: u16, cycles: u32) -> StepEvent {
        let opcode = bus.peek(pc);
        let info = &OPCODES[opcode as usize];
        let count = info.operand_count().min(2);
        let mut operands = [0u8; 2];
        for (i, slot) in operands.iter_mut().enumerate().take(count as usize) {
            *slot = bus.peek(pc.wrapping_add(1 + i as u16));
        }
        StepEvent {
            pc,
            opcode,
            mnemonic: info.mnemonic,
            mode: info.mode,
            operands,
            operand_count: count,
            registers: self.regs,
            halted: self.halt.is_some(),
            halt_reason: self.halt,
            cycles,
        }
    }

    fn emit_after(&mut self, bus: &mut impl Bus, pc: u16, cycles: u32) {
        if self.debugger.is_none() {
            return;
        }
        let event = self.make_event(bus, pc, cycles);
        if let Some(listener) = self.debugger.as_deref_mut() {
            listener.on_after_step(&event);
        }
    }

    /// Extra cycle charged by ADC/SBC in decimal mode on the 65C02.
    fn decimal_penalty(&self) -> u32 {
        u32::from(self.regs.p.is_decimal_set())
    }

    // =========================================================================
    // ALU operations
    // =========================================================================

    /// ADC - Add with Carry
    fn adc(&mut self, value: u8) {
        if self.regs.p.is_decimal_set() {
            self.adc_decimal(value);
        } else {
            self.adc_binary(value);
        }
    }

    fn adc_binary(&mut self, value: u8) {
        let a = u16::from(self.regs.a);
        let v = u16::from(value);
        let c = u16::from(self.regs.p.is_carry_set());

        let sum = a + v + c;
        let result = sum as u8;

        self.regs.p.set_if(Status::CARRY, sum > 0xFF);
        self.regs.p.set_if(
            Status::OVERFLOW,
            (self.regs.a ^ result) & (value ^ result) & 0x80 != 0,
        );
        self.regs.p.set_zero_and_negative(result);
        self.regs.a = result;
    }

    /// CMOS decimal add: nibbles adjusted after the add, N/Z valid on the
    /// decimal result (the NMOS parts left them on the binary result).
    fn adc_decimal(&mut self, value: u8) {
        let a = u16::from(self.regs.a);
        let v = u16::from(value);
        let c = u16::from(self.regs.p.is_carry_set());

        let binary = a + v + c;

        let mut low = (a & 0x0F) + (v & 0x0F) + c;
        let mut high = (a >> 4) + (v >> 4);
        if low > 9 {
            low += 6;
        }
        if low > 0x0F {
            high += 1;
            low &= 0x0F;
        }

        self.regs
            .p
            .set_if(Status::OVERFLOW, (a ^ binary) & (v ^ binary) & 0x80 != 0);

        if high > 9 {
            high += 6;
        }
        self.regs.p.set_if(Status::CARRY, high > 0x0F);

        let result = (((high & 0x0F) << 4) | low) as u8;
        self.regs.p.set_zero_and_negative(result);
        self.regs.a = result;
    }

    /// SBC - Subtract with Carry (borrow)
    fn sbc(&mut self, value: u8) {
        if self.regs.p.is_decimal_set() {
            self.sbc_decimal(value);
        } else {
            self.sbc_binary(value);
        }
    }

    fn sbc_binary(&mut self, value: u8) {
        let a = u16::from(self.regs.a);
        let v = u16::from(value);
        let borrow = u16::from(!self.regs.p.is_carry_set());

        let diff = a.wrapping_sub(v).wrapping_sub(borrow);
        let result = diff as u8;

        self.regs.p.set_if(Status::CARRY, diff < 0x100);
        self.regs.p.set_if(
            Status::OVERFLOW,
            (self.regs.a ^ value) & (self.regs.a ^ result) & 0x80 != 0,
        );
        self.regs.p.set_zero_and_negative(result);
        self.regs.a = result;
    }

    /// CMOS decimal subtract; N/Z valid on the decimal result.
    fn sbc_decimal(&mut self, value: u8) {
        let a = i16::from(self.regs.a);
        let v = i16::from(value);
        let borrow = i16::from(!self.regs.p.is_carry_set());

        let binary = a - v - borrow;

        let mut low = (a & 0x0F) - (v & 0x0F) - borrow;
        let mut high = (a >> 4) - (v >> 4);
        if low < 0 {
            low += 10;
            high -= 1;
        }
        if high < 0 {
            high += 10;
        }

        self.regs.p.set_if(Status::CARRY, binary >= 0);
        self.regs
            .p
            .set_if(Status::OVERFLOW, (a ^ v) & (a ^ binary) & 0x80 != 0);

        let result = (((high as u8) & 0x0F) << 4) | ((low as u8) & 0x0F);
        self.regs.p.set_zero_and_negative(result);
        self.regs.a = result;
    }

    /// CMP/CPX/CPY - compare register against operand without storing.
    fn compare(&mut self, reg: u8, value: u8) {
        let result = reg.wrapping_sub(value);
        self.regs.p.set_if(Status::CARRY, reg >= value);
        self.regs.p.set_zero_and_negative(result);
    }

    /// ASL - Arithmetic Shift Left
    fn asl(&mut self, value: u8) -> u8 {
        self.regs.p.set_if(Status::CARRY, value & 0x80 != 0);
        let result = value << 1;
        self.regs.p.set_zero_and_negative(result);
        result
    }

    /// LSR - Logical Shift Right
    fn lsr(&mut self, value: u8) -> u8 {
        self.regs.p.set_if(Status::CARRY, value & 0x01 != 0);
        let result = value >> 1;
        self.regs.p.set_zero_and_negative(result);
        result
    }

    /// ROL - Rotate Left through carry
    fn rol(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.regs.p.is_carry_set());
        self.regs.p.set_if(Status::CARRY, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.regs.p.set_zero_and_negative(result);
        result
    }

    /// ROR - Rotate Right through carry
    fn ror(&mut self, value: u8) -> u8 {
        let carry_in = if self.regs.p.is_carry_set() { 0x80 } else { 0 };
        self.regs.p.set_if(Status::CARRY, value & 0x01 != 0);
        let result = (value >> 1) | carry_in;
        self.regs.p.set_zero_and_negative(result);
        result
    }

    /// BIT - Z from A AND operand, N and V copied from the operand.
    fn bit(&mut self, value: u8) {
        self.regs.p.set_if(Status::ZERO, self.regs.a & value == 0);
        self.regs.p.set_if(Status::NEGATIVE, value & 0x80 != 0);
        self.regs.p.set_if(Status::OVERFLOW, value & 0x40 != 0);
    }

    /// TSB - test and set bits. Returns the new memory value.
    fn tsb(&mut self, value: u8) -> u8 {
        self.regs.p.set_if(Status::ZERO, self.regs.a & value == 0);
        value | self.regs.a
    }

    /// TRB - test and reset bits. Returns the new memory value.
    fn trb(&mut self, value: u8) -> u8 {
        self.regs.p.set_if(Status::ZERO, self.regs.a & value == 0);
        value & !self.regs.a
    }

    // =========================================================================
    // Composite instruction forms
    // =========================================================================

    /// BBR/BBS: branch on bit `bit` of a zero-page byte being `set`.
    fn op_branch_bit(&mut self, bus: &mut impl Bus, bit: u8, set: bool) -> u32 {
        let addr = self.addr_zero_page(bus);
        let value = self.read(bus, addr);
        let taken = ((value >> bit) & 1 != 0) == set;
        5 + self.branch_if(bus, taken)
    }

    /// RMB/SMB: clear or set bit `bit` of a zero-page byte.
    fn op_modify_bit(&mut self, bus: &mut impl Bus, bit: u8, set: bool) -> u32 {
        let addr = self.addr_zero_page(bus);
        let value = self.read(bus, addr);
        let result = if set {
            value | (1 << bit)
        } else {
            value & !(1 << bit)
        };
        self.write(bus, addr, result);
        5
    }

    fn execute(&mut self, bus: &mut impl Bus, opcode: u8) -> u32 {
        match opcode {
            // =====================================================================
            // Load/Store Operations
            // =====================================================================

            // LDA - Load Accumulator
            0xA9 => {
                // LDA #nn (Immediate)
                self.regs.a = self.fetch(bus);
                self.regs.p.set_zero_and_negative(self.regs.a);
                2
            }
            0xA5 => {
                // LDA $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                self.regs.a = self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                3
            }
            0xB5 => {
                // LDA $nn,X (Zero Page,X)
                let addr = self.addr_zero_page_x(bus);
                self.regs.a = self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                4
            }
            0xAD => {
                // LDA $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                self.regs.a = self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                4
            }
            0xBD => {
                // LDA $nnnn,X (Absolute,X)
                let (addr, crossed) = self.addr_absolute_x(bus);
                self.regs.a = self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                4 + u32::from(crossed)
            }
            0xB9 => {
                // LDA $nnnn,Y (Absolute,Y)
                let (addr, crossed) = self.addr_absolute_y(bus);
                self.regs.a = self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                4 + u32::from(crossed)
            }
            0xA1 => {
                // LDA ($nn,X) (Indexed Indirect)
                let addr = self.addr_indexed_indirect(bus);
                self.regs.a = self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                6
            }
            0xB1 => {
                // LDA ($nn),Y (Indirect Indexed)
                let (addr, crossed) = self.addr_indirect_indexed(bus);
                self.regs.a = self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                5 + u32::from(crossed)
            }
            0xB2 => {
                // LDA ($nn) (Zero Page Indirect)
                let addr = self.addr_zero_page_indirect(bus);
                self.regs.a = self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                5
            }

            // LDX - Load X Register
            0xA2 => {
                // LDX #nn (Immediate)
                self.regs.x = self.fetch(bus);
                self.regs.p.set_zero_and_negative(self.regs.x);
                2
            }
            0xA6 => {
                // LDX $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                self.regs.x = self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.x);
                3
            }
            0xB6 => {
                // LDX $nn,Y (Zero Page,Y)
                let addr = self.addr_zero_page_y(bus);
                self.regs.x = self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.x);
                4
            }
            0xAE => {
                // LDX $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                self.regs.x = self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.x);
                4
            }
            0xBE => {
                // LDX $nnnn,Y (Absolute,Y)
                let (addr, crossed) = self.addr_absolute_y(bus);
                self.regs.x = self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.x);
                4 + u32::from(crossed)
            }

            // LDY - Load Y Register
            0xA0 => {
                // LDY #nn (Immediate)
                self.regs.y = self.fetch(bus);
                self.regs.p.set_zero_and_negative(self.regs.y);
                2
            }
            0xA4 => {
                // LDY $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                self.regs.y = self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.y);
                3
            }
            0xB4 => {
                // LDY $nn,X (Zero Page,X)
                let addr = self.addr_zero_page_x(bus);
                self.regs.y = self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.y);
                4
            }
            0xAC => {
                // LDY $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                self.regs.y = self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.y);
                4
            }
            0xBC => {
                // LDY $nnnn,X (Absolute,X)
                let (addr, crossed) = self.addr_absolute_x(bus);
                self.regs.y = self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.y);
                4 + u32::from(crossed)
            }

            // STA - Store Accumulator
            0x85 => {
                // STA $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                self.write(bus, addr, self.regs.a);
                3
            }
            0x95 => {
                // STA $nn,X (Zero Page,X)
                let addr = self.addr_zero_page_x(bus);
                self.write(bus, addr, self.regs.a);
                4
            }
            0x8D => {
                // STA $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                self.write(bus, addr, self.regs.a);
                4
            }
            0x9D => {
                // STA $nnnn,X (Absolute,X) - penalty always paid
                let addr = self.addr_absolute_x_write(bus);
                self.write(bus, addr, self.regs.a);
                5
            }
            0x99 => {
                // STA $nnnn,Y (Absolute,Y) - penalty always paid
                let addr = self.addr_absolute_y_write(bus);
                self.write(bus, addr, self.regs.a);
                5
            }
            0x81 => {
                // STA ($nn,X) (Indexed Indirect)
                let addr = self.addr_indexed_indirect(bus);
                self.write(bus, addr, self.regs.a);
                6
            }
            0x91 => {
                // STA ($nn),Y (Indirect Indexed) - penalty always paid
                let addr = self.addr_indirect_indexed_write(bus);
                self.write(bus, addr, self.regs.a);
                6
            }
            0x92 => {
                // STA ($nn) (Zero Page Indirect)
                let addr = self.addr_zero_page_indirect(bus);
                self.write(bus, addr, self.regs.a);
                5
            }

            // STX - Store X Register
            0x86 => {
                // STX $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                self.write(bus, addr, self.regs.x);
                3
            }
            0x96 => {
                // STX $nn,Y (Zero Page,Y)
                let addr = self.addr_zero_page_y(bus);
                self.write(bus, addr, self.regs.x);
                4
            }
            0x8E => {
                // STX $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                self.write(bus, addr, self.regs.x);
                4
            }

            // STY - Store Y Register
            0x84 => {
                // STY $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                self.write(bus, addr, self.regs.y);
                3
            }
            0x94 => {
                // STY $nn,X (Zero Page,X)
                let addr = self.addr_zero_page_x(bus);
                self.write(bus, addr, self.regs.y);
                4
            }
            0x8C => {
                // STY $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                self.write(bus, addr, self.regs.y);
                4
            }

            // STZ - Store Zero (65C02)
            0x64 => {
                // STZ $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                self.write(bus, addr, 0);
                3
            }
            0x74 => {
                // STZ $nn,X (Zero Page,X)
                let addr = self.addr_zero_page_x(bus);
                self.write(bus, addr, 0);
                4
            }
            0x9C => {
                // STZ $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                self.write(bus, addr, 0);
                4
            }
            0x9E => {
                // STZ $nnnn,X (Absolute,X) - penalty always paid
                let addr = self.addr_absolute_x_write(bus);
                self.write(bus, addr, 0);
                5
            }

            // =====================================================================
            // Register Transfers
            // =====================================================================
            0xAA => {
                // TAX
                self.regs.x = self.regs.a;
                self.regs.p.set_zero_and_negative(self.regs.x);
                2
            }
            0xA8 => {
                // TAY
                self.regs.y = self.regs.a;
                self.regs.p.set_zero_and_negative(self.regs.y);
                2
            }
            0x8A => {
                // TXA
                self.regs.a = self.regs.x;
                self.regs.p.set_zero_and_negative(self.regs.a);
                2
            }
            0x98 => {
                // TYA
                self.regs.a = self.regs.y;
                self.regs.p.set_zero_and_negative(self.regs.a);
                2
            }
            0xBA => {
                // TSX
                self.regs.x = self.regs.sp;
                self.regs.p.set_zero_and_negative(self.regs.x);
                2
            }
            0x9A => {
                // TXS - no flags
                self.regs.sp = self.regs.x;
                2
            }

            // =====================================================================
            // Stack Operations
            // =====================================================================
            0x48 => {
                // PHA
                self.push(bus, self.regs.a);
                3
            }
            0x08 => {
                // PHP - B flag set in the pushed copy
                let p = self.regs.p.for_push(true);
                self.push(bus, p);
                3
            }
            0x68 => {
                // PLA
                self.regs.a = self.pull(bus);
                self.regs.p.set_zero_and_negative(self.regs.a);
                4
            }
            0x28 => {
                // PLP
                let p = self.pull(bus);
                self.regs.p = Status::from_stack(p);
                4
            }
            0xDA => {
                // PHX (65C02)
                self.push(bus, self.regs.x);
                3
            }
            0x5A => {
                // PHY (65C02)
                self.push(bus, self.regs.y);
                3
            }
            0xFA => {
                // PLX (65C02)
                self.regs.x = self.pull(bus);
                self.regs.p.set_zero_and_negative(self.regs.x);
                4
            }
            0x7A => {
                // PLY (65C02)
                self.regs.y = self.pull(bus);
                self.regs.p.set_zero_and_negative(self.regs.y);
                4
            }

            // =====================================================================
            // Arithmetic Operations
            // =====================================================================

            // ADC - Add with Carry (+1 cycle in decimal mode)
            0x69 => {
                // ADC #nn (Immediate)
                let penalty = self.decimal_penalty();
                let value = self.fetch(bus);
                self.adc(value);
                2 + penalty
            }
            0x65 => {
                // ADC $nn (Zero Page)
                let penalty = self.decimal_penalty();
                let addr = self.addr_zero_page(bus);
                let value = self.read(bus, addr);
                self.adc(value);
                3 + penalty
            }
            0x75 => {
                // ADC $nn,X (Zero Page,X)
                let penalty = self.decimal_penalty();
                let addr = self.addr_zero_page_x(bus);
                let value = self.read(bus, addr);
                self.adc(value);
                4 + penalty
            }
            0x6D => {
                // ADC $nnnn (Absolute)
                let penalty = self.decimal_penalty();
                let addr = self.addr_absolute(bus);
                let value = self.read(bus, addr);
                self.adc(value);
                4 + penalty
            }
            0x7D => {
                // ADC $nnnn,X (Absolute,X)
                let penalty = self.decimal_penalty();
                let (addr, crossed) = self.addr_absolute_x(bus);
                let value = self.read(bus, addr);
                self.adc(value);
                4 + u32::from(crossed) + penalty
            }
            0x79 => {
                // ADC $nnnn,Y (Absolute,Y)
                let penalty = self.decimal_penalty();
                let (addr, crossed) = self.addr_absolute_y(bus);
                let value = self.read(bus, addr);
                self.adc(value);
                4 + u32::from(crossed) + penalty
            }
            0x61 => {
                // ADC ($nn,X) (Indexed Indirect)
                let penalty = self.decimal_penalty();
                let addr = self.addr_indexed_indirect(bus);
                let value = self.read(bus, addr);
                self.adc(value);
                6 + penalty
            }
            0x71 => {
                // ADC ($nn),Y (Indirect Indexed)
                let penalty = self.decimal_penalty();
                let (addr, crossed) = self.addr_indirect_indexed(bus);
                let value = self.read(bus, addr);
                self.adc(value);
                5 + u32::from(crossed) + penalty
            }
            0x72 => {
                // ADC ($nn) (Zero Page Indirect)
                let penalty = self.decimal_penalty();
                let addr = self.addr_zero_page_indirect(bus);
                let value = self.read(bus, addr);
                self.adc(value);
                5 + penalty
            }

            // SBC - Subtract with Carry (+1 cycle in decimal mode)
            0xE9 => {
                // SBC #nn (Immediate)
                let penalty = self.decimal_penalty();
                let value = self.fetch(bus);
                self.sbc(value);
                2 + penalty
            }
            0xE5 => {
                // SBC $nn (Zero Page)
                let penalty = self.decimal_penalty();
                let addr = self.addr_zero_page(bus);
                let value = self.read(bus, addr);
                self.sbc(value);
                3 + penalty
            }
            0xF5 => {
                // SBC $nn,X (Zero Page,X)
                let penalty = self.decimal_penalty();
                let addr = self.addr_zero_page_x(bus);
                let value = self.read(bus, addr);
                self.sbc(value);
                4 + penalty
            }
            0xED => {
                // SBC $nnnn (Absolute)
                let penalty = self.decimal_penalty();
                let addr = self.addr_absolute(bus);
                let value = self.read(bus, addr);
                self.sbc(value);
                4 + penalty
            }
            0xFD => {
                // SBC $nnnn,X (Absolute,X)
                let penalty = self.decimal_penalty();
                let (addr, crossed) = self.addr_absolute_x(bus);
                let value = self.read(bus, addr);
                self.sbc(value);
                4 + u32::from(crossed) + penalty
            }
            0xF9 => {
                // SBC $nnnn,Y (Absolute,Y)
                let penalty = self.decimal_penalty();
                let (addr, crossed) = self.addr_absolute_y(bus);
                let value = self.read(bus, addr);
                self.sbc(value);
                4 + u32::from(crossed) + penalty
            }
            0xE1 => {
                // SBC ($nn,X) (Indexed Indirect)
                let penalty = self.decimal_penalty();
                let addr = self.addr_indexed_indirect(bus);
                let value = self.read(bus, addr);
                self.sbc(value);
                6 + penalty
            }
            0xF1 => {
                // SBC ($nn),Y (Indirect Indexed)
                let penalty = self.decimal_penalty();
                let (addr, crossed) = self.addr_indirect_indexed(bus);
                let value = self.read(bus, addr);
                self.sbc(value);
                5 + u32::from(crossed) + penalty
            }
            0xF2 => {
                // SBC ($nn) (Zero Page Indirect)
                let penalty = self.decimal_penalty();
                let addr = self.addr_zero_page_indirect(bus);
                let value = self.read(bus, addr);
                self.sbc(value);
                5 + penalty
            }

            // =====================================================================
            // Compare Operations
            // =====================================================================

            // CMP - Compare Accumulator
            0xC9 => {
                // CMP #nn (Immediate)
                let value = self.fetch(bus);
                self.compare(self.regs.a, value);
                2
            }
            0xC5 => {
                // CMP $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                let value = self.read(bus, addr);
                self.compare(self.regs.a, value);
                3
            }
            0xD5 => {
                // CMP $nn,X (Zero Page,X)
                let addr = self.addr_zero_page_x(bus);
                let value = self.read(bus, addr);
                self.compare(self.regs.a, value);
                4
            }
            0xCD => {
                // CMP $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                let value = self.read(bus, addr);
                self.compare(self.regs.a, value);
                4
            }
            0xDD => {
                // CMP $nnnn,X (Absolute,X)
                let (addr, crossed) = self.addr_absolute_x(bus);
                let value = self.read(bus, addr);
                self.compare(self.regs.a, value);
                4 + u32::from(crossed)
            }
            0xD9 => {
                // CMP $nnnn,Y (Absolute,Y)
                let (addr, crossed) = self.addr_absolute_y(bus);
                let value = self.read(bus, addr);
                self.compare(self.regs.a, value);
                4 + u32::from(crossed)
            }
            0xC1 => {
                // CMP ($nn,X) (Indexed Indirect)
                let addr = self.addr_indexed_indirect(bus);
                let value = self.read(bus, addr);
                self.compare(self.regs.a, value);
                6
            }
            0xD1 => {
                // CMP ($nn),Y (Indirect Indexed)
                let (addr, crossed) = self.addr_indirect_indexed(bus);
                let value = self.read(bus, addr);
                self.compare(self.regs.a, value);
                5 + u32::from(crossed)
            }
            0xD2 => {
                // CMP ($nn) (Zero Page Indirect)
                let addr = self.addr_zero_page_indirect(bus);
                let value = self.read(bus, addr);
                self.compare(self.regs.a, value);
                5
            }

            // CPX - Compare X Register
            0xE0 => {
                // CPX #nn (Immediate)
                let value = self.fetch(bus);
                self.compare(self.regs.x, value);
                2
            }
            0xE4 => {
                // CPX $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                let value = self.read(bus, addr);
                self.compare(self.regs.x, value);
                3
            }
            0xEC => {
                // CPX $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                let value = self.read(bus, addr);
                self.compare(self.regs.x, value);
                4
            }

            // CPY - Compare Y Register
            0xC0 => {
                // CPY #nn (Immediate)
                let value = self.fetch(bus);
                self.compare(self.regs.y, value);
                2
            }
            0xC4 => {
                // CPY $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                let value = self.read(bus, addr);
                self.compare(self.regs.y, value);
                3
            }
            0xCC => {
                // CPY $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                let value = self.read(bus, addr);
                self.compare(self.regs.y, value);
                4
            }

            // =====================================================================
            // Logical Operations
            // =====================================================================

            // AND - Logical AND
            0x29 => {
                // AND #nn (Immediate)
                let value = self.fetch(bus);
                self.regs.a &= value;
                self.regs.p.set_zero_and_negative(self.regs.a);
                2
            }
            0x25 => {
                // AND $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                self.regs.a &= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                3
            }
            0x35 => {
                // AND $nn,X (Zero Page,X)
                let addr = self.addr_zero_page_x(bus);
                self.regs.a &= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                4
            }
            0x2D => {
                // AND $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                self.regs.a &= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                4
            }
            0x3D => {
                // AND $nnnn,X (Absolute,X)
                let (addr, crossed) = self.addr_absolute_x(bus);
                self.regs.a &= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                4 + u32::from(crossed)
            }
            0x39 => {
                // AND $nnnn,Y (Absolute,Y)
                let (addr, crossed) = self.addr_absolute_y(bus);
                self.regs.a &= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                4 + u32::from(crossed)
            }
            0x21 => {
                // AND ($nn,X) (Indexed Indirect)
                let addr = self.addr_indexed_indirect(bus);
                self.regs.a &= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                6
            }
            0x31 => {
                // AND ($nn),Y (Indirect Indexed)
                let (addr, crossed) = self.addr_indirect_indexed(bus);
                self.regs.a &= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                5 + u32::from(crossed)
            }
            0x32 => {
                // AND ($nn) (Zero Page Indirect)
                let addr = self.addr_zero_page_indirect(bus);
                self.regs.a &= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                5
            }

            // ORA - Logical OR
            0x09 => {
                // ORA #nn (Immediate)
                let value = self.fetch(bus);
                self.regs.a |= value;
                self.regs.p.set_zero_and_negative(self.regs.a);
                2
            }
            0x05 => {
                // ORA $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                self.regs.a |= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                3
            }
            0x15 => {
                // ORA $nn,X (Zero Page,X)
                let addr = self.addr_zero_page_x(bus);
                self.regs.a |= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                4
            }
            0x0D => {
                // ORA $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                self.regs.a |= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                4
            }
            0x1D => {
                // ORA $nnnn,X (Absolute,X)
                let (addr, crossed) = self.addr_absolute_x(bus);
                self.regs.a |= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                4 + u32::from(crossed)
            }
            0x19 => {
                // ORA $nnnn,Y (Absolute,Y)
                let (addr, crossed) = self.addr_absolute_y(bus);
                self.regs.a |= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                4 + u32::from(crossed)
            }
            0x01 => {
                // ORA ($nn,X) (Indexed Indirect)
                let addr = self.addr_indexed_indirect(bus);
                self.regs.a |= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                6
            }
            0x11 => {
                // ORA ($nn),Y (Indirect Indexed)
                let (addr, crossed) = self.addr_indirect_indexed(bus);
                self.regs.a |= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                5 + u32::from(crossed)
            }
            0x12 => {
                // ORA ($nn) (Zero Page Indirect)
                let addr = self.addr_zero_page_indirect(bus);
                self.regs.a |= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                5
            }

            // EOR - Exclusive OR
            0x49 => {
                // EOR #nn (Immediate)
                let value = self.fetch(bus);
                self.regs.a ^= value;
                self.regs.p.set_zero_and_negative(self.regs.a);
                2
            }
            0x45 => {
                // EOR $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                self.regs.a ^= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                3
            }
            0x55 => {
                // EOR $nn,X (Zero Page,X)
                let addr = self.addr_zero_page_x(bus);
                self.regs.a ^= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                4
            }
            0x4D => {
                // EOR $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                self.regs.a ^= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                4
            }
            0x5D => {
                // EOR $nnnn,X (Absolute,X)
                let (addr, crossed) = self.addr_absolute_x(bus);
                self.regs.a ^= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                4 + u32::from(crossed)
            }
            0x59 => {
                // EOR $nnnn,Y (Absolute,Y)
                let (addr, crossed) = self.addr_absolute_y(bus);
                self.regs.a ^= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                4 + u32::from(crossed)
            }
            0x41 => {
                // EOR ($nn,X) (Indexed Indirect)
                let addr = self.addr_indexed_indirect(bus);
                self.regs.a ^= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                6
            }
            0x51 => {
                // EOR ($nn),Y (Indirect Indexed)
                let (addr, crossed) = self.addr_indirect_indexed(bus);
                self.regs.a ^= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                5 + u32::from(crossed)
            }
            0x52 => {
                // EOR ($nn) (Zero Page Indirect)
                let addr = self.addr_zero_page_indirect(bus);
                self.regs.a ^= self.read(bus, addr);
                self.regs.p.set_zero_and_negative(self.regs.a);
                5
            }

            // =====================================================================
            // Bit Tests
            // =====================================================================
            0x24 => {
                // BIT $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                let value = self.read(bus, addr);
                self.bit(value);
                3
            }
            0x2C => {
                // BIT $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                let value = self.read(bus, addr);
                self.bit(value);
                4
            }
            0x34 => {
                // BIT $nn,X (Zero Page,X) (65C02)
                let addr = self.addr_zero_page_x(bus);
                let value = self.read(bus, addr);
                self.bit(value);
                4
            }
            0x3C => {
                // BIT $nnnn,X (Absolute,X) (65C02)
                let (addr, crossed) = self.addr_absolute_x(bus);
                let value = self.read(bus, addr);
                self.bit(value);
                4 + u32::from(crossed)
            }
            0x89 => {
                // BIT #nn (Immediate) (65C02) - only Z is affected
                let value = self.fetch(bus);
                self.regs.p.set_if(Status::ZERO, self.regs.a & value == 0);
                2
            }

            // TSB/TRB - Test and Set/Reset Bits (65C02)
            0x04 => {
                // TSB $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                let value = self.read(bus, addr);
                let result = self.tsb(value);
                self.write(bus, addr, result);
                5
            }
            0x0C => {
                // TSB $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                let value = self.read(bus, addr);
                let result = self.tsb(value);
                self.write(bus, addr, result);
                6
            }
            0x14 => {
                // TRB $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                let value = self.read(bus, addr);
                let result = self.trb(value);
                self.write(bus, addr, result);
                5
            }
            0x1C => {
                // TRB $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                let value = self.read(bus, addr);
                let result = self.trb(value);
                self.write(bus, addr, result);
                6
            }

            // =====================================================================
            // Shifts and Rotates
            // =====================================================================
            0x0A => {
                // ASL A
                self.regs.a = self.asl(self.regs.a);
                2
            }
            0x06 => {
                // ASL $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                let value = self.read(bus, addr);
                let result = self.asl(value);
                self.write(bus, addr, result);
                5
            }
            0x16 => {
                // ASL $nn,X (Zero Page,X)
                let addr = self.addr_zero_page_x(bus);
                let value = self.read(bus, addr);
                let result = self.asl(value);
                self.write(bus, addr, result);
                6
            }
            0x0E => {
                // ASL $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                let value = self.read(bus, addr);
                let result = self.asl(value);
                self.write(bus, addr, result);
                6
            }
            0x1E => {
                // ASL $nnnn,X (Absolute,X) - 6 cycles, 7 on page cross (CMOS)
                let (addr, crossed) = self.addr_absolute_x(bus);
                let value = self.read(bus, addr);
                let result = self.asl(value);
                self.write(bus, addr, result);
                6 + u32::from(crossed)
            }
            0x4A => {
                // LSR A
                self.regs.a = self.lsr(self.regs.a);
                2
            }
            0x46 => {
                // LSR $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                let value = self.read(bus, addr);
                let result = self.lsr(value);
                self.write(bus, addr, result);
                5
            }
            0x56 => {
                // LSR $nn,X (Zero Page,X)
                let addr = self.addr_zero_page_x(bus);
                let value = self.read(bus, addr);
                let result = self.lsr(value);
                self.write(bus, addr, result);
                6
            }
            0x4E => {
                // LSR $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                let value = self.read(bus, addr);
                let result = self.lsr(value);
                self.write(bus, addr, result);
                6
            }
            0x5E => {
                // LSR $nnnn,X (Absolute,X)
                let (addr, crossed) = self.addr_absolute_x(bus);
                let value = self.read(bus, addr);
                let result = self.lsr(value);
                self.write(bus, addr, result);
                6 + u32::from(crossed)
            }
            0x2A => {
                // ROL A
                self.regs.a = self.rol(self.regs.a);
                2
            }
            0x26 => {
                // ROL $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                let value = self.read(bus, addr);
                let result = self.rol(value);
                self.write(bus, addr, result);
                5
            }
            0x36 => {
                // ROL $nn,X (Zero Page,X)
                let addr = self.addr_zero_page_x(bus);
                let value = self.read(bus, addr);
                let result = self.rol(value);
                self.write(bus, addr, result);
                6
            }
            0x2E => {
                // ROL $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                let value = self.read(bus, addr);
                let result = self.rol(value);
                self.write(bus, addr, result);
                6
            }
            0x3E => {
                // ROL $nnnn,X (Absolute,X)
                let (addr, crossed) = self.addr_absolute_x(bus);
                let value = self.read(bus, addr);
                let result = self.rol(value);
                self.write(bus, addr, result);
                6 + u32::from(crossed)
            }
            0x6A => {
                // ROR A
                self.regs.a = self.ror(self.regs.a);
                2
            }
            0x66 => {
                // ROR $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                let value = self.read(bus, addr);
                let result = self.ror(value);
                self.write(bus, addr, result);
                5
            }
            0x76 => {
                // ROR $nn,X (Zero Page,X)
                let addr = self.addr_zero_page_x(bus);
                let value = self.read(bus, addr);
                let result = self.ror(value);
                self.write(bus, addr, result);
                6
            }
            0x6E => {
                // ROR $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                let value = self.read(bus, addr);
                let result = self.ror(value);
                self.write(bus, addr, result);
                6
            }
            0x7E => {
                // ROR $nnnn,X (Absolute,X)
                let (addr, crossed) = self.addr_absolute_x(bus);
                let value = self.read(bus, addr);
                let result = self.ror(value);
                self.write(bus, addr, result);
                6 + u32::from(crossed)
            }

            // =====================================================================
            // Increments and Decrements
            // =====================================================================
            0x1A => {
                // INC A (65C02)
                self.regs.a = self.regs.a.wrapping_add(1);
                self.regs.p.set_zero_and_negative(self.regs.a);
                2
            }
            0x3A => {
                // DEC A (65C02)
                self.regs.a = self.regs.a.wrapping_sub(1);
                self.regs.p.set_zero_and_negative(self.regs.a);
                2
            }
            0xE6 => {
                // INC $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                let result = self.read(bus, addr).wrapping_add(1);
                self.regs.p.set_zero_and_negative(result);
                self.write(bus, addr, result);
                5
            }
            0xF6 => {
                // INC $nn,X (Zero Page,X)
                let addr = self.addr_zero_page_x(bus);
                let result = self.read(bus, addr).wrapping_add(1);
                self.regs.p.set_zero_and_negative(result);
                self.write(bus, addr, result);
                6
            }
            0xEE => {
                // INC $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                let result = self.read(bus, addr).wrapping_add(1);
                self.regs.p.set_zero_and_negative(result);
                self.write(bus, addr, result);
                6
            }
            0xFE => {
                // INC $nnnn,X (Absolute,X) - penalty always paid
                let addr = self.addr_absolute_x_write(bus);
                let result = self.read(bus, addr).wrapping_add(1);
                self.regs.p.set_zero_and_negative(result);
                self.write(bus, addr, result);
                7
            }
            0xC6 => {
                // DEC $nn (Zero Page)
                let addr = self.addr_zero_page(bus);
                let result = self.read(bus, addr).wrapping_sub(1);
                self.regs.p.set_zero_and_negative(result);
                self.write(bus, addr, result);
                5
            }
            0xD6 => {
                // DEC $nn,X (Zero Page,X)
                let addr = self.addr_zero_page_x(bus);
                let result = self.read(bus, addr).wrapping_sub(1);
                self.regs.p.set_zero_and_negative(result);
                self.write(bus, addr, result);
                6
            }
            0xCE => {
                // DEC $nnnn (Absolute)
                let addr = self.addr_absolute(bus);
                let result = self.read(bus, addr).wrapping_sub(1);
                self.regs.p.set_zero_and_negative(result);
                self.write(bus, addr, result);
                6
            }
            0xDE => {
                // DEC $nnnn,X (Absolute,X) - penalty always paid
                let addr = self.addr_absolute_x_write(bus);
                let result = self.read(bus, addr).wrapping_sub(1);
                self.regs.p.set_zero_and_negative(result);
                self.write(bus, addr, result);
                7
            }
            0xE8 => {
                // INX
                self.regs.x = self.regs.x.wrapping_add(1);
                self.regs.p.set_zero_and_negative(self.regs.x);
                2
            }
            0xC8 => {
                // INY
                self.regs.y = self.regs.y.wrapping_add(1);
                self.regs.p.set_zero_and_negative(self.regs.y);
                2
            }
            0xCA => {
                // DEX
                self.regs.x = self.regs.x.wrapping_sub(1);
                self.regs.p.set_zero_and_negative(self.regs.x);
                2
            }
            0x88 => {
                // DEY
                self.regs.y = self.regs.y.wrapping_sub(1);
                self.regs.p.set_zero_and_negative(self.regs.y);
                2
            }

            // =====================================================================
            // Branches
            // =====================================================================
            0x10 => {
                // BPL rel
                let cond = !self.regs.p.is_negative_set();
                2 + self.branch_if(bus, cond)
            }
            0x30 => {
                // BMI rel
                let cond = self.regs.p.is_negative_set();
                2 + self.branch_if(bus, cond)
            }
            0x50 => {
                // BVC rel
                let cond = !self.regs.p.is_overflow_set();
                2 + self.branch_if(bus, cond)
            }
            0x70 => {
                // BVS rel
                let cond = self.regs.p.is_overflow_set();
                2 + self.branch_if(bus, cond)
            }
            0x90 => {
                // BCC rel
                let cond = !self.regs.p.is_carry_set();
                2 + self.branch_if(bus, cond)
            }
            0xB0 => {
                // BCS rel
                let cond = self.regs.p.is_carry_set();
                2 + self.branch_if(bus, cond)
            }
            0xD0 => {
                // BNE rel
                let cond = !self.regs.p.is_zero_set();
                2 + self.branch_if(bus, cond)
            }
            0xF0 => {
                // BEQ rel
                let cond = self.regs.p.is_zero_set();
                2 + self.branch_if(bus, cond)
            }
            0x80 => {
                // BRA rel (65C02) - always taken
                2 + self.branch_if(bus, true)
            }

            // BBR/BBS - branch on zero-page bit (65C02)
            0x0F => self.op_branch_bit(bus, 0, false),
            0x1F => self.op_branch_bit(bus, 1, false),
            0x2F => self.op_branch_bit(bus, 2, false),
            0x3F => self.op_branch_bit(bus, 3, false),
            0x4F => self.op_branch_bit(bus, 4, false),
            0x5F => self.op_branch_bit(bus, 5, false),
            0x6F => self.op_branch_bit(bus, 6, false),
            0x7F => self.op_branch_bit(bus, 7, false),
            0x8F => self.op_branch_bit(bus, 0, true),
            0x9F => self.op_branch_bit(bus, 1, true),
            0xAF => self.op_branch_bit(bus, 2, true),
            0xBF => self.op_branch_bit(bus, 3, true),
            0xCF => self.op_branch_bit(bus, 4, true),
            0xDF => self.op_branch_bit(bus, 5, true),
            0xEF => self.op_branch_bit(bus, 6, true),
            0xFF => self.op_branch_bit(bus, 7, true),

            // RMB/SMB - modify zero-page bit (65C02)
            0x07 => self.op_modify_bit(bus, 0, false),
            0x17 => self.op_modify_bit(bus, 1, false),
            0x27 => self.op_modify_bit(bus, 2, false),
            0x37 => self.op_modify_bit(bus, 3, false),
            0x47 => self.op_modify_bit(bus, 4, false),
            0x57 => self.op_modify_bit(bus, 5, false),
            0x67 => self.op_modify_bit(bus, 6, false),
            0x77 => self.op_modify_bit(bus, 7, false),
            0x87 => self.op_modify_bit(bus, 0, true),
            0x97 => self.op_modify_bit(bus, 1, true),
            0xA7 => self.op_modify_bit(bus, 2, true),
            0xB7 => self.op_modify_bit(bus, 3, true),
            0xC7 => self.op_modify_bit(bus, 4, true),
            0xD7 => self.op_modify_bit(bus, 5, true),
            0xE7 => self.op_modify_bit(bus, 6, true),
            0xF7 => self.op_modify_bit(bus, 7, true),

            // =====================================================================
            // Jumps and Subroutines
            // =====================================================================
            0x4C => {
                // JMP $nnnn (Absolute)
                self.regs.pc = self.fetch_word(bus);
                3
            }
            0x6C => {
                // JMP ($nnnn) (Indirect) - pointer read correctly across a
                // page boundary on the 65C02
                let ptr = self.fetch_word(bus);
                self.regs.pc = self.read_word(bus, ptr);
                6
            }
            0x7C => {
                // JMP ($nnnn,X) (Absolute Indexed Indirect) (65C02)
                let base = self.fetch_word(bus);
                let ptr = base.wrapping_add(u16::from(self.regs.x));
                self.regs.pc = self.read_word(bus, ptr);
                6
            }
            0x20 => {
                // JSR $nnnn - pushes the address of its own last byte
                let target = self.fetch_word(bus);
                let ret = self.regs.pc.wrapping_sub(1);
                self.push_word(bus, ret);
                self.regs.pc = target;
                6
            }
            0x60 => {
                // RTS - pulls return address and resumes one past it
                let ret = self.pull_word(bus);
                self.regs.pc = ret.wrapping_add(1);
                6
            }

            // =====================================================================
            // Interrupts
            // =====================================================================
            0x00 => {
                // BRK - PC+2 pushed, B set in the pushed P, D cleared (CMOS)
                let ret = self.regs.pc.wrapping_add(1);
                self.push_word(bus, ret);
                let p = self.regs.p.for_push(true);
                self.push(bus, p);
                self.regs.p.insert(Status::INTERRUPT_DISABLE);
                self.regs.p.remove(Status::DECIMAL);
                self.regs.pc = self.read_word(bus, VECTOR_IRQ);
                7
            }
            0x40 => {
                // RTI - pull P, then PC
                let p = self.pull(bus);
                self.regs.p = Status::from_stack(p);
                self.regs.pc = self.pull_word(bus);
                6
            }

            // =====================================================================
            // Flag Operations
            // =====================================================================
            0x18 => {
                // CLC
                self.regs.p.remove(Status::CARRY);
                2
            }
            0x38 => {
                // SEC
                self.regs.p.insert(Status::CARRY);
                2
            }
            0x58 => {
                // CLI
                self.regs.p.remove(Status::INTERRUPT_DISABLE);
                2
            }
            0x78 => {
                // SEI
                self.regs.p.insert(Status::INTERRUPT_DISABLE);
                2
            }
            0xD8 => {
                // CLD
                self.regs.p.remove(Status::DECIMAL);
                2
            }
            0xF8 => {
                // SED
                self.regs.p.insert(Status::DECIMAL);
                2
            }
            0xB8 => {
                // CLV
                self.regs.p.remove(Status::OVERFLOW);
                2
            }

            // =====================================================================
            // Halt Instructions (65C02)
            // =====================================================================
            0xDB => {
                // STP - stop until reset
                self.halt = Some(HaltReason::Stp);
                3
            }
            0xCB => {
                // WAI - wait for interrupt
                self.halt = Some(HaltReason::Wai);
                3
            }

            // =====================================================================
            // No-Ops
            // =====================================================================
            0xEA => {
                // NOP
                2
            }
            // Two-byte, two-cycle NOPs
            0x02 | 0x22 | 0x42 | 0x62 | 0x82 | 0xC2 | 0xE2 => {
                let _ = self.fetch(bus);
                2
            }
            // Two-byte, three-cycle NOP
            0x44 => {
                let _ = self.fetch(bus);
                3
            }
            // Two-byte, four-cycle NOPs
            0x54 | 0xD4 | 0xF4 => {
                let _ = self.fetch(bus);
                4
            }
            // Three-byte, eight-cycle NOP
            0x5C => {
                let _ = self.fetch_word(bus);
                8
            }
            // Three-byte, four-cycle NOPs
            0xDC | 0xFC => {
                let _ = self.fetch_word(bus);
                4
            }

            // Undefined opcodes halt the CPU after one cycle.
            _ => {
                self.halt = Some(HaltReason::IllegalOpcode);
                1
            }
        }
    }
}

impl Default for Wdc65c02 {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Bus> Cpu<B> for Wdc65c02 {
    fn step(&mut self, bus: &mut B) -> u32 {
        self.step_with(bus, None)
    }

    fn reset(&mut self, bus: &mut B) {
        self.halt = None;
        self.pending_stop = false;
        self.nmi_pending = false;
        self.regs.a = 0;
        self.regs.x = 0;
        self.regs.y = 0;
        self.regs.sp = 0xFF;
        self.regs.p = Status::power_on();
        self.regs.pc = self.read_word(bus, VECTOR_RESET);
    }

    fn set_irq_line(&mut self, asserted: bool) {
        Self::set_irq_line(self, asserted);
    }

    fn nmi(&mut self) {
        Self::nmi(self);
    }

    fn pc(&self) -> u16 {
        Self::pc(self)
    }

    fn is_halted(&self) -> bool {
        Self::is_halted(self)
    }
}
