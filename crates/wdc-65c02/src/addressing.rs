//! 65C02 addressing mode evaluators.
//!
//! Each evaluator consumes operand bytes (advancing PC) and produces the
//! effective address. Indexed read forms also report whether the index
//! crossed a page boundary, which costs one extra cycle; the write forms
//! always pay the penalty, so they don't report it.
//!
//! 65C02 differences from the NMOS 6502: the zero-page indirect mode
//! `($nn)`, the `JMP ($nnnn,X)` mode, and a fixed `JMP ($nnnn)` that reads
//! its pointer correctly across a page boundary.

use emu_core::{Bus, BusAccess};

use crate::Wdc65c02;

impl Wdc65c02 {
    /// Fetch the next byte at PC and increment PC.
    pub(crate) fn fetch(&mut self, bus: &mut impl Bus) -> u8 {
        let value = bus.read(BusAccess::fetch(self.regs.pc).at_cycle(self.cycles));
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Fetch a 16-bit word (little-endian) at PC.
    pub(crate) fn fetch_word(&mut self, bus: &mut impl Bus) -> u16 {
        let low = self.fetch(bus);
        let high = self.fetch(bus);
        u16::from_le_bytes([low, high])
    }

    pub(crate) fn read(&self, bus: &mut impl Bus, addr: u16) -> u8 {
        bus.read(BusAccess::data_read(addr).at_cycle(self.cycles))
    }

    pub(crate) fn write(&self, bus: &mut impl Bus, addr: u16, value: u8) {
        bus.write(BusAccess::data_write(addr).at_cycle(self.cycles), value);
    }

    /// Read a 16-bit word from memory (little-endian).
    pub(crate) fn read_word(&self, bus: &mut impl Bus, addr: u16) -> u16 {
        let low = self.read(bus, addr);
        let high = self.read(bus, addr.wrapping_add(1));
        u16::from_le_bytes([low, high])
    }

    /// Read a 16-bit pointer from the zero page, wrapping within it: a
    /// pointer at $FF takes its low byte from $FF and its high byte
    /// from $00.
    pub(crate) fn read_word_zp(&self, bus: &mut impl Bus, addr: u8) -> u16 {
        let low = self.read(bus, u16::from(addr));
        let high = self.read(bus, u16::from(addr.wrapping_add(1)));
        u16::from_le_bytes([low, high])
    }

    /// Push a byte onto the stack at $0100 | SP, then decrement SP.
    pub(crate) fn push(&mut self, bus: &mut impl Bus, value: u8) {
        self.write(bus, 0x0100 | u16::from(self.regs.sp), value);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
    }

    /// Increment SP, then pull a byte from $0100 | SP.
    pub(crate) fn pull(&mut self, bus: &mut impl Bus) -> u8 {
        self.regs.sp = self.regs.sp.wrapping_add(1);
        self.read(bus, 0x0100 | u16::from(self.regs.sp))
    }

    /// Push a 16-bit word (high byte first).
    pub(crate) fn push_word(&mut self, bus: &mut impl Bus, value: u16) {
        self.push(bus, (value >> 8) as u8);
        self.push(bus, value as u8);
    }

    /// Pull a 16-bit word (low byte first).
    pub(crate) fn pull_word(&mut self, bus: &mut impl Bus) -> u16 {
        let low = self.pull(bus);
        let high = self.pull(bus);
        u16::from_le_bytes([low, high])
    }

    // =========================================================================
    // Addressing mode helpers
    // =========================================================================

    /// Zero Page: $nn
    pub(crate) fn addr_zero_page(&mut self, bus: &mut impl Bus) -> u16 {
        u16::from(self.fetch(bus))
    }

    /// Zero Page,X: $nn,X (wraps within the zero page)
    pub(crate) fn addr_zero_page_x(&mut self, bus: &mut impl Bus) -> u16 {
        let base = self.fetch(bus);
        u16::from(base.wrapping_add(self.regs.x))
    }

    /// Zero Page,Y: $nn,Y (wraps within the zero page)
    pub(crate) fn addr_zero_page_y(&mut self, bus: &mut impl Bus) -> u16 {
        let base = self.fetch(bus);
        u16::from(base.wrapping_add(self.regs.y))
    }

    /// Absolute: $nnnn
    pub(crate) fn addr_absolute(&mut self, bus: &mut impl Bus) -> u16 {
        self.fetch_word(bus)
    }

    /// Absolute,X: $nnnn,X
    /// Returns (address, page_crossed); crossing costs reads one cycle.
    pub(crate) fn addr_absolute_x(&mut self, bus: &mut impl Bus) -> (u16, bool) {
        let base = self.fetch_word(bus);
        let addr = base.wrapping_add(u16::from(self.regs.x));
        (addr, (base & 0xFF00) != (addr & 0xFF00))
    }

    /// Absolute,X for write forms: the penalty cycle is always paid, so no
    /// crossing flag.
    pub(crate) fn addr_absolute_x_write(&mut self, bus: &mut impl Bus) -> u16 {
        let base = self.fetch_word(bus);
        base.wrapping_add(u16::from(self.regs.x))
    }

    /// Absolute,Y: $nnnn,Y
    pub(crate) fn addr_absolute_y(&mut self, bus: &mut impl Bus) -> (u16, bool) {
        let base = self.fetch_word(bus);
        let addr = base.wrapping_add(u16::from(self.regs.y));
        (addr, (base & 0xFF00) != (addr & 0xFF00))
    }

    /// Absolute,Y for write forms (penalty always paid).
    pub(crate) fn addr_absolute_y_write(&mut self, bus: &mut impl Bus) -> u16 {
        let base = self.fetch_word(bus);
        base.wrapping_add(u16::from(self.regs.y))
    }

    /// Indexed Indirect: ($nn,X) — pointer at (operand + X) & $FF.
    pub(crate) fn addr_indexed_indirect(&mut self, bus: &mut impl Bus) -> u16 {
        let base = self.fetch(bus);
        let ptr = base.wrapping_add(self.regs.x);
        self.read_word_zp(bus, ptr)
    }

    /// Indirect Indexed: ($nn),Y. Returns (address, page_crossed).
    pub(crate) fn addr_indirect_indexed(&mut self, bus: &mut impl Bus) -> (u16, bool) {
        let ptr = self.fetch(bus);
        let base = self.read_word_zp(bus, ptr);
        let addr = base.wrapping_add(u16::from(self.regs.y));
        (addr, (base & 0xFF00) != (addr & 0xFF00))
    }

    /// Indirect Indexed for write forms (penalty always paid).
    pub(crate) fn addr_indirect_indexed_write(&mut self, bus: &mut impl Bus) -> u16 {
        let ptr = self.fetch(bus);
        let base = self.read_word_zp(bus, ptr);
        base.wrapping_add(u16::from(self.regs.y))
    }

    /// Zero Page Indirect: ($nn) — 65C02 only.
    pub(crate) fn addr_zero_page_indirect(&mut self, bus: &mut impl Bus) -> u16 {
        let ptr = self.fetch(bus);
        self.read_word_zp(bus, ptr)
    }

    /// Execute a branch if `condition` holds.
    /// Returns extra cycles: 1 if taken, plus 1 more if the target is on a
    /// different page from the instruction's end.
    pub(crate) fn branch_if(&mut self, bus: &mut impl Bus, condition: bool) -> u32 {
        let offset = self.fetch(bus) as i8;
        if !condition {
            return 0;
        }
        let target = self.regs.pc.wrapping_add(offset as u16);
        let crossed = (self.regs.pc & 0xFF00) != (target & 0xFF00);
        self.regs.pc = target;
        if crossed { 2 } else { 1 }
    }
}
