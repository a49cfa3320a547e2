//! Static opcode metadata.
//!
//! The decode table in `lib.rs` is the execution authority; this table is
//! the descriptive view used by debug step events and external
//! disassemblers. Undefined opcodes (the ones that halt the CPU) are
//! tagged `"???"`.

/// 65C02 addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    /// JMP ($nnnn).
    Indirect,
    /// JMP ($nnnn,X) — 65C02 only.
    AbsoluteIndexedIndirect,
    /// ($nn,X).
    IndirectX,
    /// ($nn),Y.
    IndirectY,
    /// ($nn) — 65C02 only.
    ZeroPageIndirect,
    Relative,
    /// BBR/BBS: zero-page operand plus relative displacement.
    ZeroPageRelative,
}

/// Descriptive record for one opcode.
#[derive(Debug, Clone, Copy)]
pub struct OpcodeInfo {
    pub mnemonic: &'static str,
    pub mode: AddressingMode,
    /// Total instruction length, opcode included.
    pub bytes: u8,
}

impl OpcodeInfo {
    /// Operand byte count (0-2).
    #[must_use]
    pub const fn operand_count(&self) -> u8 {
        self.bytes - 1
    }
}

const fn o(mnemonic: &'static str, mode: AddressingMode, bytes: u8) -> OpcodeInfo {
    OpcodeInfo {
        mnemonic,
        mode,
        bytes,
    }
}

const fn ill() -> OpcodeInfo {
    o("???", AddressingMode::Implied, 1)
}

/// Metadata for all 256 opcodes, indexed by opcode byte.
#[rustfmt::skip]
pub const OPCODES: [OpcodeInfo; 256] = {
    use AddressingMode::{
        Absolute as Abs, AbsoluteIndexedIndirect as Aii, AbsoluteX as Abx, AbsoluteY as Aby,
        Accumulator as Acc, Immediate as Imm, Implied as Imp, Indirect as Ind,
        IndirectX as Izx, IndirectY as Izy, Relative as Rel, ZeroPage as Zp,
        ZeroPageIndirect as Zpi, ZeroPageRelative as Zpr, ZeroPageX as Zpx, ZeroPageY as Zpy,
    };
    [
        // 0x00
        o("BRK", Imp, 1), o("ORA", Izx, 2), o("NOP", Imm, 2), ill(),
        o("TSB", Zp, 2),  o("ORA", Zp, 2),  o("ASL", Zp, 2),  o("RMB0", Zp, 2),
        o("PHP", Imp, 1), o("ORA", Imm, 2), o("ASL", Acc, 1), ill(),
        o("TSB", Abs, 3), o("ORA", Abs, 3), o("ASL", Abs, 3), o("BBR0", Zpr, 3),
        // 0x10
        o("BPL", Rel, 2), o("ORA", Izy, 2), o("ORA", Zpi, 2), ill(),
        o("TRB", Zp, 2),  o("ORA", Zpx, 2), o("ASL", Zpx, 2), o("RMB1", Zp, 2),
        o("CLC", Imp, 1), o("ORA", Aby, 3), o("INC", Acc, 1), ill(),
        o("TRB", Abs, 3), o("ORA", Abx, 3), o("ASL", Abx, 3), o("BBR1", Zpr, 3),
        // 0x20
        o("JSR", Abs, 3), o("AND", Izx, 2), o("NOP", Imm, 2), ill(),
        o("BIT", Zp, 2),  o("AND", Zp, 2),  o("ROL", Zp, 2),  o("RMB2", Zp, 2),
        o("PLP", Imp, 1), o("AND", Imm, 2), o("ROL", Acc, 1), ill(),
        o("BIT", Abs, 3), o("AND", Abs, 3), o("ROL", Abs, 3), o("BBR2", Zpr, 3),
        // 0x30
        o("BMI", Rel, 2), o("AND", Izy, 2), o("AND", Zpi, 2), ill(),
        o("BIT", Zpx, 2), o("AND", Zpx, 2), o("ROL", Zpx, 2), o("RMB3", Zp, 2),
        o("SEC", Imp, 1), o("AND", Aby, 3), o("DEC", Acc, 1), ill(),
        o("BIT", Abx, 3), o("AND", Abx, 3), o("ROL", Abx, 3), o("BBR3", Zpr, 3),
        // 0x40
        o("RTI", Imp, 1), o("EOR", Izx, 2), o("NOP", Imm, 2), ill(),
        o("NOP", Zp, 2),  o("EOR", Zp, 2),  o("LSR", Zp, 2),  o("RMB4", Zp, 2),
        o("PHA", Imp, 1), o("EOR", Imm, 2), o("LSR", Acc, 1), ill(),
        o("JMP", Abs, 3), o("EOR", Abs, 3), o("LSR", Abs, 3), o("BBR4", Zpr, 3),
        // 0x50
        o("BVC", Rel, 2), o("EOR", Izy, 2), o("EOR", Zpi, 2), ill(),
        o("NOP", Zpx, 2), o("EOR", Zpx, 2), o("LSR", Zpx, 2), o("RMB5", Zp, 2),
        o("CLI", Imp, 1), o("EOR", Aby, 3), o("PHY", Imp, 1), ill(),
        o("NOP", Abs, 3), o("EOR", Abx, 3), o("LSR", Abx, 3), o("BBR5", Zpr, 3),
        // 0x60
        o("RTS", Imp, 1), o("ADC", Izx, 2), o("NOP", Imm, 2), ill(),
        o("STZ", Zp, 2),  o("ADC", Zp, 2),  o("ROR", Zp, 2),  o("RMB6", Zp, 2),
        o("PLA", Imp, 1), o("ADC", Imm, 2), o("ROR", Acc, 1), ill(),
        o("JMP", Ind, 3), o("ADC", Abs, 3), o("ROR", Abs, 3), o("BBR6", Zpr, 3),
        // 0x70
        o("BVS", Rel, 2), o("ADC", Izy, 2), o("ADC", Zpi, 2), ill(),
        o("STZ", Zpx, 2), o("ADC", Zpx, 2), o("ROR", Zpx, 2), o("RMB7", Zp, 2),
        o("SEI", Imp, 1), o("ADC", Aby, 3), o("PLY", Imp, 1), ill(),
        o("JMP", Aii, 3), o("ADC", Abx, 3), o("ROR", Abx, 3), o("BBR7", Zpr, 3),
        // 0x80
        o("BRA", Rel, 2), o("STA", Izx, 2), o("NOP", Imm, 2), ill(),
        o("STY", Zp, 2),  o("STA", Zp, 2),  o("STX", Zp, 2),  o("SMB0", Zp, 2),
        o("DEY", Imp, 1), o("BIT", Imm, 2), o("TXA", Imp, 1), ill(),
        o("STY", Abs, 3), o("STA", Abs, 3), o("STX", Abs, 3), o("BBS0", Zpr, 3),
        // 0x90
        o("BCC", Rel, 2), o("STA", Izy, 2), o("STA", Zpi, 2), ill(),
        o("STY", Zpx, 2), o("STA", Zpx, 2), o("STX", Zpy, 2), o("SMB1", Zp, 2),
        o("TYA", Imp, 1), o("STA", Aby, 3), o("TXS", Imp, 1), ill(),
        o("STZ", Abs, 3), o("STA", Abx, 3), o("STZ", Abx, 3), o("BBS1", Zpr, 3),
        // 0xA0
        o("LDY", Imm, 2), o("LDA", Izx, 2), o("LDX", Imm, 2), ill(),
        o("LDY", Zp, 2),  o("LDA", Zp, 2),  o("LDX", Zp, 2),  o("SMB2", Zp, 2),
        o("TAY", Imp, 1), o("LDA", Imm, 2), o("TAX", Imp, 1), ill(),
        o("LDY", Abs, 3), o("LDA", Abs, 3), o("LDX", Abs, 3), o("BBS2", Zpr, 3),
        // 0xB0
        o("BCS", Rel, 2), o("LDA", Izy, 2), o("LDA", Zpi, 2), ill(),
        o("LDY", Zpx, 2), o("LDA", Zpx, 2), o("LDX", Zpy, 2), o("SMB3", Zp, 2),
        o("CLV", Imp, 1), o("LDA", Aby, 3), o("TSX", Imp, 1), ill(),
        o("LDY", Abx, 3), o("LDA", Abx, 3), o("LDX", Aby, 3), o("BBS3", Zpr, 3),
        // 0xC0
        o("CPY", Imm, 2), o("CMP", Izx, 2), o("NOP", Imm, 2), ill(),
        o("CPY", Zp, 2),  o("CMP", Zp, 2),  o("DEC", Zp, 2),  o("SMB4", Zp, 2),
        o("INY", Imp, 1), o("CMP", Imm, 2), o("DEX", Imp, 1), o("WAI", Imp, 1),
        o("CPY", Abs, 3), o("CMP", Abs, 3), o("DEC", Abs, 3), o("BBS4", Zpr, 3),
        // 0xD0
        o("BNE", Rel, 2), o("CMP", Izy, 2), o("CMP", Zpi, 2), ill(),
        o("NOP", Zpx, 2), o("CMP", Zpx, 2), o("DEC", Zpx, 2), o("SMB5", Zp, 2),
        o("CLD", Imp, 1), o("CMP", Aby, 3), o("PHX", Imp, 1), o("STP", Imp, 1),
        o("NOP", Abs, 3), o("CMP", Abx, 3), o("DEC", Abx, 3), o("BBS5", Zpr, 3),
        // 0xE0
        o("CPX", Imm, 2), o("SBC", Izx, 2), o("NOP", Imm, 2), ill(),
        o("CPX", Zp, 2),  o("SBC", Zp, 2),  o("INC", Zp, 2),  o("SMB6", Zp, 2),
        o("INX", Imp, 1), o("SBC", Imm, 2), o("NOP", Imp, 1), ill(),
        o("CPX", Abs, 3), o("SBC", Abs, 3), o("INC", Abs, 3), o("BBS6", Zpr, 3),
        // 0xF0
        o("BEQ", Rel, 2), o("SBC", Izy, 2), o("SBC", Zpi, 2), ill(),
        o("NOP", Zpx, 2), o("SBC", Zpx, 2), o("INC", Zpx, 2), o("SMB7", Zp, 2),
        o("SED", Imp, 1), o("SBC", Aby, 3), o("PLX", Imp, 1), ill(),
        o("NOP", Abs, 3), o("SBC", Abx, 3), o("INC", Abx, 3), o("BBS7", Zpr, 3),
    ]
};
