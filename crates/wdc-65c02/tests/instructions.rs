//! Unit tests for 65C02 instruction behaviour: flags, stack discipline,
//! addressing-mode wrap-around.

use emu_core::{Bus, Cpu, SimpleBus};
use wdc_65c02::{Status, Wdc65c02};

/// Load a program at $0200 and point PC there.
fn setup(program: &[u8]) -> (Wdc65c02, SimpleBus) {
    let mut bus = SimpleBus::new();
    bus.load(0x0200, program);
    let mut cpu = Wdc65c02::new();
    cpu.regs.pc = 0x0200;
    (cpu, bus)
}

fn run(cpu: &mut Wdc65c02, bus: &mut SimpleBus, instructions: usize) {
    for _ in 0..instructions {
        cpu.step(bus);
    }
}

#[test]
fn lda_sets_zero_and_negative() {
    let (mut cpu, mut bus) = setup(&[
        0xA9, 0x00, // LDA #$00
        0xA9, 0x80, // LDA #$80
        0xA9, 0x01, // LDA #$01
    ]);

    cpu.step(&mut bus);
    assert!(cpu.regs.p.is_zero_set());
    assert!(!cpu.regs.p.is_negative_set());

    cpu.step(&mut bus);
    assert!(!cpu.regs.p.is_zero_set());
    assert!(cpu.regs.p.is_negative_set());

    cpu.step(&mut bus);
    assert!(!cpu.regs.p.is_zero_set());
    assert!(!cpu.regs.p.is_negative_set());
}

#[test]
fn stack_push_pull_round_trips() {
    let (mut cpu, mut bus) = setup(&[
        0xA9, 0x42, // LDA #$42
        0x48, // PHA
        0xA9, 0x17, // LDA #$17
        0x48, // PHA
        0x68, // PLA
        0x85, 0x10, // STA $10
        0x68, // PLA
        0x85, 0x11, // STA $11
    ]);
    run(&mut cpu, &mut bus, 8);

    assert_eq!(bus.peek(0x0010), 0x17, "last pushed comes back first");
    assert_eq!(bus.peek(0x0011), 0x42);
    assert_eq!(cpu.regs.sp, 0xFF, "SP restored after balanced push/pull");
}

#[test]
fn php_plp_round_trips_flags() {
    let (mut cpu, mut bus) = setup(&[
        0x38, // SEC
        0x08, // PHP
        0x18, // CLC
        0x28, // PLP
    ]);
    run(&mut cpu, &mut bus, 4);

    assert!(cpu.regs.p.is_carry_set(), "PLP restores carry");
    assert!(
        !cpu.regs.p.contains(Status::BREAK),
        "B is discarded when pulled"
    );
}

#[test]
fn zero_page_x_wraps_within_the_zero_page() {
    // Operand $F0 + X $20 must land at $10, not $0110.
    let (mut cpu, mut bus) = setup(&[
        0xA2, 0x20, // LDX #$20
        0xB5, 0xF0, // LDA $F0,X
    ]);
    bus.poke(0x0010, 0x99);
    bus.poke(0x0110, 0x55);
    run(&mut cpu, &mut bus, 2);

    assert_eq!(cpu.regs.a, 0x99);
}

#[test]
fn indirect_indexed_pointer_wraps_in_zero_page() {
    // A pointer at $FF takes its low byte from $FF and its high byte
    // from $00.
    let (mut cpu, mut bus) = setup(&[
        0xA0, 0x02, // LDY #$02
        0xB1, 0xFF, // LDA ($FF),Y
    ]);
    bus.poke(0x00FF, 0x00);
    bus.poke(0x0000, 0x30); // pointer = $3000
    bus.poke(0x3002, 0x77);
    run(&mut cpu, &mut bus, 2);

    assert_eq!(cpu.regs.a, 0x77);
}

#[test]
fn adc_binary_flags() {
    let (mut cpu, mut bus) = setup(&[
        0x18, // CLC
        0xA9, 0x7F, // LDA #$7F
        0x69, 0x01, // ADC #$01 -> $80, V set, N set
    ]);
    run(&mut cpu, &mut bus, 3);

    assert_eq!(cpu.regs.a, 0x80);
    assert!(cpu.regs.p.is_overflow_set(), "0x7F + 1 overflows signed");
    assert!(cpu.regs.p.is_negative_set());
    assert!(!cpu.regs.p.is_carry_set());
}

#[test]
fn adc_carry_chain() {
    let (mut cpu, mut bus) = setup(&[
        0x38, // SEC
        0xA9, 0xFF, // LDA #$FF
        0x69, 0x00, // ADC #$00 -> $00 with carry out
    ]);
    run(&mut cpu, &mut bus, 3);

    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.p.is_carry_set());
    assert!(cpu.regs.p.is_zero_set());
}

#[test]
fn sbc_borrow_semantics() {
    let (mut cpu, mut bus) = setup(&[
        0x38, // SEC (no borrow)
        0xA9, 0x10, // LDA #$10
        0xE9, 0x20, // SBC #$20 -> $F0, borrow (C clear)
    ]);
    run(&mut cpu, &mut bus, 3);

    assert_eq!(cpu.regs.a, 0xF0);
    assert!(!cpu.regs.p.is_carry_set(), "borrow clears carry");
    assert!(cpu.regs.p.is_negative_set());
}

#[test]
fn adc_decimal_mode_cmos() {
    let (mut cpu, mut bus) = setup(&[
        0xF8, // SED
        0x18, // CLC
        0xA9, 0x19, // LDA #$19
        0x69, 0x01, // ADC #$01 -> $20 decimal
    ]);
    run(&mut cpu, &mut bus, 4);

    assert_eq!(cpu.regs.a, 0x20);
    assert!(!cpu.regs.p.is_carry_set());
    assert!(!cpu.regs.p.is_zero_set(), "CMOS Z tracks the decimal result");
}

#[test]
fn adc_decimal_carry_out() {
    let (mut cpu, mut bus) = setup(&[
        0xF8, // SED
        0x18, // CLC
        0xA9, 0x99, // LDA #$99
        0x69, 0x01, // ADC #$01 -> $00 with carry
    ]);
    run(&mut cpu, &mut bus, 4);

    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.p.is_carry_set());
    assert!(cpu.regs.p.is_zero_set(), "CMOS sets Z on a zero decimal sum");
}

#[test]
fn sbc_decimal_mode_cmos() {
    let (mut cpu, mut bus) = setup(&[
        0xF8, // SED
        0x38, // SEC
        0xA9, 0x50, // LDA #$50
        0xE9, 0x25, // SBC #$25 -> $25 decimal
    ]);
    run(&mut cpu, &mut bus, 4);

    assert_eq!(cpu.regs.a, 0x25);
    assert!(cpu.regs.p.is_carry_set());
}

#[test]
fn cmp_flags() {
    let (mut cpu, mut bus) = setup(&[
        0xA9, 0x40, // LDA #$40
        0xC9, 0x40, // CMP #$40 -> Z, C
        0xC9, 0x41, // CMP #$41 -> borrow
    ]);
    run(&mut cpu, &mut bus, 2);
    assert!(cpu.regs.p.is_zero_set());
    assert!(cpu.regs.p.is_carry_set());

    cpu.step(&mut bus);
    assert!(!cpu.regs.p.is_zero_set());
    assert!(!cpu.regs.p.is_carry_set());
    assert!(cpu.regs.p.is_negative_set());
}

#[test]
fn shifts_move_bits_through_carry() {
    let (mut cpu, mut bus) = setup(&[
        0x18, // CLC
        0xA9, 0x81, // LDA #$81
        0x2A, // ROL A -> $02, C=1
        0x2A, // ROL A -> $05 (carry rotates back in)
    ]);
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.regs.a, 0x02);
    assert!(cpu.regs.p.is_carry_set());

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x05);
    assert!(!cpu.regs.p.is_carry_set());
}

#[test]
fn bit_copies_operand_high_bits() {
    let (mut cpu, mut bus) = setup(&[
        0xA9, 0x01, // LDA #$01
        0x24, 0x40, // BIT $40
    ]);
    bus.poke(0x0040, 0xC0); // N and V bits set, no overlap with A
    run(&mut cpu, &mut bus, 2);

    assert!(cpu.regs.p.is_zero_set(), "A AND operand is zero");
    assert!(cpu.regs.p.is_negative_set());
    assert!(cpu.regs.p.is_overflow_set());
}

#[test]
fn bit_immediate_only_touches_zero() {
    let (mut cpu, mut bus) = setup(&[
        0xB8, // CLV
        0xA9, 0x01, // LDA #$01
        0x89, 0xC0, // BIT #$C0
    ]);
    run(&mut cpu, &mut bus, 3);

    assert!(cpu.regs.p.is_zero_set());
    assert!(!cpu.regs.p.is_negative_set(), "BIT # leaves N alone");
    assert!(!cpu.regs.p.is_overflow_set(), "BIT # leaves V alone");
}

#[test]
fn tsb_trb_set_and_clear_memory_bits() {
    let (mut cpu, mut bus) = setup(&[
        0xA9, 0x0F, // LDA #$0F
        0x04, 0x20, // TSB $20
        0x14, 0x21, // TRB $21
    ]);
    bus.poke(0x0020, 0xF0);
    bus.poke(0x0021, 0xFF);
    run(&mut cpu, &mut bus, 3);

    assert_eq!(bus.peek(0x0020), 0xFF, "TSB ORs A into memory");
    assert_eq!(bus.peek(0x0021), 0xF0, "TRB clears A's bits in memory");
}

#[test]
fn stz_stores_zero() {
    let (mut cpu, mut bus) = setup(&[
        0x64, 0x30, // STZ $30
    ]);
    bus.poke(0x0030, 0xAA);
    cpu.step(&mut bus);

    assert_eq!(bus.peek(0x0030), 0x00);
}

#[test]
fn smb_rmb_modify_single_bits() {
    let (mut cpu, mut bus) = setup(&[
        0x87, 0x40, // SMB0 $40
        0x77, 0x40, // RMB7 $40
    ]);
    bus.poke(0x0040, 0x80);
    run(&mut cpu, &mut bus, 2);

    assert_eq!(bus.peek(0x0040), 0x01, "bit 0 set, bit 7 cleared");
}

#[test]
fn bbs_branches_on_set_bit() {
    let (mut cpu, mut bus) = setup(&[
        0x8F, 0x50, 0x02, // BBS0 $50,+2
        0xA9, 0x01, // LDA #$01 (skipped)
        0xA9, 0x02, // LDA #$02
    ]);
    bus.poke(0x0050, 0x01);
    run(&mut cpu, &mut bus, 2);

    assert_eq!(cpu.regs.a, 0x02, "branch skipped the first LDA");
}

#[test]
fn bbr_falls_through_on_set_bit() {
    let (mut cpu, mut bus) = setup(&[
        0x0F, 0x50, 0x02, // BBR0 $50,+2 (not taken: bit is set)
        0xA9, 0x01, // LDA #$01
    ]);
    bus.poke(0x0050, 0x01);
    run(&mut cpu, &mut bus, 2);

    assert_eq!(cpu.regs.a, 0x01);
}

#[test]
fn jmp_indirect_reads_pointer_across_page_boundary() {
    // The NMOS 6502 would fetch the high byte from $1000 here; the 65C02
    // reads the pointer correctly.
    let (mut cpu, mut bus) = setup(&[
        0x6C, 0xFF, 0x10, // JMP ($10FF)
    ]);
    bus.poke(0x10FF, 0x34);
    bus.poke(0x1100, 0x12);
    bus.poke(0x1000, 0x55); // NMOS would use this
    cpu.step(&mut bus);

    assert_eq!(cpu.regs.pc, 0x1234);
}

#[test]
fn jmp_absolute_indexed_indirect() {
    let (mut cpu, mut bus) = setup(&[
        0xA2, 0x04, // LDX #$04
        0x7C, 0x00, 0x30, // JMP ($3000,X)
    ]);
    bus.poke(0x3004, 0x78);
    bus.poke(0x3005, 0x56);
    run(&mut cpu, &mut bus, 2);

    assert_eq!(cpu.regs.pc, 0x5678);
}

#[test]
fn jsr_rts_round_trips() {
    let (mut cpu, mut bus) = setup(&[
        0x20, 0x00, 0x30, // JSR $3000
        0xA9, 0x42, // LDA #$42 (after return)
    ]);
    bus.load(0x3000, &[0x60]); // RTS
    run(&mut cpu, &mut bus, 3);

    assert_eq!(cpu.regs.a, 0x42, "execution resumed after the JSR");
    assert_eq!(cpu.regs.sp, 0xFF);
}

#[test]
fn inc_dec_accumulator() {
    let (mut cpu, mut bus) = setup(&[
        0xA9, 0xFF, // LDA #$FF
        0x1A, // INC A -> $00
        0x3A, // DEC A -> $FF
    ]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.p.is_zero_set());

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0xFF);
    assert!(cpu.regs.p.is_negative_set());
}

#[test]
fn reset_loads_vector_and_stack_pointer() {
    let mut bus = SimpleBus::new();
    bus.poke(0xFFFC, 0x00);
    bus.poke(0xFFFD, 0x10);
    let mut cpu = Wdc65c02::new();
    cpu.regs.sp = 0x12;
    cpu.reset(&mut bus);

    assert_eq!(cpu.regs.pc, 0x1000);
    assert_eq!(cpu.regs.sp, 0xFF);
    assert!(cpu.regs.p.is_interrupt_disabled());
    assert!(!cpu.regs.p.is_decimal_set());
}
