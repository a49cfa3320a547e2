//! The debug step listener and instruction trap seams.

use std::cell::RefCell;
use std::rc::Rc;

use emu_core::{Cpu, SimpleBus};
use wdc_65c02::{
    HaltReason, InstructionTrap, StepControl, StepEvent, StepListener, TrapFrame, TrapResult,
    Wdc65c02,
};

fn setup(program: &[u8]) -> (Wdc65c02, SimpleBus) {
    let mut bus = SimpleBus::new();
    bus.load(0x0200, program);
    let mut cpu = Wdc65c02::new();
    cpu.regs.pc = 0x0200;
    (cpu, bus)
}

/// Records every event it sees.
struct Recorder {
    log: Rc<RefCell<Vec<(u16, u8, &'static str, u32)>>>,
    stop_at: Option<u16>,
}

impl StepListener for Recorder {
    fn on_before_step(&mut self, event: &StepEvent, control: &mut StepControl) {
        if self.stop_at == Some(event.pc) {
            control.request_stop();
        }
    }

    fn on_after_step(&mut self, event: &StepEvent) {
        self.log
            .borrow_mut()
            .push((event.pc, event.opcode, event.mnemonic, event.cycles));
    }
}

#[test]
fn listener_sees_decoded_steps() {
    let (mut cpu, mut bus) = setup(&[
        0xA9, 0x42, // LDA #$42
        0x85, 0x10, // STA $10
    ]);
    let log = Rc::new(RefCell::new(Vec::new()));
    cpu.attach_debugger(Box::new(Recorder {
        log: Rc::clone(&log),
        stop_at: None,
    }));

    cpu.step(&mut bus);
    cpu.step(&mut bus);

    let log = log.borrow();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0], (0x0200, 0xA9, "LDA", 2));
    assert_eq!(log[1], (0x0202, 0x85, "STA", 3));
}

#[test]
fn attach_detach_is_cycle_neutral() {
    let program = [
        0xA9, 0x01, // LDA #$01
        0x69, 0x02, // ADC #$02
        0x9D, 0xFF, 0x20, // STA $20FF,X
        0xD0, 0xF7, // BNE back
    ];

    let (mut plain, mut plain_bus) = setup(&program);
    let mut plain_total = 0;
    for _ in 0..4 {
        plain_total += plain.step(&mut plain_bus);
    }

    let (mut hooked, mut hooked_bus) = setup(&program);
    hooked.attach_debugger(Box::new(Recorder {
        log: Rc::new(RefCell::new(Vec::new())),
        stop_at: None,
    }));
    let mut hooked_total = 0;
    for _ in 0..4 {
        hooked_total += hooked.step(&mut hooked_bus);
    }

    assert_eq!(plain_total, hooked_total);
    assert_eq!(plain.regs, hooked.regs);
}

#[test]
fn stop_request_is_observed_on_the_next_step() {
    let (mut cpu, mut bus) = setup(&[
        0xA9, 0x01, // LDA #$01
        0xA9, 0x02, // LDA #$02 (stop requested when PC reaches here)
    ]);
    cpu.attach_debugger(Box::new(Recorder {
        log: Rc::new(RefCell::new(Vec::new())),
        stop_at: Some(0x0202),
    }));

    assert_ne!(cpu.step(&mut bus), 0, "first instruction runs");
    // The listener requested a stop at the top of this step; the step
    // itself still completes.
    assert_ne!(cpu.step(&mut bus), 0);
    assert_eq!(cpu.regs.a, 0x02);

    // Now the pending stop holds the CPU.
    assert_eq!(cpu.step(&mut bus), 0);
    assert_eq!(cpu.regs.a, 0x02, "state untouched while stopped");
    assert!(cpu.stop_requested());

    cpu.clear_stop_request();
    assert_eq!(cpu.regs.pc, 0x0204);
}

/// A single-address trap.
struct OneTrap {
    at: u16,
    result: TrapResult,
    hits: Rc<RefCell<u32>>,
}

impl InstructionTrap for OneTrap {
    fn try_execute(&mut self, pc: u16, frame: &mut TrapFrame<'_>) -> Option<TrapResult> {
        if pc != self.at {
            return None;
        }
        *self.hits.borrow_mut() += 1;
        frame.regs.a = 0xC5;
        Some(self.result)
    }
}

#[test]
fn trap_with_auto_rts_returns_to_the_caller() {
    let (mut cpu, mut bus) = setup(&[
        0x20, 0xED, 0xFD, // JSR $FDED
        0xDB, // STP
    ]);
    let hits = Rc::new(RefCell::new(0));
    let mut traps = OneTrap {
        at: 0xFDED,
        result: TrapResult::rts(6),
        hits: Rc::clone(&hits),
    };

    cpu.step_with(&mut bus, Some(&mut traps)); // JSR
    assert_eq!(cpu.regs.pc, 0xFDED);

    let cycles = cpu.step_with(&mut bus, Some(&mut traps)); // trap + RTS
    assert_eq!(cycles, 6);
    assert_eq!(*hits.borrow(), 1);
    assert_eq!(cpu.regs.a, 0xC5, "handler mutated the registers");
    assert_eq!(cpu.regs.pc, 0x0203, "auto-RTS resumed after the JSR");

    cpu.step_with(&mut bus, Some(&mut traps)); // STP
    assert_eq!(cpu.halt_reason(), Some(HaltReason::Stp));
    assert_eq!(cpu.regs.pc, 0x0204, "PC advanced past STP");
}

#[test]
fn trap_redirect_sets_pc() {
    let (mut cpu, mut bus) = setup(&[0xEA]);
    let hits = Rc::new(RefCell::new(0));
    let mut traps = OneTrap {
        at: 0x0200,
        result: TrapResult::redirect(2, 0x4000),
        hits,
    };

    cpu.step_with(&mut bus, Some(&mut traps));
    assert_eq!(cpu.regs.pc, 0x4000);
}

#[test]
fn trap_never_fires_when_pc_is_elsewhere() {
    let (mut cpu, mut bus) = setup(&[0xEA, 0xEA]);
    let hits = Rc::new(RefCell::new(0));
    let mut traps = OneTrap {
        at: 0x9999,
        result: TrapResult::handled(1),
        hits: Rc::clone(&hits),
    };

    cpu.step_with(&mut bus, Some(&mut traps));
    cpu.step_with(&mut bus, Some(&mut traps));

    assert_eq!(*hits.borrow(), 0);
    assert_eq!(cpu.regs.pc, 0x0202, "instructions executed normally");
}
