//! Slot I/O windows, firmware ROM, and the expansion-ROM protocol.

use std::cell::RefCell;
use std::rc::Rc;

use emu_core::{Bus, BusAccess};
use emu_pocket2e::{Pocket2e, Pocket2eConfig, SlotCard};

#[derive(Default, Clone)]
struct CardLog {
    io_reads: Vec<u8>,
    io_writes: Vec<(u8, u8)>,
    selections: Vec<bool>,
    resets: u32,
}

/// A card with distinctive ROM contents and a shared activity log.
struct TestCard {
    log: Rc<RefCell<CardLog>>,
    slot_rom: Vec<u8>,
    expansion_rom: Vec<u8>,
}

impl TestCard {
    fn new(log: Rc<RefCell<CardLog>>, tag: u8) -> Self {
        Self {
            log,
            slot_rom: vec![tag; 256],
            expansion_rom: (0..2048).map(|i| (i as u8) ^ tag).collect(),
        }
    }
}

impl SlotCard for TestCard {
    fn name(&self) -> &str {
        "test-card"
    }

    fn reset(&mut self) {
        self.log.borrow_mut().resets += 1;
    }

    fn io_read(&mut self, offset: u8, _access: BusAccess) -> u8 {
        self.log.borrow_mut().io_reads.push(offset);
        0x5A
    }

    fn io_write(&mut self, offset: u8, _access: BusAccess, value: u8) {
        self.log.borrow_mut().io_writes.push((offset, value));
    }

    fn slot_rom(&self) -> Option<&[u8]> {
        Some(&self.slot_rom)
    }

    fn expansion_rom(&self) -> Option<&[u8]> {
        Some(&self.expansion_rom)
    }

    fn on_expansion_rom_selected(&mut self) {
        self.log.borrow_mut().selections.push(true);
    }

    fn on_expansion_rom_deselected(&mut self) {
        self.log.borrow_mut().selections.push(false);
    }
}

fn machine_with_card(slot: u8, tag: u8) -> (Pocket2e, Rc<RefCell<CardLog>>) {
    let mut m = Pocket2e::new(&Pocket2eConfig::with_blank_rom()).expect("machine build");
    let log = Rc::new(RefCell::new(CardLog::default()));
    m.bus_mut()
        .install_card(slot, Box::new(TestCard::new(Rc::clone(&log), tag)))
        .expect("install");
    (m, log)
}

fn read(m: &mut Pocket2e, addr: u16) -> u8 {
    m.bus_mut().read(BusAccess::data_read(addr))
}

fn write(m: &mut Pocket2e, addr: u16, value: u8) {
    m.bus_mut().write(BusAccess::data_write(addr), value);
}

#[test]
fn slot_io_handlers_receive_the_global_offset() {
    // Slot 3's I/O window is $C0B0-$C0BF; the handler sees $B5, not $05.
    let (mut m, log) = machine_with_card(3, 0x33);

    assert_eq!(read(&mut m, 0xC0B5), 0x5A);
    write(&mut m, 0xC0B7, 0x42);

    let log = log.borrow();
    assert_eq!(log.io_reads, vec![0xB5]);
    assert_eq!(log.io_writes, vec![(0xB7, 0x42)]);
}

#[test]
fn empty_slot_io_floats() {
    let (mut m, _log) = machine_with_card(3, 0x33);
    assert_eq!(read(&mut m, 0xC095), 0xFF, "slot 1 is empty");
}

#[test]
fn slot_rom_window_reads_card_firmware() {
    let (mut m, _log) = machine_with_card(3, 0x33);
    assert_eq!(read(&mut m, 0xC300), 0x33);
    assert_eq!(read(&mut m, 0xC3FF), 0x33);
    assert_eq!(read(&mut m, 0xC200), 0xFF, "empty slot 2 floats");
}

#[test]
fn slot_rom_access_claims_the_expansion_window() {
    let (mut m, log) = machine_with_card(3, 0x33);
    assert_eq!(m.bus().slots().expansion_owner(), None);

    read(&mut m, 0xC305);
    assert_eq!(m.bus().slots().expansion_owner(), Some(3));
    assert_eq!(log.borrow().selections, vec![true]);

    // $C800 now fronts the card's expansion ROM.
    assert_eq!(read(&mut m, 0xC800), 0x00 ^ 0x33);
    assert_eq!(read(&mut m, 0xC801), 0x01 ^ 0x33);
}

#[test]
fn cfff_deselects_the_expansion_window() {
    let (mut m, log) = machine_with_card(3, 0x33);
    read(&mut m, 0xC305);
    read(&mut m, 0xCFFF);

    assert_eq!(m.bus().slots().expansion_owner(), None);
    assert_eq!(log.borrow().selections, vec![true, false]);
    assert_eq!(read(&mut m, 0xC800), 0xFF, "window floats with no owner");
}

#[test]
fn cfff_write_also_deselects() {
    let (mut m, _log) = machine_with_card(3, 0x33);
    read(&mut m, 0xC305);
    write(&mut m, 0xCFFF, 0x00);
    assert_eq!(m.bus().slots().expansion_owner(), None);
}

#[test]
fn slot_rom_writes_do_not_claim_the_window() {
    let (mut m, _log) = machine_with_card(3, 0x33);
    write(&mut m, 0xC305, 0x12);
    assert_eq!(m.bus().slots().expansion_owner(), None);
    assert_eq!(read(&mut m, 0xC305), 0x33, "firmware unchanged by the write");
}

#[test]
fn debug_peeks_do_not_change_the_selection() {
    let (mut m, log) = machine_with_card(3, 0x33);

    m.peek(0xC305);
    assert_eq!(m.bus().slots().expansion_owner(), None);

    read(&mut m, 0xC305);
    m.peek(0xCFFF);
    assert_eq!(
        m.bus().slots().expansion_owner(),
        Some(3),
        "peeking $CFFF must not deselect"
    );
    assert_eq!(log.borrow().selections, vec![true]);
}

#[test]
fn ownership_moves_between_slots() {
    let mut m = Pocket2e::new(&Pocket2eConfig::with_blank_rom()).expect("machine build");
    let log3 = Rc::new(RefCell::new(CardLog::default()));
    let log5 = Rc::new(RefCell::new(CardLog::default()));
    m.bus_mut()
        .install_card(3, Box::new(TestCard::new(Rc::clone(&log3), 0x33)))
        .expect("install slot 3");
    m.bus_mut()
        .install_card(5, Box::new(TestCard::new(Rc::clone(&log5), 0x55)))
        .expect("install slot 5");

    read(&mut m, 0xC300);
    assert_eq!(read(&mut m, 0xC800), 0x33);
    read(&mut m, 0xC500);
    assert_eq!(read(&mut m, 0xC800), 0x55);

    assert_eq!(log3.borrow().selections, vec![true, false]);
    assert_eq!(log5.borrow().selections, vec![true]);
}

#[test]
fn reset_resets_cards_and_releases_the_window() {
    let (mut m, log) = machine_with_card(3, 0x33);
    m.poke(0xFFFC, 0x00);
    m.poke(0xFFFD, 0x10);
    read(&mut m, 0xC305);

    m.reset();

    assert_eq!(log.borrow().resets, 1);
    assert_eq!(m.bus().slots().expansion_owner(), None);
}

#[test]
fn installing_into_an_occupied_slot_fails() {
    let (mut m, _log) = machine_with_card(3, 0x33);
    let log = Rc::new(RefCell::new(CardLog::default()));
    let result = m
        .bus_mut()
        .install_card(3, Box::new(TestCard::new(log, 0x44)));
    assert!(result.is_err());
}
