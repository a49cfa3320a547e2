//! The Pocket2e bus: memory map, bank-switch layers, and I/O routing.
//!
//! Implements `emu_core::Bus` over a 256-entry page table:
//!
//! - $0000-$BFFF  main RAM (aux layers may steer any of it to aux RAM)
//! - $C000-$C0FF  I/O page (composite dispatch by offset)
//! - $C100-$C7FF  slot firmware windows ($Cn00, slot n)
//! - $C800-$CFFF  shared expansion ROM (owned by the selected slot)
//! - $D000-$FFFF  system ROM, or Language Card RAM when banked in
//!
//! Soft-switch writes mutate the page table synchronously, so a bank
//! switch is visible to the very next instruction fetch.

use emu_core::{
    Bus, BusAccess, DeviceId, LayerId, MemoryHandle, MemorySlice, PageEntry, PagePerms,
    PageRead, PageTable, PageWrite, PhysicalMemory, FLOATING_BUS, PAGE_SIZE,
};
use emu_core::MemoryContext;
use log::debug;

use crate::aux_memory::AuxMemory;
use crate::config::Pocket2eConfig;
use crate::io_page::{IoHandler, IoPage, Route};
use crate::language_card::LanguageCard;
use crate::slots::{SlotCard, SlotError, SlotManager};
use crate::BuildError;

const DEV_MAIN_RAM: DeviceId = DeviceId(1);
const DEV_SYSTEM_ROM: DeviceId = DeviceId(2);
const DEV_IO: DeviceId = DeviceId(3);
const DEV_LANGUAGE_CARD: DeviceId = DeviceId(4);
const DEV_AUX_RAM: DeviceId = DeviceId(5);

const LAYER_LC_READ: LayerId = LayerId("language-card-read");
const LAYER_LC_WRITE: LayerId = LayerId("language-card-write");
const LAYER_AUX_READ: LayerId = LayerId("aux-read");
const LAYER_AUX_WRITE: LayerId = LayerId("aux-write");
const LAYER_AUX_ZP: LayerId = LayerId("aux-zero-page");
const LAYER_AUX_80STORE: LayerId = LayerId("aux-80store");

/// Offsets of the 16 KiB Language Card RAM: two $D000 banks, then the
/// common upper 8 KiB.
const LC_BANK1_BASE: usize = 0x0000;
const LC_BANK2_BASE: usize = 0x1000;
const LC_UPPER_BASE: usize = 0x2000;

pub struct Pocket2eBus {
    pages: PageTable,
    main_ram: MemoryHandle,
    aux_ram: MemoryHandle,
    lc_ram: MemoryHandle,
    pub(crate) language_card: LanguageCard,
    pub(crate) aux_memory: AuxMemory,
    io: IoPage,
    slots: SlotManager,
}

impl Pocket2eBus {
    pub fn new(config: &Pocket2eConfig) -> Result<Self, BuildError> {
        if config.system_rom.len() != 0x3000 {
            return Err(BuildError::RomSize {
                expected: 0x3000,
                got: config.system_rom.len(),
            });
        }

        let mut pages = PageTable::new();
        let main_ram = pages.add_memory(PhysicalMemory::new("main-ram", 0xC000));
        let aux_ram = pages.add_memory(PhysicalMemory::new("aux-ram", 0xC000));
        let lc_ram = pages.add_memory(PhysicalMemory::new("language-card-ram", 0x4000));
        let rom = pages.add_memory(PhysicalMemory::with_contents(
            "system-rom",
            config.system_rom.clone(),
        ));

        pages.map_ram(0x00, 0xC0, DEV_MAIN_RAM, PagePerms::RWX, main_ram, 0)?;
        pages.map_io(0xC0, 0x10, DEV_IO)?;
        pages.map_rom(0xD0, 0x30, DEV_SYSTEM_ROM, rom, 0)?;

        Ok(Self {
            pages,
            main_ram,
            aux_ram,
            lc_ram,
            language_card: LanguageCard::new(),
            aux_memory: AuxMemory::new(),
            io: IoPage::new(),
            slots: SlotManager::new(),
        })
    }

    /// The Language Card latch state.
    #[must_use]
    pub fn language_card(&self) -> &LanguageCard {
        &self.language_card
    }

    /// The auxiliary-memory latch state.
    #[must_use]
    pub fn aux_memory(&self) -> &AuxMemory {
        &self.aux_memory
    }

    pub fn install_card(&mut self, slot: u8, card: Box<dyn SlotCard>) -> Result<(), SlotError> {
        self.slots.install(slot, card)
    }

    #[must_use]
    pub fn slots(&self) -> &SlotManager {
        &self.slots
    }

    /// Register an external soft-switch handler over an I/O-page offset
    /// range.
    pub fn register_io_handler(&mut self, first: u8, last: u8, handler: Box<dyn IoHandler>) {
        self.io.register_device(first, last, handler);
    }

    /// Reset the slot cards. Language Card and aux-memory latches are
    /// deliberately preserved across a warm reset.
    pub(crate) fn reset(&mut self) {
        self.slots.reset();
    }

    fn lc_slice(&self, base: usize, page_in_region: usize) -> MemorySlice {
        MemorySlice::new(self.lc_ram, base + page_in_region * PAGE_SIZE, PAGE_SIZE)
    }

    fn ram_slice(&self, memory: MemoryHandle, page: u8) -> MemorySlice {
        MemorySlice::new(memory, usize::from(page) * PAGE_SIZE, PAGE_SIZE)
    }

    /// Rebuild the Language Card read and write layers from latch state.
    fn republish_language_card(&mut self) {
        let lc = self.language_card;
        let bank_base = if lc.selected_bank() == 1 {
            LC_BANK1_BASE
        } else {
            LC_BANK2_BASE
        };

        let mut read_entries = Vec::new();
        if lc.ram_read_enabled() {
            for page in 0xD0..=0xDF {
                let slice = self.lc_slice(bank_base, usize::from(page - 0xD0));
                read_entries.push((
                    page,
                    PageEntry::ram(slice, PagePerms::RX, DEV_LANGUAGE_CARD),
                ));
            }
            for page in 0xE0..=0xFF {
                let slice = self.lc_slice(LC_UPPER_BASE, usize::from(page - 0xE0));
                read_entries.push((
                    page,
                    PageEntry::ram(slice, PagePerms::RX, DEV_LANGUAGE_CARD),
                ));
            }
        }

        let mut write_entries = Vec::new();
        if lc.ram_write_enabled() {
            for page in 0xD0..=0xDF {
                let slice = self.lc_slice(bank_base, usize::from(page - 0xD0));
                write_entries.push((
                    page,
                    PageEntry::ram(slice, PagePerms::WRITE_ONLY, DEV_LANGUAGE_CARD),
                ));
            }
            for page in 0xE0..=0xFF {
                let slice = self.lc_slice(LC_UPPER_BASE, usize::from(page - 0xE0));
                write_entries.push((
                    page,
                    PageEntry::ram(slice, PagePerms::WRITE_ONLY, DEV_LANGUAGE_CARD),
                ));
            }
        }

        debug!(
            "language card: read={} write={} bank={}",
            lc.ram_read_enabled(),
            lc.ram_write_enabled(),
            lc.selected_bank()
        );
        self.replace_layer(LAYER_LC_READ, read_entries);
        self.replace_layer(LAYER_LC_WRITE, write_entries);
    }

    /// Rebuild all aux-memory layers from latch state. The 80STORE layer
    /// is pushed last so it outranks RAMRD/RAMWRT for the pages it owns.
    fn republish_aux_memory(&mut self) {
        let aux = self.aux_memory;

        let mut read_entries = Vec::new();
        let mut write_entries = Vec::new();
        if aux.ramrd() {
            for page in 0x02..=0xBF {
                let slice = self.ram_slice(self.aux_ram, page);
                read_entries.push((page, PageEntry::ram(slice, PagePerms::RX, DEV_AUX_RAM)));
            }
        }
        if aux.ramwrt() {
            for page in 0x02..=0xBF {
                let slice = self.ram_slice(self.aux_ram, page);
                write_entries.push((
                    page,
                    PageEntry::ram(slice, PagePerms::WRITE_ONLY, DEV_AUX_RAM),
                ));
            }
        }

        let mut zp_entries = Vec::new();
        if aux.altzp() {
            for page in 0x00..=0x01 {
                let slice = self.ram_slice(self.aux_ram, page);
                zp_entries.push((page, PageEntry::ram(slice, PagePerms::RWX, DEV_AUX_RAM)));
            }
        }

        let mut store80_entries = Vec::new();
        if aux.store80() {
            let target = if aux.page2() {
                self.aux_ram
            } else {
                self.main_ram
            };
            let own = |entries: &mut Vec<(u8, PageEntry)>, first: u8, last: u8| {
                for page in first..=last {
                    let slice = self.ram_slice(target, page);
                    entries.push((page, PageEntry::ram(slice, PagePerms::RWX, DEV_AUX_RAM)));
                }
            };
            own(&mut store80_entries, 0x04, 0x07);
            if aux.hires() {
                own(&mut store80_entries, 0x20, 0x3F);
            }
        }

        debug!(
            "aux memory: 80store={} ramrd={} ramwrt={} altzp={} page2={} hires={}",
            aux.store80(),
            aux.ramrd(),
            aux.ramwrt(),
            aux.altzp(),
            aux.page2(),
            aux.hires()
        );
        self.replace_layer(LAYER_AUX_READ, read_entries);
        self.replace_layer(LAYER_AUX_WRITE, write_entries);
        self.replace_layer(LAYER_AUX_ZP, zp_entries);
        self.replace_layer(LAYER_AUX_80STORE, store80_entries);
    }

    fn replace_layer(&mut self, id: LayerId, entries: Vec<(u8, PageEntry)>) {
        // Entries are built from this bus's own handles; a failure here
        // is a wiring bug, not a runtime condition.
        if let Err(error) = self.pages.replace_layer(id, entries) {
            unreachable!("layer {id:?} republish rejected: {error}");
        }
    }

    // =========================================================================
    // I/O page dispatch
    // =========================================================================

    fn io_page_read(&mut self, offset: u8, access: BusAccess) -> u8 {
        let route = self.io.route(offset);
        // Any read of a non-Language-Card I/O location interrupts the
        // card's two-read write unlock.
        if !access.intent.is_debug() && route != Route::LanguageCard {
            self.language_card.disarm();
        }
        match route {
            Route::None => FLOATING_BUS,
            Route::AuxSwitch => self.aux_status(offset),
            Route::VideoSwitch => {
                self.video_switch(offset, access);
                FLOATING_BUS
            }
            Route::LanguageCard => {
                self.language_card_access(offset & 0x0F, access, true);
                FLOATING_BUS
            }
            Route::SlotIo(slot) => self.slots.io_read(slot, offset, access),
            Route::Device(index) => self.io.device_read(index, offset, access),
        }
    }

    fn io_page_write(&mut self, offset: u8, access: BusAccess, value: u8) {
        match self.io.route(offset) {
            Route::None => {}
            Route::AuxSwitch => self.aux_switch_write(offset, access),
            Route::VideoSwitch => self.video_switch(offset, access),
            Route::LanguageCard => self.language_card_access(offset & 0x0F, access, false),
            Route::SlotIo(slot) => self.slots.io_write(slot, offset, access, value),
            Route::Device(index) => self.io.device_write(index, offset, access, value),
        }
    }

    fn language_card_access(&mut self, switch: u8, access: BusAccess, is_read: bool) {
        if access.intent.is_debug() {
            return;
        }
        if self.language_card.on_access(switch, is_read) {
            self.republish_language_card();
        }
    }

    /// Status reads for $C000-$C00F: bit 7 reflects the latch.
    fn aux_status(&self, offset: u8) -> u8 {
        let latch = match offset {
            0x00 | 0x01 => self.aux_memory.store80(),
            0x02 | 0x03 => self.aux_memory.ramrd(),
            0x04 | 0x05 => self.aux_memory.ramwrt(),
            0x08 | 0x09 => self.aux_memory.altzp(),
            _ => return FLOATING_BUS,
        };
        if latch { 0x80 } else { 0x00 }
    }

    /// Writes to $C000-$C00F toggle the aux latches: even offset off, odd
    /// offset on.
    fn aux_switch_write(&mut self, offset: u8, access: BusAccess) {
        if access.intent.is_debug() {
            return;
        }
        let on = offset & 1 != 0;
        match offset {
            0x00 | 0x01 => self.aux_memory.store80 = on,
            0x02 | 0x03 => self.aux_memory.ramrd = on,
            0x04 | 0x05 => self.aux_memory.ramwrt = on,
            0x08 | 0x09 => self.aux_memory.altzp = on,
            _ => return,
        }
        self.republish_aux_memory();
    }

    /// $C054-$C057: PAGE2 and HIRES, toggled by any non-debug access.
    fn video_switch(&mut self, offset: u8, access: BusAccess) {
        if access.intent.is_debug() {
            return;
        }
        match offset {
            0x54 => self.aux_memory.page2 = false,
            0x55 => self.aux_memory.page2 = true,
            0x56 => self.aux_memory.hires = false,
            0x57 => self.aux_memory.hires = true,
            _ => return,
        }
        self.republish_aux_memory();
    }
}

impl Bus for Pocket2eBus {
    fn read(&mut self, access: BusAccess) -> u8 {
        match self.pages.read(access) {
            PageRead::Value(value) => value,
            PageRead::Io { offset, .. } => match access.page() {
                0xC0 => self.io_page_read(offset, access),
                page @ 0xC1..=0xC7 => self.slots.rom_read(page & 0x0F, offset, access),
                0xC8..=0xCF => self.slots.expansion_read(access),
                _ => FLOATING_BUS,
            },
        }
    }

    fn write(&mut self, access: BusAccess, value: u8) {
        match self.pages.write(access, value) {
            PageWrite::Done => {}
            PageWrite::Io { offset, .. } => match access.page() {
                0xC0 => self.io_page_write(offset, access, value),
                // Slot firmware is ROM: writes are dropped and do not
                // claim the expansion window.
                0xC1..=0xC7 => {}
                0xC8..=0xCF => self.slots.expansion_write(access),
                _ => {}
            },
        }
    }

    /// Which memory view fronts `address` right now: the Language Card
    /// for the banked ROM range, the aux controller for RAM, else ROM.
    fn memory_context(&self, address: u16) -> MemoryContext {
        if address >= 0xD000 && self.language_card.ram_read_enabled() {
            return MemoryContext::LanguageCardRam;
        }
        let page = (address >> 8) as u8;
        if page < 0xC0 && self.aux_memory.read_routes_to_aux(page) {
            return MemoryContext::AuxiliaryRam;
        }
        MemoryContext::Rom
    }
}
