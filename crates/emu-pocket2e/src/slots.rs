//! The slot manager: 8 expansion positions and the shared expansion ROM.
//!
//! Each installed card may expose a 16-byte I/O window in the I/O page, a
//! 256-byte slot ROM at $Cn00, and a 2 KiB expansion ROM image. The
//! expansion ROM window at $C800-$CFFF is shared: a read anywhere in a
//! slot's $Cn00-$CnFF window makes that slot the owner (writes do not),
//! and any access to $CFFF deselects. Debug-intent accesses never change
//! the selection.

use emu_core::{BusAccess, FLOATING_BUS};
use log::debug;

/// A peripheral card installed in a slot.
///
/// Slot I/O handlers receive the **global** I/O-page offset (for slot 3
/// register 5 that is $B5, i.e. `0x80 | 3 << 4 | 5`), not the
/// slot-relative register number. Cards that want the register index mask
/// with `0x0F`.
pub trait SlotCard {
    fn name(&self) -> &str;

    /// Called once when the card is installed, with its slot number.
    fn on_install(&mut self, _slot: u8) {}

    /// Machine reset.
    fn reset(&mut self) {}

    fn io_read(&mut self, _offset: u8, _access: BusAccess) -> u8 {
        FLOATING_BUS
    }

    fn io_write(&mut self, _offset: u8, _access: BusAccess, _value: u8) {}

    /// 256-byte firmware window at $Cn00, if the card carries one.
    fn slot_rom(&self) -> Option<&[u8]> {
        None
    }

    /// 2 KiB shared expansion ROM image, if the card carries one.
    fn expansion_rom(&self) -> Option<&[u8]> {
        None
    }

    fn on_expansion_rom_selected(&mut self) {}
    fn on_expansion_rom_deselected(&mut self) {}
}

/// Errors from card installation.
#[derive(Debug, thiserror::Error)]
pub enum SlotError {
    #[error("slot {0} is out of range (0-7)")]
    BadSlot(u8),
    #[error("slot {0} is already occupied")]
    Occupied(u8),
}

/// Holds the 8 slot cards and tracks expansion-ROM ownership.
#[derive(Default)]
pub struct SlotManager {
    cards: [Option<Box<dyn SlotCard>>; 8],
    expansion_owner: Option<u8>,
}

impl SlotManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&mut self, slot: u8, mut card: Box<dyn SlotCard>) -> Result<(), SlotError> {
        if slot > 7 {
            return Err(SlotError::BadSlot(slot));
        }
        let place = &mut self.cards[slot as usize];
        if place.is_some() {
            return Err(SlotError::Occupied(slot));
        }
        debug!("slot {slot}: installing {}", card.name());
        card.on_install(slot);
        *place = Some(card);
        Ok(())
    }

    #[must_use]
    pub fn card(&self, slot: u8) -> Option<&dyn SlotCard> {
        self.cards.get(slot as usize)?.as_deref()
    }

    /// The slot currently owning $C800-$CFFF, if any.
    #[must_use]
    pub fn expansion_owner(&self) -> Option<u8> {
        self.expansion_owner
    }

    /// Reset every installed card and release the expansion ROM.
    pub fn reset(&mut self) {
        self.deselect_expansion();
        for card in self.cards.iter_mut().flatten() {
            card.reset();
        }
    }

    pub(crate) fn io_read(&mut self, slot: u8, offset: u8, access: BusAccess) -> u8 {
        match &mut self.cards[slot as usize] {
            Some(card) => card.io_read(offset, access),
            None => FLOATING_BUS,
        }
    }

    pub(crate) fn io_write(&mut self, slot: u8, offset: u8, access: BusAccess, value: u8) {
        if let Some(card) = &mut self.cards[slot as usize] {
            card.io_write(offset, access, value);
        }
    }

    /// Read from a slot's $Cn00 firmware window. A non-debug read also
    /// claims the expansion ROM for that slot.
    pub(crate) fn rom_read(&mut self, slot: u8, offset: u8, access: BusAccess) -> u8 {
        if !access.intent.is_debug() {
            self.select_expansion(slot);
        }
        self.cards[slot as usize]
            .as_ref()
            .and_then(|card| card.slot_rom())
            .and_then(|rom| rom.get(offset as usize).copied())
            .unwrap_or(FLOATING_BUS)
    }

    /// Read from the shared expansion ROM window. $CFFF deselects after
    /// the read.
    pub(crate) fn expansion_read(&mut self, access: BusAccess) -> u8 {
        let value = self
            .expansion_owner
            .and_then(|slot| self.cards[slot as usize].as_ref())
            .and_then(|card| card.expansion_rom())
            .and_then(|rom| rom.get((access.address - 0xC800) as usize).copied())
            .unwrap_or(FLOATING_BUS);
        if access.address == 0xCFFF && !access.intent.is_debug() {
            self.deselect_expansion();
        }
        value
    }

    /// A write into $C800-$CFFF: dropped, but $CFFF still deselects.
    pub(crate) fn expansion_write(&mut self, access: BusAccess) {
        if access.address == 0xCFFF && !access.intent.is_debug() {
            self.deselect_expansion();
        }
    }

    fn select_expansion(&mut self, slot: u8) {
        if self.expansion_owner == Some(slot) {
            return;
        }
        self.deselect_expansion();
        self.expansion_owner = Some(slot);
        if let Some(card) = &mut self.cards[slot as usize] {
            card.on_expansion_rom_selected();
        }
    }

    fn deselect_expansion(&mut self) {
        if let Some(previous) = self.expansion_owner.take() {
            if let Some(card) = &mut self.cards[previous as usize] {
                card.on_expansion_rom_deselected();
            }
        }
    }
}
