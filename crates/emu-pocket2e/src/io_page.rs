//! The I/O page dispatcher.
//!
//! Page $C0 sub-dispatches by 8-bit offset. Offsets $00-$7F are
//! soft-switch space (aux-memory toggles, video switches, anything a
//! device registers); offsets $80-$FF are slot space, carved as
//! `0x80 | (slot << 4) | register`, with the slot-0 window belonging to
//! the Language Card.
//!
//! The route table is dense: one entry per offset. Built-in controllers
//! get enum routes so the bus can reach them by name; external devices
//! register boxed handlers over offset ranges (a later registration for
//! an offset wins). Unregistered offsets read as floating bus and discard
//! writes.

use emu_core::BusAccess;

/// An externally registered soft-switch handler.
///
/// Handlers must be idempotent under debug intent: when
/// `access.intent.is_debug()` they MUST NOT mutate any state.
pub trait IoHandler {
    fn read(&mut self, offset: u8, access: BusAccess) -> u8;
    fn write(&mut self, offset: u8, access: BusAccess, value: u8);
}

/// Where an I/O-page offset routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Route {
    None,
    /// $C000-$C00F: aux-memory toggles and status reads.
    AuxSwitch,
    /// $C054-$C057: PAGE2/HIRES selectors.
    VideoSwitch,
    /// $C080-$C08F.
    LanguageCard,
    /// $C090-$C0FF: slot 1-7 I/O windows.
    SlotIo(u8),
    /// Externally registered handler.
    Device(usize),
}

pub struct IoPage {
    routes: [Route; 256],
    devices: Vec<Box<dyn IoHandler>>,
}

impl IoPage {
    #[must_use]
    pub(crate) fn new() -> Self {
        let mut routes = [Route::None; 256];
        for offset in 0x00..=0x0F {
            routes[offset] = Route::AuxSwitch;
        }
        for offset in 0x54..=0x57 {
            routes[offset] = Route::VideoSwitch;
        }
        for offset in 0x80..=0x8F {
            routes[offset] = Route::LanguageCard;
        }
        for offset in 0x90..=0xFFusize {
            let slot = ((offset >> 4) & 0x07) as u8;
            routes[offset] = Route::SlotIo(slot);
        }
        Self {
            routes,
            devices: Vec::new(),
        }
    }

    /// Register a handler over an inclusive offset range, replacing
    /// whatever was routed there.
    pub fn register_device(&mut self, first: u8, last: u8, device: Box<dyn IoHandler>) {
        let index = self.devices.len();
        self.devices.push(device);
        for offset in first..=last {
            self.routes[offset as usize] = Route::Device(index);
        }
    }

    pub(crate) fn route(&self, offset: u8) -> Route {
        self.routes[offset as usize]
    }

    pub(crate) fn device_read(&mut self, index: usize, offset: u8, access: BusAccess) -> u8 {
        self.devices[index].read(offset, access)
    }

    pub(crate) fn device_write(&mut self, index: usize, offset: u8, access: BusAccess, value: u8) {
        self.devices[index].write(offset, access, value);
    }
}
