//! Auxiliary memory soft-switch state.
//!
//! Six latches steer reads and writes between main and auxiliary RAM:
//!
//! - **RAMRD / RAMWRT** route reads / writes of $0200-$BFFF to aux RAM.
//! - **ALTZP** moves the zero page and stack ($0000-$01FF) to aux RAM.
//! - **80STORE** takes ownership of text page 1 ($0400-$07FF) away from
//!   RAMRD/RAMWRT and hands the main/aux choice to **PAGE2**; with
//!   **HIRES** on it also owns hi-res page 1 ($2000-$3FFF).
//!
//! The toggles live at $C000-$C00F (write to toggle, read for bit-7
//! status) and $C054-$C057 (PAGE2/HIRES, toggled by any access). Pure
//! state: the bus republishes the page-table layers on change.

/// Auxiliary memory latch state. All latches default off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuxMemory {
    pub(crate) store80: bool,
    pub(crate) altzp: bool,
    pub(crate) ramrd: bool,
    pub(crate) ramwrt: bool,
    pub(crate) page2: bool,
    pub(crate) hires: bool,
}

impl AuxMemory {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            store80: false,
            altzp: false,
            ramrd: false,
            ramwrt: false,
            page2: false,
            hires: false,
        }
    }

    #[must_use]
    pub const fn store80(&self) -> bool {
        self.store80
    }

    #[must_use]
    pub const fn altzp(&self) -> bool {
        self.altzp
    }

    #[must_use]
    pub const fn ramrd(&self) -> bool {
        self.ramrd
    }

    #[must_use]
    pub const fn ramwrt(&self) -> bool {
        self.ramwrt
    }

    #[must_use]
    pub const fn page2(&self) -> bool {
        self.page2
    }

    #[must_use]
    pub const fn hires(&self) -> bool {
        self.hires
    }

    /// Pages owned by 80STORE while it is on: text page 1, plus hi-res
    /// page 1 when HIRES is on.
    pub(crate) fn store80_owns(&self, page: u8) -> bool {
        self.store80
            && ((0x04..=0x07).contains(&page)
                || (self.hires && (0x20..=0x3F).contains(&page)))
    }

    /// True when a read of `page` resolves to auxiliary RAM under the
    /// current latches. Mirrors the layer routing; used for memory-context
    /// resolution.
    #[must_use]
    pub fn read_routes_to_aux(&self, page: u8) -> bool {
        if page <= 0x01 {
            return self.altzp;
        }
        if self.store80_owns(page) {
            return self.page2;
        }
        (0x02..=0xBF).contains(&page) && self.ramrd
    }
}
