//! Language Card soft-switch state.
//!
//! The Language Card banks 16 KiB of RAM over the system ROM at
//! $D000-$FFFF: two 4 KiB banks selectable at $D000-$DFFF plus a common
//! 8 KiB upper bank. Its sixteen soft switches live at $C080-$C08F.
//!
//! Decode of switch `n` (the low four bits of the address):
//! - RAM is read-enabled when bits 0 and 1 of `n` are equal
//!   (`n & 3` of 0 or 3); otherwise ROM reads are selected.
//! - Bit 3 selects the $D000 bank: set selects bank 1, clear bank 2.
//! - Write enable uses the two-read unlock: two consecutive reads of an
//!   odd-numbered switch enable writes. A single odd read half-arms; a
//!   read of an even switch disables writes and disarms; any write access
//!   to the switches, or a read of any non-Language-Card I/O location,
//!   resets the arm counter.
//!
//! This struct is pure state; the bus owns it and republishes the page
//! table layers when `on_access` reports a change.

/// Language Card latch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageCard {
    ram_read_enabled: bool,
    ram_write_enabled: bool,
    /// 1 or 2; selects which 4 KiB bank fronts $D000-$DFFF.
    selected_bank: u8,
    /// Two-read unlock progress (0 or 1).
    write_arm: u8,
}

impl LanguageCard {
    /// Power-on state: ROM visible, writes disabled, bank 1 selected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ram_read_enabled: false,
            ram_write_enabled: false,
            selected_bank: 1,
            write_arm: 0,
        }
    }

    #[must_use]
    pub const fn ram_read_enabled(&self) -> bool {
        self.ram_read_enabled
    }

    #[must_use]
    pub const fn ram_write_enabled(&self) -> bool {
        self.ram_write_enabled
    }

    #[must_use]
    pub const fn selected_bank(&self) -> u8 {
        self.selected_bank
    }

    /// Handle an access to switch `n` (0-15). Returns true when the
    /// visible mapping changed and the owning bus must republish its
    /// layers. Debug-intent accesses must not reach this method.
    pub fn on_access(&mut self, n: u8, is_read: bool) -> bool {
        let read_ram = (n & 1) == ((n >> 1) & 1);
        let bank = if n & 0x08 != 0 { 1 } else { 2 };

        let mut changed =
            self.ram_read_enabled != read_ram || self.selected_bank != bank;
        self.ram_read_enabled = read_ram;
        self.selected_bank = bank;

        if is_read {
            if n & 1 != 0 {
                self.write_arm += 1;
                if self.write_arm >= 2 {
                    changed |= !self.ram_write_enabled;
                    self.ram_write_enabled = true;
                    self.write_arm = 2;
                }
            } else {
                changed |= self.ram_write_enabled;
                self.ram_write_enabled = false;
                self.write_arm = 0;
            }
        } else {
            // Write accesses still set the read/bank latches but never
            // advance the unlock.
            self.write_arm = 0;
        }

        changed
    }

    /// A read of any non-Language-Card I/O location interrupts the
    /// two-read unlock sequence.
    pub fn disarm(&mut self) {
        if self.ram_write_enabled {
            // An armed-and-enabled card stays enabled; only the unlock
            // counter resets.
            self.write_arm = 2;
        } else {
            self.write_arm = 0;
        }
    }
}

impl Default for LanguageCard {
    fn default() -> Self {
        Self::new()
    }
}
