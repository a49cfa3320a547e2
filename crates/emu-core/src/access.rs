//! The bus access record.
//!
//! Every memory operation in the system is described by a [`BusAccess`]:
//! the address, the width, the intent, who issued it, and when. Routing the
//! same record through CPU fetches, device reads, and debugger peeks lets
//! soft-switch handlers distinguish a real access from a side-effect-free
//! inspection.

use bitflags::bitflags;

/// Identifies the component that issued a bus access or asserted a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u16);

impl SourceId {
    /// The CPU core.
    pub const CPU: Self = Self(0);
    /// The machine itself (reset sequencing, build-time pokes).
    pub const SYSTEM: Self = Self(1);
    /// The debugger / monitor front-end.
    pub const DEBUGGER: Self = Self(2);
}

/// Access width in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessWidth {
    #[default]
    Eight,
    Sixteen,
}

/// Whether a 16-bit access is performed as two 8-bit bus cycles or as one
/// atomic operation. The 65C02 only ever decomposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    #[default]
    Decomposed,
    Atomic,
}

/// Why the bus is being accessed.
///
/// `DebugRead` and `DebugWrite` are the contract for side-effect-free
/// access: soft-switch handlers MUST NOT mutate state when they see a debug
/// intent, and ROM targets honour `DebugWrite` (test ROM patching) while
/// dropping ordinary writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessIntent {
    InstructionFetch,
    DataRead,
    DataWrite,
    DebugRead,
    DebugWrite,
}

impl AccessIntent {
    #[must_use]
    pub const fn is_debug(self) -> bool {
        matches!(self, Self::DebugRead | Self::DebugWrite)
    }

    #[must_use]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::DataWrite | Self::DebugWrite)
    }
}

bitflags! {
    /// Free-form qualifier bits carried alongside an access.
    ///
    /// The core defines no bits of its own; machines and devices may agree
    /// on meanings for their private plumbing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AccessFlags: u8 {}
}

/// The structured record passed through every memory operation.
#[derive(Debug, Clone, Copy)]
pub struct BusAccess {
    /// 16-bit bus address. `page = address >> 8`, `offset = address & 0xFF`.
    pub address: u16,
    pub width: AccessWidth,
    pub mode: AccessMode,
    pub intent: AccessIntent,
    /// Who issued the access.
    pub source: SourceId,
    /// Scheduler cycle count at the time of the access.
    pub cycle: u64,
    pub flags: AccessFlags,
    /// Legacy 65C02 emulation flag; always true on this CPU family.
    pub emulation: bool,
}

impl BusAccess {
    const fn with_intent(address: u16, intent: AccessIntent) -> Self {
        Self {
            address,
            width: AccessWidth::Eight,
            mode: AccessMode::Decomposed,
            intent,
            source: SourceId::CPU,
            cycle: 0,
            flags: AccessFlags::empty(),
            emulation: true,
        }
    }

    /// An instruction fetch by the CPU.
    #[must_use]
    pub const fn fetch(address: u16) -> Self {
        Self::with_intent(address, AccessIntent::InstructionFetch)
    }

    /// An ordinary data read.
    #[must_use]
    pub const fn data_read(address: u16) -> Self {
        Self::with_intent(address, AccessIntent::DataRead)
    }

    /// An ordinary data write.
    #[must_use]
    pub const fn data_write(address: u16) -> Self {
        Self::with_intent(address, AccessIntent::DataWrite)
    }

    /// A side-effect-free debugger read. Never triggers soft switches.
    #[must_use]
    pub const fn debug_read(address: u16) -> Self {
        let mut access = Self::with_intent(address, AccessIntent::DebugRead);
        access.source = SourceId::DEBUGGER;
        access
    }

    /// A debugger write. Honoured even by ROM targets.
    #[must_use]
    pub const fn debug_write(address: u16) -> Self {
        let mut access = Self::with_intent(address, AccessIntent::DebugWrite);
        access.source = SourceId::DEBUGGER;
        access
    }

    #[must_use]
    pub const fn with_source(mut self, source: SourceId) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub const fn at_cycle(mut self, cycle: u64) -> Self {
        self.cycle = cycle;
        self
    }

    /// Page index of the address (top 8 bits).
    #[must_use]
    pub const fn page(&self) -> u8 {
        (self.address >> 8) as u8
    }

    /// Offset within the page (bottom 8 bits).
    #[must_use]
    pub const fn offset(&self) -> u8 {
        (self.address & 0xFF) as u8
    }
}
