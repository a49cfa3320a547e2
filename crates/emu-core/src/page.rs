//! The paged bus: a 256-entry page map with layered overrides.
//!
//! A 16-bit address space decomposes into 256 pages of 256 bytes. Each page
//! routes independently to a target: a RAM slice, a ROM slice, or the
//! machine's composite I/O handler. Bank-switch controllers stack sparse
//! layers over the base map; the topmost layer claiming a page wins.
//!
//! Read and write decode independently: a layer entry only claims an access
//! direction its permissions allow, falling through otherwise. This is how
//! real bank-switch hardware behaves — the Language Card can satisfy reads
//! from ROM while steering writes into banked RAM.

use bitflags::bitflags;
use thiserror::Error;

use crate::access::AccessIntent;
use crate::memory::{MemoryHandle, MemoryPool, MemorySlice, PhysicalMemory};
use crate::BusAccess;

/// Bytes per page.
pub const PAGE_SIZE: usize = 256;

/// The value read from an unmapped address: real hardware leaves the data
/// bus floating, which reads back as all ones.
pub const FLOATING_BUS: u8 = 0xFF;

bitflags! {
    /// Per-page access permissions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PagePerms: u8 {
        const READ = 1;
        const WRITE = 1 << 1;
        const EXECUTE = 1 << 2;
    }
}

impl PagePerms {
    pub const RX: Self = Self::READ.union(Self::EXECUTE);
    pub const RWX: Self = Self::READ.union(Self::WRITE).union(Self::EXECUTE);
    pub const WRITE_ONLY: Self = Self::WRITE;
}

bitflags! {
    /// What a target is physically capable of. The page map rejects
    /// mappings whose permissions exceed the target's capabilities.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TargetCaps: u8 {
        const READABLE = 1;
        const WRITABLE = 1 << 1;
        /// Accesses have side effects beyond data transfer (I/O handlers).
        const SIDECHANNEL = 1 << 2;
    }
}

/// Which device a page belongs to, for diagnostics and the debug UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId(pub u8);

impl DeviceId {
    pub const NONE: Self = Self(0);
}

/// Coarse classification of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Ram,
    Rom,
    Io,
    Unmapped,
}

/// Where a page's bytes live.
#[derive(Debug, Clone, Copy)]
pub enum PageTarget {
    /// A 256-byte window into RAM.
    Ram(MemorySlice),
    /// A 256-byte window into ROM. Ordinary writes are dropped; debug
    /// writes are honoured so tests can patch ROM images.
    Rom(MemorySlice),
    /// Routed to the owning bus's composite I/O dispatcher.
    Io,
    Unmapped,
}

impl PageTarget {
    #[must_use]
    pub const fn caps(&self) -> TargetCaps {
        match self {
            Self::Ram(_) => TargetCaps::READABLE.union(TargetCaps::WRITABLE),
            Self::Rom(_) => TargetCaps::READABLE,
            Self::Io => TargetCaps::READABLE
                .union(TargetCaps::WRITABLE)
                .union(TargetCaps::SIDECHANNEL),
            Self::Unmapped => TargetCaps::empty(),
        }
    }
}

/// One entry of the page map.
#[derive(Debug, Clone, Copy)]
pub struct PageEntry {
    pub target: PageTarget,
    pub perms: PagePerms,
    pub region: RegionKind,
    pub device: DeviceId,
}

impl PageEntry {
    #[must_use]
    pub const fn unmapped() -> Self {
        Self {
            target: PageTarget::Unmapped,
            perms: PagePerms::empty(),
            region: RegionKind::Unmapped,
            device: DeviceId::NONE,
        }
    }

    #[must_use]
    pub const fn ram(slice: MemorySlice, perms: PagePerms, device: DeviceId) -> Self {
        Self {
            target: PageTarget::Ram(slice),
            perms,
            region: RegionKind::Ram,
            device,
        }
    }

    #[must_use]
    pub const fn rom(slice: MemorySlice, device: DeviceId) -> Self {
        Self {
            target: PageTarget::Rom(slice),
            perms: PagePerms::RX,
            region: RegionKind::Rom,
            device,
        }
    }

    #[must_use]
    pub const fn io(device: DeviceId) -> Self {
        Self {
            target: PageTarget::Io,
            perms: PagePerms::RWX,
            region: RegionKind::Io,
            device,
        }
    }

    /// True when this entry claims accesses in the given direction.
    fn claims(&self, write: bool) -> bool {
        if write {
            self.perms.contains(PagePerms::WRITE)
        } else {
            self.perms.contains(PagePerms::READ)
        }
    }

    /// Validate the entry against the pool and the target's capabilities.
    fn verify(&self, page: u8, pool: &MemoryPool) -> Result<(), MapError> {
        let caps = self.target.caps();
        let wanted = {
            let mut c = TargetCaps::empty();
            if self.perms.contains(PagePerms::READ) {
                c |= TargetCaps::READABLE;
            }
            if self.perms.contains(PagePerms::WRITE) {
                c |= TargetCaps::WRITABLE;
            }
            c
        };
        if !caps.contains(wanted) {
            return Err(MapError::IncompatiblePermissions {
                page,
                perms: self.perms,
                caps,
            });
        }
        if let PageTarget::Ram(slice) | PageTarget::Rom(slice) = self.target {
            if !pool.contains(slice.memory) {
                return Err(MapError::UnknownMemory);
            }
            let size = pool.get(slice.memory).len();
            let end = slice.base + slice.len;
            if slice.len != PAGE_SIZE || end > size {
                return Err(MapError::SliceOutOfBounds {
                    name: pool.get(slice.memory).name().to_owned(),
                    base: slice.base,
                    end,
                    size,
                });
            }
        }
        Ok(())
    }
}

/// Identifies a layer so its owning controller can replace it without
/// touching anyone else's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub &'static str);

struct Layer {
    id: LayerId,
    /// Sparse page → entry map, sorted by page for binary search.
    entries: Vec<(u8, PageEntry)>,
}

impl Layer {
    fn get(&self, page: u8) -> Option<&PageEntry> {
        self.entries
            .binary_search_by_key(&page, |(p, _)| *p)
            .ok()
            .map(|i| &self.entries[i].1)
    }
}

/// Errors detected at wire-up time. Runtime access never errors.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("page range {start:#04x}+{count} exceeds the 256-page table")]
    PageRangeOverflow { start: u8, count: usize },
    #[error("slice {base:#x}..{end:#x} is out of bounds for memory '{name}' ({size} bytes)")]
    SliceOutOfBounds {
        name: String,
        base: usize,
        end: usize,
        size: usize,
    },
    #[error("permissions {perms:?} exceed target capabilities {caps:?} on page {page:#04x}")]
    IncompatiblePermissions {
        page: u8,
        perms: PagePerms,
        caps: TargetCaps,
    },
    #[error("layer {0:?} is already pushed")]
    DuplicateLayer(LayerId),
    #[error("page entry references a memory handle outside the pool")]
    UnknownMemory,
}

/// Result of routing a read through the page map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRead {
    Value(u8),
    /// The page routes to the composite I/O handler; the owning bus must
    /// dispatch by offset.
    Io { offset: u8, device: DeviceId },
}

/// Result of routing a write through the page map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageWrite {
    Done,
    Io { offset: u8, device: DeviceId },
}

/// The main bus: 256-entry base map plus an ordered stack of overrides.
pub struct PageTable {
    pool: MemoryPool,
    base: Vec<PageEntry>,
    layers: Vec<Layer>,
}

impl PageTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pool: MemoryPool::new(),
            base: vec![PageEntry::unmapped(); 256],
            layers: Vec::new(),
        }
    }

    /// Hand a physical memory to the table's pool, receiving a handle.
    pub fn add_memory(&mut self, memory: PhysicalMemory) -> MemoryHandle {
        self.pool.add(memory)
    }

    #[must_use]
    pub fn memory(&self, handle: MemoryHandle) -> &PhysicalMemory {
        self.pool.get(handle)
    }

    pub fn memory_mut(&mut self, handle: MemoryHandle) -> &mut PhysicalMemory {
        self.pool.get_mut(handle)
    }

    fn check_range(start: u8, count: usize) -> Result<(), MapError> {
        if start as usize + count > 256 {
            return Err(MapError::PageRangeOverflow { start, count });
        }
        Ok(())
    }

    /// Map `count` consecutive pages to RAM starting at `physical_base`.
    pub fn map_ram(
        &mut self,
        start: u8,
        count: usize,
        device: DeviceId,
        perms: PagePerms,
        memory: MemoryHandle,
        physical_base: usize,
    ) -> Result<(), MapError> {
        Self::check_range(start, count)?;
        for i in 0..count {
            let page = start + i as u8;
            let slice = MemorySlice::new(memory, physical_base + i * PAGE_SIZE, PAGE_SIZE);
            let entry = PageEntry::ram(slice, perms, device);
            entry.verify(page, &self.pool)?;
            self.base[page as usize] = entry;
        }
        Ok(())
    }

    /// Map `count` consecutive pages to ROM starting at `physical_base`.
    pub fn map_rom(
        &mut self,
        start: u8,
        count: usize,
        device: DeviceId,
        memory: MemoryHandle,
        physical_base: usize,
    ) -> Result<(), MapError> {
        Self::check_range(start, count)?;
        for i in 0..count {
            let page = start + i as u8;
            let slice = MemorySlice::new(memory, physical_base + i * PAGE_SIZE, PAGE_SIZE);
            let entry = PageEntry::rom(slice, device);
            entry.verify(page, &self.pool)?;
            self.base[page as usize] = entry;
        }
        Ok(())
    }

    /// Route `count` consecutive pages to the composite I/O handler.
    pub fn map_io(&mut self, start: u8, count: usize, device: DeviceId) -> Result<(), MapError> {
        Self::check_range(start, count)?;
        for i in 0..count {
            self.base[start as usize + i] = PageEntry::io(device);
        }
        Ok(())
    }

    /// Push a sparse override layer. Entries are re-verified against their
    /// targets' capabilities, so a popped and re-pushed layer can never
    /// leave a dangling reference.
    pub fn push_layer(
        &mut self,
        id: LayerId,
        mut entries: Vec<(u8, PageEntry)>,
    ) -> Result<(), MapError> {
        if self.layers.iter().any(|l| l.id == id) {
            return Err(MapError::DuplicateLayer(id));
        }
        for (page, entry) in &entries {
            entry.verify(*page, &self.pool)?;
        }
        entries.sort_by_key(|(page, _)| *page);
        self.layers.push(Layer { id, entries });
        Ok(())
    }

    /// Remove the layer with the given id. Returns true if it was present.
    pub fn pop_layer(&mut self, id: LayerId) -> bool {
        let before = self.layers.len();
        self.layers.retain(|l| l.id != id);
        self.layers.len() != before
    }

    /// Replace a controller's own layer, leaving it topmost. An empty entry
    /// list simply removes the layer.
    pub fn replace_layer(
        &mut self,
        id: LayerId,
        entries: Vec<(u8, PageEntry)>,
    ) -> Result<(), MapError> {
        self.pop_layer(id);
        if entries.is_empty() {
            return Ok(());
        }
        self.push_layer(id, entries)
    }

    #[must_use]
    pub fn has_layer(&self, id: LayerId) -> bool {
        self.layers.iter().any(|l| l.id == id)
    }

    /// Resolve the entry governing an access to `page` in the given
    /// direction: topmost claiming layer wins, else the base map.
    #[must_use]
    pub fn resolve(&self, page: u8, write: bool) -> PageEntry {
        for layer in self.layers.iter().rev() {
            if let Some(entry) = layer.get(page) {
                if entry.claims(write) {
                    return *entry;
                }
            }
        }
        self.base[page as usize]
    }

    /// Route a read. I/O pages are deferred to the owning bus.
    #[must_use]
    pub fn read(&self, access: BusAccess) -> PageRead {
        let entry = self.resolve(access.page(), false);
        match entry.target {
            PageTarget::Ram(slice) | PageTarget::Rom(slice) => {
                if entry.perms.contains(PagePerms::READ) {
                    let byte = self.pool.get(slice.memory).bytes()
                        [slice.base + access.offset() as usize];
                    PageRead::Value(byte)
                } else {
                    PageRead::Value(FLOATING_BUS)
                }
            }
            PageTarget::Io => PageRead::Io {
                offset: access.offset(),
                device: entry.device,
            },
            PageTarget::Unmapped => PageRead::Value(FLOATING_BUS),
        }
    }

    /// Route a write. Writes the target does not permit are dropped;
    /// debug-intent writes land even in ROM.
    pub fn write(&mut self, access: BusAccess, value: u8) -> PageWrite {
        let entry = self.resolve(access.page(), true);
        match entry.target {
            PageTarget::Ram(slice) => {
                if entry.perms.contains(PagePerms::WRITE)
                    || access.intent == AccessIntent::DebugWrite
                {
                    self.pool.get_mut(slice.memory).bytes_mut()
                        [slice.base + access.offset() as usize] = value;
                }
                PageWrite::Done
            }
            PageTarget::Rom(slice) => {
                if access.intent == AccessIntent::DebugWrite {
                    self.pool.get_mut(slice.memory).bytes_mut()
                        [slice.base + access.offset() as usize] = value;
                }
                PageWrite::Done
            }
            PageTarget::Io => PageWrite::Io {
                offset: access.offset(),
                device: entry.device,
            },
            PageTarget::Unmapped => PageWrite::Done,
        }
    }
}

impl Default for PageTable {
    fn default() -> Self {
        Self::new()
    }
}
