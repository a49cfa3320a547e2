//! The trap registry: address-indexed, memory-context-aware execution
//! hooks.
//!
//! A trap substitutes a host handler for the emulated code at one
//! address. Entries are keyed by `(address, context)` so the same address
//! can carry distinct handlers depending on which bank is visible: a
//! monitor-ROM hook at $FDED must not fire once the Language Card banks
//! RAM over it.
//!
//! Categories allow bulk enable/disable — a debugger can switch off every
//! operating-system intercept with one call while leaving user traps
//! alone.

use std::collections::HashMap;

use bitflags::bitflags;
use emu_core::MemoryContext;
use log::debug;
use wdc_65c02::{InstructionTrap, TrapFrame, TrapResult};

/// What kind of code a trap replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrapCategory {
    MonitorRom,
    OperatingSystem,
    SlotFirmware,
    UserDefined,
}

bitflags! {
    /// Category bit set for bulk enable/disable.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CategoryMask: u8 {
        const MONITOR_ROM = 1;
        const OPERATING_SYSTEM = 1 << 1;
        const SLOT_FIRMWARE = 1 << 2;
        const USER_DEFINED = 1 << 3;
    }
}

impl TrapCategory {
    #[must_use]
    pub const fn mask(self) -> CategoryMask {
        match self {
            Self::MonitorRom => CategoryMask::MONITOR_ROM,
            Self::OperatingSystem => CategoryMask::OPERATING_SYSTEM,
            Self::SlotFirmware => CategoryMask::SLOT_FIRMWARE,
            Self::UserDefined => CategoryMask::USER_DEFINED,
        }
    }
}

/// A registered handler.
pub type TrapHandler = Box<dyn FnMut(&mut TrapFrame<'_>) -> TrapResult>;

/// One registered trap.
pub struct TrapEntry {
    pub address: u16,
    pub context: MemoryContext,
    pub name: String,
    pub category: TrapCategory,
    pub description: Option<String>,
    pub enabled: bool,
    handler: TrapHandler,
}

/// Maps a PC value to a context the default bus resolution doesn't know
/// about (e.g. an operating system's own bank-switched workspace).
pub type ContextResolver = Box<dyn Fn(u16) -> Option<MemoryContext>>;

/// The address-indexed hook table consulted by the CPU before dispatch.
pub struct TrapRegistry {
    traps: HashMap<(u16, MemoryContext), TrapEntry>,
    enabled_categories: CategoryMask,
    resolver: Option<ContextResolver>,
}

impl TrapRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            traps: HashMap::new(),
            enabled_categories: CategoryMask::all(),
            resolver: None,
        }
    }

    /// Install a custom context resolver, consulted when the bus reports
    /// plain ROM context for an address.
    pub fn set_context_resolver(&mut self, resolver: ContextResolver) {
        self.resolver = Some(resolver);
    }

    /// Register a trap in the default ROM context.
    ///
    /// # Panics
    /// Panics if a trap already exists at `(address, Rom)`.
    pub fn register(
        &mut self,
        address: u16,
        name: impl Into<String>,
        category: TrapCategory,
        handler: TrapHandler,
    ) {
        self.register_in(address, MemoryContext::Rom, name, category, None, handler);
    }

    /// Register a trap that fires only while Language Card RAM fronts the
    /// address.
    pub fn register_language_card_ram(
        &mut self,
        address: u16,
        name: impl Into<String>,
        category: TrapCategory,
        handler: TrapHandler,
    ) {
        self.register_in(
            address,
            MemoryContext::LanguageCardRam,
            name,
            category,
            None,
            handler,
        );
    }

    /// Register a trap in an explicit context.
    ///
    /// # Panics
    /// Panics if a trap already exists at `(address, context)`: two hooks
    /// for one location is always a host bug.
    pub fn register_in(
        &mut self,
        address: u16,
        context: MemoryContext,
        name: impl Into<String>,
        category: TrapCategory,
        description: Option<&str>,
        handler: TrapHandler,
    ) {
        let name = name.into();
        let key = (address, context);
        assert!(
            !self.traps.contains_key(&key),
            "duplicate trap at {address:#06x} in context {context:?}"
        );
        debug!("trap registered: {name} at {address:#06x} ({context:?})");
        self.traps.insert(
            key,
            TrapEntry {
                address,
                context,
                name,
                category,
                description: description.map(str::to_owned),
                enabled: true,
                handler,
            },
        );
    }

    /// Remove a trap. Returns true if one was present.
    pub fn unregister(&mut self, address: u16, context: MemoryContext) -> bool {
        self.traps.remove(&(address, context)).is_some()
    }

    /// Remove every trap registered in `context`.
    pub fn unregister_context(&mut self, context: MemoryContext) {
        self.traps.retain(|(_, c), _| *c != context);
    }

    #[must_use]
    pub fn has_trap(&self, address: u16, context: MemoryContext) -> bool {
        self.traps.contains_key(&(address, context))
    }

    /// Enable or disable traps at `address`. With a context, only that
    /// entry; without, every context registered at the address.
    pub fn set_enabled(&mut self, address: u16, context: Option<MemoryContext>, enabled: bool) {
        match context {
            Some(context) => {
                if let Some(entry) = self.traps.get_mut(&(address, context)) {
                    entry.enabled = enabled;
                }
            }
            None => {
                for entry in self.traps.values_mut() {
                    if entry.address == address {
                        entry.enabled = enabled;
                    }
                }
            }
        }
    }

    /// Bulk enable or disable a whole category.
    pub fn set_category_enabled(&mut self, category: TrapCategory, enabled: bool) {
        if enabled {
            self.enabled_categories |= category.mask();
        } else {
            self.enabled_categories -= category.mask();
        }
    }

    #[must_use]
    pub fn is_category_enabled(&self, category: TrapCategory) -> bool {
        self.enabled_categories.contains(category.mask())
    }

    /// All traps registered at `address`, across contexts. For debug UIs.
    #[must_use]
    pub fn get_traps_at(&self, address: u16) -> Vec<&TrapEntry> {
        let mut entries: Vec<&TrapEntry> = self
            .traps
            .values()
            .filter(|entry| entry.address == address)
            .collect();
        entries.sort_by_key(|entry| format!("{:?}", entry.context));
        entries
    }

    fn resolve_context(&self, pc: u16, frame: &TrapFrame<'_>) -> MemoryContext {
        // The bus knows about the Language Card and aux banks; the custom
        // resolver only gets a say when the bus reports plain ROM.
        match frame.bus.memory_context(pc) {
            MemoryContext::Rom => self
                .resolver
                .as_ref()
                .and_then(|resolve| resolve(pc))
                .unwrap_or(MemoryContext::Rom),
            other => other,
        }
    }
}

impl Default for TrapRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionTrap for TrapRegistry {
    fn try_execute(&mut self, pc: u16, frame: &mut TrapFrame<'_>) -> Option<TrapResult> {
        let context = self.resolve_context(pc, frame);
        let enabled_categories = self.enabled_categories;
        let entry = self.traps.get_mut(&(pc, context))?;
        if !entry.enabled || !enabled_categories.contains(entry.category.mask()) {
            return None;
        }
        Some((entry.handler)(frame))
    }
}
