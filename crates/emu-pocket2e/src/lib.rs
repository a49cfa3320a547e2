//! Pocket2e: the execution core of an Apple IIe-class machine.
//!
//! The machine wires a [`wdc_65c02`] CPU to a paged bus with the IIe's
//! memory map, the Language Card and auxiliary-memory bank-switch
//! controllers, an eight-position slot manager with the shared expansion
//! ROM protocol, and an address-indexed trap registry for intercepting
//! ROM routines. Renderers, audio, keyboard, and slot peripherals are
//! external: they read memory through side-effect-free peeks, register
//! soft-switch handlers in the I/O page, and assert IRQ/NMI through the
//! shared signal bus.

mod aux_memory;
mod bus;
mod config;
mod io_page;
mod language_card;
mod machine;
pub mod profile;
mod slots;
mod traps;
pub mod video;

pub use aux_memory::AuxMemory;
pub use bus::Pocket2eBus;
pub use config::{Pocket2eConfig, CLOCK_HZ};
pub use io_page::IoHandler;
pub use language_card::LanguageCard;
pub use machine::Pocket2e;
pub use slots::{SlotCard, SlotError, SlotManager};
pub use traps::{CategoryMask, ContextResolver, TrapCategory, TrapEntry, TrapHandler, TrapRegistry};

use thiserror::Error;

/// Errors surfaced while assembling a machine. The partially constructed
/// machine is discarded.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("system ROM must be {expected} bytes, got {got}")]
    RomSize { expected: usize, got: usize },
    #[error(transparent)]
    Map(#[from] emu_core::MapError),
    #[error(transparent)]
    Slot(#[from] SlotError),
    #[error(transparent)]
    Profile(#[from] profile::ProfileError),
}
