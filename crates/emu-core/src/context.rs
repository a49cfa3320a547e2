//! Memory context tags.

/// Identifies which "view" of memory is active at a given address.
///
/// Bank switching means one address can front several different bytes. The
/// context tag disambiguates them, primarily as a secondary key for the
/// trap registry: a hook installed for `(addr, Rom)` must not fire when the
/// Language Card has banked RAM over the same address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryContext {
    /// System ROM is visible at the address.
    Rom,
    /// Language Card RAM is banked in over the address.
    LanguageCardRam,
    /// Auxiliary RAM is switched in over the address.
    AuxiliaryRam,
    /// A machine-specific domain supplied by a custom resolver
    /// (e.g. an operating system's bank-switched workspace).
    Custom(&'static str),
}
