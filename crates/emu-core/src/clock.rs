//! Master clock configuration.

use crate::Cycles;

/// Master clock configuration for a system.
///
/// Each system has a master crystal that drives all timing. Components may
/// run at divided rates, but everything derives from this frequency.
#[derive(Debug, Clone, Copy)]
pub struct MasterClock {
    /// Crystal frequency in Hz (e.g. `1_020_484` for an NTSC Apple II).
    pub frequency_hz: u64,
}

impl MasterClock {
    #[must_use]
    pub const fn new(frequency_hz: u64) -> Self {
        Self { frequency_hz }
    }

    /// Cycles per frame at the given frame rate (integer division).
    #[must_use]
    pub const fn cycles_per_frame(&self, frames_per_second: u64) -> Cycles {
        Cycles::new(self.frequency_hz / frames_per_second)
    }
}
