//! Driver configuration and hardware constants
//!
//! Timing values come from the Si4703 datasheet and the AN230 programming
//! guide. They are centralized here and collected into [`Timing`] so a
//! caller can stretch or shorten them (slow hosts, simulated chips).

use crate::types::Region;

/// Si4703 7-bit I2C address
pub const SI4703_I2C_ADDR: u8 = 0x10;

/// Number of 16-bit registers in the chip's register bank
pub const REGISTER_COUNT: usize = 16;

/// Bytes returned by a full register read (16 words)
pub const READ_LEN: usize = 32;

/// Bytes sent by a control write (registers 0x02 to 0x07)
pub const WRITE_LEN: usize = 12;

/// Value written to TEST1 to start the crystal oscillator (AN230 page 9)
pub const OSCILLATOR_ENABLE: u16 = 0x8100;

/// Crystal oscillator settle time in milliseconds (AN230 page 9)
pub const OSCILLATOR_SETTLE_MS: u32 = 500;

/// Maximum powerup time in milliseconds (datasheet page 13)
pub const POWERUP_MS: u32 = 110;

/// Hold time for each edge of the reset pulse in milliseconds
pub const RESET_HOLD_MS: u32 = 1;

/// Pause after starting a tune before the first STC poll
pub const TUNE_SETTLE_MS: u32 = 60;

/// Interval between STC polls in milliseconds
pub const STC_POLL_INTERVAL_MS: u32 = 5;

/// Deadline for one STC edge (set or cleared) in milliseconds
///
/// Must cover a full-band seek: ~640 channels at 50 kHz spacing.
pub const STC_TIMEOUT_MS: u32 = 15_000;

/// Pause after an RDS-ready poll so the RDSR bit can clear
pub const RDS_ACCEPT_PAUSE_MS: u32 = 40;

/// Steady-state pause between RDS polls when no group is ready (AN230)
pub const RDS_IDLE_PAUSE_MS: u32 = 30;

/// Block B values at or above this belong to other RDS group types
pub const RDS_BLOCK_B_LIMIT: u16 = 500;

/// Tolerance in MHz when checking a frequency against the channel grid
pub const GRID_TOLERANCE_MHZ: f32 = 0.02;

/// Added before truncating a fractional channel code
pub const CHANNEL_EPSILON: f32 = 0.001;

/// Volume applied at power-on (lowest audible step)
pub const POWERUP_VOLUME: u8 = 1;

/// Delays and deadlines used by the driver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Oscillator settle delay during power-on
    pub oscillator_settle_ms: u32,
    /// Powerup delay after enabling the chip
    pub powerup_ms: u32,
    /// Hold time for each reset pulse edge
    pub reset_hold_ms: u32,
    /// Pause before the first STC poll of a tune or seek
    pub tune_settle_ms: u32,
    /// Pause between STC polls
    pub stc_poll_interval_ms: u32,
    /// Deadline for each STC edge
    pub stc_timeout_ms: u32,
    /// Pause after an RDS-ready poll
    pub rds_accept_pause_ms: u32,
    /// Pause after a poll with no RDS group ready
    pub rds_idle_pause_ms: u32,
}

impl Timing {
    /// Datasheet timing
    pub const DEFAULT: Self = Self {
        oscillator_settle_ms: OSCILLATOR_SETTLE_MS,
        powerup_ms: POWERUP_MS,
        reset_hold_ms: RESET_HOLD_MS,
        tune_settle_ms: TUNE_SETTLE_MS,
        stc_poll_interval_ms: STC_POLL_INTERVAL_MS,
        stc_timeout_ms: STC_TIMEOUT_MS,
        rds_accept_pause_ms: RDS_ACCEPT_PAUSE_MS,
        rds_idle_pause_ms: RDS_IDLE_PAUSE_MS,
    };
}

impl Default for Timing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Runtime driver configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverConfig {
    /// Regional band plan
    pub region: Region,
    /// Delays and deadlines
    pub timing: Timing,
}

impl DriverConfig {
    /// Configuration for a region with datasheet timing
    #[must_use]
    pub const fn new(region: Region) -> Self {
        Self {
            region,
            timing: Timing::DEFAULT,
        }
    }

    /// Replace the region
    #[must_use]
    pub const fn with_region(self, region: Region) -> Self {
        Self { region, ..self }
    }

    /// Replace the whole timing set
    #[must_use]
    pub const fn with_timing(self, timing: Timing) -> Self {
        Self { timing, ..self }
    }

    /// Replace the STC deadline used by tune and seek
    #[must_use]
    pub const fn with_stc_timeout_ms(self, stc_timeout_ms: u32) -> Self {
        Self {
            timing: Timing {
                stc_timeout_ms,
                ..self.timing
            },
            ..self
        }
    }
}
