//! Channel / frequency mapping
//!
//! AN230 section 3.7.1: `frequency = spacing * channel + band_minimum`.
//! The inverse adds a small epsilon before truncating so a frequency that
//! is an exact grid multiple never lands one channel low because of float
//! rounding. Frequencies are in MHz.

use crate::config::{CHANNEL_EPSILON, GRID_TOLERANCE_MHZ};
use crate::drivers::registers::bits::channel::CHAN_MASK;
use crate::types::RegionalConfig;

/// Stateless frequency <-> channel code translation for one band plan
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrequencyMap {
    config: RegionalConfig,
}

impl FrequencyMap {
    /// Create a map for a band plan
    #[must_use]
    pub const fn new(config: RegionalConfig) -> Self {
        Self { config }
    }

    /// Band plan in use
    #[must_use]
    pub const fn config(&self) -> RegionalConfig {
        self.config
    }

    /// Frequency of channel 0
    #[must_use]
    pub const fn min_frequency(&self) -> f32 {
        self.config.band.min_mhz()
    }

    /// Upper band edge
    #[must_use]
    pub const fn max_frequency(&self) -> f32 {
        self.config.band.max_mhz()
    }

    /// Channel spacing in MHz
    #[must_use]
    pub const fn channel_spacing(&self) -> f32 {
        self.config.spacing.mhz()
    }

    /// Frequency of a channel code
    #[must_use]
    pub fn channel_to_frequency(&self, channel: u16) -> f32 {
        self.channel_spacing() * f32::from(channel) + self.min_frequency()
    }

    /// Channel code nearest below `frequency` (plus epsilon)
    ///
    /// Frequencies below the band minimum saturate to channel 0.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn frequency_to_channel(&self, frequency: f32) -> u16 {
        let fchannel = (frequency - self.min_frequency()) / self.channel_spacing();
        // Float-to-int `as` truncates and saturates at 0.
        (CHANNEL_EPSILON + fchannel) as u16
    }

    /// True if `frequency` sits on the channel grid within tolerance
    #[must_use]
    pub fn is_on_grid(&self, frequency: f32) -> bool {
        let channel = self.frequency_to_channel(frequency);
        (self.channel_to_frequency(channel) - frequency).abs() < GRID_TOLERANCE_MHZ
    }

    /// Channel code for a tunable frequency
    ///
    /// Returns None if the frequency is off-grid, outside the band, or needs
    /// more than the 10 bits the CHANNEL register holds.
    #[must_use]
    pub fn checked_channel(&self, frequency: f32) -> Option<u16> {
        if !frequency.is_finite()
            || frequency < self.min_frequency() - GRID_TOLERANCE_MHZ
            || frequency > self.max_frequency() + GRID_TOLERANCE_MHZ
            || !self.is_on_grid(frequency)
        {
            return None;
        }
        let channel = self.frequency_to_channel(frequency);
        (channel <= CHAN_MASK).then_some(channel)
    }
}

impl From<RegionalConfig> for FrequencyMap {
    fn from(config: RegionalConfig) -> Self {
        Self::new(config)
    }
}
