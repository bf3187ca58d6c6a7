//! Shared types used across the driver
//!
//! Domain types for the regional band plan, volume, seek direction and the
//! values read back from the chip. Constructors enforce the ranges the
//! register fields can hold.

use core::fmt;

use heapless::String;

/// Length of an RDS program-service name in characters
pub const PS_LEN: usize = 8;

/// Regional band plan selector
///
/// Each region fixes the band limits, the channel spacing and the
/// de-emphasis time constant used at power-on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Region {
    /// Americas: 87.5-108 MHz, 200 kHz spacing, 75 us de-emphasis
    #[default]
    Us,
    /// Europe: 87.5-108 MHz, 100 kHz spacing, 50 us de-emphasis
    Europe,
    /// Japan: 76-108 MHz (wide band), 100 kHz spacing
    Japan,
}

impl Region {
    /// The band plan this region uses
    #[must_use]
    pub const fn config(self) -> RegionalConfig {
        match self {
            Self::Us => RegionalConfig::new(Band::UsEurope, ChannelSpacing::Khz200, DeEmphasis::Us75),
            Self::Europe => {
                RegionalConfig::new(Band::UsEurope, ChannelSpacing::Khz100, DeEmphasis::Eu50)
            }
            Self::Japan => {
                RegionalConfig::new(Band::JapanWide, ChannelSpacing::Khz100, DeEmphasis::Us75)
            }
        }
    }

    /// Short name for logs
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::Europe => "Europe",
            Self::Japan => "Japan",
        }
    }
}

/// FM band limits (SYSCONFIG2 BAND field)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Band {
    /// 87.5 - 108 MHz
    UsEurope,
    /// 76 - 108 MHz
    JapanWide,
    /// 76 - 90 MHz
    Japan,
}

impl Band {
    /// Raw 2-bit field value
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::UsEurope => 0b00,
            Self::JapanWide => 0b01,
            Self::Japan => 0b10,
        }
    }

    /// Lowest tunable frequency in MHz (channel 0)
    #[must_use]
    pub const fn min_mhz(self) -> f32 {
        match self {
            Self::UsEurope => 87.5,
            Self::JapanWide | Self::Japan => 76.0,
        }
    }

    /// Highest tunable frequency in MHz
    #[must_use]
    pub const fn max_mhz(self) -> f32 {
        match self {
            Self::UsEurope | Self::JapanWide => 108.0,
            Self::Japan => 90.0,
        }
    }
}

/// Channel spacing (SYSCONFIG2 SPACE field)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelSpacing {
    /// 200 kHz (Americas)
    Khz200,
    /// 100 kHz (Europe, Japan)
    Khz100,
    /// 50 kHz
    Khz50,
}

impl ChannelSpacing {
    /// Raw 2-bit field value
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Khz200 => 0b00,
            Self::Khz100 => 0b01,
            Self::Khz50 => 0b10,
        }
    }

    /// Spacing in kHz
    #[must_use]
    pub const fn khz(self) -> u16 {
        match self {
            Self::Khz200 => 200,
            Self::Khz100 => 100,
            Self::Khz50 => 50,
        }
    }

    /// Spacing in MHz
    #[must_use]
    pub const fn mhz(self) -> f32 {
        match self {
            Self::Khz200 => 0.2,
            Self::Khz100 => 0.1,
            Self::Khz50 => 0.05,
        }
    }
}

/// De-emphasis time constant (SYSCONFIG1 DE bit)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeEmphasis {
    /// 75 us (DE clear)
    #[default]
    Us75,
    /// 50 us (DE set)
    Eu50,
}

/// Immutable band plan: band limits, channel spacing and de-emphasis
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegionalConfig {
    /// Band limits
    pub band: Band,
    /// Channel spacing
    pub spacing: ChannelSpacing,
    /// De-emphasis time constant
    pub de_emphasis: DeEmphasis,
}

impl RegionalConfig {
    /// Build a band plan from its parts
    #[must_use]
    pub const fn new(band: Band, spacing: ChannelSpacing, de_emphasis: DeEmphasis) -> Self {
        Self {
            band,
            spacing,
            de_emphasis,
        }
    }
}

impl From<Region> for RegionalConfig {
    fn from(region: Region) -> Self {
        region.config()
    }
}

/// Seek direction (POWERCFG SEEKUP bit)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SeekDirection {
    /// Toward lower frequencies (reset default)
    #[default]
    Down,
    /// Toward higher frequencies
    Up,
}

impl SeekDirection {
    /// Short name for logs
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Up => "up",
        }
    }
}

/// Audio volume, 0 (mute) to 15 (maximum)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Volume(u8);

impl Volume {
    /// Muted
    pub const MIN: Self = Self(0);

    /// Loudest
    pub const MAX: Self = Self(15);

    /// Create from a level, returns None if above 15
    #[must_use]
    pub const fn new(level: u8) -> Option<Self> {
        if level <= Self::MAX.0 {
            Some(Self(level))
        } else {
            None
        }
    }

    /// Create from any level, clamping into 0..=15
    #[must_use]
    pub fn clamped(level: i32) -> Self {
        // The clamp makes the narrowing lossless.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Self(level.clamp(i32::from(Self::MIN.0), i32::from(Self::MAX.0)) as u8)
    }

    /// Get the level
    #[must_use]
    pub const fn level(self) -> u8 {
        self.0
    }
}

/// Received signal indicators from STATUSRSSI
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalQuality {
    /// Received signal strength in dBuV
    pub rssi: u8,
    /// Stereo pilot detected
    pub stereo: bool,
}

/// Eight-character RDS program-service name
///
/// Holds the raw bytes exactly as received plus a printable rendition
/// in which anything outside printable ASCII is replaced by `?`.
#[derive(Clone, PartialEq, Eq)]
pub struct ProgramService {
    raw: [u8; PS_LEN],
    text: String<PS_LEN>,
}

impl ProgramService {
    /// Length of a program-service name in characters
    pub const LEN: usize = PS_LEN;

    /// Build from the eight bytes of the four assembled pairs
    #[must_use]
    pub fn from_bytes(raw: [u8; PS_LEN]) -> Self {
        let mut text = String::new();
        for &byte in &raw {
            let ch = if byte.is_ascii_graphic() || byte == b' ' {
                char::from(byte)
            } else {
                '?'
            };
            // Every char is one byte, so eight always fit.
            let _ = text.push(ch);
        }
        Self { raw, text }
    }

    /// Raw bytes as received from block D
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; PS_LEN] {
        &self.raw
    }

    /// Printable rendition
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Debug for ProgramService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProgramService({:?})", self.text.as_str())
    }
}

impl fmt::Display for ProgramService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ProgramService {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "PS \"{}\"", self.text.as_str());
    }
}
