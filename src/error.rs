//! Driver error type
//!
//! Every bus failure is surfaced as-is; the driver never retries. The
//! non-I/O variants are validation or protocol outcomes the caller is
//! expected to handle.

use core::fmt;

use crate::hal::gpio::PinError;

/// Errors returned by the Si4703 driver, generic over the bus error `E`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// A bus transaction failed or transferred fewer bytes than required
    Bus(E),
    /// A reset or mode-select pin could not be driven
    Pin,
    /// Frequency is off the channel grid or outside the band; nothing was sent
    RejectedFrequency,
    /// Seek reached the band limit or found no station
    SeekFailed,
    /// The chip never raised (or never cleared) seek/tune complete
    HardwareTimeout,
    /// The device has been powered off
    PoweredOff,
}

impl<E> Error<E> {
    /// True for failures of the bus transport itself
    #[must_use]
    pub const fn is_bus(&self) -> bool {
        matches!(self, Self::Bus(_))
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "bus transaction failed: {e:?}"),
            Self::Pin => f.write_str("reset pin could not be driven"),
            Self::RejectedFrequency => f.write_str("frequency is not on the configured channel grid"),
            Self::SeekFailed => f.write_str("seek reached the band limit without finding a station"),
            Self::HardwareTimeout => f.write_str("chip did not signal seek/tune complete in time"),
            Self::PoweredOff => f.write_str("device is powered off"),
        }
    }
}

impl<E> From<PinError> for Error<E> {
    fn from(_: PinError) -> Self {
        Self::Pin
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}
