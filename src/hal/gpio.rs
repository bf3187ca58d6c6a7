//! GPIO reset sequencing
//!
//! The Si4703 selects its bus mode while coming out of reset: SEN must be
//! high (pulled up on most breakouts) and SDIO low for the two-wire
//! interface. SDIO doubles as the I2C data line, so the caller drives it
//! as a plain output for the pulse and hands it to the bus afterwards.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// A reset or mode-select pin refused to change state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinError;

/// Pulse RST with SDIO held low to put the chip into two-wire mode
///
/// RST is left high and SDIO low; the bus driver takes SDIO over afterwards.
///
/// # Errors
///
/// Returns [`PinError`] if either pin cannot be driven.
pub fn reset_pulse<RST, SDIO, D>(
    rst: &mut RST,
    sdio: &mut SDIO,
    delay: &mut D,
    hold_ms: u32,
) -> Result<(), PinError>
where
    RST: OutputPin,
    SDIO: OutputPin,
    D: DelayNs,
{
    sdio.set_low().map_err(|_| PinError)?;
    rst.set_low().map_err(|_| PinError)?;
    delay.delay_ms(hold_ms);
    rst.set_high().map_err(|_| PinError)?;
    delay.delay_ms(hold_ms);
    trace!("reset pulse done, two-wire mode selected");
    Ok(())
}
