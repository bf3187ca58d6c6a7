//! Tune / seek completion handshake
//!
//! Tuning and seeking share one four-phase protocol with the chip:
//!
//! ```text
//!  Idle ──set start bit, write──▶ Requested ──▶ Polling (until STC = 1)
//!   ▲                                               │
//!   └──── (until STC = 0) ◀── Clearing ◀──clear start bit, write
//! ```
//!
//! The chip has no interrupt line on this path, so both STC edges are
//! polled. Each edge has its own deadline and fails with
//! [`Error::HardwareTimeout`] instead of blocking forever.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::config::Timing;
use crate::drivers::registers::bits::{channel, powercfg, readchan, statusrssi};
use crate::drivers::registers::{Register, RegisterFile};
use crate::error::Error;
use crate::hal::clock::Clock;
use crate::types::SeekDirection;

/// Which start bit drives the handshake
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operation {
    /// Direct tune (CHANNEL.TUNE)
    Tune,
    /// Seek (POWERCFG.SEEK)
    Seek,
}

impl Operation {
    /// Register and bit that start this operation
    #[must_use]
    pub const fn start_bit(self) -> (Register, u16) {
        match self {
            Self::Tune => (Register::Channel, channel::TUNE),
            Self::Seek => (Register::PowerCfg, powercfg::SEEK),
        }
    }

    /// Short name for logs
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tune => "tune",
            Self::Seek => "seek",
        }
    }
}

/// Handshake phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// No operation in flight
    Idle,
    /// Start bit written
    Requested,
    /// Waiting for STC to assert
    Polling,
    /// Start bit cleared, waiting for STC to drop
    Clearing,
}

impl Phase {
    /// Short name for logs
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Requested => "requested",
            Self::Polling => "polling",
            Self::Clearing => "clearing",
        }
    }
}

/// Drives direct tune and seek through the STC handshake
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TuningController {
    settle_ms: u32,
    poll_interval_ms: u32,
    timeout_ms: u32,
}

impl TuningController {
    /// Create a controller from the driver timing
    #[must_use]
    pub const fn new(timing: &Timing) -> Self {
        Self {
            settle_ms: timing.tune_settle_ms,
            poll_interval_ms: timing.stc_poll_interval_ms,
            timeout_ms: timing.stc_timeout_ms,
        }
    }

    /// Tune to a channel code and wait for the handshake to settle
    ///
    /// The chip reports no success or failure for a direct tune; a settled
    /// handshake is the only outcome.
    ///
    /// # Errors
    ///
    /// [`Error::Bus`] on any failed transaction, [`Error::HardwareTimeout`]
    /// if STC never asserts or never clears.
    pub fn tune<I2C, D, C>(
        &self,
        regs: &mut RegisterFile<I2C>,
        delay: &mut D,
        clock: &C,
        chan: u16,
    ) -> Result<(), Error<I2C::Error>>
    where
        I2C: I2c,
        D: DelayNs,
        C: Clock,
    {
        regs.read_all()?;
        regs.set_field(Register::Channel, channel::CHAN_MASK, 0, chan);
        regs.set_bits(Register::Channel, channel::TUNE);
        self.handshake(regs, delay, clock, Operation::Tune)?;
        Ok(())
    }

    /// Seek with wrap-around and return the channel the chip settled on
    ///
    /// # Errors
    ///
    /// [`Error::SeekFailed`] if SF/BL was set when the seek completed,
    /// otherwise as for [`TuningController::tune`].
    pub fn seek<I2C, D, C>(
        &self,
        regs: &mut RegisterFile<I2C>,
        delay: &mut D,
        clock: &C,
        direction: SeekDirection,
    ) -> Result<u16, Error<I2C::Error>>
    where
        I2C: I2c,
        D: DelayNs,
        C: Clock,
    {
        regs.read_all()?;
        regs.set_bits(Register::PowerCfg, powercfg::SKMODE);
        regs.assign_bits(
            Register::PowerCfg,
            powercfg::SEEKUP,
            direction == SeekDirection::Up,
        );
        regs.set_bits(Register::PowerCfg, powercfg::SEEK);

        let status = self.handshake(regs, delay, clock, Operation::Seek)?;
        if status & statusrssi::SFBL != 0 {
            debug!("seek {} hit the band limit", direction.name());
            return Err(Error::SeekFailed);
        }

        Self::current_channel(regs)
    }

    /// Read the channel the chip is tuned to
    ///
    /// # Errors
    ///
    /// [`Error::Bus`] if the read fails.
    pub fn current_channel<I2C: I2c>(
        regs: &mut RegisterFile<I2C>,
    ) -> Result<u16, Error<I2C::Error>> {
        regs.read_all()?;
        Ok(regs.field(Register::ReadChan, readchan::CHAN_MASK, 0))
    }

    /// Run the four-phase handshake; the start bit must already be set
    ///
    /// Returns STATUSRSSI as read when STC first asserted.
    fn handshake<I2C, D, C>(
        &self,
        regs: &mut RegisterFile<I2C>,
        delay: &mut D,
        clock: &C,
        op: Operation,
    ) -> Result<u16, Error<I2C::Error>>
    where
        I2C: I2c,
        D: DelayNs,
        C: Clock,
    {
        let (reg, start) = op.start_bit();

        regs.write_control()?;
        trace!("{} handshake: {}", op.name(), Phase::Requested.name());
        delay.delay_ms(self.settle_ms);

        trace!("{} handshake: {}", op.name(), Phase::Polling.name());
        let status = match self.wait_for_stc(regs, delay, clock, true) {
            Ok(status) => status,
            Err(e) => {
                Self::log_wait_failure(op, "set", &e);
                // Drop the start bit so the chip is not left mid-operation.
                // The image is only fresh after a timeout.
                if regs.is_fresh() {
                    regs.clear_bits(reg, start);
                    if regs.write_control().is_err() {
                        warn!("{} start bit could not be cleared", op.name());
                    }
                }
                return Err(e);
            }
        };

        regs.clear_bits(reg, start);
        regs.write_control()?;
        trace!("{} handshake: {}", op.name(), Phase::Clearing.name());

        if let Err(e) = self.wait_for_stc(regs, delay, clock, false) {
            Self::log_wait_failure(op, "clear", &e);
            return Err(e);
        }
        trace!("{} handshake: {}", op.name(), Phase::Idle.name());
        Ok(status)
    }

    fn log_wait_failure<E>(op: Operation, edge: &str, e: &Error<E>) {
        if e.is_bus() {
            warn!("{} handshake: bus error while waiting for STC to {}", op.name(), edge);
        } else {
            warn!("{} handshake timed out waiting for STC to {}", op.name(), edge);
        }
    }

    /// Poll until STC equals `set`, returning the matching STATUSRSSI
    fn wait_for_stc<I2C, D, C>(
        &self,
        regs: &mut RegisterFile<I2C>,
        delay: &mut D,
        clock: &C,
        set: bool,
    ) -> Result<u16, Error<I2C::Error>>
    where
        I2C: I2c,
        D: DelayNs,
        C: Clock,
    {
        let deadline = clock.now_ms().saturating_add(u64::from(self.timeout_ms));
        loop {
            regs.read_all()?;
            let status = regs.get(Register::StatusRssi);
            if (status & statusrssi::STC != 0) == set {
                return Ok(status);
            }
            if clock.now_ms() >= deadline {
                return Err(Error::HardwareTimeout);
            }
            delay.delay_ms(self.poll_interval_ms);
        }
    }
}

impl Default for TuningController {
    fn default() -> Self {
        Self::new(&Timing::DEFAULT)
    }
}
