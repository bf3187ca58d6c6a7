//! `Si4703` FM Tuner Driver
//!
//! Device facade over the register file. Sequences power-on (oscillator
//! start, enable, band plan) and power-off, and exposes tuning, seeking,
//! volume and RDS reads.
//!
//! All operations are blocking and take `&mut self`, so only one can be in
//! flight per device. Every operation that inspects status bits reads the
//! registers first.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;

use crate::config::{DriverConfig, OSCILLATOR_ENABLE, POWERUP_VOLUME, REGISTER_COUNT};
use crate::drivers::registers::bits::{powercfg, statusrssi, sysconfig1, sysconfig2};
use crate::drivers::registers::{Register, RegisterFile};
use crate::error::Error;
use crate::hal::clock::Clock;
use crate::hal::gpio::reset_pulse;
use crate::radio::frequency::FrequencyMap;
use crate::radio::rds::RdsDecoder;
use crate::radio::tuning::TuningController;
use crate::types::{
    DeEmphasis, ProgramService, Region, RegionalConfig, SeekDirection, SignalQuality, Volume,
};

/// `Si4703` driver
pub struct Si4703<I2C, D, C> {
    regs: RegisterFile<I2C>,
    delay: D,
    clock: C,
    config: DriverConfig,
    map: FrequencyMap,
    tuner: TuningController,
    rds: RdsDecoder,
    volume: Volume,
    powered: bool,
}

impl<I2C, D, C> Si4703<I2C, D, C>
where
    I2C: I2c,
    D: DelayNs,
    C: Clock,
{
    /// Pulse the reset line into two-wire mode, then power on
    ///
    /// `sdio` must be the SDIO/SDA pin driven as a plain output; release it
    /// back to the bus peripheral before building `i2c` if the platform
    /// requires that.
    ///
    /// # Errors
    ///
    /// [`Error::Pin`] if the reset sequence fails (the bus is never
    /// touched), otherwise as for [`Si4703::power_on`].
    pub fn power_on_with_reset<RST, SDIO>(
        i2c: I2C,
        rst: &mut RST,
        sdio: &mut SDIO,
        mut delay: D,
        clock: C,
        config: DriverConfig,
    ) -> Result<Self, Error<I2C::Error>>
    where
        RST: OutputPin,
        SDIO: OutputPin,
    {
        reset_pulse(rst, sdio, &mut delay, config.timing.reset_hold_ms)?;
        Self::power_on(i2c, delay, clock, config)
    }

    /// Start the oscillator, enable the chip and apply the band plan
    ///
    /// On failure the bus, delay and clock are dropped.
    ///
    /// # Errors
    ///
    /// [`Error::Bus`] if any transaction fails; the first failed
    /// transaction ends the sequence.
    pub fn power_on(
        i2c: I2C,
        delay: D,
        clock: C,
        config: DriverConfig,
    ) -> Result<Self, Error<I2C::Error>> {
        let region = config.region.config();
        let mut radio = Self {
            regs: RegisterFile::new(i2c),
            delay,
            clock,
            config,
            map: FrequencyMap::new(region),
            tuner: TuningController::new(&config.timing),
            rds: RdsDecoder::new(&config.timing),
            volume: Volume::MIN,
            powered: false,
        };
        radio.start(region)?;
        Ok(radio)
    }

    fn start(&mut self, region: RegionalConfig) -> Result<(), Error<I2C::Error>> {
        info!("powering on, region {}", self.config.region.name());

        if let Err(e) = self.regs.read_all() {
            warn!("initial register read failed, aborting power-on");
            return Err(e);
        }

        // AN230 page 9: start the crystal oscillator and let it settle.
        self.regs.set(Register::Test1, OSCILLATOR_ENABLE);
        self.regs.write_control()?;
        self.delay.delay_ms(self.config.timing.oscillator_settle_ms);

        self.regs.read_all()?;
        self.regs
            .set(Register::PowerCfg, powercfg::DMUTE | powercfg::ENABLE);
        self.regs.set_bits(Register::SysConfig1, sysconfig1::RDS);
        self.regs.assign_bits(
            Register::SysConfig1,
            sysconfig1::DE,
            region.de_emphasis == DeEmphasis::Eu50,
        );
        self.regs.set_field(
            Register::SysConfig2,
            sysconfig2::BAND_MASK,
            sysconfig2::BAND_SHIFT,
            region.band.code(),
        );
        self.regs.set_field(
            Register::SysConfig2,
            sysconfig2::SPACE_MASK,
            sysconfig2::SPACE_SHIFT,
            region.spacing.code(),
        );
        self.regs.set_field(
            Register::SysConfig2,
            sysconfig2::VOLUME_MASK,
            sysconfig2::VOLUME_SHIFT,
            u16::from(POWERUP_VOLUME),
        );
        self.regs.write_control()?;
        self.delay.delay_ms(self.config.timing.powerup_ms);

        self.volume = Volume::new(POWERUP_VOLUME).unwrap_or(Volume::MIN);
        self.powered = true;
        debug!("powered on, volume {}", self.volume.level());
        Ok(())
    }

    /// Clear the enable bit
    ///
    /// Further operations fail with [`Error::PoweredOff`]; the bus stays
    /// owned until [`Si4703::release`].
    ///
    /// # Errors
    ///
    /// [`Error::Bus`] if the read or write fails.
    pub fn power_off(&mut self) -> Result<(), Error<I2C::Error>> {
        if !self.powered {
            return Ok(());
        }
        self.regs.read_all()?;
        self.regs.clear_bits(Register::PowerCfg, powercfg::ENABLE);
        self.regs.write_control()?;
        self.powered = false;
        info!("powered off");
        Ok(())
    }

    /// Tune directly to a frequency in MHz
    ///
    /// # Errors
    ///
    /// [`Error::RejectedFrequency`] (nothing sent) if the frequency is not
    /// on the region's grid, otherwise as for [`TuningController::tune`].
    pub fn set_frequency(&mut self, mhz: f32) -> Result<(), Error<I2C::Error>> {
        self.ensure_powered()?;
        let Some(channel) = self.map.checked_channel(mhz) else {
            debug!("rejected {} MHz: off the channel grid", mhz);
            return Err(Error::RejectedFrequency);
        };
        debug!("tuning to {} MHz (channel {})", mhz, channel);
        self.tuner
            .tune(&mut self.regs, &mut self.delay, &self.clock, channel)
    }

    /// Frequency the chip is tuned to, in MHz
    ///
    /// # Errors
    ///
    /// [`Error::Bus`] if the read fails.
    pub fn frequency(&mut self) -> Result<f32, Error<I2C::Error>> {
        self.ensure_powered()?;
        let channel = TuningController::current_channel(&mut self.regs)?;
        Ok(self.map.channel_to_frequency(channel))
    }

    /// Seek to the next station above the current one (wrapping)
    ///
    /// # Errors
    ///
    /// As for [`Si4703::seek`].
    pub fn seek_up(&mut self) -> Result<f32, Error<I2C::Error>> {
        self.seek(SeekDirection::Up)
    }

    /// Seek to the next station below the current one (wrapping)
    ///
    /// # Errors
    ///
    /// As for [`Si4703::seek`].
    pub fn seek_down(&mut self) -> Result<f32, Error<I2C::Error>> {
        self.seek(SeekDirection::Down)
    }

    /// Seek in `direction` and return the station frequency in MHz
    ///
    /// # Errors
    ///
    /// [`Error::SeekFailed`] if no station was found, otherwise as for
    /// [`TuningController::seek`].
    pub fn seek(&mut self, direction: SeekDirection) -> Result<f32, Error<I2C::Error>> {
        self.ensure_powered()?;
        debug!("seeking {}", direction.name());
        let channel = self
            .tuner
            .seek(&mut self.regs, &mut self.delay, &self.clock, direction)?;
        let mhz = self.map.channel_to_frequency(channel);
        info!("seek {} found {} MHz", direction.name(), mhz);
        Ok(mhz)
    }

    /// Set the volume, clamping into 0..=15
    ///
    /// Returns the level actually applied.
    ///
    /// # Errors
    ///
    /// [`Error::Bus`] if the read or write fails.
    pub fn set_volume(&mut self, level: i32) -> Result<Volume, Error<I2C::Error>> {
        self.ensure_powered()?;
        let volume = Volume::clamped(level);
        if i32::from(volume.level()) != level {
            debug!("volume {} clamped to {}", level, volume.level());
        }
        self.regs.read_all()?;
        self.regs.set_field(
            Register::SysConfig2,
            sysconfig2::VOLUME_MASK,
            sysconfig2::VOLUME_SHIFT,
            u16::from(volume.level()),
        );
        self.regs.write_control()?;
        self.volume = volume;
        Ok(volume)
    }

    /// Volume last applied
    #[must_use]
    pub const fn volume(&self) -> Volume {
        self.volume
    }

    /// Mute or unmute the audio outputs
    ///
    /// # Errors
    ///
    /// [`Error::Bus`] if the read or write fails.
    pub fn set_mute(&mut self, mute: bool) -> Result<(), Error<I2C::Error>> {
        self.ensure_powered()?;
        self.regs.read_all()?;
        self.regs
            .assign_bits(Register::PowerCfg, powercfg::DMUTE, !mute);
        self.regs.write_control()
    }

    /// Assemble the RDS program-service name within `timeout_ms`
    ///
    /// Returns `Ok(None)` if all four segments did not arrive in time.
    ///
    /// # Errors
    ///
    /// [`Error::Bus`] if a register read fails.
    pub fn read_rds(&mut self, timeout_ms: u32) -> Result<Option<ProgramService>, Error<I2C::Error>> {
        self.ensure_powered()?;
        self.rds
            .read(&mut self.regs, &mut self.delay, &self.clock, timeout_ms)
    }

    /// Current RSSI and stereo indicator
    ///
    /// # Errors
    ///
    /// [`Error::Bus`] if the read fails.
    pub fn signal(&mut self) -> Result<SignalQuality, Error<I2C::Error>> {
        self.ensure_powered()?;
        self.regs.read_all()?;
        // Masked to eight bits, so the narrowing is lossless.
        #[allow(clippy::cast_possible_truncation)]
        let rssi = self.regs.field(Register::StatusRssi, statusrssi::RSSI_MASK, 0) as u8;
        Ok(SignalQuality {
            rssi,
            stereo: self.regs.bits_set(Register::StatusRssi, statusrssi::ST),
        })
    }

    /// Fresh `(index, value)` pairs for all sixteen registers
    ///
    /// Diagnostic only; works whether or not the chip is powered.
    ///
    /// # Errors
    ///
    /// [`Error::Bus`] if the read fails.
    pub fn dump_registers(&mut self) -> Result<[(u8, u16); REGISTER_COUNT], Error<I2C::Error>> {
        self.regs.read_all()?;
        Ok(self.regs.snapshot())
    }

    /// Region the chip was configured for
    #[must_use]
    pub const fn region(&self) -> Region {
        self.config.region
    }

    /// Driver configuration
    #[must_use]
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Frequency map for the configured band plan
    #[must_use]
    pub const fn frequency_map(&self) -> &FrequencyMap {
        &self.map
    }

    /// Whether the chip is enabled
    #[must_use]
    pub const fn is_powered(&self) -> bool {
        self.powered
    }

    /// Register image as of the last transaction
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile<I2C> {
        &self.regs
    }

    /// Give back the bus, delay and clock
    pub fn release(self) -> (I2C, D, C) {
        (self.regs.release(), self.delay, self.clock)
    }

    fn ensure_powered(&self) -> Result<(), Error<I2C::Error>> {
        if self.powered {
            Ok(())
        } else {
            Err(Error::PoweredOff)
        }
    }
}
