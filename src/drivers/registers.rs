//! Si4703 register file
//!
//! Host-side mirror of the chip's sixteen 16-bit registers. The chip
//! supports exactly two transactions:
//!
//! - a 32-byte read that starts at register 0x0A, runs to 0x0F, wraps to
//!   0x00 and ends at 0x09
//! - a 12-byte write of registers 0x02 to 0x07 with no address prefix
//!
//! Words are big-endian on the wire. The image is only valid right after a
//! successful [`RegisterFile::read_all`]; any write or chip-side event makes
//! it stale, so status bits must be read fresh.

use embedded_hal::i2c::I2c;

use crate::config::{READ_LEN, REGISTER_COUNT, WRITE_LEN};
use crate::error::Error;
use crate::hal::i2c::{I2cAddress, I2cBus};

/// Register indices
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Part number and manufacturer
    DeviceId = 0x00,
    /// Chip revision and firmware
    ChipId = 0x01,
    /// Power, mute and seek control
    PowerCfg = 0x02,
    /// Tune bit and channel select
    Channel = 0x03,
    /// Interrupts, RDS enable, de-emphasis
    SysConfig1 = 0x04,
    /// Seek threshold, band, spacing, volume
    SysConfig2 = 0x05,
    /// Softmute and seek tuning
    SysConfig3 = 0x06,
    /// Oscillator enable
    Test1 = 0x07,
    /// Reserved
    Test2 = 0x08,
    /// Reserved
    BootConfig = 0x09,
    /// RDS ready, STC, SF/BL, stereo, RSSI
    StatusRssi = 0x0A,
    /// Current channel
    ReadChan = 0x0B,
    /// RDS block A
    RdsA = 0x0C,
    /// RDS block B
    RdsB = 0x0D,
    /// RDS block C
    RdsC = 0x0E,
    /// RDS block D
    RdsD = 0x0F,
}

impl Register {
    /// First register returned by a read
    pub const READ_START: Self = Self::StatusRssi;

    /// First register consumed by a write
    pub const WRITE_START: Self = Self::PowerCfg;

    /// Index into the register bank
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Bit fields, grouped by register
pub mod bits {
    /// POWERCFG (0x02)
    pub mod powercfg {
        /// Softmute disable
        pub const DSMUTE: u16 = 1 << 15;
        /// Mute disable (audio on when set)
        pub const DMUTE: u16 = 1 << 14;
        /// Force mono
        pub const MONO: u16 = 1 << 13;
        /// Seek mode: wrap at the band edge when set
        pub const SKMODE: u16 = 1 << 10;
        /// Seek direction: up when set
        pub const SEEKUP: u16 = 1 << 9;
        /// Start seek
        pub const SEEK: u16 = 1 << 8;
        /// Powerup disable
        pub const DISABLE: u16 = 1 << 6;
        /// Powerup enable
        pub const ENABLE: u16 = 1 << 0;
    }

    /// CHANNEL (0x03)
    pub mod channel {
        /// Start tune
        pub const TUNE: u16 = 1 << 15;
        /// 10-bit channel code
        pub const CHAN_MASK: u16 = 0x03FF;
    }

    /// SYSCONFIG1 (0x04)
    pub mod sysconfig1 {
        /// RDS enable
        pub const RDS: u16 = 1 << 12;
        /// De-emphasis: 50 us when set
        pub const DE: u16 = 1 << 11;
    }

    /// SYSCONFIG2 (0x05)
    pub mod sysconfig2 {
        /// Band select, bits 7:6
        pub const BAND_MASK: u16 = 0x00C0;
        /// Band field position
        pub const BAND_SHIFT: u16 = 6;
        /// Channel spacing, bits 5:4
        pub const SPACE_MASK: u16 = 0x0030;
        /// Spacing field position
        pub const SPACE_SHIFT: u16 = 4;
        /// Volume, bits 3:0
        pub const VOLUME_MASK: u16 = 0x000F;
        /// Volume field position
        pub const VOLUME_SHIFT: u16 = 0;
    }

    /// STATUSRSSI (0x0A)
    pub mod statusrssi {
        /// RDS group ready
        pub const RDSR: u16 = 1 << 15;
        /// Seek/tune complete
        pub const STC: u16 = 1 << 14;
        /// Seek fail / band limit
        pub const SFBL: u16 = 1 << 13;
        /// Stereo indicator
        pub const ST: u16 = 1 << 8;
        /// RSSI, bits 7:0
        pub const RSSI_MASK: u16 = 0x00FF;
    }

    /// READCHAN (0x0B)
    pub mod readchan {
        /// 10-bit channel code
        pub const CHAN_MASK: u16 = 0x03FF;
    }

    /// RDSB (0x0D)
    pub mod rdsb {
        /// Program-service segment address
        pub const SEGMENT_MASK: u16 = 0x0003;
    }
}

/// Rotate a wire-order bank read into logical order
///
/// Wire word `i` holds register `(0x0A + i) mod 16`.
#[must_use]
pub fn decode_bank(wire: &[u8; READ_LEN]) -> [u16; REGISTER_COUNT] {
    let mut values = [0u16; REGISTER_COUNT];
    for (i, word) in wire.chunks_exact(2).enumerate() {
        let reg = (Register::READ_START.index() + i) % REGISTER_COUNT;
        values[reg] = u16::from_be_bytes([word[0], word[1]]);
    }
    values
}

/// Serialize registers 0x02 to 0x07 in wire order
#[must_use]
pub fn encode_control(values: &[u16; REGISTER_COUNT]) -> [u8; WRITE_LEN] {
    let mut wire = [0u8; WRITE_LEN];
    let start = Register::WRITE_START.index();
    for (i, chunk) in wire.chunks_exact_mut(2).enumerate() {
        chunk.copy_from_slice(&values[start + i].to_be_bytes());
    }
    wire
}

/// Shadow register bank plus the bus it mirrors
pub struct RegisterFile<I2C> {
    bus: I2cBus<I2C>,
    values: [u16; REGISTER_COUNT],
    fresh: bool,
}

impl<I2C: I2c> RegisterFile<I2C> {
    /// Wrap a bus; the image starts zeroed and stale
    #[must_use]
    pub const fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, I2cAddress::SI4703)
    }

    /// Wrap a bus for a chip at a non-default address
    #[must_use]
    pub const fn with_address(i2c: I2C, addr: I2cAddress) -> Self {
        Self {
            bus: I2cBus::new(i2c, addr),
            values: [0; REGISTER_COUNT],
            fresh: false,
        }
    }

    /// Refresh the whole image with one 32-byte read
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the read fails; the image is left stale.
    pub fn read_all(&mut self) -> Result<(), Error<I2C::Error>> {
        let mut wire = [0u8; READ_LEN];
        self.fresh = false;
        self.bus.read_bank(&mut wire).map_err(Error::Bus)?;
        self.values = decode_bank(&wire);
        self.fresh = true;
        Ok(())
    }

    /// Push registers 0x02 to 0x07 with one 12-byte write
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the write fails.
    pub fn write_control(&mut self) -> Result<(), Error<I2C::Error>> {
        let wire = encode_control(&self.values);
        self.fresh = false;
        self.bus.write_control(&wire).map_err(Error::Bus)
    }

    /// Whether the image reflects the chip as of the last read
    #[must_use]
    pub const fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Value of a register in the image
    #[must_use]
    pub const fn get(&self, reg: Register) -> u16 {
        self.values[reg.index()]
    }

    /// Overwrite a register in the image
    pub fn set(&mut self, reg: Register, value: u16) {
        self.values[reg.index()] = value;
    }

    /// Set bits in a register
    pub fn set_bits(&mut self, reg: Register, mask: u16) {
        self.values[reg.index()] |= mask;
    }

    /// Clear bits in a register
    pub fn clear_bits(&mut self, reg: Register, mask: u16) {
        self.values[reg.index()] &= !mask;
    }

    /// Set or clear bits in a register
    pub fn assign_bits(&mut self, reg: Register, mask: u16, on: bool) {
        if on {
            self.set_bits(reg, mask);
        } else {
            self.clear_bits(reg, mask);
        }
    }

    /// Check if every bit of `mask` is set
    #[must_use]
    pub const fn bits_set(&self, reg: Register, mask: u16) -> bool {
        self.values[reg.index()] & mask == mask
    }

    /// Read a field: mask, then shift down
    #[must_use]
    pub const fn field(&self, reg: Register, mask: u16, shift: u16) -> u16 {
        (self.values[reg.index()] & mask) >> shift
    }

    /// Replace a field without touching the neighbouring bits
    pub fn set_field(&mut self, reg: Register, mask: u16, shift: u16, value: u16) {
        let slot = &mut self.values[reg.index()];
        *slot = (*slot & !mask) | ((value << shift) & mask);
    }

    /// All sixteen registers as `(index, value)` pairs
    #[must_use]
    pub fn snapshot(&self) -> [(u8, u16); REGISTER_COUNT] {
        let mut out = [(0u8, 0u16); REGISTER_COUNT];
        for (i, (slot, &value)) in out.iter_mut().zip(self.values.iter()).enumerate() {
            // REGISTER_COUNT is 16, so the index always fits.
            #[allow(clippy::cast_possible_truncation)]
            let index = i as u8;
            *slot = (index, value);
        }
        out
    }

    /// Device address in use
    #[must_use]
    pub const fn address(&self) -> I2cAddress {
        self.bus.address()
    }

    /// Give back the underlying bus
    pub fn release(self) -> I2C {
        self.bus.release()
    }
}
