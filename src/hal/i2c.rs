//! I2C Bus Abstractions
//!
//! The Si4703 speaks a reduced I2C dialect: reads always start at register
//! 0x0A and writes always start at register 0x02, so no register-address
//! byte is ever sent. Only whole-bank reads and control-block writes exist.

use embedded_hal::i2c::I2c;

use crate::config::{READ_LEN, SI4703_I2C_ADDR, WRITE_LEN};

/// I2C device address wrapper
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct I2cAddress(u8);

impl I2cAddress {
    /// Si4703 FM tuner address
    pub const SI4703: Self = Self(SI4703_I2C_ADDR);

    /// Create from 7-bit address
    #[must_use]
    pub const fn new(addr: u8) -> Self {
        Self(addr & 0x7F)
    }

    /// Get the 7-bit address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self.0
    }
}

impl Default for I2cAddress {
    fn default() -> Self {
        Self::SI4703
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for I2cAddress {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "0x{:02X}", self.0);
    }
}

/// Bus wrapper for the Si4703's two transaction shapes
pub struct I2cBus<I2C> {
    i2c: I2C,
    addr: I2cAddress,
}

impl<I2C: I2c> I2cBus<I2C> {
    /// Wrap a bus for the device at `addr`
    #[must_use]
    pub const fn new(i2c: I2C, addr: I2cAddress) -> Self {
        Self { i2c, addr }
    }

    /// Read the whole register bank in wire order (0x0A first)
    pub fn read_bank(&mut self, buffer: &mut [u8; READ_LEN]) -> Result<(), I2C::Error> {
        self.i2c.read(self.addr.addr(), buffer)
    }

    /// Write the control block (0x02 to 0x07) in wire order
    pub fn write_control(&mut self, data: &[u8; WRITE_LEN]) -> Result<(), I2C::Error> {
        self.i2c.write(self.addr.addr(), data)
    }

    /// Device address in use
    #[must_use]
    pub const fn address(&self) -> I2cAddress {
        self.addr
    }

    /// Give back the underlying bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}
