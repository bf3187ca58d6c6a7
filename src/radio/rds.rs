//! RDS program-service name assembly
//!
//! The program-service (PS) name arrives as four two-character segments in
//! group 0A/0B. Block B's low two bits give the segment address, block D
//! carries the two characters (high byte first). Segments repeat and can
//! arrive in any order; the first copy of each wins.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::config::{Timing, RDS_BLOCK_B_LIMIT};
use crate::drivers::registers::bits::{rdsb, statusrssi};
use crate::drivers::registers::{Register, RegisterFile};
use crate::error::Error;
use crate::hal::clock::Clock;
use crate::types::{ProgramService, PS_LEN};

/// Number of two-character segments in a PS name
pub const SEGMENTS: usize = PS_LEN / 2;

/// What happened to one offered group
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Offer {
    /// Segment stored
    Accepted(u8),
    /// Segment already filled; payload ignored
    Duplicate(u8),
    /// Block B belongs to another group type
    Discarded,
}

/// Per-read assembly state: four slots and a fill count
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RdsAssembly {
    slots: [Option<[u8; 2]>; SEGMENTS],
    filled: usize,
}

impl RdsAssembly {
    /// Empty buffer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [None; SEGMENTS],
            filled: 0,
        }
    }

    /// Offer one group's block B and block D
    pub fn offer(&mut self, block_b: u16, block_d: u16) -> Offer {
        if block_b >= RDS_BLOCK_B_LIMIT {
            return Offer::Discarded;
        }
        // Masked to two bits, so the narrowing is lossless.
        #[allow(clippy::cast_possible_truncation)]
        let segment = (block_b & rdsb::SEGMENT_MASK) as u8;
        let slot = &mut self.slots[usize::from(segment)];
        if slot.is_some() {
            return Offer::Duplicate(segment);
        }
        *slot = Some(block_d.to_be_bytes());
        self.filled += 1;
        Offer::Accepted(segment)
    }

    /// Number of distinct segments received
    #[must_use]
    pub const fn filled(&self) -> usize {
        self.filled
    }

    /// All four segments received
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.filled == SEGMENTS
    }

    /// The assembled name, or None while any segment is missing
    #[must_use]
    pub fn finish(&self) -> Option<ProgramService> {
        let mut raw = [0u8; PS_LEN];
        for (chunk, slot) in raw.chunks_exact_mut(2).zip(self.slots.iter()) {
            chunk.copy_from_slice(slot.as_ref()?);
        }
        Some(ProgramService::from_bytes(raw))
    }
}

/// Polls the chip until a full PS name is assembled or the deadline passes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RdsDecoder {
    ready_pause_ms: u32,
    idle_pause_ms: u32,
}

impl RdsDecoder {
    /// Create a decoder from the driver timing
    #[must_use]
    pub const fn new(timing: &Timing) -> Self {
        Self {
            ready_pause_ms: timing.rds_accept_pause_ms,
            idle_pause_ms: timing.rds_idle_pause_ms,
        }
    }

    /// Assemble a PS name within `timeout_ms`
    ///
    /// Returns `Ok(None)` on timeout; a partial name is never returned.
    ///
    /// # Errors
    ///
    /// [`Error::Bus`] if a register read fails.
    pub fn read<I2C, D, C>(
        &self,
        regs: &mut RegisterFile<I2C>,
        delay: &mut D,
        clock: &C,
        timeout_ms: u32,
    ) -> Result<Option<ProgramService>, Error<I2C::Error>>
    where
        I2C: I2c,
        D: DelayNs,
        C: Clock,
    {
        let deadline = clock.now_ms().saturating_add(u64::from(timeout_ms));
        let mut assembly = RdsAssembly::new();

        while !assembly.is_complete() && clock.now_ms() < deadline {
            regs.read_all()?;

            if regs.bits_set(Register::StatusRssi, statusrssi::RDSR) {
                match assembly.offer(regs.get(Register::RdsB), regs.get(Register::RdsD)) {
                    Offer::Accepted(segment) => {
                        trace!("rds segment {} accepted ({}/4)", segment, assembly.filled());
                    }
                    Offer::Duplicate(segment) => trace!("rds segment {} repeated", segment),
                    Offer::Discarded => trace!("rds group ignored, block B out of range"),
                }
                delay.delay_ms(self.ready_pause_ms);
            } else {
                delay.delay_ms(self.idle_pause_ms);
            }
        }

        let name = assembly.finish();
        match &name {
            Some(ps) => debug!("rds name \"{}\"", ps.as_str()),
            None => debug!("rds timed out with {}/4 segments", assembly.filled()),
        }
        Ok(name)
    }
}

impl Default for RdsDecoder {
    fn default() -> Self {
        Self::new(&Timing::DEFAULT)
    }
}
