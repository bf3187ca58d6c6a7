//! Shared test fixtures
//!
//! A simulated Si4703 behind `embedded_hal::i2c::I2c`, a clock/delay pair
//! that share simulated time, and helpers for building wire images.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::i2c::{self, ErrorKind, Operation};
use si4703_radio::config::{DriverConfig, Timing, SI4703_I2C_ADDR};
use si4703_radio::drivers::registers::bits::{channel, powercfg, statusrssi};
use si4703_radio::{Clock, Si4703};

// ============================================================================
// Wire helpers
// ============================================================================

/// Serialize logical registers the way the chip sends them (0x0A first)
pub fn wire_image(regs: &[u16; 16]) -> Vec<u8> {
    (0..16)
        .map(|i| regs[(0x0A + i) % 16])
        .flat_map(u16::to_be_bytes)
        .collect()
}

/// Serialize registers 0x02..=0x07 the way the driver writes them
pub fn control_bytes(control: [u16; 6]) -> Vec<u8> {
    control.iter().flat_map(|r| r.to_be_bytes()).collect()
}

/// Pack two ASCII characters into a block D word
pub fn pair(chars: &[u8; 2]) -> u16 {
    u16::from_be_bytes(*chars)
}

// ============================================================================
// Simulated time
// ============================================================================

/// Clock reading the shared simulated time
#[derive(Clone, Default)]
pub struct SimClock {
    now_ns: Rc<Cell<u64>>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay that advances this clock
    pub fn delay(&self) -> SimDelay {
        SimDelay {
            now_ns: Rc::clone(&self.now_ns),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.now_ns.get() / 1_000_000
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.elapsed_ms()
    }
}

/// Delay that advances simulated time instead of sleeping
pub struct SimDelay {
    now_ns: Rc<Cell<u64>>,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.now_ns.set(self.now_ns.get() + u64::from(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now_ns.set(self.now_ns.get() + u64::from(ms) * 1_000_000);
    }
}

/// Clock frozen at zero, for mock tests that never poll
#[derive(Clone, Copy, Default)]
pub struct FrozenClock;

impl Clock for FrozenClock {
    fn now_ms(&self) -> u64 {
        0
    }
}

// ============================================================================
// Pins
// ============================================================================

/// Output pin that always fails
pub struct BrokenPin;

impl digital::ErrorType for BrokenPin {
    type Error = digital::ErrorKind;
}

impl OutputPin for BrokenPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(digital::ErrorKind::Other)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(digital::ErrorKind::Other)
    }
}

/// Output pin that accepts everything
pub struct NullPin;

impl digital::ErrorType for NullPin {
    type Error = Infallible;
}

impl OutputPin for NullPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

// ============================================================================
// Simulated chip
// ============================================================================

/// How a seek ends
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeekOutcome {
    /// Station found on this channel
    Found(u16),
    /// SF/BL raised
    BandLimit,
}

#[derive(Clone, Copy, Debug)]
enum Pending {
    Tune(u16),
    Seek,
}

/// Observable chip state
pub struct ChipState {
    pub regs: [u16; 16],
    /// Reads after a start bit before STC asserts
    pub stc_delay_reads: usize,
    /// STC never asserts
    pub stc_stuck_low: bool,
    /// STC never clears once set
    pub stc_stuck_high: bool,
    pub seek_outcome: SeekOutcome,
    /// One entry per read: Some((block B, block D)) raises RDSR
    pub rds_feed: VecDeque<Option<(u16, u16)>>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    /// Reads that succeed before every later read fails
    pub read_budget: Option<usize>,
    /// Writes that succeed before every later write fails
    pub write_budget: Option<usize>,
    pub reads: usize,
    /// Control blocks (0x02..=0x07) in the order written
    pub writes: Vec<[u16; 6]>,
    pending: Option<(Pending, usize)>,
}

impl ChipState {
    fn new() -> Self {
        let mut regs = [0u16; 16];
        regs[0x00] = 0x1242;
        regs[0x01] = 0x1253;
        Self {
            regs,
            stc_delay_reads: 3,
            stc_stuck_low: false,
            stc_stuck_high: false,
            seek_outcome: SeekOutcome::Found(0),
            rds_feed: VecDeque::new(),
            fail_reads: false,
            fail_writes: false,
            read_budget: None,
            write_budget: None,
            reads: 0,
            writes: Vec::new(),
            pending: None,
        }
    }

    fn accept_write(&mut self, bytes: &[u8]) -> Result<(), ErrorKind> {
        let spent = self.write_budget.is_some_and(|n| self.writes.len() >= n);
        if self.fail_writes || spent || bytes.len() != 12 {
            return Err(ErrorKind::Other);
        }
        let mut control = [0u16; 6];
        for (i, word) in bytes.chunks_exact(2).enumerate() {
            control[i] = u16::from_be_bytes([word[0], word[1]]);
            self.regs[0x02 + i] = control[i];
        }
        self.writes.push(control);

        let tune = self.regs[0x03] & channel::TUNE != 0;
        let seek = self.regs[0x02] & powercfg::SEEK != 0;
        if self.pending.is_none() && self.regs[0x0A] & statusrssi::STC == 0 {
            if tune {
                let chan = self.regs[0x03] & channel::CHAN_MASK;
                self.pending = Some((Pending::Tune(chan), self.stc_delay_reads));
            } else if seek {
                self.pending = Some((Pending::Seek, self.stc_delay_reads));
            }
        }
        if !tune && !seek && !self.stc_stuck_high {
            self.regs[0x0A] &= !(statusrssi::STC | statusrssi::SFBL);
        }
        Ok(())
    }

    fn serve_read(&mut self, buf: &mut [u8]) -> Result<(), ErrorKind> {
        let spent = self.read_budget.is_some_and(|n| self.reads >= n);
        if self.fail_reads || spent || buf.len() != 32 {
            return Err(ErrorKind::Other);
        }
        self.reads += 1;
        self.advance_handshake();
        self.advance_rds();
        buf.copy_from_slice(&wire_image(&self.regs));
        Ok(())
    }

    fn advance_handshake(&mut self) {
        if self.stc_stuck_low {
            return;
        }
        let Some((op, left)) = self.pending else {
            return;
        };
        if left > 0 {
            self.pending = Some((op, left - 1));
            return;
        }
        self.pending = None;
        self.regs[0x0A] |= statusrssi::STC;
        match op {
            Pending::Tune(chan) => self.regs[0x0B] = chan,
            Pending::Seek => match self.seek_outcome {
                SeekOutcome::Found(chan) => self.regs[0x0B] = chan,
                SeekOutcome::BandLimit => self.regs[0x0A] |= statusrssi::SFBL,
            },
        }
    }

    fn advance_rds(&mut self) {
        match self.rds_feed.pop_front() {
            Some(Some((b, d))) => {
                self.regs[0x0A] |= statusrssi::RDSR;
                self.regs[0x0D] = b;
                self.regs[0x0F] = d;
            }
            Some(None) | None => self.regs[0x0A] &= !statusrssi::RDSR,
        }
    }
}

/// Cloneable handle to a simulated chip
#[derive(Clone)]
pub struct SimChip {
    state: Rc<RefCell<ChipState>>,
}

impl SimChip {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ChipState::new())),
        }
    }

    pub fn state(&self) -> std::cell::RefMut<'_, ChipState> {
        self.state.borrow_mut()
    }

    pub fn last_write(&self) -> [u16; 6] {
        *self.state.borrow().writes.last().expect("no writes yet")
    }

    pub fn reg(&self, index: usize) -> u16 {
        self.state.borrow().regs[index]
    }
}

impl i2c::ErrorType for SimChip {
    type Error = ErrorKind;
}

impl i2c::I2c for SimChip {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        assert_eq!(address, SI4703_I2C_ADDR, "wrong device address");
        let mut state = self.state.borrow_mut();
        for op in operations {
            match op {
                Operation::Read(buf) => state.serve_read(buf)?,
                Operation::Write(bytes) => state.accept_write(bytes)?,
            }
        }
        Ok(())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Timing with short poll intervals and a 1 s STC deadline
pub fn fast_timing() -> Timing {
    Timing {
        stc_poll_interval_ms: 1,
        stc_timeout_ms: 1_000,
        ..Timing::DEFAULT
    }
}

pub type SimRadio = Si4703<SimChip, SimDelay, SimClock>;

/// A powered-on radio on a simulated chip
pub fn powered_radio(config: DriverConfig) -> (SimChip, SimClock, SimRadio) {
    let chip = SimChip::new();
    let clock = SimClock::new();
    let radio = Si4703::power_on(chip.clone(), clock.delay(), clock.clone(), config)
        .expect("power on");
    (chip, clock, radio)
}
