//! Si4703 FM Radio Receiver Driver
//!
//! This library drives a Silicon Labs Si4703 FM tuner over its two-wire
//! (I2C) interface. It exposes tuning, seeking, volume and RDS
//! program-service decoding while hiding the chip's register layout,
//! transaction ordering and polling-based completion signaling.
//!
//! # Architecture
//!
//! The driver is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       DEVICE FACADE                          │
//! │   power on/off  │  tune / seek  │  volume  │  RDS read       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      RADIO LOGIC                             │
//! │  FrequencyMap  │  TuningController  │  RdsDecoder            │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    REGISTER FILE                             │
//! │  16 x u16 shadow  │  32-byte read  │  12-byte control write  │
//! ├─────────────────────────────────────────────────────────────┤
//! │                 INJECTED CAPABILITIES                        │
//! │  embedded-hal I2c  │  DelayNs  │  Clock  │  OutputPin (reset)│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Owned register image**: the shadow registers live on the device
//!   handle and are re-read before any status bit is inspected
//! - **Bounded polling**: every tune/seek handshake has a deadline
//! - **Explicit outcomes**: rejected frequencies, failed seeks and RDS
//!   timeouts are distinct results, never sentinel values
//! - **Single owner**: one operation in flight per device, enforced by `&mut self`

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Logging macros must be declared before the modules that use them.
#[macro_use]
mod fmt;

/// Bus, pin and time plumbing
///
/// Device address, reset pulse sequencing and the monotonic clock capability.
pub mod hal;

/// Chip-level drivers
///
/// The Si4703 register file and the device facade built on it.
pub mod drivers;

/// Radio logic
///
/// Channel mapping, the tune/seek handshake and RDS assembly.
pub mod radio;

/// Shared types used across modules
pub mod types;

/// Driver configuration and constants
pub mod config;

/// Driver error type
pub mod error;

pub use config::{DriverConfig, Timing};
pub use drivers::registers::{Register, RegisterFile};
pub use drivers::si4703::Si4703;
pub use error::Error;
pub use hal::clock::Clock;
#[cfg(feature = "std")]
pub use hal::clock::StdClock;
pub use radio::frequency::FrequencyMap;
pub use types::{
    Band, ChannelSpacing, DeEmphasis, ProgramService, Region, RegionalConfig, SeekDirection,
    SignalQuality, Volume,
};

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;
    pub use crate::{Clock, Error, FrequencyMap, Si4703};

    // Capabilities the driver is generic over
    pub use embedded_hal::delay::DelayNs;
    pub use embedded_hal::digital::OutputPin;
    pub use embedded_hal::i2c::I2c;
}
