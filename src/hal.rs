//! Hardware Abstraction Layer
//!
//! The driver never owns a concrete peripheral. It is generic over the
//! `embedded-hal` traits for the bus, pins and delays; this module adds the
//! pieces those traits do not cover.

pub mod clock;
pub mod gpio;
pub mod i2c;
