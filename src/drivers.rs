//! Peripheral Drivers
//!
//! Chip-level access to the Si4703: the register file and the device
//! facade that sequences power and exposes the radio operations.

pub mod registers;
pub mod si4703;
