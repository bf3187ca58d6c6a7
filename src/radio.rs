//! Radio Logic
//!
//! Channel mapping and the two polling state machines the chip requires:
//! the tune/seek completion handshake and incremental RDS assembly.

pub mod frequency;
pub mod rds;
pub mod tuning;
