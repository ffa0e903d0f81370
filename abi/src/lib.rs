//! hvfw firmware ABI definitions
//!
//! This crate holds the constants shared between the trap trampolines, the
//! firmware proper and the OPAL call interface exposed to the host OS:
//! - POWER machine-state and fault-status register bits
//! - special-purpose register numbers
//! - interrupt vector offsets
//! - OPAL call tokens and return codes
//!
//! Nothing in here touches hardware; it is plain data.

#![no_std]
#![forbid(unsafe_code)]

pub mod arch;
pub mod opal;

pub use arch::powerpc64::{Dsisr, Msr, Spr};
pub use opal::*;
