//! Architecture-specific definitions.
//!
//! Only the constants live here, so the module is built on every host and
//! the dispatcher's policy can be unit tested off-target.

pub mod powerpc64;

pub use powerpc64::*;
