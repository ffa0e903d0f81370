pub mod msr;
pub mod spr;
pub mod vector;

pub use msr::{Dsisr, Msr};
pub use spr::Spr;
pub use vector::*;
