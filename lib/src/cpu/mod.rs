pub mod core;
pub mod spr;
pub mod stack;

pub use self::core::*;
pub use spr::*;
pub use stack::*;
