//! Special-purpose register numbers.
//!
//! SPRs are accessed via mfspr/mtspr with the number encoded in the
//! instruction. The newtype keeps SPR numbers from being confused with
//! register values at call sites.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Spr(pub u16);

impl Spr {
    pub const DSISR: Self = Self(18);
    pub const DAR: Self = Self(19);
    /// Save/restore register 0: supervisor-context resume address.
    pub const SRR0: Self = Self(26);
    /// Save/restore register 1: supervisor-context resume MSR.
    pub const SRR1: Self = Self(27);
}
