//! Machine State Register and DSISR bit definitions.
//!
//! POWER documents bits in big-endian order (bit 0 is the MSB); the masks
//! below are already converted to ordinary `1 << n` form.

use bitflags::bitflags;

bitflags! {
    /// Machine State Register bits.
    ///
    /// The same layout is used for the live MSR and for the saved copies in
    /// SRR1 and HSRR1, so a trap's "mode word" is parsed with this type too.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use hvfw_abi::Msr;
    ///
    /// let srr1 = Msr::from_bits_retain(frame.srr1);
    /// if !srr1.contains(Msr::RI) {
    ///     // interrupted state is not recoverable
    /// }
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Msr: u64 {
        /// 64-bit mode.
        const SF = 1 << 63;
        /// Hypervisor state.
        const HV = 1 << 60;
        /// Secure state (ultravisor).
        const S  = 1 << 22;
        /// Vector-scalar facility available.
        const VSX = 1 << 23;
        /// Vector facility available.
        const VEC = 1 << 25;
        /// External interrupt enable.
        const EE = 1 << 15;
        /// Problem (user) state.
        const PR = 1 << 14;
        /// Floating point available.
        const FP = 1 << 13;
        /// Machine check enable.
        const ME = 1 << 12;
        /// Instruction relocate (translation on for fetches).
        const IR = 1 << 5;
        /// Data relocate (translation on for loads/stores).
        const DR = 1 << 4;
        /// Performance monitor mark.
        const PMM = 1 << 2;
        /// Recoverable interrupt.
        const RI = 1 << 1;
        /// Little-endian mode.
        const LE = 1 << 0;

        /// Both translation enables.
        const TRANSLATION = Self::IR.bits() | Self::DR.bits();
    }
}

impl Msr {
    /// Interpret a raw saved mode word, keeping bits we have no name for.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self::from_bits_retain(raw)
    }

    #[inline]
    pub const fn is_recoverable(self) -> bool {
        self.contains(Self::RI)
    }

    /// True if either instruction or data translation was on.
    #[inline]
    pub const fn translation_enabled(self) -> bool {
        self.intersects(Self::TRANSLATION)
    }
}

bitflags! {
    /// Data Storage Interrupt Status Register bits (32-bit register).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Dsisr: u32 {
        /// Translation not found.
        const NOHPTE   = 0x4000_0000;
        /// Storage protection violation.
        const PROTFAULT = 0x0800_0000;
        /// The faulting access was a store.
        const ISSTORE  = 0x0200_0000;
        /// DABR / watchpoint match.
        const DABRMATCH = 0x0040_0000;
        /// No segment (SLB) entry.
        const NOSEGMENT = 0x0020_0000;
    }
}

impl Dsisr {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self::from_bits_retain(raw)
    }

    #[inline]
    pub const fn is_store(self) -> bool {
        self.contains(Self::ISSTORE)
    }
}
