//! Special-purpose register reads.
//!
//! The SPR number is an immediate in `mfspr`, so each register the trap
//! paths read gets its own accessor. Off-target builds read zero so the
//! dispatcher can be exercised on a development host.

#[cfg(target_arch = "powerpc64")]
use core::arch::asm;

#[cfg(target_arch = "powerpc64")]
use hvfw_abi::Spr;

macro_rules! spr_reader {
    ($(#[$meta:meta])* $name:ident, $spr:expr) => {
        $(#[$meta])*
        #[inline(always)]
        pub fn $name() -> u64 {
            #[cfg(target_arch = "powerpc64")]
            {
                let value: u64;
                unsafe {
                    asm!(
                        "mfspr {0}, {1}",
                        out(reg) value,
                        const $spr.0,
                        options(nomem, nostack, preserves_flags)
                    );
                }
                value
            }
            #[cfg(not(target_arch = "powerpc64"))]
            {
                0
            }
        }
    };
}

spr_reader!(read_srr0, Spr::SRR0);
spr_reader!(read_srr1, Spr::SRR1);
spr_reader!(read_dar, Spr::DAR);
spr_reader!(
    /// DSISR is architecturally 32 bits; the upper half reads as zero.
    read_dsisr,
    Spr::DSISR
);
