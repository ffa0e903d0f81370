//! Stack pointer register read.

#[cfg(target_arch = "powerpc64")]
use core::arch::asm;

/// Read the current r1 (stack pointer). The word it points at is the back
/// chain to the caller's frame.
#[inline(always)]
pub fn read_sp() -> u64 {
    #[cfg(target_arch = "powerpc64")]
    {
        let sp: u64;
        unsafe {
            asm!("mr {}, 1", out(reg) sp, options(nomem, nostack, preserves_flags));
        }
        sp
    }
    #[cfg(not(target_arch = "powerpc64"))]
    {
        0
    }
}
