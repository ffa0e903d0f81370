//! Primitive CPU instructions: priority hints and the halt loop.

#[cfg(target_arch = "powerpc64")]
use core::arch::asm;

/// Drop SMT thread priority while spinning.
#[inline(always)]
pub fn cpu_relax() {
    #[cfg(target_arch = "powerpc64")]
    unsafe {
        asm!("or 1,1,1", options(nomem, nostack, preserves_flags));
    }
    #[cfg(not(target_arch = "powerpc64"))]
    core::hint::spin_loop();
}

/// Park this thread forever. Does not return.
#[inline(always)]
pub fn halt_loop() -> ! {
    loop {
        cpu_relax();
    }
}
