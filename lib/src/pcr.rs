//! Processor identification for per-CPU data.
//!
//! The firmware indexes per-CPU state by a dense CPU index. How that index is
//! derived (PIR lookup, device tree order) belongs to the CPU bring-up code,
//! which registers a reader here once. Until then every caller is CPU 0, which
//! is correct for the boot thread.

use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

/// Maximum number of CPUs supported.
pub const MAX_CPUS: usize = 256;

/// Returns the dense index of the executing CPU.
pub type CpuIdFn = fn() -> usize;

static CPU_ID_FN: AtomicPtr<()> = AtomicPtr::new(ptr::null_mut());

/// Register the CPU index reader from the CPU bring-up code.
pub fn register_cpu_id_fn(f: CpuIdFn) {
    CPU_ID_FN.store(f as *mut (), Ordering::Release);
}

/// Index of the executing CPU, always `< MAX_CPUS`.
///
/// An out-of-range answer from the registered reader is folded to 0 rather
/// than allowed to index past the per-CPU arrays.
#[inline]
pub fn get_current_cpu() -> usize {
    let fn_ptr = CPU_ID_FN.load(Ordering::Acquire);
    if fn_ptr.is_null() {
        return 0;
    }
    // SAFETY: `register_cpu_id_fn` only stores valid `CpuIdFn` pointers.
    let f: CpuIdFn = unsafe { core::mem::transmute(fn_ptr) };
    let id = f();
    if id < MAX_CPUS { id } else { 0 }
}
