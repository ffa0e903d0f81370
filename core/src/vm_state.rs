//! Per-CPU virtual memory state shared with the VM subsystem.
//!
//! The VM code owns both flags. The trap dispatcher only reads
//! `local_map_inuse` and clears `vm_setup` to ask for the translation setup
//! to be rebuilt after a machine check was survived with translation off.

use core::sync::atomic::{AtomicBool, Ordering};

use hvfw_lib::cpu_local;

pub struct VmCpuState {
    /// A temporary non-linear mapping is installed on this CPU.
    pub local_map_inuse: AtomicBool,
    /// Translation structures are valid for this CPU.
    pub vm_setup: AtomicBool,
}

impl VmCpuState {
    pub const fn new() -> Self {
        Self {
            local_map_inuse: AtomicBool::new(false),
            vm_setup: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn local_map_inuse(&self) -> bool {
        self.local_map_inuse.load(Ordering::Acquire)
    }

    #[inline]
    pub fn vm_setup(&self) -> bool {
        self.vm_setup.load(Ordering::Acquire)
    }

    /// Mark this CPU's translation setup stale. Release ordering publishes
    /// the request before the trap returns to hardware.
    #[inline]
    pub fn request_rebuild(&self) {
        self.vm_setup.store(false, Ordering::Release);
    }
}

impl Default for VmCpuState {
    fn default() -> Self {
        Self::new()
    }
}

cpu_local! {
    pub static VM_STATE: VmCpuState = VmCpuState::new();
}

/// The executing CPU's VM state.
#[inline]
pub fn vm_state() -> &'static VmCpuState {
    VM_STATE.get()
}
