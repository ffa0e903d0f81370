//! Per-CPU data.
//!
//! `CpuLocal<T>` stores one cache-line aligned `T` per CPU. Firmware threads
//! are never migrated, so the executing CPU's slot is stable for the whole
//! trap and no pinning guard is required; access is shared (`&T`), so any
//! state a CPU mutates through it must be interior-mutable (atomics).
//!
//! # Example
//!
//! ```ignore
//! cpu_local! {
//!     static TRAP_COUNT: AtomicU64 = AtomicU64::new(0);
//! }
//!
//! fn count_trap() {
//!     TRAP_COUNT.get().fetch_add(1, Ordering::Relaxed);
//! }
//! ```

use crate::pcr::{MAX_CPUS, get_current_cpu};

#[repr(C, align(64))]
pub struct CacheAligned<T>(pub T);

impl<T: Copy> Copy for CacheAligned<T> {}
impl<T: Clone> Clone for CacheAligned<T> {
    fn clone(&self) -> Self {
        CacheAligned(self.0.clone())
    }
}

pub struct CpuLocal<T> {
    data: [CacheAligned<T>; MAX_CPUS],
}

impl<T> CpuLocal<T> {
    pub const fn new_with(init: [CacheAligned<T>; MAX_CPUS]) -> Self {
        Self { data: init }
    }

    /// The executing CPU's slot.
    #[inline]
    pub fn get(&self) -> &T {
        self.get_for_cpu(get_current_cpu())
    }

    /// Another CPU's slot; out-of-range indices map to CPU 0.
    #[inline]
    pub fn get_for_cpu(&self, cpu_id: usize) -> &T {
        match self.data.get(cpu_id) {
            Some(slot) => &slot.0,
            None => &self.data[0].0,
        }
    }
}

#[macro_export]
macro_rules! cpu_local {
    ($vis:vis static $NAME:ident: $ty:ty = $init:expr;) => {
        $vis static $NAME: $crate::cpu_local::CpuLocal<$ty> = {
            #[allow(clippy::declare_interior_mutable_const)]
            const INIT: $crate::cpu_local::CacheAligned<$ty> =
                $crate::cpu_local::CacheAligned($init);
            $crate::cpu_local::CpuLocal::new_with([INIT; $crate::pcr::MAX_CPUS])
        };
    };
}
