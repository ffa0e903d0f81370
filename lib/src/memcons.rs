//! In-memory console.
//!
//! A fixed-capacity byte ring that keeps the most recent firmware output. The
//! host OS reads it after a crash, so it is written from every context that
//! can log, including fatal trap paths before any console driver exists. When
//! full, the oldest bytes are overwritten.

use core::sync::atomic::{AtomicUsize, Ordering};

use spin::Mutex;

use crate::pcr::get_current_cpu;

/// Capacity of the global console ring.
pub const MEMCONS_SIZE: usize = 16 * 1024;

pub struct MemCons<const N: usize> {
    data: [u8; N],
    head: usize,
    count: usize,
}

impl<const N: usize> MemCons<N> {
    pub const fn new() -> Self {
        Self {
            data: [0; N],
            head: 0,
            count: 0,
        }
    }

    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.count
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn reset(&mut self) {
        self.head = 0;
        self.count = 0;
    }

    /// Append one byte, dropping the oldest when full.
    #[inline(always)]
    pub fn push_overwrite(&mut self, byte: u8) {
        if N == 0 {
            return;
        }
        self.data[self.head] = byte;
        self.head = (self.head + 1) % N;
        if self.count < N {
            self.count += 1;
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.push_overwrite(b);
        }
    }

    /// Copy the retained bytes, oldest first, into `out`. Returns the number
    /// of bytes copied; if `out` is short, the newest bytes are kept.
    pub fn copy_out(&self, out: &mut [u8]) -> usize {
        let take = self.count.min(out.len());
        let skip = self.count - take;
        let tail = (self.head + N - self.count) % N.max(1);
        for (i, slot) in out.iter_mut().take(take).enumerate() {
            *slot = self.data[(tail + skip + i) % N];
        }
        take
    }
}

impl<const N: usize> Default for MemCons<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Write for MemCons<N> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.write_bytes(s.as_bytes());
        Ok(())
    }
}

const NO_OWNER: usize = usize::MAX;

/// Attempts before a non-blocking write gives up on another CPU's hold.
const LOCK_SPINS: usize = 1 << 16;

/// A console ring shared between CPUs.
///
/// The lock records which CPU holds it. A trap taken while its own CPU holds
/// the lock cannot wait for it to be released, so [`ConsoleLock::try_with`]
/// drops the write instead and counts it.
pub struct ConsoleLock<const N: usize> {
    con: Mutex<MemCons<N>>,
    owner: AtomicUsize,
    dropped: AtomicUsize,
}

impl<const N: usize> ConsoleLock<N> {
    pub const fn new() -> Self {
        Self {
            con: Mutex::new(MemCons::new()),
            owner: AtomicUsize::new(NO_OWNER),
            dropped: AtomicUsize::new(0),
        }
    }

    /// Run `f` with the ring locked on behalf of `cpu`, waiting as long as
    /// it takes.
    pub fn with<R>(&self, cpu: usize, f: impl FnOnce(&mut MemCons<N>) -> R) -> R {
        let mut guard = self.con.lock();
        self.owner.store(cpu, Ordering::Relaxed);
        let result = f(&mut guard);
        self.owner.store(NO_OWNER, Ordering::Relaxed);
        result
    }

    /// Run `f` with the ring locked on behalf of `cpu` without waiting on
    /// `cpu` itself. Returns `None`, and counts a dropped write, if `cpu`
    /// already holds the lock or another CPU keeps it for too long.
    pub fn try_with<R>(&self, cpu: usize, f: impl FnOnce(&mut MemCons<N>) -> R) -> Option<R> {
        for _ in 0..LOCK_SPINS {
            if let Some(mut guard) = self.con.try_lock() {
                self.owner.store(cpu, Ordering::Relaxed);
                let result = f(&mut guard);
                self.owner.store(NO_OWNER, Ordering::Relaxed);
                return Some(result);
            }
            if self.owner.load(Ordering::Relaxed) == cpu {
                break;
            }
            core::hint::spin_loop();
        }
        self.dropped.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Writes given up by [`ConsoleLock::try_with`].
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<const N: usize> Default for ConsoleLock<N> {
    fn default() -> Self {
        Self::new()
    }
}

static MEMCONS: ConsoleLock<MEMCONS_SIZE> = ConsoleLock::new();

/// Run `f` with the global console locked.
pub fn with_memcons<R>(f: impl FnOnce(&mut MemCons<MEMCONS_SIZE>) -> R) -> R {
    MEMCONS.with(get_current_cpu(), f)
}

/// Like [`with_memcons`], but never waits on the calling CPU itself.
pub fn try_with_memcons<R>(f: impl FnOnce(&mut MemCons<MEMCONS_SIZE>) -> R) -> Option<R> {
    MEMCONS.try_with(get_current_cpu(), f)
}

/// Lines the global console has dropped.
pub fn memcons_dropped() -> usize {
    MEMCONS.dropped()
}
