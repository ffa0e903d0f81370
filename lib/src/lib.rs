#![no_std]

#[cfg(test)]
extern crate std;

pub mod cpu;
pub mod cpu_local;
pub mod fmtbuf;
pub mod klog;
pub mod memcons;
pub mod pcr;
pub mod stacktrace;
pub mod symbols;

pub use cpu_local::{CacheAligned, CpuLocal};
pub use fmtbuf::FmtBuf;
pub use klog::{
    KlogLevel, klog_get_level, klog_init, klog_register_backend, klog_set_level,
};
pub use memcons::{ConsoleLock, MemCons};
pub use pcr::{CpuIdFn, MAX_CPUS, get_current_cpu, register_cpu_id_fn};
pub use stacktrace::{StacktraceEntry, stacktrace_capture_from};
pub use symbols::{RegisteredSymbols, SortedSymbols, SymbolLookup, SymbolRef, register_symbol_table, symbol_lookup};
