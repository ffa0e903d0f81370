//! Production collaborators for the trap dispatcher.

use hvfw_lib::cpu::{halt_loop, read_dar, read_dsisr, read_sp, read_srr0, read_srr1};
use hvfw_lib::{
    StacktraceEntry, SymbolLookup, get_current_cpu, klog_error, stacktrace_capture_from,
};

use crate::config::{MAX_BACKTRACE_DEPTH, TrapConfig};
use crate::exception::{Backtrace, DiagnosticSink, HwFaultRegisters, Terminator};

/// Report lines go to the firmware log at error level.
#[derive(Clone, Copy, Default)]
pub struct KlogSink;

impl DiagnosticSink for KlogSink {
    fn emit(&mut self, line: &str) {
        klog_error!("{}", line);
    }
}

/// Stop the CPU after a fatal trap.
#[derive(Clone, Copy, Default)]
pub struct FirmwareAbort;

impl Terminator for FirmwareAbort {
    fn terminate(&mut self) -> ! {
        klog_error!("Aborting!");
        halt_loop()
    }
}

/// Back-chain walk of the current stack, logged one frame per line.
pub struct FrameChainBacktrace<'a> {
    enabled: bool,
    depth: usize,
    symbols: Option<&'a dyn SymbolLookup>,
}

impl<'a> FrameChainBacktrace<'a> {
    pub fn new(cfg: &TrapConfig, symbols: Option<&'a dyn SymbolLookup>) -> Self {
        Self {
            enabled: cfg.backtrace,
            depth: cfg.backtrace_depth.clamp(1, MAX_BACKTRACE_DEPTH),
            symbols,
        }
    }

    /// Log already captured frames.
    pub fn emit_entries(&self, entries: &[StacktraceEntry]) {
        klog_error!("CPU {:04x} Backtrace:", get_current_cpu());
        if entries.is_empty() {
            klog_error!("No stack frames found");
            return;
        }
        for entry in entries {
            match self.symbols.and_then(|s| s.lookup(entry.return_address)) {
                Some(sym) => klog_error!(
                    " S: {:016x} R: {:016x}   {}",
                    entry.frame_pointer,
                    entry.return_address,
                    sym
                ),
                None => klog_error!(
                    " S: {:016x} R: {:016x}",
                    entry.frame_pointer,
                    entry.return_address
                ),
            }
        }
    }
}

impl Backtrace for FrameChainBacktrace<'_> {
    fn capture_and_emit(&mut self) {
        if !self.enabled {
            return;
        }
        let mut entries = [StacktraceEntry::default(); MAX_BACKTRACE_DEPTH];
        // SAFETY: r1 of the running code is the head of a live back chain.
        let count = unsafe { stacktrace_capture_from(read_sp(), &mut entries[..self.depth]) };
        self.emit_entries(&entries[..count]);
    }
}

/// Fault registers read straight from the SPRs.
#[derive(Clone, Copy, Default)]
pub struct HardwareSprs;

impl HwFaultRegisters for HardwareSprs {
    fn srr0(&self) -> u64 {
        read_srr0()
    }

    fn srr1(&self) -> u64 {
        read_srr1()
    }

    fn dsisr(&self) -> u32 {
        read_dsisr() as u32
    }

    fn dar(&self) -> u64 {
        read_dar()
    }
}
