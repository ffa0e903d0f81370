//! FFI Boundary Layer
//!
//! This module contains ONLY functions that require `extern "C"` linkage
//! because they are called from the interrupt trampolines or the OPAL entry
//! code. Each one assembles the production collaborators and hands off to
//! the safe dispatcher.

use hvfw_lib::{RegisteredSymbols, SymbolLookup, klog_debug, klog_error};

use crate::config::trap_config;
use crate::exception::{
    RegisteredResolvers, StackFrame, Terminator, TrapServices, exception_entry_impl,
    pm_mce_impl, pm_sreset_impl,
};
use crate::services::{FirmwareAbort, FrameChainBacktrace, HardwareSprs, KlogSink};
use crate::vm_state::vm_state;

/// Common trap entry, called with the trampoline's register snapshot.
#[unsafe(no_mangle)]
pub extern "C" fn exception_entry(frame: *mut StackFrame) {
    // SAFETY: the trampoline passes its own frame, which stays live and
    // unaliased until this call returns.
    let Some(frame) = (unsafe { frame.as_mut() }) else {
        klog_error!("EXCEPTION: null stack frame");
        FirmwareAbort.terminate();
    };

    let cfg = trap_config();
    let registered = RegisteredSymbols;
    let symbols = cfg.symbols.then_some(&registered as &dyn SymbolLookup);

    let mut sink = KlogSink;
    let mut resolver = RegisteredResolvers;
    let mut backtrace = FrameChainBacktrace::new(&cfg, symbols);
    let mut terminator = FirmwareAbort;
    let mut svc = TrapServices {
        sink: &mut sink,
        resolver: &mut resolver,
        symbols,
        backtrace: &mut backtrace,
        terminator: &mut terminator,
    };

    let resume = exception_entry_impl(frame, vm_state(), &mut svc);
    klog_debug!("EXCEPTION: resuming ({:?})", resume);
}

/// System reset taken while the core was asleep.
#[unsafe(no_mangle)]
pub extern "C" fn exception_entry_pm_sreset() {
    let cfg = trap_config();
    let registered = RegisteredSymbols;
    let symbols = cfg.symbols.then_some(&registered as &dyn SymbolLookup);
    let mut backtrace = FrameChainBacktrace::new(&cfg, symbols);
    pm_sreset_impl(&mut KlogSink, &mut backtrace);
}

/// Machine check taken while the core was asleep.
#[unsafe(no_mangle)]
pub extern "C" fn exception_entry_pm_mce() -> ! {
    pm_mce_impl(&mut KlogSink, &HardwareSprs, &mut FirmwareAbort)
}

/// Raw OPAL_REGISTER_OPAL_EXCEPTION_HANDLER entry.
#[unsafe(no_mangle)]
pub extern "C" fn opal_register_exc_handler(
    opal_exception: u64,
    handler_address: u64,
    glue_cache_line: u64,
) -> i64 {
    crate::error::opal_return_code(crate::opal::exc_handler::opal_register_exc_handler(
        opal_exception,
        handler_address,
        glue_cache_line,
    ))
}
