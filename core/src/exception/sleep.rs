//! Traps taken while a core was in a power-saving state.
//!
//! Wakeup from deep sleep loses the full register snapshot, so these paths
//! report only what can still be read straight from the SPRs.

use core::fmt::Write;

use hvfw_lib::FmtBuf;

use super::report::{BANNER, DiagnosticSink, EXCEPTION_MAX_STR};
use super::resolve::{Backtrace, Terminator};

/// Live fault registers, read at the time of the call.
pub trait HwFaultRegisters {
    fn srr0(&self) -> u64;
    fn srr1(&self) -> u64;
    fn dsisr(&self) -> u32;
    fn dar(&self) -> u64;
}

/// System reset during sleep: report and return to the wakeup path.
pub fn pm_sreset_impl(sink: &mut dyn DiagnosticSink, backtrace: &mut dyn Backtrace) {
    sink.emit(BANNER);
    sink.emit("System Reset in sleep");
    backtrace.capture_and_emit();
}

/// Machine check during sleep: always fatal.
pub fn pm_mce_impl(
    sink: &mut dyn DiagnosticSink,
    regs: &dyn HwFaultRegisters,
    terminator: &mut dyn Terminator,
) -> ! {
    sink.emit(BANNER);
    sink.emit("Fatal MCE in sleep");

    let mut line = FmtBuf::<EXCEPTION_MAX_STR>::new();
    let _ = write!(line, "SRR0 : {:016x} SRR1 : {:016x}", regs.srr0(), regs.srr1());
    sink.emit(line.as_str());

    line.clear();
    let _ = write!(
        line,
        "DSISR: {:08x}         DAR  : {:016x}",
        regs.dsisr(),
        regs.dar()
    );
    sink.emit(line.as_str());

    terminator.terminate()
}
