//! Trap dispatcher.
//!
//! The trampolines save the interrupted state into a [`StackFrame`] and call
//! in here. Each trap is classified, judged, reported if it is worth
//! reporting, and then either resumed (possibly with a rewritten return
//! state) or terminated.

pub mod delegate;
pub mod frame;
pub mod policy;
pub mod report;
pub mod resolve;
pub mod sleep;
pub mod vector;

use hvfw_lib::{SymbolLookup, klog_debug};

pub use delegate::{FaultResolver, FaultResolverOps, RegisteredResolvers, register_fault_resolvers};
pub use frame::StackFrame;
pub use policy::{Outcome, Template, Verdict};
pub use report::{DiagnosticSink, EXCEPTION_MAX_STR};
pub use resolve::{Backtrace, Resume, Terminator};
pub use sleep::{HwFaultRegisters, pm_mce_impl, pm_sreset_impl};
pub use vector::{Classification, Context, HvVector, Vector, classify};

use crate::vm_state::VmCpuState;

/// Collaborators a trap may call out to.
pub struct TrapServices<'a> {
    pub sink: &'a mut dyn DiagnosticSink,
    pub resolver: &'a mut dyn FaultResolver,
    /// `None` leaves symbols out of reports.
    pub symbols: Option<&'a dyn SymbolLookup>,
    pub backtrace: &'a mut dyn Backtrace,
    pub terminator: &'a mut dyn Terminator,
}

/// Handle one trap. Returns only if the trap is resumed; the frame then
/// holds the state the trampoline returns to.
pub fn exception_entry_impl(
    frame: &mut StackFrame,
    vm: &VmCpuState,
    svc: &mut TrapServices<'_>,
) -> Resume {
    let class = classify(frame);
    klog_debug!(
        "EXCEPTION: vec={:#x} {:?} nip={:#x} msr={:#x}",
        frame.vector(),
        class.context,
        class.fault_pc,
        class.fault_msr.bits()
    );

    let verdict = policy::decide(&class, frame, vm, &mut *svc.resolver);
    klog_debug!("EXCEPTION: verdict {:?}", verdict.outcome);

    if let Some(template) = verdict.template {
        report::report_trap(&mut *svc.sink, svc.symbols, frame, &class, template);
    }

    resolve::execute(
        verdict.outcome,
        &class,
        frame,
        vm,
        &mut *svc.backtrace,
        &mut *svc.terminator,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{OneSymbol, TrapRun, frame_for, run_trap};
    use core::sync::atomic::Ordering;
    use hvfw_abi::{Dsisr, Msr};

    const RI: u64 = Msr::RI.bits();
    const SF_HV: u64 = Msr::SF.bits() | Msr::HV.bits();

    fn run(frame: &mut StackFrame, vm: &VmCpuState, handled: bool) -> TrapRun {
        run_trap(frame, vm, handled, None)
    }

    #[test]
    fn reset_reports_and_resumes() {
        let mut frame = frame_for(0x100, 0x3000_0040, SF_HV | RI);
        let vm = VmCpuState::new();
        let run = run(&mut frame, &vm, false);
        assert_eq!(run.resume, Some(Resume::Informational));
        assert_eq!(run.lines[0], report::BANNER);
        assert!(run.lines[1].starts_with("System Reset at 0000000030000040"));
        assert_eq!(run.backtraces, 1);
        assert_eq!(frame.srr0, 0x3000_0040);
        assert_eq!(frame.srr1, SF_HV | RI);
    }

    #[test]
    fn reset_without_ri_is_fatal() {
        let mut frame = frame_for(0x100, 0x3000_0040, SF_HV);
        let before = frame;
        let vm = VmCpuState::new();
        let run = run(&mut frame, &vm, false);
        assert!(run.terminated());
        assert!(run.lines[1].starts_with("Fatal System Reset at"));
        assert_eq!(run.backtraces, 0);
        assert_eq!(frame, before);
    }

    #[test]
    fn handled_fault_is_silent() {
        for vector in [0x300, 0x380, 0x400, 0x480] {
            let mut frame = frame_for(vector, 0x3000, RI);
            let before = frame;
            let vm = VmCpuState::new();
            let run = run(&mut frame, &vm, true);
            assert_eq!(run.resume, Some(Resume::DelegatedRecoverable));
            assert!(run.lines.is_empty(), "vector {:#x}: {:?}", vector, run.lines);
            assert_eq!(run.backtraces, 0);
            assert_eq!(frame, before);
        }
    }

    #[test]
    fn unhandled_store_fault_terminates() {
        let mut frame = frame_for(0x300, 0x3000_0100, RI);
        frame.dar = 0x1234_5678;
        frame.dsisr = Dsisr::ISSTORE.bits();
        let vm = VmCpuState::new();
        let run = run(&mut frame, &vm, false);
        assert!(run.terminated());
        assert_eq!(run.resolver_calls, 1);
        assert!(
            run.lines[0]
                .starts_with("Fatal store address 0000000012345678 at 0000000030000100")
        );
        assert!(run.lines.iter().any(|l| l.starts_with("SRR0 : 0000000030000100")));
    }

    #[test]
    fn unknown_vector_terminates_even_with_ri() {
        for msr in [RI, 0] {
            let mut frame = frame_for(0x700, 0x3000, msr);
            let vm = VmCpuState::new();
            let run = run(&mut frame, &vm, true);
            assert!(run.terminated());
            assert_eq!(run.lines[0], report::BANNER);
            assert!(run.lines[1].starts_with("Fatal Exception 0x700 at 0000000000003000"));
            assert_eq!(run.resolver_calls, 0);
        }
    }

    #[test]
    fn hypervisor_vectors_are_fatal() {
        let mut frame = frame_for(0xe40, 0x3000, SF_HV | RI);
        let vm = VmCpuState::new();
        let run = run(&mut frame, &vm, true);
        assert!(run.terminated());
        assert!(run.lines[1].starts_with("Fatal Exception 0xe40 at"));
    }

    #[test]
    fn mce_with_translation_degrades_once() {
        let msr = SF_HV | RI | Msr::IR.bits() | Msr::DR.bits();
        let mut frame = frame_for(0x200, 0x3000_0200, msr);
        let vm = VmCpuState::new();
        vm.vm_setup.store(true, Ordering::Relaxed);
        let run = run(&mut frame, &vm, false);

        assert_eq!(run.resume, Some(Resume::DegradedRetry));
        let recoverable = run
            .lines
            .iter()
            .filter(|l| l.starts_with("Recoverable MCE with VM on at 0000000030000200"))
            .count();
        assert_eq!(recoverable, 1);
        assert_eq!(run.lines.last().map(|s| s.as_str()), Some("Continuing with VM off"));
        // The report shows the mode word as it was taken.
        assert!(run.lines[0].ends_with(&std::format!("MSR {:016x}", msr)));

        assert_eq!(frame.srr0, 0x3000_0200);
        assert_eq!(frame.srr1, SF_HV | RI);
        assert_eq!(frame.hsrr1, SF_HV | RI);
        assert!(!vm.vm_setup());
        assert_eq!(run.backtraces, 1);
    }

    #[test]
    fn mce_with_local_map_is_fatal_even_in_real_mode() {
        let vm = VmCpuState::new();
        vm.local_map_inuse.store(true, Ordering::Relaxed);
        vm.vm_setup.store(true, Ordering::Relaxed);
        let mut frame = frame_for(0x200, 0x3000, SF_HV | RI);
        let run = run(&mut frame, &vm, false);
        assert!(run.terminated());
        assert!(run.lines[1].starts_with("Fatal MCE at"));
        assert!(vm.vm_setup());
    }

    #[test]
    fn report_uses_symbols_when_given() {
        let mut frame = frame_for(0x400, 0x3000_0024, RI);
        let vm = VmCpuState::new();
        let sym = OneSymbol::new(0x3000_0000, "load_kernel");
        let run = run_trap(&mut frame, &vm, false, Some(&sym));
        assert!(run.terminated());
        assert!(run.lines[0].contains("   load_kernel+0x24  MSR "));
    }

    #[test]
    fn every_line_fits_the_buffer() {
        let mut frame = frame_for(0x480, 0x10, RI);
        let vm = VmCpuState::new();
        let name: std::string::String = core::iter::repeat('s').take(10_000).collect();
        let sym = OneSymbol::new(0, &name);
        let run = run_trap(&mut frame, &vm, false, Some(&sym));
        assert!(run.terminated());
        assert!(run.lines.iter().all(|l| l.len() <= EXCEPTION_MAX_STR));
        assert_eq!(run.lines[0].len(), EXCEPTION_MAX_STR);
    }
}
