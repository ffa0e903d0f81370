//! Resolution executor: carry out a verdict.
//!
//! The snapshot is written here and nowhere else, and only once the verdict
//! is final. A fatal verdict leaves through the terminator before any write.

use hvfw_abi::Msr;

use super::frame::StackFrame;
use super::policy::Outcome;
use super::vector::{Classification, Context};
use crate::vm_state::VmCpuState;

pub trait Backtrace {
    /// Walk the current stack and emit it.
    fn capture_and_emit(&mut self);
}

pub trait Terminator {
    /// Stop this CPU for good.
    fn terminate(&mut self) -> !;
}

/// How a trap that did not terminate was resumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resume {
    Informational,
    DelegatedRecoverable,
    DegradedRetry,
}

/// Execute `outcome` for a trap classified as `class`.
///
/// Hypervisor-context traps return through SRR0/SRR1, so those are loaded
/// from the (possibly rewritten) hypervisor pair before resuming.
pub fn execute(
    outcome: Outcome,
    class: &Classification,
    frame: &mut StackFrame,
    vm: &VmCpuState,
    backtrace: &mut dyn Backtrace,
    terminator: &mut dyn Terminator,
) -> Resume {
    let nip = class.fault_pc;
    let mut msr = class.fault_msr;

    let resume = match outcome {
        Outcome::Fatal => terminator.terminate(),
        Outcome::DelegatedRecoverable => Resume::DelegatedRecoverable,
        Outcome::InformationalResume => {
            backtrace.capture_and_emit();
            Resume::Informational
        }
        Outcome::DegradedRetry => {
            msr.remove(Msr::TRANSLATION);
            match class.context {
                Context::Hypervisor => frame.hsrr1 = msr.bits(),
                Context::Supervisor => frame.srr1 = msr.bits(),
            }
            vm.request_rebuild();
            backtrace.capture_and_emit();
            Resume::DegradedRetry
        }
    };

    if class.context == Context::Hypervisor {
        frame.srr0 = nip;
        frame.srr1 = msr.bits();
    }

    resume
}
