//! Recoverability policy.
//!
//! Turns a classified trap into exactly one outcome plus the report template
//! that describes it. Storage and segment faults are offered to the fault
//! resolver here; nothing in this module touches the snapshot.

use hvfw_abi::Dsisr;

use super::delegate::FaultResolver;
use super::frame::StackFrame;
use super::vector::{Classification, Vector};
use crate::vm_state::VmCpuState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Fatal,
    /// A resolver handled the fault; resume silently.
    DelegatedRecoverable,
    /// Machine check survived by turning translation off.
    DegradedRetry,
    InformationalResume,
}

/// Report wording for a trap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Template {
    SystemReset,
    FatalSystemReset,
    RecoverableMce,
    FatalMce,
    FatalDataStorage { is_store: bool },
    FatalDataSegment,
    FatalInstructionFetch,
    UnhandledException { vector: u64 },
}

impl Template {
    /// Severity banner precedes the summary.
    pub const fn has_banner(self) -> bool {
        matches!(
            self,
            Self::SystemReset | Self::FatalSystemReset | Self::FatalMce | Self::UnhandledException { .. }
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub outcome: Outcome,
    /// `None` only for delegated faults, which are not reported.
    pub template: Option<Template>,
}

impl Verdict {
    const fn fatal(template: Template) -> Self {
        Self {
            outcome: Outcome::Fatal,
            template: Some(template),
        }
    }

    const fn delegated() -> Self {
        Self {
            outcome: Outcome::DelegatedRecoverable,
            template: None,
        }
    }
}

/// Decide the fate of a trap.
///
/// A mode word without RI is fatal for every vector; the resolver is not
/// consulted for it, but the vector still selects the report wording.
pub fn decide<R: FaultResolver + ?Sized>(
    class: &Classification,
    frame: &StackFrame,
    vm: &VmCpuState,
    resolver: &mut R,
) -> Verdict {
    let recoverable = class.fault_msr.is_recoverable();
    let nip = class.fault_pc;

    match class.vector {
        Vector::SystemReset => {
            if recoverable {
                Verdict {
                    outcome: Outcome::InformationalResume,
                    template: Some(Template::SystemReset),
                }
            } else {
                Verdict::fatal(Template::FatalSystemReset)
            }
        }
        Vector::MachineCheck => {
            // A non-linear local mapping cannot be undone by dropping to
            // real mode.
            if recoverable && !vm.local_map_inuse() && class.fault_msr.translation_enabled() {
                Verdict {
                    outcome: Outcome::DegradedRetry,
                    template: Some(Template::RecoverableMce),
                }
            } else {
                Verdict::fatal(Template::FatalMce)
            }
        }
        Vector::DataStorage => {
            let is_store = Dsisr::from_raw(frame.dsisr).is_store();
            if recoverable && resolver.data_storage(nip, frame.dar, is_store) {
                Verdict::delegated()
            } else {
                Verdict::fatal(Template::FatalDataStorage { is_store })
            }
        }
        Vector::DataSegment => {
            if recoverable && resolver.data_segment(nip, frame.dar) {
                Verdict::delegated()
            } else {
                Verdict::fatal(Template::FatalDataSegment)
            }
        }
        Vector::InstructionStorage => {
            if recoverable && resolver.instruction_storage(nip) {
                Verdict::delegated()
            } else {
                Verdict::fatal(Template::FatalInstructionFetch)
            }
        }
        Vector::InstructionSegment => {
            if recoverable && resolver.instruction_segment(nip) {
                Verdict::delegated()
            } else {
                Verdict::fatal(Template::FatalInstructionFetch)
            }
        }
        Vector::Hypervisor(_) | Vector::Other(_) => {
            Verdict::fatal(Template::UnhandledException {
                vector: class.vector.raw(),
            })
        }
    }
}
