//! Trap classification.
//!
//! Maps the vector tag to the context the trap was delivered in, which in
//! turn selects the register pair that holds the faulting address and mode
//! word.

use hvfw_abi::Msr;
use hvfw_abi::arch::powerpc64::vector::*;

use super::frame::StackFrame;

/// Vectors delivered through the hypervisor save/restore pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HvVector {
    External,
    HvDecrementer,
    HvDataStorage,
    HvInstructionStorage,
    HvEmulationAssist,
    HvMaintenance,
    HvDoorbell,
    HvVirtualization,
    HvFacilityUnavailable,
}

impl HvVector {
    pub const fn raw(self) -> u64 {
        match self {
            Self::External => VECTOR_EXTERNAL,
            Self::HvDecrementer => VECTOR_HV_DECREMENTER,
            Self::HvDataStorage => VECTOR_HV_DATA_STORAGE,
            Self::HvInstructionStorage => VECTOR_HV_INSTRUCTION_STORAGE,
            Self::HvEmulationAssist => VECTOR_HV_EMULATION_ASSIST,
            Self::HvMaintenance => VECTOR_HV_MAINTENANCE,
            Self::HvDoorbell => VECTOR_HV_DOORBELL,
            Self::HvVirtualization => VECTOR_HV_VIRTUALIZATION,
            Self::HvFacilityUnavailable => VECTOR_HV_FACILITY_UNAVAILABLE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vector {
    SystemReset,
    MachineCheck,
    DataStorage,
    DataSegment,
    InstructionStorage,
    InstructionSegment,
    Hypervisor(HvVector),
    /// Any vector without a dedicated rule.
    Other(u64),
}

impl Vector {
    pub const fn from_raw(raw: u64) -> Self {
        match raw {
            VECTOR_SYSTEM_RESET => Self::SystemReset,
            VECTOR_MACHINE_CHECK => Self::MachineCheck,
            VECTOR_DATA_STORAGE => Self::DataStorage,
            VECTOR_DATA_SEGMENT => Self::DataSegment,
            VECTOR_INSTRUCTION_STORAGE => Self::InstructionStorage,
            VECTOR_INSTRUCTION_SEGMENT => Self::InstructionSegment,
            VECTOR_EXTERNAL => Self::Hypervisor(HvVector::External),
            VECTOR_HV_DECREMENTER => Self::Hypervisor(HvVector::HvDecrementer),
            VECTOR_HV_DATA_STORAGE => Self::Hypervisor(HvVector::HvDataStorage),
            VECTOR_HV_INSTRUCTION_STORAGE => Self::Hypervisor(HvVector::HvInstructionStorage),
            VECTOR_HV_EMULATION_ASSIST => Self::Hypervisor(HvVector::HvEmulationAssist),
            VECTOR_HV_MAINTENANCE => Self::Hypervisor(HvVector::HvMaintenance),
            VECTOR_HV_DOORBELL => Self::Hypervisor(HvVector::HvDoorbell),
            VECTOR_HV_VIRTUALIZATION => Self::Hypervisor(HvVector::HvVirtualization),
            VECTOR_HV_FACILITY_UNAVAILABLE => Self::Hypervisor(HvVector::HvFacilityUnavailable),
            other => Self::Other(other),
        }
    }

    pub const fn raw(self) -> u64 {
        match self {
            Self::SystemReset => VECTOR_SYSTEM_RESET,
            Self::MachineCheck => VECTOR_MACHINE_CHECK,
            Self::DataStorage => VECTOR_DATA_STORAGE,
            Self::DataSegment => VECTOR_DATA_SEGMENT,
            Self::InstructionStorage => VECTOR_INSTRUCTION_STORAGE,
            Self::InstructionSegment => VECTOR_INSTRUCTION_SEGMENT,
            Self::Hypervisor(hv) => hv.raw(),
            Self::Other(raw) => raw,
        }
    }

    /// Reset and machine check count as hypervisor context here: their
    /// trampolines must save HSRR0/HSRR1, not SRR0/SRR1.
    pub const fn context(self) -> Context {
        match self {
            Self::SystemReset | Self::MachineCheck | Self::Hypervisor(_) => Context::Hypervisor,
            Self::DataStorage
            | Self::DataSegment
            | Self::InstructionStorage
            | Self::InstructionSegment
            | Self::Other(_) => Context::Supervisor,
        }
    }
}

/// Which save/restore pair captured the interrupted state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Context {
    /// HSRR0/HSRR1.
    Hypervisor,
    /// SRR0/SRR1.
    Supervisor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub vector: Vector,
    pub context: Context,
    /// Address of the interrupted instruction.
    pub fault_pc: u64,
    /// Mode word of the interrupted context.
    pub fault_msr: Msr,
}

impl Classification {
    #[inline]
    pub const fn is_hypervisor(&self) -> bool {
        matches!(self.context, Context::Hypervisor)
    }
}

pub fn classify(frame: &StackFrame) -> Classification {
    let vector = Vector::from_raw(frame.vector());
    let context = vector.context();
    let (fault_pc, msr) = match context {
        Context::Hypervisor => (frame.hsrr0, frame.hsrr1),
        Context::Supervisor => (frame.srr0, frame.srr1),
    };
    Classification {
        vector,
        context,
        fault_pc,
        fault_msr: Msr::from_raw(msr),
    }
}
