//! Storage and segment fault delegation.
//!
//! Faults on data or instruction accesses are owned by the VM subsystem: it
//! may map the page, install the segment, or decline. The dispatcher only
//! asks "was it handled" and never inspects the answer further.

use spin::Once;

pub trait FaultResolver {
    /// Data storage interrupt (0x300).
    fn data_storage(&mut self, nip: u64, dar: u64, is_store: bool) -> bool;
    /// Data segment interrupt (0x380).
    fn data_segment(&mut self, nip: u64, dar: u64) -> bool;
    /// Instruction storage interrupt (0x400).
    fn instruction_storage(&mut self, nip: u64) -> bool;
    /// Instruction segment interrupt (0x480).
    fn instruction_segment(&mut self, nip: u64) -> bool;
}

pub type DataStorageFn = fn(nip: u64, dar: u64, is_store: bool) -> bool;
pub type DataSegmentFn = fn(nip: u64, dar: u64) -> bool;
pub type InstructionFaultFn = fn(nip: u64) -> bool;

/// Resolver entry points supplied by the VM subsystem at boot. A missing
/// entry answers "not handled".
#[derive(Clone, Copy, Default)]
pub struct FaultResolverOps {
    pub data_storage: Option<DataStorageFn>,
    pub data_segment: Option<DataSegmentFn>,
    pub instruction_storage: Option<InstructionFaultFn>,
    pub instruction_segment: Option<InstructionFaultFn>,
}

static RESOLVERS: Once<FaultResolverOps> = Once::new();

/// Install the VM subsystem's resolvers. Only the first call takes effect;
/// returns whether this call installed them.
pub fn register_fault_resolvers(ops: FaultResolverOps) -> bool {
    let mut installed = false;
    RESOLVERS.call_once(|| {
        installed = true;
        ops
    });
    installed
}

/// The registered resolvers as a [`FaultResolver`].
#[derive(Clone, Copy, Default)]
pub struct RegisteredResolvers;

impl RegisteredResolvers {
    fn ops() -> FaultResolverOps {
        RESOLVERS.get().copied().unwrap_or_default()
    }
}

impl FaultResolver for RegisteredResolvers {
    fn data_storage(&mut self, nip: u64, dar: u64, is_store: bool) -> bool {
        Self::ops().data_storage.is_some_and(|f| f(nip, dar, is_store))
    }

    fn data_segment(&mut self, nip: u64, dar: u64) -> bool {
        Self::ops().data_segment.is_some_and(|f| f(nip, dar))
    }

    fn instruction_storage(&mut self, nip: u64) -> bool {
        Self::ops().instruction_storage.is_some_and(|f| f(nip))
    }

    fn instruction_segment(&mut self, nip: u64) -> bool {
        Self::ops().instruction_segment.is_some_and(|f| f(nip))
    }
}
