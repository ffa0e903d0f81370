//! Interrupt vector offsets.
//!
//! The trampolines store the vector offset they were entered through in the
//! stack frame's `type` field; these are the values it can take.

pub const VECTOR_SYSTEM_RESET: u64 = 0x100;
pub const VECTOR_MACHINE_CHECK: u64 = 0x200;
pub const VECTOR_DATA_STORAGE: u64 = 0x300;
pub const VECTOR_DATA_SEGMENT: u64 = 0x380;
pub const VECTOR_INSTRUCTION_STORAGE: u64 = 0x400;
pub const VECTOR_INSTRUCTION_SEGMENT: u64 = 0x480;
pub const VECTOR_EXTERNAL: u64 = 0x500;
pub const VECTOR_ALIGNMENT: u64 = 0x600;
pub const VECTOR_PROGRAM: u64 = 0x700;
pub const VECTOR_FP_UNAVAILABLE: u64 = 0x800;
pub const VECTOR_DECREMENTER: u64 = 0x900;
pub const VECTOR_HV_DECREMENTER: u64 = 0x980;
pub const VECTOR_DOORBELL: u64 = 0xa00;
pub const VECTOR_SYSTEM_CALL: u64 = 0xc00;
pub const VECTOR_TRACE: u64 = 0xd00;
pub const VECTOR_HV_DATA_STORAGE: u64 = 0xe00;
pub const VECTOR_HV_INSTRUCTION_STORAGE: u64 = 0xe20;
pub const VECTOR_HV_EMULATION_ASSIST: u64 = 0xe40;
pub const VECTOR_HV_MAINTENANCE: u64 = 0xe60;
pub const VECTOR_HV_DOORBELL: u64 = 0xe80;
pub const VECTOR_HV_VIRTUALIZATION: u64 = 0xea0;
pub const VECTOR_PERF_MONITOR: u64 = 0xf00;
pub const VECTOR_HV_FACILITY_UNAVAILABLE: u64 = 0xf80;
