//! Register snapshot built by the interrupt trampolines.
//!
//! # Assembly Offsets (CRITICAL)
//!
//! The trampolines store registers at fixed offsets from r1. The layout below
//! starts with the ELF ABI frame header so the snapshot is also a valid stack
//! frame for the back-chain walker. DO NOT reorder fields without updating
//! the trampolines; the offsets are asserted at compile time.

/// Size of the parameter save area in the ABI frame header, in doublewords.
const PARAM_SAVE_DWORDS: usize = 8;

#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackFrame {
    // ==================== ABI FRAME HEADER ====================
    pub backchain: u64,
    pub crsave: u64,
    pub lrsave: u64,
    pub compiler_dw: u64,
    pub linker_dw: u64,
    pub tocsave: u64,
    pub paramsave: [u64; PARAM_SAVE_DWORDS],
    /// Scratch used by the trampolines.
    pub locals: [u64; 1],

    // ==================== TRAP STATE ====================
    /// Vector offset the trap was taken through (0x100, 0x200, ...).
    pub r#type: u64, // offset 120
    pub gpr: [u64; 32], // offset 128
    pub cr: u32,        // offset 384
    pub xer: u32,       // offset 388
    pub dsisr: u32,     // offset 392
    pub ctr: u64,       // offset 400
    pub lr: u64,        // offset 408
    pub pc: u64,        // offset 416
    /// Firmware MSR at the time the trampoline ran.
    pub msr: u64, // offset 424
    pub cfar: u64,      // offset 432
    pub srr0: u64,      // offset 440
    pub srr1: u64,      // offset 448
    pub hsrr0: u64,     // offset 456
    pub hsrr1: u64,     // offset 464
    pub dar: u64,       // offset 472
}

pub const STACK_FRAME_SIZE: usize = 480;

const _: () = {
    use core::mem::{align_of, offset_of, size_of};
    assert!(offset_of!(StackFrame, r#type) == 120);
    assert!(offset_of!(StackFrame, gpr) == 128);
    assert!(offset_of!(StackFrame, cr) == 384);
    assert!(offset_of!(StackFrame, xer) == 388);
    assert!(offset_of!(StackFrame, dsisr) == 392);
    assert!(offset_of!(StackFrame, ctr) == 400);
    assert!(offset_of!(StackFrame, msr) == 424);
    assert!(offset_of!(StackFrame, srr0) == 440);
    assert!(offset_of!(StackFrame, hsrr0) == 456);
    assert!(offset_of!(StackFrame, dar) == 472);
    assert!(size_of::<StackFrame>() == STACK_FRAME_SIZE);
    assert!(align_of::<StackFrame>() == 16);
};

impl StackFrame {
    pub const fn zeroed() -> Self {
        Self {
            backchain: 0,
            crsave: 0,
            lrsave: 0,
            compiler_dw: 0,
            linker_dw: 0,
            tocsave: 0,
            paramsave: [0; PARAM_SAVE_DWORDS],
            locals: [0; 1],
            r#type: 0,
            gpr: [0; 32],
            cr: 0,
            xer: 0,
            dsisr: 0,
            ctr: 0,
            lr: 0,
            pc: 0,
            msr: 0,
            cfar: 0,
            srr0: 0,
            srr1: 0,
            hsrr0: 0,
            hsrr1: 0,
            dar: 0,
        }
    }

    #[inline]
    pub const fn vector(&self) -> u64 {
        self.r#type
    }
}

impl Default for StackFrame {
    fn default() -> Self {
        Self::zeroed()
    }
}
