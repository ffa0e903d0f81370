//! Recording collaborators for host tests.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::string::{String, ToString};
use std::vec::Vec;

use hvfw_lib::{SymbolLookup, SymbolRef};

use crate::exception::{
    Backtrace, Context, DiagnosticSink, FaultResolver, HwFaultRegisters, Resume, StackFrame,
    Terminator, TrapServices, Vector, exception_entry_impl,
};
use crate::vm_state::VmCpuState;

/// Panic payload used by [`PanicTerminator`].
pub const TERMINATED: &str = "hvfw-test: terminated";

/// Values planted in the register pair a trap does not use, so a test sees
/// any write or read of the wrong pair.
pub const OTHER_PAIR_PC: u64 = 0xdead_beef_0000;
pub const OTHER_PAIR_MSR: u64 = 0x0000_0000_0000_1000;

#[derive(Default)]
pub struct RecordingSink {
    pub lines: Vec<String>,
}

impl DiagnosticSink for RecordingSink {
    fn emit(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolverCall {
    DataStorage { nip: u64, dar: u64, is_store: bool },
    DataSegment { nip: u64, dar: u64 },
    InstructionStorage { nip: u64 },
    InstructionSegment { nip: u64 },
}

/// Gives the same answer to every fault and records what it was asked.
pub struct ScriptedResolver {
    pub answer: bool,
    pub calls: Vec<ResolverCall>,
}

impl ScriptedResolver {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            calls: Vec::new(),
        }
    }
}

impl FaultResolver for ScriptedResolver {
    fn data_storage(&mut self, nip: u64, dar: u64, is_store: bool) -> bool {
        self.calls.push(ResolverCall::DataStorage { nip, dar, is_store });
        self.answer
    }

    fn data_segment(&mut self, nip: u64, dar: u64) -> bool {
        self.calls.push(ResolverCall::DataSegment { nip, dar });
        self.answer
    }

    fn instruction_storage(&mut self, nip: u64) -> bool {
        self.calls.push(ResolverCall::InstructionStorage { nip });
        self.answer
    }

    fn instruction_segment(&mut self, nip: u64) -> bool {
        self.calls.push(ResolverCall::InstructionSegment { nip });
        self.answer
    }
}

#[derive(Default)]
pub struct CountingBacktrace {
    pub count: usize,
}

impl Backtrace for CountingBacktrace {
    fn capture_and_emit(&mut self) {
        self.count += 1;
    }
}

pub struct PanicTerminator;

impl Terminator for PanicTerminator {
    fn terminate(&mut self) -> ! {
        std::panic::panic_any(TERMINATED)
    }
}

/// Assert that `result` is the unwind raised by [`PanicTerminator`].
pub fn expect_terminated<T: core::fmt::Debug>(result: std::thread::Result<T>) {
    match result {
        Ok(value) => panic!("expected termination, resumed with {:?}", value),
        Err(payload) => assert_eq!(payload.downcast_ref::<&str>(), Some(&TERMINATED)),
    }
}

pub struct FixedRegisters {
    pub srr0: u64,
    pub srr1: u64,
    pub dsisr: u32,
    pub dar: u64,
}

impl HwFaultRegisters for FixedRegisters {
    fn srr0(&self) -> u64 {
        self.srr0
    }

    fn srr1(&self) -> u64 {
        self.srr1
    }

    fn dsisr(&self) -> u32 {
        self.dsisr
    }

    fn dar(&self) -> u64 {
        self.dar
    }
}

/// A symbol table holding a single symbol that covers everything above
/// `base`.
pub struct OneSymbol {
    base: u64,
    name: String,
}

impl OneSymbol {
    pub fn new(base: u64, name: &str) -> Self {
        Self {
            base,
            name: name.to_string(),
        }
    }
}

impl SymbolLookup for OneSymbol {
    fn lookup(&self, addr: u64) -> Option<SymbolRef<'_>> {
        (addr >= self.base).then(|| SymbolRef {
            name: &self.name,
            offset: addr - self.base,
        })
    }
}

/// A frame for `vector` whose effective register pair holds `pc`/`msr`.
pub fn frame_for(vector: u64, pc: u64, msr: u64) -> StackFrame {
    let mut frame = StackFrame::zeroed();
    frame.r#type = vector;
    frame.msr = 0x9000_0000_0000_1003;
    match Vector::from_raw(vector).context() {
        Context::Hypervisor => {
            frame.hsrr0 = pc;
            frame.hsrr1 = msr;
            frame.srr0 = OTHER_PAIR_PC;
            frame.srr1 = OTHER_PAIR_MSR;
        }
        Context::Supervisor => {
            frame.srr0 = pc;
            frame.srr1 = msr;
            frame.hsrr0 = OTHER_PAIR_PC;
            frame.hsrr1 = OTHER_PAIR_MSR;
        }
    }
    frame
}

/// What one trap did to its collaborators.
pub struct TrapRun {
    /// `None` if the trap terminated.
    pub resume: Option<Resume>,
    pub lines: Vec<String>,
    pub backtraces: usize,
    pub resolver_calls: usize,
}

impl TrapRun {
    pub fn terminated(&self) -> bool {
        self.resume.is_none()
    }
}

/// Run a trap through the dispatcher with recording collaborators. The
/// resolver answers `handled` to every fault.
pub fn run_trap(
    frame: &mut StackFrame,
    vm: &VmCpuState,
    handled: bool,
    symbols: Option<&dyn SymbolLookup>,
) -> TrapRun {
    let mut sink = RecordingSink::default();
    let mut resolver = ScriptedResolver::answering(handled);
    let mut backtrace = CountingBacktrace::default();
    let mut terminator = PanicTerminator;

    let result = catch_unwind(AssertUnwindSafe(|| {
        let mut svc = TrapServices {
            sink: &mut sink,
            resolver: &mut resolver,
            symbols,
            backtrace: &mut backtrace,
            terminator: &mut terminator,
        };
        exception_entry_impl(frame, vm, &mut svc)
    }));

    let resume = match result {
        Ok(resume) => Some(resume),
        Err(payload) => {
            assert_eq!(payload.downcast_ref::<&str>(), Some(&TERMINATED));
            None
        }
    };

    TrapRun {
        resume,
        lines: sink.lines,
        backtraces: backtrace.count,
        resolver_calls: resolver.calls.len(),
    }
}
