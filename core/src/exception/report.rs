//! Trap reports.
//!
//! Every line is formatted into a fixed [`FmtBuf`] of `EXCEPTION_MAX_STR`
//! bytes and handed to the sink whole; anything longer is cut off. Symbol
//! resolution is best effort and simply omitted when it has no answer.

use core::fmt::Write;

use hvfw_lib::{FmtBuf, SymbolLookup};

use super::frame::StackFrame;
use super::policy::Template;
use super::vector::Classification;

pub const EXCEPTION_MAX_STR: usize = 320;

pub const BANNER: &str = "***********************************************";

type Line = FmtBuf<EXCEPTION_MAX_STR>;

/// Destination for report lines. Lines carry no trailing newline.
pub trait DiagnosticSink {
    fn emit(&mut self, line: &str);
}

/// Append ` name+0xoff` style symbol text for `addr`, if one resolves.
fn push_symbol(line: &mut Line, symbols: Option<&dyn SymbolLookup>, addr: u64) {
    if let Some(sym) = symbols.and_then(|s| s.lookup(addr)) {
        let _ = write!(line, "{}", sym);
    }
}

/// Format the one-line summary for `template`.
pub fn format_summary(
    frame: &StackFrame,
    class: &Classification,
    template: Template,
    symbols: Option<&dyn SymbolLookup>,
) -> FmtBuf<EXCEPTION_MAX_STR> {
    let nip = class.fault_pc;
    let mut line = Line::new();
    let _ = match template {
        Template::SystemReset => write!(line, "System Reset at {:016x}   ", nip),
        Template::FatalSystemReset => write!(line, "Fatal System Reset at {:016x}   ", nip),
        Template::RecoverableMce => {
            write!(line, "Recoverable MCE with VM on at {:016x}   ", nip)
        }
        Template::FatalMce => write!(line, "Fatal MCE at {:016x}   ", nip),
        Template::FatalDataStorage { is_store } => write!(
            line,
            "Fatal {} address {:016x} at {:016x}   ",
            if is_store { "store" } else { "load" },
            frame.dar,
            nip
        ),
        Template::FatalDataSegment => write!(
            line,
            "Fatal load/store address {:016x} at {:016x}   ",
            frame.dar, nip
        ),
        Template::FatalInstructionFetch => write!(line, "Fatal ifetch at {:016x}   ", nip),
        Template::UnhandledException { vector } => {
            write!(line, "Fatal Exception 0x{:x} at {:016x}  ", vector, nip)
        }
    };
    push_symbol(&mut line, symbols, nip);
    let _ = write!(line, "  MSR {:016x}", class.fault_msr.bits());
    line
}

fn emit_line(sink: &mut dyn DiagnosticSink, line: &mut Line, args: core::fmt::Arguments<'_>) {
    line.clear();
    let _ = line.write_fmt(args);
    sink.emit(line.as_str());
}

/// Emit every snapshot register, GPRs as (n, n + 16) pairs.
pub fn dump_regs(sink: &mut dyn DiagnosticSink, frame: &StackFrame) {
    let mut line = Line::new();
    let l = &mut line;

    emit_line(sink, l, format_args!("CFAR : {:016x} MSR  : {:016x}", frame.cfar, frame.msr));
    emit_line(sink, l, format_args!("SRR0 : {:016x} SRR1 : {:016x}", frame.srr0, frame.srr1));
    emit_line(sink, l, format_args!("HSRR0: {:016x} HSRR1: {:016x}", frame.hsrr0, frame.hsrr1));
    emit_line(
        sink,
        l,
        format_args!("DSISR: {:08x}         DAR  : {:016x}", frame.dsisr, frame.dar),
    );
    emit_line(sink, l, format_args!("LR   : {:016x} CTR  : {:016x}", frame.lr, frame.ctr));
    emit_line(
        sink,
        l,
        format_args!("CR   : {:08x}         XER  : {:08x}", frame.cr, frame.xer),
    );
    for i in 0..16 {
        emit_line(
            sink,
            l,
            format_args!(
                "GPR{:02}: {:016x} GPR{:02}: {:016x}",
                i,
                frame.gpr[i],
                i + 16,
                frame.gpr[i + 16]
            ),
        );
    }
}

/// Emit the full report for a trap: banner, summary, register dump and,
/// for a degraded machine check, the retry notice.
pub fn report_trap(
    sink: &mut dyn DiagnosticSink,
    symbols: Option<&dyn SymbolLookup>,
    frame: &StackFrame,
    class: &Classification,
    template: Template,
) {
    if template.has_banner() {
        sink.emit(BANNER);
    }
    let summary = format_summary(frame, class, template, symbols);
    sink.emit(summary.as_str());
    dump_regs(sink, frame);
    if template == Template::RecoverableMce {
        sink.emit("Continuing with VM off");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exception::vector::classify;
    use crate::test_fixtures::{OneSymbol, RecordingSink, frame_for};
    use hvfw_abi::Msr;

    const RI: u64 = Msr::RI.bits();

    #[test]
    fn reset_summary_with_symbol() {
        let frame = frame_for(0x100, 0x3000_0010, RI);
        let sym = OneSymbol::new(0x3000_0000, "cpu_idle_p9");
        let line = format_summary(&frame, &classify(&frame), Template::SystemReset, Some(&sym));
        assert_eq!(
            line.as_str(),
            "System Reset at 0000000030000010   cpu_idle_p9+0x10  MSR 0000000000000002"
        );
    }

    #[test]
    fn missing_symbol_is_omitted() {
        let frame = frame_for(0x400, 0x20, RI);
        let sym = OneSymbol::new(0x3000_0000, "never");
        let line = format_summary(
            &frame,
            &classify(&frame),
            Template::FatalInstructionFetch,
            Some(&sym),
        );
        assert_eq!(
            line.as_str(),
            "Fatal ifetch at 0000000000000020     MSR 0000000000000002"
        );
    }

    #[test]
    fn storage_summaries_name_direction_and_dar() {
        let mut frame = frame_for(0x300, 0x3000, RI);
        frame.dar = 0xbeef;
        let class = classify(&frame);
        let store = format_summary(&frame, &class, Template::FatalDataStorage { is_store: true }, None);
        assert!(store.as_str().starts_with("Fatal store address 000000000000beef at 0000000000003000"));
        let load = format_summary(&frame, &class, Template::FatalDataStorage { is_store: false }, None);
        assert!(load.as_str().starts_with("Fatal load address"));
        let slb = format_summary(&frame, &class, Template::FatalDataSegment, None);
        assert!(slb.as_str().starts_with("Fatal load/store address 000000000000beef"));
    }

    #[test]
    fn unhandled_summary_names_vector() {
        let frame = frame_for(0x700, 0x3000, RI);
        let line = format_summary(
            &frame,
            &classify(&frame),
            Template::UnhandledException { vector: 0x700 },
            None,
        );
        assert!(line.as_str().starts_with("Fatal Exception 0x700 at 0000000000003000"));
    }

    #[test]
    fn huge_symbol_is_truncated() {
        let frame = frame_for(0x200, 0x3000, RI);
        let name: std::string::String = core::iter::repeat('x').take(4096).collect();
        let sym = OneSymbol::new(0, &name);
        let line = format_summary(&frame, &classify(&frame), Template::FatalMce, Some(&sym));
        assert_eq!(line.len(), EXCEPTION_MAX_STR);
        assert!(line.is_truncated());
        assert!(line.as_str().starts_with("Fatal MCE at 0000000000003000   xxx"));
    }

    #[test]
    fn register_dump_layout() {
        let mut frame = frame_for(0x300, 0x3000, RI);
        frame.gpr[0] = 0x11;
        frame.gpr[16] = 0x22;
        frame.gpr[15] = 0x33;
        frame.gpr[31] = 0x44;
        frame.dsisr = 0x0200_0000;
        frame.cr = 0x2400_0042;
        let mut sink = RecordingSink::default();
        dump_regs(&mut sink, &frame);
        assert_eq!(sink.lines.len(), 22);
        assert_eq!(
            sink.lines[3],
            "DSISR: 02000000         DAR  : 0000000000000000"
        );
        assert_eq!(sink.lines[5], "CR   : 24000042         XER  : 00000000");
        assert_eq!(
            sink.lines[6],
            "GPR00: 0000000000000011 GPR16: 0000000000000022"
        );
        assert_eq!(
            sink.lines[21],
            "GPR15: 0000000000000033 GPR31: 0000000000000044"
        );
    }

    #[test]
    fn banner_only_for_severe_categories() {
        let frame = frame_for(0x300, 0x3000, RI);
        let class = classify(&frame);

        let mut sink = RecordingSink::default();
        report_trap(&mut sink, None, &frame, &class, Template::FatalDataSegment);
        assert!(sink.lines[0].starts_with("Fatal load/store"));

        let mut sink = RecordingSink::default();
        report_trap(&mut sink, None, &frame, &class, Template::UnhandledException { vector: 0x300 });
        assert_eq!(sink.lines[0], BANNER);

        let mut sink = RecordingSink::default();
        report_trap(&mut sink, None, &frame, &class, Template::RecoverableMce);
        assert!(sink.lines[0].starts_with("Recoverable MCE with VM on at"));
        assert_eq!(sink.lines.last().map(|s| s.as_str()), Some("Continuing with VM off"));
    }
}
