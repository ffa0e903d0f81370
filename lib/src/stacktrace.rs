//! Back-chain stack walker.
//!
//! PowerPC64 ELF frames start with a back-chain word pointing at the
//! caller's frame; the doubleword at offset 16 holds the saved link
//! register. The walk trusts nothing: it stops at the first pointer that is
//! null, misaligned, not above the previous frame, or implausibly far away.

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StacktraceEntry {
    pub frame_pointer: u64,
    pub return_address: u64,
}

/// Offset of the saved LR within a frame, in doublewords.
const LR_SAVE_SLOT: usize = 2;

/// Largest accepted distance between consecutive frames.
const MAX_FRAME_GAP: u64 = 1 << 20;

fn basic_sanity_check(current_sp: u64, next_sp: u64) -> bool {
    if next_sp <= current_sp {
        return false;
    }
    if next_sp - current_sp > MAX_FRAME_GAP {
        return false;
    }
    true
}

/// Walk the back chain starting at `sp`, filling `entries` from the
/// innermost frame outwards. Returns the number of entries written.
///
/// # Safety
///
/// `sp` must be zero or point into a readable stack whose frames are either
/// well-formed or fail the checks above before an unreadable word is
/// reached.
pub unsafe fn stacktrace_capture_from(mut sp: u64, entries: &mut [StacktraceEntry]) -> usize {
    let mut count = 0;

    while sp != 0 && count < entries.len() {
        if sp & 0x7 != 0 {
            break;
        }

        // SAFETY: caller guarantees the frame at `sp` is readable.
        let (next_sp, return_address) = unsafe {
            let frame = sp as *const u64;
            (
                core::ptr::read_volatile(frame),
                core::ptr::read_volatile(frame.add(LR_SAVE_SLOT)),
            )
        };

        entries[count] = StacktraceEntry {
            frame_pointer: sp,
            return_address,
        };
        count += 1;

        // Zero terminates the chain.
        if next_sp == 0 {
            break;
        }
        if !basic_sanity_check(sp, next_sp) {
            break;
        }

        sp = next_sp;
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec;

    /// Build a fake stack of `frames` frames, each 4 doublewords, chained
    /// upwards and terminated with a zero back chain.
    fn fake_stack(frames: usize) -> std::vec::Vec<u64> {
        let mut stack = vec![0u64; frames * 4];
        let base = stack.as_ptr() as u64;
        for i in 0..frames {
            let next = if i + 1 < frames { base + ((i + 1) * 32) as u64 } else { 0 };
            stack[i * 4] = next;
            stack[i * 4 + LR_SAVE_SLOT] = 0x3000_0000 + i as u64 * 0x10;
        }
        stack
    }

    #[test]
    fn walks_until_zero_back_chain() {
        let stack = fake_stack(3);
        let mut out = [StacktraceEntry::default(); 8];
        let n = unsafe { stacktrace_capture_from(stack.as_ptr() as u64, &mut out) };
        assert_eq!(n, 3);
        assert_eq!(out[0].return_address, 0x3000_0000);
        assert_eq!(out[2].return_address, 0x3000_0020);
        assert_eq!(out[1].frame_pointer, stack.as_ptr() as u64 + 32);
    }

    #[test]
    fn stops_when_buffer_full() {
        let stack = fake_stack(5);
        let mut out = [StacktraceEntry::default(); 2];
        let n = unsafe { stacktrace_capture_from(stack.as_ptr() as u64, &mut out) };
        assert_eq!(n, 2);
    }

    #[test]
    fn stops_on_descending_chain() {
        let mut stack = fake_stack(3);
        // Second frame points back at the first.
        stack[4] = stack.as_ptr() as u64;
        let mut out = [StacktraceEntry::default(); 8];
        let n = unsafe { stacktrace_capture_from(stack.as_ptr() as u64, &mut out) };
        assert_eq!(n, 2);
    }

    #[test]
    fn stops_on_huge_gap() {
        let mut stack = fake_stack(2);
        stack[0] = stack.as_ptr() as u64 + MAX_FRAME_GAP + 8;
        let mut out = [StacktraceEntry::default(); 8];
        let n = unsafe { stacktrace_capture_from(stack.as_ptr() as u64, &mut out) };
        assert_eq!(n, 1);
    }

    #[test]
    fn null_and_misaligned_start_yield_nothing() {
        let mut out = [StacktraceEntry::default(); 4];
        assert_eq!(unsafe { stacktrace_capture_from(0, &mut out) }, 0);
        assert_eq!(unsafe { stacktrace_capture_from(0x1003, &mut out) }, 0);
    }
}
