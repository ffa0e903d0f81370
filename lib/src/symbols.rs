//! Firmware symbol table.
//!
//! The build embeds a table of `(address, name)` pairs sorted by address.
//! Lookups answer with the nearest symbol at or below an address plus the
//! offset into it, which is all a crash report needs.

use core::fmt;

use spin::Once;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolRef<'a> {
    pub name: &'a str,
    pub offset: u64,
}

impl fmt::Display for SymbolRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+0x{:x}", self.name, self.offset)
    }
}

/// Address-to-symbol resolution. Absent means "print nothing".
pub trait SymbolLookup {
    fn lookup(&self, addr: u64) -> Option<SymbolRef<'_>>;
}

#[derive(Clone, Copy)]
pub struct SortedSymbols<'a> {
    entries: &'a [(u64, &'a str)],
}

impl<'a> SortedSymbols<'a> {
    /// Wrap a table; `None` unless addresses are non-decreasing.
    pub fn new(entries: &'a [(u64, &'a str)]) -> Option<Self> {
        if entries.windows(2).all(|w| w[0].0 <= w[1].0) {
            Some(Self { entries })
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SymbolLookup for SortedSymbols<'_> {
    fn lookup(&self, addr: u64) -> Option<SymbolRef<'_>> {
        let idx = self.entries.partition_point(|&(start, _)| start <= addr);
        let (start, name) = *self.entries.get(idx.checked_sub(1)?)?;
        Some(SymbolRef {
            name,
            offset: addr - start,
        })
    }
}

static SYMBOLS: Once<SortedSymbols<'static>> = Once::new();

/// Install the firmware symbol table. Returns false if the table is not
/// sorted or one was already installed.
pub fn register_symbol_table(entries: &'static [(u64, &'static str)]) -> bool {
    let Some(table) = SortedSymbols::new(entries) else {
        return false;
    };
    let mut installed = false;
    SYMBOLS.call_once(|| {
        installed = true;
        table
    });
    installed
}

pub fn symbol_lookup(addr: u64) -> Option<SymbolRef<'static>> {
    SYMBOLS.get()?.lookup(addr)
}

/// The registered table as a [`SymbolLookup`]; resolves nothing until a
/// table is installed.
#[derive(Clone, Copy, Default)]
pub struct RegisteredSymbols;

impl SymbolLookup for RegisteredSymbols {
    fn lookup(&self, addr: u64) -> Option<SymbolRef<'_>> {
        symbol_lookup(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    const TABLE: &[(u64, &str)] = &[
        (0x3000_0000, "boot_entry"),
        (0x3000_0400, "main_cpu_entry"),
        (0x3000_2000, "exception_entry"),
    ];

    #[test]
    fn nearest_preceding_symbol() {
        let syms = SortedSymbols::new(TABLE).unwrap();
        let hit = syms.lookup(0x3000_2010).unwrap();
        assert_eq!(hit.name, "exception_entry");
        assert_eq!(hit.offset, 0x10);
        assert_eq!(syms.lookup(0x3000_0400).unwrap().offset, 0);
        assert_eq!(syms.lookup(0x3000_03ff).unwrap().name, "boot_entry");
    }

    #[test]
    fn below_first_symbol_is_absent() {
        let syms = SortedSymbols::new(TABLE).unwrap();
        assert!(syms.lookup(0x100).is_none());
        assert!(SortedSymbols::new(&[]).unwrap().lookup(0x100).is_none());
    }

    #[test]
    fn unsorted_table_rejected() {
        assert!(SortedSymbols::new(&[(2, "b"), (1, "a")]).is_none());
    }

    #[test]
    fn display_form() {
        let s = SymbolRef {
            name: "opal_entry",
            offset: 0x2c,
        };
        assert_eq!(s.to_string(), "opal_entry+0x2c");
    }

    #[test]
    fn registered_table_installs_once() {
        assert!(register_symbol_table(TABLE));
        assert!(!register_symbol_table(TABLE));
        assert_eq!(symbol_lookup(0x3000_0404).unwrap().name, "main_cpu_entry");
        assert!(RegisteredSymbols.lookup(0x10).is_none());
    }
}
