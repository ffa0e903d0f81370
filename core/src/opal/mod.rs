//! OPAL call table.
//!
//! The host OS calls into firmware with a token and up to eight register
//! arguments. Each subsystem registers its calls at boot; dispatch checks the
//! token and argument count before handing the arguments to the handler.

pub mod exc_handler;

use hvfw_abi::opal::{OPAL_CALL_TABLE_SIZE, OPAL_MAX_ARGS, OPAL_PARAMETER};
use hvfw_lib::{klog_debug, klog_info};
use spin::Mutex;

use crate::error::{OpalError, OpalResult};

pub use exc_handler::{exceptions_register_opal_calls, opal_register_exc_handler};

/// Handler for one OPAL call; receives exactly the registered number of
/// arguments and returns the value for r3.
pub type OpalHandler = fn(args: &[u64]) -> i64;

#[derive(Clone, Copy)]
struct OpalCallEntry {
    handler: OpalHandler,
    nargs: usize,
}

pub struct OpalCallTable {
    slots: [Option<OpalCallEntry>; OPAL_CALL_TABLE_SIZE],
}

impl OpalCallTable {
    pub const fn new() -> Self {
        Self {
            slots: [None; OPAL_CALL_TABLE_SIZE],
        }
    }

    pub fn register(&mut self, token: u64, handler: OpalHandler, nargs: usize) -> OpalResult {
        if nargs > OPAL_MAX_ARGS {
            return Err(OpalError::Parameter);
        }
        let slot = usize::try_from(token)
            .ok()
            .and_then(|idx| self.slots.get_mut(idx))
            .ok_or(OpalError::Parameter)?;
        if slot.is_some() {
            return Err(OpalError::Busy);
        }
        *slot = Some(OpalCallEntry { handler, nargs });
        Ok(())
    }

    fn lookup(&self, token: u64) -> Option<OpalCallEntry> {
        let idx = usize::try_from(token).ok()?;
        *self.slots.get(idx)?
    }

    pub fn is_registered(&self, token: u64) -> bool {
        self.lookup(token).is_some()
    }

    /// Run the call for `token`. Unknown tokens and argument count
    /// mismatches return `OPAL_PARAMETER` without calling anything.
    pub fn dispatch(&self, token: u64, args: &[u64]) -> i64 {
        run_call(token, self.lookup(token), args)
    }
}

fn run_call(token: u64, entry: Option<OpalCallEntry>, args: &[u64]) -> i64 {
    match entry {
        Some(entry) if entry.nargs == args.len() => (entry.handler)(args),
        Some(entry) => {
            klog_debug!(
                "OPAL: token {} takes {} args, got {}",
                token,
                entry.nargs,
                args.len()
            );
            OPAL_PARAMETER
        }
        None => {
            klog_info!("OPAL: Unknown call token {} -> OPAL_PARAMETER", token);
            OPAL_PARAMETER
        }
    }
}

impl Default for OpalCallTable {
    fn default() -> Self {
        Self::new()
    }
}

static OPAL_CALLS: Mutex<OpalCallTable> = Mutex::new(OpalCallTable::new());

pub fn opal_call_register(token: u64, handler: OpalHandler, nargs: usize) -> OpalResult {
    OPAL_CALLS.lock().register(token, handler, nargs)
}

pub fn opal_call_dispatch(token: u64, args: &[u64]) -> i64 {
    // The lock is dropped before the handler runs.
    let entry = OPAL_CALLS.lock().lookup(token);
    run_call(token, entry, args)
}
