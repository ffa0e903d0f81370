//! OPAL_REGISTER_OPAL_EXCEPTION_HANDLER.
//!
//! Older hosts could ask firmware to forward exceptions to an OS handler.
//! The interface is withdrawn; the call stays registered so those hosts get
//! a clean "unsupported" instead of a parameter error.

use hvfw_abi::opal::OPAL_REGISTER_OPAL_EXCEPTION_HANDLER;

use super::{OPAL_CALLS, OpalCallTable};
use crate::error::{OpalError, OpalResult, opal_return_code};

const EXC_HANDLER_NARGS: usize = 3;

pub fn opal_register_exc_handler(
    _opal_exception: u64,
    _handler_address: u64,
    _glue_cache_line: u64,
) -> OpalResult<i64> {
    Err(OpalError::Unsupported)
}

fn opal_register_exc_handler_call(args: &[u64]) -> i64 {
    match *args {
        [exception, handler, glue] => {
            opal_return_code(opal_register_exc_handler(exception, handler, glue))
        }
        _ => OpalError::Parameter.code(),
    }
}

/// Register the exception-related OPAL calls in `table`.
pub fn exceptions_register_opal_calls_into(table: &mut OpalCallTable) -> OpalResult {
    table.register(
        OPAL_REGISTER_OPAL_EXCEPTION_HANDLER,
        opal_register_exc_handler_call,
        EXC_HANDLER_NARGS,
    )
}

/// Register the exception-related OPAL calls in the firmware call table.
pub fn exceptions_register_opal_calls() -> OpalResult {
    exceptions_register_opal_calls_into(&mut OPAL_CALLS.lock())
}
