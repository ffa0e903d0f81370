//! OPAL call interface: call tokens and return codes.
//!
//! The host OS enters firmware with a token selecting the call and up to
//! eight register arguments. Return codes are negative on failure.

// =============================================================================
// Return codes
// =============================================================================

pub const OPAL_SUCCESS: i64 = 0;
pub const OPAL_PARAMETER: i64 = -1;
pub const OPAL_BUSY: i64 = -2;
pub const OPAL_PARTIAL: i64 = -3;
pub const OPAL_CONSTRAINED: i64 = -4;
pub const OPAL_CLOSED: i64 = -5;
pub const OPAL_HARDWARE: i64 = -6;
pub const OPAL_UNSUPPORTED: i64 = -7;
pub const OPAL_PERMISSION: i64 = -8;
pub const OPAL_NO_MEM: i64 = -9;
pub const OPAL_RESOURCE: i64 = -10;
pub const OPAL_INTERNAL_ERROR: i64 = -11;
pub const OPAL_BUSY_EVENT: i64 = -12;
pub const OPAL_HARDWARE_FROZEN: i64 = -13;
pub const OPAL_WRONG_STATE: i64 = -14;
pub const OPAL_ASYNC_COMPLETION: i64 = -15;

// =============================================================================
// Call tokens
// =============================================================================

pub const OPAL_TEST: u64 = 0;
pub const OPAL_CONSOLE_WRITE: u64 = 1;
pub const OPAL_CONSOLE_READ: u64 = 2;
pub const OPAL_RTC_READ: u64 = 3;
pub const OPAL_RTC_WRITE: u64 = 4;
pub const OPAL_CEC_POWER_DOWN: u64 = 5;
pub const OPAL_CEC_REBOOT: u64 = 6;
pub const OPAL_HANDLE_INTERRUPT: u64 = 9;
pub const OPAL_POLL_EVENTS: u64 = 10;
/// Deprecated: registering OS exception handlers with firmware.
pub const OPAL_REGISTER_OPAL_EXCEPTION_HANDLER: u64 = 22;

/// Number of slots in the firmware's call table. Tokens at or above this are
/// rejected without lookup.
pub const OPAL_CALL_TABLE_SIZE: usize = 256;

/// Largest number of register arguments an OPAL call may take.
pub const OPAL_MAX_ARGS: usize = 8;
