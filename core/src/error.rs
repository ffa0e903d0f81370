//! Firmware call error type.
//!
//! OPAL calls report failure to the host as small negative integers. Inside
//! the firmware they travel as `OpalError` and are lowered to the wire code
//! only at the call-table boundary.

use core::fmt;

use hvfw_abi::opal::{
    OPAL_BUSY, OPAL_HARDWARE, OPAL_INTERNAL_ERROR, OPAL_PARAMETER, OPAL_PERMISSION, OPAL_RESOURCE,
    OPAL_UNSUPPORTED, OPAL_WRONG_STATE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpalError {
    Parameter,
    Busy,
    Hardware,
    Unsupported,
    Permission,
    Resource,
    InternalError,
    WrongState,
}

impl OpalError {
    pub const fn code(self) -> i64 {
        match self {
            Self::Parameter => OPAL_PARAMETER,
            Self::Busy => OPAL_BUSY,
            Self::Hardware => OPAL_HARDWARE,
            Self::Unsupported => OPAL_UNSUPPORTED,
            Self::Permission => OPAL_PERMISSION,
            Self::Resource => OPAL_RESOURCE,
            Self::InternalError => OPAL_INTERNAL_ERROR,
            Self::WrongState => OPAL_WRONG_STATE,
        }
    }

    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            OPAL_PARAMETER => Some(Self::Parameter),
            OPAL_BUSY => Some(Self::Busy),
            OPAL_HARDWARE => Some(Self::Hardware),
            OPAL_UNSUPPORTED => Some(Self::Unsupported),
            OPAL_PERMISSION => Some(Self::Permission),
            OPAL_RESOURCE => Some(Self::Resource),
            OPAL_INTERNAL_ERROR => Some(Self::InternalError),
            OPAL_WRONG_STATE => Some(Self::WrongState),
            _ => None,
        }
    }
}

impl fmt::Display for OpalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameter => write!(f, "invalid parameter"),
            Self::Busy => write!(f, "resource busy"),
            Self::Hardware => write!(f, "hardware error"),
            Self::Unsupported => write!(f, "operation not supported"),
            Self::Permission => write!(f, "permission denied"),
            Self::Resource => write!(f, "out of resources"),
            Self::InternalError => write!(f, "internal firmware error"),
            Self::WrongState => write!(f, "wrong state for operation"),
        }
    }
}

pub type OpalResult<T = ()> = Result<T, OpalError>;

/// Lower a call result to the value returned in r3.
pub fn opal_return_code(result: OpalResult<i64>) -> i64 {
    match result {
        Ok(value) => value,
        Err(err) => err.code(),
    }
}
