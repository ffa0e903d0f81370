#![no_std]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod error;
pub mod exception;
pub mod ffi_boundary;
pub mod opal;
pub mod services;
pub mod vm_state;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use config::{TrapConfig, config_from_cmdline, trap_config, trap_config_init};
pub use error::{OpalError, OpalResult};
pub use exception::{
    FaultResolverOps, Resume, StackFrame, TrapServices, exception_entry_impl,
    register_fault_resolvers,
};
pub use opal::{
    OpalCallTable, OpalHandler, exceptions_register_opal_calls, opal_call_dispatch,
    opal_call_register,
};
pub use vm_state::{VM_STATE, VmCpuState, vm_state};
