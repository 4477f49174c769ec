//! Host-side services for emulated 16-bit BBS modules.
//!
//! - [`HostFunctionDispatcher`]: routes ordinal calls to host functions
//! - [`exported`]: the host function families, keyed by ordinal
//! - [`ChannelTable`] / [`ChannelIoQueue`]: per-session byte-chunk queues
//! - [`RegisterFile`] / [`CallContext`]: the register and parameter view of a call
//! - [`HostConfig`] and [`logging`]: process-level setup

mod channel;
mod config;
mod dispatch;
mod error;
pub mod exported;
pub mod logging;
mod module_memory;
mod registers;

pub use channel::{ChannelHandle, ChannelIoQueue, ChannelTable};
pub use config::{HostConfig, DEFAULT_LOG_FILTER, DEFAULT_REGISTRATION_NUMBER};
pub use dispatch::{HostCall, HostFn, HostFunction, HostFunctionDispatcher, OrdinalTable};
pub use error::{ConfigError, HostError, Result};
pub use module_memory::ModuleMemory;
pub use registers::{CallContext, CpuRegisters, Register16, RegisterFile};
