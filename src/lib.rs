//! Runtime core for hosting 16-bit real-mode BBS modules.
//!
//! - [`mem`]: segmented memory and far pointers
//! - [`host`]: channel queues and host-function dispatch

pub use bbs_host as host;
pub use bbs_mem as mem;

pub use bbs_host::{
    CallContext, ChannelTable, HostConfig, HostError, HostFunctionDispatcher, ModuleMemory,
};
pub use bbs_mem::{FarPointer, MemoryError, Segment, SegmentFlags, SegmentedMemory};
