//! Segmented real-mode memory for emulated 16-bit BBS modules.
//!
//! - [`FarPointer`]: the 4-byte `segment:offset` value type
//! - [`SegmentedMemory`]: 64KiB segments keyed by number, with bounds-checked
//!   access, a host scratch arena and routine-segment allocation
//! - [`DecodedSegment`]: instruction stream of a code segment, keyed by IP

mod decoder;
mod error;
mod far_ptr;
mod host;
mod memory;
mod segment;

pub use decoder::DecodedSegment;
pub use error::{MemoryError, Result};
pub use far_ptr::FarPointer;
pub use host::{HostSegment, ROUTINE_SEGMENTS};
pub use iced_x86::Instruction;
pub use memory::SegmentedMemory;
pub use segment::{Segment, SegmentFlags, SegmentInfo, SEGMENT_SIZE};

#[cfg(all(test, not(target_arch = "wasm32")))]
mod proptests;
