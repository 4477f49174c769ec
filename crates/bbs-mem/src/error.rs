use thiserror::Error;

pub type Result<T> = std::result::Result<T, MemoryError>;

/// Structural faults raised by the segmented memory manager.
///
/// None of these are recoverable at the point of the offending call: they mean the
/// emulated module addressed memory in a way real-mode hardware would not have
/// allowed, or the host asked for a segment lifecycle transition that does not
/// exist. They propagate to the execution loop untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("segment {0:04X} already defined")]
    DuplicateSegment(u16),

    #[error("unknown segment {0:04X}")]
    UnknownSegment(u16),

    #[error("out of bounds: {segment:04X}:{offset:04X} len={len} crosses the segment limit")]
    OutOfBounds { segment: u16, offset: u16, len: usize },

    #[error("no string terminator between {segment:04X}:{offset:04X} and the end of the segment")]
    UnterminatedString { segment: u16, offset: u16 },

    #[error("unable to allocate routine memory: no free segment in {first:04X}..={last:04X}")]
    OutOfRoutineSegments { first: u16, last: u16 },

    #[error("segment {0:04X} is outside routine segment space")]
    OutsideRoutineRange(u16),

    #[error("no decoded instruction starts at {segment:04X}:{ip:04X}")]
    InstructionNotFound { segment: u16, ip: u16 },

    #[error("segment {ordinal:04X} payload of {len} bytes does not fit in a 64KiB segment")]
    OversizedSegment { ordinal: u16, len: usize },

    #[error("far pointer needs 4 bytes, got {0}")]
    PointerFormat(usize),
}
