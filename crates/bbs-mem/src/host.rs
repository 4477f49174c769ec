//! Well-known segment numbers owned by the host rather than by a module.

use std::ops::RangeInclusive;

/// Transient "routine" segments are handed out from this range, lowest first.
pub const ROUTINE_SEGMENTS: RangeInclusive<u16> = 0x1000..=0x9FFE;

/// Fixed-purpose segments shared by every channel of every module.
///
/// They are created on first use (see [`crate::SegmentedMemory::ensure_segment`])
/// and live for the lifetime of the memory manager. None of them overlap
/// [`ROUTINE_SEGMENTS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum HostSegment {
    /// Bump-allocated scratch buffers returned to modules.
    HostMemory = 0xF000,
    /// Word 0 holds the channel number of the session currently executing.
    UserNum = 0xF001,
    /// Word 0 holds the last injected channel status.
    Status = 0xF002,
    /// Offset 0 holds the NUL-terminated registration number.
    Registration = 0xF003,
}

impl HostSegment {
    pub const ALL: [HostSegment; 4] = [
        HostSegment::HostMemory,
        HostSegment::UserNum,
        HostSegment::Status,
        HostSegment::Registration,
    ];

    pub const fn number(self) -> u16 {
        self as u16
    }
}

impl From<HostSegment> for u16 {
    fn from(segment: HostSegment) -> Self {
        segment.number()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_segments_never_collide_with_routine_space() {
        for segment in HostSegment::ALL {
            assert!(!ROUTINE_SEGMENTS.contains(&segment.number()), "{segment:?}");
        }
    }
}
