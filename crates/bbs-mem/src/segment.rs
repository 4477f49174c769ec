use bitflags::bitflags;

/// Every segment is exactly this many bytes, regardless of payload size.
pub const SEGMENT_SIZE: usize = 0x1_0000;

bitflags! {
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
    pub struct SegmentFlags: u16 {
        const CODE = 1 << 0;
        const DATA = 1 << 1;
        const MOVEABLE = 1 << 2;
        const PRELOAD = 1 << 3;
        const RELOCATIONS = 1 << 4;
    }
}

/// A segment as described by a module image: its number, its payload and its
/// attributes. The payload may be shorter than [`SEGMENT_SIZE`]; the memory manager
/// zero-pads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub ordinal: u16,
    pub data: Vec<u8>,
    pub flags: SegmentFlags,
}

impl Segment {
    pub fn new(ordinal: u16, data: Vec<u8>, flags: SegmentFlags) -> Self {
        Self {
            ordinal,
            data,
            flags,
        }
    }

    pub fn code(ordinal: u16, data: Vec<u8>) -> Self {
        Self::new(ordinal, data, SegmentFlags::CODE)
    }

    pub fn data(ordinal: u16, data: Vec<u8>) -> Self {
        Self::new(ordinal, data, SegmentFlags::DATA)
    }

    pub fn is_code(&self) -> bool {
        self.flags.contains(SegmentFlags::CODE)
    }
}

/// What the memory manager remembers about a segment added from a module image,
/// once its bytes have been copied into the 64KiB region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentInfo {
    pub ordinal: u16,
    pub flags: SegmentFlags,
    /// Payload length before zero-padding.
    pub payload_len: usize,
}
