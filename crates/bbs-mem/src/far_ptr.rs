use std::fmt;

use crate::{MemoryError, Result};

/// A real-mode `segment:offset` pointer.
///
/// The in-memory encoding is the one 16-bit binaries use for `far` pointers: the
/// offset as a little-endian word followed by the segment as a little-endian word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FarPointer {
    segment: u16,
    offset: u16,
}

impl FarPointer {
    pub const SIZE: usize = 4;

    /// The single empty pointer (`0000:0000`).
    pub const NULL: Self = Self::new(0, 0);

    pub const fn new(segment: u16, offset: u16) -> Self {
        Self { segment, offset }
    }

    /// Decodes the first four bytes of `bytes`. Trailing bytes are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes {
            [off_lo, off_hi, seg_lo, seg_hi, ..] => Ok(Self {
                offset: u16::from_le_bytes([*off_lo, *off_hi]),
                segment: u16::from_le_bytes([*seg_lo, *seg_hi]),
            }),
            _ => Err(MemoryError::PointerFormat(bytes.len())),
        }
    }

    pub fn to_bytes(self) -> [u8; Self::SIZE] {
        let [off_lo, off_hi] = self.offset.to_le_bytes();
        let [seg_lo, seg_hi] = self.segment.to_le_bytes();
        [off_lo, off_hi, seg_lo, seg_hi]
    }

    /// Opaque 32-bit key (`segment << 16 | offset`). This is not a physical address.
    pub const fn to_linear_key(self) -> u32 {
        ((self.segment as u32) << 16) | self.offset as u32
    }

    pub const fn segment(self) -> u16 {
        self.segment
    }

    pub const fn offset(self) -> u16 {
        self.offset
    }

    pub const fn with_segment(self, segment: u16) -> Self {
        Self { segment, ..self }
    }

    pub const fn with_offset(self, offset: u16) -> Self {
        Self { offset, ..self }
    }

    pub fn set_segment(&mut self, segment: u16) {
        self.segment = segment;
    }

    pub fn set_offset(&mut self, offset: u16) {
        self.offset = offset;
    }

    pub const fn is_null(self) -> bool {
        self.segment == 0 && self.offset == 0
    }
}

impl PartialOrd for FarPointer {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FarPointer {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_linear_key().cmp(&other.to_linear_key())
    }
}

impl fmt::Display for FarPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}:{:04X}", self.segment, self.offset)
    }
}

impl From<FarPointer> for [u8; FarPointer::SIZE] {
    fn from(ptr: FarPointer) -> Self {
        ptr.to_bytes()
    }
}

impl TryFrom<&[u8]> for FarPointer {
    type Error = MemoryError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}
