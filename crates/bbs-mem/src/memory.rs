use std::collections::HashMap;

use iced_x86::Instruction;
use tracing::{debug, warn};

use crate::decoder::DecodedSegment;
use crate::host::{HostSegment, ROUTINE_SEGMENTS};
use crate::segment::{Segment, SegmentInfo, SEGMENT_SIZE};
use crate::{FarPointer, MemoryError, Result};

type SegmentBytes = Box<[u8]>;

fn zeroed_segment() -> SegmentBytes {
    vec![0u8; SEGMENT_SIZE].into_boxed_slice()
}

/// Real-mode memory as a set of independent 64KiB segments keyed by segment number.
///
/// There is no linear address space behind this: every access names a segment and
/// an offset, and an access that would run past offset `0xFFFF` is rejected instead
/// of spilling into whatever segment happens to be numbered next.
///
/// Segment numbers fall into three groups:
/// - module segments, added from the module image ([`Self::add_code_segment`]);
/// - host-reserved segments ([`HostSegment`]), created lazily;
/// - routine segments, handed out from [`ROUTINE_SEGMENTS`] and explicitly freed.
#[derive(Debug, Default)]
pub struct SegmentedMemory {
    segments: HashMap<u16, SegmentBytes>,
    decoded: HashMap<u16, DecodedSegment>,
    info: HashMap<u16, SegmentInfo>,
    host_memory_offset: u16,
}

impl SegmentedMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a zero-filled segment at `number`.
    pub fn add_segment(&mut self, number: u16) -> Result<()> {
        if self.segments.contains_key(&number) {
            return Err(MemoryError::DuplicateSegment(number));
        }
        self.segments.insert(number, zeroed_segment());
        debug!(segment = number, "added segment");
        Ok(())
    }

    /// Creates `number` if it does not exist yet. Used for host-reserved segments,
    /// which have no fixed initialization order.
    pub fn ensure_segment(&mut self, number: impl Into<u16>) -> &mut [u8] {
        let number = number.into();
        self.segments.entry(number).or_insert_with(|| {
            debug!(segment = number, "created host segment");
            zeroed_segment()
        })
    }

    /// Copies a module segment into a fresh 64KiB region. Code segments are also
    /// decoded so the executor can fetch instructions by IP; any previous decoded
    /// stream for the ordinal is replaced.
    pub fn add_code_segment(&mut self, segment: &Segment) -> Result<()> {
        let ordinal = segment.ordinal;
        if segment.data.len() > SEGMENT_SIZE {
            return Err(MemoryError::OversizedSegment {
                ordinal,
                len: segment.data.len(),
            });
        }
        if self.segments.contains_key(&ordinal) {
            return Err(MemoryError::DuplicateSegment(ordinal));
        }

        let mut bytes = zeroed_segment();
        bytes[..segment.data.len()].copy_from_slice(&segment.data);
        self.segments.insert(ordinal, bytes);

        if segment.is_code() {
            let decoded = DecodedSegment::decode(&segment.data);
            debug!(
                segment = ordinal,
                instructions = decoded.len(),
                "decoded code segment"
            );
            self.decoded.insert(ordinal, decoded);
        }

        self.info.insert(
            ordinal,
            SegmentInfo {
                ordinal,
                flags: segment.flags,
                payload_len: segment.data.len(),
            },
        );
        Ok(())
    }

    pub fn has_segment(&self, number: u16) -> bool {
        self.segments.contains_key(&number)
    }

    pub fn segment_info(&self, number: u16) -> Option<&SegmentInfo> {
        self.info.get(&number)
    }

    pub fn get_instruction(&self, segment: u16, ip: u16) -> Result<&Instruction> {
        self.decoded
            .get(&segment)
            .and_then(|decoded| decoded.get(ip))
            .ok_or(MemoryError::InstructionNotFound { segment, ip })
    }

    pub fn decoded_segment(&self, segment: u16) -> Option<&DecodedSegment> {
        self.decoded.get(&segment)
    }

    fn segment(&self, segment: u16) -> Result<&[u8]> {
        self.segments
            .get(&segment)
            .map(|bytes| &bytes[..])
            .ok_or(MemoryError::UnknownSegment(segment))
    }

    fn segment_mut(&mut self, segment: u16) -> Result<&mut [u8]> {
        self.segments
            .get_mut(&segment)
            .map(|bytes| &mut bytes[..])
            .ok_or(MemoryError::UnknownSegment(segment))
    }

    fn check_bounds(segment: u16, offset: u16, len: usize) -> Result<std::ops::Range<usize>> {
        let start = offset as usize;
        let end = start + len;
        if end > SEGMENT_SIZE {
            return Err(MemoryError::OutOfBounds {
                segment,
                offset,
                len,
            });
        }
        Ok(start..end)
    }

    pub fn get_byte(&self, segment: u16, offset: u16) -> Result<u8> {
        Ok(self.segment(segment)?[offset as usize])
    }

    pub fn get_word(&self, segment: u16, offset: u16) -> Result<u16> {
        let span = self.get_span(segment, offset, 2)?;
        Ok(u16::from_le_bytes([span[0], span[1]]))
    }

    pub fn get_span(&self, segment: u16, offset: u16, len: usize) -> Result<&[u8]> {
        let bytes = self.segment(segment)?;
        let range = Self::check_bounds(segment, offset, len)?;
        Ok(&bytes[range])
    }

    pub fn get_array(&self, segment: u16, offset: u16, len: usize) -> Result<Vec<u8>> {
        self.get_span(segment, offset, len).map(<[u8]>::to_vec)
    }

    /// Bytes from `offset` up to (not including) the first NUL.
    pub fn get_c_string(&self, segment: u16, offset: u16) -> Result<&[u8]> {
        let tail = &self.segment(segment)?[offset as usize..];
        let len = tail
            .iter()
            .position(|&b| b == 0)
            .ok_or(MemoryError::UnterminatedString { segment, offset })?;
        Ok(&tail[..len])
    }

    pub fn get_pointer(&self, segment: u16, offset: u16) -> Result<FarPointer> {
        FarPointer::from_bytes(self.get_span(segment, offset, FarPointer::SIZE)?)
    }

    pub fn set_byte(&mut self, segment: u16, offset: u16, value: u8) -> Result<()> {
        self.segment_mut(segment)?[offset as usize] = value;
        Ok(())
    }

    pub fn set_word(&mut self, segment: u16, offset: u16, value: u16) -> Result<()> {
        self.set_array(segment, offset, &value.to_le_bytes())
    }

    pub fn set_array(&mut self, segment: u16, offset: u16, data: &[u8]) -> Result<()> {
        let bytes = self.segment_mut(segment)?;
        let range = Self::check_bounds(segment, offset, data.len())?;
        bytes[range].copy_from_slice(data);
        Ok(())
    }

    pub fn set_pointer(&mut self, segment: u16, offset: u16, pointer: FarPointer) -> Result<()> {
        self.set_array(segment, offset, &pointer.to_bytes())
    }

    /// Bump-allocates `size` bytes in the host arena segment and returns the offset
    /// of the allocation. Nothing is ever freed; callers must keep the cumulative
    /// total under 64KiB.
    pub fn allocate_host_memory(&mut self, size: u16) -> u16 {
        self.ensure_segment(HostSegment::HostMemory);

        let offset = self.host_memory_offset;
        let (next, wrapped) = offset.overflowing_add(size);
        if wrapped {
            warn!(offset, size, "host memory arena wrapped past the end of its segment");
        }
        self.host_memory_offset = next;
        debug!(offset, size, "allocated host memory");
        offset
    }

    /// Claims the lowest unused number in [`ROUTINE_SEGMENTS`].
    pub fn allocate_routine_segment(&mut self) -> Result<u16> {
        let number = ROUTINE_SEGMENTS
            .clone()
            .find(|number| !self.segments.contains_key(number))
            .ok_or(MemoryError::OutOfRoutineSegments {
                first: *ROUTINE_SEGMENTS.start(),
                last: *ROUTINE_SEGMENTS.end(),
            })?;
        self.segments.insert(number, zeroed_segment());
        debug!(segment = number, "allocated routine segment");
        Ok(number)
    }

    /// Releases a routine segment, including any decoded stream stored under it.
    pub fn free_routine_segment(&mut self, number: u16) -> Result<()> {
        if !ROUTINE_SEGMENTS.contains(&number) {
            return Err(MemoryError::OutsideRoutineRange(number));
        }
        if self.segments.remove(&number).is_none() {
            return Err(MemoryError::UnknownSegment(number));
        }
        self.decoded.remove(&number);
        self.info.remove(&number);
        debug!(segment = number, "freed routine segment");
        Ok(())
    }
}
