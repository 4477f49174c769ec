use crate::{MemoryError, SegmentedMemory, ROUTINE_SEGMENTS};
use proptest::prelude::*;

fn outside_routine_range() -> impl Strategy<Value = u16> {
    prop_oneof![
        0u16..*ROUTINE_SEGMENTS.start(),
        (*ROUTINE_SEGMENTS.end() + 1)..=u16::MAX,
    ]
}

proptest! {
    #[test]
    fn word_round_trip(segment in any::<u16>(), offset in 0u16..0xFFFF, value in any::<u16>()) {
        let mut memory = SegmentedMemory::new();
        memory.add_segment(segment).unwrap();
        memory.set_word(segment, offset, value).unwrap();
        prop_assert_eq!(memory.get_word(segment, offset).unwrap(), value);
        prop_assert_eq!(memory.get_byte(segment, offset).unwrap(), value as u8);
    }

    #[test]
    fn duplicate_add_leaves_contents_alone(segment in any::<u16>(), offset in any::<u16>(), value in any::<u8>()) {
        let mut memory = SegmentedMemory::new();
        memory.add_segment(segment).unwrap();
        memory.set_byte(segment, offset, value).unwrap();

        prop_assert_eq!(memory.add_segment(segment), Err(MemoryError::DuplicateSegment(segment)));
        prop_assert_eq!(memory.get_byte(segment, offset).unwrap(), value);
    }

    #[test]
    fn free_outside_routine_range_is_rejected(number in outside_routine_range(), in_use in any::<bool>()) {
        let mut memory = SegmentedMemory::new();
        if in_use {
            memory.add_segment(number).unwrap();
        }
        prop_assert_eq!(
            memory.free_routine_segment(number),
            Err(MemoryError::OutsideRoutineRange(number))
        );
        prop_assert_eq!(memory.has_segment(number), in_use);
    }

    #[test]
    fn spans_past_the_segment_end_fail(offset in any::<u16>(), extra in 1usize..64) {
        let mut memory = SegmentedMemory::new();
        memory.add_segment(0x10).unwrap();
        let len = 0x1_0000 - offset as usize + extra;
        let is_out_of_bounds = matches!(
            memory.get_span(0x10, offset, len),
            Err(MemoryError::OutOfBounds { .. })
        );
        prop_assert!(is_out_of_bounds);
        prop_assert!(memory.set_array(0x10, offset, &vec![0xAA; len]).is_err());
    }
}
