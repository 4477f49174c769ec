//! Decoded view of a code segment.
//!
//! Decoding is delegated to `iced-x86` in 16-bit mode; this module only keeps the
//! resulting stream and answers "which instruction starts at IP".

use iced_x86::{Decoder, DecoderOptions, Instruction};

#[derive(Debug, Clone, Default)]
pub struct DecodedSegment {
    /// Sorted by `ip16()`, as produced by a linear sweep from offset 0.
    instructions: Vec<Instruction>,
}

impl DecodedSegment {
    /// Linear sweep of `bytes` starting at IP 0. A truncated trailing instruction is
    /// kept as the decoder reports it (an invalid instruction) so every byte of the
    /// payload belongs to exactly one entry.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut decoder = Decoder::with_ip(16, bytes, 0, DecoderOptions::NONE);
        let mut instructions = Vec::new();
        let mut instruction = Instruction::default();
        while decoder.can_decode() {
            decoder.decode_out(&mut instruction);
            instructions.push(instruction);
        }
        Self { instructions }
    }

    pub fn get(&self, ip: u16) -> Option<&Instruction> {
        self.instructions
            .binary_search_by_key(&ip, |instruction| instruction.ip16())
            .ok()
            .map(|index| &self.instructions[index])
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
