//! Instruction word encoding and decoding.
//!
//! An instruction is a single 32-bit word. Its top bits select a
//! [`Segment`]; the rest is split into an opcode and an immediate argument
//! whose widths depend on the segment. The layout is a wire contract with
//! already-compiled scripts and must stay bit-exact.

use crate::error::{DecodeError, EncodeError};
use crate::opcode::Opcode;
use crate::segment::Segment;

/// A decoded instruction word: segment, opcode and immediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    segment: Segment,
    opcode: u32,
    arg: u32,
}

impl Instruction {
    /// Create an instruction, checking that the opcode and immediate fit the
    /// segment's field widths.
    pub fn new(segment: Segment, opcode: u32, arg: u32) -> Result<Self, EncodeError> {
        if opcode > segment.max_opcode() {
            return Err(EncodeError::OpcodeOutOfRange {
                segment,
                opcode,
                max: segment.max_opcode(),
            });
        }
        if arg > segment.max_arg() {
            return Err(EncodeError::ArgumentOutOfRange {
                segment,
                arg,
                max: segment.max_arg(),
            });
        }
        Ok(Self {
            segment,
            opcode,
            arg,
        })
    }

    /// Create an instruction for a manifest opcode.
    ///
    /// Zero-argument opcodes require `arg == 0`.
    pub fn from_opcode(opcode: Opcode, arg: u32) -> Result<Self, EncodeError> {
        Self::new(opcode.segment(), opcode.code(), arg)
    }

    /// The addressing segment.
    pub fn segment(&self) -> Segment {
        self.segment
    }

    /// The opcode number within the segment.
    pub fn opcode(&self) -> u32 {
        self.opcode
    }

    /// The immediate argument. Always zero in segment 5.
    pub fn arg(&self) -> u32 {
        self.arg
    }

    /// The manifest opcode this instruction refers to, if any.
    pub fn known_opcode(&self) -> Option<Opcode> {
        Opcode::lookup(self.segment, self.opcode)
    }

    /// Encode to a raw instruction word.
    pub fn encode(&self) -> u32 {
        self.segment.prefix() | (self.opcode << self.segment.arg_bits()) | self.arg
    }

    /// Decode a raw instruction word.
    pub fn decode(word: u32) -> Result<Self, DecodeError> {
        let segment = Segment::of_word(word).ok_or(DecodeError::OutsideSegmentRange(word))?;
        let arg_bits = segment.arg_bits();
        let opcode = (word >> arg_bits) & segment.max_opcode();
        let arg = word & segment.max_arg();
        Ok(Self {
            segment,
            opcode,
            arg,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::ALL_SEGMENTS;

    // --- Known encodings ---

    #[test]
    fn segment0_layout() {
        let instr = Instruction::new(Segment::Zero, 1, 0x00AB_CDEF).unwrap();
        assert_eq!(instr.encode(), 0x01AB_CDEF);
    }

    #[test]
    fn segment2_layout() {
        let instr = Instruction::new(Segment::Two, 0x3FF, 0xF_FFFF).unwrap();
        assert_eq!(instr.encode(), 0xBFFF_FFFF);
        let instr = Instruction::new(Segment::Two, 1, 2).unwrap();
        assert_eq!(instr.encode(), 0x8010_0002);
    }

    #[test]
    fn segment3_layout() {
        let instr = Instruction::new(Segment::Three, 0, 2).unwrap();
        assert_eq!(instr.encode(), 0xC000_0002);
        let instr = Instruction::new(Segment::Three, 0x3_FFFF, 0xFF).unwrap();
        assert_eq!(instr.encode(), 0xC3FF_FFFF);
    }

    #[test]
    fn segment5_layout() {
        let instr = Instruction::new(Segment::Five, 20, 0).unwrap();
        assert_eq!(instr.encode(), 0xC800_0014);
    }

    #[test]
    fn push_int_encoding() {
        let instr = Instruction::from_opcode(Opcode::PushInt, 5).unwrap();
        assert_eq!(instr.encode(), 0x0000_0005);
    }

    // --- Decode ---

    #[test]
    fn decode_segment0() {
        let instr = Instruction::decode(0x0200_0003).unwrap();
        assert_eq!(instr.segment(), Segment::Zero);
        assert_eq!(instr.opcode(), 2);
        assert_eq!(instr.arg(), 3);
        assert_eq!(instr.known_opcode(), Some(Opcode::JumpBackward));
    }

    #[test]
    fn decode_segment5() {
        let instr = Instruction::decode(0xC800_0009).unwrap();
        assert_eq!(instr.segment(), Segment::Five);
        assert_eq!(instr.opcode(), 9);
        assert_eq!(instr.arg(), 0);
        assert_eq!(instr.known_opcode(), Some(Opcode::AddInt));
    }

    #[test]
    fn decode_rejects_top_bits_111111() {
        assert_eq!(
            Instruction::decode(0xFC00_0001),
            Err(DecodeError::OutsideSegmentRange(0xFC00_0001))
        );
    }

    #[test]
    fn decode_rejects_prefix_01() {
        assert_eq!(
            Instruction::decode(0x4000_0000),
            Err(DecodeError::OutsideSegmentRange(0x4000_0000))
        );
    }

    #[test]
    fn decode_unknown_opcode_still_decodes() {
        let instr = Instruction::decode(0xC800_1234).unwrap();
        assert_eq!(instr.opcode(), 0x1234);
        assert_eq!(instr.known_opcode(), None);
    }

    // --- Encode rejection ---

    #[test]
    fn rejects_wide_opcode() {
        assert_eq!(
            Instruction::new(Segment::Zero, 64, 0),
            Err(EncodeError::OpcodeOutOfRange {
                segment: Segment::Zero,
                opcode: 64,
                max: 63
            })
        );
    }

    #[test]
    fn rejects_argument_in_segment5() {
        assert_eq!(
            Instruction::from_opcode(Opcode::Return, 1),
            Err(EncodeError::ArgumentOutOfRange {
                segment: Segment::Five,
                arg: 1,
                max: 0
            })
        );
    }

    #[test]
    fn rejects_wide_argument() {
        assert!(Instruction::new(Segment::Three, 0, 0x100).is_err());
        assert!(Instruction::new(Segment::Two, 0, 0x10_0000).is_err());
        assert!(Instruction::new(Segment::Zero, 0, 0x100_0000).is_err());
    }

    #[test]
    fn field_extremes_roundtrip_in_every_segment() {
        for segment in ALL_SEGMENTS {
            for opcode in [0, 1, segment.max_opcode()] {
                for arg in [0, segment.max_arg() / 2, segment.max_arg()] {
                    let instr = Instruction::new(segment, opcode, arg).unwrap();
                    let decoded = Instruction::decode(instr.encode()).unwrap();
                    assert_eq!(instr, decoded, "segment {segment} opcode {opcode} arg {arg}");
                }
            }
        }
    }
}
