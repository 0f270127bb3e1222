//! Decode and encode errors for script bytecode.

use crate::segment::Segment;
use thiserror::Error;

/// Errors that occur while decoding instruction words or packed programs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The word's top bits match none of the four segment patterns.
    #[error("opcode outside allocated segment range: {0}")]
    OutsideSegmentRange(u32),

    /// Packed program length is not a multiple of 4 bytes.
    #[error("invalid byte stream length: {0} (must be multiple of 4)")]
    InvalidLength(usize),

    /// Fewer than the four header words are present.
    #[error("truncated program header: {0} word(s), expected at least 4")]
    TruncatedHeader(usize),

    /// The header announces more words than the program contains.
    #[error("{block} block needs {needed} word(s) but only {available} remain")]
    BlockOverrun {
        block: &'static str,
        needed: usize,
        available: usize,
    },

    /// The string literal block ends without a NUL terminator.
    #[error("unterminated string literal at byte {0} of the string block")]
    UnterminatedString(usize),

    /// A string literal is not valid UTF-8.
    #[error("string literal at byte {0} of the string block is not valid UTF-8")]
    InvalidString(usize),

    /// Words remain after the last block the header announces.
    #[error("{0} trailing word(s) after the string block")]
    TrailingData(usize),
}

/// Errors that occur while encoding an instruction word.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The opcode does not fit the segment's opcode field.
    #[error("opcode {opcode} does not fit segment {segment} (max {max})")]
    OpcodeOutOfRange {
        segment: Segment,
        opcode: u32,
        max: u32,
    },

    /// The immediate does not fit the segment's argument field.
    #[error("argument {arg} does not fit segment {segment} (max {max})")]
    ArgumentOutOfRange { segment: Segment, arg: u32, max: u32 },
}
