//! Shared types for the script bytecode.
//!
//! - [`Segment`]: the four opcode address spaces of an instruction word
//! - [`Instruction`]: a decoded 32-bit instruction word
//! - [`Opcode`]: the manifest of built-in instructions and their numbers
//! - [`Value`]: an untagged operand stack cell
//! - [`Program`]: code plus literal pools, with the packed on-disk form
//! - [`DecodeError`], [`EncodeError`]

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod segment;
pub mod value;

pub use error::{DecodeError, EncodeError};
pub use instruction::Instruction;
pub use opcode::{Opcode, ALL_OPCODES};
pub use program::Program;
pub use segment::{Segment, ALL_SEGMENTS};
pub use value::Value;
