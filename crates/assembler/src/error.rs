//! Error types for the script assembler.

use thiserror::Error;

/// Errors produced during assembly of text to a program.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// An unrecognized opcode mnemonic was encountered.
    #[error("line {line}: unknown mnemonic '{token}'")]
    UnknownMnemonic { line: usize, token: String },

    /// An unrecognized `.` directive was encountered.
    #[error("line {line}: unknown directive '{token}'")]
    UnknownDirective { line: usize, token: String },

    /// An opcode or directive did not have its argument.
    #[error("line {line}: {name} expects an argument")]
    MissingArgument { line: usize, name: &'static str },

    /// A numeric literal could not be parsed or does not fit its slot.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// An immediate does not fit the opcode's segment.
    #[error("line {line}: immediate {value} out of range for {opcode} (0..={max})")]
    ImmediateOutOfRange {
        line: usize,
        opcode: &'static str,
        value: i64,
        max: u32,
    },

    /// A string literal has no closing quote.
    #[error("line {line}: unterminated string")]
    UnterminatedString { line: usize },

    /// A backslash escape other than `\" \\ \n \t \r`.
    #[error("line {line}: invalid escape '\\{escape}'")]
    InvalidEscape { line: usize, escape: char },

    /// A token appeared where it was not expected.
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },
}
