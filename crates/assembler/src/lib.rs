//! Script assembler: text ↔ program translation.
//!
//! The assembler is a mechanical 1:1 translation. Each line is a mnemonic
//! with its immediate, or a directive that appends to a literal pool or
//! emits a raw instruction word.
//!
//! # Usage
//!
//! ```
//! use mwscript_assembler::{assemble, disassemble};
//!
//! let text = ".string \"Hello\"\nPUSH_INT 0\nMESSAGE_BOX 0\n";
//! let program = assemble(text).unwrap();
//! let roundtripped = disassemble(&program);
//! assert_eq!(roundtripped, text);
//! ```
//!
//! # Roundtrip Guarantee
//!
//! `assemble(disassemble(program)) == program` holds for programs built
//! with [`Program::with_literals`], except that NaN float literals come back
//! as the canonical NaN. The disassembler outputs canonical text; the
//! assembler also accepts lowercase mnemonics, hex immediates and comments.

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use error::AsmError;

use lexer::tokenize_line;
use mwscript_common::Program;
use parser::{parse_line, ParseResult};

/// Assemble text into a program.
///
/// Literal directives may appear anywhere; each pool keeps source order.
/// Returns the first error encountered.
pub fn assemble(text: &str) -> Result<Program, AsmError> {
    let mut code = Vec::new();
    let mut integers = Vec::new();
    let mut floats = Vec::new();
    let mut strings = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line, line_num)?;
        match parse_line(&tokens, line_num)? {
            Some(ParseResult::Word(word)) => code.push(word),
            Some(ParseResult::Integer(value)) => integers.push(value),
            Some(ParseResult::Float(value)) => floats.push(value),
            Some(ParseResult::Str(value)) => strings.push(value),
            None => {}
        }
    }

    Ok(Program::with_literals(code, integers, floats, strings))
}

/// Disassemble a program into canonical assembly text.
///
/// Literal pools come first, then one line per instruction word.
pub fn disassemble(program: &Program) -> String {
    disassembler::disassemble(program)
}
