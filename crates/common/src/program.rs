//! Compiled script programs.
//!
//! A program is a code block plus three literal pools. The code block always
//! starts with a 4-word header; word 0 is the instruction count and words
//! 1-3 give the sizes, in words, of the integer, float and string blocks of
//! the packed form. Instructions follow the header.
//!
//! The packed form (`.mwsb` files) is a flat little-endian word stream:
//!
//! ```text
//! [count, int_words, float_words, string_words,
//!  code..., ints..., float bits..., string bytes...]
//! ```
//!
//! Strings are NUL-terminated, concatenated, and the block is zero-padded to
//! a whole number of words. String literals must be UTF-8; decoding rejects
//! any other encoding rather than altering the bytes.

use crate::error::DecodeError;

/// Number of header words at the start of the code block.
pub const HEADER_WORDS: usize = 4;

/// An immutable compiled script.
#[derive(Debug, Clone)]
pub struct Program {
    code: Vec<u32>,
    integers: Vec<i32>,
    floats: Vec<f32>,
    strings: Vec<String>,
}

// Float literals compare by bit pattern so NaN literals survive a
// decode/encode roundtrip and programs stay usable as `Eq` values.
impl PartialEq for Program {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
            && self.integers == other.integers
            && self.strings == other.strings
            && self.floats.len() == other.floats.len()
            && self
                .floats
                .iter()
                .zip(&other.floats)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Eq for Program {}

impl Program {
    /// Create a program with no literals.
    pub fn new(instructions: Vec<u32>) -> Self {
        Self::with_literals(instructions, Vec::new(), Vec::new(), Vec::new())
    }

    /// Create a program from instruction words and literal pools. The header
    /// is generated.
    pub fn with_literals(
        instructions: Vec<u32>,
        integers: Vec<i32>,
        floats: Vec<f32>,
        strings: Vec<String>,
    ) -> Self {
        let mut code = Vec::with_capacity(HEADER_WORDS + instructions.len());
        code.push(instructions.len() as u32);
        code.push(integers.len() as u32);
        code.push(floats.len() as u32);
        code.push(string_block_words(&strings) as u32);
        code.extend(instructions);
        Self {
            code,
            integers,
            floats,
            strings,
        }
    }

    /// Create a program from a complete code block, header included.
    ///
    /// Fails when the header is missing or announces more instructions than
    /// the block holds. Header words 1-3 are kept as given.
    pub fn from_code(
        code: Vec<u32>,
        integers: Vec<i32>,
        floats: Vec<f32>,
        strings: Vec<String>,
    ) -> Result<Self, DecodeError> {
        if code.len() < HEADER_WORDS {
            return Err(DecodeError::TruncatedHeader(code.len()));
        }
        let count = code[0] as usize;
        let available = code.len() - HEADER_WORDS;
        if count > available {
            return Err(DecodeError::BlockOverrun {
                block: "code",
                needed: count,
                available,
            });
        }
        Ok(Self {
            code,
            integers,
            floats,
            strings,
        })
    }

    /// The whole code block, header included.
    pub fn code(&self) -> &[u32] {
        &self.code
    }

    /// Number of instructions announced by the header.
    pub fn instruction_count(&self) -> usize {
        self.code[0] as usize
    }

    /// The instruction words, header excluded.
    pub fn instructions(&self) -> &[u32] {
        &self.code[HEADER_WORDS..HEADER_WORDS + self.instruction_count()]
    }

    pub fn integers(&self) -> &[i32] {
        &self.integers
    }

    pub fn floats(&self) -> &[f32] {
        &self.floats
    }

    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    /// Integer literal at `index`, if in range.
    pub fn integer(&self, index: i32) -> Option<i32> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.integers.get(i))
            .copied()
    }

    /// Float literal at `index`, if in range.
    pub fn float(&self, index: i32) -> Option<f32> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.floats.get(i))
            .copied()
    }

    /// String literal at `index`, if in range.
    pub fn string(&self, index: i32) -> Option<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.strings.get(i))
            .map(String::as_str)
    }

    /// Encode to the packed form.
    ///
    /// Header words 1-3 are recomputed from the literal pools, so a program
    /// built with [`Program::from_code`] and a non-standard header encodes
    /// with a standard one.
    pub fn encode(&self) -> Vec<u8> {
        let string_bytes = string_block(&self.strings);
        let instructions = self.instructions();

        let mut words = Vec::with_capacity(
            HEADER_WORDS + instructions.len() + self.integers.len() + self.floats.len(),
        );
        words.push(instructions.len() as u32);
        words.push(self.integers.len() as u32);
        words.push(self.floats.len() as u32);
        words.push((string_bytes.len() / 4) as u32);
        words.extend_from_slice(instructions);
        words.extend(self.integers.iter().map(|&i| i as u32));
        words.extend(self.floats.iter().map(|f| f.to_bits()));

        let mut bytes = Vec::with_capacity(words.len() * 4 + string_bytes.len());
        for word in words {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        bytes.extend_from_slice(&string_bytes);
        bytes
    }

    /// Decode a program from the packed form.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if !bytes.len().is_multiple_of(4) {
            return Err(DecodeError::InvalidLength(bytes.len()));
        }
        let total_words = bytes.len() / 4;
        if total_words < HEADER_WORDS {
            return Err(DecodeError::TruncatedHeader(total_words));
        }

        let word_at = |i: usize| {
            u32::from_le_bytes([
                bytes[i * 4],
                bytes[i * 4 + 1],
                bytes[i * 4 + 2],
                bytes[i * 4 + 3],
            ])
        };

        let count = word_at(0) as usize;
        let int_words = word_at(1) as usize;
        let float_words = word_at(2) as usize;
        let string_words = word_at(3) as usize;

        let mut cursor = HEADER_WORDS;
        let mut take = |block: &'static str, needed: usize| {
            let available = total_words - cursor;
            if needed > available {
                return Err(DecodeError::BlockOverrun {
                    block,
                    needed,
                    available,
                });
            }
            let start = cursor;
            cursor += needed;
            Ok(start..cursor)
        };

        let code_range = take("code", count)?;
        let int_range = take("integer", int_words)?;
        let float_range = take("float", float_words)?;
        let string_range = take("string", string_words)?;

        let trailing = total_words - string_range.end;
        if trailing > 0 {
            return Err(DecodeError::TrailingData(trailing));
        }

        let mut code = Vec::with_capacity(HEADER_WORDS + count);
        code.extend([
            count as u32,
            int_words as u32,
            float_words as u32,
            string_words as u32,
        ]);
        code.extend(code_range.map(word_at));
        let integers = int_range.map(|i| word_at(i) as i32).collect();
        let floats = float_range.map(|i| f32::from_bits(word_at(i))).collect();
        let strings = split_strings(&bytes[string_range.start * 4..string_range.end * 4])?;

        Ok(Self {
            code,
            integers,
            floats,
            strings,
        })
    }
}

/// Concatenated NUL-terminated strings, zero-padded to whole words.
fn string_block(strings: &[String]) -> Vec<u8> {
    let mut block = Vec::new();
    for s in strings {
        block.extend_from_slice(s.as_bytes());
        block.push(0);
    }
    while !block.len().is_multiple_of(4) {
        block.push(0);
    }
    block
}

fn string_block_words(strings: &[String]) -> usize {
    let bytes: usize = strings.iter().map(|s| s.len() + 1).sum();
    bytes.div_ceil(4)
}

/// Split a string block back into literals.
///
/// Zero bytes after the last terminator are padding, so a trailing empty
/// literal whose terminator lands in the final padding word is not
/// recoverable.
fn split_strings(block: &[u8]) -> Result<Vec<String>, DecodeError> {
    let mut strings = Vec::new();
    let mut offset = 0;
    while offset < block.len() {
        let rest = &block[offset..];
        if rest.len() < 4 && rest.iter().all(|&b| b == 0) {
            break;
        }
        let Some(len) = rest.iter().position(|&b| b == 0) else {
            return Err(DecodeError::UnterminatedString(offset));
        };
        let text = std::str::from_utf8(&rest[..len])
            .map_err(|_| DecodeError::InvalidString(offset))?;
        strings.push(text.to_string());
        offset += len + 1;
    }
    Ok(strings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Instruction;
    use crate::opcode::Opcode;

    fn word(op: Opcode, arg: u32) -> u32 {
        Instruction::from_opcode(op, arg).unwrap().encode()
    }

    #[test]
    fn empty_program_has_header_only() {
        let program = Program::new(vec![]);
        assert_eq!(program.code(), &[0, 0, 0, 0]);
        assert_eq!(program.instruction_count(), 0);
        assert!(program.instructions().is_empty());
        assert_eq!(program.encode(), vec![0; 16]);
    }

    #[test]
    fn header_describes_literal_blocks() {
        let program = Program::with_literals(
            vec![word(Opcode::Return, 0)],
            vec![1, 2, 3],
            vec![0.5],
            vec!["abc".into(), "de".into()],
        );
        // "abc\0de\0" is 7 bytes, padded to 2 words.
        assert_eq!(&program.code()[..4], &[1, 3, 1, 2]);
        assert_eq!(program.instructions(), &[0xC800_0014]);
    }

    #[test]
    fn literal_accessors_bounds() {
        let program =
            Program::with_literals(vec![], vec![7], vec![1.25], vec!["Gold".into()]);
        assert_eq!(program.integer(0), Some(7));
        assert_eq!(program.integer(1), None);
        assert_eq!(program.integer(-1), None);
        assert_eq!(program.float(0), Some(1.25));
        assert_eq!(program.float(-3), None);
        assert_eq!(program.string(0), Some("Gold"));
        assert_eq!(program.string(1), None);
    }

    #[test]
    fn from_code_rejects_short_header() {
        assert_eq!(
            Program::from_code(vec![0, 0], vec![], vec![], vec![]),
            Err(DecodeError::TruncatedHeader(2))
        );
    }

    #[test]
    fn from_code_rejects_count_past_end() {
        assert_eq!(
            Program::from_code(vec![3, 0, 0, 0, 0xC800_0014], vec![], vec![], vec![]),
            Err(DecodeError::BlockOverrun {
                block: "code",
                needed: 3,
                available: 1
            })
        );
    }

    #[test]
    fn from_code_allows_slack_after_count() {
        let program =
            Program::from_code(vec![1, 0, 0, 0, 0xC800_0014, 0xDEAD], vec![], vec![], vec![])
                .unwrap();
        assert_eq!(program.instructions(), &[0xC800_0014]);
    }

    #[test]
    fn encode_layout_is_little_endian() {
        let program = Program::with_literals(
            vec![word(Opcode::PushInt, 5)],
            vec![-1],
            vec![1.0],
            vec!["hi".into()],
        );
        let bytes = program.encode();
        assert_eq!(bytes.len(), 9 * 4);
        assert_eq!(&bytes[0..4], &[1, 0, 0, 0]);
        assert_eq!(&bytes[16..20], &[5, 0, 0, 0]);
        assert_eq!(&bytes[20..24], &[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(&bytes[24..28], &1.0f32.to_bits().to_le_bytes());
        assert_eq!(&bytes[28..32], b"hi\0\0");
    }

    #[test]
    fn encode_decode_roundtrip() {
        let program = Program::with_literals(
            vec![word(Opcode::PushInt, 0), word(Opcode::FetchIntLiteral, 0)],
            vec![42, -7],
            vec![3.75, f32::NAN],
            vec!["first".into(), "".into(), "third".into()],
        );
        let decoded = Program::decode(&program.encode()).unwrap();
        assert_eq!(program, decoded);
    }

    #[test]
    fn decode_rejects_odd_length() {
        assert_eq!(Program::decode(&[0; 7]), Err(DecodeError::InvalidLength(7)));
    }

    #[test]
    fn decode_rejects_truncated_header() {
        assert_eq!(Program::decode(&[0; 8]), Err(DecodeError::TruncatedHeader(2)));
    }

    #[test]
    fn decode_rejects_block_overrun() {
        let mut bytes = Vec::new();
        for w in [0u32, 2, 0, 0, 9] {
            bytes.extend_from_slice(&w.to_le_bytes());
        }
        assert_eq!(
            Program::decode(&bytes),
            Err(DecodeError::BlockOverrun {
                block: "integer",
                needed: 2,
                available: 1
            })
        );
    }

    #[test]
    fn decode_rejects_trailing_words() {
        let mut bytes = Program::new(vec![]).encode();
        bytes.extend_from_slice(&[0; 8]);
        assert_eq!(Program::decode(&bytes), Err(DecodeError::TrailingData(2)));
    }

    #[test]
    fn decode_rejects_unterminated_string() {
        let mut bytes = Vec::new();
        for w in [0u32, 0, 0, 1] {
            bytes.extend_from_slice(&w.to_le_bytes());
        }
        bytes.extend_from_slice(b"abcd");
        assert_eq!(
            Program::decode(&bytes),
            Err(DecodeError::UnterminatedString(0))
        );
    }

    #[test]
    fn decode_rejects_non_utf8_string() {
        let mut bytes = Vec::new();
        for w in [0u32, 0, 0, 2] {
            bytes.extend_from_slice(&w.to_le_bytes());
        }
        // "ok", then "caf\xe9" as Windows-1252.
        bytes.extend_from_slice(b"ok\0caf\xe9\0");
        assert_eq!(
            Program::decode(&bytes),
            Err(DecodeError::InvalidString(3))
        );
    }

    #[test]
    fn equality_compares_float_bits() {
        let a = Program::with_literals(vec![], vec![], vec![f32::NAN], vec![]);
        let b = Program::with_literals(vec![], vec![], vec![f32::NAN], vec![]);
        let c = Program::with_literals(vec![], vec![], vec![0.0], vec![]);
        let d = Program::with_literals(vec![], vec![], vec![-0.0], vec![]);
        assert_eq!(a, b);
        assert_ne!(c, d);
    }
}
