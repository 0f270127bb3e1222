//! Disassembler: program → canonical assembly text.
//!
//! Output is flat text, one item per line: the integer, float and string
//! pools in order as `.int`, `.float` and `.string` directives, then the
//! code. No indentation, no comments, no blank lines.

use mwscript_common::{Instruction, Program};

/// Disassemble a program into canonical assembly text.
pub fn disassemble(program: &Program) -> String {
    let mut lines = Vec::new();

    for value in program.integers() {
        lines.push(format!(".int {value}"));
    }
    for &value in program.floats() {
        lines.push(format!(".float {}", float_text(value)));
    }
    for value in program.strings() {
        lines.push(format!(".string {}", quote(value)));
    }
    for &word in program.instructions() {
        lines.push(instruction_text(word));
    }

    let mut result = lines.join("\n");
    if !result.is_empty() {
        result.push('\n');
    }
    result
}

/// Text for a single instruction word. Words that do not decode to a known
/// opcode are emitted as `.word`.
fn instruction_text(word: u32) -> String {
    let Some((instr, opcode)) = Instruction::decode(word)
        .ok()
        .and_then(|instr| instr.known_opcode().map(|op| (instr, op)))
    else {
        return format!(".word 0x{word:08x}");
    };
    if opcode.has_arg() {
        format!("{} {}", opcode.mnemonic(), instr.arg())
    } else {
        opcode.mnemonic().to_string()
    }
}

fn float_text(value: f32) -> String {
    if value.is_nan() {
        "NAN".to_string()
    } else if value == f32::INFINITY {
        "INF".to_string()
    } else if value == f32::NEG_INFINITY {
        "-INF".to_string()
    } else {
        format!("{value:?}")
    }
}

fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mwscript_common::Opcode;

    fn word(opcode: Opcode, arg: u32) -> u32 {
        Instruction::from_opcode(opcode, arg).unwrap().encode()
    }

    #[test]
    fn empty_program() {
        assert_eq!(disassemble(&Program::new(vec![])), "");
    }

    #[test]
    fn zero_arg_opcodes() {
        let program = Program::new(vec![word(Opcode::AddInt, 0), word(Opcode::Return, 0)]);
        assert_eq!(disassemble(&program), "ADD_INT\nRETURN\n");
    }

    #[test]
    fn one_arg_opcodes() {
        let program = Program::new(vec![
            word(Opcode::PushInt, 42),
            word(Opcode::JumpBackward, 3),
            word(Opcode::MessageBox, 2),
        ]);
        assert_eq!(
            disassemble(&program),
            "PUSH_INT 42\nJUMP_BACKWARD 3\nMESSAGE_BOX 2\n"
        );
    }

    #[test]
    fn unknown_words_become_raw() {
        let program = Program::new(vec![0xFC00_0001, 0xC800_FFFF]);
        assert_eq!(
            disassemble(&program),
            ".word 0xfc000001\n.word 0xc800ffff\n"
        );
    }

    #[test]
    fn literals_precede_code() {
        let program = Program::with_literals(
            vec![word(Opcode::PushInt, 0)],
            vec![-5],
            vec![2.5],
            vec!["hi".to_string()],
        );
        assert_eq!(
            disassemble(&program),
            ".int -5\n.float 2.5\n.string \"hi\"\nPUSH_INT 0\n"
        );
    }

    #[test]
    fn float_spellings() {
        assert_eq!(float_text(3.0), "3.0");
        assert_eq!(float_text(-0.0), "-0.0");
        assert_eq!(float_text(f32::INFINITY), "INF");
        assert_eq!(float_text(f32::NEG_INFINITY), "-INF");
        assert_eq!(float_text(f32::NAN), "NAN");
    }

    #[test]
    fn string_escapes() {
        assert_eq!(quote("a \"b\" \\ c\n\t"), r#""a \"b\" \\ c\n\t""#);
    }
}
