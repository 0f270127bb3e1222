//! Parser for assembly tokens → instruction words and literal pool entries.

use crate::error::AsmError;
use crate::lexer::Token;
use mwscript_common::{Instruction, Opcode};

/// Result of parsing a single assembly line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParseResult {
    /// An instruction word, either from a mnemonic or `.word`.
    Word(u32),
    /// `.int`: append to the integer pool.
    Integer(i32),
    /// `.float`: append to the float pool.
    Float(f32),
    /// `.string`: append to the string pool.
    Str(String),
}

/// Parse the tokens of a single line.
///
/// Returns `Ok(None)` for blank lines (empty token list).
pub(crate) fn parse_line(
    tokens: &[Token],
    line_num: usize,
) -> Result<Option<ParseResult>, AsmError> {
    let Some(first) = tokens.first() else {
        return Ok(None);
    };
    let name = match first {
        Token::Ident(s) => s.as_str(),
        other => {
            return Err(AsmError::UnexpectedToken {
                line: line_num,
                token: describe(other),
            })
        }
    };
    let args = &tokens[1..];

    let result = match name {
        ".INT" => {
            let n = expect_number(args, line_num, ".int")?;
            let value = i32::try_from(n).map_err(|_| invalid_number(line_num, n))?;
            ParseResult::Integer(value)
        }
        ".FLOAT" => ParseResult::Float(expect_float(args, line_num)?),
        ".STRING" => match args.first() {
            Some(Token::Str(s)) => ParseResult::Str(s.clone()),
            Some(other) => {
                return Err(AsmError::UnexpectedToken {
                    line: line_num,
                    token: describe(other),
                })
            }
            None => {
                return Err(AsmError::MissingArgument {
                    line: line_num,
                    name: ".string",
                })
            }
        },
        ".WORD" => {
            let n = expect_number(args, line_num, ".word")?;
            let value = u32::try_from(n).map_err(|_| invalid_number(line_num, n))?;
            ParseResult::Word(value)
        }
        directive if directive.starts_with('.') => {
            return Err(AsmError::UnknownDirective {
                line: line_num,
                token: directive.to_string(),
            })
        }
        mnemonic => {
            let opcode =
                Opcode::from_mnemonic(mnemonic).ok_or_else(|| AsmError::UnknownMnemonic {
                    line: line_num,
                    token: mnemonic.to_string(),
                })?;
            return parse_instruction(opcode, args, line_num).map(Some);
        }
    };

    expect_end(&args[1..], line_num)?;
    Ok(Some(result))
}

fn parse_instruction(
    opcode: Opcode,
    args: &[Token],
    line_num: usize,
) -> Result<ParseResult, AsmError> {
    let value = if opcode.has_arg() {
        let value = expect_number(args, line_num, opcode.mnemonic())?;
        expect_end(&args[1..], line_num)?;
        value
    } else {
        expect_end(args, line_num)?;
        0
    };
    let out_of_range = || AsmError::ImmediateOutOfRange {
        line: line_num,
        opcode: opcode.mnemonic(),
        value,
        max: opcode.segment().max_arg(),
    };
    let arg = u32::try_from(value).map_err(|_| out_of_range())?;
    let instr = Instruction::from_opcode(opcode, arg).map_err(|_| out_of_range())?;
    Ok(ParseResult::Word(instr.encode()))
}

/// Extract an integer from the first argument.
fn expect_number(args: &[Token], line: usize, name: &'static str) -> Result<i64, AsmError> {
    match args.first() {
        Some(Token::Number(n)) => Ok(*n),
        Some(Token::Float(text)) => Err(AsmError::InvalidNumber {
            line,
            token: text.clone(),
        }),
        Some(other) => Err(AsmError::UnexpectedToken {
            line,
            token: describe(other),
        }),
        None => Err(AsmError::MissingArgument { line, name }),
    }
}

/// Extract a float from the first argument. `INF`, `-INF` and `NAN` are
/// accepted alongside numeric text.
fn expect_float(args: &[Token], line: usize) -> Result<f32, AsmError> {
    match args.first() {
        Some(Token::Number(n)) => Ok(*n as f32),
        Some(Token::Float(text)) => text.parse::<f32>().map_err(|_| AsmError::InvalidNumber {
            line,
            token: text.clone(),
        }),
        Some(Token::Ident(s)) if s == "INF" => Ok(f32::INFINITY),
        Some(Token::Ident(s)) if s == "NAN" => Ok(f32::NAN),
        Some(other) => Err(AsmError::UnexpectedToken {
            line,
            token: describe(other),
        }),
        None => Err(AsmError::MissingArgument {
            line,
            name: ".float",
        }),
    }
}

/// Check that there are no extra tokens.
fn expect_end(remaining: &[Token], line: usize) -> Result<(), AsmError> {
    if let Some(tok) = remaining.first() {
        return Err(AsmError::UnexpectedToken {
            line,
            token: describe(tok),
        });
    }
    Ok(())
}

fn invalid_number(line: usize, n: i64) -> AsmError {
    AsmError::InvalidNumber {
        line,
        token: n.to_string(),
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Ident(s) | Token::Float(s) => s.clone(),
        Token::Number(n) => n.to_string(),
        Token::Str(s) => format!("{s:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> Token {
        Token::Ident(s.to_string())
    }

    fn num(n: i64) -> Token {
        Token::Number(n)
    }

    fn word(opcode: Opcode, arg: u32) -> ParseResult {
        ParseResult::Word(Instruction::from_opcode(opcode, arg).unwrap().encode())
    }

    #[test]
    fn parse_empty_tokens() {
        assert!(parse_line(&[], 1).unwrap().is_none());
    }

    #[test]
    fn parse_zero_arg_opcode() {
        assert_eq!(
            parse_line(&[ident("ADD_INT")], 1).unwrap(),
            Some(word(Opcode::AddInt, 0))
        );
    }

    #[test]
    fn zero_arg_opcode_rejects_extra_args() {
        let err = parse_line(&[ident("ADD_INT"), num(5)], 1).unwrap_err();
        assert_eq!(
            err,
            AsmError::UnexpectedToken {
                line: 1,
                token: "5".to_string()
            }
        );
    }

    #[test]
    fn parse_one_arg_opcode() {
        assert_eq!(
            parse_line(&[ident("PUSH_INT"), num(42)], 1).unwrap(),
            Some(word(Opcode::PushInt, 42))
        );
        assert_eq!(
            parse_line(&[ident("MESSAGE_BOX"), num(2)], 1).unwrap(),
            Some(word(Opcode::MessageBox, 2))
        );
    }

    #[test]
    fn one_arg_opcode_requires_argument() {
        assert_eq!(
            parse_line(&[ident("JUMP_FORWARD")], 9).unwrap_err(),
            AsmError::MissingArgument {
                line: 9,
                name: "JUMP_FORWARD"
            }
        );
    }

    #[test]
    fn immediate_checked_against_segment_width() {
        assert_eq!(
            parse_line(&[ident("MESSAGE_BOX"), num(256)], 2).unwrap_err(),
            AsmError::ImmediateOutOfRange {
                line: 2,
                opcode: "MESSAGE_BOX",
                value: 256,
                max: 255
            }
        );
        assert_eq!(
            parse_line(&[ident("PUSH_INT"), num(-1)], 2).unwrap_err(),
            AsmError::ImmediateOutOfRange {
                line: 2,
                opcode: "PUSH_INT",
                value: -1,
                max: 0xFF_FFFF
            }
        );
    }

    #[test]
    fn unknown_mnemonic() {
        assert_eq!(
            parse_line(&[ident("FROB")], 3).unwrap_err(),
            AsmError::UnknownMnemonic {
                line: 3,
                token: "FROB".to_string()
            }
        );
    }

    #[test]
    fn literal_directives() {
        assert_eq!(
            parse_line(&[ident(".INT"), num(-7)], 1).unwrap(),
            Some(ParseResult::Integer(-7))
        );
        assert_eq!(
            parse_line(&[ident(".FLOAT"), Token::Float("0.5".to_string())], 1).unwrap(),
            Some(ParseResult::Float(0.5))
        );
        assert_eq!(
            parse_line(&[ident(".FLOAT"), num(3)], 1).unwrap(),
            Some(ParseResult::Float(3.0))
        );
        assert_eq!(
            parse_line(&[ident(".STRING"), Token::Str("hi".to_string())], 1).unwrap(),
            Some(ParseResult::Str("hi".to_string()))
        );
        assert_eq!(
            parse_line(&[ident(".WORD"), num(0xFC00_0001)], 1).unwrap(),
            Some(ParseResult::Word(0xFC00_0001))
        );
    }

    #[test]
    fn special_floats() {
        assert_eq!(
            parse_line(&[ident(".FLOAT"), ident("INF")], 1).unwrap(),
            Some(ParseResult::Float(f32::INFINITY))
        );
        assert_eq!(
            parse_line(&[ident(".FLOAT"), Token::Float("-INF".to_string())], 1).unwrap(),
            Some(ParseResult::Float(f32::NEG_INFINITY))
        );
        match parse_line(&[ident(".FLOAT"), ident("NAN")], 1).unwrap() {
            Some(ParseResult::Float(f)) => assert!(f.is_nan()),
            other => panic!("expected a float, got {other:?}"),
        }
    }

    #[test]
    fn int_directive_range() {
        assert_eq!(
            parse_line(&[ident(".INT"), num(1 << 31)], 6).unwrap_err(),
            AsmError::InvalidNumber {
                line: 6,
                token: "2147483648".to_string()
            }
        );
    }

    #[test]
    fn word_directive_range() {
        assert!(matches!(
            parse_line(&[ident(".WORD"), num(-1)], 1),
            Err(AsmError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn unknown_directive() {
        assert_eq!(
            parse_line(&[ident(".DATA")], 1).unwrap_err(),
            AsmError::UnknownDirective {
                line: 1,
                token: ".DATA".to_string()
            }
        );
    }

    #[test]
    fn directive_rejects_extra_args() {
        assert!(matches!(
            parse_line(&[ident(".INT"), num(1), num(2)], 1),
            Err(AsmError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn line_must_start_with_a_name() {
        assert!(matches!(
            parse_line(&[num(5)], 1),
            Err(AsmError::UnexpectedToken { .. })
        ));
    }
}
