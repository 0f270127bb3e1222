//! Tokenizer for script assembly text.

use crate::error::AsmError;

/// A single token from an assembly line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    /// A mnemonic, directive or keyword. Always uppercase.
    Ident(String),
    /// An integer literal (decimal, optionally signed, or `0x` hex).
    Number(i64),
    /// A non-integer numeric literal, kept as written.
    Float(String),
    /// A quoted string with escapes resolved.
    Str(String),
}

/// Tokenize a single line of assembly text.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// Comments start with `;` outside a string and extend to end of line.
pub(crate) fn tokenize_line(line: &str, line_num: usize) -> Result<Vec<Token>, AsmError> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c == ';' {
            break;
        }
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '"' {
            chars.next();
            tokens.push(Token::Str(string_body(&mut chars, line_num)?));
            continue;
        }

        let mut end = line.len();
        while let Some(&(i, c)) = chars.peek() {
            if c.is_whitespace() || c == ';' || c == '"' {
                end = i;
                break;
            }
            chars.next();
        }
        tokens.push(word(&line[start..end], line_num)?);
    }

    Ok(tokens)
}

fn string_body(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    line_num: usize,
) -> Result<String, AsmError> {
    let mut text = String::new();
    while let Some((_, c)) = chars.next() {
        match c {
            '"' => return Ok(text),
            '\\' => {
                let escaped = match chars.next() {
                    Some((_, '"')) => '"',
                    Some((_, '\\')) => '\\',
                    Some((_, 'n')) => '\n',
                    Some((_, 't')) => '\t',
                    Some((_, 'r')) => '\r',
                    Some((_, other)) => {
                        return Err(AsmError::InvalidEscape {
                            line: line_num,
                            escape: other,
                        })
                    }
                    None => break,
                };
                text.push(escaped);
            }
            _ => text.push(c),
        }
    }
    Err(AsmError::UnterminatedString { line: line_num })
}

fn word(word: &str, line_num: usize) -> Result<Token, AsmError> {
    let invalid = || AsmError::InvalidNumber {
        line: line_num,
        token: word.to_string(),
    };

    if let Some(hex) = word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")) {
        let value = i64::from_str_radix(hex, 16).map_err(|_| invalid())?;
        return Ok(Token::Number(value));
    }

    let numeric = word
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));
    if !numeric {
        return Ok(Token::Ident(word.to_uppercase()));
    }
    if let Ok(value) = word.parse::<i64>() {
        return Ok(Token::Number(value));
    }
    if word.starts_with('.') && !word[1..].starts_with(|c: char| c.is_ascii_digit()) {
        return Ok(Token::Ident(word.to_uppercase()));
    }
    word.parse::<f64>().map_err(|_| invalid())?;
    Ok(Token::Float(word.to_string()))
}
