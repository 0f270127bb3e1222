//! Message text formatting.
//!
//! Message boxes and reports pass their text through two stages. The first
//! replaces printf-style placeholders with values popped from the operand
//! stack:
//!
//! ```text
//! %[pad][width][.precision]conversion
//!
//! pad         '0' or ' ' (default ' ')
//! conversion  s S   string literal (pops its index)
//!             d i   integer
//!             f F   float, fixed notation
//!             e E   float, scientific notation
//!             g G   float, the shorter of standard and scientific
//! ```
//!
//! Output is right-aligned in `width` columns. Float precision defaults to
//! 6. Width and precision are clamped to [`MAX_FIELD`]. `%%` produces a
//! single `%`, and a `%` that does not start a placeholder is kept as is. The second stage expands escape tokens, see
//! [`crate::defines`].

use crate::defines::{fix_defines, DefinesMode};
use crate::error::RuntimeError;
use crate::runtime::Runtime;

/// Upper bound for a placeholder's width and precision.
pub const MAX_FIELD: usize = 4096;

/// Run both formatting stages over a message box or report text.
pub fn format_message(message: &str, runtime: &mut Runtime<'_>) -> Result<String, RuntimeError> {
    let text = substitute_placeholders(message, runtime)?;
    Ok(fix_defines(&text, DefinesMode::MessageBox, &*runtime.context()))
}

/// Replace placeholders with values popped from the stack, left to right.
pub fn substitute_placeholders(
    message: &str,
    runtime: &mut Runtime<'_>,
) -> Result<String, RuntimeError> {
    let chars: Vec<char> = message.chars().collect();
    let mut out = String::with_capacity(message.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.get(i) == Some(&'%') {
            out.push('%');
            i += 1;
            continue;
        }
        match Placeholder::parse(&chars[i..]) {
            Some((placeholder, consumed)) => {
                out.push_str(&placeholder.render(runtime)?);
                i += consumed;
            }
            None => out.push('%'),
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notation {
    Fixed,
    Scientific,
    Shortest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    String,
    Integer,
    Float(Notation),
}

/// One parsed placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub pad: char,
    pub width: Option<usize>,
    pub precision: Option<usize>,
    pub conversion: Conversion,
}

impl Placeholder {
    /// Parse a placeholder from the characters following a `%`. Returns the
    /// placeholder and the number of characters it spans.
    pub fn parse(rest: &[char]) -> Option<(Placeholder, usize)> {
        let mut j = 0;
        let mut pad = ' ';
        if let Some(&(c @ ('0' | ' '))) = rest.first() {
            pad = c;
            j = 1;
        }

        let mut width = None;
        while let Some(d) = rest.get(j).and_then(|c| c.to_digit(10)) {
            width = Some(accumulate(width.unwrap_or(0), d));
            j += 1;
        }

        let mut precision = None;
        if rest.get(j) == Some(&'.') {
            j += 1;
            let mut p = 0;
            while let Some(d) = rest.get(j).and_then(|c| c.to_digit(10)) {
                p = accumulate(p, d);
                j += 1;
            }
            precision = Some(p);
        }

        let conversion = match rest.get(j)? {
            's' | 'S' => Conversion::String,
            'd' | 'i' => Conversion::Integer,
            'f' | 'F' => Conversion::Float(Notation::Fixed),
            'e' | 'E' => Conversion::Float(Notation::Scientific),
            'g' | 'G' => Conversion::Float(Notation::Shortest),
            _ => return None,
        };
        Some((
            Placeholder {
                pad,
                width,
                precision,
                conversion,
            },
            j + 1,
        ))
    }

    /// Pop the placeholder's value and format it.
    pub fn render(&self, runtime: &mut Runtime<'_>) -> Result<String, RuntimeError> {
        let text = match self.conversion {
            Conversion::String => {
                let index = runtime.pop_integer()?;
                runtime.string_literal(index)?.to_string()
            }
            Conversion::Integer => runtime.pop_integer()?.to_string(),
            Conversion::Float(notation) => {
                let value = f64::from(runtime.pop()?.float());
                let precision = self.precision.unwrap_or(6);
                match notation {
                    Notation::Fixed => fixed(value, precision),
                    Notation::Scientific => scientific(value, precision),
                    Notation::Shortest => {
                        // Only the standard form is padded.
                        let standard = self.pad(general(value, precision));
                        let scientific = scientific(value, precision);
                        return Ok(if standard.len() < scientific.len() {
                            standard
                        } else {
                            scientific
                        });
                    }
                }
            }
        };
        Ok(self.pad(text))
    }

    fn pad(&self, text: String) -> String {
        let len = text.chars().count();
        match self.width {
            Some(width) if width > len => {
                let mut padded: String = std::iter::repeat(self.pad).take(width - len).collect();
                padded.push_str(&text);
                padded
            }
            _ => text,
        }
    }
}

fn accumulate(acc: usize, digit: u32) -> usize {
    (acc * 10 + digit as usize).min(MAX_FIELD)
}

fn non_finite(value: f64) -> Option<String> {
    if value.is_nan() {
        Some("nan".to_string())
    } else if value.is_infinite() {
        Some(if value < 0.0 { "-inf" } else { "inf" }.to_string())
    } else {
        None
    }
}

/// `precision` digits after the point.
pub(crate) fn fixed(value: f64, precision: usize) -> String {
    non_finite(value).unwrap_or_else(|| format!("{value:.precision$}"))
}

/// `d.ddde±XX` with `precision` digits after the point and at least two
/// exponent digits.
pub(crate) fn scientific(value: f64, precision: usize) -> String {
    if let Some(s) = non_finite(value) {
        return s;
    }
    let (mantissa, exponent) = split_exponent(&format!("{value:.precision$e}"));
    c_exponent(&mantissa, exponent)
}

/// `%g`-style: `precision` significant digits, scientific when the
/// exponent is below -4 or at least the precision, trailing zeros removed.
pub(crate) fn general(value: f64, precision: usize) -> String {
    if let Some(s) = non_finite(value) {
        return s;
    }
    let p = precision.max(1);
    let digits = p - 1;
    let (mantissa, exponent) = split_exponent(&format!("{value:.digits$e}"));
    if exponent < -4 || exponent >= p as i32 {
        c_exponent(strip_zeros(&mantissa), exponent)
    } else {
        let decimals = (p as i32 - 1 - exponent) as usize;
        strip_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn split_exponent(formatted: &str) -> (String, i32) {
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => (mantissa.to_string(), exponent.parse().unwrap_or(0)),
        None => (formatted.to_string(), 0),
    }
}

fn c_exponent(mantissa: &str, exponent: i32) -> String {
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
}

fn strip_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::runtime::Frame;
    use mwscript_common::{Program, Value};
    use std::cell::RefCell;

    struct NoHost;
    impl Context for NoHost {}

    fn format_with(
        message: &str,
        stack: &[Value],
        strings: &[&str],
    ) -> Result<String, RuntimeError> {
        let program = Program::with_literals(
            vec![],
            vec![],
            vec![],
            strings.iter().map(|s| s.to_string()).collect(),
        );
        let frame = RefCell::new(Frame::default());
        let mut host = NoHost;
        let mut runtime = Runtime::configure(&frame, &program, &mut host);
        for &value in stack {
            runtime.push(value);
        }
        substitute_placeholders(message, &mut runtime)
    }

    #[test]
    fn integer_and_string() {
        let out = format_with(
            "%s has %d gold",
            &[Value::from(7), Value::from(0)],
            &["Fargoth"],
        );
        // %s pops first, so the string index must be on top.
        assert_eq!(out, Ok("Fargoth has 7 gold".to_string()));
    }

    #[test]
    fn width_and_pad() {
        assert_eq!(format_with("[%5d]", &[Value::from(42)], &[]).unwrap(), "[   42]");
        assert_eq!(format_with("[%05d]", &[Value::from(42)], &[]).unwrap(), "[00042]");
        assert_eq!(format_with("[%1d]", &[Value::from(123)], &[]).unwrap(), "[123]");
    }

    #[test]
    fn float_notations() {
        let v = [Value::from(1234.5f32)];
        assert_eq!(format_with("%f", &v, &[]).unwrap(), "1234.500000");
        assert_eq!(format_with("%.1f", &v, &[]).unwrap(), "1234.5");
        assert_eq!(format_with("%.2e", &v, &[]).unwrap(), "1.23e+03");
        assert_eq!(format_with("%e", &[Value::from(0.001f32)], &[]).unwrap(), "1.000000e-03");
    }

    #[test]
    fn shortest_picks_the_shorter_form() {
        assert_eq!(format_with("%g", &[Value::from(0.5f32)], &[]).unwrap(), "0.5");
        assert_eq!(format_with("%g", &[Value::from(100.0f32)], &[]).unwrap(), "100");
        assert_eq!(format_with("%g", &[Value::from(1.0e-5f32)], &[]).unwrap(), "1e-05");
        // The padded standard form loses to the unpadded scientific one.
        assert_eq!(
            format_with("%20g", &[Value::from(0.5f32)], &[]).unwrap(),
            "5.000000e-01"
        );
    }

    #[test]
    fn non_finite_floats() {
        assert_eq!(fixed(f64::NAN, 2), "nan");
        assert_eq!(scientific(f64::INFINITY, 2), "inf");
        assert_eq!(general(f64::NEG_INFINITY, 2), "-inf");
    }

    #[test]
    fn general_formatting() {
        assert_eq!(general(0.0, 6), "0");
        assert_eq!(general(123456.0, 6), "123456");
        assert_eq!(general(1234567.0, 6), "1.23457e+06");
        assert_eq!(general(0.0001, 6), "0.0001");
        assert_eq!(general(0.00001, 6), "1e-05");
        assert_eq!(general(2.4, 0), "2");
    }

    #[test]
    fn percent_escape_and_verbatim_percent() {
        assert_eq!(format_with("100%%", &[], &[]).unwrap(), "100%");
        assert_eq!(format_with("%pcname %{x}", &[], &[]).unwrap(), "%pcname %{x}");
        assert_eq!(format_with("trailing %", &[], &[]).unwrap(), "trailing %");
    }

    #[test]
    fn placeholder_pops_are_checked() {
        assert_eq!(format_with("%d", &[], &[]), Err(RuntimeError::StackUnderflow));
        assert_eq!(
            format_with("%s", &[Value::from(3)], &[]),
            Err(RuntimeError::LiteralOutOfRange {
                kind: "string",
                index: 3
            })
        );
    }

    #[test]
    fn parse_reports_span() {
        let chars: Vec<char> = "08.3f rest".chars().collect();
        let (placeholder, consumed) = Placeholder::parse(&chars).unwrap();
        assert_eq!(consumed, 5);
        assert_eq!(placeholder.pad, '0');
        assert_eq!(placeholder.width, Some(8));
        assert_eq!(placeholder.precision, Some(3));
        assert_eq!(placeholder.conversion, Conversion::Float(Notation::Fixed));
        assert!(Placeholder::parse(&['x']).is_none());
        assert!(Placeholder::parse(&[]).is_none());
    }

    #[test]
    fn oversized_fields_are_clamped() {
        let chars: Vec<char> = "99999999999999999999999.70000f".chars().collect();
        let (placeholder, _) = Placeholder::parse(&chars).unwrap();
        assert_eq!(placeholder.width, Some(MAX_FIELD));
        assert_eq!(placeholder.precision, Some(MAX_FIELD));

        let wide = format_with("%99999999999999999999999d", &[Value::from(7)], &[]).unwrap();
        assert_eq!(wide.len(), MAX_FIELD);
        assert!(wide.ends_with(" 7"));

        let precise = format_with("%.70000f", &[Value::from(0.5f32)], &[]).unwrap();
        assert_eq!(precise.len(), 2 + MAX_FIELD);
        assert!(precise.starts_with("0.5000"));

        let general = format_with("%.70000g", &[Value::from(0.5f32)], &[]).unwrap();
        assert_eq!(general, "0.5");
        let scientific = format_with("%.70000e", &[Value::from(0.5f32)], &[]).unwrap();
        assert!(scientific.ends_with("e-01"));
    }
}
