//! Decoding of Java literal token text.
//!
//! These functions look at token text only. Context-dependent rules (a
//! decimal literal equal to `2^31` is legal only under a unary minus) are
//! applied by the caller; [`IntegerParse::MinValueMagnitude`] reports that
//! case instead of deciding it.

use std::ops::Range;

pub const INTEGER_TOO_LARGE: &str = "Integer number too large";
pub const LONG_TOO_LARGE: &str = "Long number too large";
pub const MALFORMED_FLOAT: &str = "Malformed floating point literal";
pub const FLOAT_TOO_LARGE: &str = "Floating point number too large";
pub const FLOAT_TOO_SMALL: &str = "Floating point number too small";
pub const UNCLOSED_CHAR: &str = "Unclosed character literal";
pub const EMPTY_CHAR: &str = "Empty character literal";
pub const ILLEGAL_ESCAPE_IN_CHAR: &str = "Illegal escape character in character literal";
pub const TOO_MANY_CHARS: &str = "Too many characters in character literal";
pub const ILLEGAL_LINE_END_IN_STRING: &str = "Illegal line end in string literal";
pub const ILLEGAL_ESCAPE_IN_STRING: &str = "Illegal escape character in string literal";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LiteralError {
    pub message: String,
    /// Byte range within the provided literal text (not file offsets).
    pub span: Range<usize>,
}

fn err(message: impl Into<String>, span: Range<usize>) -> LiteralError {
    LiteralError {
        message: message.into(),
        span,
    }
}

/// Result of decoding an integral literal's digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerParse {
    Value(i64),
    /// Decimal text whose magnitude is exactly `2^31` (int) or `2^63` (long).
    MinValueMagnitude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Width {
    Int,
    Long,
}

impl Width {
    fn bits(self) -> u32 {
        match self {
            Width::Int => 32,
            Width::Long => 64,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Width::Int => INTEGER_TOO_LARGE,
            Width::Long => LONG_TOO_LARGE,
        }
    }
}

pub fn parse_int_literal(text: &str) -> Result<IntegerParse, LiteralError> {
    parse_integral(text, Width::Int)
}

pub fn parse_long_literal(text: &str) -> Result<IntegerParse, LiteralError> {
    let body = text
        .strip_suffix(['l', 'L'])
        .ok_or_else(|| err(LONG_TOO_LARGE, 0..text.len()))?;
    parse_integral(body, Width::Long)
}

fn parse_integral(text: &str, width: Width) -> Result<IntegerParse, LiteralError> {
    let fail = || err(width.message(), 0..text.len());
    let (radix, digits) = split_radix(text);
    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    if digits.is_empty() && radix != 8 {
        return Err(fail());
    }

    if radix == 10 {
        let value: u64 = digits.parse().map_err(|_| fail())?;
        let min_magnitude = 1u64 << (width.bits() - 1);
        return match value.cmp(&min_magnitude) {
            std::cmp::Ordering::Less => Ok(IntegerParse::Value(value as i64)),
            std::cmp::Ordering::Equal => Ok(IntegerParse::MinValueMagnitude),
            std::cmp::Ordering::Greater => Err(fail()),
        };
    }

    let value = parse_digits(&digits, radix, width.bits()).ok_or_else(fail)?;
    Ok(IntegerParse::Value(match width {
        Width::Int => value as u32 as i32 as i64,
        Width::Long => value as i64,
    }))
}

fn split_radix(text: &str) -> (u32, &str) {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'0' {
        match bytes[1] {
            b'x' | b'X' => return (16, &text[2..]),
            b'b' | b'B' => return (2, &text[2..]),
            _ => return (8, &text[1..]),
        }
    }
    (10, text)
}

/// Parse digits of a power-of-two radix into at most `bits` bits.
fn parse_digits(digits: &str, radix: u32, bits: u32) -> Option<u64> {
    let bits_per_digit = radix.trailing_zeros();
    let mut value: u64 = 0;
    let mut used_bits = 0u32;
    for ch in digits.chars() {
        let digit = ch.to_digit(radix)? as u64;
        if used_bits == 0 && digit == 0 {
            continue;
        }
        if used_bits == 0 {
            used_bits = 64 - digit.leading_zeros();
        } else {
            used_bits += bits_per_digit;
        }
        if used_bits > bits {
            return None;
        }
        value = (value << bits_per_digit) | digit;
    }
    Some(value)
}

pub fn parse_float_literal(text: &str) -> Result<f32, LiteralError> {
    let body = text
        .strip_suffix(['f', 'F'])
        .ok_or_else(|| err(MALFORMED_FLOAT, 0..text.len()))?;
    let sanitized = sanitize_floating(body).ok_or_else(|| err(MALFORMED_FLOAT, 0..text.len()))?;
    if is_hex(&sanitized) {
        return parse_hex_floating(&sanitized)
            .map(|value| value as f32)
            .ok_or_else(|| err(MALFORMED_FLOAT, 0..text.len()));
    }
    sanitized
        .parse::<f32>()
        .map_err(|_| err(MALFORMED_FLOAT, 0..text.len()))
}

pub fn parse_double_literal(text: &str) -> Result<f64, LiteralError> {
    let body = text.strip_suffix(['d', 'D']).unwrap_or(text);
    let sanitized = sanitize_floating(body).ok_or_else(|| err(MALFORMED_FLOAT, 0..text.len()))?;
    if is_hex(&sanitized) {
        return parse_hex_floating(&sanitized).ok_or_else(|| err(MALFORMED_FLOAT, 0..text.len()));
    }
    sanitized
        .parse::<f64>()
        .map_err(|_| err(MALFORMED_FLOAT, 0..text.len()))
}

fn is_hex(text: &str) -> bool {
    text.starts_with("0x") || text.starts_with("0X")
}

/// Strip underscores; reject forms Rust's float parser would accept but Java
/// does not (`inf`, `NaN`, leading `+`).
fn sanitize_floating(text: &str) -> Option<String> {
    let first = text.chars().next()?;
    if !(first.is_ascii_digit() || first == '.') {
        return None;
    }
    if text.ends_with('_') {
        return None;
    }
    Some(text.chars().filter(|&c| c != '_').collect())
}

fn parse_hex_floating(text: &str) -> Option<f64> {
    let rest = &text[2..];
    let (mantissa, exponent) = rest.split_once(['p', 'P'])?;
    let exponent: i64 = exponent.parse().ok()?;
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut value: u64 = 0;
    let mut scale: i64 = 0;
    let mut sticky = false;
    for (idx, ch) in int_part.chars().chain(frac_part.chars()).enumerate() {
        let digit = ch.to_digit(16)? as u64;
        let fractional = idx >= int_part.len();
        if value >> 56 == 0 {
            value = (value << 4) | digit;
            if fractional {
                scale -= 4;
            }
        } else {
            sticky |= digit != 0;
            if !fractional {
                scale += 4;
            }
        }
    }
    if sticky {
        value |= 1;
    }

    let mut result = value as f64;
    let mut exp = exponent.saturating_add(scale);
    while exp > 1000 {
        result *= 2f64.powi(1000);
        exp -= 1000;
    }
    while exp < -1000 {
        result *= 2f64.powi(-1000);
        exp += 1000;
    }
    Some(result * 2f64.powi(exp as i32))
}

/// `true` when every mantissa digit of a floating literal is zero.
///
/// A literal such as `1e-400` decodes to zero; this tells the caller whether
/// that zero was written or produced by underflow.
pub fn is_fp_zero(text: &str) -> bool {
    let hex = is_hex(text);
    let body = if hex { &text[2..] } else { text };
    for ch in body.chars() {
        match ch {
            '0' | '.' | '_' => continue,
            'e' | 'E' if !hex => break,
            'p' | 'P' if hex => break,
            'f' | 'F' | 'd' | 'D' if !hex => break,
            _ if ch.is_ascii_hexdigit() && hex => return false,
            _ if ch.is_ascii_digit() => return false,
            _ => break,
        }
    }
    true
}

/// Decode Java escape sequences into UTF-16 code units.
///
/// Returns `None` on any malformed escape.
pub fn unescape(content: &str) -> Option<Vec<u16>> {
    let chars: Vec<char> = content.chars().collect();
    let mut out = Vec::with_capacity(chars.len());
    let mut idx = 0;
    while idx < chars.len() {
        let ch = chars[idx];
        if ch != '\\' {
            let mut buf = [0u16; 2];
            out.extend_from_slice(ch.encode_utf16(&mut buf));
            idx += 1;
            continue;
        }

        idx += 1;
        let next = *chars.get(idx)?;
        idx += 1;
        match next {
            'b' => out.push(0x08),
            't' => out.push(b'\t' as u16),
            'n' => out.push(b'\n' as u16),
            'f' => out.push(0x0C),
            'r' => out.push(b'\r' as u16),
            '"' => out.push(b'"' as u16),
            '\'' => out.push(b'\'' as u16),
            '\\' => out.push(b'\\' as u16),
            '0'..='7' => {
                let max_digits = if next <= '3' { 3 } else { 2 };
                let mut value = next.to_digit(8)?;
                let mut count = 1;
                while count < max_digits {
                    match chars.get(idx).and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            idx += 1;
                            count += 1;
                        }
                        None => break,
                    }
                }
                out.push(value as u16);
            }
            'u' => {
                while chars.get(idx) == Some(&'u') {
                    idx += 1;
                }
                let hex = chars.get(idx..idx + 4)?;
                if matches!(hex[0], '+' | '-') {
                    return None;
                }
                let mut value: u32 = 0;
                for c in hex {
                    value = (value << 4) | c.to_digit(16)?;
                }
                if value == 0x0A || value == 0x0D {
                    return None;
                }
                out.push(value as u16);
                idx += 4;
            }
            _ => return None,
        }
    }
    Some(out)
}

/// Decode a complete character literal (including quotes) to one UTF-16 unit.
pub fn unescape_char_literal(text: &str) -> Result<u16, LiteralError> {
    let full = 0..text.len();
    if text.len() < 2 || !text.ends_with('\'') || closing_quote_escaped(text) {
        return Err(err(UNCLOSED_CHAR, full));
    }
    let content = &text[1..text.len() - 1];
    if content.is_empty() {
        return Err(err(EMPTY_CHAR, full));
    }
    let units = unescape(content).ok_or_else(|| err(ILLEGAL_ESCAPE_IN_CHAR, full.clone()))?;
    match units.as_slice() {
        [] => Err(err(EMPTY_CHAR, full)),
        [unit] => Ok(*unit),
        _ => Err(err(TOO_MANY_CHARS, full)),
    }
}

/// Decode a complete string literal (including quotes) to UTF-16 units.
pub fn unescape_string_literal(text: &str) -> Result<Vec<u16>, LiteralError> {
    let full = 0..text.len();
    if text.len() < 2 || !text.ends_with('"') || closing_quote_escaped(text) {
        return Err(err(ILLEGAL_LINE_END_IN_STRING, full));
    }
    unescape(&text[1..text.len() - 1]).ok_or_else(|| err(ILLEGAL_ESCAPE_IN_STRING, full))
}

fn closing_quote_escaped(text: &str) -> bool {
    let body = &text.as_bytes()[1..text.len() - 1];
    body.iter().rev().take_while(|&&b| b == b'\\').count() % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_int_boundary() {
        assert_eq!(parse_int_literal("2147483647"), Ok(IntegerParse::Value(2147483647)));
        assert_eq!(parse_int_literal("2147483648"), Ok(IntegerParse::MinValueMagnitude));
        assert_eq!(parse_int_literal("2147483649").unwrap_err().message, INTEGER_TOO_LARGE);
        assert_eq!(parse_int_literal("1_000"), Ok(IntegerParse::Value(1000)));
    }

    #[test]
    fn radix_int_literals_use_full_width() {
        assert_eq!(parse_int_literal("0xFFFFFFFF"), Ok(IntegerParse::Value(-1)));
        assert_eq!(parse_int_literal("0x80000000"), Ok(IntegerParse::Value(i32::MIN as i64)));
        assert!(parse_int_literal("0x100000000").is_err());
        assert_eq!(parse_int_literal("037777777777"), Ok(IntegerParse::Value(-1)));
        assert!(parse_int_literal("040000000000").is_err());
        assert_eq!(parse_int_literal("0b101"), Ok(IntegerParse::Value(5)));
        assert_eq!(parse_int_literal("0"), Ok(IntegerParse::Value(0)));
        assert_eq!(parse_int_literal("00"), Ok(IntegerParse::Value(0)));
        assert!(parse_int_literal("09").is_err());
    }

    #[test]
    fn long_literals() {
        assert_eq!(
            parse_long_literal("9223372036854775808L"),
            Ok(IntegerParse::MinValueMagnitude)
        );
        assert_eq!(parse_long_literal("0xFFFFFFFFFFFFFFFFL"), Ok(IntegerParse::Value(-1)));
        assert_eq!(
            parse_long_literal("9223372036854775809L").unwrap_err().message,
            LONG_TOO_LARGE
        );
    }

    #[test]
    fn floating_literals() {
        assert_eq!(parse_double_literal("1.5"), Ok(1.5));
        assert_eq!(parse_double_literal("1e2d"), Ok(100.0));
        assert_eq!(parse_float_literal("2.5f"), Ok(2.5));
        assert_eq!(parse_double_literal("0x1.8p1"), Ok(3.0));
        assert_eq!(parse_double_literal("1e-400"), Ok(0.0));
        assert!(parse_double_literal("1e400").unwrap().is_infinite());
        assert!(parse_float_literal("1e40f").unwrap().is_infinite());
        assert!(parse_double_literal("0x1.8").is_err());
    }

    #[test]
    fn fp_zero_detection() {
        assert!(is_fp_zero("0.0"));
        assert!(is_fp_zero("0e10"));
        assert!(is_fp_zero("0x0p3"));
        assert!(!is_fp_zero("1e-400"));
        assert!(!is_fp_zero("0.001"));
    }

    #[test]
    fn escapes() {
        assert_eq!(unescape("a\\tb"), Some(vec![97, 9, 98]));
        assert_eq!(unescape("\\101"), Some(vec![65]));
        assert_eq!(unescape("\\477"), Some(vec![0o47, b'7' as u16]));
        assert_eq!(unescape("\\u0041"), Some(vec![65]));
        assert_eq!(unescape("\\uuu0041"), Some(vec![65]));
        assert_eq!(unescape("\\u000A"), None);
        assert_eq!(unescape("\\u+041"), None);
        assert_eq!(unescape("\\q"), None);
        assert_eq!(unescape("\\u00"), None);
    }

    #[test]
    fn char_literal_errors() {
        assert_eq!(unescape_char_literal("'a'"), Ok(97));
        assert_eq!(unescape_char_literal("'\\''"), Ok(39));
        assert_eq!(unescape_char_literal("'a").unwrap_err().message, UNCLOSED_CHAR);
        assert_eq!(unescape_char_literal("'").unwrap_err().message, UNCLOSED_CHAR);
        assert_eq!(unescape_char_literal("'\\'").unwrap_err().message, UNCLOSED_CHAR);
        assert_eq!(unescape_char_literal("''").unwrap_err().message, EMPTY_CHAR);
        assert_eq!(unescape_char_literal("'ab'").unwrap_err().message, TOO_MANY_CHARS);
        assert_eq!(
            unescape_char_literal("'\\x'").unwrap_err().message,
            ILLEGAL_ESCAPE_IN_CHAR
        );
    }

    #[test]
    fn string_literal_errors() {
        assert_eq!(unescape_string_literal("\"ok\""), Ok(vec![111, 107]));
        assert_eq!(
            unescape_string_literal("\"abc").unwrap_err().message,
            ILLEGAL_LINE_END_IN_STRING
        );
        assert_eq!(
            unescape_string_literal("\"ab\\\"").unwrap_err().message,
            ILLEGAL_LINE_END_IN_STRING
        );
        assert_eq!(
            unescape_string_literal("\"\\z\"").unwrap_err().message,
            ILLEGAL_ESCAPE_IN_STRING
        );
    }
}
