//! Token scanners: strings, numbers, literals
//!
//! Each scanner looks at the front of the unconsumed buffer and either
//! produces a finished token plus the byte count it used, or reports that
//! the token is still incomplete (`Ok(None)`), leaving the buffer intact
//! so the caller can retry once more data arrives.

use memchr::memchr2;
use serde_json::{Number, Value};

use crate::error::{Error, Result};

/// Scan a string token starting at `data[0] == b'"'`.
///
/// Returns the unescaped text and the total bytes consumed including both
/// quotes. `base` is the absolute offset of `data[0]`, used for error
/// positions.
pub(super) fn scan_string(data: &[u8], base: u64) -> Result<Option<(String, usize)>> {
    debug_assert_eq!(data.first(), Some(&b'"'));
    let mut pos = 1;
    loop {
        let Some(found) = memchr2(b'"', b'\\', &data[pos..]) else {
            return Ok(None);
        };
        let at = pos + found;
        if data[at] == b'"' {
            let text = unescape(&data[1..at], base + 1)?;
            return Ok(Some((text, at + 1)));
        }
        // Backslash: the escaped byte must be present before we can decide
        // anything about it.
        if at + 1 >= data.len() {
            return Ok(None);
        }
        pos = at + 2;
    }
}

/// Decode the raw (quote-less) contents of a string token.
fn unescape(raw: &[u8], base: u64) -> Result<String> {
    let mut out: Vec<u8> = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let b = raw[i];
        if b < 0x20 {
            return Err(Error::syntax(
                format!("control byte 0x{b:02x} in string"),
                base + i as u64,
            ));
        }
        if b != b'\\' {
            out.push(b);
            i += 1;
            continue;
        }
        let Some(&esc) = raw.get(i + 1) else {
            return Err(Error::syntax("dangling escape in string", base + i as u64));
        };
        i += 2;
        match esc {
            b'"' => out.push(b'"'),
            b'\\' => out.push(b'\\'),
            b'/' => out.push(b'/'),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'u' => {
                let (ch, used) = unescape_unicode(raw, i, base)?;
                let mut utf8 = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
                i += used;
            }
            _ => {
                return Err(Error::syntax(
                    format!("invalid escape '\\{}'", esc as char),
                    base + i as u64 - 1,
                ));
            }
        }
    }
    String::from_utf8(out)
        .map_err(|_| Error::syntax("invalid UTF-8 sequence in string", base))
}

/// Decode `\uXXXX` (and a following low surrogate when needed) starting at
/// `raw[i]`, the first hex digit. Returns the character and the bytes used
/// beyond the `\u` prefix.
fn unescape_unicode(raw: &[u8], i: usize, base: u64) -> Result<(char, usize)> {
    let hi = read_hex4(raw, i, base)?;
    if (0xdc00..=0xdfff).contains(&hi) {
        return Err(Error::syntax("unpaired low surrogate", base + i as u64));
    }
    if (0xd800..=0xdbff).contains(&hi) {
        if raw.get(i + 4) != Some(&b'\\') || raw.get(i + 5) != Some(&b'u') {
            return Err(Error::syntax("unpaired high surrogate", base + i as u64));
        }
        let lo = read_hex4(raw, i + 6, base)?;
        if !(0xdc00..=0xdfff).contains(&lo) {
            return Err(Error::syntax("invalid low surrogate", base + i as u64));
        }
        let code = 0x10000 + ((hi - 0xd800) << 10) + (lo - 0xdc00);
        let ch = char::from_u32(code)
            .ok_or_else(|| Error::syntax("invalid surrogate pair", base + i as u64))?;
        return Ok((ch, 10));
    }
    let ch = char::from_u32(hi)
        .ok_or_else(|| Error::syntax("invalid unicode escape", base + i as u64))?;
    Ok((ch, 4))
}

fn read_hex4(raw: &[u8], i: usize, base: u64) -> Result<u32> {
    if raw.len() < i + 4 {
        return Err(Error::syntax("truncated unicode escape", base + i as u64));
    }
    let mut code = 0u32;
    for &b in &raw[i..i + 4] {
        let digit = match b {
            b'0'..=b'9' => u32::from(b - b'0'),
            b'a'..=b'f' => u32::from(b - b'a') + 10,
            b'A'..=b'F' => u32::from(b - b'A') + 10,
            _ => {
                return Err(Error::syntax(
                    format!("invalid hex digit 0x{b:02x} in unicode escape"),
                    base + i as u64,
                ));
            }
        };
        code = code * 16 + digit;
    }
    Ok(code)
}

/// Scan a number token starting at a digit or `-`.
///
/// A number can only be finalized once a non-number byte (or end of input)
/// bounds it; until then the token stays buffered.
pub(super) fn scan_number(data: &[u8], eof: bool, base: u64) -> Result<Option<(Value, usize)>> {
    let len = data
        .iter()
        .take_while(|b| matches!(b, b'-' | b'+' | b'.' | b'e' | b'E' | b'0'..=b'9'))
        .count();
    if len == data.len() && !eof {
        return Ok(None);
    }
    let token = &data[..len];
    if !valid_number(token) {
        return Err(Error::syntax("invalid number", base));
    }
    let text =
        std::str::from_utf8(token).map_err(|_| Error::syntax("invalid number", base))?;
    let is_float = token.iter().any(|b| matches!(b, b'.' | b'e' | b'E'));
    let number = if is_float {
        let parsed: f64 = text
            .parse()
            .map_err(|_| Error::syntax("invalid number", base))?;
        Number::from_f64(parsed).ok_or_else(|| Error::syntax("number out of range", base))?
    } else if let Ok(signed) = text.parse::<i64>() {
        Number::from(signed)
    } else if let Ok(unsigned) = text.parse::<u64>() {
        Number::from(unsigned)
    } else {
        // Integer wider than 64 bits; keep the magnitude as a float.
        let parsed: f64 = text
            .parse()
            .map_err(|_| Error::syntax("invalid number", base))?;
        Number::from_f64(parsed).ok_or_else(|| Error::syntax("number out of range", base))?
    };
    Ok(Some((Value::Number(number), len)))
}

/// Strict RFC 8259 number grammar.
fn valid_number(s: &[u8]) -> bool {
    let mut i = 0;
    if s.get(i) == Some(&b'-') {
        i += 1;
    }
    match s.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            while matches!(s.get(i), Some(b'0'..=b'9')) {
                i += 1;
            }
        }
        _ => return false,
    }
    if s.get(i) == Some(&b'.') {
        i += 1;
        if !matches!(s.get(i), Some(b'0'..=b'9')) {
            return false;
        }
        while matches!(s.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
    }
    if matches!(s.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(s.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        if !matches!(s.get(i), Some(b'0'..=b'9')) {
            return false;
        }
        while matches!(s.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
    }
    i == s.len()
}

/// Scan `true`, `false` or `null`, possibly split across chunks.
pub(super) fn scan_literal(data: &[u8], eof: bool, base: u64) -> Result<Option<(Value, usize)>> {
    let (expected, value): (&[u8], Value) = match data[0] {
        b't' => (b"true", Value::Bool(true)),
        b'f' => (b"false", Value::Bool(false)),
        _ => (b"null", Value::Null),
    };
    let have = data.len().min(expected.len());
    if data[..have] != expected[..have] {
        return Err(Error::syntax("invalid literal", base));
    }
    if have < expected.len() {
        return if eof {
            Err(Error::syntax("unexpected end of input", base + have as u64))
        } else {
            Ok(None)
        };
    }
    Ok(Some((value, expected.len())))
}
