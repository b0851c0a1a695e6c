use std::fmt;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::JsxbinError;
use crate::session::Session;

pub const NO_VARIANT: u8 = 0x6E;
pub const ID_REFERENCE: u8 = 0x7A;
pub const NEGATIVE_NUMBER: u8 = 0x79;
pub const NUMBER_8_BYTES: u8 = 0x38;
pub const NUMBER_4_BYTES: u8 = 0x34;
pub const NUMBER_2_BYTES: u8 = 0x32;
pub const BOOL_TRUE: u8 = 0x74;
pub const BOOL_FALSE: u8 = 0x66;

/// First bytes of a two-byte packed value, one band of 32 values each.
pub const PAIR_BAND_START: u8 = 0x67;
pub const PAIR_BAND_END: u8 = 0x6F;
pub const PAIR_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdef";

/// Code points above this cannot be expressed by the two-byte string encoding.
const MAX_CODE_POINT: i64 = 0x7FF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberWidth {
    Two,
    Four,
    Eight,
}

impl NumberWidth {
    pub fn len(self) -> usize {
        match self {
            NumberWidth::Two => 2,
            NumberWidth::Four => 4,
            NumberWidth::Eight => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Number,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Packed {
    Int(i64),
    Float(f64),
}

impl fmt::Display for Packed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Packed::Int(v) => write!(f, "{v}"),
            Packed::Float(v) if v.is_nan() => write!(f, "NaN"),
            Packed::Float(v) if v.is_infinite() => {
                write!(f, "{}Infinity", if *v < 0.0 { "-" } else { "" })
            }
            Packed::Float(v) => write!(f, "{v}"),
        }
    }
}

pub fn decode_byte(s: &mut Session<'_>) -> Result<u8, JsxbinError> {
    if s.depth_exceeded() {
        return Ok(0);
    }

    let offset = s.position();
    let first = s.pop_byte()?;
    if first.is_ascii_uppercase() {
        return Ok(first - b'A');
    }
    if !(PAIR_BAND_START..=PAIR_BAND_END).contains(&first) {
        return Err(JsxbinError::MalformedByte { byte: first, offset });
    }

    let offset = s.position();
    let second = s.pop_byte()?;
    let index = PAIR_ALPHABET
        .iter()
        .position(|&c| c == second)
        .ok_or(JsxbinError::MalformedByte { byte: second, offset })?;

    // the top band overflows past 255 and wraps
    Ok(((first - PAIR_BAND_START) as usize * 32 + index) as u8)
}

fn read_packed(s: &mut Session<'_>, width: NumberWidth, negative: bool) -> Result<Packed, JsxbinError> {
    let mut bytes = [0u8; 8];
    for b in bytes.iter_mut().take(width.len()) {
        *b = decode_byte(s)?;
    }

    let sign: i64 = if negative { -1 } else { 1 };
    Ok(match width {
        NumberWidth::Two => Packed::Int(LittleEndian::read_u16(&bytes[..2]) as i64 * sign),
        NumberWidth::Four => Packed::Int(LittleEndian::read_u32(&bytes[..4]) as i64 * sign),
        NumberWidth::Eight => Packed::Float(LittleEndian::read_f64(&bytes) * sign as f64),
    })
}

pub fn decode_number_primitive(s: &mut Session<'_>, width: NumberWidth, negative: bool) -> Result<String, JsxbinError> {
    Ok(read_packed(s, width, negative)?.to_string())
}

/// Decodes the variable-width literal encoding.
///
/// `Number` yields decimal text, `String` yields the single character whose
/// code point was encoded. Returns empty text once the depth limit is hit.
pub fn decode_literal_primitive(s: &mut Session<'_>, kind: LiteralKind) -> Result<String, JsxbinError> {
    if s.depth_exceeded() {
        return Ok(String::new());
    }

    let offset = s.position();
    let negative = s.peek(0) == Some(NEGATIVE_NUMBER);
    if negative {
        s.advance(1)?;
    }

    let value = match s.peek(0) {
        Some(NUMBER_4_BYTES) => {
            s.advance(1)?;
            read_packed(s, NumberWidth::Four, negative)?
        }
        Some(NUMBER_2_BYTES) => {
            s.advance(1)?;
            read_packed(s, NumberWidth::Two, negative)?
        }
        _ => {
            let b = decode_byte(s)? as i64;
            Packed::Int(if negative { -b } else { b })
        }
    };

    match (kind, value) {
        (LiteralKind::Number, v) => Ok(v.to_string()),
        (LiteralKind::String, Packed::Int(v)) => code_point_text(v, offset),
        (LiteralKind::String, Packed::Float(_)) => Err(JsxbinError::MalformedNumber {
            text: value.to_string(),
            offset,
        }),
    }
}

fn code_point_text(value: i64, offset: usize) -> Result<String, JsxbinError> {
    if !(0..=MAX_CODE_POINT).contains(&value) {
        return Err(JsxbinError::UnsupportedCodePoint { value, offset });
    }
    // every value in range is a valid scalar; two-byte UTF-8 above 0x7F
    char::from_u32(value as u32)
        .map(String::from)
        .ok_or(JsxbinError::UnsupportedCodePoint { value, offset })
}

pub fn decode_number(s: &mut Session<'_>) -> Result<String, JsxbinError> {
    if s.peek(0) == Some(NUMBER_8_BYTES) {
        s.advance(1)?;
        return decode_number_primitive(s, NumberWidth::Eight, false);
    }
    decode_literal_primitive(s, LiteralKind::Number)
}

pub fn decode_signed(s: &mut Session<'_>) -> Result<i64, JsxbinError> {
    let offset = s.position();
    let text = decode_literal_primitive(s, LiteralKind::Number)?;
    if text.is_empty() {
        return Ok(0);
    }
    text.parse::<i64>()
        .map_err(|_| JsxbinError::MalformedNumber { text, offset })
}

pub fn decode_length(s: &mut Session<'_>) -> Result<usize, JsxbinError> {
    Ok(decode_signed(s)?.unsigned_abs() as usize)
}

pub fn decode_bool(s: &mut Session<'_>) -> Result<bool, JsxbinError> {
    let offset = s.position();
    match s.pop_byte()? {
        BOOL_TRUE => Ok(true),
        BOOL_FALSE => Ok(false),
        marker => Err(JsxbinError::MalformedBoolean { marker, offset }),
    }
}

pub fn decode_string(s: &mut Session<'_>) -> Result<String, JsxbinError> {
    let length = decode_length(s)?;
    let mut out = String::with_capacity(length.min(s.remaining()));
    for _ in 0..length {
        out.push_str(&decode_literal_primitive(s, LiteralKind::String)?);
    }
    Ok(out)
}
