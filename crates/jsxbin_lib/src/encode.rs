//! Writer for the JSXBIN body encoding.
//!
//! Produces the byte forms the decoders consume. Handy for building
//! synthetic programs in tests and fuzzers; it is not a compiler.

use crate::primitives::{
    BOOL_FALSE, BOOL_TRUE, ID_REFERENCE, NEGATIVE_NUMBER, NO_VARIANT, NUMBER_2_BYTES, NUMBER_4_BYTES,
    NUMBER_8_BYTES, PAIR_ALPHABET, PAIR_BAND_START,
};

/// Marker byte written in front of an identifier definition.
pub const ID_DEFINITION: u8 = b'j';
/// Type marker following [`ID_DEFINITION`]; skipped by the decoder.
pub const ID_TYPE: u8 = ID_REFERENCE;

#[derive(Debug, Default, Clone)]
pub struct Encoder {
    out: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Vec<u8> {
        self.out
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.out.extend_from_slice(bytes);
        self
    }

    pub fn marker(&mut self, marker: u8) -> &mut Self {
        self.out.push(marker);
        self
    }

    pub fn no_node(&mut self) -> &mut Self {
        self.marker(NO_VARIANT)
    }

    pub fn byte(&mut self, v: u8) -> &mut Self {
        if v < 26 {
            self.out.push(b'A' + v);
        } else {
            self.out.push(PAIR_BAND_START + v / 32);
            self.out.push(PAIR_ALPHABET[(v % 32) as usize]);
        }
        self
    }

    pub fn raw_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        for &b in bytes {
            self.byte(b);
        }
        self
    }

    /// Writes the variable-width literal form. Magnitudes above 32 bits are truncated.
    pub fn integer(&mut self, v: i64) -> &mut Self {
        if v < 0 {
            self.out.push(NEGATIVE_NUMBER);
        }
        let magnitude = v.unsigned_abs();
        if magnitude < 256 {
            self.byte(magnitude as u8)
        } else if magnitude <= u16::MAX as u64 {
            self.out.push(NUMBER_2_BYTES);
            self.raw_bytes(&(magnitude as u16).to_le_bytes())
        } else {
            self.out.push(NUMBER_4_BYTES);
            self.raw_bytes(&(magnitude as u32).to_le_bytes())
        }
    }

    pub fn length(&mut self, n: usize) -> &mut Self {
        self.integer(n as i64)
    }

    /// Integral values within 32 bits use the literal form, anything else the 8-byte float.
    pub fn number(&mut self, v: f64) -> &mut Self {
        if v.fract() == 0.0 && v.abs() <= u32::MAX as f64 && !(v == 0.0 && v.is_sign_negative()) {
            return self.integer(v as i64);
        }
        self.out.push(NUMBER_8_BYTES);
        self.raw_bytes(&v.to_le_bytes())
    }

    pub fn string(&mut self, s: &str) -> &mut Self {
        self.length(s.chars().count());
        for c in s.chars() {
            self.integer(c as i64);
        }
        self
    }

    pub fn bool(&mut self, b: bool) -> &mut Self {
        self.marker(if b { BOOL_TRUE } else { BOOL_FALSE })
    }

    pub fn define(&mut self, name: &str, id: usize) -> &mut Self {
        self.out.push(ID_DEFINITION);
        self.out.push(ID_TYPE);
        self.string(name);
        self.length(id)
    }

    pub fn reference(&mut self, id: usize) -> &mut Self {
        self.out.push(ID_REFERENCE);
        self.length(id)
    }

    pub fn variant_null(&mut self) -> &mut Self {
        self.marker(b'a')
    }

    pub fn variant_bool(&mut self, b: bool) -> &mut Self {
        self.marker(b'c').bool(b)
    }

    pub fn variant_number(&mut self, v: f64) -> &mut Self {
        self.marker(b'd').number(v)
    }

    pub fn variant_string(&mut self, s: &str) -> &mut Self {
        self.marker(b'e').string(s)
    }

    pub fn no_variant(&mut self) -> &mut Self {
        self.marker(NO_VARIANT)
    }

    /// Line number, no child, no labels.
    pub fn bare_line(&mut self, line: usize) -> &mut Self {
        self.length(line).no_node().length(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_bytes_use_one_letter() {
        let mut e = Encoder::new();
        e.byte(0).byte(25).byte(26).byte(255);
        assert_eq!(e.finish(), b"AZganf".to_vec());
    }

    #[test]
    fn integers_pick_narrowest_width() {
        let mut e = Encoder::new();
        e.integer(3).integer(-3).integer(256);
        assert_eq!(e.finish(), b"DyD2AB".to_vec());
    }

    #[test]
    fn negative_zero_keeps_float_form() {
        let mut e = Encoder::new();
        e.number(-0.0);
        assert_eq!(e.finish()[0], NUMBER_8_BYTES);
    }
}
