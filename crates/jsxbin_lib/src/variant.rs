use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::JsxbinError;
use crate::primitives::{NO_VARIANT, decode_bool, decode_number, decode_string};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    Null,
    Boolean(bool),
    /// Already rendered decimal text.
    Number(String),
    String(String),
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Null => write!(f, "null"),
            Variant::Boolean(b) => write!(f, "{b}"),
            Variant::Number(n) => write!(f, "{n}"),
            Variant::String(s) => write!(f, "\"{}\"", escape(s)),
        }
    }
}

pub fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
        .replace('\r', "\\r")
}

/// Decodes a tagged literal. The no-variant sentinel yields `None`.
pub fn decode_variant(s: &mut Session<'_>) -> Result<Option<Variant>, JsxbinError> {
    let offset = s.position();
    let tag = s.pop_byte()?;
    let v = match tag {
        NO_VARIANT => return Ok(None),
        b'a' | b'b' => Variant::Null,
        b'c' => Variant::Boolean(decode_bool(s)?),
        b'd' => Variant::Number(decode_number(s)?),
        b'e' => Variant::String(decode_string(s)?),
        _ => return Err(JsxbinError::UnknownVariantTag { tag, offset }),
    };
    Ok(Some(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::Encoder;
    use crate::session::Version;

    fn decode_all(bytes: &[u8]) -> Vec<Option<Variant>> {
        let mut s = Session::new(bytes, Version::V1);
        let mut out = Vec::new();
        while s.remaining() > 0 {
            out.push(decode_variant(&mut s).unwrap());
        }
        out
    }

    #[test]
    fn both_null_tags_render_null() {
        let vs = decode_all(b"abn");
        assert_eq!(vs, vec![Some(Variant::Null), Some(Variant::Null), None]);
        assert_eq!(vs[1].as_ref().unwrap().to_string(), "null");
    }

    #[test]
    fn booleans_and_numbers() {
        let mut e = Encoder::new();
        e.variant_bool(true).variant_bool(false).variant_number(-3.0).variant_number(1.25);
        let rendered: Vec<String> = decode_all(&e.finish())
            .into_iter()
            .map(|v| v.unwrap().to_string())
            .collect();
        assert_eq!(rendered, ["true", "false", "-3", "1.25"]);
    }

    #[test]
    fn malformed_boolean_is_an_error() {
        let mut s = Session::new(b"cq", Version::V1);
        assert_eq!(
            decode_variant(&mut s),
            Err(JsxbinError::MalformedBoolean { marker: b'q', offset: 1 })
        );
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let mut s = Session::new(b"g", Version::V1);
        assert_eq!(
            decode_variant(&mut s),
            Err(JsxbinError::UnknownVariantTag { tag: b'g', offset: 0 })
        );
    }

    #[test]
    fn strings_escape_quote_and_newline_once() {
        let mut e = Encoder::new();
        e.variant_string("say \"hi\"\nnow");
        let v = decode_all(&e.finish()).remove(0).unwrap();
        assert_eq!(v.to_string(), r#""say \"hi\"\nnow""#);
    }

    #[test]
    fn escape_order_keeps_backslashes_single() {
        assert_eq!(escape("a\\b\t\r"), "a\\\\b\\t\\r");
        assert_eq!(escape("\\\""), "\\\\\\\"");
    }
}
