use serde::{Deserialize, Serialize};

use crate::error::JsxbinError;
use crate::primitives::{ID_REFERENCE, decode_bool, decode_length, decode_string};
use crate::session::{Session, Version};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub identifier: String,
    /// Only carried by V2 streams; always false for V1.
    pub flag: bool,
}

pub fn decode_identifier(s: &mut Session<'_>) -> Result<String, JsxbinError> {
    let offset = s.position();
    let marker = s.pop_byte()?;
    if marker == ID_REFERENCE {
        let id = decode_length(s)?;
        return s.lookup_symbol(id, offset);
    }

    s.advance(1)?; // type marker
    let name = decode_string(s)?;
    let id = decode_length(s)?;
    s.add_symbol(id, name.clone());
    Ok(name)
}

pub fn decode_reference(s: &mut Session<'_>) -> Result<Reference, JsxbinError> {
    let identifier = decode_identifier(s)?;
    let flag = match s.version() {
        Version::V2 => decode_bool(s)?,
        Version::V1 => false,
    };
    Ok(Reference { identifier, flag })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::Encoder;

    #[test]
    fn definition_then_reference_resolve_to_same_name() {
        let mut e = Encoder::new();
        e.define("foo", 5).reference(5);
        let bytes = e.finish();
        let mut s = Session::new(&bytes, Version::V1);
        assert_eq!(decode_identifier(&mut s).unwrap(), "foo");
        assert_eq!(decode_identifier(&mut s).unwrap(), "foo");
        assert_eq!(s.remaining(), 0);
    }

    #[test]
    fn reference_to_undefined_id_fails() {
        let mut e = Encoder::new();
        e.define("foo", 5).reference(6);
        let bytes = e.finish();
        let mut s = Session::new(&bytes, Version::V1);
        decode_identifier(&mut s).unwrap();
        let start = s.position();
        assert_eq!(
            decode_identifier(&mut s),
            Err(JsxbinError::UnknownSymbol { id: 6, offset: start })
        );
    }

    #[test]
    fn reference_flag_depends_on_version() {
        let mut e = Encoder::new();
        e.define("x", 1).bool(true);
        let bytes = e.finish();

        let mut s = Session::new(&bytes, Version::V2);
        let r = decode_reference(&mut s).unwrap();
        assert_eq!(r, Reference { identifier: "x".into(), flag: true });
        assert_eq!(s.remaining(), 0);

        let mut s = Session::new(&bytes, Version::V1);
        let r = decode_reference(&mut s).unwrap();
        assert!(!r.flag);
        assert_eq!(s.remaining(), 1);
    }
}
