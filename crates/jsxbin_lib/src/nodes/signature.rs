use serde::{Deserialize, Serialize};

use crate::error::JsxbinError;
use crate::ident::decode_identifier;
use crate::primitives::decode_length;
use crate::session::Session;

/// Symbol indices at or above this bit are parameters; the rest are locals.
pub const PARAMETER_FLAG: usize = 0x2000_0000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub start_line: usize,
    pub name: String,
    pub kind: usize,
    pub flags: usize,
    pub symbols: Vec<(String, usize)>,
    pub end_line: usize,
}

impl FunctionSignature {
    /// Parameter names in declaration order.
    pub fn parameters(&self) -> Vec<&str> {
        let mut params: Vec<(usize, &str)> = self
            .symbols
            .iter()
            .filter(|(_, idx)| *idx >= PARAMETER_FLAG)
            .map(|(name, idx)| (*idx, name.as_str()))
            .collect();
        params.sort_by_key(|(idx, _)| *idx);
        params.into_iter().map(|(_, name)| name).collect()
    }
}

pub fn decode_signature(s: &mut Session<'_>) -> Result<FunctionSignature, JsxbinError> {
    let start_line = decode_length(s)?;
    let name = decode_identifier(s)?;
    let kind = decode_length(s)?;
    let flags = decode_length(s)?;

    let count = decode_length(s)?;
    let mut symbols = Vec::with_capacity(count.min(s.remaining()));
    for _ in 0..count {
        let symbol = decode_identifier(s)?;
        let index = decode_length(s)?;
        symbols.push((symbol, index));
    }

    let end_line = decode_length(s)?;
    Ok(FunctionSignature { start_line, name, kind, flags, symbols, end_line })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::Encoder;
    use crate::session::Version;

    #[test]
    fn parameters_are_ordered_by_index_and_locals_dropped() {
        let mut e = Encoder::new();
        e.length(1).define("add", 0).length(0).length(0).length(3);
        e.define("b", 1).length(PARAMETER_FLAG + 1);
        e.define("tmp", 2).length(0);
        e.define("a", 3).length(PARAMETER_FLAG);
        e.length(4);
        let bytes = e.finish();

        let mut s = Session::new(&bytes, Version::V1);
        let sig = decode_signature(&mut s).unwrap();
        assert_eq!(sig.name, "add");
        assert_eq!(sig.start_line, 1);
        assert_eq!(sig.end_line, 4);
        assert_eq!(sig.parameters(), ["a", "b"]);
        assert_eq!(s.remaining(), 0);
    }
}
