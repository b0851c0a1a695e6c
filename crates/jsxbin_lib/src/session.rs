use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::JsxbinError;

pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Version {
    V1,
    V2,
}

/// Decode state for one program: cursor, node depth and the symbol table.
///
/// The cursor only ever moves forward. Symbols are registered the first time
/// an identifier is defined and resolved by id on every later reference.
#[derive(Debug)]
pub struct Session<'a> {
    buf: &'a [u8],
    pos: usize,
    depth: usize,
    max_depth: usize,
    version: Version,
    symbols: HashMap<usize, String>,
}

impl<'a> Session<'a> {
    pub fn new(buf: &'a [u8], version: Version) -> Self {
        Self::with_max_depth(buf, version, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(buf: &'a [u8], version: Version, max_depth: usize) -> Self {
        Self {
            buf,
            pos: 0,
            depth: 0,
            max_depth,
            version,
            symbols: HashMap::new(),
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn peek(&self, offset: usize) -> Option<u8> {
        self.buf.get(self.pos + offset).copied()
    }

    pub fn pop_byte(&mut self) -> Result<u8, JsxbinError> {
        let v = self.peek(0).ok_or(JsxbinError::UnexpectedEof { offset: self.pos })?;
        self.pos += 1;
        Ok(v)
    }

    pub fn advance(&mut self, n: usize) -> Result<(), JsxbinError> {
        if self.remaining() < n {
            return Err(JsxbinError::UnexpectedEof { offset: self.buf.len() });
        }
        self.pos += n;
        Ok(())
    }

    /// Enters a node. Returns `true` when the depth limit is exceeded and the
    /// node must be abandoned; `exit_node` has to be called either way.
    pub fn enter_node(&mut self) -> bool {
        self.depth += 1;
        self.depth_exceeded()
    }

    pub fn exit_node(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth_exceeded(&self) -> bool {
        self.depth > self.max_depth
    }

    pub fn add_symbol(&mut self, id: usize, name: String) {
        self.symbols.entry(id).or_insert(name);
    }

    /// Resolves `id`; `offset` is where the referencing identifier starts.
    pub fn lookup_symbol(&self, id: usize, offset: usize) -> Result<String, JsxbinError> {
        self.symbols
            .get(&id)
            .cloned()
            .ok_or(JsxbinError::UnknownSymbol { id, offset })
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_and_peek_move_forward_only() {
        let mut s = Session::new(b"abc", Version::V1);
        assert_eq!(s.peek(1), Some(b'b'));
        assert_eq!(s.pop_byte().unwrap(), b'a');
        s.advance(1).unwrap();
        assert_eq!(s.position(), 2);
        assert_eq!(s.pop_byte().unwrap(), b'c');
        assert_eq!(s.pop_byte(), Err(JsxbinError::UnexpectedEof { offset: 3 }));
        assert_eq!(s.position(), 3);
    }

    #[test]
    fn advance_past_end_fails() {
        let mut s = Session::new(b"ab", Version::V2);
        assert!(s.advance(3).is_err());
        assert_eq!(s.position(), 0);
    }

    #[test]
    fn depth_guard_trips_past_maximum() {
        let mut s = Session::with_max_depth(b"", Version::V1, 2);
        assert!(!s.enter_node());
        assert!(!s.enter_node());
        assert!(s.enter_node());
        s.exit_node();
        assert!(!s.depth_exceeded());
        s.exit_node();
        s.exit_node();
        s.exit_node();
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn symbols_resolve_by_id() {
        let mut s = Session::new(b"", Version::V1);
        s.add_symbol(5, "foo".into());
        assert_eq!(s.lookup_symbol(5, 0).unwrap(), "foo");
        assert_eq!(
            s.lookup_symbol(6, 3),
            Err(JsxbinError::UnknownSymbol { id: 6, offset: 3 })
        );
        assert_eq!(s.symbol_count(), 1);
    }
}
