use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod encode;
mod error;
pub mod ident;
pub mod nodes;
pub mod primitives;
pub mod session;
pub mod variant;

pub use error::JsxbinError;
pub use nodes::{Node, NodeKind, decode_node};
pub use session::{DEFAULT_MAX_DEPTH, Session, Version};

const HEADER_PREFIX: &[u8] = b"@JSXBIN@ES@";
const HEADER_V1: &[u8] = b"1.0@";
const HEADER_V2: &[u8] = b"2.0@";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecompileMode {
    /// Reconstructed script source.
    Source,
    /// Debug dump of the decoded tree.
    Tree,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecompileVersion {
    Auto,
    V1,
    V2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompileOptions {
    pub mode: DecompileMode,
    pub version: DecompileVersion,
    pub max_depth: usize,
}

impl Default for DecompileOptions {
    fn default() -> Self {
        Self {
            mode: DecompileMode::Source,
            version: DecompileVersion::Auto,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Reads the `@JSXBIN@ES@x.y@` header, returning the version and the body after it.
pub fn detect_version(input: &[u8]) -> Result<(Version, &[u8]), JsxbinError> {
    let rest = input.strip_prefix(HEADER_PREFIX).ok_or(JsxbinError::InvalidHeader)?;
    if let Some(body) = rest.strip_prefix(HEADER_V1) {
        Ok((Version::V1, body))
    } else if let Some(body) = rest.strip_prefix(HEADER_V2) {
        Ok((Version::V2, body))
    } else {
        Err(JsxbinError::InvalidHeader)
    }
}

/// Drops the line wrapping compilers insert into long bodies.
fn strip_whitespace(body: &[u8]) -> Vec<u8> {
    body.iter().copied().filter(|b| !b.is_ascii_whitespace()).collect()
}

/// Decodes the root node of a body. Bytes after the root are ignored.
pub fn parse_program(body: &[u8], version: Version, max_depth: usize) -> Result<Option<Node>, JsxbinError> {
    let mut s = Session::with_max_depth(body, version, max_depth);
    debug!(len = body.len(), ?version, max_depth, "decoding program");

    let root = decode_node(&mut s)?;
    if s.remaining() > 0 {
        debug!(trailing = s.remaining(), symbols = s.symbol_count(), "ignoring bytes after root node");
    }
    Ok(root)
}

pub fn decode_with_depth(body: &[u8], version: Version, max_depth: usize) -> Result<String, JsxbinError> {
    Ok(parse_program(body, version, max_depth)?
        .map(|root| root.render())
        .unwrap_or_default())
}

pub fn decode(body: &[u8], version: Version) -> Result<String, JsxbinError> {
    decode_with_depth(body, version, DEFAULT_MAX_DEPTH)
}

pub fn decompile_with_options(input: &[u8], options: DecompileOptions) -> Result<String, JsxbinError> {
    let (version, body) = match options.version {
        DecompileVersion::Auto => detect_version(input)?,
        forced => {
            // a forced version also accepts a bare body
            let body = detect_version(input).map(|(_, body)| body).unwrap_or(input);
            let version = if forced == DecompileVersion::V1 { Version::V1 } else { Version::V2 };
            (version, body)
        }
    };

    let body = strip_whitespace(body);
    match options.mode {
        DecompileMode::Source => decode_with_depth(&body, version, options.max_depth),
        DecompileMode::Tree => Ok(match parse_program(&body, version, options.max_depth)? {
            Some(root) => format!("{root:#?}\n"),
            None => String::new(),
        }),
    }
}

pub fn decompile(input: &[u8]) -> Result<String, JsxbinError> {
    decompile_with_options(input, DecompileOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_selects_version() {
        let (v, body) = detect_version(b"@JSXBIN@ES@1.0@e").unwrap();
        assert_eq!(v, Version::V1);
        assert_eq!(body, b"e");
        let (v, _) = detect_version(b"@JSXBIN@ES@2.0@e").unwrap();
        assert_eq!(v, Version::V2);
        assert_eq!(detect_version(b"@JSXBIN@ES@3.0@e"), Err(JsxbinError::InvalidHeader));
        assert_eq!(detect_version(b"e"), Err(JsxbinError::InvalidHeader));
    }

    #[test]
    fn whitespace_in_body_is_ignored() {
        assert_eq!(decompile(b"@JSXBIN@ES@2.0@\n  e\r\n").unwrap(), "this");
    }

    #[test]
    fn forced_version_accepts_bare_body() {
        let options = DecompileOptions { version: DecompileVersion::V1, ..Default::default() };
        assert_eq!(decompile_with_options(b"e", options).unwrap(), "this");
        assert_eq!(decompile(b"e"), Err(JsxbinError::InvalidHeader));
    }

    #[test]
    fn absent_root_renders_empty() {
        assert_eq!(decode(b"n", Version::V1).unwrap(), "");
    }

    #[test]
    fn tree_mode_dumps_nodes() {
        let options = DecompileOptions { mode: DecompileMode::Tree, ..Default::default() };
        assert_eq!(decompile_with_options(b"@JSXBIN@ES@2.0@e", options).unwrap(), "ThisExpr\n");
    }
}
