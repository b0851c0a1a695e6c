use serde::{Deserialize, Serialize};

use super::{Child, Node, decode_child};
use crate::error::JsxbinError;
use crate::ident::decode_identifier;
use crate::primitives::decode_length;
use crate::session::Session;

/// Source line, optional body and statement labels of a statement-shaped node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineInfo {
    pub line_number: usize,
    pub child: Child,
    pub labels: Vec<String>,
}

impl LineInfo {
    /// `label:` lines emitted in front of the statement.
    pub fn label_prefix(&self) -> String {
        self.labels.iter().map(|l| format!("{l}:\n")).collect()
    }

    pub fn body(&self) -> String {
        self.child.as_deref().map(Node::render).unwrap_or_default()
    }
}

pub fn decode_line_info(s: &mut Session<'_>) -> Result<LineInfo, JsxbinError> {
    let line_number = decode_length(s)?;
    let child = decode_child(s)?;

    let count = decode_length(s)?;
    let mut labels = Vec::with_capacity(count.min(s.remaining()));
    for _ in 0..count {
        labels.push(decode_identifier(s)?);
    }

    Ok(LineInfo { line_number, child, labels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::Encoder;
    use crate::session::Version;

    #[test]
    fn decodes_line_child_and_labels() {
        let mut e = Encoder::new();
        e.length(12).marker(b'e').length(2).define("outer", 0).define("inner", 1);
        let bytes = e.finish();
        let mut s = Session::new(&bytes, Version::V1);
        let info = decode_line_info(&mut s).unwrap();
        assert_eq!(info.line_number, 12);
        assert_eq!(info.child.as_deref(), Some(&Node::ThisExpr));
        assert_eq!(info.labels, ["outer", "inner"]);
        assert_eq!(info.label_prefix(), "outer:\ninner:\n");
        assert_eq!(info.body(), "this");
    }

    #[test]
    fn bare_line_has_no_prefix() {
        let mut e = Encoder::new();
        e.bare_line(3);
        let bytes = e.finish();
        let mut s = Session::new(&bytes, Version::V1);
        let info = decode_line_info(&mut s).unwrap();
        assert_eq!(info, LineInfo { line_number: 3, child: None, labels: vec![] });
        assert_eq!(info.label_prefix(), "");
    }
}
