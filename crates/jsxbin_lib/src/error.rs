use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsxbinError {
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    #[error("invalid JSXBIN header")]
    InvalidHeader,

    #[error("malformed packed byte 0x{byte:02x} at offset {offset}")]
    MalformedByte { byte: u8, offset: usize },

    #[error("unknown node marker 0x{marker:02x} at offset {offset}")]
    UnknownNodeMarker { marker: u8, offset: usize },

    #[error("unknown variant tag 0x{tag:02x} at offset {offset}")]
    UnknownVariantTag { tag: u8, offset: usize },

    #[error("reference to undefined symbol id {id} at offset {offset}")]
    UnknownSymbol { id: usize, offset: usize },

    #[error("malformed boolean marker 0x{marker:02x} at offset {offset}")]
    MalformedBoolean { marker: u8, offset: usize },

    #[error("malformed number {text:?} at offset {offset}")]
    MalformedNumber { text: String, offset: usize },

    #[error("unsupported code point {value} at offset {offset}")]
    UnsupportedCodePoint { value: i64, offset: usize },
}

impl JsxbinError {
    /// Byte offset into the body where decoding failed, if the error has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            JsxbinError::InvalidHeader => None,
            JsxbinError::UnexpectedEof { offset }
            | JsxbinError::MalformedByte { offset, .. }
            | JsxbinError::UnknownNodeMarker { offset, .. }
            | JsxbinError::UnknownVariantTag { offset, .. }
            | JsxbinError::UnknownSymbol { offset, .. }
            | JsxbinError::MalformedBoolean { offset, .. }
            | JsxbinError::MalformedNumber { offset, .. }
            | JsxbinError::UnsupportedCodePoint { offset, .. } => Some(*offset),
        }
    }
}
