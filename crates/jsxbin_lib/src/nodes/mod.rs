use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::JsxbinError;
use crate::ident::Reference;
use crate::primitives::{NO_VARIANT, decode_length};
use crate::session::Session;
use crate::variant::Variant;

mod line_info;
mod parse;
mod render;
mod signature;

pub use line_info::{LineInfo, decode_line_info};
pub use signature::{FunctionSignature, PARAMETER_FLAG, decode_signature};

/// Every valid node marker. Matching is by value; the order carries no meaning.
pub const NODE_MARKERS: &[u8; 44] = b"RAQSCdGHiIJLaKEMNjVOTPDUBXWYZkbcefghsFlmroqp";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    ArgumentList,
    ArrayExpr,
    ArrayIndexingExpr,
    AssignmentExpr,
    BinaryExpr,
    CommaExpr,
    ConditionalExpr,
    DebuggerStatement,
    DeleteExpr,
    DoWhileExpr,
    ExprStatement,
    ForInStatement,
    ForStatement,
    FunctionCallExpr,
    FunctionDeclaration,
    FunctionExpr,
    GetterSetterMethodExpr,
    IdNode,
    IdRefExpr,
    IfStatement,
    IncrementExpr,
    IndexingIncrementExpr,
    JumpStatement,
    LogicalExpr,
    MemberAssignmentExpr,
    MemberExpr,
    ObjectExpr,
    RegExpLiteral,
    ReturnStatement,
    SetDefaultXmlNamespaceExpr,
    StatementList,
    SwitchStatement,
    ThisExpr,
    ThrowStatement,
    TryStatement,
    UnaryExpr,
    GroupingExpr,
    ValueNode,
    WhileStatement,
    WithStatement,
    XmlAccessorExpr,
    XmlAssignmentExpr,
    XmlDoubleDotDescendantsExpr,
    XmlNamespaceExpr,
}

impl NodeKind {
    pub fn from_marker(marker: u8) -> Option<NodeKind> {
        Some(match marker {
            b'R' => NodeKind::ArgumentList,
            b'A' => NodeKind::ArrayExpr,
            b'Q' => NodeKind::ArrayIndexingExpr,
            b'S' => NodeKind::AssignmentExpr,
            b'C' => NodeKind::BinaryExpr,
            b'd' => NodeKind::CommaExpr,
            b'G' => NodeKind::ConditionalExpr,
            b'H' => NodeKind::DebuggerStatement,
            b'i' => NodeKind::DeleteExpr,
            b'I' => NodeKind::DoWhileExpr,
            b'J' => NodeKind::ExprStatement,
            b'L' => NodeKind::ForInStatement,
            b'a' => NodeKind::ForStatement,
            b'K' => NodeKind::FunctionCallExpr,
            b'E' => NodeKind::FunctionDeclaration,
            b'M' => NodeKind::FunctionExpr,
            b'N' => NodeKind::GetterSetterMethodExpr,
            b'j' => NodeKind::IdNode,
            b'V' => NodeKind::IdRefExpr,
            b'O' => NodeKind::IfStatement,
            b'T' => NodeKind::IncrementExpr,
            b'P' => NodeKind::IndexingIncrementExpr,
            b'D' => NodeKind::JumpStatement,
            b'U' => NodeKind::LogicalExpr,
            b'B' => NodeKind::MemberAssignmentExpr,
            b'X' => NodeKind::MemberExpr,
            b'W' => NodeKind::ObjectExpr,
            b'Y' => NodeKind::RegExpLiteral,
            b'Z' => NodeKind::ReturnStatement,
            b'k' => NodeKind::SetDefaultXmlNamespaceExpr,
            b'b' => NodeKind::StatementList,
            b'c' => NodeKind::SwitchStatement,
            b'e' => NodeKind::ThisExpr,
            b'f' => NodeKind::ThrowStatement,
            b'g' => NodeKind::TryStatement,
            b'h' => NodeKind::UnaryExpr,
            b's' => NodeKind::GroupingExpr,
            b'F' => NodeKind::ValueNode,
            b'l' => NodeKind::WhileStatement,
            b'm' => NodeKind::WithStatement,
            b'r' => NodeKind::XmlAccessorExpr,
            b'o' => NodeKind::XmlAssignmentExpr,
            b'q' => NodeKind::XmlDoubleDotDescendantsExpr,
            b'p' => NodeKind::XmlNamespaceExpr,
            _ => return None,
        })
    }

    pub fn marker(self) -> u8 {
        match self {
            NodeKind::ArgumentList => b'R',
            NodeKind::ArrayExpr => b'A',
            NodeKind::ArrayIndexingExpr => b'Q',
            NodeKind::AssignmentExpr => b'S',
            NodeKind::BinaryExpr => b'C',
            NodeKind::CommaExpr => b'd',
            NodeKind::ConditionalExpr => b'G',
            NodeKind::DebuggerStatement => b'H',
            NodeKind::DeleteExpr => b'i',
            NodeKind::DoWhileExpr => b'I',
            NodeKind::ExprStatement => b'J',
            NodeKind::ForInStatement => b'L',
            NodeKind::ForStatement => b'a',
            NodeKind::FunctionCallExpr => b'K',
            NodeKind::FunctionDeclaration => b'E',
            NodeKind::FunctionExpr => b'M',
            NodeKind::GetterSetterMethodExpr => b'N',
            NodeKind::IdNode => b'j',
            NodeKind::IdRefExpr => b'V',
            NodeKind::IfStatement => b'O',
            NodeKind::IncrementExpr => b'T',
            NodeKind::IndexingIncrementExpr => b'P',
            NodeKind::JumpStatement => b'D',
            NodeKind::LogicalExpr => b'U',
            NodeKind::MemberAssignmentExpr => b'B',
            NodeKind::MemberExpr => b'X',
            NodeKind::ObjectExpr => b'W',
            NodeKind::RegExpLiteral => b'Y',
            NodeKind::ReturnStatement => b'Z',
            NodeKind::SetDefaultXmlNamespaceExpr => b'k',
            NodeKind::StatementList => b'b',
            NodeKind::SwitchStatement => b'c',
            NodeKind::ThisExpr => b'e',
            NodeKind::ThrowStatement => b'f',
            NodeKind::TryStatement => b'g',
            NodeKind::UnaryExpr => b'h',
            NodeKind::GroupingExpr => b's',
            NodeKind::ValueNode => b'F',
            NodeKind::WhileStatement => b'l',
            NodeKind::WithStatement => b'm',
            NodeKind::XmlAccessorExpr => b'r',
            NodeKind::XmlAssignmentExpr => b'o',
            NodeKind::XmlDoubleDotDescendantsExpr => b'q',
            NodeKind::XmlNamespaceExpr => b'p',
        }
    }
}

pub type Child = Option<Box<Node>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub op: String,
    pub left: Child,
    pub right: Child,
    pub left_literal: Option<Variant>,
    pub right_literal: Option<Variant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: Child,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    /// `None` marks the default clause.
    pub tests: Child,
    pub body: Child,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Handler {
    pub binding: String,
    pub guard: Child,
    pub body: Child,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    ArgumentList(Vec<Node>),
    ArrayExpr { elements: Child },
    ArrayIndexingExpr { object: Child, index: Child },
    AssignmentExpr { target: Reference, value: Child, literal: Option<Variant>, declaration: bool },
    BinaryExpr(Operation),
    CommaExpr { expressions: Child },
    ConditionalExpr { test: Child, consequent: Child, alternate: Child },
    DebuggerStatement { line: LineInfo },
    DeleteExpr { target: Child },
    DoWhileExpr { body: LineInfo, condition: Child },
    ExprStatement { line: LineInfo },
    ForInStatement { body: LineInfo, variable: Child, object: Child, each: bool },
    ForStatement { body: LineInfo, init: Child, test: Child, update: Child },
    FunctionCallExpr { callee: Child, arguments: Child, construct: bool },
    FunctionDeclaration { body: LineInfo, signature: FunctionSignature },
    FunctionExpr { function: Child },
    GetterSetterMethodExpr { getter: bool, name: String, function: Child },
    IdNode { name: String, declared: bool },
    IdRefExpr { reference: Reference },
    IfStatement { body: LineInfo, test: Child, otherwise: Child },
    IncrementExpr { target: Reference, operation: i64, postfix: bool },
    IndexingIncrementExpr { target: Child, operation: i64, postfix: bool },
    JumpStatement { line: LineInfo, label: String, is_break: bool },
    LogicalExpr(Operation),
    MemberAssignmentExpr { target: Child, value: Child, literal: Option<Variant> },
    MemberExpr { member: Reference, object: Child },
    ObjectExpr { properties: Vec<Property> },
    RegExpLiteral { pattern: String, flags: String },
    ReturnStatement { line: LineInfo, value: Child },
    SetDefaultXmlNamespaceExpr { namespace: Child },
    StatementList { line: LineInfo, length: usize, statements: Vec<Node> },
    SwitchStatement { line: LineInfo, subject: Child, cases: Vec<Case> },
    ThisExpr,
    ThrowStatement { line: LineInfo, value: Child },
    TryStatement { body: LineInfo, handlers: Vec<Handler>, finalizer: Child },
    UnaryExpr { op: String, operand: Child, literal: Option<Variant> },
    GroupingExpr { inner: Child },
    ValueNode { value: Option<Variant> },
    WhileStatement { body: LineInfo, condition: Child },
    WithStatement { body: LineInfo, object: Child },
    XmlAccessorExpr { object: Child, name: String },
    XmlAssignmentExpr { target: Child, value: Child },
    XmlDoubleDotDescendantsExpr { object: Child, name: String },
    XmlNamespaceExpr { namespace: String, member: Child },
}

/// Decodes one node. The no-node sentinel and a tripped depth guard both yield `None`.
pub fn decode_node(s: &mut Session<'_>) -> Result<Option<Node>, JsxbinError> {
    let offset = s.position();
    let marker = s.pop_byte()?;
    if marker == NO_VARIANT {
        return Ok(None);
    }

    let kind = NodeKind::from_marker(marker).ok_or(JsxbinError::UnknownNodeMarker { marker, offset })?;

    if s.enter_node() {
        s.exit_node();
        depth_exceeded(offset, s.depth(), kind);
        return Ok(None);
    }

    trace!(offset, depth = s.depth(), ?kind, "decoding node");
    let node = Node::parse(kind, s);
    s.exit_node();
    node.map(Some)
}

#[cold]
fn depth_exceeded(offset: usize, depth: usize, kind: NodeKind) {
    warn!(offset, depth, ?kind, "node depth limit exceeded, dropping node");
}

pub(crate) fn decode_child(s: &mut Session<'_>) -> Result<Child, JsxbinError> {
    Ok(decode_node(s)?.map(Box::new))
}

pub fn decode_children(s: &mut Session<'_>) -> Result<Vec<Node>, JsxbinError> {
    let length = decode_length(s)?;
    let mut out = Vec::with_capacity(length.min(s.remaining()));
    for _ in 0..length {
        if let Some(node) = decode_node(s)? {
            out.push(node);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::encode::Encoder;
    use crate::session::Version;

    #[test]
    fn catalog_markers_map_to_distinct_kinds() {
        let kinds: HashSet<NodeKind> = NODE_MARKERS
            .iter()
            .map(|&m| NodeKind::from_marker(m).unwrap())
            .collect();
        assert_eq!(kinds.len(), NODE_MARKERS.len());
        for &m in NODE_MARKERS {
            assert_eq!(NodeKind::from_marker(m).unwrap().marker(), m);
        }
    }

    #[test]
    fn markers_outside_catalog_are_rejected() {
        for m in 0..=255u8 {
            if m != NO_VARIANT && !NODE_MARKERS.contains(&m) {
                assert_eq!(NodeKind::from_marker(m), None, "marker {m:#x}");
            }
        }
        let mut s = Session::new(b"Jz", Version::V1);
        assert_eq!(s.pop_byte().unwrap(), b'J');
        assert_eq!(
            decode_node(&mut s),
            Err(JsxbinError::UnknownNodeMarker { marker: b'z', offset: 1 })
        );
    }

    #[test]
    fn sentinel_is_absent_node() {
        let mut s = Session::new(b"n", Version::V1);
        assert_eq!(decode_node(&mut s).unwrap(), None);
        assert_eq!(s.remaining(), 0);
    }

    #[test]
    fn depth_guard_yields_absent_node() {
        let mut e = Encoder::new();
        for _ in 0..10 {
            e.marker(b'i');
        }
        e.marker(b'e');
        let bytes = e.finish();

        let mut s = Session::with_max_depth(&bytes, Version::V1, 4);
        let mut node = decode_node(&mut s).unwrap();
        let mut levels = 0;
        while let Some(Node::DeleteExpr { target }) = node {
            levels += 1;
            node = target.map(|b| *b);
        }
        assert_eq!(levels, 4);
        assert_eq!(node, None);
        assert_eq!(s.depth(), 0);
        // the guard stops consuming at the dropped node
        assert_eq!(s.position(), 5);
    }

    #[test]
    fn children_skip_absent_entries() {
        let mut e = Encoder::new();
        e.length(3).marker(b'e').no_node().marker(b'e');
        let bytes = e.finish();
        let mut s = Session::new(&bytes, Version::V1);
        assert_eq!(decode_children(&mut s).unwrap(), vec![Node::ThisExpr, Node::ThisExpr]);
    }
}
