use super::{
    Case, Handler, Node, NodeKind, Operation, Property, decode_child, decode_children, decode_line_info,
    decode_signature,
};
use crate::error::JsxbinError;
use crate::ident::{decode_identifier, decode_reference};
use crate::primitives::{decode_bool, decode_length, decode_signed, decode_string};
use crate::session::Session;
use crate::variant::decode_variant;

type Parser = fn(&mut Session<'_>) -> Result<Node, JsxbinError>;

// One function per kind keeps the frame on the recursive path down to the
// fields of a single node.
impl NodeKind {
    fn parser(self) -> Parser {
        match self {
            NodeKind::ArgumentList => |s| Ok(Node::ArgumentList(decode_children(s)?)),
            NodeKind::ArrayExpr => |s| Ok(Node::ArrayExpr { elements: decode_child(s)? }),
            NodeKind::ArrayIndexingExpr => array_indexing,
            NodeKind::AssignmentExpr => assignment,
            NodeKind::BinaryExpr => |s| Ok(Node::BinaryExpr(decode_operation(s)?)),
            NodeKind::CommaExpr => |s| Ok(Node::CommaExpr { expressions: decode_child(s)? }),
            NodeKind::ConditionalExpr => conditional,
            NodeKind::DebuggerStatement => |s| Ok(Node::DebuggerStatement { line: decode_line_info(s)? }),
            NodeKind::DeleteExpr => |s| Ok(Node::DeleteExpr { target: decode_child(s)? }),
            NodeKind::DoWhileExpr => do_while,
            NodeKind::ExprStatement => |s| Ok(Node::ExprStatement { line: decode_line_info(s)? }),
            NodeKind::ForInStatement => for_in,
            NodeKind::ForStatement => for_loop,
            NodeKind::FunctionCallExpr => function_call,
            NodeKind::FunctionDeclaration => function_declaration,
            NodeKind::FunctionExpr => |s| Ok(Node::FunctionExpr { function: decode_child(s)? }),
            NodeKind::GetterSetterMethodExpr => getter_setter,
            NodeKind::IdNode => id_node,
            NodeKind::IdRefExpr => |s| Ok(Node::IdRefExpr { reference: decode_reference(s)? }),
            NodeKind::IfStatement => if_statement,
            NodeKind::IncrementExpr => increment,
            NodeKind::IndexingIncrementExpr => indexing_increment,
            NodeKind::JumpStatement => jump,
            NodeKind::LogicalExpr => |s| Ok(Node::LogicalExpr(decode_operation(s)?)),
            NodeKind::MemberAssignmentExpr => member_assignment,
            NodeKind::MemberExpr => member,
            NodeKind::ObjectExpr => object,
            NodeKind::RegExpLiteral => regexp,
            NodeKind::ReturnStatement => return_statement,
            NodeKind::SetDefaultXmlNamespaceExpr => {
                |s| Ok(Node::SetDefaultXmlNamespaceExpr { namespace: decode_child(s)? })
            }
            NodeKind::StatementList => statement_list,
            NodeKind::SwitchStatement => switch,
            NodeKind::ThisExpr => |_| Ok(Node::ThisExpr),
            NodeKind::ThrowStatement => throw,
            NodeKind::TryStatement => try_statement,
            NodeKind::UnaryExpr => unary,
            NodeKind::GroupingExpr => |s| Ok(Node::GroupingExpr { inner: decode_child(s)? }),
            NodeKind::ValueNode => |s| Ok(Node::ValueNode { value: decode_variant(s)? }),
            NodeKind::WhileStatement => while_loop,
            NodeKind::WithStatement => with,
            NodeKind::XmlAccessorExpr => xml_accessor,
            NodeKind::XmlAssignmentExpr => xml_assignment,
            NodeKind::XmlDoubleDotDescendantsExpr => xml_descendants,
            NodeKind::XmlNamespaceExpr => xml_namespace,
        }
    }
}

impl Node {
    /// Consumes the fields of a node whose marker has already been read.
    pub(crate) fn parse(kind: NodeKind, s: &mut Session<'_>) -> Result<Node, JsxbinError> {
        (kind.parser())(s)
    }
}

fn decode_operation(s: &mut Session<'_>) -> Result<Operation, JsxbinError> {
    let op = decode_identifier(s)?;
    let left = decode_child(s)?;
    let right = decode_child(s)?;
    let left_literal = decode_variant(s)?;
    let right_literal = decode_variant(s)?;
    Ok(Operation { op, left, right, left_literal, right_literal })
}

fn array_indexing(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let object = decode_child(s)?;
    let index = decode_child(s)?;
    Ok(Node::ArrayIndexingExpr { object, index })
}

fn assignment(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let target = decode_reference(s)?;
    let value = decode_child(s)?;
    let literal = decode_variant(s)?;
    let declaration = decode_bool(s)?;
    Ok(Node::AssignmentExpr { target, value, literal, declaration })
}

fn conditional(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let test = decode_child(s)?;
    let consequent = decode_child(s)?;
    let alternate = decode_child(s)?;
    Ok(Node::ConditionalExpr { test, consequent, alternate })
}

fn do_while(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let body = decode_line_info(s)?;
    let condition = decode_child(s)?;
    Ok(Node::DoWhileExpr { body, condition })
}

fn for_in(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let body = decode_line_info(s)?;
    let variable = decode_child(s)?;
    let object = decode_child(s)?;
    let each = decode_bool(s)?;
    Ok(Node::ForInStatement { body, variable, object, each })
}

fn for_loop(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let body = decode_line_info(s)?;
    let init = decode_child(s)?;
    let test = decode_child(s)?;
    let update = decode_child(s)?;
    Ok(Node::ForStatement { body, init, test, update })
}

fn function_call(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let callee = decode_child(s)?;
    let arguments = decode_child(s)?;
    let construct = decode_bool(s)?;
    Ok(Node::FunctionCallExpr { callee, arguments, construct })
}

fn function_declaration(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let body = decode_line_info(s)?;
    let signature = decode_signature(s)?;
    Ok(Node::FunctionDeclaration { body, signature })
}

fn getter_setter(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let getter = decode_bool(s)?;
    let name = decode_identifier(s)?;
    let function = decode_child(s)?;
    Ok(Node::GetterSetterMethodExpr { getter, name, function })
}

fn id_node(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let name = decode_identifier(s)?;
    let declared = decode_bool(s)?;
    Ok(Node::IdNode { name, declared })
}

fn if_statement(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let body = decode_line_info(s)?;
    let test = decode_child(s)?;
    let otherwise = decode_child(s)?;
    Ok(Node::IfStatement { body, test, otherwise })
}

fn increment(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let target = decode_reference(s)?;
    let operation = decode_signed(s)?;
    let postfix = decode_bool(s)?;
    Ok(Node::IncrementExpr { target, operation, postfix })
}

fn indexing_increment(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let target = decode_child(s)?;
    let operation = decode_signed(s)?;
    let postfix = decode_bool(s)?;
    Ok(Node::IndexingIncrementExpr { target, operation, postfix })
}

fn jump(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let line = decode_line_info(s)?;
    let label = decode_identifier(s)?;
    let is_break = decode_bool(s)?;
    Ok(Node::JumpStatement { line, label, is_break })
}

fn member_assignment(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let target = decode_child(s)?;
    let value = decode_child(s)?;
    let literal = decode_variant(s)?;
    Ok(Node::MemberAssignmentExpr { target, value, literal })
}

fn member(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let member = decode_reference(s)?;
    let object = decode_child(s)?;
    Ok(Node::MemberExpr { member, object })
}

fn object(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let count = decode_length(s)?;
    let mut properties = Vec::with_capacity(count.min(s.remaining()));
    for _ in 0..count {
        let name = decode_identifier(s)?;
        let value = decode_child(s)?;
        properties.push(Property { name, value });
    }
    Ok(Node::ObjectExpr { properties })
}

fn regexp(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let pattern = decode_string(s)?;
    let flags = decode_string(s)?;
    Ok(Node::RegExpLiteral { pattern, flags })
}

fn return_statement(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let line = decode_line_info(s)?;
    let value = decode_child(s)?;
    Ok(Node::ReturnStatement { line, value })
}

fn statement_list(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let line = decode_line_info(s)?;
    let length = decode_length(s)?;
    let statements = decode_children(s)?;
    Ok(Node::StatementList { line, length, statements })
}

fn switch(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let line = decode_line_info(s)?;
    let subject = decode_child(s)?;
    let count = decode_length(s)?;
    let mut cases = Vec::with_capacity(count.min(s.remaining()));
    for _ in 0..count {
        let tests = decode_child(s)?;
        let body = decode_child(s)?;
        cases.push(Case { tests, body });
    }
    Ok(Node::SwitchStatement { line, subject, cases })
}

fn throw(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let line = decode_line_info(s)?;
    let value = decode_child(s)?;
    Ok(Node::ThrowStatement { line, value })
}

fn try_statement(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let body = decode_line_info(s)?;
    let count = decode_length(s)?;
    let mut handlers = Vec::with_capacity(count.min(s.remaining()));
    for _ in 0..count {
        let binding = decode_identifier(s)?;
        let guard = decode_child(s)?;
        let body = decode_child(s)?;
        handlers.push(Handler { binding, guard, body });
    }
    let finalizer = decode_child(s)?;
    Ok(Node::TryStatement { body, handlers, finalizer })
}

fn unary(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let op = decode_identifier(s)?;
    let operand = decode_child(s)?;
    let literal = decode_variant(s)?;
    Ok(Node::UnaryExpr { op, operand, literal })
}

fn while_loop(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let body = decode_line_info(s)?;
    let condition = decode_child(s)?;
    Ok(Node::WhileStatement { body, condition })
}

fn with(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let body = decode_line_info(s)?;
    let object = decode_child(s)?;
    Ok(Node::WithStatement { body, object })
}

fn xml_accessor(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let object = decode_child(s)?;
    let name = decode_identifier(s)?;
    Ok(Node::XmlAccessorExpr { object, name })
}

fn xml_assignment(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let target = decode_child(s)?;
    let value = decode_child(s)?;
    Ok(Node::XmlAssignmentExpr { target, value })
}

fn xml_descendants(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let object = decode_child(s)?;
    let name = decode_identifier(s)?;
    Ok(Node::XmlDoubleDotDescendantsExpr { object, name })
}

fn xml_namespace(s: &mut Session<'_>) -> Result<Node, JsxbinError> {
    let namespace = decode_identifier(s)?;
    let member = decode_child(s)?;
    Ok(Node::XmlNamespaceExpr { namespace, member })
}
