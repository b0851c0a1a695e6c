use std::fmt;

use super::{Case, Child, FunctionSignature, Handler, LineInfo, Node, Operation, Property};
use crate::variant::{Variant, escape};

/// Operators whose same-operator right operands need no parentheses.
const ASSOCIATIVE_OPS: &[&str] = &["+", "*"];

fn text(child: &Child) -> String {
    child.as_deref().map(Node::render).unwrap_or_default()
}

fn child_or_literal(child: &Child, literal: &Option<Variant>) -> String {
    match (child, literal) {
        (Some(node), _) => node.render(),
        (None, Some(v)) => v.to_string(),
        (None, None) => String::new(),
    }
}

fn indent(body: &str) -> String {
    body.lines()
        .map(|l| if l.is_empty() { String::new() } else { format!("  {l}") })
        .collect::<Vec<_>>()
        .join("\n")
}

fn braced(body: &str) -> String {
    if body.is_empty() {
        "{\n}".to_string()
    } else {
        format!("{{\n{}\n}}", indent(body))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn property_key(name: &str) -> String {
    if is_identifier(name) || (!name.is_empty() && name.chars().all(|c| c.is_ascii_digit())) {
        name.to_string()
    } else {
        format!("\"{}\"", escape(name))
    }
}

fn parenthesized(t: String, wrap: bool) -> String {
    if wrap && !t.is_empty() { format!("({t})") } else { t }
}

/// Operands that would otherwise rebind inside a larger expression.
fn is_compound(node: &Node) -> bool {
    matches!(
        node,
        Node::BinaryExpr(_)
            | Node::LogicalExpr(_)
            | Node::ConditionalExpr { .. }
            | Node::AssignmentExpr { .. }
            | Node::MemberAssignmentExpr { .. }
            | Node::CommaExpr { .. }
            | Node::FunctionExpr { .. }
    )
}

fn grouped(node: &Node) -> String {
    parenthesized(node.render(), is_compound(node))
}

fn grouped_child(child: &Child) -> String {
    child.as_deref().map(grouped).unwrap_or_default()
}

/// Object of a member access, index or call: prefix operators, `new` and
/// number literals bind looser than the accessor that follows.
fn postfix_operand(child: &Child) -> String {
    let Some(node) = child.as_deref() else {
        return String::new();
    };
    let wrap = match node {
        Node::UnaryExpr { .. }
        | Node::IncrementExpr { .. }
        | Node::IndexingIncrementExpr { .. }
        | Node::DeleteExpr { .. } => true,
        Node::FunctionCallExpr { construct, .. } => *construct,
        Node::ValueNode { value: Some(Variant::Number(_)) } => true,
        other => is_compound(other),
    };
    parenthesized(node.render(), wrap)
}

/// `new` binds to the first argument list, so a callee holding a call is wrapped whole.
fn constructor_operand(child: &Child) -> String {
    match child.as_deref() {
        Some(node) if contains_call(node) => parenthesized(node.render(), true),
        _ => postfix_operand(child),
    }
}

fn contains_call(node: &Node) -> bool {
    match node {
        Node::FunctionCallExpr { .. } => true,
        Node::MemberExpr { object, .. }
        | Node::ArrayIndexingExpr { object, .. }
        | Node::XmlAccessorExpr { object, .. }
        | Node::XmlDoubleDotDescendantsExpr { object, .. } => object.as_deref().is_some_and(contains_call),
        _ => false,
    }
}

/// One entry of a comma-separated list, or the value side of an assignment.
fn list_item(node: &Node) -> String {
    parenthesized(node.render(), matches!(node, Node::CommaExpr { .. }))
}

fn assigned_value(value: &Child, literal: &Option<Variant>) -> String {
    match value.as_deref() {
        Some(node) => list_item(node),
        None => child_or_literal(&None, literal),
    }
}

fn function_text(name: &str, signature: &FunctionSignature, body: &LineInfo) -> String {
    let params = signature.parameters().join(", ");
    let head = if name.is_empty() { "function".to_string() } else { format!("function {name}") };
    format!("{head}({params}) {}", braced(&body.body()))
}

/// Signature and body of a function node, looking through a function expression.
fn function_parts(node: &Node) -> Option<(&FunctionSignature, &LineInfo)> {
    match node {
        Node::FunctionDeclaration { body, signature } => Some((signature, body)),
        Node::FunctionExpr { function } => function.as_deref().and_then(function_parts),
        _ => None,
    }
}

impl Operation {
    fn operand(&self, child: &Child, literal: &Option<Variant>) -> String {
        match child.as_deref() {
            Some(node @ (Node::BinaryExpr(inner) | Node::LogicalExpr(inner))) => {
                let associative = inner.op == self.op && ASSOCIATIVE_OPS.contains(&self.op.as_str());
                parenthesized(node.render(), !associative)
            }
            Some(node) => grouped(node),
            None => child_or_literal(&None, literal),
        }
    }

    pub fn render(&self) -> String {
        let left = self.operand(&self.left, &self.left_literal);
        let right = self.operand(&self.right, &self.right_literal);
        if left.is_empty() || right.is_empty() {
            left + &right
        } else {
            format!("{left} {} {right}", self.op)
        }
    }
}

// Each kind renders in its own function so the recursive path only holds the
// temporaries of one template.
impl Node {
    pub fn render(&self) -> String {
        match self {
            Node::ArgumentList(args) => args.iter().map(list_item).collect::<Vec<_>>().join(", "),
            Node::ArrayExpr { elements } => format!("[{}]", text(elements)),
            Node::ArrayIndexingExpr { object, index } => format!("{}[{}]", postfix_operand(object), text(index)),
            Node::AssignmentExpr { target, value, literal, declaration } => {
                let lhs = if *declaration { format!("var {}", target.identifier) } else { target.identifier.clone() };
                assignment(lhs, assigned_value(value, literal))
            }
            Node::BinaryExpr(op) | Node::LogicalExpr(op) => op.render(),
            Node::CommaExpr { expressions } => text(expressions),
            Node::ConditionalExpr { test, consequent, alternate } => conditional(test, consequent, alternate),
            Node::DebuggerStatement { line } => format!("{}debugger;", line.label_prefix()),
            Node::DeleteExpr { target } => format!("delete {}", grouped_child(target)),
            Node::DoWhileExpr { body, condition } => do_while(body, condition),
            Node::ExprStatement { line } => format!("{}{};", line.label_prefix(), line.body()),
            Node::ForInStatement { body, variable, object, each } => for_in(body, variable, object, *each),
            Node::ForStatement { body, init, test, update } => for_loop(body, init, test, update),
            Node::FunctionCallExpr { callee, arguments, construct } => call(callee, arguments, *construct),
            Node::FunctionDeclaration { body, signature } => {
                format!("{}{}", body.label_prefix(), function_text(&signature.name, signature, body))
            }
            Node::FunctionExpr { function } => match function.as_deref().and_then(function_parts) {
                Some((signature, body)) => function_text(&signature.name, signature, body),
                None => text(function),
            },
            Node::GetterSetterMethodExpr { getter, name, function } => accessor(*getter, name, function),
            Node::IdNode { name, .. } => name.clone(),
            Node::IdRefExpr { reference } => reference.identifier.clone(),
            Node::IfStatement { body, test, otherwise } => if_statement(body, test, otherwise),
            Node::IncrementExpr { target, operation, postfix } => increment(&target.identifier, *operation, *postfix),
            Node::IndexingIncrementExpr { target, operation, postfix } => {
                increment(&grouped_child(target), *operation, *postfix)
            }
            Node::JumpStatement { line, label, is_break } => jump(line, label, *is_break),
            Node::MemberAssignmentExpr { target, value, literal } => {
                assignment(text(target), assigned_value(value, literal))
            }
            Node::MemberExpr { member, object } => member_access(&member.identifier, object),
            Node::ObjectExpr { properties } => object(properties),
            Node::RegExpLiteral { pattern, flags } => format!("/{pattern}/{flags}"),
            Node::ReturnStatement { line, value } => return_statement(line, value),
            Node::SetDefaultXmlNamespaceExpr { namespace } => {
                format!("default xml namespace = {}", text(namespace))
            }
            Node::StatementList { line, statements, .. } => statement_list(line, statements),
            Node::SwitchStatement { line, subject, cases } => switch(line, subject, cases),
            Node::ThisExpr => "this".to_string(),
            Node::ThrowStatement { line, value } => format!("{}throw {};", line.label_prefix(), text(value)),
            Node::TryStatement { body, handlers, finalizer } => try_statement(body, handlers, finalizer),
            Node::UnaryExpr { op, operand, literal } => unary(op, operand, literal),
            Node::GroupingExpr { inner } => format!("({})", text(inner)),
            Node::ValueNode { value } => value.as_ref().map(Variant::to_string).unwrap_or_default(),
            Node::WhileStatement { body, condition } => looped("while", body, condition),
            Node::WithStatement { body, object } => looped("with", body, object),
            Node::XmlAccessorExpr { object, name } => format!("{}.@{name}", postfix_operand(object)),
            Node::XmlAssignmentExpr { target, value } => assignment(text(target), text(value)),
            Node::XmlDoubleDotDescendantsExpr { object, name } => format!("{}..{name}", postfix_operand(object)),
            Node::XmlNamespaceExpr { namespace, member } => format!("{namespace}::{}", text(member)),
        }
    }
}

fn assignment(lhs: String, rhs: String) -> String {
    if rhs.is_empty() { lhs } else { format!("{lhs} = {rhs}") }
}

fn conditional(test: &Child, consequent: &Child, alternate: &Child) -> String {
    format!(
        "{} ? {} : {}",
        grouped_child(test),
        grouped_child(consequent),
        grouped_child(alternate)
    )
}

fn do_while(body: &LineInfo, condition: &Child) -> String {
    format!("{}do {} while ({})", body.label_prefix(), braced(&body.body()), text(condition))
}

fn for_in(body: &LineInfo, variable: &Child, object: &Child, each: bool) -> String {
    format!(
        "{}for {}({} in {}) {}",
        body.label_prefix(),
        if each { "each " } else { "" },
        text(variable),
        text(object),
        braced(&body.body())
    )
}

fn for_loop(body: &LineInfo, init: &Child, test: &Child, update: &Child) -> String {
    let mut head = text(init);
    for part in [text(test), text(update)] {
        head.push(';');
        if !part.is_empty() {
            head.push(' ');
            head.push_str(&part);
        }
    }
    format!("{}for ({head}) {}", body.label_prefix(), braced(&body.body()))
}

fn call(callee: &Child, arguments: &Child, construct: bool) -> String {
    if construct {
        format!("new {}({})", constructor_operand(callee), text(arguments))
    } else {
        format!("{}({})", postfix_operand(callee), text(arguments))
    }
}

fn accessor(getter: bool, name: &str, function: &Child) -> String {
    let prefix = if getter { "get" } else { "set" };
    match function.as_deref().and_then(function_parts) {
        Some((signature, body)) => format!(
            "{prefix} {}({}) {}",
            property_key(name),
            signature.parameters().join(", "),
            braced(&body.body())
        ),
        None => format!("{prefix} {}", property_key(name)),
    }
}

fn if_statement(body: &LineInfo, test: &Child, otherwise: &Child) -> String {
    let mut out = format!("{}if ({}) {}", body.label_prefix(), text(test), braced(&body.body()));
    match otherwise.as_deref() {
        None => {}
        Some(chained @ Node::IfStatement { body: inner, .. }) if inner.labels.is_empty() => {
            out.push_str(" else ");
            out.push_str(&chained.render());
        }
        Some(other) => {
            out.push_str(" else ");
            out.push_str(&braced(&other.render()));
        }
    }
    out
}

fn increment(target: &str, operation: i64, postfix: bool) -> String {
    let op = if operation == 1 { "++" } else { "--" };
    if postfix { format!("{target}{op}") } else { format!("{op}{target}") }
}

fn jump(line: &LineInfo, label: &str, is_break: bool) -> String {
    let keyword = if is_break { "break" } else { "continue" };
    if label.is_empty() {
        format!("{}{keyword};", line.label_prefix())
    } else {
        format!("{}{keyword} {label};", line.label_prefix())
    }
}

fn member_access(name: &str, object: &Child) -> String {
    let object = postfix_operand(object);
    match (object.is_empty(), is_identifier(name)) {
        (true, _) => name.to_string(),
        (false, true) => format!("{object}.{name}"),
        (false, false) => format!("{object}[\"{}\"]", escape(name)),
    }
}

fn object(properties: &[Property]) -> String {
    if properties.is_empty() {
        return "{}".to_string();
    }
    let entries: Vec<String> = properties
        .iter()
        .map(|p| match p.value.as_deref() {
            Some(accessor @ Node::GetterSetterMethodExpr { .. }) => accessor.render(),
            Some(value) => format!("{}: {}", property_key(&p.name), list_item(value)),
            None => format!("{}: ", property_key(&p.name)),
        })
        .collect();
    format!("{{{}}}", entries.join(", "))
}

fn return_statement(line: &LineInfo, value: &Child) -> String {
    let value = text(value);
    if value.is_empty() {
        format!("{}return;", line.label_prefix())
    } else {
        format!("{}return {value};", line.label_prefix())
    }
}

fn statement_list(line: &LineInfo, statements: &[Node]) -> String {
    let body = statements.iter().map(Node::render).collect::<Vec<_>>().join("\n");
    format!("{}{body}", line.label_prefix())
}

fn switch(line: &LineInfo, subject: &Child, cases: &[Case]) -> String {
    let mut clauses = Vec::new();
    for case in cases {
        match case.tests.as_deref() {
            None => clauses.push("default:".to_string()),
            Some(Node::ArgumentList(tests)) => clauses.extend(tests.iter().map(|t| format!("case {}:", t.render()))),
            Some(other) => clauses.push(format!("case {}:", other.render())),
        }
        let body = text(&case.body);
        if !body.is_empty() {
            clauses.push(indent(&body));
        }
    }
    format!("{}switch ({}) {}", line.label_prefix(), text(subject), braced(&clauses.join("\n")))
}

fn try_statement(body: &LineInfo, handlers: &[Handler], finalizer: &Child) -> String {
    let mut out = format!("{}try {}", body.label_prefix(), braced(&body.body()));
    for h in handlers {
        let guard = text(&h.guard);
        let head = if guard.is_empty() { h.binding.clone() } else { format!("{} if {guard}", h.binding) };
        out.push_str(&format!(" catch ({head}) {}", braced(&text(&h.body))));
    }
    if let Some(f) = finalizer.as_deref() {
        out.push_str(&format!(" finally {}", braced(&f.render())));
    }
    out
}

fn unary(op: &str, operand: &Child, literal: &Option<Variant>) -> String {
    let value = match operand.as_deref() {
        Some(node) => grouped(node),
        None => child_or_literal(&None, literal),
    };
    if op.chars().all(char::is_alphabetic) {
        format!("{op} {value}")
    } else if (op == "-" || op == "+") && value.starts_with(op) {
        // `- -x` and `-(-x)` are the same; `--x` is not
        format!("{op}({value})")
    } else {
        format!("{op}{value}")
    }
}

fn looped(keyword: &str, body: &LineInfo, head: &Child) -> String {
    format!("{}{keyword} ({}) {}", body.label_prefix(), text(head), braced(&body.body()))
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
