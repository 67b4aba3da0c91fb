//! Names, calls, attribute access, subscripts, and the remaining
//! expression forms.

use super::{bare_list, collect_nodes, describe, targets, Children, Reduced, Reduction};
use crate::ast::{Context, Node, NodeKind, Position, Value};
use crate::errors::{Result, SerpentesError};

pub fn var(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let id = children.identifier("variable name")?;
    children.done()?;
    cx.name(id, Context::Read).map(Reduced::Node)
}

/// `*value`, both as an expression and as a call argument.
pub fn starred(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let value = children.node("starred value")?;
    children.done()?;
    cx.node(
        NodeKind::Starred,
        [("value", Value::from(value)), ("ctx", Context::Read.into())],
    )
    .map(Reduced::Node)
}

/// `body if test else orelse`
pub fn ternary(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let body = children.node("conditional body")?;
    let test = children.node("condition")?;
    let orelse = children.node("alternative")?;
    children.done()?;
    cx.node(
        NodeKind::IfExp,
        [
            ("test", Value::from(test)),
            ("body", Value::from(body)),
            ("orelse", Value::from(orelse)),
        ],
    )
    .map(Reduced::Node)
}

/// `target := value`
pub fn named(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let target = targets::bind(children.node("binding target")?, Context::Write)?;
    let value = children.node("bound value")?;
    children.done()?;
    cx.node(
        NodeKind::NamedExpr,
        [("target", Value::from(target)), ("value", Value::from(value))],
    )
    .map(Reduced::Node)
}

pub fn await_expr(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let value = children.node("awaited value")?;
    children.done()?;
    cx.node(NodeKind::Await, [("value", Value::from(value))])
        .map(Reduced::Node)
}

// ============================================================================
// CALLS
// ============================================================================

pub fn call(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let func = children.node("callee")?;
    let (args, keywords) = classify_arguments(children.into_vec())?;
    cx.node(
        NodeKind::Call,
        [
            ("func", Value::from(func)),
            ("args", Value::from(args)),
            ("keywords", Value::from(keywords)),
        ],
    )
    .map(Reduced::Node)
}

/// Splits reduced arguments into `(positional, keyword)`, each in source
/// order.
///
/// The arguments may arrive as one bare node (a single argument, possibly a
/// lone `**kwargs` keyword), as a list, or as a fragment; all three are
/// classified the same way, by testing for keyword nodes.
pub fn classify_arguments(items: Vec<Reduced>) -> Result<(Vec<Node>, Vec<Node>)> {
    let (keywords, args): (Vec<_>, Vec<_>) = collect_nodes(items)?
        .into_iter()
        .partition(|node| node.kind() == NodeKind::Keyword);
    Ok((args, keywords))
}

pub fn arguments(children: Children) -> Result<Reduced> {
    collect_nodes(children.into_vec()).map(Reduced::Nodes)
}

/// `name=value`
pub fn keyword(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let arg = children.identifier("keyword name")?;
    let value = children.node("keyword value")?;
    children.done()?;
    cx.node(
        NodeKind::Keyword,
        [("arg", Value::from(arg)), ("value", Value::from(value))],
    )
    .map(Reduced::Node)
}

/// `**mapping`: a keyword without a name.
pub fn kwargs(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let value = children.node("keyword mapping")?;
    children.done()?;
    cx.node(
        NodeKind::Keyword,
        [("arg", Value::none()), ("value", Value::from(value))],
    )
    .map(Reduced::Node)
}

// ============================================================================
// ATTRIBUTES AND SUBSCRIPTS
// ============================================================================

pub fn getattr(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let value = children.node("attribute owner")?;
    let attr = children.identifier("attribute name")?;
    children.done()?;
    attribute(cx.position, value, attr).map(Reduced::Node)
}

fn attribute(position: Position, value: Node, attr: String) -> Result<Node> {
    Node::new(
        NodeKind::Attribute,
        position,
        [
            ("value", Value::from(value)),
            ("attr", Value::from(attr)),
            ("ctx", Context::Read.into()),
        ],
    )
}

/// Left-folds `base.step1.step2` into nested attribute accesses.
pub fn attr_chain(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let mut chain = children.node("attribute base")?;
    if children.is_empty() {
        return Err(SerpentesError::shape("attribute name", "nothing"));
    }

    let start = chain.position();
    let mut remaining = children.len();
    for item in children.into_vec() {
        remaining -= 1;
        let (attr, end) = step_name(item)?;
        // Tokens from serialized trees may carry no position of their own.
        let end = if end == Position::default() { cx.position } else { end };
        let position = if remaining == 0 {
            cx.position
        } else {
            Position::new(start.line, start.column, end.end_line, end.end_column)
        };
        chain = attribute(position, chain, attr)?;
    }
    Ok(Reduced::Node(chain))
}

// A step's own name is its `id` when it is a plain name, else the `attr` of
// an attribute access.
fn step_name(item: Reduced) -> Result<(String, Position)> {
    match item {
        Reduced::Token(token) => Ok((token.text, token.position)),
        Reduced::Node(node) => {
            let position = node.position();
            let name = node
                .get("id")
                .or_else(|| node.get("attr"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    SerpentesError::unrecognized("attribute step", node.kind().name())
                })?;
            Ok((name, position))
        }
        other => Err(SerpentesError::shape("attribute step", other.describe())),
    }
}

/// `value[index]`; a comma-separated index becomes a tuple.
pub fn subscript(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let value = children.node("subscripted value")?;
    let index = match children.next() {
        Some(Reduced::Node(node)) => node,
        Some(item @ (Reduced::Nodes(_) | Reduced::Fragment(_))) => {
            bare_list(cx, item, "subscript index")?
        }
        other => return Err(SerpentesError::shape("subscript index", describe(other.as_ref()))),
    };
    children.done()?;
    cx.node(
        NodeKind::Subscript,
        [
            ("value", Value::from(value)),
            ("slice", Value::from(index)),
            ("ctx", Context::Read.into()),
        ],
    )
    .map(Reduced::Node)
}

/// `lower:upper:step`, each part optional.
pub fn slice(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let lower = children.optional_node("slice lower bound")?;
    let upper = children.optional_node("slice upper bound")?;
    let step = children.optional_node("slice step")?;
    children.done()?;
    cx.node(
        NodeKind::Slice,
        [
            ("lower", Value::from(lower)),
            ("upper", Value::from(upper)),
            ("step", Value::from(step)),
        ],
    )
    .map(Reduced::Node)
}
