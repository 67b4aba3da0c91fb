//! Comprehension clauses and the four comprehension displays.

use super::{describe, targets, Children, Reduced, Reduction, Rule};
use crate::ast::{Context, Node, NodeKind, Value};
use crate::errors::{Result, SerpentesError};

/// `for target in iter [if condition]`, rewriting the target for binding.
pub fn clause(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let target = targets::bind(children.node("comprehension target")?, Context::Write)?;
    let iter = children.node("comprehension iterable")?;
    let ifs: Vec<Node> = children.optional_node("comprehension condition")?.into_iter().collect();
    children.done()?;
    if ifs.iter().any(|node| node.kind() == NodeKind::Comprehension) {
        return Err(SerpentesError::unrecognized(
            "comprehension condition",
            "nested comprehension clause",
        ));
    }

    let is_async = i64::from(cx.rule == Rule::AsyncCompFor);
    cx.node(
        NodeKind::Comprehension,
        [
            ("target", Value::from(target)),
            ("iter", Value::from(iter)),
            ("ifs", Value::from(ifs)),
            ("is_async", Value::from(is_async)),
        ],
    )
    .map(Reduced::Node)
}

pub fn comprehension(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let kind = match cx.rule {
        Rule::ListComprehension => NodeKind::ListComp,
        Rule::SetComprehension => NodeKind::SetComp,
        Rule::GeneratorExpression => NodeKind::GeneratorExp,
        other => return Err(SerpentesError::unrecognized("comprehension kind", other.name())),
    };
    let elt = children.node("comprehension element")?;
    let generators = generators(children)?;
    cx.node(
        kind,
        [("elt", Value::from(elt)), ("generators", Value::from(generators))],
    )
    .map(Reduced::Node)
}

/// `{key: value for ...}`; the entry may arrive as a pair or as two nodes.
pub fn dict_comprehension(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let (key, value) = match children.next() {
        Some(Reduced::Pair(key, value)) => (key, value),
        Some(Reduced::Node(key)) => (key, children.node("comprehension value")?),
        other => {
            return Err(SerpentesError::shape(
                "comprehension entry",
                describe(other.as_ref()),
            ))
        }
    };
    let generators = generators(children)?;
    cx.node(
        NodeKind::DictComp,
        [
            ("key", Value::from(key)),
            ("value", Value::from(value)),
            ("generators", Value::from(generators)),
        ],
    )
    .map(Reduced::Node)
}

// One or more clauses, possibly grouped by the grammar.
fn generators(children: Children) -> Result<Vec<Node>> {
    let clauses = super::collect_nodes(children.into_vec())?;
    if clauses.is_empty() {
        return Err(SerpentesError::shape("comprehension clause", "nothing"));
    }
    if let Some(stray) = clauses.iter().find(|node| node.kind() != NodeKind::Comprehension) {
        return Err(SerpentesError::shape(
            "comprehension clause",
            format!("`{}` node", stray.kind()),
        ));
    }
    Ok(clauses)
}
