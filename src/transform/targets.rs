//! Context propagation for binding sites.
//!
//! A node used as an assignment, loop, `with`, comprehension, or `del`
//! target is rebuilt with its context resolved before it is attached to the
//! statement that binds it.
//!
//! Only the terminal binding positions change. A composite target (any kind
//! whose schema has `elts`) passes the context on to every element; an
//! attribute or subscript target changes its own `ctx` and leaves the object
//! it accesses in `Read`, since `a.b = 1` still reads `a`.

use crate::ast::{Context, Node, NodeKind, Value};
use crate::errors::{Result, SerpentesError};

/// Rebuilds `node` as a binding site in `context`.
pub fn bind(node: Node, context: Context) -> Result<Node> {
    let kind = node.kind();
    if !kind.has_field("ctx") {
        return Err(SerpentesError::unrecognized(
            format!("{} target", usage(context)),
            kind.name(),
        ));
    }

    let node = if node.context() == Some(context) {
        node
    } else {
        node.with_field("ctx", context.into())?
    };

    if kind.has_field("elts") {
        node.map_field("elts", |elts| match elts {
            Value::List(elts) => elts
                .into_iter()
                .map(|elt| bind(elt, context))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            other => Ok(other),
        })
    } else if kind == NodeKind::Starred {
        node.map_field("value", |value| match value {
            Value::Node(inner) => bind(*inner, context).map(Value::from),
            other => Ok(other),
        })
    } else {
        Ok(node)
    }
}

fn usage(context: Context) -> &'static str {
    match context {
        Context::Read => "read",
        Context::Write => "assignment",
        Context::Delete => "deletion",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Position;

    fn name(id: &str) -> Node {
        Node::new(
            NodeKind::Name,
            Position::default(),
            [("id", Value::from(id)), ("ctx", Context::Read.into())],
        )
        .unwrap()
    }

    fn attribute(value: Node, attr: &str) -> Node {
        Node::new(
            NodeKind::Attribute,
            Position::default(),
            [
                ("value", Value::from(value)),
                ("attr", Value::from(attr)),
                ("ctx", Context::Read.into()),
            ],
        )
        .unwrap()
    }

    fn tuple(elts: Vec<Node>) -> Node {
        Node::new(
            NodeKind::Tuple,
            Position::default(),
            [("elts", Value::from(elts)), ("ctx", Context::Read.into())],
        )
        .unwrap()
    }

    #[test]
    fn test_attribute_prefix_stays_read() {
        let target = bind(attribute(attribute(name("a"), "b"), "c"), Context::Write).unwrap();
        assert_eq!(target.context(), Some(Context::Write));

        let prefix = target.get("value").and_then(Value::as_node).unwrap();
        assert_eq!(prefix.context(), Some(Context::Read));
        let root = prefix.get("value").and_then(Value::as_node).unwrap();
        assert_eq!(root.context(), Some(Context::Read));
    }

    #[test]
    fn test_nested_tuple_targets() {
        let target = tuple(vec![name("x"), tuple(vec![attribute(name("o"), "y"), name("z")])]);
        let target = bind(target, Context::Write).unwrap();

        let outer = target.get("elts").and_then(Value::as_list).unwrap();
        assert_eq!(target.context(), Some(Context::Write));
        assert_eq!(outer[0].context(), Some(Context::Write));

        let inner = outer[1].get("elts").and_then(Value::as_list).unwrap();
        assert_eq!(outer[1].context(), Some(Context::Write));
        assert_eq!(inner[0].context(), Some(Context::Write));
        assert_eq!(
            inner[0].get("value").and_then(Value::as_node).unwrap().context(),
            Some(Context::Read)
        );
        assert_eq!(inner[1].context(), Some(Context::Write));
    }

    #[test]
    fn test_starred_target_binds_its_value() {
        let starred = Node::new(
            NodeKind::Starred,
            Position::default(),
            [("value", Value::from(name("rest"))), ("ctx", Context::Read.into())],
        )
        .unwrap();
        let target = bind(starred, Context::Write).unwrap();
        assert_eq!(
            target.get("value").and_then(Value::as_node).unwrap().context(),
            Some(Context::Write)
        );
    }

    #[test]
    fn test_delete_context() {
        let target = bind(tuple(vec![name("a"), name("b")]), Context::Delete).unwrap();
        let elts = target.get("elts").and_then(Value::as_list).unwrap();
        assert!(elts.iter().all(|elt| elt.context() == Some(Context::Delete)));
    }

    #[test]
    fn test_non_target_rejected() {
        let call = Node::new(
            NodeKind::Constant,
            Position::default(),
            [("value", Value::from(1_i64))],
        )
        .unwrap();
        let err = bind(call, Context::Write).unwrap_err();
        assert_eq!(err.to_string(), "unrecognized assignment target: `Constant`");
    }
}
