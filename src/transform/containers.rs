//! List, tuple, set, and dict displays.

use super::{collect_nodes, expect_node, Children, Reduced, Reduction, Rule};
use crate::ast::{Context, Node, NodeKind, Value};
use crate::errors::{Result, SerpentesError};

/// `[a, b]`, `(a, b)`, `{a, b}`: elements in source order.
pub fn sequence(cx: &Reduction<'_>, children: Children) -> Result<Reduced> {
    let elts = collect_nodes(children.into_vec())?;
    let node = match cx.rule {
        Rule::List => cx.node(
            NodeKind::List,
            [("elts", Value::from(elts)), ("ctx", Context::Read.into())],
        )?,
        Rule::Tuple => cx.tuple(elts)?,
        Rule::Set => cx.node(NodeKind::Set, [("elts", Value::from(elts))])?,
        other => return Err(SerpentesError::unrecognized("container kind", other.name())),
    };
    Ok(Reduced::Node(node))
}

/// `{k: v, **m}`; an unpacking entry leaves a `None` key in its slot.
pub fn dict(cx: &Reduction<'_>, children: Children) -> Result<Reduced> {
    let mut keys = Vec::new();
    let mut values = Vec::new();
    collect_entries(children.into_vec(), &mut keys, &mut values)?;
    cx.node(
        NodeKind::Dict,
        [("keys", Value::from(keys)), ("values", Value::from(values))],
    )
    .map(Reduced::Node)
}

fn collect_entries(
    items: Vec<Reduced>,
    keys: &mut Vec<Option<Node>>,
    values: &mut Vec<Node>,
) -> Result<()> {
    for item in items {
        match item {
            Reduced::Pair(key, value) => {
                keys.push(Some(key));
                values.push(value);
            }
            Reduced::Unpack(mapping) => {
                keys.push(None);
                values.push(mapping);
            }
            Reduced::Fragment(fragment) => collect_entries(fragment.children, keys, values)?,
            Reduced::Token(_) | Reduced::Absent => {}
            other => return Err(SerpentesError::shape("dict entry", other.describe())),
        }
    }
    Ok(())
}

pub fn key_value(mut children: Children) -> Result<Reduced> {
    let key = children.node("dict key")?;
    let value = children.node("dict value")?;
    children.done()?;
    Ok(Reduced::Pair(key, value))
}

pub fn unpack(mut children: Children) -> Result<Reduced> {
    let mapping = expect_node(children.next(), "unpacked mapping")?;
    children.done()?;
    Ok(Reduced::Unpack(mapping))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Position;
    use crate::syntax::Token;
    use crate::transform::{Fragment, TransformOptions};

    fn reduction(rule: Rule, options: &TransformOptions) -> Reduction<'_> {
        Reduction {
            rule,
            position: Position::new(1, 1, 1, 10),
            options,
        }
    }

    fn ids(list: &[Node]) -> Vec<&str> {
        list.iter()
            .map(|node| node.get("id").and_then(Value::as_str).unwrap_or("?"))
            .collect()
    }

    #[test]
    fn test_set_has_no_context() {
        let options = TransformOptions::default();
        let cx = reduction(Rule::Set, &options);
        let a = cx.name("a", Context::Read).unwrap();
        let set = match sequence(&cx, Children::new(vec![Reduced::Node(a)])).unwrap() {
            Reduced::Node(node) => node,
            other => panic!("expected node, got {}", other.describe()),
        };
        assert_eq!(set.kind(), NodeKind::Set);
        assert_eq!(set.context(), None);
    }

    #[test]
    fn test_list_scans_through_fragments() {
        let options = TransformOptions::default();
        let cx = reduction(Rule::List, &options);
        let name = |id: &str| Reduced::Node(cx.name(id, Context::Read).unwrap());
        let children = vec![Reduced::Fragment(Fragment {
            rule: "testlist_comp".to_string(),
            children: vec![
                name("x"),
                Reduced::Token(Token::new("COMMA", ",")),
                name("y"),
                Reduced::Token(Token::new("COMMA", ",")),
                name("z"),
            ],
            position: Position::default(),
        })];

        let list = match sequence(&cx, Children::new(children)).unwrap() {
            Reduced::Node(node) => node,
            other => panic!("expected node, got {}", other.describe()),
        };
        assert_eq!(ids(list.get("elts").and_then(Value::as_list).unwrap()), ["x", "y", "z"]);
        assert_eq!(list.context(), Some(Context::Read));
    }

    #[test]
    fn test_dict_unpack_leaves_empty_key() {
        let options = TransformOptions::default();
        let cx = reduction(Rule::Dict, &options);
        let name = |id: &str| cx.name(id, Context::Read).unwrap();
        let children = vec![
            Reduced::Pair(name("k1"), name("v1")),
            Reduced::Unpack(name("rest")),
            Reduced::Pair(name("k2"), name("v2")),
        ];

        let dict = match dict(&cx, Children::new(children)).unwrap() {
            Reduced::Node(node) => node,
            other => panic!("expected node, got {}", other.describe()),
        };
        match dict.get("keys") {
            Some(Value::Sparse(keys)) => {
                assert_eq!(keys.len(), 3);
                assert!(keys[0].is_some());
                assert!(keys[1].is_none());
                assert!(keys[2].is_some());
            }
            other => panic!("expected sparse keys, got {other:?}"),
        }
        assert_eq!(
            ids(dict.get("values").and_then(Value::as_list).unwrap()),
            ["v1", "rest", "v2"]
        );
    }

    #[test]
    fn test_dict_rejects_bare_node() {
        let options = TransformOptions::default();
        let cx = reduction(Rule::Dict, &options);
        let stray = Reduced::Node(cx.name("x", Context::Read).unwrap());
        assert!(dict(&cx, Children::new(vec![stray])).is_err());
    }
}
