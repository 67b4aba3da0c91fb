//! The materialized target tree handed to the backend.
//!
//! A `TargetNode` mirrors the node it came from but owns plain data only, so
//! it can be serialized (the backend's JSON dump shape: a `_type` tag, the
//! schema fields, then the four position attributes) or inspected freely.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::{NodeKind, Position, Scalar, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct TargetNode {
    pub kind: NodeKind,
    pub fields: Vec<(&'static str, Target)>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Target {
    Node(TargetNode),
    List(Vec<Target>),
    Scalar(Scalar),
}

impl TargetNode {
    pub fn get(&self, field: &str) -> Option<&Target> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value)
    }

    /// Child node stored in `field`, if it holds one.
    pub fn node(&self, field: &str) -> Option<&TargetNode> {
        match self.get(field)? {
            Target::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Elements of the list stored in `field`, if it holds one.
    pub fn list(&self, field: &str) -> Option<&[Target]> {
        match self.get(field)? {
            Target::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn scalar(&self, field: &str) -> Option<&Scalar> {
        match self.get(field)? {
            Target::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }
}

impl Target {
    pub fn as_node(&self) -> Option<&TargetNode> {
        match self {
            Target::Node(node) => Some(node),
            _ => None,
        }
    }
}

pub(super) fn materialize_value(value: &Value) -> Target {
    match value {
        Value::Node(node) => Target::Node(node.materialize()),
        Value::List(nodes) => Target::List(
            nodes
                .iter()
                .map(|node| Target::Node(node.materialize()))
                .collect(),
        ),
        Value::Sparse(slots) => Target::List(
            slots
                .iter()
                .map(|slot| match slot {
                    Some(node) => Target::Node(node.materialize()),
                    None => Target::Scalar(Scalar::None),
                })
                .collect(),
        ),
        Value::Scalar(scalar) => Target::Scalar(scalar.clone()),
    }
}

impl Serialize for TargetNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 5))?;
        map.serialize_entry("_type", self.kind.name())?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("lineno", &self.position.line)?;
        map.serialize_entry("col_offset", &self.position.column)?;
        map.serialize_entry("end_lineno", &self.position.end_line)?;
        map.serialize_entry("end_col_offset", &self.position.end_column)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Context, Node, Operator};

    fn constant(value: i64, column: usize) -> Node {
        Node::new(
            NodeKind::Constant,
            Position::new(1, column, 1, column + 1),
            [("value", Value::from(value))],
        )
        .unwrap()
    }

    #[test]
    fn test_materialize_is_repeatable() {
        let node = Node::new(
            NodeKind::BinOp,
            Position::new(1, 0, 1, 5),
            [
                ("left", Value::from(constant(1, 0))),
                ("op", Operator::Add.into()),
                ("right", Value::from(constant(2, 4))),
            ],
        )
        .unwrap();

        let first = node.materialize();
        let second = node.materialize();
        assert_eq!(first, second);
        assert_eq!(first.node("right").unwrap().position, Position::new(1, 4, 1, 5));
    }

    #[test]
    fn test_sparse_slots_materialize_to_none() {
        let node = Node::new(
            NodeKind::Dict,
            Position::default(),
            [
                ("keys", Value::from(vec![None, Some(constant(1, 0))])),
                ("values", Value::from(vec![constant(2, 0), constant(3, 0)])),
            ],
        )
        .unwrap();
        let keys = node.materialize();
        let keys = keys.list("keys").unwrap();
        assert_eq!(keys[0], Target::Scalar(Scalar::None));
        assert!(keys[1].as_node().is_some());
    }

    #[test]
    fn test_serializes_backend_dump_shape() {
        let node = Node::new(
            NodeKind::Name,
            Position::new(2, 4, 2, 7),
            [("id", Value::from("foo")), ("ctx", Context::Write.into())],
        )
        .unwrap();
        let json = serde_json::to_value(node.materialize()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "_type": "Name",
                "id": "foo",
                "ctx": {"_type": "Store"},
                "lineno": 2,
                "col_offset": 4,
                "end_lineno": 2,
                "end_col_offset": 7,
            })
        );
    }
}
