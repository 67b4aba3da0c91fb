use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::{Context, Node, Operator};

/// The content of one node field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Node(Box<Node>),
    List(Vec<Node>),
    /// A list whose slots may be empty (dict keys under `**` unpacking,
    /// keyword-only parameters without a default).
    Sparse(Vec<Option<Node>>),
    Scalar(Scalar),
}

/// Opaque leaf values carried by node fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Identifiers(Vec<String>),
    Operator(Operator),
    /// The operator list of a comparison chain.
    Operators(Vec<Operator>),
    Context(Context),
}

impl Value {
    pub fn none() -> Self {
        Value::Scalar(Scalar::None)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::Scalar(Scalar::None))
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Value::List(nodes) => Some(nodes),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::Str(text)) => Some(text),
            _ => None,
        }
    }

    pub fn as_context(&self) -> Option<Context> {
        match self {
            Value::Scalar(Scalar::Context(context)) => Some(*context),
            _ => None,
        }
    }

    pub fn as_operator(&self) -> Option<Operator> {
        match self {
            Value::Scalar(Scalar::Operator(op)) => Some(*op),
            _ => None,
        }
    }

    pub fn into_node(self) -> Option<Node> {
        match self {
            Value::Node(node) => Some(*node),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<Vec<Node>> {
        match self {
            Value::List(nodes) => Some(nodes),
            _ => None,
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(Box::new(node))
    }
}

impl From<Option<Node>> for Value {
    fn from(node: Option<Node>) -> Self {
        node.map_or_else(Value::none, Value::from)
    }
}

impl From<Vec<Node>> for Value {
    fn from(nodes: Vec<Node>) -> Self {
        Value::List(nodes)
    }
}

impl From<Vec<Option<Node>>> for Value {
    fn from(slots: Vec<Option<Node>>) -> Self {
        Value::Sparse(slots)
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

impl From<Operator> for Value {
    fn from(op: Operator) -> Self {
        Value::Scalar(Scalar::Operator(op))
    }
}

impl From<Vec<Operator>> for Value {
    fn from(ops: Vec<Operator>) -> Self {
        Value::Scalar(Scalar::Operators(ops))
    }
}

impl From<Context> for Value {
    fn from(context: Context) -> Self {
        Value::Scalar(Scalar::Context(context))
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Scalar(Scalar::Str(text.to_string()))
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Scalar(Scalar::Str(text))
    }
}

impl From<Option<String>> for Value {
    fn from(text: Option<String>) -> Self {
        text.map_or_else(Value::none, Value::from)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Scalar(Scalar::Int(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Scalar(Scalar::Bool(value))
    }
}

// Operators and contexts serialize the way the backend's own tree dumps
// them: as field-less objects tagged by construct name.
impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::None => serializer.serialize_none(),
            Scalar::Bool(value) => serializer.serialize_bool(*value),
            Scalar::Int(value) => serializer.serialize_i64(*value),
            Scalar::Float(value) => serializer.serialize_f64(*value),
            Scalar::Str(text) => serializer.serialize_str(text),
            Scalar::Identifiers(names) => names.serialize(serializer),
            Scalar::Operator(op) => Tagged(op.name()).serialize(serializer),
            Scalar::Operators(ops) => serializer.collect_seq(ops.iter().map(|op| Tagged(op.name()))),
            Scalar::Context(context) => Tagged(context.name()).serialize(serializer),
        }
    }
}

struct Tagged(&'static str);

impl Serialize for Tagged {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("_type", self.0)?;
        map.end()
    }
}
