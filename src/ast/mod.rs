//! AST module for the Serpentes front-end
//!
//! This module provides the generic node model: a tag from the closed
//! construct catalog, an ordered set of named fields, and the source position
//! of the grammar reduction that built it.

// ============================================================================
// IMPORTS
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{Result, SerpentesError};

pub mod kind;
pub mod operator;
pub mod target;
pub mod value;

pub use kind::NodeKind;
pub use operator::{Context, Operator, OperatorClass};
pub use target::{Target, TargetNode};
pub use value::{Scalar, Value};

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Start and end of a grammar reduction in the source text.
///
/// Captured verbatim from the parser's metadata; no base conversion is
/// applied to lines or columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            line,
            column,
            end_line,
            end_column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.line, self.column, self.end_line, self.end_column
        )
    }
}

/// A target-tree construct under construction.
///
/// Fields always hold exactly the slots `kind.fields()` names, in that order.
/// The only way to obtain a `Node` is through [`Node::new`] (or the
/// rebuilding helpers below, which go through it), so an incomplete node can
/// never reach materialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: NodeKind,
    fields: Vec<(&'static str, Value)>,
    position: Position,
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl Node {
    /// Builds a node, checking the supplied fields against the catalog.
    ///
    /// Fields may be given in any order; they are stored in schema order.
    pub fn new<I>(kind: NodeKind, position: Position, fields: I) -> Result<Node>
    where
        I: IntoIterator<Item = (&'static str, Value)>,
    {
        let mut supplied: Vec<(&'static str, Option<Value>)> = fields
            .into_iter()
            .map(|(name, value)| (name, Some(value)))
            .collect();

        for (index, (name, _)) in supplied.iter().enumerate() {
            if supplied[..index].iter().any(|(seen, _)| seen == name) {
                return Err(SerpentesError::IncompleteNode {
                    kind,
                    detail: format!("field `{name}` supplied twice"),
                });
            }
            if !kind.has_field(name) {
                return Err(SerpentesError::IncompleteNode {
                    kind,
                    detail: format!("unknown field `{name}`"),
                });
            }
        }

        let mut ordered = Vec::with_capacity(kind.fields().len());
        for slot in kind.fields() {
            let value = supplied
                .iter_mut()
                .find(|(name, _)| name == slot)
                .and_then(|(_, value)| value.take())
                .ok_or_else(|| SerpentesError::IncompleteNode {
                    kind,
                    detail: format!("missing field `{slot}`"),
                })?;
            ordered.push((*slot, value));
        }

        Ok(Node {
            kind,
            fields: ordered,
            position,
        })
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn fields(&self) -> &[(&'static str, Value)] {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value)
    }

    /// The usage context, for kinds that carry one.
    pub fn context(&self) -> Option<Context> {
        self.get("ctx").and_then(Value::as_context)
    }

    /// Replaces the value of an existing slot.
    pub fn with_field(self, field: &str, value: Value) -> Result<Node> {
        self.map_field(field, |_| Ok(value))
    }

    /// Rewrites the value of an existing slot in place.
    pub fn map_field<F>(mut self, field: &str, f: F) -> Result<Node>
    where
        F: FnOnce(Value) -> Result<Value>,
    {
        let kind = self.kind;
        let slot = self
            .fields
            .iter_mut()
            .find(|(name, _)| *name == field)
            .ok_or_else(|| SerpentesError::IncompleteNode {
                kind,
                detail: format!("unknown field `{field}`"),
            })?;
        let value = std::mem::replace(&mut slot.1, Value::none());
        slot.1 = f(value)?;
        Ok(self)
    }

    /// Takes the node apart, yielding its fields in schema order.
    pub fn into_fields(self) -> Vec<(&'static str, Value)> {
        self.fields
    }

    /// Removes and returns one field's value, consuming the node.
    pub fn into_field(self, field: &str) -> Option<Value> {
        self.fields
            .into_iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value)
    }

    /// Converts this node and every descendant into the target tree.
    ///
    /// The walk borrows the tree, so a node can be materialized any number of
    /// times and every result compares equal.
    pub fn materialize(&self) -> TargetNode {
        TargetNode {
            kind: self.kind,
            fields: self
                .fields
                .iter()
                .map(|(name, value)| (*name, target::materialize_value(value)))
                .collect(),
            position: self.position,
        }
    }
}
