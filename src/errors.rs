//! Serpentes Error Handling
//!
//! Every failure in the front-end is fatal for the tree being built: there is
//! no local recovery and no partial tree. Handler errors are wrapped exactly
//! once with the grammar rule and source position that produced them, so the
//! caller can locate the offending input fragment.

use miette::Diagnostic;
use thiserror::Error;

use crate::ast::{NodeKind, Position};

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SerpentesError>;

/// All errors the front-end can report.
#[derive(Debug, Error, Diagnostic)]
pub enum SerpentesError {
    // ------------------------------------------------------------------------
    // Transform errors - contract violations by the grammar output
    // ------------------------------------------------------------------------
    #[error("unrecognized {construct}: `{found}`")]
    #[diagnostic(
        code(serpentes::transform::unrecognized),
        help("the parse tree contains a construct the node catalog does not cover")
    )]
    Unrecognized { construct: String, found: String },

    #[error("incomplete `{kind}` node: {detail}")]
    #[diagnostic(code(serpentes::transform::incomplete_node))]
    IncompleteNode { kind: NodeKind, detail: String },

    #[error("boolean chain needs exactly one operator, found {found}")]
    #[diagnostic(
        code(serpentes::transform::ambiguous_boolean),
        help("each boolean reduction applies one `and`/`or` to its operands")
    )]
    AmbiguousBoolean { found: usize },

    #[error("expected {expected}, found {found}")]
    #[diagnostic(code(serpentes::transform::shape))]
    Shape { expected: String, found: String },

    #[error("parse tree root reduced to {found}, expected a module")]
    #[diagnostic(code(serpentes::transform::not_a_module))]
    NotAModule { found: String },

    #[error("in rule `{rule}` at {position}")]
    #[diagnostic(code(serpentes::transform::rule))]
    InRule {
        rule: &'static str,
        position: Position,
        #[source]
        source: Box<SerpentesError>,
    },

    // ------------------------------------------------------------------------
    // Input errors - the surrounding tool layer
    // ------------------------------------------------------------------------
    #[error("malformed parse tree input")]
    #[diagnostic(code(serpentes::input::json))]
    Input(#[from] serde_json::Error),

    #[error("malformed configuration")]
    #[diagnostic(code(serpentes::input::config))]
    Config(#[from] serde_yaml::Error),

    #[error("I/O error")]
    #[diagnostic(code(serpentes::input::io))]
    Io(#[from] std::io::Error),
}

impl SerpentesError {
    pub fn unrecognized(construct: impl Into<String>, found: impl Into<String>) -> Self {
        SerpentesError::Unrecognized {
            construct: construct.into(),
            found: found.into(),
        }
    }

    pub fn shape(expected: impl Into<String>, found: impl Into<String>) -> Self {
        SerpentesError::Shape {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Attaches rule and position, unless an inner rule already did.
    pub fn in_rule(self, rule: &'static str, position: Position) -> Self {
        match self {
            SerpentesError::InRule { .. } => self,
            other => SerpentesError::InRule {
                rule,
                position,
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, skipping rule context.
    pub fn root_cause(&self) -> &SerpentesError {
        match self {
            SerpentesError::InRule { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// The rule that raised this error, if known.
    pub fn rule(&self) -> Option<&'static str> {
        match self {
            SerpentesError::InRule { rule, .. } => Some(*rule),
            _ => None,
        }
    }
}
