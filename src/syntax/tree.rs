//! The parse tree consumed by the transformer.
//!
//! This is the input contract with the external grammar engine: rule
//! branches carrying the reduction's position, leaf tokens, and placeholders
//! for optional slots the grammar left empty.

use serde::{Deserialize, Serialize};

use crate::ast::Position;

/// A raw terminal from the grammar engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Lexical class, e.g. `NAME` or `python__HEX_NUMBER`.
    pub kind: String,
    pub text: String,
    #[serde(default)]
    pub position: Position,
}

impl Token {
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
            position: Position::default(),
        }
    }

    /// The lexical class with any `namespace__` import prefix removed.
    pub fn class(&self) -> &str {
        self.kind.rsplit("__").next().unwrap_or(&self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParseTree {
    Rule {
        rule: String,
        children: Vec<ParseTree>,
        position: Position,
    },
    Token(Token),
    /// An optional slot the grammar matched as empty.
    Absent,
}

impl ParseTree {
    pub fn rule(rule: impl Into<String>, position: Position, children: Vec<ParseTree>) -> Self {
        ParseTree::Rule {
            rule: rule.into(),
            children,
            position,
        }
    }

    pub fn token(kind: impl Into<String>, text: impl Into<String>) -> Self {
        ParseTree::Token(Token::new(kind, text))
    }

    /// Parses the JSON form produced by out-of-process grammar engines.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
