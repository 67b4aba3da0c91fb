//! Operator and context tags.
//!
//! Both travel as scalars inside a node's fields; neither is ever a node of
//! its own. Operators are produced from raw operator tokens by the lookup
//! functions here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which family of rule an operator may appear in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorClass {
    Binary,
    Unary,
    Comparison,
    Boolean,
}

/// An operator token resolved to its target-tree tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    // Binary
    Add,
    Sub,
    Mult,
    MatMult,
    Div,
    FloorDiv,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
    // Unary
    Invert,
    Not,
    UAdd,
    USub,
    // Comparison
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
    // Boolean
    And,
    Or,
}

impl Operator {
    /// The construct name the backend expects.
    pub fn name(self) -> &'static str {
        match self {
            Operator::Add => "Add",
            Operator::Sub => "Sub",
            Operator::Mult => "Mult",
            Operator::MatMult => "MatMult",
            Operator::Div => "Div",
            Operator::FloorDiv => "FloorDiv",
            Operator::Mod => "Mod",
            Operator::Pow => "Pow",
            Operator::LShift => "LShift",
            Operator::RShift => "RShift",
            Operator::BitOr => "BitOr",
            Operator::BitXor => "BitXor",
            Operator::BitAnd => "BitAnd",
            Operator::Invert => "Invert",
            Operator::Not => "Not",
            Operator::UAdd => "UAdd",
            Operator::USub => "USub",
            Operator::Eq => "Eq",
            Operator::NotEq => "NotEq",
            Operator::Lt => "Lt",
            Operator::LtE => "LtE",
            Operator::Gt => "Gt",
            Operator::GtE => "GtE",
            Operator::Is => "Is",
            Operator::IsNot => "IsNot",
            Operator::In => "In",
            Operator::NotIn => "NotIn",
            Operator::And => "And",
            Operator::Or => "Or",
        }
    }

    pub fn class(self) -> OperatorClass {
        use Operator::*;
        match self {
            Add | Sub | Mult | MatMult | Div | FloorDiv | Mod | Pow | LShift | RShift | BitOr
            | BitXor | BitAnd => OperatorClass::Binary,
            Invert | Not | UAdd | USub => OperatorClass::Unary,
            Eq | NotEq | Lt | LtE | Gt | GtE | Is | IsNot | In | NotIn => {
                OperatorClass::Comparison
            }
            And | Or => OperatorClass::Boolean,
        }
    }

    /// Binary operator for an arithmetic, shift, or bitwise token.
    pub fn binary(text: &str) -> Option<Operator> {
        Some(match text {
            "+" => Operator::Add,
            "-" => Operator::Sub,
            "*" => Operator::Mult,
            "@" => Operator::MatMult,
            "/" => Operator::Div,
            "//" => Operator::FloorDiv,
            "%" => Operator::Mod,
            "**" => Operator::Pow,
            "<<" => Operator::LShift,
            ">>" => Operator::RShift,
            "|" => Operator::BitOr,
            "^" => Operator::BitXor,
            "&" => Operator::BitAnd,
            _ => return None,
        })
    }

    /// Binary operator for an augmented-assignment token such as `+=`.
    pub fn augmented(text: &str) -> Option<Operator> {
        text.strip_suffix('=').and_then(Operator::binary)
    }

    pub fn unary(text: &str) -> Option<Operator> {
        Some(match text {
            "+" => Operator::UAdd,
            "-" => Operator::USub,
            "~" => Operator::Invert,
            "not" => Operator::Not,
            _ => return None,
        })
    }

    /// Comparison operator; multi-word tokens must be whitespace-normalized.
    pub fn comparison(text: &str) -> Option<Operator> {
        Some(match text {
            "==" => Operator::Eq,
            "!=" | "<>" => Operator::NotEq,
            "<" => Operator::Lt,
            "<=" => Operator::LtE,
            ">" => Operator::Gt,
            ">=" => Operator::GtE,
            "is" => Operator::Is,
            "is not" => Operator::IsNot,
            "in" => Operator::In,
            "not in" => Operator::NotIn,
            _ => return None,
        })
    }

    pub fn boolean(text: &str) -> Option<Operator> {
        Some(match text {
            "and" => Operator::And,
            "or" => Operator::Or,
            _ => return None,
        })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a name-like node is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Context {
    #[default]
    Read,
    Write,
    Delete,
}

impl Context {
    /// The construct name the backend expects.
    pub fn name(self) -> &'static str {
        match self {
            Context::Read => "Load",
            Context::Write => "Store",
            Context::Delete => "Del",
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
