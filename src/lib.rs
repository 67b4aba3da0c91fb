//! Serpentes lowers grammar parse trees into a Python-style abstract syntax
//! tree.
//!
//! The pipeline is one-way: a [`ParseTree`] from an external grammar engine
//! is reduced bottom-up by the [`Transformer`] into a [`Node`] rooted at a
//! `Module`, which [`Node::materialize`] turns into the serializable target
//! tree handed to a backend.

pub use crate::ast::{Node, NodeKind, Position};
pub use crate::errors::{Result, SerpentesError};
pub use crate::syntax::ParseTree;
pub use crate::transform::{TransformOptions, Transformer};

pub mod ast;
pub mod cli;
pub mod errors;
pub mod syntax;
pub mod transform;
