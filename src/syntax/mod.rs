//! Syntax module: the parse-tree side of the front-end.
//!
//! The grammar engine is external; this module only defines the shape of its
//! output and adapts pest results into that shape.

pub mod pairs;
pub mod tree;

pub use pairs::{from_pair, from_pairs, position_of};
pub use tree::{ParseTree, Token};
