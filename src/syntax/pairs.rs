//! Adapter from pest parse results to [`ParseTree`].
//!
//! Any pest grammar can drive the transformer as long as its rule names match
//! the handler catalog. Conventions:
//!
//! - An all-uppercase rule (`NAME`, `DEC_NUMBER`) is a token.
//! - A lowercase rule with no inner pairs keeps its matched text as a single
//!   token child, so operator rules such as `add_op = { "+" | "-" }` still
//!   hand their lexeme to the handler.
//! - A rule named `absent` is the placeholder for an empty optional slot.
//! - Silent rules (`_{ }`) never reach the tree, exactly like filtered tokens.
//!
//! Positions keep pest's numbering: lines and columns are both 1-based. They
//! pass through to the materialized `col_offset`/`end_col_offset` unchanged,
//! so a backend expecting 0-based columns must subtract one itself.

use pest::iterators::{Pair, Pairs};
use pest::{RuleType, Span};

use super::tree::{ParseTree, Token};
use crate::ast::Position;

pub const ABSENT_RULE: &str = "absent";

/// Converts a sequence of top-level pairs.
pub fn from_pairs<R: RuleType>(pairs: Pairs<'_, R>) -> Vec<ParseTree> {
    pairs.map(from_pair).collect()
}

/// Converts one pair and everything beneath it.
pub fn from_pair<R: RuleType>(pair: Pair<'_, R>) -> ParseTree {
    let name = format!("{:?}", pair.as_rule());
    let position = position_of(&pair.as_span());

    if name == ABSENT_RULE {
        return ParseTree::Absent;
    }

    let text = pair.as_str().to_string();
    let inner: Vec<ParseTree> = pair.into_inner().map(from_pair).collect();

    if is_token_rule(&name) && inner.is_empty() {
        return ParseTree::Token(Token {
            kind: name,
            text,
            position,
        });
    }

    let children = if inner.is_empty() && !text.is_empty() {
        vec![ParseTree::Token(Token {
            kind: name.to_uppercase(),
            text,
            position,
        })]
    } else {
        inner
    };

    ParseTree::Rule {
        rule: name,
        children,
        position,
    }
}

/// Line/column metadata of a pest span (both 1-based, as pest reports them).
pub fn position_of(span: &Span<'_>) -> Position {
    let (line, column) = span.start_pos().line_col();
    let (end_line, end_column) = span.end_pos().line_col();
    Position::new(line, column, end_line, end_column)
}

fn is_token_rule(name: &str) -> bool {
    name.chars().any(|c| c.is_ascii_uppercase())
        && !name.chars().any(|c| c.is_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_rule_detection() {
        assert!(is_token_rule("NAME"));
        assert!(is_token_rule("HEX_NUMBER"));
        assert!(!is_token_rule("add_op"));
        assert!(!is_token_rule("file_input"));
        assert!(!is_token_rule("_"));
    }
}
