//! Parse-tree builders shared by the integration tests.
#![allow(dead_code)]

use serpentes::ast::{Node, Value};
use serpentes::syntax::ParseTree;
use serpentes::{Position, Result, TransformOptions, Transformer};

pub fn at(line: usize) -> Position {
    Position::new(line, 1, line, 80)
}

pub fn rule(name: &str, children: Vec<ParseTree>) -> ParseTree {
    ParseTree::rule(name, at(1), children)
}

pub fn tok(kind: &str, text: &str) -> ParseTree {
    ParseTree::token(kind, text)
}

pub fn var(name: &str) -> ParseTree {
    rule("var", vec![tok("NAME", name)])
}

pub fn int(text: &str) -> ParseTree {
    rule("number", vec![tok("DEC_NUMBER", text)])
}

pub fn op(rule_name: &str, text: &str) -> ParseTree {
    rule(rule_name, vec![tok("OP", text)])
}

/// Wraps statements into a `file_input` tree.
pub fn file(statements: Vec<ParseTree>) -> ParseTree {
    rule("file_input", statements)
}

/// Wraps one expression into a one-statement module.
pub fn expr_file(expr: ParseTree) -> ParseTree {
    file(vec![rule("expr_stmt", vec![expr])])
}

pub fn lower(tree: ParseTree) -> Result<Node> {
    Transformer::new(TransformOptions::default()).transform(tree)
}

/// The body of a module built from `tree`.
pub fn body(tree: ParseTree) -> Vec<Node> {
    lower(tree)
        .unwrap()
        .into_field("body")
        .and_then(Value::into_list)
        .unwrap()
}

/// The value of the single expression statement around `tree`.
pub fn expression(tree: ParseTree) -> Node {
    body(expr_file(tree))
        .remove(0)
        .into_field("value")
        .and_then(Value::into_node)
        .unwrap()
}

pub fn ids(nodes: &[Node]) -> Vec<String> {
    nodes
        .iter()
        .map(|node| node.get("id").and_then(Value::as_str).unwrap_or("?").to_string())
        .collect()
}
