//! User-facing output for the CLI: JSON for `lower`, summaries for `check`.

use crate::ast::{Node, Value};
use crate::errors::Result;

/// Prints the materialized module as JSON.
pub fn print_module(module: &Node, compact: bool) -> Result<()> {
    let target = module.materialize();
    let json = if compact {
        serde_json::to_string(&target)?
    } else {
        serde_json::to_string_pretty(&target)?
    };
    println!("{json}");
    Ok(())
}

/// Prints `ok: <statements> statements, <nodes> nodes`.
pub fn print_summary(module: &Node) {
    println!("{}", summary(module));
}

pub fn summary(module: &Node) -> String {
    let statements = module
        .get("body")
        .and_then(Value::as_list)
        .map_or(0, <[Node]>::len);
    format!("ok: {statements} statements, {} nodes", count_nodes(module))
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn count_nodes(node: &Node) -> usize {
    1 + node
        .fields()
        .iter()
        .map(|(_, value)| match value {
            Value::Node(child) => count_nodes(child),
            Value::List(children) => children.iter().map(count_nodes).sum(),
            Value::Sparse(slots) => slots.iter().flatten().map(count_nodes).sum(),
            Value::Scalar(_) => 0,
        })
        .sum::<usize>()
}
