//! Simple and compound statements, imports, and the module root.

use super::{bare_list, collect_nodes, describe, identifier, targets, Children, Clause, Reduced, Reduction, Rule};
use crate::ast::{Context, Node, NodeKind, OperatorClass, Position, Scalar, Value};
use crate::errors::{Result, SerpentesError};

// ============================================================================
// HELPERS
// ============================================================================

/// A statement body: one statement or a flattened block.
pub(super) fn body(item: Option<Reduced>, what: &str) -> Result<Vec<Node>> {
    match item {
        Some(Reduced::Node(node)) => Ok(vec![node]),
        Some(item @ (Reduced::Nodes(_) | Reduced::Fragment(_))) => collect_nodes(vec![item]),
        other => Err(SerpentesError::shape(what, describe(other.as_ref()))),
    }
}

/// An optional trailing `else` block.
fn orelse(item: Option<Reduced>) -> Result<Vec<Node>> {
    match item {
        None | Some(Reduced::Absent) => Ok(Vec::new()),
        Some(Reduced::Clause(Clause::Else(block))) => Ok(block),
        other => body(other, "else block"),
    }
}

/// An expression slot that may hold a bare comma-separated list, which
/// stands for a tuple.
fn expression(cx: &Reduction<'_>, item: Option<Reduced>, what: &str) -> Result<Node> {
    match item {
        Some(Reduced::Node(node)) => Ok(node),
        Some(item @ (Reduced::Nodes(_) | Reduced::Fragment(_))) => bare_list(cx, item, what),
        other => Err(SerpentesError::shape(what, describe(other.as_ref()))),
    }
}

fn of_kind(nodes: Vec<Node>, kind: NodeKind, what: &str) -> Result<Vec<Node>> {
    if nodes.is_empty() {
        return Err(SerpentesError::shape(what, "nothing"));
    }
    match nodes.iter().find(|node| node.kind() != kind) {
        Some(stray) => Err(SerpentesError::shape(what, format!("`{}` node", stray.kind()))),
        None => Ok(nodes),
    }
}

// ============================================================================
// SIMPLE STATEMENTS
// ============================================================================

pub fn expr_stmt(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let value = expression(cx, children.next(), "expression")?;
    children.done()?;
    cx.node(NodeKind::Expr, [("value", Value::from(value))])
        .map(Reduced::Node)
}

/// `t1 = t2 = value`: every child but the last is a target.
pub fn assign(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let value = expression(cx, children.next_back(), "assigned value")?;
    if children.is_empty() {
        return Err(SerpentesError::shape("assignment target", "nothing"));
    }
    let targets = children
        .into_vec()
        .into_iter()
        .map(|item| {
            let target = expression(cx, Some(item), "assignment target")?;
            targets::bind(target, Context::Write)
        })
        .collect::<Result<Vec<_>>>()?;

    cx.node(
        NodeKind::Assign,
        [("targets", Value::from(targets)), ("value", Value::from(value))],
    )
    .map(Reduced::Node)
}

/// `target op= value`
pub fn augassign(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let target = targets::bind(children.node("augmented target")?, Context::Write)?;
    let op = match children.next() {
        Some(Reduced::Operator(op)) if op.class() == OperatorClass::Binary => op,
        Some(Reduced::Operator(op)) => {
            return Err(SerpentesError::unrecognized("augmented operator", op.name()))
        }
        other => {
            return Err(SerpentesError::shape("augmented operator", describe(other.as_ref())))
        }
    };
    let value = expression(cx, children.next(), "augmented value")?;
    children.done()?;

    cx.node(
        NodeKind::AugAssign,
        [
            ("target", Value::from(target)),
            ("op", Value::from(op)),
            ("value", Value::from(value)),
        ],
    )
    .map(Reduced::Node)
}

/// `target: annotation [= value]`
pub fn annassign(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let target = targets::bind(children.node("annotated target")?, Context::Write)?;
    let annotation = children.node("annotation")?;
    let value = children.optional_node("annotated value")?;
    children.done()?;

    let simple = i64::from(target.kind() == NodeKind::Name);
    cx.node(
        NodeKind::AnnAssign,
        [
            ("target", Value::from(target)),
            ("annotation", Value::from(annotation)),
            ("value", Value::from(value)),
            ("simple", Value::from(simple)),
        ],
    )
    .map(Reduced::Node)
}

/// `return [value]` and `yield [value]`.
pub fn optional_value(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let kind = match cx.rule {
        Rule::ReturnStmt => NodeKind::Return,
        _ => NodeKind::Yield,
    };
    let value = match children.next() {
        None | Some(Reduced::Absent) => None,
        item => Some(expression(cx, item, "returned value")?),
    };
    children.done()?;
    cx.node(kind, [("value", Value::from(value))])
        .map(Reduced::Node)
}

pub fn yield_from(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let value = children.node("delegated iterable")?;
    children.done()?;
    cx.node(NodeKind::YieldFrom, [("value", Value::from(value))])
        .map(Reduced::Node)
}

/// `raise [exc [from cause]]`
pub fn raise(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let exc = children.optional_node("raised exception")?;
    let cause = children.optional_node("exception cause")?;
    children.done()?;
    if exc.is_none() && cause.is_some() {
        return Err(SerpentesError::shape("raised exception", "cause without exception"));
    }
    cx.node(
        NodeKind::Raise,
        [("exc", Value::from(exc)), ("cause", Value::from(cause))],
    )
    .map(Reduced::Node)
}

pub fn assert(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let test = children.node("asserted condition")?;
    let msg = children.optional_node("assertion message")?;
    children.done()?;
    cx.node(
        NodeKind::Assert,
        [("test", Value::from(test)), ("msg", Value::from(msg))],
    )
    .map(Reduced::Node)
}

/// `del a, b.c, d[0]`
pub fn delete(cx: &Reduction<'_>, children: Children) -> Result<Reduced> {
    let targets = collect_nodes(children.into_vec())?;
    if targets.is_empty() {
        return Err(SerpentesError::shape("deletion target", "nothing"));
    }
    let targets = targets
        .into_iter()
        .map(|target| targets::bind(target, Context::Delete))
        .collect::<Result<Vec<_>>>()?;
    cx.node(NodeKind::Delete, [("targets", Value::from(targets))])
        .map(Reduced::Node)
}

/// `pass`, `break`, `continue`: only the keyword token itself may be present.
pub fn keyword(cx: &Reduction<'_>, children: Children) -> Result<Reduced> {
    let kind = match cx.rule {
        Rule::PassStmt => NodeKind::Pass,
        Rule::BreakStmt => NodeKind::Break,
        Rule::ContinueStmt => NodeKind::Continue,
        other => return Err(SerpentesError::unrecognized("keyword statement", other.name())),
    };
    if let Some(extra) = children
        .into_vec()
        .into_iter()
        .find(|item| !matches!(item, Reduced::Token(_)))
    {
        return Err(SerpentesError::shape("no operands", extra.describe()));
    }
    cx.node(kind, Vec::new()).map(Reduced::Node)
}

/// `global a, b` and `nonlocal a, b`.
pub fn scope(cx: &Reduction<'_>, children: Children) -> Result<Reduced> {
    let kind = match cx.rule {
        Rule::GlobalStmt => NodeKind::Global,
        _ => NodeKind::Nonlocal,
    };
    let names = children
        .into_vec()
        .into_iter()
        .map(|item| identifier(Some(item), "declared name"))
        .collect::<Result<Vec<_>>>()?;
    if names.is_empty() {
        return Err(SerpentesError::shape("declared name", "nothing"));
    }
    cx.node(kind, [("names", Value::Scalar(Scalar::Identifiers(names)))])
        .map(Reduced::Node)
}

// ============================================================================
// IMPORTS
// ============================================================================

pub fn dotted_name(children: Children) -> Result<Reduced> {
    let mut parts = Vec::new();
    for item in children.into_vec() {
        let part = identifier(Some(item), "module path segment")?;
        if part != "." {
            parts.push(part);
        }
    }
    if parts.is_empty() {
        return Err(SerpentesError::shape("module path segment", "nothing"));
    }
    Ok(Reduced::Dotted(parts.join(".")))
}

fn alias_name(item: Option<Reduced>) -> Result<String> {
    match item {
        Some(Reduced::Dotted(path)) => Ok(path),
        other => identifier(other, "imported name"),
    }
}

/// `name [as asname]`
pub fn alias(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let name = alias_name(children.next())?;
    let asname = match children.next() {
        None | Some(Reduced::Absent) => None,
        item => Some(identifier(item, "import alias")?),
    };
    children.done()?;
    cx.node(
        NodeKind::Alias,
        [("name", Value::from(name)), ("asname", Value::from(asname))],
    )
    .map(Reduced::Node)
}

/// `from m import *`: the star is an alias without a rename.
pub fn import_star(cx: &Reduction<'_>, children: Children) -> Result<Reduced> {
    if let Some(extra) = children
        .into_vec()
        .into_iter()
        .find(|item| !matches!(item, Reduced::Token(_)))
    {
        return Err(SerpentesError::shape("`*`", extra.describe()));
    }
    cx.node(
        NodeKind::Alias,
        [("name", Value::from("*")), ("asname", Value::none())],
    )
    .map(Reduced::Node)
}

/// `import a.b as c, d`
pub fn import_name(cx: &Reduction<'_>, children: Children) -> Result<Reduced> {
    let names = of_kind(collect_nodes(children.into_vec())?, NodeKind::Alias, "import alias")?;
    cx.node(NodeKind::Import, [("names", Value::from(names))])
        .map(Reduced::Node)
}

/// The leading dots of a relative import. An ellipsis token counts three.
pub fn relative_level(children: Children) -> Result<Reduced> {
    let mut level = 0;
    for item in children.into_vec() {
        match item {
            Reduced::Token(token) if token.text.chars().all(|c| c == '.') => {
                level += token.text.len();
            }
            other => return Err(SerpentesError::shape("relative import dots", other.describe())),
        }
    }
    Ok(Reduced::Level(level))
}

/// `from [dots][module] import aliases`
pub fn import_from(cx: &Reduction<'_>, children: Children) -> Result<Reduced> {
    let mut level = 0;
    let mut module = None;
    let mut aliases = Vec::new();

    for item in children.into_vec() {
        match item {
            Reduced::Level(dots) if module.is_none() && aliases.is_empty() => level += dots,
            Reduced::Token(token)
                if module.is_none() && aliases.is_empty() && token.text.chars().all(|c| c == '.') =>
            {
                level += token.text.len();
            }
            Reduced::Dotted(path) if module.is_none() && aliases.is_empty() => module = Some(path),
            Reduced::Token(token) if module.is_none() && aliases.is_empty() => {
                module = Some(token.text)
            }
            Reduced::Absent => {}
            item @ (Reduced::Node(_) | Reduced::Nodes(_) | Reduced::Fragment(_)) => {
                aliases.extend(collect_nodes(vec![item])?)
            }
            other => return Err(SerpentesError::shape("import clause", other.describe())),
        }
    }

    if module.is_none() && level == 0 {
        return Err(SerpentesError::shape("module to import from", "nothing"));
    }
    let names = of_kind(aliases, NodeKind::Alias, "import alias")?;
    let level = i64::try_from(level)
        .map_err(|_| SerpentesError::shape("relative import level", level.to_string()))?;

    cx.node(
        NodeKind::ImportFrom,
        [
            ("module", Value::from(module)),
            ("names", Value::from(names)),
            ("level", Value::from(level)),
        ],
    )
    .map(Reduced::Node)
}

// ============================================================================
// BLOCKS AND CONTROL FLOW
// ============================================================================

pub fn block(children: Children) -> Result<Reduced> {
    collect_nodes(children.into_vec()).map(Reduced::Nodes)
}

/// `elif`, `else`, and `finally` blocks, held until the enclosing
/// statement places them.
pub fn clause(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let clause = match cx.rule {
        Rule::ElifClause => {
            let test = children.node("elif condition")?;
            let body = body(children.next(), "elif block")?;
            Clause::Elif {
                test,
                body,
                position: cx.position,
            }
        }
        Rule::ElseClause => Clause::Else(body(children.next(), "else block")?),
        Rule::FinallyClause => Clause::Finally(body(children.next(), "finally block")?),
        other => return Err(SerpentesError::unrecognized("clause", other.name())),
    };
    children.done()?;
    Ok(Reduced::Clause(clause))
}

fn conditional(position: Position, test: Node, body: Vec<Node>, orelse: Vec<Node>) -> Result<Node> {
    Node::new(
        NodeKind::If,
        position,
        [
            ("test", Value::from(test)),
            ("body", Value::from(body)),
            ("orelse", Value::from(orelse)),
        ],
    )
}

/// `if` with its `elif` chain folded into nested `orelse` blocks.
pub fn if_stmt(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let test = children.node("if condition")?;
    let then = body(children.next(), "if block")?;

    let mut elifs = Vec::new();
    let mut otherwise = Vec::new();
    let mut closed = false;
    for item in children.into_vec() {
        match item {
            Reduced::Clause(Clause::Elif { test, body, position }) if !closed => {
                elifs.push((position, test, body))
            }
            Reduced::Clause(Clause::Else(block)) if !closed => {
                otherwise = block;
                closed = true;
            }
            Reduced::Absent => {}
            other => return Err(SerpentesError::shape("elif or else clause", other.describe())),
        }
    }

    for (position, test, body) in elifs.into_iter().rev() {
        otherwise = vec![conditional(position, test, body, otherwise)?];
    }
    conditional(cx.position, test, then, otherwise).map(Reduced::Node)
}

/// `for target in iter: body [else: orelse]`
pub fn for_stmt(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let target = expression(cx, children.next(), "loop target")?;
    let target = targets::bind(target, Context::Write)?;
    let iter = expression(cx, children.next(), "loop iterable")?;
    let body = body(children.next(), "loop block")?;
    let orelse = orelse(children.next())?;
    children.done()?;

    cx.node(
        NodeKind::For,
        [
            ("target", Value::from(target)),
            ("iter", Value::from(iter)),
            ("body", Value::from(body)),
            ("orelse", Value::from(orelse)),
        ],
    )
    .map(Reduced::Node)
}

pub fn while_stmt(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let test = children.node("loop condition")?;
    let body = body(children.next(), "loop block")?;
    let orelse = orelse(children.next())?;
    children.done()?;

    cx.node(
        NodeKind::While,
        [
            ("test", Value::from(test)),
            ("body", Value::from(body)),
            ("orelse", Value::from(orelse)),
        ],
    )
    .map(Reduced::Node)
}

/// `try` with its handlers, `else`, and `finally`, in that order.
pub fn try_stmt(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let body = body(children.next(), "try block")?;

    let mut handlers = Vec::new();
    let mut otherwise = None;
    let mut finalbody = None;
    for item in children.into_vec() {
        match item {
            Reduced::Clause(Clause::Else(block)) if otherwise.is_none() && finalbody.is_none() => {
                otherwise = Some(block)
            }
            Reduced::Clause(Clause::Finally(block)) if finalbody.is_none() => finalbody = Some(block),
            Reduced::Absent => {}
            item @ (Reduced::Node(_) | Reduced::Nodes(_) | Reduced::Fragment(_))
                if otherwise.is_none() && finalbody.is_none() =>
            {
                handlers.extend(collect_nodes(vec![item])?)
            }
            other => return Err(SerpentesError::shape("try clause", other.describe())),
        }
    }

    if let Some(stray) = handlers.iter().find(|node| node.kind() != NodeKind::ExceptHandler) {
        return Err(SerpentesError::shape("except clause", format!("`{}` node", stray.kind())));
    }
    if handlers.is_empty() && finalbody.is_none() {
        return Err(SerpentesError::shape("except or finally clause", "nothing"));
    }
    if handlers.is_empty() && otherwise.is_some() {
        return Err(SerpentesError::shape("except clause before else", "else block"));
    }

    cx.node(
        NodeKind::Try,
        [
            ("body", Value::from(body)),
            ("handlers", Value::from(handlers)),
            ("orelse", Value::from(otherwise.unwrap_or_default())),
            ("finalbody", Value::from(finalbody.unwrap_or_default())),
        ],
    )
    .map(Reduced::Node)
}

/// `except [type [as name]]: body`
pub fn except_clause(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let body = body(children.next_back(), "except block")?;
    let kind = children.optional_node("exception type")?;
    let name = match children.next() {
        None | Some(Reduced::Absent) => None,
        item => Some(identifier(item, "exception name")?),
    };
    children.done()?;
    if kind.is_none() && name.is_some() {
        return Err(SerpentesError::shape("exception type", "name without type"));
    }

    cx.node(
        NodeKind::ExceptHandler,
        [
            ("type", Value::from(kind)),
            ("name", Value::from(name)),
            ("body", Value::from(body)),
        ],
    )
    .map(Reduced::Node)
}

/// `with item, ...: body`
pub fn with_stmt(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let body = body(children.next_back(), "with block")?;
    let items = of_kind(
        collect_nodes(children.into_vec())?,
        NodeKind::WithItem,
        "with item",
    )?;
    cx.node(
        NodeKind::With,
        [("items", Value::from(items)), ("body", Value::from(body))],
    )
    .map(Reduced::Node)
}

/// `expr [as target]`
pub fn with_item(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let context_expr = children.node("context manager")?;
    let optional_vars = children
        .optional_node("with target")?
        .map(|target| targets::bind(target, Context::Write))
        .transpose()?;
    children.done()?;

    cx.node(
        NodeKind::WithItem,
        [
            ("context_expr", Value::from(context_expr)),
            ("optional_vars", Value::from(optional_vars)),
        ],
    )
    .map(Reduced::Node)
}

// ============================================================================
// ROOT
// ============================================================================

pub fn module(cx: &Reduction<'_>, children: Children) -> Result<Reduced> {
    let body = collect_nodes(children.into_vec())?;
    cx.node(
        NodeKind::Module,
        [
            ("body", Value::from(body)),
            ("type_ignores", Value::from(Vec::<Node>::new())),
        ],
    )
    .map(Reduced::Node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Token;
    use crate::transform::TransformOptions;

    fn with_cx<T>(rule: Rule, f: impl FnOnce(&Reduction<'_>) -> T) -> T {
        let options = TransformOptions::default();
        f(&Reduction {
            rule,
            position: Position::new(1, 1, 4, 1),
            options: &options,
        })
    }

    fn name(cx: &Reduction<'_>, id: &str) -> Reduced {
        Reduced::Node(cx.name(id, Context::Read).unwrap())
    }

    fn unwrap_node(reduced: Result<Reduced>) -> Node {
        match reduced.unwrap() {
            Reduced::Node(node) => node,
            other => panic!("expected node, got {}", other.describe()),
        }
    }

    fn pass(cx: &Reduction<'_>) -> Reduced {
        Reduced::Nodes(vec![cx.node(NodeKind::Pass, Vec::new()).unwrap()])
    }

    #[test]
    fn test_chained_assignment_binds_every_target() {
        let node = with_cx(Rule::AssignStmt, |cx| {
            unwrap_node(assign(
                cx,
                Children::new(vec![
                    name(cx, "a"),
                    Reduced::Nodes(vec![
                        cx.name("b", Context::Read).unwrap(),
                        cx.name("c", Context::Read).unwrap(),
                    ]),
                    name(cx, "v"),
                ]),
            ))
        });
        let targets = node.get("targets").and_then(Value::as_list).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].context(), Some(Context::Write));
        assert_eq!(targets[1].kind(), NodeKind::Tuple);
        assert_eq!(targets[1].context(), Some(Context::Write));
        assert_eq!(
            node.get("value").and_then(Value::as_node).unwrap().context(),
            Some(Context::Read)
        );
    }

    #[test]
    fn test_annotated_simple_flag() {
        let node = with_cx(Rule::Annassign, |cx| {
            unwrap_node(annassign(cx, Children::new(vec![name(cx, "x"), name(cx, "int")])))
        });
        assert_eq!(node.get("simple"), Some(&Value::from(1_i64)));
        assert!(node.get("value").unwrap().is_none());
    }

    #[test]
    fn test_elif_chain_nests_into_orelse() {
        let node = with_cx(Rule::IfStmt, |cx| {
            let elif = Reduced::Clause(Clause::Elif {
                test: cx.name("b", Context::Read).unwrap(),
                body: vec![cx.node(NodeKind::Pass, Vec::new()).unwrap()],
                position: Position::new(3, 1, 4, 1),
            });
            let otherwise = Reduced::Clause(Clause::Else(vec![cx.node(NodeKind::Break, Vec::new()).unwrap()]));
            unwrap_node(if_stmt(
                cx,
                Children::new(vec![name(cx, "a"), pass(cx), elif, otherwise]),
            ))
        });

        let orelse = node.get("orelse").and_then(Value::as_list).unwrap();
        assert_eq!(orelse.len(), 1);
        assert_eq!(orelse[0].kind(), NodeKind::If);
        assert_eq!(orelse[0].position().line, 3);
        let inner = orelse[0].get("orelse").and_then(Value::as_list).unwrap();
        assert_eq!(inner[0].kind(), NodeKind::Break);
    }

    #[test]
    fn test_try_needs_handler_or_finally() {
        with_cx(Rule::TryStmt, |cx| {
            let err = try_stmt(cx, Children::new(vec![pass(cx)])).unwrap_err();
            assert!(matches!(err, SerpentesError::Shape { .. }));

            let err = try_stmt(
                cx,
                Children::new(vec![
                    pass(cx),
                    Reduced::Clause(Clause::Else(Vec::new())),
                    Reduced::Clause(Clause::Finally(Vec::new())),
                ]),
            )
            .unwrap_err();
            assert!(matches!(err, SerpentesError::Shape { .. }));
        });
    }

    #[test]
    fn test_relative_import_without_module() {
        let node = with_cx(Rule::ImportFrom, |cx| {
            let alias = unwrap_node(alias(
                cx,
                Children::new(vec![Reduced::Token(Token::new("NAME", "sibling"))]),
            ));
            unwrap_node(import_from(
                cx,
                Children::new(vec![Reduced::Level(2), Reduced::Node(alias)]),
            ))
        });
        assert!(node.get("module").unwrap().is_none());
        assert_eq!(node.get("level"), Some(&Value::from(2_i64)));
    }

    #[test]
    fn test_dotted_name_and_ellipsis_level() {
        let dotted = dotted_name(Children::new(vec![
            Reduced::Token(Token::new("NAME", "os")),
            Reduced::Token(Token::new("DOT", ".")),
            Reduced::Token(Token::new("NAME", "path")),
        ]))
        .unwrap();
        assert_eq!(dotted, Reduced::Dotted("os.path".to_string()));

        let level = relative_level(Children::new(vec![
            Reduced::Token(Token::new("ELLIPSIS", "...")),
            Reduced::Token(Token::new("DOT", ".")),
        ]))
        .unwrap();
        assert_eq!(level, Reduced::Level(4));
    }

    #[test]
    fn test_delete_marks_targets() {
        let node = with_cx(Rule::DelStmt, |cx| {
            unwrap_node(delete(cx, Children::new(vec![name(cx, "a"), name(cx, "b")])))
        });
        let targets = node.get("targets").and_then(Value::as_list).unwrap();
        assert!(targets.iter().all(|t| t.context() == Some(Context::Delete)));
    }
}
