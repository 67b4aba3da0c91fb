//! Function, lambda, and class definitions, decorators, and `async` forms.
//!
//! Parameter lists arrive as a flat run of pieces (`Param` values and bare
//! `arg` nodes) and are sorted into the seven slots of an `arguments` node by
//! [`ArgumentsBuilder`], which also enforces the ordering rules a parameter
//! list must obey.

use super::{collect_nodes, describe, expressions, statements, Children, Param, Reduced, Reduction};
use crate::ast::{Context, Node, NodeKind, Position, Value};
use crate::errors::{Result, SerpentesError};

// ============================================================================
// PARAMETERS
// ============================================================================

/// `name [: annotation]`
pub fn param(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let arg = children.identifier("parameter name")?;
    let annotation = children.optional_node("parameter annotation")?;
    children.done()?;
    cx.node(
        NodeKind::Arg,
        [("arg", Value::from(arg)), ("annotation", Value::from(annotation))],
    )
    .map(Reduced::Node)
}

/// `param = default`
pub fn default_param(_cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let arg = children.node("parameter")?;
    let default = children.node("parameter default")?;
    children.done()?;
    Ok(Reduced::Param(Param::Plain {
        arg,
        default: Some(default),
    }))
}

/// `*args`, or a bare `*` opening the keyword-only parameters.
pub fn starparams(_cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let arg = children.optional_node("variadic parameter")?;
    children.done()?;
    Ok(Reduced::Param(Param::VarArgs(arg)))
}

/// `**kwargs`
pub fn kwparams(_cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let arg = children.node("keyword parameter")?;
    children.done()?;
    Ok(Reduced::Param(Param::KwArgs(arg)))
}

pub fn parameters(cx: &Reduction<'_>, children: Children) -> Result<Reduced> {
    ArgumentsBuilder::from_pieces(children.into_vec())?
        .build(cx.position)
        .map(Reduced::Node)
}

/// Accumulates parameter pieces in source order.
#[derive(Debug, Default)]
struct ArgumentsBuilder {
    posonlyargs: Vec<Node>,
    args: Vec<Node>,
    defaults: Vec<Node>,
    /// `Some` once `*` has been seen; holds `*args` if named.
    vararg: Option<Option<Node>>,
    kwonlyargs: Vec<Node>,
    kw_defaults: Vec<Option<Node>>,
    kwarg: Option<Node>,
}

impl ArgumentsBuilder {
    fn from_pieces(pieces: Vec<Reduced>) -> Result<Self> {
        let mut builder = Self::default();
        for piece in pieces {
            builder.push(piece)?;
        }
        Ok(builder)
    }

    fn push(&mut self, piece: Reduced) -> Result<()> {
        if self.kwarg.is_some() && !matches!(piece, Reduced::Token(_) | Reduced::Absent) {
            return Err(SerpentesError::shape("nothing after `**` parameter", piece.describe()));
        }
        match piece {
            Reduced::Node(arg) => self.plain(arg, None),
            Reduced::Param(Param::Plain { arg, default }) => self.plain(arg, default),
            Reduced::Param(Param::PositionalOnly) => self.positional_only(),
            Reduced::Param(Param::VarArgs(arg)) => {
                if self.vararg.is_some() {
                    return Err(SerpentesError::shape("a single `*` parameter", "a second `*`"));
                }
                if let Some(arg) = &arg {
                    check_arg(arg)?;
                }
                self.vararg = Some(arg);
                Ok(())
            }
            Reduced::Param(Param::KwArgs(arg)) => {
                check_arg(&arg)?;
                self.kwarg = Some(arg);
                Ok(())
            }
            Reduced::Fragment(fragment) => fragment
                .children
                .into_iter()
                .try_for_each(|piece| self.push(piece)),
            Reduced::Nodes(args) => args.into_iter().try_for_each(|arg| self.plain(arg, None)),
            Reduced::Token(_) | Reduced::Absent => Ok(()),
            other => Err(SerpentesError::shape("parameter", other.describe())),
        }
    }

    fn plain(&mut self, arg: Node, default: Option<Node>) -> Result<()> {
        check_arg(&arg)?;
        if self.vararg.is_some() {
            self.kwonlyargs.push(arg);
            self.kw_defaults.push(default);
            return Ok(());
        }
        match default {
            Some(default) => self.defaults.push(default),
            None if !self.defaults.is_empty() => {
                return Err(SerpentesError::shape(
                    "parameter default",
                    "non-default parameter after a default",
                ))
            }
            None => {}
        }
        self.args.push(arg);
        Ok(())
    }

    fn positional_only(&mut self) -> Result<()> {
        if self.vararg.is_some() || !self.posonlyargs.is_empty() || self.args.is_empty() {
            return Err(SerpentesError::shape(
                "`/` after at least one positional parameter",
                "misplaced `/`",
            ));
        }
        self.posonlyargs = std::mem::take(&mut self.args);
        Ok(())
    }

    fn build(self, position: Position) -> Result<Node> {
        if matches!(self.vararg, Some(None)) && self.kwonlyargs.is_empty() {
            return Err(SerpentesError::shape(
                "keyword-only parameter after bare `*`",
                "nothing",
            ));
        }
        Node::new(
            NodeKind::Arguments,
            position,
            [
                ("posonlyargs", Value::from(self.posonlyargs)),
                ("args", Value::from(self.args)),
                ("vararg", Value::from(self.vararg.flatten())),
                ("kwonlyargs", Value::from(self.kwonlyargs)),
                ("kw_defaults", Value::from(self.kw_defaults)),
                ("kwarg", Value::from(self.kwarg)),
                ("defaults", Value::from(self.defaults)),
            ],
        )
    }
}

fn check_arg(arg: &Node) -> Result<()> {
    if arg.kind() == NodeKind::Arg {
        Ok(())
    } else {
        Err(SerpentesError::shape("parameter", format!("`{}` node", arg.kind())))
    }
}

/// The parameter slot of a `def` or `lambda`: a built `arguments` node, a
/// grouping the grammar left unnamed, or nothing at all.
fn signature(position: Position, item: Option<Reduced>) -> Result<Node> {
    match item {
        None | Some(Reduced::Absent) => ArgumentsBuilder::default().build(position),
        Some(Reduced::Node(node)) if node.kind() == NodeKind::Arguments => Ok(node),
        Some(piece @ (Reduced::Fragment(_) | Reduced::Param(_) | Reduced::Node(_))) => {
            ArgumentsBuilder::from_pieces(vec![piece])?.build(position)
        }
        other => Err(SerpentesError::shape("parameter list", describe(other.as_ref()))),
    }
}

// ============================================================================
// DEFINITIONS
// ============================================================================

/// `def name(parameters) -> returns: body`
pub fn funcdef(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let name = children.identifier("function name")?;
    let body = statements::body(children.next_back(), "function body")?;

    // A lone node in the parameter slot is the return annotation when the
    // grammar dropped an empty parameter list.
    let (args, returns) = match children.next() {
        Some(Reduced::Node(node))
            if !matches!(node.kind(), NodeKind::Arguments | NodeKind::Arg) =>
        {
            (signature(cx.position, None)?, Some(node))
        }
        item => (
            signature(cx.position, item)?,
            children.optional_node("return annotation")?,
        ),
    };
    children.done()?;

    cx.node(
        NodeKind::FunctionDef,
        [
            ("name", Value::from(name)),
            ("args", Value::from(args)),
            ("body", Value::from(body)),
            ("decorator_list", Value::from(Vec::<Node>::new())),
            ("returns", Value::from(returns)),
        ],
    )
    .map(Reduced::Node)
}

/// `lambda parameters: body`
pub fn lambdef(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let body = children.node_back("lambda body")?;
    let args = signature(cx.position, children.next())?;
    children.done()?;
    cx.node(
        NodeKind::Lambda,
        [("args", Value::from(args)), ("body", Value::from(body))],
    )
    .map(Reduced::Node)
}

/// `class name(bases, keywords): body`
pub fn classdef(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let name = children.identifier("class name")?;
    let body = statements::body(children.next_back(), "class body")?;
    let (bases, keywords) = expressions::classify_arguments(children.into_vec())?;

    cx.node(
        NodeKind::ClassDef,
        [
            ("name", Value::from(name)),
            ("bases", Value::from(bases)),
            ("keywords", Value::from(keywords)),
            ("body", Value::from(body)),
            ("decorator_list", Value::from(Vec::<Node>::new())),
        ],
    )
    .map(Reduced::Node)
}

/// `@expr` or `@expr(arguments)`. A parenthesized argument list, even an
/// empty one, makes the decorator a call.
pub fn decorator(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let func = match children.next() {
        Some(Reduced::Dotted(path)) => dotted_reference(cx.position, &path)?,
        Some(Reduced::Node(node)) => node,
        other => return Err(SerpentesError::shape("decorator", describe(other.as_ref()))),
    };

    let arguments = match children.next() {
        None | Some(Reduced::Absent) => None,
        Some(item) => Some(item),
    };
    children.done()?;

    let Some(arguments) = arguments else {
        return Ok(Reduced::Node(func));
    };
    let (args, keywords) = expressions::classify_arguments(vec![arguments])?;
    cx.node(
        NodeKind::Call,
        [
            ("func", Value::from(func)),
            ("args", Value::from(args)),
            ("keywords", Value::from(keywords)),
        ],
    )
    .map(Reduced::Node)
}

// `a.b.c` read as an expression: a name followed by attribute accesses.
fn dotted_reference(position: Position, path: &str) -> Result<Node> {
    let mut parts = path.split('.');
    let first = parts
        .next()
        .filter(|part| !part.is_empty())
        .ok_or_else(|| SerpentesError::unrecognized("decorator name", path))?;
    let mut node = Node::new(
        NodeKind::Name,
        position,
        [("id", Value::from(first)), ("ctx", Context::Read.into())],
    )?;
    for part in parts {
        node = Node::new(
            NodeKind::Attribute,
            position,
            [
                ("value", Value::from(node)),
                ("attr", Value::from(part)),
                ("ctx", Context::Read.into()),
            ],
        )?;
    }
    Ok(node)
}

/// Attaches the decorators to the definition that follows them.
pub fn decorated(mut children: Children) -> Result<Reduced> {
    let definition = children.node_back("decorated definition")?;
    match definition.kind() {
        NodeKind::FunctionDef | NodeKind::AsyncFunctionDef | NodeKind::ClassDef => {}
        other => return Err(SerpentesError::unrecognized("decorated definition", other.name())),
    }
    let decorators = collect_nodes(children.into_vec())?;
    if decorators.is_empty() {
        return Err(SerpentesError::shape("decorator", "nothing"));
    }
    definition
        .with_field("decorator_list", Value::from(decorators))
        .map(Reduced::Node)
}

/// `async def`, `async for`, `async with`: the same statement under its async
/// kind, positioned from the `async` keyword.
pub fn async_stmt(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let node = children.node_back("async statement")?;
    if let Some(extra) = children
        .into_vec()
        .into_iter()
        .find(|item| !matches!(item, Reduced::Token(_)))
    {
        return Err(SerpentesError::shape("async statement", extra.describe()));
    }
    let twin = node
        .kind()
        .async_variant()
        .ok_or_else(|| SerpentesError::unrecognized("async statement", node.kind().name()))?;
    Node::new(twin, cx.position, node.into_fields()).map(Reduced::Node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Token;
    use crate::transform::{Rule, TransformOptions};

    fn reduction(rule: Rule, options: &TransformOptions) -> Reduction<'_> {
        Reduction {
            rule,
            position: Position::new(1, 1, 2, 1),
            options,
        }
    }

    fn arg(cx: &Reduction<'_>, name: &str) -> Node {
        match param(cx, Children::new(vec![Reduced::Token(Token::new("NAME", name))])).unwrap() {
            Reduced::Node(node) => node,
            other => panic!("expected arg, got {}", other.describe()),
        }
    }

    fn names(value: Option<&Value>) -> Vec<String> {
        value
            .and_then(Value::as_list)
            .unwrap()
            .iter()
            .map(|node| node.get("arg").and_then(Value::as_str).unwrap().to_string())
            .collect()
    }

    fn default(cx: &Reduction<'_>) -> Node {
        cx.node(NodeKind::Constant, [("value", Value::from(0_i64))]).unwrap()
    }

    #[test]
    fn test_full_parameter_list() {
        let options = TransformOptions::default();
        let cx = reduction(Rule::Parameters, &options);
        // def f(a, /, b, c=0, *rest, d, e=0, **kw)
        let pieces = vec![
            Reduced::Node(arg(&cx, "a")),
            Reduced::Param(Param::PositionalOnly),
            Reduced::Node(arg(&cx, "b")),
            Reduced::Param(Param::Plain {
                arg: arg(&cx, "c"),
                default: Some(default(&cx)),
            }),
            Reduced::Param(Param::VarArgs(Some(arg(&cx, "rest")))),
            Reduced::Node(arg(&cx, "d")),
            Reduced::Param(Param::Plain {
                arg: arg(&cx, "e"),
                default: Some(default(&cx)),
            }),
            Reduced::Param(Param::KwArgs(arg(&cx, "kw"))),
        ];

        let node = match parameters(&cx, Children::new(pieces)).unwrap() {
            Reduced::Node(node) => node,
            other => panic!("expected arguments, got {}", other.describe()),
        };
        assert_eq!(names(node.get("posonlyargs")), ["a"]);
        assert_eq!(names(node.get("args")), ["b", "c"]);
        assert_eq!(names(node.get("kwonlyargs")), ["d", "e"]);
        assert_eq!(node.get("defaults").and_then(Value::as_list).map(<[Node]>::len), Some(1));
        match node.get("kw_defaults") {
            Some(Value::Sparse(slots)) => {
                assert!(slots[0].is_none());
                assert!(slots[1].is_some());
            }
            other => panic!("expected sparse defaults, got {other:?}"),
        }
        assert!(!node.get("vararg").unwrap().is_none());
        assert!(!node.get("kwarg").unwrap().is_none());
    }

    #[test]
    fn test_parameter_ordering_errors() {
        let options = TransformOptions::default();
        let cx = reduction(Rule::Parameters, &options);

        let bare_star = vec![Reduced::Node(arg(&cx, "a")), Reduced::Param(Param::VarArgs(None))];
        assert!(parameters(&cx, Children::new(bare_star)).is_err());

        let default_first = vec![
            Reduced::Param(Param::Plain {
                arg: arg(&cx, "a"),
                default: Some(default(&cx)),
            }),
            Reduced::Node(arg(&cx, "b")),
        ];
        assert!(parameters(&cx, Children::new(default_first)).is_err());

        let after_kwarg = vec![
            Reduced::Param(Param::KwArgs(arg(&cx, "kw"))),
            Reduced::Node(arg(&cx, "late")),
        ];
        assert!(parameters(&cx, Children::new(after_kwarg)).is_err());
    }

    #[test]
    fn test_dotted_decorator_call() {
        let options = TransformOptions::default();
        let cx = reduction(Rule::Decorator, &options);
        let node = match decorator(
            &cx,
            Children::new(vec![Reduced::Dotted("app.route".to_string()), Reduced::Nodes(Vec::new())]),
        )
        .unwrap()
        {
            Reduced::Node(node) => node,
            other => panic!("expected call, got {}", other.describe()),
        };
        assert_eq!(node.kind(), NodeKind::Call);
        let func = node.get("func").and_then(Value::as_node).unwrap();
        assert_eq!(func.kind(), NodeKind::Attribute);
        assert_eq!(func.get("attr").and_then(Value::as_str), Some("route"));
    }

    #[test]
    fn test_async_twin_keeps_fields() {
        let options = TransformOptions::default();
        let cx = reduction(Rule::Funcdef, &options);
        let pass = cx.node(NodeKind::Pass, Vec::new()).unwrap();
        let def = funcdef(
            &cx,
            Children::new(vec![
                Reduced::Token(Token::new("NAME", "fetch")),
                Reduced::Nodes(vec![pass]),
            ]),
        )
        .unwrap();

        let async_cx = reduction(Rule::AsyncStmt, &options);
        let node = match async_stmt(&async_cx, Children::new(vec![def])).unwrap() {
            Reduced::Node(node) => node,
            other => panic!("expected node, got {}", other.describe()),
        };
        assert_eq!(node.kind(), NodeKind::AsyncFunctionDef);
        assert_eq!(node.get("name").and_then(Value::as_str), Some("fetch"));
    }
}
