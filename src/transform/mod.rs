//! Syntax-directed tree construction.
//!
//! The transformer reduces a [`ParseTree`] bottom-up: children first, then the
//! handler registered for the parent's rule. Each handler sees only
//! already-reduced children plus the reduction's position, and returns a
//! [`Reduced`] value: a node, a list of nodes, or an intermediate value
//! (operator, key/value pair, clause) that some enclosing handler consumes.
//!
//! Handlers are grouped by concern in the submodules; the exhaustive `match`
//! in [`dispatch`] is the only place rules are tied to handlers.

use std::collections::VecDeque;

use crate::ast::{Context, Node, NodeKind, Operator, Position, Value};
use crate::errors::{Result, SerpentesError};
use crate::syntax::{ParseTree, Token};

pub mod comprehensions;
pub mod containers;
pub mod definitions;
pub mod expressions;
pub mod literals;
pub mod operators;
pub mod options;
pub mod rules;
pub mod statements;
pub mod targets;

pub use options::{FloatLiterals, TransformOptions};
pub use rules::Rule;

// ============================================================================
// REDUCED VALUES
// ============================================================================

/// What a reduction hands to its parent.
#[derive(Debug, Clone, PartialEq)]
pub enum Reduced {
    Node(Node),
    Nodes(Vec<Node>),
    Operator(Operator),
    Token(Token),
    /// A branch whose rule has no handler, kept with its reduced children.
    Fragment(Fragment),
    /// Placeholder for an optional slot left empty.
    Absent,
    /// One `key: value` entry of a dict display.
    Pair(Node, Node),
    /// One `**mapping` entry of a dict display.
    Unpack(Node),
    /// A dotted module path such as `os.path`.
    Dotted(String),
    /// Number of leading dots in a relative import.
    Level(usize),
    Clause(Clause),
    Param(Param),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub rule: String,
    pub children: Vec<Reduced>,
    pub position: Position,
}

/// Trailing blocks of compound statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Elif {
        test: Node,
        body: Vec<Node>,
        position: Position,
    },
    Else(Vec<Node>),
    Finally(Vec<Node>),
}

/// One piece of a parameter list.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Plain { arg: Node, default: Option<Node> },
    VarArgs(Option<Node>),
    KwArgs(Node),
    /// The `/` marker closing the positional-only parameters.
    PositionalOnly,
}

impl Reduced {
    /// Short description used in shape errors.
    pub fn describe(&self) -> String {
        match self {
            Reduced::Node(node) => format!("`{}` node", node.kind()),
            Reduced::Nodes(nodes) => format!("list of {} nodes", nodes.len()),
            Reduced::Operator(op) => format!("operator `{op}`"),
            Reduced::Token(token) => format!("token `{}`", token.text),
            Reduced::Fragment(fragment) => format!("`{}` fragment", fragment.rule),
            Reduced::Absent => "nothing".to_string(),
            Reduced::Pair(..) => "key/value pair".to_string(),
            Reduced::Unpack(_) => "dict unpacking".to_string(),
            Reduced::Dotted(name) => format!("dotted name `{name}`"),
            Reduced::Level(level) => format!("relative level {level}"),
            Reduced::Clause(_) => "clause".to_string(),
            Reduced::Param(_) => "parameter".to_string(),
        }
    }
}

pub(crate) fn describe(item: Option<&Reduced>) -> String {
    item.map_or_else(|| "nothing".to_string(), Reduced::describe)
}

// ============================================================================
// TRANSFORMER
// ============================================================================

/// Bottom-up reducer from parse trees to nodes.
///
/// Holds configuration only; one transformer can serve any number of parses,
/// from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    options: TransformOptions,
}

impl Transformer {
    pub fn new(options: TransformOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Reduces a whole parse tree, which must produce a module.
    pub fn transform(&self, tree: ParseTree) -> Result<Node> {
        match self.reduce(tree)? {
            Reduced::Node(node) if node.kind() == NodeKind::Module => {
                log::debug!(
                    "built module with {} statements at {}",
                    node.get("body").and_then(Value::as_list).map_or(0, <[Node]>::len),
                    node.position()
                );
                Ok(node)
            }
            other => Err(SerpentesError::NotAModule {
                found: other.describe(),
            }),
        }
    }

    /// Reduces one subtree, leaf-first.
    pub fn reduce(&self, tree: ParseTree) -> Result<Reduced> {
        match tree {
            ParseTree::Absent => Ok(Reduced::Absent),
            ParseTree::Token(token) => Ok(Reduced::Token(token)),
            ParseTree::Rule {
                rule,
                children,
                position,
            } => {
                let children = children
                    .into_iter()
                    .map(|child| self.reduce(child))
                    .collect::<Result<Vec<_>>>()?;
                match Rule::from_name(&rule) {
                    Some(handled) => self.apply(handled, position, children),
                    None => {
                        log::debug!("passing `{rule}` through as a fragment");
                        Ok(Reduced::Fragment(Fragment {
                            rule,
                            children,
                            position,
                        }))
                    }
                }
            }
        }
    }

    /// Runs the handler for one reduction event.
    pub fn apply(&self, rule: Rule, position: Position, children: Vec<Reduced>) -> Result<Reduced> {
        log::trace!("reducing `{}` with {} children", rule.name(), children.len());
        let reduction = Reduction {
            rule,
            position,
            options: &self.options,
        };
        dispatch(&reduction, Children::new(children)).map_err(|err| err.in_rule(rule.name(), position))
    }
}

/// The event a handler is answering.
#[derive(Debug, Clone, Copy)]
pub struct Reduction<'a> {
    pub rule: Rule,
    pub position: Position,
    pub options: &'a TransformOptions,
}

impl Reduction<'_> {
    /// Builds a node positioned at this reduction.
    pub fn node<I>(&self, kind: NodeKind, fields: I) -> Result<Node>
    where
        I: IntoIterator<Item = (&'static str, Value)>,
    {
        Node::new(kind, self.position, fields)
    }

    pub fn name(&self, id: impl Into<String>, context: Context) -> Result<Node> {
        self.node(
            NodeKind::Name,
            [("id", Value::from(id.into())), ("ctx", context.into())],
        )
    }

    /// A tuple display synthesized from a bare comma-separated list.
    pub fn tuple(&self, elts: Vec<Node>) -> Result<Node> {
        self.node(
            NodeKind::Tuple,
            [("elts", Value::from(elts)), ("ctx", Context::Read.into())],
        )
    }
}

fn dispatch(cx: &Reduction<'_>, children: Children) -> Result<Reduced> {
    match cx.rule {
        Rule::ConstTrue | Rule::ConstFalse | Rule::ConstNone => literals::keyword(cx, children),
        Rule::ConstNumber | Rule::Number => literals::number(cx, children),
        Rule::String => literals::string(cx, children),
        Rule::StringConcat => literals::concat(cx, children),

        Rule::Var => expressions::var(cx, children),
        Rule::StarExpr | Rule::Starargs => expressions::starred(cx, children),

        Rule::AddOp
        | Rule::MulOp
        | Rule::ShiftOp
        | Rule::UnaryOp
        | Rule::CompOp
        | Rule::AugassignOp
        | Rule::OrOp
        | Rule::AndOp
        | Rule::NotOp => operators::lookup(cx, children),

        Rule::Comparison => operators::comparison(cx, children),
        Rule::ArithExpr
        | Rule::Term
        | Rule::ShiftExpr
        | Rule::AndExpr
        | Rule::XorExpr
        | Rule::OrExpr
        | Rule::Power => operators::binary(cx, children),
        Rule::OrTest | Rule::AndTest => operators::boolean(cx, children),
        Rule::NotTest | Rule::Factor => operators::unary(cx, children),

        Rule::Ternary => expressions::ternary(cx, children),
        Rule::AssignExpr => expressions::named(cx, children),
        Rule::AwaitExpr => expressions::await_expr(cx, children),
        Rule::Funccall => expressions::call(cx, children),
        Rule::Arguments => expressions::arguments(children),
        Rule::Argvalue => expressions::keyword(cx, children),
        Rule::Kwargs => expressions::kwargs(cx, children),
        Rule::Getattr => expressions::getattr(cx, children),
        Rule::AttrChain => expressions::attr_chain(cx, children),
        Rule::Getitem => expressions::subscript(cx, children),
        Rule::Slice => expressions::slice(cx, children),

        Rule::List | Rule::Tuple | Rule::Set => containers::sequence(cx, children),
        Rule::Dict => containers::dict(cx, children),
        Rule::KeyValue => containers::key_value(children),
        Rule::DictUnpack => containers::unpack(children),

        Rule::CompFor | Rule::AsyncCompFor => comprehensions::clause(cx, children),
        Rule::ListComprehension | Rule::SetComprehension | Rule::GeneratorExpression => {
            comprehensions::comprehension(cx, children)
        }
        Rule::DictComprehension => comprehensions::dict_comprehension(cx, children),

        Rule::ExprStmt => statements::expr_stmt(cx, children),
        Rule::AssignStmt => statements::assign(cx, children),
        Rule::Augassign => statements::augassign(cx, children),
        Rule::Annassign => statements::annassign(cx, children),
        Rule::ReturnStmt | Rule::YieldExpr => statements::optional_value(cx, children),
        Rule::YieldFrom => statements::yield_from(cx, children),
        Rule::RaiseStmt => statements::raise(cx, children),
        Rule::AssertStmt => statements::assert(cx, children),
        Rule::DelStmt => statements::delete(cx, children),
        Rule::PassStmt | Rule::BreakStmt | Rule::ContinueStmt => statements::keyword(cx, children),
        Rule::GlobalStmt | Rule::NonlocalStmt => statements::scope(cx, children),

        Rule::DottedName => statements::dotted_name(children),
        Rule::DottedAsName | Rule::ImportAsName => statements::alias(cx, children),
        Rule::ImportStar => statements::import_star(cx, children),
        Rule::ImportName => statements::import_name(cx, children),
        Rule::RelativeLevel => statements::relative_level(children),
        Rule::ImportFrom => statements::import_from(cx, children),

        Rule::Suite | Rule::SimpleStmt => statements::block(children),
        Rule::IfStmt => statements::if_stmt(cx, children),
        Rule::ElifClause | Rule::ElseClause | Rule::FinallyClause => {
            statements::clause(cx, children)
        }
        Rule::ForStmt => statements::for_stmt(cx, children),
        Rule::WhileStmt => statements::while_stmt(cx, children),
        Rule::TryStmt => statements::try_stmt(cx, children),
        Rule::ExceptClause => statements::except_clause(cx, children),
        Rule::WithStmt => statements::with_stmt(cx, children),
        Rule::WithItem => statements::with_item(cx, children),

        Rule::Funcdef => definitions::funcdef(cx, children),
        Rule::Parameters => definitions::parameters(cx, children),
        Rule::Param => definitions::param(cx, children),
        Rule::DefaultParam => definitions::default_param(cx, children),
        Rule::Starparams => definitions::starparams(cx, children),
        Rule::Kwparams => definitions::kwparams(cx, children),
        Rule::Slash => Ok(Reduced::Param(Param::PositionalOnly)),
        Rule::Lambdef => definitions::lambdef(cx, children),
        Rule::Classdef => definitions::classdef(cx, children),
        Rule::Decorator => definitions::decorator(cx, children),
        Rule::Decorators => Ok(Reduced::Nodes(collect_nodes(children.into_vec())?)),
        Rule::Decorated => definitions::decorated(children),
        Rule::AsyncStmt => definitions::async_stmt(cx, children),

        Rule::FileInput | Rule::Module => statements::module(cx, children),
    }
}

// ============================================================================
// CHILD ACCESS
// ============================================================================

/// The reduced children of one event, consumed front to back.
#[derive(Debug, Default)]
pub struct Children {
    items: VecDeque<Reduced>,
}

impl Children {
    pub fn new(items: Vec<Reduced>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn next(&mut self) -> Option<Reduced> {
        self.items.pop_front()
    }

    pub fn next_back(&mut self) -> Option<Reduced> {
        self.items.pop_back()
    }

    /// A required node child.
    pub fn node(&mut self, what: &str) -> Result<Node> {
        expect_node(self.next(), what)
    }

    /// A required node child, taken from the end.
    pub fn node_back(&mut self, what: &str) -> Result<Node> {
        expect_node(self.next_back(), what)
    }

    /// An optional node child: missing at the tail or given as `Absent`.
    pub fn optional_node(&mut self, what: &str) -> Result<Option<Node>> {
        match self.next() {
            None | Some(Reduced::Absent) => Ok(None),
            Some(Reduced::Node(node)) => Ok(Some(node)),
            Some(other) => Err(SerpentesError::shape(what, other.describe())),
        }
    }

    /// A required identifier: a token or a plain name reference.
    pub fn identifier(&mut self, what: &str) -> Result<String> {
        identifier(self.next(), what)
    }

    /// Fails if any child is left unconsumed.
    pub fn done(self) -> Result<()> {
        match self.items.front() {
            None => Ok(()),
            Some(extra) => Err(SerpentesError::shape("no further children", extra.describe())),
        }
    }

    pub fn into_vec(self) -> Vec<Reduced> {
        self.items.into()
    }
}

pub(crate) fn expect_node(item: Option<Reduced>, what: &str) -> Result<Node> {
    match item {
        Some(Reduced::Node(node)) => Ok(node),
        other => Err(SerpentesError::shape(what, describe(other.as_ref()))),
    }
}

pub(crate) fn identifier(item: Option<Reduced>, what: &str) -> Result<String> {
    match item {
        Some(Reduced::Token(token)) => Ok(token.text),
        Some(Reduced::Node(node)) if node.kind() == NodeKind::Name => node
            .into_field("id")
            .and_then(|id| id.as_str().map(str::to_string))
            .ok_or_else(|| SerpentesError::shape(what, "name without identifier")),
        other => Err(SerpentesError::shape(what, describe(other.as_ref()))),
    }
}

/// A bare comma-separated list in an expression slot. Several items, or a
/// single item followed by a comma, form a tuple; a lone item stands for
/// itself.
pub(crate) fn bare_list(cx: &Reduction<'_>, item: Reduced, what: &str) -> Result<Node> {
    let trailing_comma = has_comma(&item);
    let mut elts = collect_nodes(vec![item])?;
    match elts.len() {
        0 => Err(SerpentesError::shape(what, "empty list")),
        1 if !trailing_comma => Ok(elts.remove(0)),
        _ => cx.tuple(elts),
    }
}

fn has_comma(item: &Reduced) -> bool {
    match item {
        Reduced::Token(token) => token.text == ",",
        Reduced::Fragment(fragment) => fragment.children.iter().any(has_comma),
        _ => false,
    }
}

/// In-order scan collecting every node, descending through lists and
/// fragments and skipping bare tokens and placeholders.
pub(crate) fn collect_nodes(items: Vec<Reduced>) -> Result<Vec<Node>> {
    let mut nodes = Vec::new();
    collect_into(items, &mut nodes)?;
    Ok(nodes)
}

fn collect_into(items: Vec<Reduced>, nodes: &mut Vec<Node>) -> Result<()> {
    for item in items {
        match item {
            Reduced::Node(node) => nodes.push(node),
            Reduced::Nodes(list) => nodes.extend(list),
            Reduced::Fragment(fragment) => collect_into(fragment.children, nodes)?,
            Reduced::Token(_) | Reduced::Absent => {}
            other => {
                return Err(SerpentesError::unrecognized(
                    "element in node list",
                    other.describe(),
                ))
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_nodes_descends_fragments_in_order() {
        let cx = Reduction {
            rule: Rule::Var,
            position: Position::default(),
            options: &TransformOptions::default(),
        };
        let a = cx.name("a", Context::Read).unwrap();
        let b = cx.name("b", Context::Read).unwrap();
        let c = cx.name("c", Context::Read).unwrap();

        let items = vec![
            Reduced::Node(a.clone()),
            Reduced::Token(Token::new("COMMA", ",")),
            Reduced::Fragment(Fragment {
                rule: "testlist".to_string(),
                children: vec![Reduced::Nodes(vec![b.clone()]), Reduced::Absent],
                position: Position::default(),
            }),
            Reduced::Node(c.clone()),
        ];
        assert_eq!(collect_nodes(items).unwrap(), vec![a, b, c]);
    }

    #[test]
    fn test_collect_nodes_rejects_stray_operator() {
        let err = collect_nodes(vec![Reduced::Operator(Operator::Add)]).unwrap_err();
        assert!(matches!(err, SerpentesError::Unrecognized { .. }));
    }

    #[test]
    fn test_unhandled_rule_becomes_fragment() {
        let transformer = Transformer::default();
        let reduced = transformer
            .reduce(ParseTree::rule(
                "testlist_comp",
                Position::new(1, 1, 1, 4),
                vec![ParseTree::token("NAME", "x")],
            ))
            .unwrap();
        match reduced {
            Reduced::Fragment(fragment) => {
                assert_eq!(fragment.rule, "testlist_comp");
                assert_eq!(fragment.children.len(), 1);
            }
            other => panic!("expected fragment, got {}", other.describe()),
        }
    }

    #[test]
    fn test_errors_carry_rule_and_position() {
        let transformer = Transformer::default();
        let position = Position::new(4, 2, 4, 9);
        let err = transformer
            .apply(Rule::AddOp, position, vec![Reduced::Token(Token::new("OP", "%%"))])
            .unwrap_err();
        assert_eq!(err.rule(), Some("add_op"));
        assert!(matches!(err, SerpentesError::InRule { position: p, .. } if p == position));
    }
}
