//! Operator lookups and operator applications.
//!
//! Precedence is not computed here: it is already encoded by which grammar
//! rule fired, so each application wraps exactly one operator.

use super::{describe, expect_node, Children, Reduced, Reduction, Rule};
use crate::ast::{NodeKind, Operator, OperatorClass, Value};
use crate::errors::{Result, SerpentesError};

/// Resolves an operator rule's token(s) to an [`Operator`].
pub fn lookup(cx: &Reduction<'_>, children: Children) -> Result<Reduced> {
    let text = lexeme(children)?;
    let op = match cx.rule {
        Rule::AddOp => Operator::binary(&text).filter(|op| matches!(op, Operator::Add | Operator::Sub)),
        Rule::MulOp => Operator::binary(&text).filter(|op| {
            matches!(
                op,
                Operator::Mult | Operator::MatMult | Operator::Div | Operator::FloorDiv | Operator::Mod
            )
        }),
        Rule::ShiftOp => {
            Operator::binary(&text).filter(|op| matches!(op, Operator::LShift | Operator::RShift))
        }
        Rule::UnaryOp => Operator::unary(&text).filter(|op| *op != Operator::Not),
        Rule::NotOp => Operator::unary(&text).filter(|op| *op == Operator::Not),
        Rule::CompOp => Operator::comparison(&text),
        Rule::AugassignOp => Operator::augmented(&text),
        Rule::OrOp => Operator::boolean(&text).filter(|op| *op == Operator::Or),
        Rule::AndOp => Operator::boolean(&text).filter(|op| *op == Operator::And),
        other => return Err(SerpentesError::unrecognized("operator rule", other.name())),
    };
    op.map(Reduced::Operator)
        .ok_or_else(|| SerpentesError::unrecognized(format!("`{}` token", cx.rule.name()), text))
}

// Multi-word operators (`not in`, `is not`) may arrive as one token or
// several; either way the lexeme is whitespace-normalized.
fn lexeme(children: Children) -> Result<String> {
    let mut words = Vec::new();
    for item in children.into_vec() {
        match item {
            Reduced::Token(token) => words.extend(token.text.split_whitespace().map(str::to_string)),
            other => return Err(SerpentesError::shape("operator token", other.describe())),
        }
    }
    if words.is_empty() {
        return Err(SerpentesError::shape("operator token", "nothing"));
    }
    Ok(words.join(" "))
}

/// A comparison chain `a < b <= c` as one `Compare`, never nested binary
/// operations. Operands and operators are told apart by type.
pub fn comparison(cx: &Reduction<'_>, children: Children) -> Result<Reduced> {
    let mut items = children.into_vec().into_iter();
    let left = expect_node(items.next(), "left operand")?;

    let mut ops = Vec::new();
    let mut comparators = Vec::new();
    for item in items {
        match item {
            Reduced::Operator(op) if op.class() == OperatorClass::Comparison => ops.push(op),
            Reduced::Operator(op) => {
                return Err(SerpentesError::unrecognized("comparison operator", op.name()))
            }
            Reduced::Node(node) => comparators.push(node),
            other => return Err(SerpentesError::shape("comparison operand", other.describe())),
        }
    }
    if ops.is_empty() || ops.len() != comparators.len() {
        return Err(SerpentesError::shape(
            format!("one comparator per operator ({} operators)", ops.len()),
            format!("{} comparators", comparators.len()),
        ));
    }

    cx.node(
        NodeKind::Compare,
        [
            ("left", Value::from(left)),
            ("ops", Value::from(ops)),
            ("comparators", Value::from(comparators)),
        ],
    )
    .map(Reduced::Node)
}

fn implied_operator(rule: Rule) -> Option<Operator> {
    match rule {
        Rule::AndExpr => Some(Operator::BitAnd),
        Rule::XorExpr => Some(Operator::BitXor),
        Rule::OrExpr => Some(Operator::BitOr),
        Rule::Power => Some(Operator::Pow),
        _ => None,
    }
}

/// One left-associative step: `(left, op, right)`, or `(left, right)` for
/// rules whose operator the grammar does not keep as a token.
pub fn binary(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let left = children.node("left operand")?;
    let (op, right) = match (children.next(), implied_operator(cx.rule)) {
        (Some(Reduced::Operator(op)), _) => (op, children.node("right operand")?),
        (Some(Reduced::Node(right)), Some(op)) => (op, right),
        (other, _) => return Err(SerpentesError::shape("binary operator", describe(other.as_ref()))),
    };
    children.done()?;
    if op.class() != OperatorClass::Binary {
        return Err(SerpentesError::unrecognized("binary operator", op.name()));
    }

    cx.node(
        NodeKind::BinOp,
        [
            ("left", Value::from(left)),
            ("op", Value::from(op)),
            ("right", Value::from(right)),
        ],
    )
    .map(Reduced::Node)
}

/// A boolean application. The operator is found by type among the children,
/// since optional clauses in the grammar make its index unreliable.
pub fn boolean(cx: &Reduction<'_>, children: Children) -> Result<Reduced> {
    let (operators, operands): (Vec<_>, Vec<_>) = children
        .into_vec()
        .into_iter()
        .partition(|item| matches!(item, Reduced::Operator(_)));

    let op = match operators.as_slice() {
        [Reduced::Operator(op)] => *op,
        _ => {
            return Err(SerpentesError::AmbiguousBoolean {
                found: operators.len(),
            })
        }
    };
    if op.class() != OperatorClass::Boolean {
        return Err(SerpentesError::unrecognized("boolean operator", op.name()));
    }

    let values = operands
        .into_iter()
        .filter(|item| !matches!(item, Reduced::Absent | Reduced::Token(_)))
        .map(|item| expect_node(Some(item), "boolean operand"))
        .collect::<Result<Vec<_>>>()?;
    if values.len() < 2 {
        return Err(SerpentesError::shape(
            "at least two boolean operands",
            values.len().to_string(),
        ));
    }

    cx.node(
        NodeKind::BoolOp,
        [("op", Value::from(op)), ("values", Value::from(values))],
    )
    .map(Reduced::Node)
}

/// One operator, one operand. `not_test` may leave its `not` implicit.
pub fn unary(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let (op, operand) = match children.next() {
        Some(Reduced::Operator(op)) => (op, children.node("operand")?),
        Some(Reduced::Node(operand)) if cx.rule == Rule::NotTest => (Operator::Not, operand),
        other => return Err(SerpentesError::shape("unary operator", describe(other.as_ref()))),
    };
    children.done()?;
    if op.class() != OperatorClass::Unary {
        return Err(SerpentesError::unrecognized("unary operator", op.name()));
    }

    cx.node(
        NodeKind::UnaryOp,
        [("op", Value::from(op)), ("operand", Value::from(operand))],
    )
    .map(Reduced::Node)
}
