//! Keyword, numeric, and string literals.

use super::{describe, Children, FloatLiterals, Reduced, Reduction, Rule};
use crate::ast::{NodeKind, Scalar, Value};
use crate::errors::{Result, SerpentesError};
use crate::syntax::Token;

fn constant(cx: &Reduction<'_>, value: Scalar) -> Result<Reduced> {
    cx.node(NodeKind::Constant, [("value", Value::Scalar(value))])
        .map(Reduced::Node)
}

/// `true`, `false`, and `none`, matched case-insensitively. The token, when
/// present, must spell the keyword its rule names.
pub fn keyword(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let (expected, value) = match cx.rule {
        Rule::ConstTrue => ("true", Scalar::Bool(true)),
        Rule::ConstFalse => ("false", Scalar::Bool(false)),
        _ => ("none", Scalar::None),
    };
    match children.next() {
        None => {}
        Some(Reduced::Token(token)) if token.text.eq_ignore_ascii_case(expected) => {}
        Some(Reduced::Token(token)) => {
            return Err(SerpentesError::unrecognized("keyword literal", token.text))
        }
        Some(other) => return Err(SerpentesError::shape("keyword literal", other.describe())),
    }
    children.done()?;
    constant(cx, value)
}

pub fn number(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let token = number_token(children.next())?;
    children.done()?;
    constant(cx, decode_number(&token, cx.options.float_literals)?)
}

// The number may arrive bare or wrapped in the grammar's own `number` branch.
fn number_token(item: Option<Reduced>) -> Result<Token> {
    match item {
        Some(Reduced::Token(token)) => Ok(token),
        Some(Reduced::Fragment(fragment)) if fragment.children.len() == 1 => {
            number_token(fragment.children.into_iter().next())
        }
        other => Err(SerpentesError::shape("number token", describe(other.as_ref()))),
    }
}

/// Decodes a numeric token by its lexical class.
pub fn decode_number(token: &Token, floats: FloatLiterals) -> Result<Scalar> {
    let digits: String = token.text.chars().filter(|c| *c != '_').collect();
    let radix = match token.class() {
        "HEX_NUMBER" => 16,
        "BIN_NUMBER" => 2,
        "OCT_NUMBER" => 8,
        "DEC_NUMBER" => 10,
        "FLOAT_NUMBER" => return decode_float(&digits, &token.text, floats),
        class => return Err(SerpentesError::unrecognized("number class", class)),
    };
    let body = if radix == 10 {
        digits.as_str()
    } else {
        strip_radix_prefix(&digits)
    };
    i64::from_str_radix(body, radix)
        .map(Scalar::Int)
        .map_err(|_| SerpentesError::unrecognized("integer literal", token.text.as_str()))
}

fn strip_radix_prefix(digits: &str) -> &str {
    match digits.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x" | "0b" | "0o") => &digits[2..],
        _ => digits,
    }
}

fn decode_float(digits: &str, text: &str, floats: FloatLiterals) -> Result<Scalar> {
    let value: f64 = digits
        .parse()
        .map_err(|_| SerpentesError::unrecognized("float literal", text))?;
    match floats {
        FloatLiterals::Preserve if value.is_finite() => Ok(Scalar::Float(value)),
        FloatLiterals::Preserve => Err(SerpentesError::unrecognized("float literal", text)),
        FloatLiterals::Truncate => {
            let truncated = value.trunc();
            if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
                Ok(Scalar::Int(truncated as i64))
            } else {
                Err(SerpentesError::unrecognized("float literal", text))
            }
        }
    }
}

/// Strips prefix letters and quote delimiters; escapes stay as written and
/// are decoded by the backend.
pub fn string(cx: &Reduction<'_>, mut children: Children) -> Result<Reduced> {
    let token = match children.next() {
        Some(Reduced::Token(token)) => token,
        other => return Err(SerpentesError::shape("string token", describe(other.as_ref()))),
    };
    children.done()?;
    constant(cx, Scalar::Str(strip_delimiters(&token.text)?))
}

pub fn strip_delimiters(literal: &str) -> Result<String> {
    let body = literal.trim_start_matches(|c: char| "rRbBuUfF".contains(c));
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if body.len() >= 2 * quote.len() && body.starts_with(quote) && body.ends_with(quote) {
            return Ok(body[quote.len()..body.len() - quote.len()].to_string());
        }
    }
    Err(SerpentesError::unrecognized("string literal", literal))
}

/// Adjacent string literals, joined into one constant.
pub fn concat(cx: &Reduction<'_>, children: Children) -> Result<Reduced> {
    let mut joined = String::new();
    for item in children.into_vec() {
        match item {
            Reduced::Node(node) if node.kind() == NodeKind::Constant => {
                match node.get("value").and_then(Value::as_str) {
                    Some(text) => joined.push_str(text),
                    None => return Err(SerpentesError::shape("string constant", "non-string constant")),
                }
            }
            other => return Err(SerpentesError::shape("string constant", other.describe())),
        }
    }
    constant(cx, Scalar::Str(joined))
}
