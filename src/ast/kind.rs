//! The closed catalog of target-tree constructs.
//!
//! Each kind names the construct the backend builds and the exact field
//! slots it requires. `Node::new` checks supplied fields against this table,
//! so the arity of every construct is written down here and nowhere else.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! node_catalog {
    ($($kind:ident => $name:literal [$($field:literal),*];)*) => {
        /// One entry per target-tree construct.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum NodeKind {
            $($kind,)*
        }

        impl NodeKind {
            /// Every kind, in catalog order.
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$kind,)*];

            /// The construct name the backend expects.
            pub fn name(self) -> &'static str {
                match self {
                    $(NodeKind::$kind => $name,)*
                }
            }

            /// Required field slots, in materialization order.
            pub fn fields(self) -> &'static [&'static str] {
                match self {
                    $(NodeKind::$kind => &[$($field),*],)*
                }
            }
        }
    };
}

node_catalog! {
    // Literals
    Constant => "Constant" ["value"];
    List => "List" ["elts", "ctx"];
    Tuple => "Tuple" ["elts", "ctx"];
    Set => "Set" ["elts"];
    Dict => "Dict" ["keys", "values"];

    // Variables
    Name => "Name" ["id", "ctx"];
    Starred => "Starred" ["value", "ctx"];

    // Expressions
    Expr => "Expr" ["value"];
    UnaryOp => "UnaryOp" ["op", "operand"];
    BinOp => "BinOp" ["left", "op", "right"];
    BoolOp => "BoolOp" ["op", "values"];
    Compare => "Compare" ["left", "ops", "comparators"];
    Call => "Call" ["func", "args", "keywords"];
    Keyword => "keyword" ["arg", "value"];
    IfExp => "IfExp" ["test", "body", "orelse"];
    Attribute => "Attribute" ["value", "attr", "ctx"];
    NamedExpr => "NamedExpr" ["target", "value"];

    // Subscripting
    Subscript => "Subscript" ["value", "slice", "ctx"];
    Slice => "Slice" ["lower", "upper", "step"];

    // Comprehensions
    ListComp => "ListComp" ["elt", "generators"];
    SetComp => "SetComp" ["elt", "generators"];
    GeneratorExp => "GeneratorExp" ["elt", "generators"];
    DictComp => "DictComp" ["key", "value", "generators"];
    Comprehension => "comprehension" ["target", "iter", "ifs", "is_async"];

    // Statements
    Assign => "Assign" ["targets", "value"];
    AugAssign => "AugAssign" ["target", "op", "value"];
    AnnAssign => "AnnAssign" ["target", "annotation", "value", "simple"];
    Raise => "Raise" ["exc", "cause"];
    Assert => "Assert" ["test", "msg"];
    Delete => "Delete" ["targets"];
    Pass => "Pass" [];
    Import => "Import" ["names"];
    ImportFrom => "ImportFrom" ["module", "names", "level"];
    Alias => "alias" ["name", "asname"];

    // Control flow
    If => "If" ["test", "body", "orelse"];
    For => "For" ["target", "iter", "body", "orelse"];
    While => "While" ["test", "body", "orelse"];
    Break => "Break" [];
    Continue => "Continue" [];
    Try => "Try" ["body", "handlers", "orelse", "finalbody"];
    ExceptHandler => "ExceptHandler" ["type", "name", "body"];
    With => "With" ["items", "body"];
    WithItem => "withitem" ["context_expr", "optional_vars"];

    // Functions and classes
    FunctionDef => "FunctionDef" ["name", "args", "body", "decorator_list", "returns"];
    Lambda => "Lambda" ["args", "body"];
    Arguments => "arguments" ["posonlyargs", "args", "vararg", "kwonlyargs", "kw_defaults", "kwarg", "defaults"];
    Arg => "arg" ["arg", "annotation"];
    Return => "Return" ["value"];
    Yield => "Yield" ["value"];
    YieldFrom => "YieldFrom" ["value"];
    Global => "Global" ["names"];
    Nonlocal => "Nonlocal" ["names"];
    ClassDef => "ClassDef" ["name", "bases", "keywords", "body", "decorator_list"];

    // Async
    AsyncFunctionDef => "AsyncFunctionDef" ["name", "args", "body", "decorator_list", "returns"];
    Await => "Await" ["value"];
    AsyncFor => "AsyncFor" ["target", "iter", "body", "orelse"];
    AsyncWith => "AsyncWith" ["items", "body"];

    // Root
    Module => "Module" ["body", "type_ignores"];
}

impl NodeKind {
    /// Whether the schema carries the given slot.
    pub fn has_field(self, field: &str) -> bool {
        self.fields().iter().any(|slot| *slot == field)
    }

    /// The async twin of a statement kind, if it has one.
    pub fn async_variant(self) -> Option<NodeKind> {
        match self {
            NodeKind::FunctionDef => Some(NodeKind::AsyncFunctionDef),
            NodeKind::For => Some(NodeKind::AsyncFor),
            NodeKind::With => Some(NodeKind::AsyncWith),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_are_unique() {
        let names: HashSet<_> = NodeKind::ALL.iter().map(|kind| kind.name()).collect();
        assert_eq!(names.len(), NodeKind::ALL.len());
    }

    #[test]
    fn test_async_twins_share_schema() {
        for kind in NodeKind::ALL {
            if let Some(twin) = kind.async_variant() {
                assert_eq!(kind.fields(), twin.fields(), "{kind} vs {twin}");
            }
        }
    }

    #[test]
    fn test_context_bearing_kinds() {
        let with_ctx: Vec<_> = NodeKind::ALL
            .iter()
            .filter(|kind| kind.has_field("ctx"))
            .map(|kind| kind.name())
            .collect();
        assert_eq!(
            with_ctx,
            ["List", "Tuple", "Name", "Starred", "Attribute", "Subscript"]
        );
    }
}
