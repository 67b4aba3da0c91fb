//! Grammar rules the transformer has a handler for.
//!
//! The set is closed: a rule name outside it is not an error, the reduction
//! simply stays a fragment for an enclosing handler to scan.

macro_rules! grammar_rules {
    ($($rule:ident => $name:literal,)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Rule {
            $($rule,)*
        }

        impl Rule {
            pub const ALL: &'static [Rule] = &[$(Rule::$rule,)*];

            /// The rule name as written in the grammar.
            pub fn name(self) -> &'static str {
                match self {
                    $(Rule::$rule => $name,)*
                }
            }

            pub fn from_name(name: &str) -> Option<Rule> {
                match name {
                    $($name => Some(Rule::$rule),)*
                    _ => None,
                }
            }
        }
    };
}

grammar_rules! {
    // Literals
    ConstTrue => "const_true",
    ConstFalse => "const_false",
    ConstNone => "const_none",
    ConstNumber => "const_number",
    Number => "number",
    String => "string",
    StringConcat => "string_concat",

    // Names
    Var => "var",
    StarExpr => "star_expr",

    // Operator lookups
    AddOp => "add_op",
    MulOp => "mul_op",
    ShiftOp => "shift_op",
    UnaryOp => "unary_op",
    CompOp => "comp_op",
    AugassignOp => "augassign_op",
    OrOp => "or_op",
    AndOp => "and_op",
    NotOp => "not_op",

    // Operator applications
    Comparison => "comparison",
    ArithExpr => "arith_expr",
    Term => "term",
    ShiftExpr => "shift_expr",
    AndExpr => "and_expr",
    XorExpr => "xor_expr",
    OrExpr => "or_expr",
    Power => "power",
    OrTest => "or_test",
    AndTest => "and_test",
    NotTest => "not_test",
    Factor => "factor",

    // Other expressions
    Ternary => "ternary",
    AssignExpr => "assign_expr",
    AwaitExpr => "await_expr",
    Funccall => "funccall",
    Arguments => "arguments",
    Argvalue => "argvalue",
    Kwargs => "kwargs",
    Starargs => "starargs",
    Getattr => "getattr",
    AttrChain => "attr_chain",
    Getitem => "getitem",
    Slice => "slice",

    // Containers
    List => "list",
    Tuple => "tuple",
    Set => "set",
    Dict => "dict",
    KeyValue => "key_value",
    DictUnpack => "dict_unpack",

    // Comprehensions
    CompFor => "comp_for",
    AsyncCompFor => "async_comp_for",
    ListComprehension => "list_comprehension",
    SetComprehension => "set_comprehension",
    GeneratorExpression => "generator_expression",
    DictComprehension => "dict_comprehension",

    // Simple statements
    ExprStmt => "expr_stmt",
    AssignStmt => "assign_stmt",
    Augassign => "augassign",
    Annassign => "annassign",
    ReturnStmt => "return_stmt",
    YieldExpr => "yield_expr",
    YieldFrom => "yield_from",
    RaiseStmt => "raise_stmt",
    AssertStmt => "assert_stmt",
    DelStmt => "del_stmt",
    PassStmt => "pass_stmt",
    BreakStmt => "break_stmt",
    ContinueStmt => "continue_stmt",
    GlobalStmt => "global_stmt",
    NonlocalStmt => "nonlocal_stmt",

    // Imports
    DottedName => "dotted_name",
    DottedAsName => "dotted_as_name",
    ImportAsName => "import_as_name",
    ImportStar => "import_star",
    ImportName => "import_name",
    RelativeLevel => "relative_level",
    ImportFrom => "import_from",

    // Blocks and control flow
    Suite => "suite",
    SimpleStmt => "simple_stmt",
    IfStmt => "if_stmt",
    ElifClause => "elif_clause",
    ElseClause => "else_clause",
    FinallyClause => "finally_clause",
    ForStmt => "for_stmt",
    WhileStmt => "while_stmt",
    TryStmt => "try_stmt",
    ExceptClause => "except_clause",
    WithStmt => "with_stmt",
    WithItem => "with_item",

    // Definitions
    Funcdef => "funcdef",
    Parameters => "parameters",
    Param => "param",
    DefaultParam => "default_param",
    Starparams => "starparams",
    Kwparams => "kwparams",
    Slash => "slash",
    Lambdef => "lambdef",
    Classdef => "classdef",
    Decorator => "decorator",
    Decorators => "decorators",
    Decorated => "decorated",
    AsyncStmt => "async_stmt",

    // Root
    FileInput => "file_input",
    Module => "module",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for rule in Rule::ALL {
            assert_eq!(Rule::from_name(rule.name()), Some(*rule));
        }
    }

    #[test]
    fn test_unknown_rule_is_not_handled() {
        assert_eq!(Rule::from_name("testlist_comp"), None);
        assert_eq!(Rule::from_name("Comparison"), None);
    }
}
