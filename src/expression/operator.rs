//! SPARQL operators and functions understood by the built-in constant evaluator.

/// Operators and functions with built-in constant semantics.
///
/// Function calls carry their identifier as a plain string; this enum is the
/// typed view of the identifiers the crate knows how to fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Logical
    And,
    Or,
    Not,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Term accessors
    Str,
    Lang,
    Datatype,
    IsIri,
    IsLiteral,

    // String functions
    Concat,
    StrLen,
    UCase,
    LCase,
    Contains,
    StrStarts,
    StrEnds,
}

impl Operator {
    pub const ALL: [Operator; 25] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Lt,
        Operator::Le,
        Operator::Gt,
        Operator::Ge,
        Operator::And,
        Operator::Or,
        Operator::Not,
        Operator::Add,
        Operator::Sub,
        Operator::Mul,
        Operator::Div,
        Operator::Str,
        Operator::Lang,
        Operator::Datatype,
        Operator::IsIri,
        Operator::IsLiteral,
        Operator::Concat,
        Operator::StrLen,
        Operator::UCase,
        Operator::LCase,
        Operator::Contains,
        Operator::StrStarts,
        Operator::StrEnds,
    ];

    /// Look up an operator by its function identifier (exact match).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.as_str() == name)
    }

    /// Get the function identifier for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Not => "!",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Str => "str",
            Operator::Lang => "lang",
            Operator::Datatype => "datatype",
            Operator::IsIri => "isIRI",
            Operator::IsLiteral => "isLiteral",
            Operator::Concat => "concat",
            Operator::StrLen => "strlen",
            Operator::UCase => "ucase",
            Operator::LCase => "lcase",
            Operator::Contains => "contains",
            Operator::StrStarts => "strstarts",
            Operator::StrEnds => "strends",
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::Eq | Operator::Ne | Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge
        )
    }

    /// Binary operators rendered in infix position.
    pub fn is_infix(&self) -> bool {
        self.is_comparison()
            || matches!(
                self,
                Operator::And
                    | Operator::Or
                    | Operator::Add
                    | Operator::Sub
                    | Operator::Mul
                    | Operator::Div
            )
    }

    /// Number of arguments the operator takes; `None` for variadic functions.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Operator::Concat => None,
            Operator::Not
            | Operator::Str
            | Operator::Lang
            | Operator::Datatype
            | Operator::IsIri
            | Operator::IsLiteral
            | Operator::StrLen
            | Operator::UCase
            | Operator::LCase => Some(1),
            _ => Some(2),
        }
    }
}
