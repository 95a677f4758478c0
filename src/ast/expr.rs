use crate::ast::{Method, Value};

/// Binary operators for expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Non short-circuit `&`
    And,
    /// `&&`
    AndAlso,
    Or,
    OrElse,
    Add,
    Sub,
    Mul,
    Div,
    /// Modulo (%)
    Rem,
}

impl BinaryOp {
    /// CQL text for operators a condition can carry.
    pub fn cql_tag(self) -> Option<&'static str> {
        match self {
            BinaryOp::Eq => Some("="),
            BinaryOp::Ne => Some("<>"),
            BinaryOp::Gt => Some(">"),
            BinaryOp::Gte => Some(">="),
            BinaryOp::Lt => Some("<"),
            BinaryOp::Lte => Some("<="),
            BinaryOp::And | BinaryOp::AndAlso => Some("AND"),
            _ => None,
        }
    }

    /// The operator that keeps the comparison true with operands swapped.
    pub fn inverse(self) -> Option<BinaryOp> {
        match self {
            BinaryOp::Eq => Some(BinaryOp::Eq),
            BinaryOp::Ne => Some(BinaryOp::Ne),
            BinaryOp::Gt => Some(BinaryOp::Lt),
            BinaryOp::Gte => Some(BinaryOp::Lte),
            BinaryOp::Lt => Some(BinaryOp::Gt),
            BinaryOp::Lte => Some(BinaryOp::Gte),
            _ => None,
        }
    }

    pub fn is_comparison(self) -> bool {
        self.inverse().is_some()
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOp::Eq => write!(f, "=="),
            BinaryOp::Ne => write!(f, "!="),
            BinaryOp::Gt => write!(f, ">"),
            BinaryOp::Gte => write!(f, ">="),
            BinaryOp::Lt => write!(f, "<"),
            BinaryOp::Lte => write!(f, "<="),
            BinaryOp::And => write!(f, "&"),
            BinaryOp::AndAlso => write!(f, "&&"),
            BinaryOp::Or => write!(f, "|"),
            BinaryOp::OrElse => write!(f, "||"),
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Sub => write!(f, "-"),
            BinaryOp::Mul => write!(f, "*"),
            BinaryOp::Div => write!(f, "/"),
            BinaryOp::Rem => write!(f, "%"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
    Plus,
    /// Type conversion, e.g. a nullable wrapper; transparent to the compiler.
    Convert,
}

/// A node of a query expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// The table handle a query chain starts from.
    Root,
    /// The row parameter of the enclosing lambda.
    Parameter,
    /// The key of a grouping produced by `GroupBy`.
    GroupKey,
    Member {
        target: Box<Expr>,
        member: String,
    },
    Constant(Value),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// Method call; an instance receiver is `args[0]`.
    Call {
        method: Method,
        args: Vec<Expr>,
    },
    Lambda(Box<Expr>),
    /// Anonymous projection: `new { Name = .., Age = .. }`
    New(Vec<(String, Expr)>),
    /// Entity initializer: `new Person { Name = .. }`
    MemberInit(Vec<(String, Expr)>),
}

impl Expr {
    /// Whether evaluating this node would need a value for the row parameter.
    pub fn references_parameter(&self) -> bool {
        match self {
            Expr::Parameter | Expr::GroupKey => true,
            Expr::Root | Expr::Constant(_) => false,
            Expr::Member { target, .. } => target.references_parameter(),
            Expr::Binary { left, right, .. } => {
                left.references_parameter() || right.references_parameter()
            }
            Expr::Unary { operand, .. } => operand.references_parameter(),
            Expr::Call { args, .. } => args.iter().any(Expr::references_parameter),
            Expr::Lambda(body) => body.references_parameter(),
            Expr::New(bindings) | Expr::MemberInit(bindings) => {
                bindings.iter().any(|(_, e)| e.references_parameter())
            }
        }
    }

    /// Member name when this is an access directly on the row parameter.
    pub fn parameter_member(&self) -> Option<&str> {
        match self {
            Expr::Member { target, member } if **target == Expr::Parameter => Some(member),
            _ => None,
        }
    }

    /// Strip conversion wrappers.
    pub fn without_convert(&self) -> &Expr {
        match self {
            Expr::Unary {
                op: UnaryOp::Convert,
                operand,
            } => operand.without_convert(),
            other => other,
        }
    }
}

fn write_args(f: &mut std::fmt::Formatter<'_>, args: &[Expr]) -> std::fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}

fn write_bindings(
    f: &mut std::fmt::Formatter<'_>,
    bindings: &[(String, Expr)],
) -> std::fmt::Result {
    for (i, (name, expr)) in bindings.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{} = {}", name, expr)?;
    }
    Ok(())
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Root => write!(f, "table"),
            Expr::Parameter => write!(f, "x"),
            Expr::GroupKey => write!(f, "g.Key"),
            Expr::Member { target, member } => write!(f, "{}.{}", target, member),
            Expr::Constant(v) => write!(f, "{}", v),
            Expr::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expr::Unary { op, operand } => match op {
                UnaryOp::Not => write!(f, "!{}", operand),
                UnaryOp::Negate => write!(f, "-{}", operand),
                UnaryOp::Plus => write!(f, "+{}", operand),
                UnaryOp::Convert => write!(f, "{}", operand),
            },
            Expr::Call { method, args } => {
                write!(f, "{}(", method)?;
                write_args(f, args)?;
                write!(f, ")")
            }
            Expr::Lambda(body) => write!(f, "x => {}", body),
            Expr::New(bindings) => {
                write!(f, "new {{ ")?;
                write_bindings(f, bindings)?;
                write!(f, " }}")
            }
            Expr::MemberInit(bindings) => {
                write!(f, "new T {{ ")?;
                write_bindings(f, bindings)?;
                write!(f, " }}")
            }
        }
    }
}
