//! Free-function constructors for expression trees.
//!
//! ```ignore
//! use cqlinq::ast::builders::*;
//! let predicate = lambda(and(eq(member("id"), lit(5)), gt(member("age"), lit(18))));
//! ```

use crate::ast::{BinaryOp, Expr, HostFn, Method, UnaryOp, Value};
use crate::error::CqlResult;

/// The row parameter of the enclosing lambda.
pub fn param() -> Expr {
    Expr::Parameter
}

/// Member access on the row parameter (`x.name`).
pub fn member(name: &str) -> Expr {
    field(param(), name)
}

/// Member access on an arbitrary target (`target.name`).
pub fn field(target: Expr, name: &str) -> Expr {
    Expr::Member {
        target: Box::new(target),
        member: name.to_string(),
    }
}

pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Constant(value.into())
}

pub fn lambda(body: Expr) -> Expr {
    Expr::Lambda(Box::new(body))
}

pub fn group_key() -> Expr {
    Expr::GroupKey
}

pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Expr::Unary {
        op,
        operand: Box::new(operand),
    }
}

pub fn eq(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Eq, left, right)
}

pub fn ne(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Ne, left, right)
}

pub fn gt(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Gt, left, right)
}

pub fn gte(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Gte, left, right)
}

pub fn lt(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Lt, left, right)
}

pub fn lte(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Lte, left, right)
}

/// Short-circuit conjunction (`&&`).
pub fn and(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::AndAlso, left, right)
}

/// Short-circuit disjunction (`||`).
pub fn or_else(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::OrElse, left, right)
}

pub fn add(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Add, left, right)
}

pub fn sub(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Sub, left, right)
}

pub fn not(operand: Expr) -> Expr {
    unary(UnaryOp::Not, operand)
}

pub fn neg(operand: Expr) -> Expr {
    unary(UnaryOp::Negate, operand)
}

pub fn convert(operand: Expr) -> Expr {
    unary(UnaryOp::Convert, operand)
}

pub fn call(method: Method, args: Vec<Expr>) -> Expr {
    Expr::Call { method, args }
}

/// Anonymous projection (`new { a = .., b = .. }`).
pub fn new_object<I, S>(bindings: I) -> Expr
where
    I: IntoIterator<Item = (S, Expr)>,
    S: AsRef<str>,
{
    Expr::New(
        bindings
            .into_iter()
            .map(|(n, e)| (n.as_ref().to_string(), e))
            .collect(),
    )
}

/// Entity initializer (`new T { a = .., b = .. }`).
pub fn member_init<I, S>(bindings: I) -> Expr
where
    I: IntoIterator<Item = (S, Expr)>,
    S: AsRef<str>,
{
    Expr::MemberInit(
        bindings
            .into_iter()
            .map(|(n, e)| (n.as_ref().to_string(), e))
            .collect(),
    )
}

/// `collection.Contains(item)`
pub fn contains(collection: Expr, item: Expr) -> Expr {
    call(Method::Contains, vec![collection, item])
}

/// `map.ContainsKey(key)`
pub fn contains_key(map: Expr, key: Expr) -> Expr {
    call(Method::ContainsKey, vec![map, key])
}

pub fn starts_with(target: Expr, prefix: Expr) -> Expr {
    call(Method::StartsWith, vec![target, prefix])
}

pub fn compare_to(left: Expr, right: Expr) -> Expr {
    call(Method::CompareTo, vec![left, right])
}

pub fn equals(left: Expr, right: Expr) -> Expr {
    call(Method::Equals, vec![left, right])
}

/// Call a host function; folded to a bound value at compile time.
pub fn host<F>(name: &str, func: F, args: Vec<Expr>) -> Expr
where
    F: Fn(&[Value]) -> CqlResult<Value> + Send + Sync + 'static,
{
    call(Method::Host(HostFn::new(name, func)), args)
}

fn aggregate(method: Method, selector: Expr) -> Expr {
    call(method, vec![param(), lambda(selector)])
}

/// `g.Min(x => selector)` inside a grouped projection.
pub fn min(selector: Expr) -> Expr {
    aggregate(Method::Min, selector)
}

pub fn max(selector: Expr) -> Expr {
    aggregate(Method::Max, selector)
}

pub fn sum(selector: Expr) -> Expr {
    aggregate(Method::Sum, selector)
}

pub fn average(selector: Expr) -> Expr {
    aggregate(Method::Average, selector)
}

/// `g.Count()`
pub fn count() -> Expr {
    call(Method::Count, vec![param()])
}

/// Update operators for collection and counter columns.
pub struct CqlOperator;

impl CqlOperator {
    /// `col = col + ?`
    pub fn append(value: impl Into<Value>) -> Expr {
        call(Method::Append, vec![lit(value)])
    }

    /// `col = ? + col`
    pub fn prepend(value: impl Into<Value>) -> Expr {
        call(Method::Prepend, vec![lit(value)])
    }

    /// `col = col - ?`
    pub fn subtract_assign(value: impl Into<Value>) -> Expr {
        call(Method::SubtractAssign, vec![lit(value)])
    }
}

/// CQL functions usable inside conditions.
pub struct CqlFunction;

impl CqlFunction {
    /// `token(a, b, ..)`
    pub fn token(args: Vec<Expr>) -> Expr {
        call(Method::Token, args)
    }

    pub fn max_timeuuid(arg: Expr) -> Expr {
        call(Method::MaxTimeUuid, vec![arg])
    }

    pub fn min_timeuuid(arg: Expr) -> Expr {
        call(Method::MinTimeUuid, vec![arg])
    }
}

/// A token value built from partition-key components.
pub struct CqlToken;

impl CqlToken {
    pub fn create<I, V>(values: I) -> Expr
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        lit(Value::Token(values.into_iter().map(Into::into).collect()))
    }
}
