//! Host-side evaluation of parameter-free sub-expressions.
//!
//! The compiler folds anything it cannot translate into a bound value. Only
//! nodes that never touch the row parameter can be folded; reaching one that
//! does is an evaluation error.

use std::cmp::Ordering;

use crate::ast::{BinaryOp, Expr, Method, UnaryOp, Value};
use crate::error::{CqlError, CqlResult};

/// Evaluate `expr` to a value.
pub fn evaluate(expr: &Expr) -> CqlResult<Value> {
    match expr {
        Expr::Constant(v) => Ok(v.clone()),
        Expr::Parameter | Expr::GroupKey => Err(CqlError::Evaluation(format!(
            "'{}' references the unbound row parameter",
            expr
        ))),
        Expr::Member { target, member } => {
            let target = evaluate(target)?;
            target.field(member).cloned().ok_or_else(|| {
                CqlError::Evaluation(format!("{} value has no member '{}'", target.kind(), member))
            })
        }
        Expr::Binary { op, left, right } => {
            let left = evaluate(left)?;
            let right = evaluate(right)?;
            binary(*op, &left, &right)
        }
        Expr::Unary { op, operand } => {
            let value = evaluate(operand)?;
            unary(*op, value)
        }
        Expr::Call { method, args } => call(method, args),
        Expr::Root | Expr::Lambda(_) | Expr::New(_) | Expr::MemberInit(_) => Err(
            CqlError::Evaluation(format!("'{}' cannot be evaluated to a value", expr)),
        ),
    }
}

fn call(method: &Method, args: &[Expr]) -> CqlResult<Value> {
    let values = args.iter().map(evaluate).collect::<CqlResult<Vec<_>>>()?;
    match (method, values.as_slice()) {
        (Method::Host(func), _) => func.call(&values),
        (Method::Token, _) => Ok(Value::Token(values)),
        (Method::Equals, [a, b]) => Ok(Value::Boolean(values_equal(a, b))),
        (Method::CompareTo, [a, b]) => {
            let ordering = compare(a, b).ok_or_else(|| {
                CqlError::Evaluation(format!("cannot compare {} with {}", a.kind(), b.kind()))
            })?;
            Ok(Value::Int(ordering as i32))
        }
        (Method::StartsWith, [Value::Text(s), Value::Text(prefix)]) => {
            Ok(Value::Boolean(s.starts_with(prefix.as_str())))
        }
        (Method::Contains, [collection, item]) => {
            let items = collection.elements().ok_or_else(|| {
                CqlError::Evaluation(format!("{} value is not a collection", collection.kind()))
            })?;
            Ok(Value::Boolean(items.iter().any(|v| values_equal(v, item))))
        }
        (Method::ContainsKey, [Value::Map(entries), key]) => Ok(Value::Boolean(
            entries.iter().any(|(k, _)| values_equal(k, key)),
        )),
        _ => Err(CqlError::Evaluation(format!(
            "{}({}) cannot be evaluated on the host",
            method,
            args.len()
        ))),
    }
}

fn unary(op: UnaryOp, value: Value) -> CqlResult<Value> {
    match (op, value) {
        (UnaryOp::Convert | UnaryOp::Plus, v) => Ok(v),
        (UnaryOp::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (UnaryOp::Negate, Value::Int(n)) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| CqlError::Evaluation("integer overflow".into())),
        (UnaryOp::Negate, Value::BigInt(n)) => n
            .checked_neg()
            .map(Value::BigInt)
            .ok_or_else(|| CqlError::Evaluation("integer overflow".into())),
        (UnaryOp::Negate, Value::Float(n)) => Ok(Value::Float(-n)),
        (UnaryOp::Negate, Value::Double(n)) => Ok(Value::Double(-n)),
        (op, v) => Err(CqlError::Evaluation(format!(
            "operator {:?} does not apply to {}",
            op,
            v.kind()
        ))),
    }
}

#[derive(Clone, Copy)]
enum Number {
    /// Integer and whether it came from a 64-bit value.
    Int(i64, bool),
    Double(f64),
}

fn number(v: &Value) -> Option<Number> {
    match v {
        Value::Int(n) => Some(Number::Int(*n as i64, false)),
        Value::BigInt(n) => Some(Number::Int(*n, true)),
        Value::Float(n) => Some(Number::Double(*n as f64)),
        Value::Double(n) => Some(Number::Double(*n)),
        _ => None,
    }
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(n, _) => n as f64,
            Number::Double(n) => n,
        }
    }
}

fn arithmetic(op: BinaryOp, a: Number, b: Number) -> CqlResult<Value> {
    match (a, b) {
        (Number::Int(x, wx), Number::Int(y, wy)) => {
            let result = match op {
                BinaryOp::Add => x.checked_add(y),
                BinaryOp::Sub => x.checked_sub(y),
                BinaryOp::Mul => x.checked_mul(y),
                BinaryOp::Div | BinaryOp::Rem if y == 0 => {
                    return Err(CqlError::Evaluation("division by zero".into()));
                }
                BinaryOp::Div => x.checked_div(y),
                BinaryOp::Rem => x.checked_rem(y),
                _ => None,
            }
            .ok_or_else(|| CqlError::Evaluation("integer overflow".into()))?;
            if wx || wy {
                Ok(Value::BigInt(result))
            } else {
                i32::try_from(result)
                    .map(Value::Int)
                    .map_err(|_| CqlError::Evaluation("integer overflow".into()))
            }
        }
        (a, b) => {
            let (x, y) = (a.as_f64(), b.as_f64());
            let result = match op {
                BinaryOp::Add => x + y,
                BinaryOp::Sub => x - y,
                BinaryOp::Mul => x * y,
                BinaryOp::Div => x / y,
                _ => x % y,
            };
            Ok(Value::Double(result))
        }
    }
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> CqlResult<Value> {
    match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            if let (BinaryOp::Add, Value::Text(a), Value::Text(b)) = (op, left, right) {
                return Ok(Value::Text(format!("{}{}", a, b)));
            }
            match (number(left), number(right)) {
                (Some(a), Some(b)) => arithmetic(op, a, b),
                _ => Err(CqlError::Evaluation(format!(
                    "operator {} does not apply to {} and {}",
                    op,
                    left.kind(),
                    right.kind()
                ))),
            }
        }
        BinaryOp::And | BinaryOp::AndAlso | BinaryOp::Or | BinaryOp::OrElse => {
            match (left, right) {
                (Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(match op {
                    BinaryOp::And | BinaryOp::AndAlso => *a && *b,
                    _ => *a || *b,
                })),
                _ => Err(CqlError::Evaluation(format!(
                    "operator {} requires boolean operands",
                    op
                ))),
            }
        }
        BinaryOp::Eq => Ok(Value::Boolean(values_equal(left, right))),
        BinaryOp::Ne => Ok(Value::Boolean(!values_equal(left, right))),
        BinaryOp::Gt | BinaryOp::Gte | BinaryOp::Lt | BinaryOp::Lte => {
            let ordering = compare(left, right).ok_or_else(|| {
                CqlError::Evaluation(format!(
                    "cannot compare {} with {}",
                    left.kind(),
                    right.kind()
                ))
            })?;
            Ok(Value::Boolean(match op {
                BinaryOp::Gt => ordering == Ordering::Greater,
                BinaryOp::Gte => ordering != Ordering::Less,
                BinaryOp::Lt => ordering == Ordering::Less,
                _ => ordering != Ordering::Greater,
            }))
        }
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match compare(a, b) {
        Some(ordering) => ordering == Ordering::Equal,
        None => a == b,
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (number(a), number(b)) {
        return match (x, y) {
            (Number::Int(x, _), Number::Int(y, _)) => Some(x.cmp(&y)),
            (x, y) => x.as_f64().partial_cmp(&y.as_f64()),
        };
    }
    match (a, b) {
        (Value::Text(x), Value::Text(y)) => Some(x.cmp(y)),
        (Value::Boolean(x), Value::Boolean(y)) => Some(x.cmp(y)),
        (Value::Uuid(x), Value::Uuid(y)) => Some(x.cmp(y)),
        (Value::Timestamp(x), Value::Timestamp(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;

    #[test]
    fn test_fold_arithmetic() {
        assert_eq!(evaluate(&add(lit(2), lit(3))).unwrap(), Value::Int(5));
        assert_eq!(evaluate(&add(lit(2), lit(3i64))).unwrap(), Value::BigInt(5));
        assert_eq!(evaluate(&sub(lit(1.5), lit(1))).unwrap(), Value::Double(0.5));
        assert_eq!(
            evaluate(&add(lit("ab"), lit("cd"))).unwrap(),
            Value::Text("abcd".into())
        );
    }

    #[test]
    fn test_overflow_is_an_error() {
        let err = evaluate(&add(lit(i32::MAX), lit(1))).unwrap_err();
        assert!(matches!(err, CqlError::Evaluation(_)));
    }

    #[test]
    fn test_captured_record_member() {
        let record = lit(Value::Udt(vec![("limit".into(), Value::Int(10))]));
        assert_eq!(evaluate(&field(record, "limit")).unwrap(), Value::Int(10));
    }

    #[test]
    fn test_parameter_is_unbound() {
        let err = evaluate(&member("id")).unwrap_err();
        assert!(err.to_string().contains("unbound"));
    }

    #[test]
    fn test_host_function_and_logic() {
        let upper = host(
            "to_upper",
            |args| match args {
                [Value::Text(s)] => Ok(Value::Text(s.to_uppercase())),
                _ => Err(CqlError::Evaluation("to_upper expects text".into())),
            },
            vec![lit("abc")],
        );
        assert_eq!(evaluate(&upper).unwrap(), Value::Text("ABC".into()));
        assert_eq!(
            evaluate(&or_else(lit(false), gt(lit(3), lit(2)))).unwrap(),
            Value::Boolean(true)
        );
    }
}
