//! WHERE clause translation tests.

use chrono::DateTime;
use pretty_assertions::assert_eq;

use super::{people, songs};
use crate::ast::Value;
use crate::ast::builders::*;
use crate::error::CqlError;
use crate::transpiler::ParsePhase;

fn where_of(predicate: crate::ast::Expr) -> crate::session::Statement {
    people().filter(predicate).select(member("name")).statement().unwrap()
}

#[test]
fn test_contains_on_host_list_becomes_in() {
    let stmt = where_of(contains(lit(vec![1, 2, 3]), member("id")));
    assert_eq!(stmt.cql, "SELECT name FROM person WHERE id IN (?, ?, ?)");
    assert_eq!(stmt.params, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn test_contains_on_collection_column() {
    let stmt = songs()
        .filter(contains(member("tags"), lit("jazz")))
        .select(member("title"))
        .statement()
        .unwrap();
    assert_eq!(stmt.cql, "SELECT title FROM songs WHERE tags CONTAINS ?");
    assert_eq!(stmt.params, vec![Value::Text("jazz".into())]);
}

#[test]
fn test_contains_key_on_map_column() {
    let stmt = songs()
        .filter(contains_key(member("credits"), lit("producer")))
        .select(member("title"))
        .statement()
        .unwrap();
    assert_eq!(stmt.cql, "SELECT title FROM songs WHERE credits CONTAINS KEY ?");
}

#[test]
fn test_contains_on_scalar_host_value_fails() {
    let err = people()
        .filter(contains(lit(5), member("id")))
        .statement()
        .unwrap_err();
    assert!(matches!(err, CqlError::Evaluation(_)));
}

#[test]
fn test_starts_with_becomes_range() {
    let stmt = where_of(starts_with(member("name"), lit("ab")));
    assert_eq!(stmt.cql, "SELECT name FROM person WHERE name >= ? AND name < ?");
    assert_eq!(
        stmt.params,
        vec![Value::Text("ab".into()), Value::Text("ab\u{10FFFF}".into())]
    );
}

#[test]
fn test_compare_to_uses_enclosing_operator() {
    let stmt = where_of(gt(compare_to(member("name"), lit("m")), lit(0)));
    assert_eq!(stmt.cql, "SELECT name FROM person WHERE name > ?");
    assert_eq!(stmt.params, vec![Value::Text("m".into())]);
}

#[test]
fn test_compare_to_on_the_right_inverts_operator() {
    let stmt = where_of(lt(lit(0), compare_to(member("name"), lit("m"))));
    assert_eq!(stmt.cql, "SELECT name FROM person WHERE name > ?");

    let stmt = where_of(gte(lit(0), compare_to(member("name"), lit("m"))));
    assert_eq!(stmt.cql, "SELECT name FROM person WHERE name <= ?");
}

#[test]
fn test_compare_to_against_non_zero_is_unsupported() {
    let err = people()
        .filter(gt(compare_to(member("name"), lit("m")), lit(1)))
        .statement()
        .unwrap_err();
    assert!(matches!(err, CqlError::UnsupportedExpression { .. }));
}

#[test]
fn test_equals_call() {
    let stmt = where_of(equals(member("age"), lit(40)));
    assert_eq!(stmt.cql, "SELECT name FROM person WHERE age = ?");
}

#[test]
fn test_or_over_columns_is_unsupported() {
    let err = people()
        .filter(or_else(eq(member("id"), lit(1)), eq(member("id"), lit(2))))
        .statement()
        .unwrap_err();
    match err {
        CqlError::UnsupportedExpression { node, phase } => {
            assert_eq!(phase, ParsePhase::Condition);
            assert_eq!(node, "((x.id == 1) || (x.id == 2))");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_parameter_free_or_is_folded() {
    let stmt = where_of(eq(member("id"), or_else(lit(false), lit(true))));
    assert_eq!(stmt.cql, "SELECT name FROM person WHERE id = ?");
    assert_eq!(stmt.params, vec![Value::Boolean(true)]);
}

#[test]
fn test_host_function_is_folded() {
    let doubled = host(
        "double",
        |args| match args {
            [Value::Int(n)] => Ok(Value::Int(n * 2)),
            _ => Err(CqlError::Evaluation("double expects an int".into())),
        },
        vec![lit(21)],
    );
    let stmt = where_of(eq(member("age"), doubled));
    assert_eq!(stmt.cql, "SELECT name FROM person WHERE age = ?");
    assert_eq!(stmt.params, vec![Value::Int(42)]);
}

#[test]
fn test_host_function_over_row_parameter_fails_evaluation() {
    let echo = host("echo", |args| Ok(args[0].clone()), vec![member("age")]);
    let err = people()
        .filter(eq(member("id"), echo))
        .statement()
        .unwrap_err();
    assert!(matches!(err, CqlError::Evaluation(_)));
}

#[test]
fn test_token_function_and_token_value() {
    let stmt = where_of(gt(
        CqlFunction::token(vec![member("id")]),
        CqlToken::create([5]),
    ));
    assert_eq!(stmt.cql, "SELECT name FROM person WHERE token(id) > token(?)");
    assert_eq!(stmt.params, vec![Value::Int(5)]);
}

#[test]
fn test_max_timeuuid() {
    let ts = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
    let stmt = where_of(lte(member("id"), CqlFunction::max_timeuuid(lit(ts))));
    assert_eq!(stmt.cql, "SELECT name FROM person WHERE id <= maxtimeuuid(?)");
    assert_eq!(stmt.params, vec![Value::Timestamp(ts)]);
}

#[test]
fn test_captured_record_member_is_bound() {
    let limits = lit(Value::Udt(vec![("min_age".into(), Value::Int(18))]));
    let stmt = where_of(gte(member("age"), field(limits, "min_age")));
    assert_eq!(stmt.cql, "SELECT name FROM person WHERE age >= ?");
    assert_eq!(stmt.params, vec![Value::Int(18)]);
}

#[test]
fn test_conversion_wrapper_is_transparent() {
    let stmt = where_of(eq(convert(member("age")), lit(5)));
    assert_eq!(stmt.cql, "SELECT name FROM person WHERE age = ?");
}

#[test]
fn test_not() {
    let stmt = where_of(not(eq(member("id"), lit(1))));
    assert_eq!(stmt.cql, "SELECT name FROM person WHERE NOT (id = ?)");
}

#[test]
fn test_unmapped_member_in_condition_is_rejected() {
    let err = people()
        .filter(eq(member("nickname"), lit("x")))
        .statement()
        .unwrap_err();
    assert!(matches!(err, CqlError::Mapping(_)));
}

#[test]
fn test_placeholders_match_params_in_order() {
    let stmt = people()
        .filter(and(
            contains(lit(vec![7, 8]), member("id")),
            starts_with(member("name"), lit("j")),
        ))
        .filter(gt(member("age"), lit(30)))
        .take(4)
        .statement()
        .unwrap();
    assert_eq!(
        stmt.cql,
        "SELECT id, name, age FROM person WHERE id IN (?, ?) AND name >= ? AND name < ? AND age > ? LIMIT ?"
    );
    assert_eq!(stmt.cql.matches('?').count(), stmt.params.len());
    assert_eq!(
        stmt.params,
        vec![
            Value::Int(7),
            Value::Int(8),
            Value::Text("j".into()),
            Value::Text("j\u{10FFFF}".into()),
            Value::Int(30),
            Value::Int(4),
        ]
    );
}
