//! SELECT and count tests.

use pretty_assertions::assert_eq;

use super::{people, songs};
use crate::ast::builders::*;
use crate::ast::{Expr, Method, Value};
use crate::error::CqlError;
use crate::mapping::{Map, MappingConfiguration};
use crate::query::{CqlCommand, Table};
use crate::test_fixtures::Person;
use crate::transpiler::{CqlExpressionVisitor, ParamMode, ParsePhase, QueryKind};

#[test]
fn test_select_projection_with_where() {
    let stmt = people()
        .filter(eq(member("id"), lit(5)))
        .select(member("name"))
        .statement()
        .unwrap();
    assert_eq!(stmt.cql, "SELECT name FROM person WHERE id = ?");
    assert_eq!(stmt.params, vec![Value::Int(5)]);
}

#[test]
fn test_table_level_allow_filtering() {
    let config = MappingConfiguration::new();
    config.define(
        Map::<Person>::new()
            .table_name("person")
            .partition_key(["id"])
            .allow_filtering(),
    );
    let stmt = Table::<Person>::new(&config)
        .unwrap()
        .filter(eq(member("id"), lit(5)))
        .select(member("name"))
        .statement()
        .unwrap();
    assert_eq!(stmt.cql, "SELECT name FROM person WHERE id = ? ALLOW FILTERING");
}

#[test]
fn test_select_defaults_to_mapped_columns() {
    let stmt = people()
        .filter(gt(member("age"), lit(18)))
        .take(10)
        .statement()
        .unwrap();
    assert_eq!(stmt.cql, "SELECT id, name, age FROM person WHERE age > ? LIMIT ?");
    assert_eq!(stmt.params, vec![Value::Int(18), Value::Int(10)]);
}

#[test]
fn test_consecutive_filters_join_with_and() {
    let stmt = people()
        .filter(eq(member("id"), lit(1)))
        .filter(lt(member("age"), lit(30)))
        .statement()
        .unwrap();
    assert_eq!(
        stmt.cql,
        "SELECT id, name, age FROM person WHERE id = ? AND age < ?"
    );
    assert_eq!(stmt.params, vec![Value::Int(1), Value::Int(30)]);
}

#[test]
fn test_query_allow_filtering() {
    let stmt = people()
        .filter(gte(member("age"), lit(21)))
        .allow_filtering()
        .statement()
        .unwrap();
    assert_eq!(
        stmt.cql,
        "SELECT id, name, age FROM person WHERE age >= ? ALLOW FILTERING"
    );
}

#[test]
fn test_order_by_then_by_descending() {
    let stmt = songs()
        .filter(eq(member("artist"), lit("Nina")))
        .order_by(member("album"))
        .then_by_descending(member("track"))
        .select(new_object([("album", member("album")), ("track", member("track"))]))
        .statement()
        .unwrap();
    assert_eq!(
        stmt.cql,
        "SELECT album, track FROM songs WHERE artist = ? ORDER BY album, track DESC"
    );
}

#[test]
fn test_order_by_constant_column_name() {
    let stmt = people().query().order_by_descending(lit("age")).statement().unwrap();
    assert_eq!(stmt.cql, "SELECT id, name, age FROM person ORDER BY age DESC");
}

#[test]
fn test_order_by_unmapped_member_is_rejected() {
    let err = people()
        .query()
        .order_by(member("nickname"))
        .statement()
        .unwrap_err();
    assert!(matches!(err, CqlError::Mapping(_)));
}

#[test]
fn test_order_by_host_call_is_unsupported() {
    let pick = host("pick", |_| Ok(Value::Text("age".into())), vec![]);
    let err = people().query().order_by(pick).statement().unwrap_err();
    match err {
        CqlError::UnsupportedExpression { phase, .. } => assert_eq!(phase, ParsePhase::OrderBy),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_take_and_group_by_host_calls_are_unsupported() {
    let ten = call(Method::Take, vec![Expr::Root, host("ten", |_| Ok(Value::Int(10)), vec![])]);
    let query = people();
    let err = CqlExpressionVisitor::new(
        query.poco_data(),
        "person",
        QueryKind::Select,
        ParamMode::Placeholder,
    )
    .compile(&ten)
    .unwrap_err();
    assert!(matches!(err, CqlError::UnsupportedExpression { .. }));

    let key = host("key", |_| Ok(Value::Text("name".into())), vec![]);
    let err = people().query().group_by(key).statement().unwrap_err();
    assert!(matches!(err, CqlError::UnsupportedExpression { .. }));
}

#[test]
fn test_select_cannot_assign_values() {
    let err = people()
        .filter(eq(member("id"), lit(1)))
        .select(new_object([("name", lit("x"))]))
        .statement()
        .unwrap_err();
    assert!(matches!(err, CqlError::Conflict(_)));

    let err = people()
        .select(new_object([("name", lit("x"))]))
        .count()
        .statement()
        .unwrap_err();
    assert!(matches!(err, CqlError::Conflict(_)));
}

#[test]
fn test_group_by_unmapped_member_is_rejected() {
    let err = people()
        .query()
        .group_by(member("nickname"))
        .statement()
        .unwrap_err();
    assert!(matches!(err, CqlError::Mapping(_)));
}

#[test]
fn test_unmapped_projection_member_is_skipped() {
    let stmt = people()
        .select(new_object([("name", member("name")), ("nick", member("nickname"))]))
        .statement()
        .unwrap();
    assert_eq!(stmt.cql, "SELECT name FROM person");
}

#[test]
fn test_group_by_with_aggregates() {
    let stmt = songs()
        .query()
        .group_by(member("artist"))
        .select(new_object([
            ("artist", group_key()),
            ("plays", sum(member("plays"))),
            ("tracks", count()),
        ]))
        .statement()
        .unwrap();
    assert_eq!(
        stmt.cql,
        "SELECT artist, SUM(plays), COUNT(*) FROM songs GROUP BY artist"
    );
}

#[test]
fn test_max_aggregate() {
    let stmt = songs()
        .filter(eq(member("artist"), lit("Nina")))
        .select(max(member("track")))
        .statement()
        .unwrap();
    assert_eq!(stmt.cql, "SELECT MAX(track) FROM songs WHERE artist = ?");
}

#[test]
fn test_aggregate_outside_select_is_unsupported() {
    let err = people()
        .filter(eq(member("id"), lit(1)))
        .select(member_init([("age", max(member("age")))]))
        .update()
        .statement()
        .unwrap_err();
    assert!(matches!(err, CqlError::UnsupportedExpression { .. }));
}

#[test]
fn test_first_sets_limit_one() {
    let stmt = people()
        .query()
        .first_where(eq(member("id"), lit(3)))
        .statement()
        .unwrap();
    assert_eq!(stmt.cql, "SELECT id, name, age FROM person WHERE id = ? LIMIT ?");
    assert_eq!(stmt.params, vec![Value::Int(3), Value::Int(1)]);
}

#[test]
fn test_take_from_folded_expression() {
    let record = lit(Value::Udt(vec![("page".into(), Value::Int(25))]));
    let query = people().query();
    let expr = call(Method::Take, vec![query.expression().clone(), field(record, "page")]);
    let parts = CqlExpressionVisitor::new(
        query.table().poco_data(),
        "person",
        QueryKind::Select,
        ParamMode::Placeholder,
    )
    .compile(&expr)
    .unwrap();
    assert_eq!(parts.limit, Some(25));
}

#[test]
fn test_display_inlines_values() {
    let query = people()
        .filter(eq(member("name"), lit("o'neil")))
        .take(5);
    assert_eq!(
        query.to_string(),
        "SELECT id, name, age FROM person WHERE name = 'o''neil' LIMIT 5"
    );
}

#[test]
fn test_count() {
    let scalar = people().filter(gt(member("age"), lit(18))).count();
    let stmt = scalar.statement().unwrap();
    assert_eq!(stmt.cql, "SELECT count(*) FROM person WHERE age > ?");
    assert_eq!(stmt.params, vec![Value::Int(18)]);
    assert_eq!(
        scalar.to_cql_string().unwrap(),
        "SELECT count(*) FROM person WHERE age > 18"
    );
}

#[test]
fn test_case_sensitive_identifiers_are_quoted_once() {
    let config = MappingConfiguration::new();
    config.define(
        Map::<Person>::new()
            .table_name("People")
            .keyspace_name("App")
            .case_sensitive()
            .column("name", |c| c.with_name("FullName")),
    );
    let stmt = Table::<Person>::new(&config)
        .unwrap()
        .filter(eq(member("name"), lit("x")))
        .statement()
        .unwrap();
    assert_eq!(
        stmt.cql,
        "SELECT \"id\", \"FullName\", \"age\" FROM \"App\".\"People\" WHERE \"FullName\" = ?"
    );
}

#[test]
fn test_compilation_is_deterministic() {
    let query = songs()
        .filter(eq(member("artist"), lit("Nina")))
        .filter(contains(lit(vec![1, 2]), member("track")))
        .order_by_descending(member("album"))
        .take(3);
    let first = query.statement().unwrap();
    let second = query.statement().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.cql.matches('?').count(), first.params.len());
}
