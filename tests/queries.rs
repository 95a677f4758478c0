//! End-to-end compilation through the public API.

mod common;

use common::{Event, Hits, User, configuration};
use cqlinq::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn test_select_by_key() -> CqlResult<()> {
    let users = Table::<User>::new(&configuration())?;
    let stmt = users
        .filter(eq(member("id"), lit(5)))
        .select(member("name"))
        .statement()?;

    assert_eq!(stmt.cql, "SELECT name FROM users WHERE id = ?");
    assert_eq!(stmt.params, vec![Value::Int(5)]);
    Ok(())
}

#[test]
fn test_filter_and_take() -> CqlResult<()> {
    let users = Table::<User>::new(&configuration())?;
    let stmt = users.filter(gt(member("age"), lit(18))).take(10).statement()?;

    assert_eq!(
        stmt.cql,
        "SELECT id, name, email, age FROM users WHERE age > ? LIMIT ?"
    );
    assert_eq!(stmt.params, vec![Value::Int(18), Value::Int(10)]);
    Ok(())
}

#[test]
fn test_partition_range_query() -> CqlResult<()> {
    let events = Table::<Event>::new(&configuration())?.with_keyspace("telemetry");
    let since = 1_700_000_000_000i64;
    let stmt = events
        .filter(and(
            eq(member("device"), lit("dev-1")),
            eq(member("bucket"), lit("2024-01")),
        ))
        .filter(gte(member("at"), lit(since)))
        .order_by_descending(member("at"))
        .select(new_object([("kind", member("kind")), ("at", member("at"))]))
        .take(50)
        .statement()?;

    assert_eq!(
        stmt.cql,
        "SELECT kind, at FROM telemetry.events WHERE device = ? AND bucket = ? AND at >= ? \
         ORDER BY at DESC LIMIT ?"
    );
    assert_eq!(stmt.cql.matches('?').count(), stmt.params.len());
    assert_eq!(stmt.params[2], Value::BigInt(since));
    Ok(())
}

#[test]
fn test_update_insert_and_delete_share_one_table() -> CqlResult<()> {
    let users = Table::<User>::new(&configuration())?;

    let update = users
        .filter(eq(member("id"), lit(3)))
        .select(new_object([("email", lit("c@example.com"))]))
        .update()
        .with_ttl(86_400);
    assert_eq!(
        update.statement()?.cql,
        "UPDATE users USING TTL ? SET email = ? WHERE id = ?"
    );

    let user = User {
        id: 3,
        name: "cy".into(),
        email: None,
        age: 28,
    };
    let insert = users.insert(&user).if_not_exists();
    assert_eq!(
        insert.to_cql_string()?,
        "INSERT INTO users (id, name, age) VALUES (3, 'cy', 28) IF NOT EXISTS"
    );

    let delete = users.filter(eq(member("id"), lit(3))).delete();
    assert_eq!(delete.statement()?.cql, "DELETE FROM users WHERE id = ?");
    Ok(())
}

#[test]
fn test_counter_increment() -> CqlResult<()> {
    let hits = Table::<Hits>::new(&configuration())?;
    let stmt = hits
        .filter(eq(member("page"), lit("/")))
        .select(new_object([("total", add(member("total"), lit(1i64)))]))
        .update()
        .statement()?;

    assert_eq!(stmt.cql, "UPDATE hits SET total = total + ? WHERE page = ?");
    assert_eq!(stmt.params, vec![Value::BigInt(1), Value::Text("/".into())]);
    Ok(())
}

#[test]
fn test_create_statements() -> CqlResult<()> {
    let events = Table::<Event>::new(&configuration())?;
    let cql: Vec<String> = events
        .create_statements(true)?
        .into_iter()
        .map(|s| s.cql)
        .collect();

    assert_eq!(
        cql,
        vec![
            "CREATE TABLE IF NOT EXISTS events (device text, bucket text, at bigint, kind text, \
             labels set<text>, PRIMARY KEY ((device, bucket), at)) \
             WITH CLUSTERING ORDER BY (at DESC)"
                .to_string(),
            "CREATE INDEX IF NOT EXISTS ON events (labels)".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn test_unsupported_expression_reports_phase() {
    let users = Table::<User>::new(&configuration()).unwrap();
    let err = users
        .filter(or_else(eq(member("id"), lit(1)), eq(member("age"), lit(2))))
        .statement()
        .unwrap_err();

    assert!(matches!(err, CqlError::UnsupportedExpression { .. }));
    assert!(err.to_string().contains("Condition"));
}

#[test]
fn test_placeholders_always_match_params() -> CqlResult<()> {
    let users = Table::<User>::new(&configuration())?;
    let queries = vec![
        users.query(),
        users.filter(contains(lit(vec![1, 2, 3, 4]), member("id"))),
        users
            .filter(starts_with(member("name"), lit("a")))
            .allow_filtering()
            .take(3),
        users.filter(gt(compare_to(member("name"), lit("m")), lit(0))),
        users.query().first_where(eq(member("id"), lit(9))),
    ];

    for query in queries {
        let stmt = query.statement()?;
        assert_eq!(
            stmt.cql.matches('?').count(),
            stmt.params.len(),
            "{}",
            stmt.cql
        );
    }
    Ok(())
}
