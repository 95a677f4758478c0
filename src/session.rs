//! Execution boundary.
//!
//! The crate compiles statements; running them against a cluster is up to a
//! [`Session`] implementation supplied by the application.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::ast::Value;
use crate::error::CqlResult;

/// CQL text plus its bound values, one per `?` in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub cql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(cql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            cql: cql.into(),
            params,
        }
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cql)
    }
}

/// Rows returned by a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl RowSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First column of the first row.
    pub fn scalar(&self) -> Option<&Value> {
        self.rows.first().and_then(|row| row.first())
    }

    /// Value of `column` in every row.
    pub fn column_values(&self, column: &str) -> Option<Vec<&Value>> {
        let index = self.columns.iter().position(|c| c == column)?;
        Some(self.rows.iter().filter_map(|row| row.get(index)).collect())
    }
}

/// A connection able to run compiled statements.
pub trait Session: Send + Sync {
    /// Keyspace statements run in when a mapping names none.
    fn keyspace(&self) -> Option<String>;

    fn execute(&self, statement: &Statement) -> impl Future<Output = CqlResult<RowSet>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rowset_accessors() {
        let rows = RowSet {
            columns: vec!["name".into(), "age".into()],
            rows: vec![
                vec!["ann".into(), Value::Int(30)],
                vec!["bob".into(), Value::Int(41)],
            ],
        };
        assert_eq!(rows.scalar(), Some(&Value::Text("ann".into())));
        assert_eq!(
            rows.column_values("age").unwrap(),
            vec![&Value::Int(30), &Value::Int(41)]
        );
        assert!(rows.column_values("missing").is_none());
    }
}
