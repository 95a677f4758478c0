//! Statements that change data, plus the count scalar.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::ast::Value;
use crate::error::{CqlError, CqlResult};
use crate::mapping::Entity;
use crate::query::{CqlQuery, Table};
use crate::session::{RowSet, Session, Statement};
use crate::transpiler::dml::{build_count, build_delete, build_insert, build_update};
use crate::transpiler::{DeleteOptions, InsertOptions, ParamMode, QueryKind, UpdateOptions};

/// A compiled-on-demand statement that can run on a [`Session`].
pub trait CqlCommand: Send + Sync {
    fn statement(&self) -> CqlResult<Statement>;

    /// The statement with values inlined as literals.
    fn to_cql_string(&self) -> CqlResult<String>;

    fn execute<S: Session>(&self, session: &S) -> impl Future<Output = CqlResult<RowSet>> + Send {
        let statement = self.statement();
        async move { session.execute(&statement?).await }
    }
}

/// A command that changes data and may therefore join a [`Batch`].
///
/// Counts are reads, so they cannot be appended:
///
/// ```compile_fail
/// use cqlinq::query::{Batch, BatchType, CqlScalar, Mutation};
///
/// fn join<C: Mutation>(batch: &mut Batch, command: &C) {
///     batch.append(command).ok();
/// }
///
/// fn count_in_batch<T: cqlinq::mapping::Entity>(batch: &mut Batch, count: CqlScalar<T>) {
///     join(batch, &count);
/// }
/// # let _ = BatchType::Logged;
/// ```
///
/// [`Batch`]: crate::query::Batch
pub trait Mutation: CqlCommand {}

impl<T: Entity> Mutation for CqlUpdate<T> {}
impl<T: Entity> Mutation for CqlDelete<T> {}
impl<T: Entity> Mutation for CqlInsert<T> {}

/// UPDATE built from a query's filters and `select` assignments.
pub struct CqlUpdate<T> {
    query: CqlQuery<T>,
    options: UpdateOptions,
}

impl<T: Entity> CqlUpdate<T> {
    pub(crate) fn new(query: CqlQuery<T>) -> Self {
        Self {
            query,
            options: UpdateOptions::default(),
        }
    }

    pub fn with_ttl(mut self, seconds: i32) -> Self {
        self.options.ttl = Some(seconds);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.options.timestamp = Some(timestamp);
        self
    }

    fn build(&self, mode: ParamMode) -> CqlResult<Statement> {
        let parts = self.query.compile(QueryKind::Update, mode)?;
        build_update(&parts, &self.options)
    }
}

impl<T: Entity> CqlCommand for CqlUpdate<T> {
    fn statement(&self) -> CqlResult<Statement> {
        let statement = self.build(ParamMode::Placeholder)?;
        tracing::debug!(
            "Compiled update ({} params): {}",
            statement.params.len(),
            statement.cql
        );
        Ok(statement)
    }

    fn to_cql_string(&self) -> CqlResult<String> {
        Ok(self.build(ParamMode::Inline)?.cql)
    }
}

/// DELETE of the rows a query filters.
pub struct CqlDelete<T> {
    query: CqlQuery<T>,
    options: DeleteOptions,
}

impl<T: Entity> CqlDelete<T> {
    pub(crate) fn new(query: CqlQuery<T>) -> Self {
        Self {
            query,
            options: DeleteOptions::default(),
        }
    }

    pub fn if_exists(mut self) -> Self {
        self.options.if_exists = true;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.options.timestamp = Some(timestamp);
        self
    }

    fn build(&self, mode: ParamMode) -> CqlResult<Statement> {
        let parts = self.query.compile(QueryKind::Delete, mode)?;
        build_delete(&parts, &self.options)
    }
}

impl<T: Entity> CqlCommand for CqlDelete<T> {
    fn statement(&self) -> CqlResult<Statement> {
        let statement = self.build(ParamMode::Placeholder)?;
        tracing::debug!(
            "Compiled delete ({} params): {}",
            statement.params.len(),
            statement.cql
        );
        Ok(statement)
    }

    fn to_cql_string(&self) -> CqlResult<String> {
        Ok(self.build(ParamMode::Inline)?.cql)
    }
}

/// INSERT of one entity instance.
pub struct CqlInsert<T> {
    table: Table<T>,
    /// One per mapped column, in column order.
    values: Vec<Value>,
    options: InsertOptions,
}

impl<T: Entity> CqlInsert<T> {
    pub(crate) fn new(table: Table<T>, entity: &T) -> Self {
        let values = table
            .poco_data()
            .columns
            .iter()
            .map(|c| entity.value_of(c.member_name()).unwrap_or(Value::Null))
            .collect();
        Self {
            table,
            values,
            options: InsertOptions::default(),
        }
    }

    pub fn if_not_exists(mut self) -> Self {
        self.options.if_not_exists = true;
        self
    }

    pub fn with_ttl(mut self, seconds: i32) -> Self {
        self.options.ttl = Some(seconds);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.options.timestamp = Some(timestamp);
        self
    }

    /// Bind `null` for absent values instead of omitting their columns.
    pub fn insert_nulls(mut self) -> Self {
        self.options.insert_nulls = true;
        self
    }

    fn build(&self, mode: ParamMode) -> CqlResult<Statement> {
        build_insert(
            self.table.poco_data(),
            &self.table.qualified_name(),
            &self.values,
            &self.options,
            mode,
        )
    }
}

impl<T: Entity> CqlCommand for CqlInsert<T> {
    fn statement(&self) -> CqlResult<Statement> {
        let statement = self.build(ParamMode::Placeholder)?;
        tracing::debug!(
            "Compiled insert ({} params): {}",
            statement.params.len(),
            statement.cql
        );
        Ok(statement)
    }

    fn to_cql_string(&self) -> CqlResult<String> {
        Ok(self.build(ParamMode::Inline)?.cql)
    }
}

/// `SELECT count(*)` over a query's filters.
pub struct CqlScalar<T> {
    query: CqlQuery<T>,
}

impl<T: Entity> CqlScalar<T> {
    pub(crate) fn new(query: CqlQuery<T>) -> Self {
        Self { query }
    }

    fn build(&self, mode: ParamMode) -> CqlResult<Statement> {
        let parts = self.query.compile(QueryKind::Count, mode)?;
        Ok(build_count(&parts, self.query.table().poco_data()))
    }

    /// Run the count and read the single value it returns.
    pub async fn count_on<S: Session>(&self, session: &S) -> CqlResult<i64> {
        let rows = self.execute(session).await?;
        rows.scalar()
            .and_then(Value::as_integer)
            .ok_or_else(|| CqlError::Execution("count returned no integer value".into()))
    }
}

impl<T: Entity> CqlCommand for CqlScalar<T> {
    fn statement(&self) -> CqlResult<Statement> {
        self.build(ParamMode::Placeholder)
    }

    fn to_cql_string(&self) -> CqlResult<String> {
        Ok(self.build(ParamMode::Inline)?.cql)
    }
}
