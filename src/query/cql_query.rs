use crate::ast::builders::{call, lambda, lit};
use crate::ast::{Expr, Method};
use crate::error::CqlResult;
use crate::mapping::Entity;
use crate::query::{CqlDelete, CqlScalar, CqlUpdate, Table};
use crate::session::{RowSet, Session, Statement};
use crate::transpiler::dml::build_select;
use crate::transpiler::{CqlExpressionVisitor, ParamMode, QueryKind, QueryParts};

/// A query over a [`Table`], built up one operator at a time.
///
/// ```ignore
/// let query = people
///     .filter(gt(member("age"), lit(18)))
///     .select(member("name"))
///     .take(10);
/// let statement = query.statement()?;
/// ```
pub struct CqlQuery<T> {
    table: Table<T>,
    expr: Expr,
}

impl<T: Entity> CqlQuery<T> {
    pub(crate) fn new(table: Table<T>, expr: Expr) -> Self {
        Self { table, expr }
    }

    fn chain(self, method: Method, extra: Vec<Expr>) -> Self {
        let mut args = Vec::with_capacity(extra.len() + 1);
        args.push(self.expr);
        args.extend(extra);
        Self {
            table: self.table,
            expr: call(method, args),
        }
    }

    /// `Where`; consecutive filters are joined with AND.
    pub fn filter(self, predicate: Expr) -> Self {
        self.chain(Method::Where, vec![as_lambda(predicate)])
    }

    /// Project columns, or assign values when the query becomes an update.
    pub fn select(self, projector: Expr) -> Self {
        self.chain(Method::Select, vec![as_lambda(projector)])
    }

    pub fn take(self, count: i32) -> Self {
        self.chain(Method::Take, vec![lit(count)])
    }

    pub fn order_by(self, key: Expr) -> Self {
        self.chain(Method::OrderBy, vec![as_lambda(key)])
    }

    pub fn then_by(self, key: Expr) -> Self {
        self.chain(Method::ThenBy, vec![as_lambda(key)])
    }

    pub fn order_by_descending(self, key: Expr) -> Self {
        self.chain(Method::OrderByDescending, vec![as_lambda(key)])
    }

    pub fn then_by_descending(self, key: Expr) -> Self {
        self.chain(Method::ThenByDescending, vec![as_lambda(key)])
    }

    /// Group by a single column.
    pub fn group_by(self, key: Expr) -> Self {
        self.chain(Method::GroupBy, vec![as_lambda(key)])
    }

    pub fn allow_filtering(self) -> Self {
        self.chain(Method::AllowFiltering, vec![])
    }

    pub fn first(self) -> Self {
        self.chain(Method::First, vec![])
    }

    pub fn first_where(self, predicate: Expr) -> Self {
        self.chain(Method::First, vec![as_lambda(predicate)])
    }

    pub fn first_or_default(self) -> Self {
        self.chain(Method::FirstOrDefault, vec![])
    }

    pub fn first_or_default_where(self, predicate: Expr) -> Self {
        self.chain(Method::FirstOrDefault, vec![as_lambda(predicate)])
    }

    /// IF condition of a conditional update.
    pub fn update_if(self, predicate: Expr) -> Self {
        self.chain(Method::UpdateIf, vec![as_lambda(predicate)])
    }

    /// IF condition of a conditional delete.
    pub fn delete_if(self, predicate: Expr) -> Self {
        self.chain(Method::DeleteIf, vec![as_lambda(predicate)])
    }

    pub fn expression(&self) -> &Expr {
        &self.expr
    }

    pub fn table(&self) -> &Table<T> {
        &self.table
    }

    pub(crate) fn compile(&self, kind: QueryKind, mode: ParamMode) -> CqlResult<QueryParts> {
        let visitor = CqlExpressionVisitor::new(
            self.table.poco_data(),
            self.table.qualified_name(),
            kind,
            mode,
        );
        visitor.compile(&self.expr)
    }

    /// Compile to a SELECT statement.
    pub fn statement(&self) -> CqlResult<Statement> {
        let parts = self.compile(QueryKind::Select, ParamMode::Placeholder)?;
        let statement = build_select(&parts, self.table.poco_data());
        tracing::debug!(
            "Compiled select ({} params): {}",
            statement.params.len(),
            statement.cql
        );
        Ok(statement)
    }

    /// SELECT with values inlined as literals.
    pub fn to_cql_string(&self) -> CqlResult<String> {
        let parts = self.compile(QueryKind::Select, ParamMode::Inline)?;
        Ok(build_select(&parts, self.table.poco_data()).cql)
    }

    pub fn count(self) -> CqlScalar<T> {
        CqlScalar::new(self)
    }

    /// Update the matching rows with the values assigned in `select`.
    pub fn update(self) -> CqlUpdate<T> {
        CqlUpdate::new(self)
    }

    pub fn delete(self) -> CqlDelete<T> {
        CqlDelete::new(self)
    }

    pub async fn execute<S: Session>(&self, session: &S) -> CqlResult<RowSet> {
        let statement = self.statement()?;
        session.execute(&statement).await
    }
}

fn as_lambda(expr: Expr) -> Expr {
    match expr {
        Expr::Lambda(_) => expr,
        body => lambda(body),
    }
}

impl<T> Clone for CqlQuery<T> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            expr: self.expr.clone(),
        }
    }
}

impl<T> std::fmt::Debug for CqlQuery<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CqlQuery")
            .field("table", &self.table)
            .field("expr", &self.expr)
            .finish()
    }
}

impl<T: Entity> std::fmt::Display for CqlQuery<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_cql_string() {
            Ok(cql) => write!(f, "{}", cql),
            Err(e) => write!(f, "<invalid query: {}>", e),
        }
    }
}
