use std::marker::PhantomData;
use std::sync::Arc;

use crate::ast::Expr;
use crate::error::CqlResult;
use crate::mapping::{Entity, MappingConfiguration, PocoData};
use crate::query::{CqlInsert, CqlQuery, CqlScalar};
use crate::session::{Session, Statement};
use crate::transpiler::{create_table, qualified_name};

type KeyspaceFallback = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Root handle of queries over entity type `T`.
pub struct Table<T> {
    poco: Arc<PocoData>,
    name: Option<String>,
    keyspace: Option<String>,
    keyspace_fallback: Option<KeyspaceFallback>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Table<T> {
    /// Table of `T` as mapped in `config`.
    pub fn new(config: &MappingConfiguration) -> CqlResult<Self> {
        Ok(Self::from_poco(config.poco_data::<T>()?))
    }

    pub fn from_poco(poco: Arc<PocoData>) -> Self {
        Self {
            poco,
            name: None,
            keyspace: None,
            keyspace_fallback: None,
            _entity: PhantomData,
        }
    }

    /// Override the mapped table name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override the mapped keyspace.
    pub fn with_keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.keyspace = Some(keyspace.into());
        self
    }

    /// Keyspace to use when neither the table nor the mapping names one.
    pub fn with_keyspace_fallback<F>(mut self, fallback: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        self.keyspace_fallback = Some(Arc::new(fallback));
        self
    }

    /// Fall back to the session's current keyspace.
    pub fn for_session<S: Session>(self, session: &S) -> Self {
        let keyspace = session.keyspace();
        self.with_keyspace_fallback(move || keyspace.clone())
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.poco.table_name)
    }

    pub fn keyspace(&self) -> Option<String> {
        self.keyspace
            .clone()
            .or_else(|| self.poco.keyspace_name.clone())
            .or_else(|| self.keyspace_fallback.as_ref().and_then(|f| f()))
    }

    pub fn poco_data(&self) -> &PocoData {
        &self.poco
    }

    /// Escaped `keyspace.table` as it appears in statements.
    pub fn qualified_name(&self) -> String {
        qualified_name(
            self.keyspace().as_deref(),
            self.name(),
            self.poco.case_sensitive,
        )
    }

    /// A query over every row.
    pub fn query(&self) -> CqlQuery<T> {
        CqlQuery::new(self.clone(), Expr::Root)
    }

    pub fn filter(&self, predicate: Expr) -> CqlQuery<T> {
        self.query().filter(predicate)
    }

    pub fn select(&self, projector: Expr) -> CqlQuery<T> {
        self.query().select(projector)
    }

    pub fn count(&self) -> CqlScalar<T> {
        self.query().count()
    }

    pub fn insert(&self, entity: &T) -> CqlInsert<T> {
        CqlInsert::new(self.clone(), entity)
    }

    /// CREATE TABLE plus CREATE INDEX statements for this mapping.
    pub fn create_statements(&self, if_not_exists: bool) -> CqlResult<Vec<Statement>> {
        let keyspace = self.keyspace();
        let statements = create_table(&self.poco, self.name(), keyspace.as_deref(), if_not_exists)?;
        Ok(statements
            .into_iter()
            .map(|cql| Statement::new(cql, Vec::new()))
            .collect())
    }

    /// Create the table and its indexes, one statement at a time.
    pub async fn create<S: Session>(&self, session: &S, if_not_exists: bool) -> CqlResult<()> {
        for statement in self.create_statements(if_not_exists)? {
            session.execute(&statement).await?;
        }
        Ok(())
    }
}

impl<T> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self {
            poco: Arc::clone(&self.poco),
            name: self.name.clone(),
            keyspace: self.keyspace.clone(),
            keyspace_fallback: self.keyspace_fallback.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("type", &self.poco.type_name)
            .field("name", &self.name.as_deref().unwrap_or(&self.poco.table_name))
            .field("keyspace", &self.keyspace)
            .finish()
    }
}
