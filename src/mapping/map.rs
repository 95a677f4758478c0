//! Fluent mapping builder.
//!
//! ```ignore
//! let map = Map::<Person>::new()
//!     .table_name("person")
//!     .partition_key(["id"])
//!     .column("name", |c| c.with_name("full_name"));
//! ```

use std::collections::HashMap;
use std::marker::PhantomData;

use crate::mapping::{ColumnDefinition, CqlType, Entity, SortOrder, TypeDefinition};

/// Mapping options of a single member.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap(ColumnDefinition);

impl ColumnMap {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.0.column_name = Some(name.into());
        self
    }

    /// Database type when it differs from the member's type.
    pub fn with_db_type(mut self, column_type: CqlType) -> Self {
        self.0.column_type = Some(column_type);
        self
    }

    pub fn ignore(mut self) -> Self {
        self.0.ignore = true;
        self
    }

    pub fn as_counter(mut self) -> Self {
        self.0.is_counter = true;
        self
    }

    pub fn as_static(mut self) -> Self {
        self.0.is_static = true;
        self
    }

    pub fn as_frozen(mut self) -> Self {
        self.0.is_frozen = true;
        self
    }

    pub fn with_frozen_key(mut self) -> Self {
        self.0.has_frozen_key = true;
        self
    }

    pub fn with_frozen_value(mut self) -> Self {
        self.0.has_frozen_value = true;
        self
    }

    pub fn with_secondary_index(mut self) -> Self {
        self.0.secondary_index = true;
        self
    }
}

/// Mapping of entity type `T`, built fluently.
#[derive(Debug, Clone)]
pub struct Map<T> {
    table_name: Option<String>,
    keyspace_name: Option<String>,
    case_sensitive: bool,
    compact_storage: bool,
    allow_filtering: bool,
    explicit_columns: bool,
    /// Member names, in key order.
    partition_keys: Vec<String>,
    clustering_keys: Vec<(String, SortOrder)>,
    columns: HashMap<String, ColumnDefinition>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Default for Map<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Map<T> {
    pub fn new() -> Self {
        Self {
            table_name: None,
            keyspace_name: None,
            case_sensitive: false,
            compact_storage: false,
            allow_filtering: false,
            explicit_columns: false,
            partition_keys: vec![],
            clustering_keys: vec![],
            columns: HashMap::new(),
            _entity: PhantomData,
        }
    }

    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = Some(name.into());
        self
    }

    pub fn keyspace_name(mut self, name: impl Into<String>) -> Self {
        self.keyspace_name = Some(name.into());
        self
    }

    /// Quote identifiers so their case is preserved.
    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    pub fn compact_storage(mut self) -> Self {
        self.compact_storage = true;
        self
    }

    /// Append ALLOW FILTERING to every SELECT on this table.
    pub fn allow_filtering(mut self) -> Self {
        self.allow_filtering = true;
        self
    }

    /// Map only the members configured through [`Map::column`].
    pub fn explicit_columns(mut self) -> Self {
        self.explicit_columns = true;
        self
    }

    pub fn partition_key<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.partition_keys = members.into_iter().map(|m| m.as_ref().to_string()).collect();
        self
    }

    pub fn clustering_key<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = (S, SortOrder)>,
        S: AsRef<str>,
    {
        self.clustering_keys = members
            .into_iter()
            .map(|(m, order)| (m.as_ref().to_string(), order))
            .collect();
        self
    }

    pub fn column<F>(mut self, member: &str, configure: F) -> Self
    where
        F: FnOnce(ColumnMap) -> ColumnMap,
    {
        let current = self.columns.remove(member).unwrap_or_default();
        let ColumnMap(def) = configure(ColumnMap(current));
        self.columns.insert(member.to_string(), def);
        self
    }

    fn column_name_of(&self, member: &str) -> String {
        self.columns
            .get(member)
            .and_then(|c| c.column_name.clone())
            .unwrap_or_else(|| member.to_string())
    }
}

impl<T: Entity> TypeDefinition for Map<T> {
    fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    fn keyspace_name(&self) -> Option<&str> {
        self.keyspace_name.as_deref()
    }

    fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    fn compact_storage(&self) -> bool {
        self.compact_storage
    }

    fn allow_filtering(&self) -> bool {
        self.allow_filtering
    }

    fn explicit_columns(&self) -> bool {
        self.explicit_columns
    }

    fn partition_keys(&self) -> Vec<String> {
        self.partition_keys.iter().map(|m| self.column_name_of(m)).collect()
    }

    fn clustering_keys(&self) -> Vec<(String, SortOrder)> {
        self.clustering_keys
            .iter()
            .map(|(m, order)| (self.column_name_of(m), *order))
            .collect()
    }

    fn column_definition(&self, member: &str) -> Option<ColumnDefinition> {
        self.columns.get(member).cloned()
    }
}
