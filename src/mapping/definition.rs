//! Mapping definitions: how an entity type maps onto a table.
//!
//! Every source of mapping information (the fluent [`Map`](crate::mapping::Map)
//! builder, a TOML mapping file, or plain conventions) implements
//! [`TypeDefinition`], and [`PocoDataFactory`](crate::mapping::PocoDataFactory)
//! turns any of them into the same [`PocoData`](crate::mapping::PocoData).

use crate::ast::Value;
use crate::mapping::{CqlType, MemberInfo, SortOrder};

/// An entity type that can be mapped to a table.
pub trait Entity: Send + Sync + 'static {
    /// Name of the type; the default table name.
    fn type_name() -> &'static str;

    /// Fields of the type in declaration order.
    fn members() -> Vec<MemberInfo>;

    /// Current value of a member, used when inserting an instance.
    fn value_of(&self, member: &str) -> Option<Value>;
}

/// Per-member mapping options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub column_name: Option<String>,
    pub column_type: Option<CqlType>,
    pub ignore: bool,
    pub is_counter: bool,
    pub is_static: bool,
    pub is_frozen: bool,
    pub has_frozen_key: bool,
    pub has_frozen_value: bool,
    pub secondary_index: bool,
}

/// Table-level mapping of an entity type.
pub trait TypeDefinition: Send + Sync {
    /// Table name; the entity's type name when `None`.
    fn table_name(&self) -> Option<&str>;

    fn keyspace_name(&self) -> Option<&str>;

    fn case_sensitive(&self) -> bool;

    fn compact_storage(&self) -> bool;

    fn allow_filtering(&self) -> bool;

    /// Only members with a column definition are mapped.
    fn explicit_columns(&self) -> bool;

    /// Partition-key column names, in key order.
    fn partition_keys(&self) -> Vec<String>;

    /// Clustering-key column names with their order, in key order.
    fn clustering_keys(&self) -> Vec<(String, SortOrder)>;

    fn column_definition(&self, member: &str) -> Option<ColumnDefinition>;
}

/// Convention-only mapping: every member becomes a column of the same name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDefinition;

impl TypeDefinition for DefaultDefinition {
    fn table_name(&self) -> Option<&str> {
        None
    }

    fn keyspace_name(&self) -> Option<&str> {
        None
    }

    fn case_sensitive(&self) -> bool {
        false
    }

    fn compact_storage(&self) -> bool {
        false
    }

    fn allow_filtering(&self) -> bool {
        false
    }

    fn explicit_columns(&self) -> bool {
        false
    }

    fn partition_keys(&self) -> Vec<String> {
        Vec::new()
    }

    fn clustering_keys(&self) -> Vec<(String, SortOrder)> {
        Vec::new()
    }

    fn column_definition(&self, _member: &str) -> Option<ColumnDefinition> {
        None
    }
}
