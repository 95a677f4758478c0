use std::any::TypeId;
use std::collections::HashMap;

use crate::error::{CqlError, CqlResult};
use crate::mapping::{
    ColumnDefinition, Entity, MemberInfo, PocoColumn, SortOrder, TypeDefinition,
};

/// Table metadata of one mapped entity type. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PocoData {
    pub type_id: TypeId,
    pub type_name: String,
    pub table_name: String,
    /// Resolved by the table handle when absent.
    pub keyspace_name: Option<String>,
    pub columns: Vec<PocoColumn>,
    pub case_sensitive: bool,
    pub compact_storage: bool,
    pub allow_filtering: bool,
    /// Key columns named by the definition but not mapped.
    pub missing_primary_key_columns: Vec<String>,
    partition_keys: Vec<usize>,
    clustering_keys: Vec<(usize, SortOrder)>,
    members: HashMap<String, usize>,
}

impl PocoData {
    pub fn partition_keys(&self) -> Vec<&PocoColumn> {
        self.partition_keys.iter().map(|&i| &self.columns[i]).collect()
    }

    pub fn clustering_keys(&self) -> Vec<(&PocoColumn, SortOrder)> {
        self.clustering_keys
            .iter()
            .map(|&(i, order)| (&self.columns[i], order))
            .collect()
    }

    pub fn get_column_by_member_name(&self, member: &str) -> Option<&PocoColumn> {
        self.members.get(member).map(|&i| &self.columns[i])
    }

    /// Whether the column is part of the partition or clustering key.
    pub fn is_primary_key(&self, column: &PocoColumn) -> bool {
        self.partition_keys()
            .iter()
            .chain(self.clustering_keys().iter().map(|(c, _)| c))
            .any(|k| k.column_name == column.column_name)
    }
}

/// Builds [`PocoData`] from a [`TypeDefinition`].
pub struct PocoDataFactory;

impl PocoDataFactory {
    pub fn build<T: Entity>(definition: &dyn TypeDefinition) -> CqlResult<PocoData> {
        Self::build_from_members(TypeId::of::<T>(), T::type_name(), T::members(), definition)
    }

    pub fn build_from_members(
        type_id: TypeId,
        type_name: &str,
        members: Vec<MemberInfo>,
        definition: &dyn TypeDefinition,
    ) -> CqlResult<PocoData> {
        let mut columns: Vec<PocoColumn> = Vec::with_capacity(members.len());
        let mut lookup = HashMap::new();

        for member in members {
            let column_def = match definition.column_definition(&member.name) {
                Some(def) if def.ignore => continue,
                Some(def) => def,
                None if definition.explicit_columns() => continue,
                None => ColumnDefinition::default(),
            };

            let column = PocoColumn {
                column_name: column_def.column_name.unwrap_or_else(|| member.name.clone()),
                column_type: column_def
                    .column_type
                    .unwrap_or_else(|| member.member_type.clone()),
                is_counter: column_def.is_counter,
                is_static: column_def.is_static,
                is_frozen: column_def.is_frozen,
                has_frozen_key: column_def.has_frozen_key,
                has_frozen_value: column_def.has_frozen_value,
                secondary_index: column_def.secondary_index,
                member,
            };

            if columns.iter().any(|c| c.column_name == column.column_name) {
                return Err(CqlError::Mapping(format!(
                    "column '{}' is mapped more than once on {}",
                    column.column_name, type_name
                )));
            }
            lookup.insert(column.member.name.clone(), columns.len());
            columns.push(column);
        }

        let position = |name: &str| columns.iter().position(|c| c.column_name == name);
        let mut missing = Vec::new();

        let mut partition_keys = Vec::new();
        for name in definition.partition_keys() {
            match position(&name) {
                Some(i) => partition_keys.push(i),
                None => missing.push(name),
            }
        }

        let mut clustering_keys = Vec::new();
        for (name, order) in definition.clustering_keys() {
            match position(&name) {
                Some(i) => clustering_keys.push((i, order)),
                None => missing.push(name),
            }
        }

        if !missing.is_empty() {
            tracing::warn!(
                "{} names primary key columns that are not mapped: {}",
                type_name,
                missing.join(", ")
            );
        }

        let data = PocoData {
            type_id,
            type_name: type_name.to_string(),
            table_name: definition
                .table_name()
                .map(str::to_string)
                .unwrap_or_else(|| type_name.to_string()),
            keyspace_name: definition.keyspace_name().map(str::to_string),
            columns,
            case_sensitive: definition.case_sensitive(),
            compact_storage: definition.compact_storage(),
            allow_filtering: definition.allow_filtering(),
            missing_primary_key_columns: missing,
            partition_keys,
            clustering_keys,
            members: lookup,
        };
        tracing::debug!(
            "Built mapping for {}: table '{}' with {} columns",
            type_name,
            data.table_name,
            data.columns.len()
        );
        Ok(data)
    }
}
