//! TOML mapping files.
//!
//! ```toml
//! [[table]]
//! entity = "Person"
//! name = "person"
//! partition_key = ["id"]
//!
//! [[table.column]]
//! member = "name"
//! name = "full_name"
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CqlError, CqlResult};
use crate::mapping::{ColumnDefinition, CqlType, SortOrder, TypeDefinition};

/// A parsed mapping file: one entry per mapped entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingConfig {
    #[serde(default, rename = "table")]
    pub tables: Vec<TableConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Type name of the mapped entity.
    pub entity: String,
    pub name: Option<String>,
    pub keyspace: Option<String>,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub compact_storage: bool,
    #[serde(default)]
    pub allow_filtering: bool,
    #[serde(default)]
    pub explicit_columns: bool,
    /// Member names, in key order.
    #[serde(default)]
    pub partition_key: Vec<String>,
    #[serde(default)]
    pub clustering_key: Vec<ClusteringKeyConfig>,
    #[serde(default, rename = "column")]
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringKeyConfig {
    pub column: String,
    #[serde(default)]
    pub order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub member: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub column_type: Option<CqlType>,
    #[serde(default)]
    pub counter: bool,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub frozen: bool,
    #[serde(default)]
    pub frozen_key: bool,
    #[serde(default)]
    pub frozen_value: bool,
    #[serde(default)]
    pub secondary_index: bool,
    #[serde(default)]
    pub ignore: bool,
}

impl MappingConfig {
    pub fn from_toml_str(content: &str) -> CqlResult<Self> {
        let config: MappingConfig =
            toml::from_str(content).map_err(|e| CqlError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> CqlResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(
            "Loaded {} table mappings from {}",
            config.tables.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn table(&self, entity: &str) -> Option<&TableConfig> {
        self.tables.iter().find(|t| t.entity == entity)
    }

    fn validate(&self) -> CqlResult<()> {
        let mut entities = HashSet::new();
        for table in &self.tables {
            if !entities.insert(table.entity.as_str()) {
                return Err(CqlError::Config(format!(
                    "entity '{}' is mapped more than once",
                    table.entity
                )));
            }
            let mut members = HashSet::new();
            for column in &table.columns {
                if !members.insert(column.member.as_str()) {
                    return Err(CqlError::Config(format!(
                        "member '{}' of '{}' has more than one column entry",
                        column.member, table.entity
                    )));
                }
            }
        }
        Ok(())
    }
}

impl TableConfig {
    fn column(&self, member: &str) -> Option<&ColumnConfig> {
        self.columns.iter().find(|c| c.member == member)
    }

    fn column_name_of(&self, member: &str) -> String {
        self.column(member)
            .and_then(|c| c.name.clone())
            .unwrap_or_else(|| member.to_string())
    }
}

impl TypeDefinition for TableConfig {
    fn table_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn keyspace_name(&self) -> Option<&str> {
        self.keyspace.as_deref()
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
        self.partition_key.iter().map(|m| self.column_name_of(m)).collect()
    }

    fn clustering_keys(&self) -> Vec<(String, SortOrder)> {
        self.clustering_key
            .iter()
            .map(|k| (self.column_name_of(&k.column), k.order))
            .collect()
    }

    fn column_definition(&self, member: &str) -> Option<ColumnDefinition> {
        self.column(member).map(|c| ColumnDefinition {
            column_name: c.name.clone(),
            column_type: c.column_type.clone(),
            ignore: c.ignore,
            is_counter: c.counter,
            is_static: c.is_static,
            is_frozen: c.frozen,
            has_frozen_key: c.frozen_key,
            has_frozen_value: c.frozen_value,
            secondary_index: c.secondary_index,
        })
    }
}
