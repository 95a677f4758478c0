//! DDL generation: CREATE TABLE and CREATE INDEX from a mapping.

use crate::error::{CqlError, CqlResult};
use crate::mapping::{PocoColumn, PocoData};
use crate::transpiler::escape::{escape_identifier, qualified_name};

/// Generate the CREATE TABLE statement for a mapping, followed by one
/// CREATE INDEX per secondary-index column.
pub fn create_table(
    poco: &PocoData,
    table: &str,
    keyspace: Option<&str>,
    if_not_exists: bool,
) -> CqlResult<Vec<String>> {
    validate(poco)?;

    let escape = |name: &str| escape_identifier(name, poco.case_sensitive);
    let table_name = qualified_name(keyspace, table, poco.case_sensitive);

    let mut defs: Vec<String> = poco
        .columns
        .iter()
        .map(|c| {
            let mut def = format!("{} {}", escape(&c.column_name), c.type_definition());
            if c.is_static {
                def.push_str(" static");
            }
            def
        })
        .collect();

    let partition: Vec<String> = poco
        .partition_keys()
        .iter()
        .map(|c| escape(&c.column_name))
        .collect();
    let clustering = poco.clustering_keys();

    let mut key_parts = vec![if partition.len() > 1 {
        format!("({})", partition.join(", "))
    } else {
        partition.join(", ")
    }];
    key_parts.extend(clustering.iter().map(|(c, _)| escape(&c.column_name)));
    defs.push(format!("PRIMARY KEY ({})", key_parts.join(", ")));

    let mut cql = String::from("CREATE TABLE ");
    if if_not_exists {
        cql.push_str("IF NOT EXISTS ");
    }
    cql.push_str(&format!("{} ({})", table_name, defs.join(", ")));

    let mut with = Vec::new();
    if !clustering.is_empty() {
        let order: Vec<String> = clustering
            .iter()
            .map(|(c, order)| format!("{} {}", escape(&c.column_name), order))
            .collect();
        with.push(format!("CLUSTERING ORDER BY ({})", order.join(", ")));
    }
    if poco.compact_storage {
        with.push("COMPACT STORAGE".to_string());
    }
    if !with.is_empty() {
        cql.push_str(" WITH ");
        cql.push_str(&with.join(" AND "));
    }

    let mut statements = vec![cql];
    for column in poco.columns.iter().filter(|c| c.secondary_index) {
        let mut index = String::from("CREATE INDEX ");
        if if_not_exists {
            index.push_str("IF NOT EXISTS ");
        }
        index.push_str(&format!("ON {} ({})", table_name, escape(&column.column_name)));
        statements.push(index);
    }

    tracing::debug!(
        "Generated {} DDL statements for {}",
        statements.len(),
        poco.type_name
    );
    Ok(statements)
}

fn validate(poco: &PocoData) -> CqlResult<()> {
    if !poco.missing_primary_key_columns.is_empty() {
        return Err(CqlError::Mapping(format!(
            "{} names primary key columns that are not mapped: {}",
            poco.type_name,
            poco.missing_primary_key_columns.join(", ")
        )));
    }
    if poco.partition_keys().is_empty() {
        return Err(CqlError::Mapping(format!(
            "{} has no partition key",
            poco.type_name
        )));
    }

    for column in &poco.columns {
        validate_column(poco, column)?;
    }
    Ok(())
}

fn validate_column(poco: &PocoData, column: &PocoColumn) -> CqlResult<()> {
    let is_key = poco.is_primary_key(column);
    if column.is_counter {
        if !column.column_type.is_counter_compatible() {
            return Err(CqlError::InvalidType(format!(
                "counter column '{}' must be bigint, found {}",
                column.column_name, column.column_type
            )));
        }
        if is_key {
            return Err(CqlError::Mapping(format!(
                "counter column '{}' cannot be part of the primary key",
                column.column_name
            )));
        }
    }
    if column.is_static && is_key {
        return Err(CqlError::Mapping(format!(
            "static column '{}' cannot be part of the primary key",
            column.column_name
        )));
    }
    Ok(())
}
