//! INSERT CQL generation.

use chrono::{DateTime, Utc};

use crate::ast::Value;
use crate::error::{CqlError, CqlResult};
use crate::mapping::PocoData;
use crate::session::Statement;
use crate::transpiler::dml::push_using;
use crate::transpiler::escape::escape_identifier;
use crate::transpiler::params::{ParamContext, ParamMode};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InsertOptions {
    pub if_not_exists: bool,
    /// Seconds.
    pub ttl: Option<i32>,
    pub timestamp: Option<DateTime<Utc>>,
    /// Write `null` for absent values instead of leaving the column out.
    pub insert_nulls: bool,
}

/// Generate INSERT CQL.
///
/// `values` holds one value per mapped column, in column order.
pub fn build_insert(
    poco: &PocoData,
    table: &str,
    values: &[Value],
    options: &InsertOptions,
    mode: ParamMode,
) -> CqlResult<Statement> {
    if values.len() != poco.columns.len() {
        return Err(CqlError::InvalidArgument(format!(
            "expected {} values for {}, got {}",
            poco.columns.len(),
            poco.type_name,
            values.len()
        )));
    }

    let mut params = ParamContext::new(mode);
    let mut columns = Vec::new();
    let mut placeholders = Vec::new();

    for (column, value) in poco.columns.iter().zip(values) {
        if column.is_counter {
            if !value.is_null() {
                return Err(CqlError::Mapping(format!(
                    "counter column '{}' cannot be inserted, update it instead",
                    column.column_name
                )));
            }
            continue;
        }
        if value.is_null() && !options.insert_nulls {
            continue;
        }
        columns.push(escape_identifier(&column.column_name, poco.case_sensitive));
        placeholders.push(params.add_param(value.clone()));
    }

    if columns.is_empty() {
        return Err(CqlError::InvalidArgument(format!(
            "no values to insert into {}",
            table
        )));
    }

    let mut cql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders.join(", ")
    );
    if options.if_not_exists {
        cql.push_str(" IF NOT EXISTS");
    }
    push_using(&mut cql, &mut params, options.ttl, options.timestamp);

    Ok(Statement::new(cql, params.into_params()))
}
