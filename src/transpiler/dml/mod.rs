//! DML (Data Manipulation Language) CQL generation.
//!
//! Each assembler appends parameters in the order their placeholders appear
//! in the statement text.

pub mod count;
pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

pub use count::build_count;
pub use delete::{DeleteOptions, build_delete};
pub use insert::{InsertOptions, build_insert};
pub use select::build_select;
pub use update::{UpdateOptions, build_update};

use chrono::{DateTime, Utc};

use crate::ast::Value;
use crate::mapping::PocoData;
use crate::transpiler::escape::escape_identifier;
use crate::transpiler::params::{Clause, ParamContext};

/// Every mapped column, escaped, in declaration order.
pub(crate) fn all_columns(poco: &PocoData) -> String {
    poco.columns
        .iter()
        .map(|c| escape_identifier(&c.column_name, poco.case_sensitive))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn push_clause(
    cql: &mut String,
    params: &mut ParamContext,
    keyword: &str,
    clause: &Clause,
) {
    if clause.is_empty() {
        return;
    }
    cql.push_str(keyword);
    cql.push_str(&clause.text);
    params.extend(&clause.params);
}

/// ` USING TTL ? AND TIMESTAMP ?`, either part optional.
pub(crate) fn push_using(
    cql: &mut String,
    params: &mut ParamContext,
    ttl: Option<i32>,
    timestamp: Option<DateTime<Utc>>,
) {
    let mut options = Vec::new();
    if let Some(ttl) = ttl {
        options.push(format!("TTL {}", params.add_param(Value::Int(ttl))));
    }
    if let Some(ts) = timestamp {
        // Microseconds since the epoch
        let micros = Value::BigInt(ts.timestamp_micros());
        options.push(format!("TIMESTAMP {}", params.add_param(micros)));
    }
    if !options.is_empty() {
        cql.push_str(" USING ");
        cql.push_str(&options.join(" AND "));
    }
}
