//! SELECT CQL generation.

use crate::ast::Value;
use crate::mapping::PocoData;
use crate::session::Statement;
use crate::transpiler::dml::{all_columns, push_clause};
use crate::transpiler::params::ParamContext;
use crate::transpiler::visitor::QueryParts;

/// Generate SELECT CQL.
pub fn build_select(parts: &QueryParts, poco: &PocoData) -> Statement {
    let mut params = ParamContext::new(parts.mode);

    let fields = if parts.select_fields.is_empty() {
        all_columns(poco)
    } else {
        parts.select_fields.join(", ")
    };
    let mut cql = format!("SELECT {} FROM {}", fields, parts.table);

    push_clause(&mut cql, &mut params, " WHERE ", &parts.where_clause);

    if !parts.group_by.is_empty() {
        cql.push_str(" GROUP BY ");
        cql.push_str(&parts.group_by.join(", "));
    }

    if !parts.order_by.is_empty() {
        let order: Vec<String> = parts
            .order_by
            .iter()
            .map(|(column, ascending)| {
                if *ascending {
                    column.clone()
                } else {
                    format!("{} DESC", column)
                }
            })
            .collect();
        cql.push_str(" ORDER BY ");
        cql.push_str(&order.join(", "));
    }

    if let Some(limit) = parts.limit {
        cql.push_str(" LIMIT ");
        cql.push_str(&params.add_param(Value::Int(limit)));
    }

    if parts.allow_filtering || poco.allow_filtering {
        cql.push_str(" ALLOW FILTERING");
    }

    Statement::new(cql, params.into_params())
}
