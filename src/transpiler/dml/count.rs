//! SELECT count(*) CQL generation.

use crate::ast::Value;
use crate::mapping::PocoData;
use crate::session::Statement;
use crate::transpiler::dml::push_clause;
use crate::transpiler::params::ParamContext;
use crate::transpiler::visitor::QueryParts;

/// Generate a row count query.
pub fn build_count(parts: &QueryParts, poco: &PocoData) -> Statement {
    let mut params = ParamContext::new(parts.mode);
    let mut cql = format!("SELECT count(*) FROM {}", parts.table);

    push_clause(&mut cql, &mut params, " WHERE ", &parts.where_clause);

    if let Some(limit) = parts.limit {
        cql.push_str(" LIMIT ");
        cql.push_str(&params.add_param(Value::Int(limit)));
    }

    if parts.allow_filtering || poco.allow_filtering {
        cql.push_str(" ALLOW FILTERING");
    }

    Statement::new(cql, params.into_params())
}
