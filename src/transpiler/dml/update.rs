//! UPDATE CQL generation.

use chrono::{DateTime, Utc};

use crate::error::{CqlError, CqlResult};
use crate::session::Statement;
use crate::transpiler::dml::{push_clause, push_using};
use crate::transpiler::params::ParamContext;
use crate::transpiler::visitor::QueryParts;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UpdateOptions {
    /// Seconds.
    pub ttl: Option<i32>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Generate UPDATE CQL.
///
/// Parameters bind in clause order: TTL, TIMESTAMP, SET values, WHERE, IF.
pub fn build_update(parts: &QueryParts, options: &UpdateOptions) -> CqlResult<Statement> {
    if parts.projections.is_empty() {
        return Err(CqlError::Conflict("Nothing to update".into()));
    }

    let mut params = ParamContext::new(parts.mode);
    let mut cql = format!("UPDATE {}", parts.table);
    push_using(&mut cql, &mut params, options.ttl, options.timestamp);

    let assignments: Vec<String> = parts
        .projections
        .iter()
        .map(|p| {
            let value = params.add_param(p.value.clone());
            p.render(&value)
        })
        .collect();
    cql.push_str(" SET ");
    cql.push_str(&assignments.join(", "));

    push_clause(&mut cql, &mut params, " WHERE ", &parts.where_clause);
    push_clause(&mut cql, &mut params, " IF ", &parts.update_if);

    Ok(Statement::new(cql, params.into_params()))
}
