//! DELETE CQL generation.

use chrono::{DateTime, Utc};

use crate::error::{CqlError, CqlResult};
use crate::session::Statement;
use crate::transpiler::dml::{push_clause, push_using};
use crate::transpiler::params::ParamContext;
use crate::transpiler::visitor::QueryParts;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeleteOptions {
    pub timestamp: Option<DateTime<Utc>>,
    pub if_exists: bool,
}

/// Generate DELETE CQL. Only whole rows are deleted.
pub fn build_delete(parts: &QueryParts, options: &DeleteOptions) -> CqlResult<Statement> {
    if !parts.select_fields.is_empty() || !parts.projections.is_empty() {
        return Err(CqlError::Conflict(
            "Delete removes whole rows; a column projection cannot be deleted".into(),
        ));
    }
    if options.if_exists && !parts.update_if.is_empty() {
        return Err(CqlError::Conflict(
            "IF EXISTS and IF conditions cannot be combined in one DELETE".into(),
        ));
    }

    let mut params = ParamContext::new(parts.mode);
    let mut cql = format!("DELETE FROM {}", parts.table);
    push_using(&mut cql, &mut params, None, options.timestamp);
    push_clause(&mut cql, &mut params, " WHERE ", &parts.where_clause);

    if options.if_exists {
        cql.push_str(" IF EXISTS");
    } else {
        push_clause(&mut cql, &mut params, " IF ", &parts.update_if);
    }

    Ok(Statement::new(cql, params.into_params()))
}
