use chrono::{DateTime, Utc};

use crate::ast::Value;
use crate::error::{CqlError, CqlResult};
use crate::query::{CqlCommand, Mutation};
use crate::session::Statement;
use crate::transpiler::{ParamContext, ParamMode};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchType {
    #[default]
    Logged,
    Unlogged,
    Counter,
}

/// Several commands sent as one BATCH statement.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    batch_type: BatchType,
    timestamp: Option<DateTime<Utc>>,
    /// Compiled statement and its inline rendering.
    entries: Vec<(Statement, String)>,
}

impl Batch {
    pub fn new(batch_type: BatchType) -> Self {
        Self {
            batch_type,
            ..Self::default()
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Compile `command` and add it to the batch.
    pub fn append<C: Mutation>(&mut self, command: &C) -> CqlResult<&mut Self> {
        let statement = command.statement()?;
        let inline = command.to_cql_string()?;
        self.entries.push((statement, inline));
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn render<'a>(
        &self,
        mut params: ParamContext,
        bodies: impl Iterator<Item = &'a str>,
    ) -> CqlResult<Statement> {
        if self.is_empty() {
            return Err(CqlError::InvalidArgument("batch has no statements".into()));
        }

        let mut cql = String::from("BEGIN ");
        match self.batch_type {
            BatchType::Logged => {}
            BatchType::Unlogged => cql.push_str("UNLOGGED "),
            BatchType::Counter => cql.push_str("COUNTER "),
        }
        cql.push_str("BATCH");
        if let Some(ts) = self.timestamp {
            cql.push_str(" USING TIMESTAMP ");
            cql.push_str(&params.add_param(Value::BigInt(ts.timestamp_micros())));
        }
        cql.push(' ');
        for body in bodies {
            cql.push_str(body);
            cql.push_str("; ");
        }
        cql.push_str("APPLY BATCH");
        Ok(Statement::new(cql, params.into_params()))
    }
}

impl CqlCommand for Batch {
    fn statement(&self) -> CqlResult<Statement> {
        let mut statement = self.render(
            ParamContext::new(ParamMode::Placeholder),
            self.entries.iter().map(|(s, _)| s.cql.as_str()),
        )?;
        for (entry, _) in &self.entries {
            statement.params.extend(entry.params.iter().cloned());
        }
        tracing::debug!(
            "Compiled batch of {} statements ({} params)",
            self.entries.len(),
            statement.params.len()
        );
        Ok(statement)
    }

    fn to_cql_string(&self) -> CqlResult<String> {
        let statement = self.render(
            ParamContext::new(ParamMode::Inline),
            self.entries.iter().map(|(_, inline)| inline.as_str()),
        )?;
        Ok(statement.cql)
    }
}
