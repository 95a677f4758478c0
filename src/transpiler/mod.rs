//! Expression-to-CQL transpiler.
//!
//! The visitor walks a query expression once and collects clause fragments
//! into [`QueryParts`]; the `dml` assemblers turn those into a [`Statement`]
//! whose parameters follow the left-to-right order of its `?` placeholders.
//!
//! [`Statement`]: crate::session::Statement

pub mod ddl;
pub mod dml;
pub mod escape;
pub mod params;
pub mod visitor;

#[cfg(test)]
mod tests;

pub use ddl::create_table;
pub use dml::{DeleteOptions, InsertOptions, UpdateOptions};
pub use escape::{escape_identifier, qualified_name};
pub use params::{Clause, ParamContext, ParamMode};
pub use visitor::{CqlExpressionVisitor, Projection, ProjectionKind, QueryKind, QueryParts};

/// How the visitor interprets the node it is looking at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParsePhase {
    #[default]
    None,
    Select,
    Condition,
    /// Inside a projection body: members become columns, values become SET assignments.
    SelectBinding,
    Take,
    OrderBy,
    OrderByDescending,
    GroupBy,
}

impl std::fmt::Display for ParsePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
