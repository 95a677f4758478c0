//! Fluent query surface.
//!
//! Every operator wraps the current expression in an [`Expr::Call`] node, so a
//! chain such as `table.filter(..).select(..).take(10)` builds the tree the
//! transpiler compiles once, when a statement is requested.
//!
//! [`Expr::Call`]: crate::ast::Expr::Call

pub mod batch;
pub mod command;
pub mod cql_query;
pub mod table;

pub use batch::{Batch, BatchType};
pub use command::{CqlCommand, CqlDelete, CqlInsert, CqlScalar, CqlUpdate, Mutation};
pub use cql_query::CqlQuery;
pub use table::Table;
