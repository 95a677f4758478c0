//! # cqlinq
//!
//! > **Typed expression trees in, CQL statements and bound values out.**
//!
//! cqlinq maps entity types onto Cassandra tables and compiles query
//! expressions over them into CQL text plus the values for its `?`
//! placeholders, in placeholder order.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use cqlinq::prelude::*;
//!
//! let config = MappingConfiguration::new();
//! config.define(Map::<Person>::new().table_name("person").partition_key(["id"]));
//!
//! let people = Table::<Person>::new(&config)?;
//! let statement = people
//!     .filter(eq(member("id"), lit(5)))
//!     .select(member("name"))
//!     .statement()?;
//! // => "SELECT name FROM person WHERE id = ?" with [5]
//! ```
//!
//! ## Pipeline
//!
//! | Stage       | Module        | Output                        |
//! |-------------|---------------|-------------------------------|
//! | Mapping     | `mapping`     | `PocoData` per entity type    |
//! | Composition | `query`, `ast`| expression tree               |
//! | Compilation | `transpiler`  | `Statement { cql, params }`   |
//! | Execution   | `session`     | supplied by the application   |

pub mod ast;
pub mod error;
pub mod mapping;
pub mod query;
pub mod session;
pub mod transpiler;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub mod prelude {
    pub use crate::ast::builders::*;
    pub use crate::ast::{Expr, Method, Value};
    pub use crate::error::*;
    pub use crate::mapping::{
        CqlType, Entity, Map, MappingConfig, MappingConfiguration, MemberInfo, SortOrder,
    };
    pub use crate::query::{Batch, BatchType, CqlCommand, CqlQuery, Mutation, Table};
    pub use crate::session::{RowSet, Session, Statement};
}
