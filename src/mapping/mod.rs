//! Entity-to-table mapping model.

pub mod column;
pub mod config;
pub mod definition;
pub mod map;
pub mod poco;
pub mod registry;
pub mod types;

pub use column::{MemberInfo, PocoColumn, SortOrder};
pub use config::{ClusteringKeyConfig, ColumnConfig, MappingConfig, TableConfig};
pub use definition::{ColumnDefinition, DefaultDefinition, Entity, TypeDefinition};
pub use map::{ColumnMap, Map};
pub use poco::{PocoData, PocoDataFactory};
pub use registry::MappingConfiguration;
pub use types::{CqlType, parse_cql_type};
