use serde::{Deserialize, Serialize};

use crate::mapping::CqlType;

/// Clustering order of a clustering-key column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Ascending => write!(f, "ASC"),
            SortOrder::Descending => write!(f, "DESC"),
        }
    }
}

/// A field or property of a mapped entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub name: String,
    pub member_type: CqlType,
}

impl MemberInfo {
    pub fn new(name: impl Into<String>, member_type: CqlType) -> Self {
        Self {
            name: name.into(),
            member_type,
        }
    }
}

/// A mapped column of an entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PocoColumn {
    pub column_name: String,
    /// Type stored in the database; may differ from the member's type.
    pub column_type: CqlType,
    pub member: MemberInfo,
    pub is_counter: bool,
    pub is_static: bool,
    pub is_frozen: bool,
    pub has_frozen_key: bool,
    pub has_frozen_value: bool,
    pub secondary_index: bool,
}

impl PocoColumn {
    pub fn member_name(&self) -> &str {
        &self.member.name
    }

    /// Type text for a column definition, with frozen markers applied.
    pub fn type_definition(&self) -> CqlType {
        if self.is_counter {
            return CqlType::Counter;
        }
        let mut ty = self.column_type.clone();
        if self.is_frozen {
            return ty.frozen();
        }
        if self.has_frozen_key {
            ty = ty.with_frozen_key();
        }
        if self.has_frozen_value {
            ty = ty.with_frozen_value();
        }
        ty
    }
}
