//! Recognised method calls.
//!
//! The fluent query surface tags every call node with one of these variants
//! when it composes the expression, so the compiler dispatches on a closed set
//! instead of method-name strings.

use std::sync::Arc;

use crate::ast::Value;
use crate::error::CqlResult;

type HostFnImpl = dyn Fn(&[Value]) -> CqlResult<Value> + Send + Sync;

/// A host-side function the compiler cannot translate to CQL.
///
/// Calls to it are folded to a bound value when every argument is free of the
/// row parameter.
#[derive(Clone)]
pub struct HostFn {
    name: String,
    func: Arc<HostFnImpl>,
}

impl HostFn {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> CqlResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> CqlResult<Value> {
        (self.func)(args)
    }
}

impl std::fmt::Debug for HostFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HostFn").field(&self.name).finish()
    }
}

impl PartialEq for HostFn {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.func, &other.func)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Method {
    // Query operators
    Where,
    Select,
    Take,
    OrderBy,
    ThenBy,
    OrderByDescending,
    ThenByDescending,
    GroupBy,
    UpdateIf,
    DeleteIf,
    AllowFiltering,
    First,
    FirstOrDefault,
    // Aggregates
    Min,
    Max,
    Average,
    Sum,
    Count,
    // Condition functions
    Contains,
    ContainsKey,
    StartsWith,
    CompareTo,
    Equals,
    Token,
    MaxTimeUuid,
    MinTimeUuid,
    // Update operators
    Append,
    Prepend,
    SubtractAssign,
    Host(HostFn),
}

impl Method {
    /// CQL function name for aggregate methods.
    pub fn aggregate_name(&self) -> Option<&'static str> {
        match self {
            Method::Min => Some("MIN"),
            Method::Max => Some("MAX"),
            Method::Average => Some("AVG"),
            Method::Sum => Some("SUM"),
            Method::Count => Some("COUNT"),
            _ => None,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Method::Where => "Where",
            Method::Select => "Select",
            Method::Take => "Take",
            Method::OrderBy => "OrderBy",
            Method::ThenBy => "ThenBy",
            Method::OrderByDescending => "OrderByDescending",
            Method::ThenByDescending => "ThenByDescending",
            Method::GroupBy => "GroupBy",
            Method::UpdateIf => "UpdateIf",
            Method::DeleteIf => "DeleteIf",
            Method::AllowFiltering => "AllowFiltering",
            Method::First => "First",
            Method::FirstOrDefault => "FirstOrDefault",
            Method::Min => "Min",
            Method::Max => "Max",
            Method::Average => "Average",
            Method::Sum => "Sum",
            Method::Count => "Count",
            Method::Contains => "Contains",
            Method::ContainsKey => "ContainsKey",
            Method::StartsWith => "StartsWith",
            Method::CompareTo => "CompareTo",
            Method::Equals => "Equals",
            Method::Token => "Token",
            Method::MaxTimeUuid => "MaxTimeUuid",
            Method::MinTimeUuid => "MinTimeUuid",
            Method::Append => "Append",
            Method::Prepend => "Prepend",
            Method::SubtractAssign => "SubtractAssign",
            Method::Host(func) => func.name(),
        };
        write!(f, "{}", name)
    }
}
