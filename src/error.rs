//! Error types for cqlinq.

use thiserror::Error;

use crate::transpiler::ParsePhase;

/// The main error type for compiling and executing mapped queries.
#[derive(Debug, Error)]
pub enum CqlError {
    /// A node shape appeared in a parse phase that cannot translate it.
    #[error("Unsupported expression in {phase} phase: {node}")]
    UnsupportedExpression { node: String, phase: ParsePhase },

    /// The mapping does not allow the requested operation on a member.
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Two statement options cannot be combined.
    #[error("Conflicting statement options: {0}")]
    Conflict(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Constant folding of a host-side sub-expression failed.
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("Invalid type: {0}")]
    InvalidType(String),

    /// Failed to parse a CQL type string.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    /// Reported by a session implementation.
    #[error("Execution error: {0}")]
    Execution(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CqlError {
    /// Create an unsupported-expression error for `node` seen in `phase`.
    pub fn unsupported(node: impl std::fmt::Display, phase: ParsePhase) -> Self {
        Self::UnsupportedExpression {
            node: node.to_string(),
            phase,
        }
    }

    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }
}

/// Result type alias for cqlinq operations.
pub type CqlResult<T> = Result<T, CqlError>;
