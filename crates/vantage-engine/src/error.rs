//! Engine error types

use thiserror::Error;
use vantage_domain::{EntityType, GraphError};

/// The query could not be turned into a typed, normalized seed.
///
/// Raised before any investigation exists; nothing has been mutated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Caller named a type that does not exist
    #[error("Unknown entity type: {0}")]
    UnknownType(String),

    /// Auto-detection matched no type
    #[error("Could not auto-detect entity type for: {0}. Please specify the entity type.")]
    UndetectedType(String),

    /// Value fails the format check for its type
    #[error("Invalid {entity_type}: {value}")]
    InvalidValue {
        /// Type the value was checked against
        entity_type: EntityType,
        /// Value as supplied
        value: String,
    },
}

/// Errors returned by [`Engine::investigate`](crate::Engine::investigate)
#[derive(Error, Debug)]
pub enum EngineError {
    /// Query rejected before an investigation was created
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Graph lifecycle violation
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}
