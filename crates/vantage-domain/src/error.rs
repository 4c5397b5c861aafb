//! Domain error types

use thiserror::Error;

/// Errors raised by the entity graph and its value types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// Lifecycle transition that would move the investigation backwards
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// String does not name a known entity type
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    /// String does not name a known investigation status
    #[error("Unknown investigation status: {0}")]
    UnknownStatus(String),

    /// Malformed identifier
    #[error("Invalid id: {0}")]
    InvalidId(String),
}

/// Failure of a single provider's `execute` call.
///
/// Contained by the orchestrator and recorded in the audit trail; it never
/// aborts an investigation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// A credential the provider needs is not configured
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Upstream service unreachable or returned an unusable answer
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Upstream service rejected the request for rate reasons
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Seed entity cannot be processed by this provider
    #[error("Invalid seed '{value}': {reason}")]
    InvalidSeed {
        /// Seed value as received
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// Any other failure
    #[error("{0}")]
    Failed(String),

    /// Provider panicked during execution
    #[error("Provider panicked: {0}")]
    Panicked(String),
}
