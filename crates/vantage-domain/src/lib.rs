//! Vantage Domain Layer
//!
//! This crate contains the entity-relationship graph model that every
//! investigation accumulates into, plus the trait boundaries for the
//! collaborators around it. It performs no I/O.
//!
//! ## Key Concepts
//!
//! - **Entity**: a single discovered fact, deduplicated on `(type, value)`
//! - **Relationship**: a directed, typed, confidence-weighted edge
//! - **Investigation**: the aggregate holding entities, relationships,
//!   lifecycle status and the provider audit trail
//! - **Provider**: a lookup source that extends the graph from a seed entity
//!
//! ## Architecture
//!
//! - Pure domain logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod audit;
pub mod entity;
pub mod entity_type;
pub mod error;
pub mod id;
pub mod investigation;
pub mod metadata;
pub mod relationship;
pub mod traits;
pub mod writer;

// Re-exports for convenience
pub use audit::{ProviderOutcome, ProviderRun};
pub use entity::{clamp_confidence, Entity, USER_INPUT_SOURCE};
pub use entity_type::EntityType;
pub use error::{GraphError, ProviderError};
pub use id::Id;
pub use investigation::{Investigation, InvestigationStatus};
pub use metadata::{Metadata, MetadataValue};
pub use relationship::Relationship;
pub use traits::{InvestigationListing, InvestigationStore, Provider, ProviderMetadata};
pub use writer::GraphWriter;
