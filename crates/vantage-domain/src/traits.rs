//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the entity graph and the
//! collaborators around it: lookup providers feed it, stores persist it.

use crate::error::ProviderError;
use crate::investigation::{Investigation, InvestigationStatus};
use crate::{Entity, EntityType, Id};
use serde::Serialize;

/// A lookup provider.
///
/// Given a seed entity, a provider discovers related facts and appends them
/// to the investigation graph. It may annotate the seed through
/// [`Investigation::merge_metadata`]. Providers that fan work out to several
/// threads must serialize their writes, e.g. through
/// [`GraphWriter`](crate::GraphWriter).
pub trait Provider: Send + Sync {
    /// Unique display name; also used for filtering and the audit trail
    fn name(&self) -> &str;

    /// One-line description
    fn description(&self) -> &str;

    /// Entity types this provider accepts as a seed
    fn supported_types(&self) -> &[EntityType];

    /// Whether a credential must be configured for this provider
    fn requires_credential(&self) -> bool {
        false
    }

    /// Display icon name
    fn icon(&self) -> &str {
        "search"
    }

    /// Whether this provider accepts seeds of `entity_type`
    fn supports(&self, entity_type: EntityType) -> bool {
        self.supported_types().contains(&entity_type)
    }

    /// Run the lookup; returns the entities discovered by this call
    fn execute(
        &self,
        seed: &Entity,
        graph: &mut Investigation,
    ) -> Result<Vec<Entity>, ProviderError>;

    /// Introspection record for UIs
    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: self.name().to_string(),
            description: self.description().to_string(),
            supported_types: self.supported_types().to_vec(),
            requires_credential: self.requires_credential(),
            icon: self.icon().to_string(),
        }
    }
}

/// Read-only description of a registered provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderMetadata {
    /// Provider name
    pub name: String,
    /// One-line description
    pub description: String,
    /// Accepted seed types
    pub supported_types: Vec<EntityType>,
    /// Whether a credential is needed
    pub requires_credential: bool,
    /// Display icon name
    pub icon: String,
}

/// Trait for persisting finished investigations
///
/// Implemented by the infrastructure layer (vantage-store)
pub trait InvestigationStore {
    /// Error type for store operations
    type Error;

    /// Save an investigation, replacing any earlier copy with the same id
    fn save(&mut self, investigation: &Investigation) -> Result<(), Self::Error>;

    /// Load a full investigation; fails with a not-found error if absent
    fn load(&self, id: Id) -> Result<Investigation, Self::Error>;

    /// Most recent investigations first
    fn list(&self, limit: usize) -> Result<Vec<InvestigationListing>, Self::Error>;

    /// Delete an investigation and everything it contains
    fn delete(&mut self, id: Id) -> Result<(), Self::Error>;
}

/// Summary row returned by [`InvestigationStore::list`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestigationListing {
    /// Investigation id
    pub id: Id,
    /// Normalized query
    pub initial_query: String,
    /// Resolved query type
    pub initial_type: EntityType,
    /// Lifecycle status
    #[serde(serialize_with = "serialize_status")]
    pub status: InvestigationStatus,
    /// Number of entities
    pub entity_count: usize,
    /// Creation time (ms since epoch)
    pub created_at: u64,
    /// Completion time (ms since epoch)
    pub completed_at: Option<u64>,
}

fn serialize_status<S: serde::Serializer>(
    status: &InvestigationStatus,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(status.as_str())
}
