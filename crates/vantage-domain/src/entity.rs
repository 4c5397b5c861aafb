//! Entity module - a single discovered fact

use crate::id::{now_millis, Id};
use crate::metadata::{Metadata, MetadataValue};
use crate::EntityType;
use serde::{Deserialize, Serialize};

/// Provider name recorded on the seed entity built from the caller's query
pub const USER_INPUT_SOURCE: &str = "user_input";

/// A single artifact discovered during an investigation.
///
/// Identity for deduplication is `(entity_type, value)`. Values are compared
/// exactly as supplied, so providers normalize before inserting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier
    pub id: Id,

    /// Semantic kind
    pub entity_type: EntityType,

    /// The discovered value (e.g. an address, a hostname)
    pub value: String,

    /// Name of the provider that produced it
    pub source_provider: String,

    /// Confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Provider-defined details
    pub metadata: Metadata,

    /// Creation time, milliseconds since the Unix epoch
    pub created_at: u64,
}

impl Entity {
    /// Create an entity with full confidence and empty metadata
    ///
    /// # Examples
    ///
    /// ```
    /// use vantage_domain::{Entity, EntityType};
    ///
    /// let e = Entity::new(EntityType::Domain, "example.com", "Email Enrichment")
    ///     .with_confidence(0.8)
    ///     .with_metadata("derived_from", "alice@example.com");
    /// assert_eq!(e.confidence, 0.8);
    /// assert_eq!(e.metadata["derived_from"].as_str(), Some("alice@example.com"));
    /// ```
    pub fn new(
        entity_type: EntityType,
        value: impl Into<String>,
        source_provider: impl Into<String>,
    ) -> Self {
        Self {
            id: Id::new(),
            entity_type,
            value: value.into(),
            source_provider: source_provider.into(),
            confidence: 1.0,
            metadata: Metadata::new(),
            created_at: now_millis(),
        }
    }

    /// Set the confidence, clamped to [0.0, 1.0]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = clamp_confidence(confidence);
        self
    }

    /// Add one metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Replace the metadata map
    pub fn with_metadata_map(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Deduplication key
    pub fn key(&self) -> (EntityType, &str) {
        (self.entity_type, &self.value)
    }
}

/// Clamp a confidence into [0.0, 1.0]; NaN becomes 0.0
pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}
