//! Relationship module - directed, typed edges between entities

use crate::entity::clamp_confidence;
use crate::id::Id;
use crate::metadata::Metadata;
use serde::{Deserialize, Serialize};

/// A directed edge between two entities.
///
/// The type tag is free-form (e.g. `"domain_resolves_to"`). Parallel edges
/// with the same endpoints and tag are allowed: each records one provider's
/// independent assertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Unique identifier
    pub id: Id,

    /// Source entity ID
    pub source_entity_id: Id,

    /// Target entity ID
    pub target_entity_id: Id,

    /// Type tag
    pub relationship_type: String,

    /// Confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Supporting details
    pub evidence: Metadata,
}

impl Relationship {
    /// Create a new relationship; confidence is clamped to [0.0, 1.0]
    pub fn new(
        source_entity_id: Id,
        target_entity_id: Id,
        relationship_type: impl Into<String>,
        confidence: f64,
        evidence: Metadata,
    ) -> Self {
        Self {
            id: Id::new(),
            source_entity_id,
            target_entity_id,
            relationship_type: relationship_type.into(),
            confidence: clamp_confidence(confidence),
            evidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_relationship() {
        let a = Id::new();
        let b = Id::new();
        let rel = Relationship::new(a, b, "email_hosted_on", 2.0, Metadata::new());

        assert_eq!(rel.source_entity_id, a);
        assert_eq!(rel.target_entity_id, b);
        assert_eq!(rel.relationship_type, "email_hosted_on");
        assert_eq!(rel.confidence, 1.0);
    }
}
