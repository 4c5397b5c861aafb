//! Investigation aggregate - the deduplicating entity graph and its lifecycle

use crate::audit::ProviderRun;
use crate::error::GraphError;
use crate::id::{now_millis, Id};
use crate::metadata::{merge_metadata, Metadata};
use crate::{Entity, EntityType, Relationship};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of an investigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvestigationStatus {
    /// Created, no provider has run yet
    Pending,
    /// Providers are executing
    Running,
    /// Finished normally
    Completed,
    /// Finished with a recorded failure reason
    Failed,
}

impl InvestigationStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestigationStatus::Pending => "pending",
            InvestigationStatus::Running => "running",
            InvestigationStatus::Completed => "completed",
            InvestigationStatus::Failed => "failed",
        }
    }

    /// Completed or failed
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InvestigationStatus::Completed | InvestigationStatus::Failed
        )
    }
}

impl fmt::Display for InvestigationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvestigationStatus {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvestigationStatus::Pending),
            "running" => Ok(InvestigationStatus::Running),
            "completed" => Ok(InvestigationStatus::Completed),
            "failed" => Ok(InvestigationStatus::Failed),
            _ => Err(GraphError::UnknownStatus(s.to_string())),
        }
    }
}

/// One investigation: the seed query, everything discovered from it, and
/// the audit trail of providers that ran.
///
/// Entities are only inserted through [`Investigation::add_entity`], which
/// guarantees that no two entities share a `(type, value)` pair. Nothing is
/// removed from a live investigation.
#[derive(Debug, Clone)]
pub struct Investigation {
    id: Id,
    initial_query: String,
    initial_type: EntityType,
    entities: Vec<Entity>,
    relationships: Vec<Relationship>,
    provider_runs: Vec<ProviderRun>,
    status: InvestigationStatus,
    notes: String,
    created_at: u64,
    completed_at: Option<u64>,
    index: HashMap<(EntityType, String), usize>,
}

impl Investigation {
    /// Create a pending investigation for a normalized query
    pub fn new(initial_query: impl Into<String>, initial_type: EntityType) -> Self {
        Self {
            id: Id::new(),
            initial_query: initial_query.into(),
            initial_type,
            entities: Vec::new(),
            relationships: Vec::new(),
            provider_runs: Vec::new(),
            status: InvestigationStatus::Pending,
            notes: String::new(),
            created_at: now_millis(),
            completed_at: None,
            index: HashMap::new(),
        }
    }

    /// Rebuild an investigation from persisted parts.
    ///
    /// Entities are taken as stored; if the stored list somehow holds
    /// duplicates the first occurrence wins the dedup index.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Id,
        initial_query: String,
        initial_type: EntityType,
        status: InvestigationStatus,
        notes: String,
        created_at: u64,
        completed_at: Option<u64>,
        entities: Vec<Entity>,
        relationships: Vec<Relationship>,
        provider_runs: Vec<ProviderRun>,
    ) -> Self {
        let mut index = HashMap::with_capacity(entities.len());
        for (pos, entity) in entities.iter().enumerate() {
            index
                .entry((entity.entity_type, entity.value.clone()))
                .or_insert(pos);
        }

        Self {
            id,
            initial_query,
            initial_type,
            entities,
            relationships,
            provider_runs,
            status,
            notes,
            created_at,
            completed_at,
            index,
        }
    }

    /// Insert an entity, deduplicating on `(type, value)`.
    ///
    /// On a hit the candidate's metadata is merged into the existing entity
    /// (candidate keys win) and the existing entity is returned with its id,
    /// confidence, source and creation time unchanged. Otherwise the
    /// candidate is appended and returned.
    pub fn add_entity(&mut self, candidate: Entity) -> &Entity {
        let key = (candidate.entity_type, candidate.value.clone());
        let existing = self.index.get(&key).copied();
        let pos = match existing {
            Some(pos) => {
                merge_metadata(&mut self.entities[pos].metadata, candidate.metadata);
                pos
            }
            None => {
                let pos = self.entities.len();
                self.entities.push(candidate);
                self.index.insert(key, pos);
                pos
            }
        };
        &self.entities[pos]
    }

    /// Append a relationship. Parallel edges are kept; endpoints are not checked.
    pub fn add_relationship(
        &mut self,
        source_id: Id,
        target_id: Id,
        relationship_type: impl Into<String>,
        confidence: f64,
        evidence: Metadata,
    ) -> &Relationship {
        self.relationships.push(Relationship::new(
            source_id,
            target_id,
            relationship_type,
            confidence,
            evidence,
        ));
        &self.relationships[self.relationships.len() - 1]
    }

    /// Merge metadata into an existing entity. Returns false if no entity has `id`.
    pub fn merge_metadata(&mut self, id: Id, metadata: Metadata) -> bool {
        match self.entities.iter_mut().find(|e| e.id == id) {
            Some(entity) => {
                merge_metadata(&mut entity.metadata, metadata);
                true
            }
            None => false,
        }
    }

    /// Append an entry to the audit trail
    pub fn record_run(&mut self, run: ProviderRun) {
        self.provider_runs.push(run);
    }

    /// Move from pending to running
    pub fn start(&mut self) -> Result<(), GraphError> {
        if self.status != InvestigationStatus::Pending {
            return Err(self.transition_error(InvestigationStatus::Running));
        }
        self.status = InvestigationStatus::Running;
        Ok(())
    }

    /// Terminal transition to completed; only valid while running
    pub fn complete(&mut self) -> Result<(), GraphError> {
        self.finish(InvestigationStatus::Completed)
    }

    /// Terminal transition to failed; `reason` is stored in the notes.
    /// Only valid while running.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), GraphError> {
        self.finish(InvestigationStatus::Failed)?;
        self.notes = reason.into();
        Ok(())
    }

    fn finish(&mut self, to: InvestigationStatus) -> Result<(), GraphError> {
        if self.status != InvestigationStatus::Running {
            return Err(self.transition_error(to));
        }
        self.status = to;
        self.completed_at = Some(now_millis());
        Ok(())
    }

    fn transition_error(&self, to: InvestigationStatus) -> GraphError {
        GraphError::InvalidTransition {
            from: self.status.to_string(),
            to: to.to_string(),
        }
    }

    /// Entities of one type, in insertion order
    pub fn entities_by_type(&self, entity_type: EntityType) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|e| e.entity_type == entity_type)
            .collect()
    }

    /// Look up an entity by id
    pub fn entity_by_id(&self, id: Id) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Look up an entity by its dedup key
    pub fn find_entity(&self, entity_type: EntityType, value: &str) -> Option<&Entity> {
        self.index
            .get(&(entity_type, value.to_string()))
            .map(|&pos| &self.entities[pos])
    }

    /// Investigation id
    pub fn id(&self) -> Id {
        self.id
    }

    /// Normalized query the investigation started from
    pub fn initial_query(&self) -> &str {
        &self.initial_query
    }

    /// Resolved type of the query
    pub fn initial_type(&self) -> EntityType {
        self.initial_type
    }

    /// All entities, in insertion order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// All relationships, in insertion order
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Structured audit trail
    pub fn provider_runs(&self) -> &[ProviderRun] {
        &self.provider_runs
    }

    /// Audit trail as strings: provider names, with `" (FAILED)"` on failures
    pub fn providers_run(&self) -> Vec<String> {
        self.provider_runs.iter().map(ProviderRun::audit_label).collect()
    }

    /// Current status
    pub fn status(&self) -> InvestigationStatus {
        self.status
    }

    /// Free-form notes (failure reason on failed investigations)
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Creation time, milliseconds since the Unix epoch
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Time of the terminal transition, if any
    pub fn completed_at(&self) -> Option<u64> {
        self.completed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MetadataValue;

    fn inv() -> Investigation {
        Investigation::new("example.com", EntityType::Domain)
    }

    #[test]
    fn test_add_entity_appends_new() {
        let mut inv = inv();
        let id = inv
            .add_entity(Entity::new(EntityType::Domain, "example.com", "user_input"))
            .id;
        inv.add_entity(Entity::new(EntityType::IpAddress, "93.184.216.34", "dns"));

        assert_eq!(inv.entities().len(), 2);
        assert_eq!(inv.entities()[0].id, id);
    }

    #[test]
    fn test_add_entity_dedup_merges_metadata() {
        let mut inv = inv();
        let first = Entity::new(EntityType::IpAddress, "1.2.3.4", "A")
            .with_confidence(0.9)
            .with_metadata("record_type", "A")
            .with_metadata("ttl", 300i64);
        let first_id = first.id;
        let first_created = first.created_at;
        inv.add_entity(first);

        let second = Entity::new(EntityType::IpAddress, "1.2.3.4", "B")
            .with_confidence(0.1)
            .with_metadata("ttl", 60i64)
            .with_metadata("asn", "AS15133");
        let merged = inv.add_entity(second).clone();

        assert_eq!(inv.entities().len(), 1);
        assert_eq!(merged.id, first_id);
        assert_eq!(merged.confidence, 0.9);
        assert_eq!(merged.source_provider, "A");
        assert_eq!(merged.created_at, first_created);
        assert_eq!(merged.metadata.len(), 3);
        assert_eq!(merged.metadata["ttl"], MetadataValue::Number(60.0));
        assert_eq!(merged.metadata["asn"].as_str(), Some("AS15133"));
    }

    #[test]
    fn test_same_value_different_type_is_distinct() {
        let mut inv = inv();
        inv.add_entity(Entity::new(EntityType::Username, "example", "p"));
        inv.add_entity(Entity::new(EntityType::Person, "example", "p"));
        assert_eq!(inv.entities().len(), 2);
    }

    #[test]
    fn test_value_compared_exactly() {
        let mut inv = inv();
        inv.add_entity(Entity::new(EntityType::Domain, "Example.com", "p"));
        inv.add_entity(Entity::new(EntityType::Domain, "example.com", "p"));
        assert_eq!(inv.entities().len(), 2);
    }

    #[test]
    fn test_parallel_relationships_are_kept() {
        let mut inv = inv();
        let a = inv.add_entity(Entity::new(EntityType::Domain, "a.com", "p")).id;
        let b = inv.add_entity(Entity::new(EntityType::IpAddress, "1.1.1.1", "p")).id;

        let r1 = inv.add_relationship(a, b, "domain_resolves_to", 0.9, Metadata::new()).id;
        let r2 = inv.add_relationship(a, b, "domain_resolves_to", 0.9, Metadata::new()).id;

        assert_eq!(inv.relationships().len(), 2);
        assert_ne!(r1, r2);
    }

    #[test]
    fn test_dangling_relationship_is_accepted() {
        let mut inv = inv();
        inv.add_relationship(Id::new(), Id::new(), "mystery", 0.5, Metadata::new());
        assert_eq!(inv.relationships().len(), 1);
    }

    #[test]
    fn test_lifecycle_forward_only() {
        let mut inv = inv();
        assert_eq!(inv.status(), InvestigationStatus::Pending);
        assert!(inv.completed_at().is_none());

        inv.start().unwrap();
        assert_eq!(inv.status(), InvestigationStatus::Running);
        assert!(inv.start().is_err());

        inv.complete().unwrap();
        let done_at = inv.completed_at();
        assert!(done_at.is_some());

        assert!(inv.complete().is_err());
        assert!(inv.fail("late").is_err());
        assert_eq!(inv.status(), InvestigationStatus::Completed);
        assert_eq!(inv.completed_at(), done_at);
        assert!(inv.notes().is_empty());
    }

    #[test]
    fn test_pending_cannot_finish() {
        let mut inv = inv();

        let err = inv.complete().unwrap_err();
        assert_eq!(
            err,
            GraphError::InvalidTransition {
                from: "pending".to_string(),
                to: "completed".to_string(),
            }
        );
        assert!(inv.fail("never started").is_err());

        assert_eq!(inv.status(), InvestigationStatus::Pending);
        assert!(inv.completed_at().is_none());
        assert!(inv.notes().is_empty());
    }

    #[test]
    fn test_fail_records_reason() {
        let mut inv = inv();
        inv.start().unwrap();
        inv.fail("storage offline").unwrap();

        assert_eq!(inv.status(), InvestigationStatus::Failed);
        assert_eq!(inv.notes(), "storage offline");
        assert!(inv.completed_at().is_some());
    }

    #[test]
    fn test_query_helpers() {
        let mut inv = inv();
        let d = inv.add_entity(Entity::new(EntityType::Domain, "a.com", "p")).id;
        inv.add_entity(Entity::new(EntityType::IpAddress, "1.1.1.1", "p"));
        inv.add_entity(Entity::new(EntityType::IpAddress, "2.2.2.2", "p"));

        assert_eq!(inv.entities_by_type(EntityType::IpAddress).len(), 2);
        assert!(inv.entities_by_type(EntityType::Hash).is_empty());
        assert_eq!(inv.entity_by_id(d).map(|e| e.value.as_str()), Some("a.com"));
        assert!(inv.entity_by_id(Id::new()).is_none());
        assert!(inv.find_entity(EntityType::IpAddress, "2.2.2.2").is_some());
    }

    #[test]
    fn test_merge_metadata_by_id() {
        let mut inv = inv();
        let id = inv.add_entity(Entity::new(EntityType::Domain, "a.com", "p")).id;

        let mut meta = Metadata::new();
        meta.insert("registrar".into(), "Example Registrar".into());
        assert!(inv.merge_metadata(id, meta.clone()));
        assert!(!inv.merge_metadata(Id::new(), meta));
        assert_eq!(
            inv.entity_by_id(id).unwrap().metadata["registrar"].as_str(),
            Some("Example Registrar")
        );
    }

    #[test]
    fn test_restore_rebuilds_index() {
        let e = Entity::new(EntityType::Email, "a@b.com", "user_input");
        let mut restored = Investigation::restore(
            Id::new(),
            "a@b.com".into(),
            EntityType::Email,
            InvestigationStatus::Completed,
            String::new(),
            1,
            Some(2),
            vec![e.clone()],
            Vec::new(),
            vec![ProviderRun::succeeded("Email Enrichment", 0, 3)],
        );

        restored.add_entity(Entity::new(EntityType::Email, "a@b.com", "again"));
        assert_eq!(restored.entities().len(), 1);
        assert_eq!(restored.entities()[0].id, e.id);
        assert_eq!(restored.providers_run(), vec!["Email Enrichment".to_string()]);
    }

    #[test]
    fn test_status_parse() {
        for s in ["pending", "running", "completed", "failed"] {
            assert_eq!(s.parse::<InvestigationStatus>().unwrap().as_str(), s);
        }
        assert!("done".parse::<InvestigationStatus>().is_err());
    }
}
