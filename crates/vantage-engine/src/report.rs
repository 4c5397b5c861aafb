//! Node/edge projection of a finished investigation for display and export

use serde::Serialize;
use std::collections::BTreeMap;
use vantage_domain::{Entity, EntityType, Id, Investigation, ProviderRun, Relationship};

/// Longest node label, in characters
pub const MAX_LABEL_CHARS: usize = 40;

const ELLIPSIS: &str = "...";

/// Serializable summary of an investigation, including a graph view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestigationReport {
    /// Investigation id
    pub id: Id,
    /// Normalized query
    pub query: String,
    /// Resolved query type
    pub query_type: EntityType,
    /// Lifecycle status
    pub status: String,
    /// Failure reason, empty otherwise
    pub notes: String,
    /// Creation time (ms since epoch)
    pub created_at: u64,
    /// Completion time (ms since epoch)
    pub completed_at: Option<u64>,
    /// Entity count
    pub total_entities: usize,
    /// Relationship count
    pub total_relationships: usize,
    /// Entities per type name
    pub entity_counts: BTreeMap<String, usize>,
    /// Relationships per relationship type
    pub relationship_counts: BTreeMap<String, usize>,
    /// Audit trail, failed providers marked
    pub providers_run: Vec<String>,
    /// Detailed provider outcomes
    pub provider_runs: Vec<ProviderRun>,
    /// Graph view
    pub graph: ReportGraph,
    /// Full entities
    pub entities: Vec<Entity>,
    /// Full relationships
    pub relationships: Vec<Relationship>,
}

/// Nodes and links of the graph view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportGraph {
    /// One node per entity
    pub nodes: Vec<GraphNode>,
    /// One link per relationship
    pub links: Vec<GraphLink>,
}

/// Graph node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    /// Entity id
    pub id: Id,
    /// Value, truncated to [`MAX_LABEL_CHARS`]
    pub label: String,
    /// Entity type
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// Entity confidence
    pub confidence: f64,
    /// Provider that produced the entity
    pub source: String,
}

/// Graph edge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphLink {
    /// Source entity id
    pub source: Id,
    /// Target entity id
    pub target: Id,
    /// Relationship type
    #[serde(rename = "type")]
    pub relationship_type: String,
    /// Relationship confidence
    pub confidence: f64,
}

impl InvestigationReport {
    /// Project an investigation
    pub fn from_investigation(investigation: &Investigation) -> Self {
        let mut entity_counts = BTreeMap::new();
        for entity in investigation.entities() {
            *entity_counts
                .entry(entity.entity_type.as_str().to_string())
                .or_insert(0) += 1;
        }

        let mut relationship_counts = BTreeMap::new();
        for rel in investigation.relationships() {
            *relationship_counts
                .entry(rel.relationship_type.clone())
                .or_insert(0) += 1;
        }

        let nodes = investigation
            .entities()
            .iter()
            .map(|e| GraphNode {
                id: e.id,
                label: truncate_label(&e.value),
                entity_type: e.entity_type,
                confidence: e.confidence,
                source: e.source_provider.clone(),
            })
            .collect();

        let links = investigation
            .relationships()
            .iter()
            .map(|r| GraphLink {
                source: r.source_entity_id,
                target: r.target_entity_id,
                relationship_type: r.relationship_type.clone(),
                confidence: r.confidence,
            })
            .collect();

        Self {
            id: investigation.id(),
            query: investigation.initial_query().to_string(),
            query_type: investigation.initial_type(),
            status: investigation.status().as_str().to_string(),
            notes: investigation.notes().to_string(),
            created_at: investigation.created_at(),
            completed_at: investigation.completed_at(),
            total_entities: investigation.entities().len(),
            total_relationships: investigation.relationships().len(),
            entity_counts,
            relationship_counts,
            providers_run: investigation.providers_run(),
            provider_runs: investigation.provider_runs().to_vec(),
            graph: ReportGraph { nodes, links },
            entities: investigation.entities().to_vec(),
            relationships: investigation.relationships().to_vec(),
        }
    }
}

/// Shorten `text` to at most [`MAX_LABEL_CHARS`] characters, ending in `...` when cut
pub fn truncate_label(text: &str) -> String {
    if text.chars().count() <= MAX_LABEL_CHARS {
        return text.to_string();
    }
    let keep = MAX_LABEL_CHARS - ELLIPSIS.len();
    let mut label: String = text.chars().take(keep).collect();
    label.push_str(ELLIPSIS);
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_domain::Metadata;

    fn sample() -> Investigation {
        let mut inv = Investigation::new("alice@example.com", EntityType::Email);
        inv.start().unwrap();
        let seed = inv
            .add_entity(Entity::new(EntityType::Email, "alice@example.com", "user_input"))
            .id;
        let user = inv
            .add_entity(Entity::new(EntityType::Username, "alice", "Email Enrichment").with_confidence(0.7))
            .id;
        let domain = inv
            .add_entity(Entity::new(EntityType::Domain, "example.com", "Email Enrichment"))
            .id;
        inv.add_relationship(seed, user, "email_contains_username", 0.7, Metadata::new());
        inv.add_relationship(seed, domain, "email_hosted_on", 1.0, Metadata::new());
        inv.record_run(ProviderRun::succeeded("Email Enrichment", 2, 1));
        inv.record_run(ProviderRun::failed("Breach Check", "offline", 3));
        inv.complete().unwrap();
        inv
    }

    #[test]
    fn test_counts_and_trail() {
        let report = InvestigationReport::from_investigation(&sample());
        assert_eq!(report.status, "completed");
        assert_eq!(report.total_entities, 3);
        assert_eq!(report.total_relationships, 2);
        assert_eq!(report.entity_counts["email"], 1);
        assert_eq!(report.entity_counts["username"], 1);
        assert_eq!(report.relationship_counts["email_hosted_on"], 1);
        assert_eq!(
            report.providers_run,
            vec!["Email Enrichment", "Breach Check (FAILED)"]
        );
        assert!(report.completed_at.is_some());
    }

    #[test]
    fn test_graph_view() {
        let inv = sample();
        let report = InvestigationReport::from_investigation(&inv);
        assert_eq!(report.graph.nodes.len(), 3);
        assert_eq!(report.graph.links.len(), 2);
        assert_eq!(report.graph.nodes[1].label, "alice");
        assert_eq!(report.graph.nodes[1].confidence, 0.7);
        assert_eq!(report.graph.links[0].source, inv.entities()[0].id);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["query_type"], "email");
        assert_eq!(json["graph"]["nodes"][2]["type"], "domain");
        assert_eq!(json["graph"]["links"][1]["type"], "email_hosted_on");
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("short"), "short");
        let exact = "a".repeat(MAX_LABEL_CHARS);
        assert_eq!(truncate_label(&exact), exact);

        let long = "b".repeat(50);
        let label = truncate_label(&long);
        assert_eq!(label.chars().count(), MAX_LABEL_CHARS);
        assert!(label.ends_with("..."));
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let text = "é".repeat(45);
        let label = truncate_label(&text);
        assert_eq!(label.chars().count(), MAX_LABEL_CHARS);
        assert!(label.starts_with("ééé"));
    }
}
