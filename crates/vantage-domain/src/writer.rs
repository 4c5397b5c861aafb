//! Synchronized append access to an investigation graph
//!
//! The dedup-on-insert logic of [`Investigation::add_entity`] is not safe
//! under unsynchronized concurrent writers. A provider that queries many
//! endpoints from several threads wraps the graph in a [`GraphWriter`] and
//! hands `&GraphWriter` to its workers.

use crate::investigation::Investigation;
use crate::metadata::Metadata;
use crate::{Entity, Id, Relationship};
use std::sync::{Mutex, MutexGuard};

/// Mutex-guarded view of a borrowed investigation exposing only append operations
pub struct GraphWriter<'a> {
    graph: Mutex<&'a mut Investigation>,
}

impl<'a> GraphWriter<'a> {
    /// Wrap a graph for the duration of a provider call
    pub fn new(graph: &'a mut Investigation) -> Self {
        Self {
            graph: Mutex::new(graph),
        }
    }

    fn lock(&self) -> MutexGuard<'_, &'a mut Investigation> {
        // A worker panicking mid-append leaves the graph usable; keep going.
        self.graph.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Deduplicating insert; returns a snapshot of the stored entity
    pub fn add_entity(&self, candidate: Entity) -> Entity {
        self.lock().add_entity(candidate).clone()
    }

    /// Append a relationship; returns a snapshot of it
    pub fn add_relationship(
        &self,
        source_id: Id,
        target_id: Id,
        relationship_type: impl Into<String>,
        confidence: f64,
        evidence: Metadata,
    ) -> Relationship {
        self.lock()
            .add_relationship(source_id, target_id, relationship_type, confidence, evidence)
            .clone()
    }

    /// Merge metadata into an existing entity
    pub fn merge_metadata(&self, id: Id, metadata: Metadata) -> bool {
        self.lock().merge_metadata(id, metadata)
    }
}
