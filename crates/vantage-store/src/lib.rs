//! Vantage Storage Layer
//!
//! Implements the InvestigationStore trait on SQLite.
//!
//! # Layout
//!
//! - `investigations`: one row per investigation, provider runs as JSON
//! - `entities` / `relationships`: one row each, ordered by a `position`
//!   column, metadata and evidence as JSON
//!
//! # Examples
//!
//! ```
//! use vantage_domain::{Entity, EntityType, Investigation, InvestigationStore};
//! use vantage_store::SqliteStore;
//!
//! let mut store = SqliteStore::new(":memory:").unwrap();
//! let mut inv = Investigation::new("example.com", EntityType::Domain);
//! inv.add_entity(Entity::new(EntityType::Domain, "example.com", "user_input"));
//! store.save(&inv).unwrap();
//!
//! let loaded = store.load(inv.id()).unwrap();
//! assert_eq!(loaded.entities().len(), 1);
//! ```

#![warn(missing_docs)]

use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use vantage_domain::{
    clamp_confidence, Entity, EntityType, Id, Investigation, InvestigationListing, InvestigationStatus,
    InvestigationStore, Metadata, ProviderRun, Relationship,
};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Investigation not found
    #[error("Investigation not found: {0}")]
    NotFound(String),

    /// JSON column could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored row holds a value the domain rejects
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of InvestigationStore
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

/// Investigation row before its children are attached
struct InvestigationRow {
    id: Id,
    initial_query: String,
    initial_type: String,
    status: String,
    notes: String,
    provider_runs: String,
    created_at: i64,
    completed_at: Option<i64>,
}

impl SqliteStore {
    /// Open (or create) a store at `path`
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    fn id_to_bytes(id: Id) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    fn bytes_to_id(bytes: &[u8]) -> Result<Id, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::InvalidData(format!("Expected 16 bytes for Id, got {}", bytes.len()))
        })?;
        Ok(Id::from_value(u128::from_be_bytes(arr)))
    }

    /// Read an id blob inside a row mapper
    fn column_id(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Id> {
        let bytes: Vec<u8> = row.get(idx)?;
        Self::bytes_to_id(&bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Blob, Box::new(e))
        })
    }

    fn parse_type(s: &str) -> Result<EntityType, StoreError> {
        s.parse()
            .map_err(|_| StoreError::InvalidData(format!("Unknown entity type: {}", s)))
    }

    fn parse_status(s: &str) -> Result<InvestigationStatus, StoreError> {
        s.parse()
            .map_err(|_| StoreError::InvalidData(format!("Unknown status: {}", s)))
    }

    fn delete_rows(tx: &Transaction<'_>, id_bytes: &[u8]) -> Result<usize, StoreError> {
        tx.execute("DELETE FROM relationships WHERE investigation_id = ?1", params![id_bytes])?;
        tx.execute("DELETE FROM entities WHERE investigation_id = ?1", params![id_bytes])?;
        let removed = tx.execute("DELETE FROM investigations WHERE id = ?1", params![id_bytes])?;
        Ok(removed)
    }

    fn load_entities(&self, id_bytes: &[u8]) -> Result<Vec<Entity>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, entity_type, value, source_provider, confidence, metadata, created_at
             FROM entities WHERE investigation_id = ?1 ORDER BY position",
        )?;

        let rows = stmt
            .query_map(params![id_bytes], |row| {
                Ok((
                    Self::column_id(row, 0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, i64>(6)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(
                |(id, entity_type, value, source_provider, confidence, metadata, created_at)|
                 -> Result<Entity, StoreError> {
                Ok(Entity {
                    id,
                    entity_type: Self::parse_type(&entity_type)?,
                    value,
                    source_provider,
                    confidence,
                    metadata: serde_json::from_str::<Metadata>(&metadata)?,
                    created_at: created_at as u64,
                })
            })
            .collect()
    }

    fn load_relationships(&self, id_bytes: &[u8]) -> Result<Vec<Relationship>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, source_entity_id, target_entity_id, relationship_type, confidence, evidence
             FROM relationships WHERE investigation_id = ?1 ORDER BY position",
        )?;

        let rows = stmt
            .query_map(params![id_bytes], |row| {
                Ok((
                    Self::column_id(row, 0)?,
                    Self::column_id(row, 1)?,
                    Self::column_id(row, 2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(
                |(id, source_entity_id, target_entity_id, relationship_type, confidence, evidence)|
                 -> Result<Relationship, StoreError> {
                Ok(Relationship {
                    id,
                    source_entity_id,
                    target_entity_id,
                    relationship_type,
                    confidence,
                    evidence: serde_json::from_str::<Metadata>(&evidence)?,
                })
            })
            .collect()
    }
}

impl InvestigationStore for SqliteStore {
    type Error = StoreError;

    fn save(&mut self, investigation: &Investigation) -> Result<(), Self::Error> {
        let id_bytes = Self::id_to_bytes(investigation.id());
        let runs = serde_json::to_string(investigation.provider_runs())?;

        let tx = self.conn.transaction()?;
        Self::delete_rows(&tx, &id_bytes)?;

        tx.execute(
            "INSERT INTO investigations
             (id, initial_query, initial_type, status, notes, provider_runs, created_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &id_bytes,
                investigation.initial_query(),
                investigation.initial_type().as_str(),
                investigation.status().as_str(),
                investigation.notes(),
                &runs,
                investigation.created_at() as i64,
                investigation.completed_at().map(|t| t as i64),
            ],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO entities
                 (investigation_id, position, id, entity_type, value, source_provider, confidence, metadata, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for (position, entity) in investigation.entities().iter().enumerate() {
                stmt.execute(params![
                    &id_bytes,
                    position as i64,
                    Self::id_to_bytes(entity.id),
                    entity.entity_type.as_str(),
                    &entity.value,
                    &entity.source_provider,
                    clamp_confidence(entity.confidence),
                    serde_json::to_string(&entity.metadata)?,
                    entity.created_at as i64,
                ])?;
            }
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO relationships
                 (investigation_id, position, id, source_entity_id, target_entity_id, relationship_type, confidence, evidence)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for (position, rel) in investigation.relationships().iter().enumerate() {
                stmt.execute(params![
                    &id_bytes,
                    position as i64,
                    Self::id_to_bytes(rel.id),
                    Self::id_to_bytes(rel.source_entity_id),
                    Self::id_to_bytes(rel.target_entity_id),
                    &rel.relationship_type,
                    clamp_confidence(rel.confidence),
                    serde_json::to_string(&rel.evidence)?,
                ])?;
            }
        }

        tx.commit()?;
        debug!(
            "Saved investigation {} ({} entities, {} relationships)",
            investigation.id(),
            investigation.entities().len(),
            investigation.relationships().len()
        );
        Ok(())
    }

    fn load(&self, id: Id) -> Result<Investigation, Self::Error> {
        let id_bytes = Self::id_to_bytes(id);

        let row = self
            .conn
            .query_row(
                "SELECT id, initial_query, initial_type, status, notes, provider_runs, created_at, completed_at
                 FROM investigations WHERE id = ?1",
                params![&id_bytes],
                |row| {
                    Ok(InvestigationRow {
                        id: Self::column_id(row, 0)?,
                        initial_query: row.get(1)?,
                        initial_type: row.get(2)?,
                        status: row.get(3)?,
                        notes: row.get(4)?,
                        provider_runs: row.get(5)?,
                        created_at: row.get(6)?,
                        completed_at: row.get(7)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let entities = self.load_entities(&id_bytes)?;
        let relationships = self.load_relationships(&id_bytes)?;
        let provider_runs: Vec<ProviderRun> = serde_json::from_str(&row.provider_runs)?;

        Ok(Investigation::restore(
            row.id,
            row.initial_query,
            Self::parse_type(&row.initial_type)?,
            Self::parse_status(&row.status)?,
            row.notes,
            row.created_at as u64,
            row.completed_at.map(|t| t as u64),
            entities,
            relationships,
            provider_runs,
        ))
    }

    fn list(&self, limit: usize) -> Result<Vec<InvestigationListing>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT i.id, i.initial_query, i.initial_type, i.status, i.created_at, i.completed_at,
                    (SELECT COUNT(*) FROM entities e WHERE e.investigation_id = i.id)
             FROM investigations i
             ORDER BY i.created_at DESC, i.id DESC
             LIMIT ?1",
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok((
                    Self::column_id(row, 0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, Option<i64>>(5)?,
                    row.get::<_, i64>(6)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(
                |(id, initial_query, initial_type, status, created_at, completed_at, entity_count)|
                 -> Result<InvestigationListing, StoreError> {
                    Ok(InvestigationListing {
                        id,
                        initial_query,
                        initial_type: Self::parse_type(&initial_type)?,
                        status: Self::parse_status(&status)?,
                        entity_count: entity_count as usize,
                        created_at: created_at as u64,
                        completed_at: completed_at.map(|t| t as u64),
                    })
                },
            )
            .collect()
    }

    fn delete(&mut self, id: Id) -> Result<(), Self::Error> {
        let id_bytes = Self::id_to_bytes(id);
        let tx = self.conn.transaction()?;
        let removed = Self::delete_rows(&tx, &id_bytes)?;
        if removed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        tx.commit()?;
        debug!("Deleted investigation {}", id);
        Ok(())
    }
}
