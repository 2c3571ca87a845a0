//! Snapshot loading: entities and relations from a JSON file.
//!
//! The snapshot is the sole input surface of the core. Timestamps are
//! validated here, at the boundary; a malformed timestamp fails the load
//! instead of silently coercing into an arbitrary sort order.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::{Entity, EntityId, Forest, ForestBuilder, Palette, Relation};

#[derive(Debug, Deserialize)]
struct RawEntity {
    id: EntityId,
    #[serde(default)]
    source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRelation {
    actor: EntityId,
    target: EntityId,
    created_at: String,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    entities: Vec<RawEntity>,
    #[serde(default)]
    relations: Vec<RawRelation>,
}

/// A complete, static snapshot of entities and relations.
///
/// Input order is preserved: it is the entity iteration order of the
/// builder and, through it, the root order of the resulting forest.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub entities: Vec<Entity>,
    pub relations: Vec<Relation>,
}

impl Snapshot {
    /// Parse a snapshot from JSON content.
    pub fn parse(content: &str) -> ApplicationResult<Self> {
        let raw: RawSnapshot = serde_json::from_str(content)?;

        let entities = raw
            .entities
            .into_iter()
            .map(|e| Entity {
                id: e.id,
                source: e.source,
            })
            .collect();

        let relations = raw
            .relations
            .into_iter()
            .map(|r| {
                let created_at = parse_timestamp(&r.created_at)?;
                Ok(Relation::new(r.actor, r.target, created_at))
            })
            .collect::<ApplicationResult<Vec<_>>>()?;

        Ok(Self {
            entities,
            relations,
        })
    }

    /// Load and parse a snapshot file.
    pub fn load(path: &Path) -> ApplicationResult<Self> {
        debug!("load: {}", path.display());
        let content =
            std::fs::read_to_string(path).map_err(|e| ApplicationError::SnapshotRead {
                path: path.to_path_buf(),
                source: e,
            })?;
        Self::parse(&content)
    }

    /// Build the forest and resolve all colors in one pass.
    ///
    /// The builder runs to completion before propagation starts; the
    /// returned forest is final and read-only from the caller's point
    /// of view.
    pub fn build_forest(&self, palette: &Palette) -> ApplicationResult<Forest> {
        let mut forest = ForestBuilder::new().build(&self.entities, &self.relations)?;
        forest.propagate(palette);
        Ok(forest)
    }
}

fn parse_timestamp(value: &str) -> ApplicationResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ApplicationError::InvalidTimestamp {
            value: value.to_string(),
            source: e,
        })
}
