//! Domain entities: core data structures

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// Unique entity identifier.
pub type EntityId = u64;

/// An entity to be placed in the forest.
///
/// Immutable input; the builder never mutates entities, only the forest
/// nodes derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    /// Declared acquisition source, e.g. "link" or "playmarket"
    pub source: Option<String>,
}

impl Entity {
    pub fn new(id: EntityId, source: Option<&str>) -> Self {
        Self {
            id,
            source: source.map(|s| s.to_string()),
        }
    }
}

/// Directed, timestamped edge: `actor` formed a relation toward `target`.
///
/// A relation is evidence about the actor's parent only, never about the
/// target's. Multiple relations may share an actor; timestamps need not
/// be unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub actor: EntityId,
    pub target: EntityId,
    pub created_at: DateTime<Utc>,
}

impl Relation {
    pub fn new(actor: EntityId, target: EntityId, created_at: DateTime<Utc>) -> Self {
        Self {
            actor,
            target,
            created_at,
        }
    }
}

/// Source → color mapping with a fallback for nodes without a declaration.
///
/// Supplied by configuration, never derived from the data itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: BTreeMap<String, String>,
    default_color: String,
}

impl Palette {
    pub fn new(colors: BTreeMap<String, String>, default_color: impl Into<String>) -> Self {
        Self {
            colors,
            default_color: default_color.into(),
        }
    }

    /// Color for an explicit declaration, if the source is known.
    ///
    /// A source absent from the mapping counts as no declaration at all;
    /// the caller falls through to inheritance or the default.
    pub fn declared(&self, source: Option<&str>) -> Option<&str> {
        source.and_then(|s| self.colors.get(s)).map(String::as_str)
    }

    pub fn default_color(&self) -> &str {
        &self.default_color
    }
}
