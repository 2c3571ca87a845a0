//! Forest builder: infers each entity's single parent from relation history.

use std::collections::HashMap;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::arena::Forest;
use crate::domain::entities::{Entity, EntityId, Relation};
use crate::domain::error::DomainError;

/// Result type for forest operations.
pub type ForestResult<T> = Result<T, DomainError>;

/// Constructs a forest from entities and their directed relations.
///
/// Parent resolution follows the earliest-edge rule: the target of an
/// entity's earliest outgoing relation becomes its parent. Entities are
/// processed in input order, which also decides the mutual-parent
/// tie-break (`a ↔ b`): the entity listed first wins its attachment and
/// the other stays a root.
pub struct ForestBuilder {
    relations_by_actor: HashMap<EntityId, Vec<Relation>>,
}

impl Default for ForestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ForestBuilder {
    pub fn new() -> Self {
        Self {
            relations_by_actor: HashMap::new(),
        }
    }

    /// Build the forest for one complete input snapshot.
    ///
    /// Relations are only read, never consumed; a relation whose target is
    /// not among the entities is skipped silently (policy, not an error).
    /// The only failure is a duplicate entity identifier.
    #[instrument(level = "debug", skip(self, entities, relations))]
    pub fn build(&mut self, entities: &[Entity], relations: &[Relation]) -> ForestResult<Forest> {
        let mut forest = Forest::new();
        for entity in entities {
            forest.insert_entity(entity)?;
        }

        self.group_relations(relations);
        debug!(
            "build: {} entities, {} actors with relations",
            entities.len(),
            self.relations_by_actor.len()
        );

        for entity in entities {
            let Some(candidate) = self.candidate_parent(entity.id) else {
                continue;
            };
            let Some(parent_idx) = forest.index_of(candidate) else {
                // Target outside the snapshot: the actor stays a root candidate.
                debug!("skip: {} -> unknown target {}", entity.id, candidate);
                continue;
            };
            let Some(child_idx) = forest.index_of(entity.id) else {
                continue;
            };

            // Two-node cycle guard: if the candidate parent already resolved
            // this entity as its own parent, the attachment would close a
            // 2-cycle. Skip it; this entity stays a root. Cycles of length
            // >= 3 are not detected.
            let mutual = forest
                .get_node(parent_idx)
                .and_then(|p| p.parent)
                .and_then(|pp| forest.get_node(pp))
                .is_some_and(|pp| pp.data.id == entity.id);
            if mutual {
                debug!(
                    "skip: mutual parent edge {} <-> {}, {} stays a root",
                    entity.id, candidate, entity.id
                );
                continue;
            }

            forest.attach(child_idx, parent_idx);
        }

        forest.collect_roots();
        Ok(forest)
    }

    /// Group relations by actor and sort each group by timestamp.
    ///
    /// The sort is stable, so equal timestamps keep their input order.
    /// That tie-break is deliberate and documented, not an accident.
    fn group_relations(&mut self, relations: &[Relation]) {
        self.relations_by_actor = relations
            .iter()
            .cloned()
            .into_group_map_by(|r| r.actor);
        for group in self.relations_by_actor.values_mut() {
            group.sort_by_key(|r| r.created_at);
        }
    }

    /// Target of the actor's earliest relation, if it has any.
    fn candidate_parent(&self, actor: EntityId) -> Option<EntityId> {
        self.relations_by_actor
            .get(&actor)
            .and_then(|group| group.first())
            .map(|r| r.target)
    }
}
