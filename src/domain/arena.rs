//! Arena-based forest of referral trees.
//!
//! Nodes live in a generational arena; parent and child links are arena
//! indices, never owning references, so back-references cannot create a
//! second ownership path.

use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{Entity, EntityId, Palette};
use crate::domain::error::DomainError;

/// Data payload for forest nodes.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub id: EntityId,
    /// Declared acquisition source, if any
    pub source: Option<String>,
    /// Resolved color; empty until propagation has run
    pub color: String,
}

/// Tree node in the arena-based forest.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes, in attachment order
    pub children: Vec<Index>,
}

/// Arena-based forest covering all entities of one input snapshot.
///
/// Built once per snapshot by [`ForestBuilder`](crate::domain::ForestBuilder);
/// not incrementally maintained. Root order follows entity input order.
#[derive(Debug)]
pub struct Forest {
    arena: Arena<TreeNode>,
    index: HashMap<EntityId, Index>,
    /// Arena indices in entity input order
    order: Vec<Index>,
    roots: Vec<Index>,
}

impl Default for Forest {
    fn default() -> Self {
        Self::new()
    }
}

impl Forest {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            index: HashMap::new(),
            order: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Insert a node for an entity, with no parent and no children yet.
    ///
    /// Duplicate identifiers are a programmer error in the input and are
    /// rejected rather than silently resolved.
    pub fn insert_entity(&mut self, entity: &Entity) -> Result<Index, DomainError> {
        if self.index.contains_key(&entity.id) {
            return Err(DomainError::DuplicateEntity(entity.id));
        }
        let node = TreeNode {
            data: NodeData {
                id: entity.id,
                source: entity.source.clone(),
                color: String::new(),
            },
            parent: None,
            children: Vec::new(),
        };
        let idx = self.arena.insert(node);
        self.index.insert(entity.id, idx);
        self.order.push(idx);
        Ok(idx)
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn index_of(&self, id: EntityId) -> Option<Index> {
        self.index.get(&id).copied()
    }

    /// Look up a node by entity identifier.
    pub fn node(&self, id: EntityId) -> Option<&TreeNode> {
        self.index_of(id).and_then(|idx| self.arena.get(idx))
    }

    /// Resolved parent identifier of an entity, None for roots.
    pub fn parent_id(&self, id: EntityId) -> Option<EntityId> {
        self.node(id)
            .and_then(|n| n.parent)
            .and_then(|p| self.arena.get(p))
            .map(|p| p.data.id)
    }

    /// Child identifiers of an entity, in attachment order.
    pub fn child_ids(&self, id: EntityId) -> Vec<EntityId> {
        self.node(id)
            .map(|n| {
                n.children
                    .iter()
                    .filter_map(|&c| self.arena.get(c))
                    .map(|c| c.data.id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Attach `child` under `parent`: one parent link, one child entry.
    pub(crate) fn attach(&mut self, child: Index, parent: Index) {
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
    }

    /// Collect root indices (nodes without parent) in entity input order.
    ///
    /// Called once by the builder after all parent links are fixed.
    pub(crate) fn collect_roots(&mut self) {
        self.roots = self
            .order
            .iter()
            .copied()
            .filter(|&idx| self.arena.get(idx).is_some_and(|n| n.parent.is_none()))
            .collect();
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    /// Root entity identifiers in entity input order.
    pub fn root_ids(&self) -> Vec<EntityId> {
        self.roots
            .iter()
            .filter_map(|&idx| self.arena.get(idx))
            .map(|n| n.data.id)
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Pre-order traversal over all trees, roots in input order.
    pub fn iter(&self) -> ForestIter {
        ForestIter::new(self)
    }

    /// Maximum tree depth across the forest; 0 for an empty forest.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects identifiers of all leaf nodes (nodes with no children).
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_ids(&self) -> Vec<EntityId> {
        let mut leaves = Vec::new();
        for &root in &self.roots {
            self.collect_leaves(root, &mut leaves);
        }
        leaves
    }

    fn collect_leaves(&self, node_idx: Index, leaves: &mut Vec<EntityId>) {
        if let Some(node) = self.get_node(node_idx) {
            if node.children.is_empty() {
                leaves.push(node.data.id);
            } else {
                for &child in &node.children {
                    self.collect_leaves(child, leaves);
                }
            }
        }
    }

    /// Resolve every node's color top-down.
    ///
    /// Pre-order with an explicit work stack, so deep or unbalanced forests
    /// cannot overflow the call stack. A node with a declared source known
    /// to the palette keeps that color regardless of depth; otherwise it
    /// copies its parent's already-resolved color. Roots without a known
    /// declaration get the palette default.
    #[instrument(level = "debug", skip(self, palette))]
    pub fn propagate(&mut self, palette: &Palette) {
        // (node, color inherited from parent); None only for roots
        let mut stack: Vec<(Index, Option<String>)> =
            self.roots.iter().rev().map(|&idx| (idx, None)).collect();

        while let Some((idx, inherited)) = stack.pop() {
            if let Some(node) = self.arena.get_mut(idx) {
                let resolved = palette
                    .declared(node.data.source.as_deref())
                    .map(str::to_string)
                    .or(inherited)
                    .unwrap_or_else(|| palette.default_color().to_string());
                node.data.color.clone_from(&resolved);
                for &child in node.children.iter().rev() {
                    stack.push((child, Some(resolved.clone())));
                }
            }
        }
    }
}

pub struct ForestIter<'a> {
    forest: &'a Forest,
    stack: Vec<Index>,
}

impl<'a> ForestIter<'a> {
    fn new(forest: &'a Forest) -> Self {
        // Roots reversed so the first root is visited first
        let stack = forest.roots.iter().rev().copied().collect();
        Self { forest, stack }
    }
}

impl<'a> Iterator for ForestIter<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
