//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config
//! loading). Builds run single-threaded over a complete, static snapshot.

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;

pub use arena::{Forest, NodeData, TreeNode};
pub use builder::{ForestBuilder, ForestResult};
pub use entities::{Entity, EntityId, Palette, Relation};
pub use error::DomainError;
