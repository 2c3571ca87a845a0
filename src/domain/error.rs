//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::EntityId;

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("duplicate entity id: {0}")]
    DuplicateEntity(EntityId),
}
