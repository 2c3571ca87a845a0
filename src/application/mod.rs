//! Application layer: snapshot I/O and orchestration on top of the domain

pub mod error;
pub mod snapshot;

pub use error::{ApplicationError, ApplicationResult};
pub use snapshot::Snapshot;
