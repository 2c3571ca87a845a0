//! kintree: referral forest inference and color propagation.
//!
//! Converts a flat snapshot of entities and directed, timestamped relations
//! into a forest of rooted trees. Each entity's single parent is the target
//! of its earliest outgoing relation; a two-node cycle guard keeps mutual
//! earliest edges from corrupting the forest. A categorical "source" color
//! is then propagated top-down, with per-node override semantics.
//!
//! Layers:
//! - [`domain`]: forest builder, arena, propagation (no I/O)
//! - [`application`]: snapshot loading and orchestration
//! - [`cli`]: command surface for the `kintree` binary

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
