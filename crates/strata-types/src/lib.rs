//! Foundation types for strata.
//!
//! This crate provides the immutable state tree and the patch vocabulary used
//! by every other strata crate.
//!
//! # Key Types
//!
//! - [`Node`] -- Tagged state node: mapping, array, or scalar. Cloning shares subtrees.
//! - [`Mapping`] -- Keyed children of a mapping node
//! - [`Scalar`] -- Atomic leaf value
//! - [`Patch`] / [`PatchEntry`] -- Keyed change set with an explicit absent marker
//! - [`PatchCodec`] -- JSON reader/writer for patches

pub mod error;
pub mod node;
pub mod patch;

pub use error::{TypeError, TypeResult};
pub use node::{Mapping, Node, Scalar};
pub use patch::{Patch, PatchCodec, PatchEntry, DEFAULT_ABSENT_TOKEN};
