//! Traced merge engine for strata.
//!
//! Applies a [`Patch`](strata_types::Patch) to a state tree copy-on-write:
//! every mapping on a changed path is reallocated, every untouched subtree is
//! shared with the source, keys marked absent are removed, and arrays and
//! scalars are replaced as a whole.
//!
//! Also provides [`deep_clone`] and [`deep_freeze`] for fixtures and for
//! moving state in and out of mutable JSON.

pub mod deep;
pub mod error;
pub mod traced;

pub use deep::{deep_clone, deep_freeze};
pub use error::{MergeError, MergeResult};
pub use traced::{traced_merge, traced_merge_opt};
