//! Section binder for strata.
//!
//! A section is a named slice of a larger state tree. [`make_section`] binds a
//! path and a default value into a [`SectionBundle`]: a reducer keyed by the
//! path, a selector for the slice, and creators for update and replace
//! actions. Everything produced here is pure; dispatching actions and
//! combining reducers belong to the surrounding store.
//!
//! # Key Types
//!
//! - [`Section`] / [`SectionDescriptor`] -- Path and default value, captured once
//! - [`Action`] / [`ActionKind`] / [`Dispatch`] -- Actions and their decoded routing
//! - [`Reducer`] / [`Reduce`] / [`ReducerMap`] -- Section reducers keyed by path
//! - [`Selector`] -- Projection of the global state onto a section

pub mod action;
pub mod error;
pub mod path;
pub mod reducer;
pub mod section;
pub mod selector;

pub use action::{Action, ActionCreator, ActionKind, Dispatch};
pub use error::{SectionError, SectionResult};
pub use path::{SectionPath, REPLACE_MARK, UPDATE_MARK};
pub use reducer::{Reduce, Reducer, ReducerMap};
pub use section::{make_section, Section, SectionBundle, SectionDescriptor};
pub use selector::Selector;
