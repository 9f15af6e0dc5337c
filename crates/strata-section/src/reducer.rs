use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use strata_merge::traced_merge;
use strata_types::{Node, Patch};
use tracing::debug;

use crate::action::{Action, Dispatch};
use crate::error::{SectionError, SectionResult};
use crate::path::SectionPath;
use crate::section::SectionDescriptor;

/// A pure state transition for one section of the global state.
///
/// The trait is object-safe and `Send + Sync` so reducers from different
/// sections can live side by side in a [`ReducerMap`].
pub trait Reduce: Send + Sync {
    /// Path of the slice this reducer owns.
    fn path(&self) -> &SectionPath;

    /// Compute the next slice. `None` means the slice has no value yet.
    fn reduce(&self, state: Option<&Node>, action: &Action) -> Node;
}

/// The reducer bound to a section.
#[derive(Clone, Debug)]
pub struct Reducer {
    descriptor: Arc<SectionDescriptor>,
}

impl Reducer {
    pub fn new(descriptor: Arc<SectionDescriptor>) -> Self {
        Self { descriptor }
    }
}

impl Reduce for Reducer {
    fn path(&self) -> &SectionPath {
        self.descriptor.path()
    }

    fn reduce(&self, state: Option<&Node>, action: &Action) -> Node {
        let state = state.unwrap_or_else(|| self.descriptor.default_value());
        match Dispatch::decode(self.descriptor.path(), &action.action_type) {
            Dispatch::Update => {
                debug!(section = %self.descriptor.path(), action = %action.action_type, "update");
                traced_merge(state, &action.payload)
            }
            Dispatch::Replace => {
                debug!(section = %self.descriptor.path(), action = %action.action_type, "replace");
                shallow_merge(state, &action.payload)
            }
            Dispatch::Unrecognized => state.clone(),
        }
    }
}

/// One-level merge: top-level keys of `payload` overwrite those of `state`.
/// Nested values are assigned whole, never merged.
fn shallow_merge(state: &Node, payload: &Patch) -> Node {
    let mut result = state.as_mapping().cloned().unwrap_or_default();
    for (key, entry) in payload {
        match entry.to_node() {
            Some(node) => {
                result.insert(key.clone(), node);
            }
            None => {
                result.remove(key);
            }
        }
    }
    Node::from(result)
}

/// Section reducers keyed by their path.
///
/// A section contributes a single-key map; maps from several sections are
/// merged before being handed to whatever combines them into a root reducer.
#[derive(Clone, Default)]
pub struct ReducerMap {
    reducers: BTreeMap<SectionPath, Arc<dyn Reduce>>,
}

impl ReducerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map holding only `reducer`, keyed by its path.
    pub fn single(reducer: Arc<dyn Reduce>) -> Self {
        let mut reducers = BTreeMap::new();
        reducers.insert(reducer.path().clone(), reducer);
        Self { reducers }
    }

    /// Merge `other` into this map. Two reducers for one path is an error.
    pub fn merge(mut self, other: ReducerMap) -> SectionResult<Self> {
        for (path, reducer) in other.reducers {
            match self.reducers.entry(path) {
                Entry::Occupied(occupied) => {
                    return Err(SectionError::DuplicateSection(occupied.key().to_string()));
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(reducer);
                }
            }
        }
        Ok(self)
    }

    pub fn get(&self, path: &str) -> Option<&Arc<dyn Reduce>> {
        self.reducers.get(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &SectionPath> {
        self.reducers.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SectionPath, &Arc<dyn Reduce>)> {
        self.reducers.iter()
    }

    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl fmt::Debug for ReducerMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.reducers.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionCreator, ActionKind};
    use serde_json::json;

    fn descriptor(path: &str) -> Arc<SectionDescriptor> {
        Arc::new(SectionDescriptor::new(
            SectionPath::new(path).unwrap(),
            Node::from(json!({"a1": "x", "a2": {"a21": 1, "a22": 2}, "a3": [1, 2]})),
        ))
    }

    #[test]
    fn missing_state_starts_from_default() {
        let d = descriptor("s");
        let reducer = Reducer::new(d.clone());
        let state = reducer.reduce(None, &Action::new("@@INIT", Patch::new()));
        assert!(state.ptr_eq(d.default_value()));
    }

    #[test]
    fn unrelated_action_returns_same_state() {
        let reducer = Reducer::new(descriptor("s"));
        let state = Node::from(json!({"k": 1}));
        let next = reducer.reduce(Some(&state), &Action::new("other ~> [ k ]", Patch::new()));
        assert!(next.ptr_eq(&state));
    }

    #[test]
    fn update_merges_recursively() {
        let d = descriptor("s");
        let reducer = Reducer::new(d.clone());
        let update = ActionCreator::new(d.clone(), ActionKind::Update);

        let next = reducer.reduce(
            None,
            &update.create(Patch::new().with("a2", Patch::new().with("a21", Node::from(666)))),
        );

        assert_eq!(
            next.to_json(),
            json!({"a1": "x", "a2": {"a21": 666, "a22": 2}, "a3": [1, 2]})
        );
        assert!(next.get("a3").unwrap().ptr_eq(d.default_value().get("a3").unwrap()));
    }

    #[test]
    fn replace_overwrites_top_level_only() {
        let d = descriptor("s");
        let reducer = Reducer::new(d.clone());
        let replace = ActionCreator::new(d.clone(), ActionKind::Replace);

        let next = reducer.reduce(
            None,
            &replace.create(Patch::new().with("a2", Patch::new().with("a21", Node::from(666)))),
        );

        assert_eq!(next.get("a2").unwrap().to_json(), json!({"a21": 666}));
        assert!(next.get("a1").unwrap().ptr_eq(d.default_value().get("a1").unwrap()));
    }

    #[test]
    fn replace_with_unresolved_absent_removes_key() {
        let d = descriptor("s");
        let reducer = Reducer::new(d.clone());
        let state = Node::from(json!({"extra": true, "a1": "y"}));
        let action = ActionCreator::new(d, ActionKind::Replace)
            .create(Patch::new().with_absent("extra").with_absent("a1"));

        let next = reducer.reduce(Some(&state), &action);
        assert_eq!(next.to_json(), json!({"a1": "x"}));
    }

    #[test]
    fn merge_rejects_duplicate_paths() {
        let a = ReducerMap::single(Arc::new(Reducer::new(descriptor("a"))));
        let b = ReducerMap::single(Arc::new(Reducer::new(descriptor("b"))));
        let a_again = ReducerMap::single(Arc::new(Reducer::new(descriptor("a"))));

        let merged = a.merge(b).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(
            merged.paths().map(SectionPath::as_str).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert_eq!(
            merged.merge(a_again).unwrap_err(),
            SectionError::DuplicateSection("a".into())
        );
    }

    #[test]
    fn debug_lists_paths() {
        let map = ReducerMap::single(Arc::new(Reducer::new(descriptor("todos"))));
        assert_eq!(format!("{map:?}"), "{SectionPath(\"todos\")}");
    }
}
