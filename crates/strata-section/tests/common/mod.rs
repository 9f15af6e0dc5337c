//! A minimal store for driving sections in tests: merges reducer maps,
//! combines them over a root mapping, and dispatches actions.

use strata_section::{Action, ReducerMap, SectionBundle};
use strata_types::{Mapping, Node, Patch};

pub const INIT: &str = "@@INIT";

pub struct TestStore {
    reducers: ReducerMap,
    state: Node,
}

impl TestStore {
    pub fn new(bundles: &[&SectionBundle]) -> Self {
        let reducers = bundles
            .iter()
            .try_fold(ReducerMap::new(), |acc, b| acc.merge(b.reducer.clone()))
            .expect("sections must have distinct paths");
        let mut store = Self {
            reducers,
            state: Node::empty_mapping(),
        };
        store.dispatch(&Action::new(INIT, Patch::new()));
        store
    }

    pub fn state(&self) -> &Node {
        &self.state
    }

    /// Run `action` through every section. The root is reallocated only when
    /// some slice changed.
    pub fn dispatch(&mut self, action: &Action) {
        let mut changed = false;
        let mut next = Mapping::new();
        for (path, reducer) in self.reducers.iter() {
            let before = self.state.get(path.as_str());
            let after = reducer.reduce(before, action);
            changed |= !before.is_some_and(|b| b.ptr_eq(&after));
            next.insert(path.to_string(), after);
        }
        if changed {
            self.state = Node::from(next);
        }
    }
}
