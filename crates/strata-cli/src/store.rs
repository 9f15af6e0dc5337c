use strata_section::{Action, ReducerMap};
use strata_types::{Mapping, Node, Patch};
use tracing::debug;

/// Action type dispatched once when a store is created.
pub const INIT_ACTION: &str = "@@strata/INIT";

/// A single-writer store that combines section reducers over one root mapping.
///
/// Each reducer only ever sees its own slice. Keys of the root that no
/// section owns are carried along untouched.
pub struct Store {
    reducers: ReducerMap,
    state: Node,
}

impl Store {
    /// Create a store from `initial` (or an empty root) and initialise every
    /// section that has no slice yet.
    pub fn new(reducers: ReducerMap, initial: Option<Node>) -> Self {
        let mut store = Self {
            reducers,
            state: initial.unwrap_or_else(Node::empty_mapping),
        };
        store.dispatch(&Action::new(INIT_ACTION, Patch::new()));
        store
    }

    pub fn state(&self) -> &Node {
        &self.state
    }

    /// Run `action` through every section reducer. Returns `true` if any
    /// slice changed, in which case the root is reallocated.
    pub fn dispatch(&mut self, action: &Action) -> bool {
        let mut next: Mapping = self.state.as_mapping().cloned().unwrap_or_default();
        let mut changed = !self.state.is_traversable();

        for (path, reducer) in self.reducers.iter() {
            let before = self.state.get(path.as_str());
            let after = reducer.reduce(before, action);
            if !before.is_some_and(|b| b.ptr_eq(&after)) {
                debug!(section = %path, "slice changed");
                changed = true;
                next.insert(path.to_string(), after);
            }
        }

        if changed {
            self.state = Node::from(next);
        }
        changed
    }
}
