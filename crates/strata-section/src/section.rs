use std::sync::Arc;

use strata_types::{Node, Patch};

use crate::action::{Action, ActionCreator, ActionKind};
use crate::error::SectionResult;
use crate::path::SectionPath;
use crate::reducer::{Reduce, Reducer, ReducerMap};
use crate::selector::Selector;

/// Where a section lives and what it resets to.
///
/// Captured once when the section is built and shared read-only by the
/// reducer and the action creators.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionDescriptor {
    path: SectionPath,
    default_value: Node,
}

impl SectionDescriptor {
    pub fn new(path: SectionPath, default_value: Node) -> Self {
        Self {
            path,
            default_value,
        }
    }

    pub fn path(&self) -> &SectionPath {
        &self.path
    }

    /// Initial state of the reducer and fallback for replace actions.
    pub fn default_value(&self) -> &Node {
        &self.default_value
    }
}

/// The four collaborating pieces of a section, all bound to one descriptor.
#[derive(Clone, Debug)]
pub struct SectionBundle {
    /// `{path: reducer}`, ready to be merged with other sections' maps.
    pub reducer: ReducerMap,
    pub select: Selector,
    pub update: ActionCreator,
    pub replace: ActionCreator,
}

/// Bind `path` and `default_value` into a [`SectionBundle`].
pub fn make_section(path: impl Into<String>, default_value: Node) -> SectionResult<SectionBundle> {
    Ok(Section::with_default(path, default_value)?.bundle())
}

/// A section of the global state.
#[derive(Clone, Debug)]
pub struct Section {
    descriptor: Arc<SectionDescriptor>,
    reducer: Reducer,
    selector: Selector,
    update: ActionCreator,
    replace: ActionCreator,
}

impl Section {
    /// A section whose default is an empty mapping.
    pub fn new(path: impl Into<String>) -> SectionResult<Self> {
        Self::with_default(path, Node::empty_mapping())
    }

    pub fn with_default(path: impl Into<String>, default_value: Node) -> SectionResult<Self> {
        let path = SectionPath::new(path)?;
        let descriptor = Arc::new(SectionDescriptor::new(path.clone(), default_value));
        Ok(Self {
            reducer: Reducer::new(descriptor.clone()),
            selector: Selector::new(path),
            update: ActionCreator::new(descriptor.clone(), ActionKind::Update),
            replace: ActionCreator::new(descriptor.clone(), ActionKind::Replace),
            descriptor,
        })
    }

    pub fn descriptor(&self) -> &SectionDescriptor {
        &self.descriptor
    }

    pub fn path(&self) -> &SectionPath {
        self.descriptor.path()
    }

    pub fn default_value(&self) -> &Node {
        self.descriptor.default_value()
    }

    pub fn reduce(&self, state: Option<&Node>, action: &Action) -> Node {
        self.reducer.reduce(state, action)
    }

    pub fn select<'a>(&self, global: &'a Node) -> Option<&'a Node> {
        self.selector.select(global)
    }

    pub fn update(&self, change: Patch) -> Action {
        self.update.create(change)
    }

    pub fn update_titled(&self, change: Patch, title: &str) -> Action {
        self.update.titled(change, title)
    }

    pub fn replace(&self, change: Patch) -> Action {
        self.replace.create(change)
    }

    pub fn replace_titled(&self, change: Patch, title: &str) -> Action {
        self.replace.titled(change, title)
    }

    /// This section's single-key reducer map.
    pub fn reducer_map(&self) -> ReducerMap {
        ReducerMap::single(Arc::new(self.reducer.clone()))
    }

    pub fn bundle(&self) -> SectionBundle {
        SectionBundle {
            reducer: self.reducer_map(),
            select: self.selector.clone(),
            update: self.update.clone(),
            replace: self.replace.clone(),
        }
    }
}
