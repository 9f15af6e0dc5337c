use strata_types::Node;

use crate::path::SectionPath;

/// Projects the global state onto one section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    path: SectionPath,
}

impl Selector {
    pub fn new(path: SectionPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &SectionPath {
        &self.path
    }

    /// The section's slice of `global`, if present.
    pub fn select<'a>(&self, global: &'a Node) -> Option<&'a Node> {
        global.get(self.path.as_str())
    }
}
