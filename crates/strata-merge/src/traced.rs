//! Traced merge: copy-on-write deep merge with structural sharing.
//!
//! States are [`Node`] trees. For every key of the patch:
//!
//! - the absent marker removes the key,
//! - a mapping patched onto a mapping is merged recursively,
//! - anything else replaces the current value as a whole.
//!
//! Keys the patch does not mention keep their original `Arc`, at every depth.

use strata_types::{Mapping, Node, Patch, PatchEntry};
use tracing::{trace, warn};

/// Where the changes for one mapping come from.
#[derive(Clone, Copy)]
enum Changes<'a> {
    Patch(&'a Patch),
    /// A plain mapping used as a patch: every child is an assignment.
    Plain(&'a Mapping),
}

/// A borrowed view of one change.
#[derive(Clone, Copy)]
enum Change<'a> {
    Absent,
    Assign(&'a Node),
    Merge(&'a Patch),
}

impl<'a> From<&'a PatchEntry> for Change<'a> {
    fn from(entry: &'a PatchEntry) -> Self {
        match entry {
            PatchEntry::Absent => Self::Absent,
            PatchEntry::Value(node) => Self::Assign(node),
            PatchEntry::Nested(patch) => Self::Merge(patch),
        }
    }
}

/// Apply `patch` to `source` and return the new state.
///
/// `source` is never modified. The result is always a freshly allocated
/// mapping, even for an empty patch; children not mentioned by the patch are
/// the very same nodes as in `source`. A `source` that is not a mapping is
/// treated as an empty mapping.
pub fn traced_merge(source: &Node, patch: &Patch) -> Node {
    trace!(keys = patch.len(), "traced merge");
    let empty = Mapping::new();
    let base = match source.as_mapping() {
        Some(mapping) => mapping,
        None => {
            if !source.is_null() {
                warn!(
                    kind = source.kind_name(),
                    "merge source is not a mapping, treating it as empty"
                );
            }
            &empty
        }
    };
    Node::from(merge_mapping(base, Changes::Patch(patch)))
}

/// Like [`traced_merge`], with a missing source treated as an empty mapping.
pub fn traced_merge_opt(source: Option<&Node>, patch: &Patch) -> Node {
    match source {
        Some(node) => traced_merge(node, patch),
        None => traced_merge(&Node::empty_mapping(), patch),
    }
}

fn merge_mapping(source: &Mapping, changes: Changes<'_>) -> Mapping {
    // Shallow copy: children are shared, not cloned.
    let mut result = source.clone();
    match changes {
        Changes::Patch(patch) => {
            for (key, entry) in patch {
                apply(&mut result, key, entry.into());
            }
        }
        Changes::Plain(mapping) => {
            for (key, node) in mapping {
                apply(&mut result, key, Change::Assign(node));
            }
        }
    }
    result
}

fn apply(result: &mut Mapping, key: &str, change: Change<'_>) {
    let next = match change {
        Change::Absent => {
            result.remove(key);
            return;
        }
        Change::Assign(node) => match (result.get(key), node) {
            (Some(Node::Mapping(current)), Node::Mapping(plain)) => {
                Node::from(merge_mapping(current, Changes::Plain(plain)))
            }
            _ => node.clone(),
        },
        Change::Merge(patch) => match result.get(key) {
            Some(Node::Mapping(current)) => Node::from(merge_mapping(current, Changes::Patch(patch))),
            _ => patch.to_node(),
        },
    };
    result.insert(key.to_string(), next);
}
