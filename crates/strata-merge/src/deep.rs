//! Deep clone and deep freeze helpers.

use serde_json::Value;
use strata_types::Node;

use crate::error::{MergeError, MergeResult};

/// Produce a fully independent copy of `node` by a JSON text round-trip.
///
/// The copy shares no allocation with the input. The round-trip is lossy in
/// the same way JSON text is: numbers that are not finite come back as `null`.
pub fn deep_clone(node: &Node) -> MergeResult<Node> {
    let text = serde_json::to_string(node).map_err(|e| MergeError::Serialization(e.to_string()))?;
    let value: Value =
        serde_json::from_str(&text).map_err(|e| MergeError::Serialization(e.to_string()))?;
    Ok(Node::from(value))
}

/// Freeze a mutable JSON graph into an immutable state tree.
///
/// Every reachable object and array becomes a shared, read-only node. Nodes
/// expose no mutation, so the returned tree stays frozen for as long as it
/// lives.
pub fn deep_freeze(value: Value) -> Node {
    Node::from(value)
}
