//! Patches: keyed change sets applied to state nodes.
//!
//! A [`Patch`] maps keys to [`PatchEntry`] values. An entry is either the
//! absent marker (delete the key), a replacement [`Node`], or a nested patch
//! to merge into the child under that key.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::{TypeError, TypeResult};
use crate::node::{Mapping, Node};

/// Token that stands for the absent marker in JSON-encoded patches.
pub const DEFAULT_ABSENT_TOKEN: &str = "$absent";

/// The change requested for a single key.
#[derive(Clone, Debug, PartialEq)]
pub enum PatchEntry {
    /// Remove the key.
    Absent,
    /// Put this node under the key. A mapping node is still merged into an
    /// existing mapping, as a patch without absent markers.
    Value(Node),
    /// Merge this patch into the existing child.
    Nested(Patch),
}

impl PatchEntry {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The node this entry would leave behind if assigned as a whole.
    /// `None` for the absent marker.
    pub fn to_node(&self) -> Option<Node> {
        match self {
            Self::Absent => None,
            Self::Value(node) => Some(node.clone()),
            Self::Nested(patch) => Some(patch.to_node()),
        }
    }
}

impl From<Node> for PatchEntry {
    fn from(node: Node) -> Self {
        Self::Value(node)
    }
}

impl From<Patch> for PatchEntry {
    fn from(patch: Patch) -> Self {
        Self::Nested(patch)
    }
}

impl From<Option<Node>> for PatchEntry {
    fn from(node: Option<Node>) -> Self {
        node.map_or(Self::Absent, Self::Value)
    }
}

/// A keyed change set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Patch {
    entries: BTreeMap<String, PatchEntry>,
}

impl Patch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// A patch that assigns every child of `mapping`.
    pub fn from_mapping(mapping: &Mapping) -> Self {
        mapping
            .iter()
            .map(|(k, v)| (k.clone(), PatchEntry::Value(v.clone())))
            .collect()
    }

    /// Builder: add an entry for `key`.
    pub fn with(mut self, key: impl Into<String>, entry: impl Into<PatchEntry>) -> Self {
        self.insert(key, entry);
        self
    }

    /// Builder: mark `key` for removal.
    pub fn with_absent(self, key: impl Into<String>) -> Self {
        self.with(key, PatchEntry::Absent)
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: impl Into<PatchEntry>) {
        self.entries.insert(key.into(), entry.into());
    }

    pub fn get(&self, key: &str) -> Option<&PatchEntry> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Top-level keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PatchEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Materialise the patch as a mapping node. Absent entries leave no key.
    pub fn to_node(&self) -> Node {
        self.entries
            .iter()
            .filter_map(|(k, entry)| entry.to_node().map(|node| (k.clone(), node)))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Patch
where
    K: Into<String>,
    V: Into<PatchEntry>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Patch {
    type Item = (&'a String, &'a PatchEntry);
    type IntoIter = std::collections::btree_map::Iter<'a, String, PatchEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for Patch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, entry) in &self.entries {
            match entry {
                PatchEntry::Absent => map.serialize_entry(k, DEFAULT_ABSENT_TOKEN)?,
                PatchEntry::Value(node) => map.serialize_entry(k, node)?,
                PatchEntry::Nested(patch) => map.serialize_entry(k, patch)?,
            }
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// PatchCodec
// ---------------------------------------------------------------------------

/// Reads and writes patches as JSON.
///
/// JSON has no "undefined", so the absent marker is spelled as a reserved
/// string. Objects decode to nested patches; every other value decodes to a
/// replacement node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchCodec {
    pub absent_token: String,
}

impl Default for PatchCodec {
    fn default() -> Self {
        Self {
            absent_token: DEFAULT_ABSENT_TOKEN.to_string(),
        }
    }
}

impl PatchCodec {
    pub fn new(absent_token: impl Into<String>) -> Self {
        Self {
            absent_token: absent_token.into(),
        }
    }

    /// Decode a JSON object into a patch.
    pub fn decode(&self, value: &Value) -> TypeResult<Patch> {
        match value {
            Value::Object(map) => Ok(self.decode_map(map)),
            other => Err(TypeError::NotAMapping {
                found: json_kind(other),
            }),
        }
    }

    fn decode_map(&self, map: &serde_json::Map<String, Value>) -> Patch {
        map.iter()
            .map(|(k, v)| (k.clone(), self.decode_entry(v)))
            .collect()
    }

    /// Parse JSON text and decode it into a patch.
    pub fn decode_str(&self, text: &str) -> TypeResult<Patch> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| TypeError::Serialization(e.to_string()))?;
        self.decode(&value)
    }

    fn decode_entry(&self, value: &Value) -> PatchEntry {
        match value {
            Value::String(s) if *s == self.absent_token => PatchEntry::Absent,
            Value::Object(map) => PatchEntry::Nested(self.decode_map(map)),
            other => PatchEntry::Value(Node::from(other.clone())),
        }
    }

    /// Encode a patch as a JSON object, spelling absent entries with the token.
    pub fn encode(&self, patch: &Patch) -> Value {
        Value::Object(
            patch
                .iter()
                .map(|(k, entry)| {
                    let value = match entry {
                        PatchEntry::Absent => Value::String(self.absent_token.clone()),
                        PatchEntry::Value(node) => node.to_json(),
                        PatchEntry::Nested(nested) => self.encode(nested),
                    };
                    (k.clone(), value)
                })
                .collect(),
        )
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}
