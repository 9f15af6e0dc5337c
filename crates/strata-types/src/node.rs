use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Keyed children of a mapping node.
pub type Mapping = BTreeMap<String, Node>;

/// Largest magnitude at which every integer is exactly representable in an `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// An atomic leaf of the state tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(f64),
    String(Arc<str>),
}

/// A node of an immutable state tree.
///
/// Mappings and arrays live behind an `Arc`, so cloning a node never copies
/// its children: two clones refer to the same allocation and
/// [`Node::ptr_eq`] reports them as identical. There is no in-place mutation;
/// every change produces a new node along the changed path.
///
/// Only [`Node::Mapping`] is traversable by a merge. Arrays and scalars are
/// always replaced as a whole.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Mapping(Arc<Mapping>),
    Array(Arc<Vec<Node>>),
    Scalar(Scalar),
}

impl Node {
    /// The `null` scalar.
    pub const fn null() -> Self {
        Self::Scalar(Scalar::Null)
    }

    /// A fresh mapping node with no keys.
    pub fn empty_mapping() -> Self {
        Self::Mapping(Arc::new(Mapping::new()))
    }

    /// Build a mapping node from key/value pairs.
    pub fn mapping<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Node>,
    {
        pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect()
    }

    /// Build an array node.
    pub fn array<V: Into<Node>>(items: impl IntoIterator<Item = V>) -> Self {
        Self::Array(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    /// Returns `true` if a merge may descend into this node.
    pub fn is_traversable(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Null))
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Scalar(Scalar::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Child under `key`, if this is a mapping that has one.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Follow a chain of mapping keys from this node.
    pub fn at(&self, path: &[&str]) -> Option<&Node> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Returns `true` if this mapping node has a child under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of children for mappings and arrays, zero for scalars.
    pub fn len(&self) -> usize {
        match self {
            Self::Mapping(m) => m.len(),
            Self::Array(a) => a.len(),
            Self::Scalar(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reference identity.
    ///
    /// Mappings and arrays are identical only when they share an allocation.
    /// Scalars have no identity of their own and compare by value.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        match (self, other) {
            (Self::Mapping(a), Self::Mapping(b)) => Arc::ptr_eq(a, b),
            (Self::Array(a), Self::Array(b)) => Arc::ptr_eq(a, b),
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            _ => false,
        }
    }

    /// Short name of the node's kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Mapping(_) => "mapping",
            Self::Array(_) => "array",
            Self::Scalar(Scalar::Null) => "null",
            Self::Scalar(Scalar::Bool(_)) => "bool",
            Self::Scalar(Scalar::Number(_)) => "number",
            Self::Scalar(Scalar::String(_)) => "string",
        }
    }

    /// Convert into a mutable `serde_json::Value` graph.
    pub fn to_json(&self) -> Value {
        Value::from(self)
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::null()
    }
}

impl FromIterator<(String, Node)> for Node {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        Self::Mapping(Arc::new(iter.into_iter().collect()))
    }
}

impl From<Mapping> for Node {
    fn from(m: Mapping) -> Self {
        Self::Mapping(Arc::new(m))
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Self::Array(Arc::new(items))
    }
}

impl From<Scalar> for Node {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }
}

impl From<f64> for Node {
    fn from(n: f64) -> Self {
        Self::Scalar(Scalar::Number(n))
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Self::Scalar(Scalar::Number(n as f64))
    }
}

impl From<i32> for Node {
    fn from(n: i32) -> Self {
        Self::Scalar(Scalar::Number(f64::from(n)))
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Self::Scalar(Scalar::String(Arc::from(s)))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Self::Scalar(Scalar::String(Arc::from(s)))
    }
}

// ---------------------------------------------------------------------------
// JSON interop
// ---------------------------------------------------------------------------

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::null(),
            Value::Bool(b) => b.into(),
            Value::Number(n) => n.as_f64().unwrap_or_default().into(),
            Value::String(s) => s.into(),
            Value::Array(items) => items.into_iter().map(Node::from).collect::<Vec<_>>().into(),
            Value::Object(map) => map.into_iter().map(|(k, v)| (k, Node::from(v))).collect(),
        }
    }
}

impl From<&Node> for Value {
    fn from(node: &Node) -> Self {
        match node {
            Node::Mapping(m) => Value::Object(
                m.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
            Node::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            Node::Scalar(Scalar::Null) => Value::Null,
            Node::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
            Node::Scalar(Scalar::Number(n)) => number_to_json(*n),
            Node::Scalar(Scalar::String(s)) => Value::String(s.to_string()),
        }
    }
}

/// Integral numbers become JSON integers; non-finite numbers have no JSON
/// form and become `null`.
fn number_to_json(n: f64) -> Value {
    if is_safe_integer(n) {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

fn is_safe_integer(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Mapping(m) => {
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Node::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Scalar(Scalar::Null) => serializer.serialize_unit(),
            Node::Scalar(Scalar::Bool(b)) => serializer.serialize_bool(*b),
            Node::Scalar(Scalar::Number(n)) if is_safe_integer(*n) => {
                serializer.serialize_i64(*n as i64)
            }
            Node::Scalar(Scalar::Number(n)) if n.is_finite() => serializer.serialize_f64(*n),
            Node::Scalar(Scalar::Number(_)) => serializer.serialize_unit(),
            Node::Scalar(Scalar::String(s)) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Node::from)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
