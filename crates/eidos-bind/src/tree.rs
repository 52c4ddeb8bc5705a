//! The value tree: an untyped intermediate structure assembled from flat
//! key-path/value pairs.
//!
//! Each node is unset until first accessed; the first access pattern fixes
//! its kind for good. A numeric path segment makes a node an array and
//! indexes into it (growing as needed, with gaps left unset); any other
//! segment makes it an object and addresses a field. Later accesses that
//! contradict an established kind are discarded rather than mutating the
//! node, consistent with the best-effort nature of binding.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::key::split_key;

/// A node in the value tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValueNode {
    /// Not yet written. Converts to `null`.
    #[default]
    Unset,
    /// A raw scalar, always carried as the original string.
    Scalar(String),
    /// An ordered, possibly sparse list.
    Array(Vec<ValueNode>),
    /// Named children in insertion order.
    Object(IndexMap<String, ValueNode>),
}

impl ValueNode {
    /// An empty object root.
    #[must_use]
    pub fn root() -> Self {
        Self::Object(IndexMap::new())
    }

    /// Builds a tree from key/value pairs, splitting each key into path
    /// segments.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut root = Self::root();
        for (key, value) in pairs {
            root.assign_split(key.as_ref(), value.as_ref());
        }
        root
    }

    /// Assigns a value at the path spelled by the key's segments.
    pub fn assign_split(&mut self, key: &str, value: &str) {
        let segments = split_key(key);
        let mut node = Some(&mut *self);
        for segment in &segments {
            node = node.and_then(|n| n.descend(segment));
        }
        if let Some(leaf) = node {
            leaf.set(value);
        }
    }

    /// Assigns a value under a single field name, without splitting the key.
    pub fn set_field(&mut self, key: &str, value: &str) {
        if let Some(node) = self.descend(key) {
            node.set(value);
        }
    }

    /// Whether the node has never been written.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Descends one segment, creating the child if needed. A numeric segment
    /// addresses an array element, any other an object field. Returns `None`
    /// when the segment contradicts the node's established kind.
    pub fn descend(&mut self, segment: &str) -> Option<&mut ValueNode> {
        match segment.parse::<usize>() {
            Ok(index) => {
                if matches!(self, Self::Unset) {
                    *self = Self::Array(Vec::new());
                }
                let Self::Array(items) = self else {
                    return None;
                };
                if items.len() <= index {
                    items.resize_with(index + 1, ValueNode::default);
                }
                Some(&mut items[index])
            }
            Err(_) => {
                if matches!(self, Self::Unset) {
                    *self = Self::Object(IndexMap::new());
                }
                let Self::Object(fields) = self else {
                    return None;
                };
                Some(fields.entry(segment.to_owned()).or_default())
            }
        }
    }

    /// Writes a scalar value. Discarded when the node is already an array or
    /// object.
    pub fn set(&mut self, value: impl Into<String>) {
        match self {
            Self::Unset | Self::Scalar(_) => *self = Self::Scalar(value.into()),
            Self::Array(_) | Self::Object(_) => {}
        }
    }

    /// Converts the tree to a JSON value without any type information:
    /// scalars stay strings, gaps become `null`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Unset => Value::Null,
            Self::Scalar(raw) => Value::String(raw.clone()),
            Self::Array(items) => Value::Array(items.iter().map(ValueNode::to_value).collect()),
            Self::Object(fields) => {
                let mut map = Map::new();
                for (key, child) in fields {
                    map.insert(key.clone(), child.to_value());
                }
                Value::Object(map)
            }
        }
    }
}
