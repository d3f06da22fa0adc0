//! # Graph Model Access
//!
//! Read-only view over the host's node graph. Nodes are addressed by path and
//! carry scalar attributes, named pointers, an ordered list of contained
//! children and a reference to their defining meta-type node.
//!
//! The generator only ever depends on [`GraphModelAccess`]; any storage that
//! can hand out [`GraphNode`] snapshots can drive it.

mod builder;
mod memory;

pub use builder::{meta_path, BehaviorModelBuilder, ROOT_PATH};
pub use memory::{MemoryGraph, ModelDocument};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::Result;

/// Name of the pointer slot linking a meta-type node to its base type
pub const BASE_POINTER: &str = "base";

/// Read-only capability over the host's graph storage
#[async_trait]
pub trait GraphModelAccess: Send + Sync {
    /// Resolve a node by path, `Ok(None)` when nothing lives there
    async fn get_node(&self, path: &str) -> Result<Option<GraphNode>>;
}

/// A scalar attribute value, kept exactly as the model stores it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Textual form of the value; strings are returned unchanged
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl Default for AttributeValue {
    fn default() -> Self {
        AttributeValue::String(String::new())
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::Float(x) => write!(f, "{}", x),
            AttributeValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

/// Snapshot of a single node as handed out by the graph storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub path: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
    /// Named pointer slots; `None` is a declared but unset slot
    #[serde(default)]
    pub pointers: BTreeMap<String, Option<String>>,
    /// Contained children in declaration order
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub meta_type: Option<String>,
}

impl GraphNode {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            attributes: BTreeMap::new(),
            pointers: BTreeMap::new(),
            children: Vec::new(),
            meta_type: None,
        }
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn with_name(self, name: &str) -> Self {
        self.with_attribute("name", name)
    }

    pub fn with_pointer(mut self, name: &str, target: Option<&str>) -> Self {
        self.pointers
            .insert(name.to_string(), target.map(str::to_string));
        self
    }

    pub fn with_meta_type(mut self, meta_path: &str) -> Self {
        self.meta_type = Some(meta_path.to_string());
        self
    }

    pub fn with_child(mut self, child_path: &str) -> Self {
        self.children.push(child_path.to_string());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// The `name` attribute as text, empty when unset
    pub fn name(&self) -> String {
        self.attribute("name")
            .map(AttributeValue::to_text)
            .unwrap_or_default()
    }

    /// Target path of a pointer slot, `None` when the slot is unset or missing
    pub fn pointer_target(&self, name: &str) -> Option<&str> {
        self.pointers.get(name).and_then(|target| target.as_deref())
    }

    pub fn child_paths(&self) -> &[String] {
        &self.children
    }

    pub fn meta_type(&self) -> Option<&str> {
        self.meta_type.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_and_missing_pointers_have_no_target() {
        let node = GraphNode::new("/t")
            .with_pointer("src", Some("/a"))
            .with_pointer("dst", None);

        assert_eq!(node.pointer_target("src"), Some("/a"));
        assert_eq!(node.pointer_target("dst"), None);
        assert_eq!(node.pointer_target("other"), None);
    }

    #[test]
    fn attributes_deserialize_without_coercion() {
        let node: GraphNode = serde_json::from_str(
            r#"{"path": "/c", "attributes": {"name": "Blinker", "cardinality": 3, "flag": true}}"#,
        )
        .unwrap();

        assert_eq!(node.name(), "Blinker");
        assert_eq!(node.attribute("cardinality"), Some(&AttributeValue::Integer(3)));
        assert_eq!(node.attribute("flag"), Some(&AttributeValue::Bool(true)));
        assert!(node.children.is_empty());
        assert_eq!(node.meta_type(), None);
    }
}
