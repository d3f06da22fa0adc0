//! In-memory graph storage, used by the CLI and by tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::{GraphModelAccess, GraphNode};
use crate::error::Result;

/// On-disk form of a model: a flat list of node snapshots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelDocument {
    pub nodes: Vec<GraphNode>,
}

/// Graph storage backed by a path-keyed map
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    nodes: HashMap<String, GraphNode>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(document: ModelDocument) -> Self {
        let mut graph = Self::new();
        for node in document.nodes {
            graph.insert(node);
        }
        graph
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let document: ModelDocument = serde_json::from_str(json)?;
        Ok(Self::from_document(document))
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }

    /// Insert or replace a node, returning its path
    pub fn insert(&mut self, node: GraphNode) -> String {
        let path = node.path.clone();
        self.nodes.insert(path.clone(), node);
        path
    }

    /// Insert `node` and append it to `parent`'s children
    ///
    /// Does nothing to the containment list when `parent` is not stored.
    pub fn add_child(&mut self, parent: &str, node: GraphNode) -> String {
        let path = self.insert(node);
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(path.clone());
        }
        path
    }

    pub fn node(&self, path: &str) -> Option<&GraphNode> {
        self.nodes.get(path)
    }

    pub fn node_mut(&mut self, path: &str) -> Option<&mut GraphNode> {
        self.nodes.get_mut(path)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[async_trait]
impl GraphModelAccess for MemoryGraph {
    async fn get_node(&self, path: &str) -> Result<Option<GraphNode>> {
        Ok(self.nodes.get(path).cloned())
    }
}
