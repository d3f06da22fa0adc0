//! # Model Loader
//!
//! Materializes the containment subtree below a root node into a flat,
//! path-keyed [`NodeIndex`], together with every meta-type node those nodes
//! refer to.

use indexmap::IndexMap;
use std::collections::{HashSet, VecDeque};

use crate::error::{GenError, Result};
use crate::graph::{GraphModelAccess, GraphNode, BASE_POINTER};
use crate::metadata::{MetaModel, MAX_META_DEPTH};

/// Flat index of a loaded subtree
///
/// Holds the root and everything reachable from it through child edges,
/// iterated in discovery order. Nodes reachable only through pointers are
/// never members.
#[derive(Debug, Clone)]
pub struct NodeIndex {
    root: String,
    nodes: IndexMap<String, GraphNode>,
    meta: MetaModel,
}

impl NodeIndex {
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn get(&self, path: &str) -> Option<&GraphNode> {
        self.nodes.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    /// Nodes in the order they were discovered
    pub fn iter(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn meta(&self) -> &MetaModel {
        &self.meta
    }

    /// Immediate children of `node` that are members of this index
    pub fn children_of<'a>(&'a self, node: &'a GraphNode) -> impl Iterator<Item = &'a GraphNode> {
        node.child_paths()
            .iter()
            .filter_map(move |path| self.nodes.get(path))
    }
}

/// Loads subtrees from a graph storage
pub struct ModelLoader<'a> {
    access: &'a dyn GraphModelAccess,
}

impl<'a> ModelLoader<'a> {
    pub fn new(access: &'a dyn GraphModelAccess) -> Self {
        Self { access }
    }

    /// Load `root` and its containment subtree
    ///
    /// Fails with [`GenError::NodeNotFound`] when the root cannot be resolved.
    /// Children that cannot be resolved are skipped with a warning.
    pub async fn load(&self, root: &str) -> Result<NodeIndex> {
        let root_node = self
            .access
            .get_node(root)
            .await?
            .ok_or_else(|| GenError::NodeNotFound(root.to_string()))?;

        let mut nodes: IndexMap<String, GraphNode> = IndexMap::new();
        let mut queue: VecDeque<String> = root_node.child_paths().iter().cloned().collect();
        nodes.insert(root.to_string(), root_node);

        while let Some(path) = queue.pop_front() {
            if nodes.contains_key(&path) {
                continue;
            }

            let Some(node) = self.access.get_node(&path).await? else {
                tracing::warn!("[LOADER] Child {} could not be resolved, skipping", path);
                continue;
            };

            for child in node.child_paths() {
                if !nodes.contains_key(child) {
                    queue.push_back(child.clone());
                }
            }
            nodes.insert(path, node);
        }

        let mut meta = MetaModel::new();
        let mut missing: HashSet<String> = HashSet::new();
        for node in nodes.values() {
            self.resolve_meta_chain(node.meta_type(), &mut meta, &mut missing)
                .await?;
        }

        tracing::debug!(
            "[LOADER] Loaded {} nodes and {} meta-types below {}",
            nodes.len(),
            meta.len(),
            root
        );

        Ok(NodeIndex {
            root: root.to_string(),
            nodes,
            meta,
        })
    }

    /// Fetch a meta-type and its bases until a known or unresolvable type
    async fn resolve_meta_chain(
        &self,
        start: Option<&str>,
        meta: &mut MetaModel,
        missing: &mut HashSet<String>,
    ) -> Result<()> {
        let mut current = start.map(str::to_string);
        let mut depth = 0;

        while let Some(path) = current.take() {
            if meta.contains(&path) || missing.contains(&path) {
                break;
            }
            if depth >= MAX_META_DEPTH {
                tracing::warn!(
                    "[LOADER] Meta-type chain exceeds {} levels at {}",
                    MAX_META_DEPTH,
                    path
                );
                break;
            }
            depth += 1;

            match self.access.get_node(&path).await? {
                Some(meta_node) => {
                    current = meta_node.pointer_target(BASE_POINTER).map(str::to_string);
                    meta.insert(meta_node);
                }
                None => {
                    tracing::warn!("[LOADER] Meta-type {} could not be resolved", path);
                    missing.insert(path);
                }
            }
        }

        Ok(())
    }
}
