//! # Meta-Type Metadata
//!
//! Meta-type nodes describing what each model node is, and the nominal
//! subtyping test the rest of the pipeline classifies nodes with.
//!
//! Meta-types form a single-inheritance chain through their `base` pointer.
//! Types are matched by display name, so two meta nodes sharing a name are
//! indistinguishable to [`MetaClassifier::is_kind`].

use std::collections::{HashMap, HashSet};

use crate::graph::{GraphNode, BASE_POINTER};

/// Meta-type display names the generator is coupled to
pub mod vocabulary {
    pub const COMPONENT_TYPE: &str = "ComponentType";
    pub const TRANSITION_BASE: &str = "TransitionBase";
    pub const STATE_BASE: &str = "StateBase";
    pub const STATE: &str = "State";
    pub const INITIAL_STATE: &str = "InitialState";
    pub const GUARD: &str = "Guard";
}

/// Upper bound on base-chain length; longer chains are treated as malformed
pub const MAX_META_DEPTH: usize = 64;

/// Meta-type nodes reachable from a loaded subtree, keyed by path
#[derive(Debug, Clone, Default)]
pub struct MetaModel {
    types: HashMap<String, GraphNode>,
}

impl MetaModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: GraphNode) {
        self.types.insert(node.path.clone(), node);
    }

    pub fn get(&self, path: &str) -> Option<&GraphNode> {
        self.types.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.types.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// How the extractor treats a child of a ComponentType
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Transition,
    State,
    Guard,
    Unclassified,
}

/// Answers "does this node's meta-type derive from the named type?"
pub struct MetaClassifier<'a> {
    meta: &'a MetaModel,
}

impl<'a> MetaClassifier<'a> {
    pub fn new(meta: &'a MetaModel) -> Self {
        Self { meta }
    }

    /// True when `type_name` names the node's meta-type or one of its bases
    ///
    /// The walk stops on a revisited meta node or after [`MAX_META_DEPTH`]
    /// steps and answers `false` for such a malformed chain.
    pub fn is_kind(&self, node: &GraphNode, type_name: &str) -> bool {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = node.meta_type();

        while let Some(path) = current {
            if !visited.insert(path) || visited.len() > MAX_META_DEPTH {
                tracing::warn!(
                    "[META] Malformed base chain for {} (at {}), treating as not a {}",
                    node.path,
                    path,
                    type_name
                );
                return false;
            }

            let Some(meta) = self.meta.get(path) else {
                tracing::debug!("[META] Meta-type {} of {} is not loaded", path, node.path);
                return false;
            };

            if meta.name() == type_name {
                return true;
            }
            current = meta.pointer_target(BASE_POINTER);
        }

        false
    }

    /// First-match dispatch used for ComponentType children
    pub fn classify_child(&self, node: &GraphNode) -> NodeKind {
        if self.is_kind(node, vocabulary::TRANSITION_BASE) {
            NodeKind::Transition
        } else if self.is_kind(node, vocabulary::STATE_BASE) {
            NodeKind::State
        } else if self.is_kind(node, vocabulary::GUARD) {
            NodeKind::Guard
        } else {
            NodeKind::Unclassified
        }
    }

    pub fn is_component_type(&self, node: &GraphNode) -> bool {
        self.is_kind(node, vocabulary::COMPONENT_TYPE)
    }

    /// `State` or `InitialState`, the kinds whose names must be unique per component
    pub fn is_state_like(&self, node: &GraphNode) -> bool {
        self.is_kind(node, vocabulary::STATE) || self.is_kind(node, vocabulary::INITIAL_STATE)
    }

    /// Display name of the node's own meta-type, empty when unresolved
    pub fn type_name(&self, node: &GraphNode) -> String {
        node.meta_type()
            .and_then(|path| self.meta.get(path))
            .map(GraphNode::name)
            .unwrap_or_default()
    }
}
