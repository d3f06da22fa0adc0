//! Builder for behavior models held in a [`MemoryGraph`].
//!
//! Seeds the graph with the behavior meta-model (`ComponentType`, the state
//! and transition hierarchies, `Guard`) and a project root, then lets callers
//! add components and their children by name.

use super::{GraphNode, MemoryGraph, BASE_POINTER};
use crate::metadata::vocabulary;

pub const ROOT_PATH: &str = "/root";
pub const META_PREFIX: &str = "/meta";

/// Incrementally builds a behavior model
#[derive(Debug, Clone)]
pub struct BehaviorModelBuilder {
    graph: MemoryGraph,
    next_id: usize,
}

impl Default for BehaviorModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BehaviorModelBuilder {
    pub fn new() -> Self {
        let mut graph = MemoryGraph::new();
        let meta_types: [(&str, Option<&str>); 8] = [
            ("FCO", None),
            (vocabulary::COMPONENT_TYPE, Some("FCO")),
            (vocabulary::STATE_BASE, Some("FCO")),
            (vocabulary::STATE, Some(vocabulary::STATE_BASE)),
            (vocabulary::INITIAL_STATE, Some(vocabulary::STATE_BASE)),
            (vocabulary::TRANSITION_BASE, Some("FCO")),
            ("Transition", Some(vocabulary::TRANSITION_BASE)),
            (vocabulary::GUARD, Some("FCO")),
        ];
        for (name, base) in meta_types {
            let base_path = base.map(meta_path);
            graph.insert(
                GraphNode::new(meta_path(name))
                    .with_name(name)
                    .with_pointer(BASE_POINTER, base_path.as_deref()),
            );
        }
        graph.insert(GraphNode::new(ROOT_PATH).with_name("ROOT"));

        Self { graph, next_id: 0 }
    }

    fn next_path(&mut self, parent: &str) -> String {
        self.next_id += 1;
        format!("{}/{}", parent, self.next_id)
    }

    /// Add any node below `parent`; its path is assigned by the builder
    pub fn node(&mut self, parent: &str, mut node: GraphNode) -> String {
        node.path = self.next_path(parent);
        self.graph.add_child(parent, node)
    }

    fn typed(&mut self, parent: &str, meta: &str, name: &str) -> String {
        let node = GraphNode::new("").with_name(name).with_meta_type(&meta_path(meta));
        self.node(parent, node)
    }

    /// Add a ComponentType directly below the root
    pub fn component(&mut self, name: &str) -> String {
        self.typed(ROOT_PATH, vocabulary::COMPONENT_TYPE, name)
    }

    pub fn state(&mut self, parent: &str, name: &str) -> String {
        self.typed(parent, vocabulary::STATE, name)
    }

    pub fn initial_state(&mut self, parent: &str, name: &str) -> String {
        self.typed(parent, vocabulary::INITIAL_STATE, name)
    }

    /// Add a transition; `src`/`dst` are node paths, `None` leaves the slot unset
    pub fn transition(
        &mut self,
        parent: &str,
        name: &str,
        src: Option<&str>,
        dst: Option<&str>,
        guard: &str,
        method: &str,
    ) -> String {
        let node = GraphNode::new("")
            .with_name(name)
            .with_meta_type(&meta_path("Transition"))
            .with_pointer("src", src)
            .with_pointer("dst", dst)
            .with_attribute("guardName", guard)
            .with_attribute("transitionMethod", method);
        self.node(parent, node)
    }

    pub fn guard(&mut self, parent: &str, name: &str, method: &str) -> String {
        let node = GraphNode::new("")
            .with_name(name)
            .with_meta_type(&meta_path(vocabulary::GUARD))
            .with_attribute("guardMethod", method);
        self.node(parent, node)
    }

    /// Mutable access for attributes the helpers do not cover
    pub fn graph_mut(&mut self) -> &mut MemoryGraph {
        &mut self.graph
    }

    pub fn graph(&self) -> &MemoryGraph {
        &self.graph
    }

    pub fn build(self) -> MemoryGraph {
        self.graph
    }
}

/// Path of the meta-type node with the given display name
pub fn meta_path(name: &str) -> String {
    format!("{}/{}", META_PREFIX, name)
}
