//! # Model Extraction
//!
//! Shapes a loaded [`NodeIndex`] into [`ComponentInfo`] view models, one per
//! ComponentType node, in index order.

use crate::graph::{AttributeValue, GraphNode};
use crate::loader::NodeIndex;
use crate::metadata::{MetaClassifier, NodeKind};
use crate::model::{ComponentInfo, GuardInfo, StateInfo, TransitionInfo};

/// Builds component view models from a node index
pub struct ModelExtractor<'a> {
    index: &'a NodeIndex,
    classifier: MetaClassifier<'a>,
}

impl<'a> ModelExtractor<'a> {
    pub fn new(index: &'a NodeIndex) -> Self {
        Self {
            index,
            classifier: MetaClassifier::new(index.meta()),
        }
    }

    /// Extract every ComponentType in the index, in index order
    pub fn extract(&self) -> Vec<ComponentInfo> {
        self.index
            .iter()
            .filter(|node| self.classifier.is_component_type(node))
            .map(|node| self.component_info(node))
            .collect()
    }

    fn component_info(&self, node: &GraphNode) -> ComponentInfo {
        let mut transitions = Vec::new();
        let mut states = Vec::new();
        let mut guards = Vec::new();

        for child in self.index.children_of(node) {
            match self.classifier.classify_child(child) {
                NodeKind::Transition => transitions.push(self.transition_info(child)),
                NodeKind::State => states.push(self.state_info(child)),
                NodeKind::Guard => guards.push(self.guard_info(child)),
                NodeKind::Unclassified => {}
            }
        }

        ComponentInfo {
            name: node.name(),
            path: node.path.clone(),
            cardinality: attribute(node, "cardinality"),
            definitions: attribute(node, "definitions"),
            forwards: attribute(node, "forwards"),
            constructors: attribute(node, "constructors"),
            transitions,
            states,
            guards,
        }
    }

    fn transition_info(&self, node: &GraphNode) -> TransitionInfo {
        TransitionInfo {
            name: node.name(),
            type_name: self.classifier.type_name(node),
            path: node.path.clone(),
            src: self.resolve_pointer_name(node, "src"),
            dst: self.resolve_pointer_name(node, "dst"),
            guard: attribute(node, "guardName"),
            transition_method: attribute(node, "transitionMethod"),
        }
    }

    fn state_info(&self, node: &GraphNode) -> StateInfo {
        StateInfo {
            name: node.name(),
            type_name: self.classifier.type_name(node),
            path: node.path.clone(),
        }
    }

    fn guard_info(&self, node: &GraphNode) -> GuardInfo {
        GuardInfo {
            name: node.name(),
            type_name: self.classifier.type_name(node),
            path: node.path.clone(),
            guard_method: attribute(node, "guardMethod"),
        }
    }

    /// Name of the pointer's target, empty when unset or outside the index
    fn resolve_pointer_name(&self, node: &GraphNode, pointer: &str) -> String {
        let Some(target) = node.pointer_target(pointer) else {
            return String::new();
        };

        match self.index.get(target) {
            Some(target_node) => target_node.name(),
            None => {
                tracing::warn!(
                    "[EXTRACT] Pointer '{}' of {} targets {} outside the loaded model",
                    pointer,
                    node.path,
                    target
                );
                String::new()
            }
        }
    }
}

fn attribute(node: &GraphNode, name: &str) -> AttributeValue {
    node.attribute(name).cloned().unwrap_or_default()
}
