//! # Model Validation
//!
//! Naming rules a model has to satisfy before any file is generated:
//!
//! - every ComponentType name is a legal, non-reserved identifier of the
//!   target language
//! - ComponentType names are unique across the whole index
//! - `State`/`InitialState` names are unique among the immediate children of
//!   each ComponentType
//!
//! All findings of a single pass are returned; nothing short-circuits.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::graph::GraphNode;
use crate::language::TargetLanguage;
use crate::loader::NodeIndex;
use crate::metadata::MetaClassifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    IllegalName,
    DuplicatedName,
}

/// A broken naming rule, attached to the node it was found on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Path of the offending node
    pub node: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.node, self.message)
    }
}

pub struct Validator<'a> {
    index: &'a NodeIndex,
    classifier: MetaClassifier<'a>,
    language: TargetLanguage,
}

impl<'a> Validator<'a> {
    pub fn new(index: &'a NodeIndex, language: TargetLanguage) -> Self {
        Self {
            index,
            classifier: MetaClassifier::new(index.meta()),
            language,
        }
    }

    /// Run every rule over the index and collect all violations
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut component_names: HashMap<String, &str> = HashMap::new();

        for node in self.index.iter() {
            if !self.classifier.is_component_type(node) {
                continue;
            }
            let name = node.name();

            if !self.language.is_legal_identifier(&name) {
                tracing::info!(
                    "[VALIDATE] Improper {} class name: {}",
                    self.language.display_name(),
                    name
                );
                violations.push(Violation {
                    node: node.path.clone(),
                    kind: ViolationKind::IllegalName,
                    message: format!(
                        "Illegal ComponentType name [{}] \nIt is an illegal {} class name.",
                        name,
                        self.language.display_name()
                    ),
                });
            }

            match component_names.get(&name) {
                Some(first) => violations.push(duplicated(node, &name, first)),
                None => {
                    component_names.insert(name, node.path.as_str());
                }
            }

            self.check_state_names(node, &mut violations);
        }

        violations
    }

    /// State names are scoped to one ComponentType's immediate children
    fn check_state_names(&self, component: &GraphNode, violations: &mut Vec<Violation>) {
        let mut state_names: HashMap<String, &str> = HashMap::new();

        for child in self.index.children_of(component) {
            if !self.classifier.is_state_like(child) {
                continue;
            }
            let name = child.name();
            match state_names.get(&name) {
                Some(first) => violations.push(duplicated(component, &name, first)),
                None => {
                    state_names.insert(name, child.path.as_str());
                }
            }
        }
    }
}

fn duplicated(node: &GraphNode, name: &str, first_path: &str) -> Violation {
    Violation {
        node: node.path.clone(),
        kind: ViolationKind::DuplicatedName,
        message: format!("Duplicated name [{}] shared with {}", name, first_path),
    }
}
