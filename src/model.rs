//! # Component View Models
//!
//! Structured, template-ready view of the behavior model. These are built
//! once per run by the extractor and never modified afterwards. Field names
//! serialize in camelCase since templates address them that way.

use serde::Serialize;

use crate::graph::AttributeValue;

/// One top-level component; becomes one generated file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInfo {
    pub name: String,
    pub path: String,
    pub cardinality: AttributeValue,
    pub definitions: AttributeValue,
    pub forwards: AttributeValue,
    pub constructors: AttributeValue,
    /// Children in declaration order
    pub transitions: Vec<TransitionInfo>,
    pub states: Vec<StateInfo>,
    pub guards: Vec<GuardInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateInfo {
    pub name: String,
    /// Display name of the state's own meta-type
    #[serde(rename = "type")]
    pub type_name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub path: String,
    /// Name of the source state, empty when unset or dangling
    pub src: String,
    /// Name of the destination state, empty when unset or dangling
    pub dst: String,
    pub guard: AttributeValue,
    pub transition_method: AttributeValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub path: String,
    pub guard_method: AttributeValue,
}
