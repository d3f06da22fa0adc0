//! # Generator Errors
//!
//! Fatal conditions that abort a generation run. Validation findings are not
//! errors on their own; they are collected as [`Violation`](crate::Violation)s
//! and only become [`GenError::Validation`] once the gate trips.

use thiserror::Error;

/// Errors surfaced by the generation pipeline
#[derive(Debug, Error)]
pub enum GenError {
    /// The requested node could not be resolved by the graph storage
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// The backing graph storage failed
    #[error("Graph access failed: {0}")]
    Access(String),

    /// The model broke one or more naming invariants
    #[error("Model has {count} violation(s), see messages for details")]
    Validation { count: usize },

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// The artifact sink rejected files or failed to persist them
    #[error("Artifact sink error: {0}")]
    Sink(String),

    #[error("Code generation failed: {0}")]
    CodeGeneration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GenError>;
