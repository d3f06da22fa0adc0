//! # Behavior Spec Generator (BSG)
//!
//! Generates one source file per component from a hierarchical behavior
//! model: components containing states, transitions and guards, stored in an
//! external graph of nodes with attributes, pointers and meta-types.
//!
//! Generation is gated on validation. Every naming violation in the model is
//! reported, and no file is produced unless the model is clean.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bsg::{
//!     generate, BehaviorModelBuilder, GeneratorConfig, MemorySink, TracingChannel, ROOT_PATH,
//! };
//!
//! # async fn run() -> bsg::Result<()> {
//! let mut model = BehaviorModelBuilder::new();
//! let blinker = model.component("Blinker");
//! let idle = model.initial_state(&blinker, "Idle");
//! let on = model.state(&blinker, "On");
//! model.transition(&blinker, "toOn", Some(&idle), Some(&on), "g1", "m1");
//!
//! let graph = model.build();
//! let sink = MemorySink::new();
//! let config = GeneratorConfig::default();
//! let result = generate(&graph, ROOT_PATH, &sink, &TracingChannel, &config).await?;
//! println!("Generated {:?} as {}", result.files, result.artifact_hash);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! BSG runs a sequential pipeline:
//!
//! 1. **Loading** - Collect the root's containment subtree and its meta-types
//! 2. **Extraction** - Shape ComponentType nodes into view models
//! 3. **Validation** - Check identifier legality and name uniqueness
//! 4. **Code Generation** - Render each component through a Tera template
//! 5. **Persistence** - Hand the files to an artifact sink

pub mod codegen;
pub mod compiler;
pub mod config;
pub mod error;
pub mod extract;
pub mod graph;
pub mod language;
pub mod loader;
pub mod logger;
pub mod metadata;
pub mod model;
pub mod report;
pub mod sink;
pub mod validate;

// Re-export the main generation API
pub use compiler::{generate, generate_with_template, GenerationResult};

pub use codegen::{emit, ComponentCodeGenerator, ComponentTemplate};
pub use config::GeneratorConfig;
pub use error::{GenError, Result};
pub use extract::ModelExtractor;
pub use graph::{
    AttributeValue, BehaviorModelBuilder, GraphModelAccess, GraphNode, MemoryGraph,
    ModelDocument, ROOT_PATH,
};
pub use language::TargetLanguage;
pub use loader::{ModelLoader, NodeIndex};
pub use metadata::{MetaClassifier, MetaModel, NodeKind};
pub use model::{ComponentInfo, GuardInfo, StateInfo, TransitionInfo};
pub use report::{CollectingChannel, Message, MessageChannel, Severity, TracingChannel};
pub use sink::{Artifact, ArtifactManifest, ArtifactSink, DirectorySink, MemorySink};
pub use validate::{Validator, Violation, ViolationKind};
