//! # Behavior Spec Compiler
//!
//! Main entry points for generating component sources from a behavior model.

use serde::Serialize;

use crate::codegen::{ComponentCodeGenerator, ComponentTemplate};
use crate::config::GeneratorConfig;
use crate::error::{GenError, Result};
use crate::extract::ModelExtractor;
use crate::graph::GraphModelAccess;
use crate::loader::ModelLoader;
use crate::report::{MessageChannel, Severity};
use crate::sink::ArtifactSink;
use crate::validate::Validator;

/// Outcome of a successful generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// Hash returned when the files were added to the artifact
    pub content_hash: String,
    /// Hash returned when the artifact was saved
    pub artifact_hash: String,
    /// Generated file names, sorted
    pub files: Vec<String>,
}

/// Generate one source file per ComponentType below `root`
///
/// This is the main entry point of the generator. It loads the subtree,
/// extracts and validates the components, and hands the rendered files to
/// `sink` as a single artifact.
///
/// # Arguments
///
/// * `access` - Graph storage holding the model
/// * `root` - Path of the node whose subtree is generated
/// * `sink` - Receives the generated files
/// * `channel` - Receives one error message per violation
/// * `config` - Artifact name, target language and optional template path
///
/// # Returns
///
/// * `Ok(GenerationResult)` - Both artifact hashes and the generated file names
/// * `Err(GenError)` - The first fatal error, or [`GenError::Validation`] once
///   every violation has been reported
pub async fn generate(
    access: &dyn GraphModelAccess,
    root: &str,
    sink: &dyn ArtifactSink,
    channel: &dyn MessageChannel,
    config: &GeneratorConfig,
) -> Result<GenerationResult> {
    let template = match &config.template {
        Some(path) => {
            tracing::info!("[BSG] Using template {}", path.display());
            ComponentTemplate::from_file(path).await?
        }
        None => ComponentTemplate::builtin(config.language)?,
    };

    generate_with_template(access, root, sink, channel, config, &template).await
}

/// Generate with an already compiled template
///
/// `config.template` is ignored; everything else behaves like [`generate`].
pub async fn generate_with_template(
    access: &dyn GraphModelAccess,
    root: &str,
    sink: &dyn ArtifactSink,
    channel: &dyn MessageChannel,
    config: &GeneratorConfig,
    template: &ComponentTemplate,
) -> Result<GenerationResult> {
    tracing::info!("[BSG] Starting behavior spec generation for {}", root);

    // Phase 1: Load the subtree
    tracing::info!("[BSG] Phase 1: Loading model...");
    let index = ModelLoader::new(access).load(root).await?;
    tracing::info!(
        "[BSG] Loaded {} nodes ({} meta-types)",
        index.len(),
        index.meta().len()
    );

    // Phase 2: Extract component view models
    tracing::info!("[BSG] Phase 2: Extracting components...");
    let components = ModelExtractor::new(&index).extract();
    tracing::info!("[BSG] Found {} component types", components.len());

    // Phase 3: Validate; any violation stops generation entirely
    tracing::info!("[BSG] Phase 3: Validating model...");
    let violations = Validator::new(&index, config.language).validate();
    if !violations.is_empty() {
        for violation in &violations {
            channel.create_message(&violation.node, &violation.message, Severity::Error);
        }
        let err = GenError::Validation {
            count: violations.len(),
        };
        tracing::error!("[BSG] {}", err);
        return Err(err);
    }

    // Phase 4: Render
    tracing::info!("[BSG] Phase 4: Generating {} code...", config.language.display_name());
    let files = ComponentCodeGenerator::new(&components, template, config.language)
        .generate_files()?;
    tracing::info!("[BSG] Generated {} files", files.len());

    // Phase 5: Persist
    tracing::info!("[BSG] Phase 5: Saving artifact '{}'...", config.artifact_name);
    let mut artifact = sink.create_artifact(&config.artifact_name).await?;
    let content_hash = artifact.add_files(&files).await?;
    let artifact_hash = artifact.save().await?;

    tracing::info!("[BSG] Generation successful! (artifact {})", artifact_hash);

    Ok(GenerationResult {
        content_hash,
        artifact_hash,
        files: files.into_keys().collect(),
    })
}
