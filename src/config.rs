//! Generator configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::language::TargetLanguage;

pub const DEFAULT_ARTIFACT_NAME: &str = "BehaviorSpecifications";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Name of the artifact bundling the generated files
    pub artifact_name: String,
    pub language: TargetLanguage,
    /// Replacement for the built-in component template
    pub template: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            artifact_name: DEFAULT_ARTIFACT_NAME.to_string(),
            language: TargetLanguage::default(),
            template: None,
        }
    }
}

impl GeneratorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }
}
