//! # Artifact Sinks
//!
//! Where generated files end up. A sink hands out named artifacts; files are
//! added to an artifact in one batch, which yields a content hash, and saving
//! the artifact yields the final artifact hash.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use crate::error::{GenError, Result};

/// Produces artifacts that bundle generated files
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    async fn create_artifact(&self, name: &str) -> Result<Box<dyn Artifact>>;
}

/// A bundle of files under construction
#[async_trait]
pub trait Artifact: Send {
    /// Add files and return the content hash of the bundle so far
    async fn add_files(&mut self, files: &BTreeMap<String, String>) -> Result<String>;

    /// Finalize the bundle and return the artifact hash
    async fn save(&mut self) -> Result<String>;
}

/// SHA-256 over the files in name order
pub fn content_hash(files: &BTreeMap<String, String>) -> String {
    let mut hasher = Sha256::new();
    for (name, content) in files {
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        hasher.update(content.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

/// SHA-256 over the artifact name, its content hash and its file names
pub fn artifact_hash(name: &str, content_hash: &str, file_names: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update([0u8]);
    hasher.update(content_hash.as_bytes());
    for file_name in file_names {
        hasher.update([0u8]);
        hasher.update(file_name.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Description of a saved artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactManifest {
    pub name: String,
    pub content_hash: String,
    pub artifact_hash: String,
    pub files: Vec<String>,
}

/// Files and manifest of an artifact held by [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    pub manifest: ArtifactManifest,
    pub files: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct MemorySinkState {
    created: usize,
    saved: Vec<SavedArtifact>,
}

/// Keeps saved artifacts in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    state: Arc<Mutex<MemorySinkState>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of artifacts ever created, saved or not
    pub fn created_count(&self) -> usize {
        self.state.lock().created
    }

    pub fn saved(&self) -> Vec<SavedArtifact> {
        self.state.lock().saved.clone()
    }
}

#[async_trait]
impl ArtifactSink for MemorySink {
    async fn create_artifact(&self, name: &str) -> Result<Box<dyn Artifact>> {
        self.state.lock().created += 1;
        Ok(Box::new(MemoryArtifact {
            name: name.to_string(),
            files: BTreeMap::new(),
            state: Arc::clone(&self.state),
        }))
    }
}

struct MemoryArtifact {
    name: String,
    files: BTreeMap<String, String>,
    state: Arc<Mutex<MemorySinkState>>,
}

#[async_trait]
impl Artifact for MemoryArtifact {
    async fn add_files(&mut self, files: &BTreeMap<String, String>) -> Result<String> {
        self.files.extend(files.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(content_hash(&self.files))
    }

    async fn save(&mut self) -> Result<String> {
        let manifest = manifest_for(&self.name, &self.files);
        let hash = manifest.artifact_hash.clone();
        self.state.lock().saved.push(SavedArtifact {
            manifest,
            files: self.files.clone(),
        });
        Ok(hash)
    }
}

/// Writes artifacts as directories below an output root
///
/// Files are staged in a hidden sibling directory and only replace
/// `<root>/<name>` when the artifact is saved. An artifact dropped before
/// `save` leaves the previous output untouched.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub const MANIFEST_FILE: &'static str = "manifest.json";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    async fn create_artifact(&self, name: &str) -> Result<Box<dyn Artifact>> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(GenError::Sink(format!("Invalid artifact name: {:?}", name)));
        }

        tokio::fs::create_dir_all(&self.root).await?;
        let staging = tempfile::Builder::new()
            .prefix(&format!(".{}.staging-", name))
            .tempdir_in(&self.root)?;
        tracing::debug!("[SINK] Staging artifact {} in {}", name, staging.path().display());

        Ok(Box::new(DirectoryArtifact {
            name: name.to_string(),
            root: self.root.clone(),
            staging: Some(staging),
            files: BTreeMap::new(),
        }))
    }
}

struct DirectoryArtifact {
    name: String,
    root: PathBuf,
    // Removed on drop unless `save` moved it into place
    staging: Option<TempDir>,
    files: BTreeMap<String, String>,
}

impl DirectoryArtifact {
    fn staging_path(&self) -> Result<&Path> {
        self.staging
            .as_ref()
            .map(TempDir::path)
            .ok_or_else(|| GenError::Sink(format!("Artifact {} was already saved", self.name)))
    }
}

#[async_trait]
impl Artifact for DirectoryArtifact {
    async fn add_files(&mut self, files: &BTreeMap<String, String>) -> Result<String> {
        let staging = self.staging_path()?.to_path_buf();
        for (file_name, content) in files {
            if file_name.contains(['/', '\\']) || file_name == DirectorySink::MANIFEST_FILE {
                return Err(GenError::Sink(format!("Invalid file name: {:?}", file_name)));
            }
            tokio::fs::write(staging.join(file_name), content).await?;
            self.files.insert(file_name.clone(), content.clone());
        }
        Ok(content_hash(&self.files))
    }

    async fn save(&mut self) -> Result<String> {
        let staging_path = self.staging_path()?.to_path_buf();
        let manifest = manifest_for(&self.name, &self.files);
        let json = serde_json::to_string_pretty(&manifest)?;
        tokio::fs::write(staging_path.join(DirectorySink::MANIFEST_FILE), json).await?;

        let target = self.root.join(&self.name);
        let previous = if tokio::fs::try_exists(&target).await? {
            let trash = tempfile::Builder::new()
                .prefix(&format!(".{}.previous-", self.name))
                .tempdir_in(&self.root)?;
            tokio::fs::rename(&target, trash.path().join(&self.name)).await?;
            Some(trash)
        } else {
            None
        };

        if let Err(e) = tokio::fs::rename(&staging_path, &target).await {
            if let Some(trash) = &previous {
                let moved = trash.path().join(&self.name);
                if let Err(restore) = tokio::fs::rename(&moved, &target).await {
                    tracing::error!(
                        "[SINK] Could not restore previous artifact {}: {}",
                        target.display(),
                        restore
                    );
                }
            }
            return Err(e.into());
        }

        // The staging path no longer exists; the trash holds the replaced output
        self.staging = None;
        drop(previous);

        tracing::debug!("[SINK] Saved artifact {} ({} files)", self.name, manifest.files.len());
        Ok(manifest.artifact_hash)
    }
}

fn manifest_for(name: &str, files: &BTreeMap<String, String>) -> ArtifactManifest {
    let content_hash = content_hash(files);
    let file_names: Vec<String> = files.keys().cloned().collect();
    ArtifactManifest {
        name: name.to_string(),
        artifact_hash: artifact_hash(name, &content_hash, &file_names),
        content_hash,
        files: file_names,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files() -> BTreeMap<String, String> {
        let mut files = BTreeMap::new();
        files.insert("A.java".to_string(), "class A {}".to_string());
        files.insert("B.java".to_string(), "class B {}".to_string());
        files
    }

    #[test]
    fn content_hash_depends_on_names_and_contents() {
        let base = content_hash(&files());
        assert_eq!(base, content_hash(&files()));
        assert_eq!(base.len(), 64);

        let mut renamed = files();
        let content = renamed.remove("B.java").unwrap();
        renamed.insert("C.java".to_string(), content);
        assert_ne!(base, content_hash(&renamed));

        let mut edited = files();
        edited.insert("B.java".to_string(), "class B { }".to_string());
        assert_ne!(base, content_hash(&edited));
    }

    #[tokio::test]
    async fn memory_sink_keeps_saved_bundles() {
        let sink = MemorySink::new();
        let mut artifact = sink.create_artifact("Specs").await.unwrap();
        let content = artifact.add_files(&files()).await.unwrap();
        let saved_hash = artifact.save().await.unwrap();

        assert_eq!(sink.created_count(), 1);
        let saved = sink.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].manifest.content_hash, content);
        assert_eq!(saved[0].manifest.artifact_hash, saved_hash);
        assert_eq!(saved[0].files, files());
        assert_ne!(content, saved_hash);
    }

    #[tokio::test]
    async fn directory_sink_writes_files_and_manifest() {
        let out = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(out.path());
        let mut artifact = sink.create_artifact("Specs").await.unwrap();
        artifact.add_files(&files()).await.unwrap();
        let hash = artifact.save().await.unwrap();

        let dir = out.path().join("Specs");
        let a = std::fs::read_to_string(dir.join("A.java")).unwrap();
        assert_eq!(a, "class A {}");

        let manifest: ArtifactManifest =
            serde_json::from_str(&std::fs::read_to_string(dir.join("manifest.json")).unwrap())
                .unwrap();
        assert_eq!(manifest.artifact_hash, hash);
        assert_eq!(manifest.files, ["A.java", "B.java"]);
    }

    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn directory_sink_replaces_previous_output() {
        let out = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(out.path());

        let mut first = sink.create_artifact("Specs").await.unwrap();
        first.add_files(&files()).await.unwrap();
        first.save().await.unwrap();

        let mut renamed = BTreeMap::new();
        renamed.insert("C.java".to_string(), "class C {}".to_string());
        let mut second = sink.create_artifact("Specs").await.unwrap();
        second.add_files(&renamed).await.unwrap();
        second.save().await.unwrap();

        assert_eq!(listing(&out.path().join("Specs")), ["C.java", "manifest.json"]);
        assert_eq!(listing(out.path()), ["Specs"]);
    }

    #[tokio::test]
    async fn unsaved_artifact_leaves_previous_output_alone() {
        let out = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(out.path());

        let mut first = sink.create_artifact("Specs").await.unwrap();
        first.add_files(&files()).await.unwrap();
        first.save().await.unwrap();

        let mut second = sink.create_artifact("Specs").await.unwrap();
        let mut partial = BTreeMap::new();
        partial.insert("C.java".to_string(), "class C {}".to_string());
        partial.insert("nested/D.java".to_string(), String::new());
        assert!(matches!(second.add_files(&partial).await, Err(GenError::Sink(_))));
        drop(second);

        assert_eq!(
            listing(&out.path().join("Specs")),
            ["A.java", "B.java", "manifest.json"]
        );
        assert_eq!(listing(out.path()), ["Specs"]);
    }

    #[tokio::test]
    async fn failed_first_run_leaves_no_output() {
        let out = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(out.path());

        let mut artifact = sink.create_artifact("Specs").await.unwrap();
        let mut bad = BTreeMap::new();
        bad.insert(DirectorySink::MANIFEST_FILE.to_string(), String::new());
        assert!(artifact.add_files(&bad).await.is_err());
        drop(artifact);

        assert!(listing(out.path()).is_empty());
    }

    #[tokio::test]
    async fn saved_artifact_cannot_be_saved_again() {
        let out = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(out.path());
        let mut artifact = sink.create_artifact("Specs").await.unwrap();
        artifact.add_files(&files()).await.unwrap();
        artifact.save().await.unwrap();

        assert!(matches!(artifact.save().await, Err(GenError::Sink(_))));
        assert!(out.path().join("Specs").join("A.java").exists());
    }

    #[tokio::test]
    async fn directory_sink_rejects_path_like_names() {
        let out = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(out.path());
        assert!(matches!(
            sink.create_artifact("../escape").await,
            Err(GenError::Sink(_))
        ));

        let mut artifact = sink.create_artifact("Specs").await.unwrap();
        let mut bad = BTreeMap::new();
        bad.insert("nested/A.java".to_string(), String::new());
        assert!(matches!(artifact.add_files(&bad).await, Err(GenError::Sink(_))));
    }
}
