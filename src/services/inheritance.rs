//! Memory inheritance between workspace and project.
//!
//! A project inside a workspace sees two memory roots: its own and the
//! workspace's. Loading reads both, category by category, and merges them
//! under each category's policy. Every I/O failure along the way degrades
//! to "fewer items": a missing directory, an unreadable file, or an absent
//! workspace never produce an error.

use crate::context::WorkspaceDetector;
use crate::models::{Category, MemoryItem, MemorySource, MergePolicy, MergedMemorySet};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Default directory name holding the category directories under a root.
const DEFAULT_MEMORY_DIR: &str = "memory";
/// Default note file extension.
const DEFAULT_NOTE_EXTENSION: &str = "md";

/// Loads and merges memory notes for a project and its workspace.
///
/// # Example
///
/// ```rust,ignore
/// use recollect::{InheritanceService, MarkerWorkspaceDetector};
/// use std::sync::Arc;
///
/// let service = InheritanceService::new(Arc::new(MarkerWorkspaceDetector::new()));
/// let memory = service.load_inherited_memory(Path::new(".")).await;
/// println!("{} decisions", memory.decisions.len());
/// ```
pub struct InheritanceService {
    detector: Arc<dyn WorkspaceDetector>,
    memory_dir: String,
    note_extension: String,
}

impl InheritanceService {
    /// Creates a service with the default `memory/` layout and `.md` notes.
    #[must_use]
    pub fn new(detector: Arc<dyn WorkspaceDetector>) -> Self {
        Self {
            detector,
            memory_dir: DEFAULT_MEMORY_DIR.to_string(),
            note_extension: DEFAULT_NOTE_EXTENSION.to_string(),
        }
    }

    /// Overrides the memory directory name under each root.
    #[must_use]
    pub fn with_memory_dir(mut self, memory_dir: impl Into<String>) -> Self {
        self.memory_dir = memory_dir.into();
        self
    }

    /// Overrides the note file extension (without the dot).
    #[must_use]
    pub fn with_note_extension(mut self, note_extension: impl Into<String>) -> Self {
        self.note_extension = note_extension.into();
        self
    }

    /// Loads the merged memory view for a project directory.
    ///
    /// Detects the containing workspace, reads each category from the
    /// project root and (when present) the workspace root, and merges the
    /// two per category policy.
    #[instrument(skip(self), fields(project_dir = %project_dir.display()))]
    #[allow(clippy::cast_precision_loss)]
    pub async fn load_inherited_memory(&self, project_dir: &Path) -> MergedMemorySet {
        let start = Instant::now();
        let info = self.detector.detect_workspace(project_dir).await;

        let project_root = info.project_path.join(&self.memory_dir);
        let workspace_root = info
            .workspace_root
            .as_ref()
            .map(|root| root.join(&self.memory_dir));

        let mut merged = MergedMemorySet::new();
        for category in Category::all() {
            let project_items = self
                .read_memory_files(
                    &project_root.join(category.as_str()),
                    MemorySource::Project,
                    *category,
                )
                .await;
            let workspace_items = match &workspace_root {
                Some(root) => {
                    self.read_memory_files(
                        &root.join(category.as_str()),
                        MemorySource::Workspace,
                        *category,
                    )
                    .await
                }
                None => Vec::new(),
            };
            merged.set_items(*category, merge_items(project_items, workspace_items, *category));
        }

        metrics::histogram!(
            "inheritance_load_duration_ms",
            "in_workspace" => if info.is_in_workspace { "true" } else { "false" }
        )
        .record(start.elapsed().as_millis() as f64);
        tracing::debug!(
            items = merged.len(),
            in_workspace = info.is_in_workspace,
            "inherited memory loaded"
        );
        merged
    }

    /// Reads one category directory into memory items.
    ///
    /// Only regular files carrying the note extension count, ordered
    /// lexicographically by filename. The filename minus its extension
    /// becomes the topic and the trimmed contents become the text. A
    /// missing or unreadable directory yields no items.
    pub async fn read_memory_files(
        &self,
        dir: &Path,
        source: MemorySource,
        category: Category,
    ) -> Vec<MemoryItem> {
        let Ok(mut entries) = tokio::fs::read_dir(dir).await else {
            tracing::debug!(dir = %dir.display(), "memory directory not readable");
            return Vec::new();
        };

        let mut paths: Vec<PathBuf> = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let is_file = entry
                .file_type()
                .await
                .map(|file_type| file_type.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            let path = entry.path();
            let has_note_extension = path
                .extension()
                .is_some_and(|extension| extension == self.note_extension.as_str());
            if has_note_extension {
                paths.push(path);
            }
        }
        paths.sort();

        let mut items = Vec::with_capacity(paths.len());
        for path in paths {
            let Some(topic) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match tokio::fs::read_to_string(&path).await {
                Ok(contents) => {
                    items.push(MemoryItem::new(topic, contents.trim(), source, category));
                }
                Err(error) => {
                    tracing::debug!(path = %path.display(), %error, "skipping unreadable note");
                }
            }
        }
        items
    }

    /// Returns the memory roots a project inherits from, project first.
    pub async fn inherited_roots(&self, project_dir: &Path) -> Vec<PathBuf> {
        let info = self.detector.detect_workspace(project_dir).await;
        let mut roots = vec![info.project_path.join(&self.memory_dir)];
        if let Some(workspace_root) = info.workspace_root {
            roots.push(workspace_root.join(&self.memory_dir));
        }
        roots
    }
}

/// Merges project and workspace items for one category.
///
/// Override categories keep every project item and only those workspace
/// items whose topic no project item claims. Union categories concatenate,
/// project first. Input order is preserved on both sides.
#[must_use]
pub fn merge_items(
    project: Vec<MemoryItem>,
    workspace: Vec<MemoryItem>,
    category: Category,
) -> Vec<MemoryItem> {
    match category.merge_policy() {
        MergePolicy::Union => {
            let mut merged = project;
            merged.extend(workspace);
            merged
        }
        MergePolicy::Override => {
            let claimed: HashSet<String> = project.iter().map(|item| item.topic.clone()).collect();
            let mut merged = project;
            merged.extend(
                workspace
                    .into_iter()
                    .filter(|item| !claimed.contains(&item.topic)),
            );
            merged
        }
    }
}
