//! Workspace membership detection.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Name of the manifest file that marks a workspace root.
pub const WORKSPACE_MANIFEST: &str = "workspace.json";

/// Result of probing a project directory for a containing workspace.
///
/// All paths are absolute. `relative_project_path` is the project's location
/// under the workspace root, present only when the project is inside one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceInfo {
    /// Whether the project sits inside a workspace.
    pub is_in_workspace: bool,
    /// The workspace root, when inside one.
    pub workspace_root: Option<PathBuf>,
    /// The absolutized project directory.
    pub project_path: PathBuf,
    /// Project location relative to the workspace root.
    pub relative_project_path: Option<PathBuf>,
}

impl WorkspaceInfo {
    /// Creates the info for a project outside any workspace.
    #[must_use]
    pub fn standalone(project_path: impl Into<PathBuf>) -> Self {
        Self {
            is_in_workspace: false,
            workspace_root: None,
            project_path: project_path.into(),
            relative_project_path: None,
        }
    }

    /// Creates the info for a project inside a workspace.
    #[must_use]
    pub fn in_workspace(project_path: impl Into<PathBuf>, workspace_root: impl Into<PathBuf>) -> Self {
        let project_path = project_path.into();
        let workspace_root = workspace_root.into();
        let relative_project_path = project_path
            .strip_prefix(&workspace_root)
            .ok()
            .map(Path::to_path_buf);
        Self {
            is_in_workspace: true,
            workspace_root: Some(workspace_root),
            project_path,
            relative_project_path,
        }
    }

    /// Workspace directory name, used as the workspace identity in query
    /// contexts.
    #[must_use]
    pub fn workspace_name(&self) -> Option<String> {
        self.workspace_root
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .map(String::from)
    }
}

/// Decides whether a project directory sits inside a workspace.
///
/// Implementations must not fail: a probe that cannot complete reports the
/// project as standalone, so callers always get a usable answer.
#[async_trait]
pub trait WorkspaceDetector: Send + Sync {
    /// Probes `project_dir` and reports its workspace membership.
    async fn detect_workspace(&self, project_dir: &Path) -> WorkspaceInfo;
}

/// Detects workspaces by walking ancestors for a marker manifest file.
///
/// The walk starts at the project's parent, so a directory that itself
/// carries the marker is a workspace root, not a member project.
#[derive(Debug, Clone)]
pub struct MarkerWorkspaceDetector {
    marker: String,
}

impl MarkerWorkspaceDetector {
    /// Creates a detector using the default [`WORKSPACE_MANIFEST`] marker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            marker: WORKSPACE_MANIFEST.to_string(),
        }
    }

    /// Creates a detector using a custom marker filename.
    #[must_use]
    pub fn with_marker(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl Default for MarkerWorkspaceDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkspaceDetector for MarkerWorkspaceDetector {
    async fn detect_workspace(&self, project_dir: &Path) -> WorkspaceInfo {
        let project_path =
            std::path::absolute(project_dir).unwrap_or_else(|_| project_dir.to_path_buf());

        let mut current = project_path.parent();
        while let Some(dir) = current {
            let marker_path = dir.join(&self.marker);
            if tokio::fs::try_exists(&marker_path).await.unwrap_or(false) {
                tracing::debug!(
                    workspace_root = %dir.display(),
                    project = %project_path.display(),
                    "workspace detected"
                );
                let dir = dir.to_path_buf();
                return WorkspaceInfo::in_workspace(project_path, dir);
            }
            current = dir.parent();
        }

        tracing::debug!(project = %project_path.display(), "standalone project");
        WorkspaceInfo::standalone(project_path)
    }
}
