//! Context detection for projects and workspaces.
//!
//! This module answers two questions about the directory a query is made
//! from: which workspace (if any) contains it, and what the project should
//! be called.
//!
//! # Overview
//!
//! Workspace membership is decided by [`WorkspaceDetector`], a trait so
//! callers can bring their own layout rules. The default
//! [`MarkerWorkspaceDetector`] walks ancestor directories looking for a
//! workspace manifest file. Project identity comes from git metadata via
//! [`RepoIdentity`], with graceful fallbacks:
//!
//! - Non-git directories (identity falls back to the directory name)
//! - Detached HEAD state (branch is `None`)
//! - Credentials in remote URLs (automatically stripped)
//!
//! # Example
//!
//! ```rust,ignore
//! use recollect::context::{MarkerWorkspaceDetector, WorkspaceDetector, query_context_for};
//!
//! let detector = MarkerWorkspaceDetector::new();
//! let info = detector.detect_workspace(Path::new("/code/acme/billing")).await;
//! let context = query_context_for(Path::new("/code/acme/billing"), &info);
//! ```

mod git;
mod workspace;

pub use git::{RepoIdentity, query_context_for};
pub use workspace::{
    MarkerWorkspaceDetector, WORKSPACE_MANIFEST, WorkspaceDetector, WorkspaceInfo,
};
