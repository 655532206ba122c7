//! Recall candidates, query context, and scored results.
//!
//! Serialized field names (`type`, `projectId`, `sourceFile`, ...) are a
//! downstream contract; serde attributes keep the wire shape stable where
//! Rust naming differs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scope of a recall query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecallScope {
    /// Candidates tagged with the current project; may widen to workspace.
    #[default]
    Project,
    /// Candidates tagged with the current workspace.
    Workspace,
    /// No scope filtering.
    Global,
}

impl RecallScope {
    /// Returns all scope variants.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Project, Self::Workspace, Self::Global]
    }

    /// Returns the scope as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Workspace => "workspace",
            Self::Global => "global",
        }
    }

    /// Parses a scope from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "project" => Some(Self::Project),
            "workspace" => Some(Self::Workspace),
            "global" => Some(Self::Global),
            _ => None,
        }
    }
}

impl fmt::Display for RecallScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A raw candidate returned by a vector store search.
///
/// Candidates are ephemeral; they exist between the store search and the
/// mapping into [`ScoredResult`] and are never persisted by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecallCandidate {
    /// Stable identity, used for deduplication.
    pub id: String,
    /// The candidate text.
    pub text: String,
    /// Candidate kind, typically a category name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Project identifier the candidate was captured under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Workspace identifier the candidate was captured under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    /// Branch the candidate was captured on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Capture timestamp in epoch milliseconds.
    pub timestamp: i64,
    /// File the candidate was loaded from, if any.
    #[serde(rename = "sourceFile", skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    /// Whether the candidate is pinned as permanently relevant.
    pub permanent: bool,
    /// Raw similarity against the query embedding (0.0 to 1.0).
    pub similarity: f32,
}

impl RecallCandidate {
    /// Creates a candidate with no provenance and zero similarity.
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind: kind.into(),
            project: None,
            workspace: None,
            branch: None,
            timestamp: 0,
            source_file: None,
            permanent: false,
            similarity: 0.0,
        }
    }

    /// Sets the project identifier.
    #[must_use]
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Sets the workspace identifier.
    #[must_use]
    pub fn with_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    /// Sets the branch.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Sets the capture timestamp (epoch milliseconds).
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Sets the source file.
    #[must_use]
    pub fn with_source_file(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = Some(source_file.into());
        self
    }

    /// Marks the candidate as permanently relevant.
    #[must_use]
    pub const fn with_permanent(mut self, permanent: bool) -> Self {
        self.permanent = permanent;
        self
    }

    /// Sets the raw similarity.
    #[must_use]
    pub const fn with_similarity(mut self, similarity: f32) -> Self {
        self.similarity = similarity;
        self
    }
}

/// Caller-supplied description of where a query is being made from.
///
/// Supplied per call and never cached; staleness is the caller's problem.
/// All identity fields are optional, and two absent identities compare
/// equal during scope and affinity checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryContext {
    /// Identifier of the current project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Identifier of the containing workspace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    /// Current branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Files the caller is currently working with.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub touched_files: Vec<String>,
}

impl QueryContext {
    /// Creates an empty context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            project_id: None,
            workspace: None,
            branch: None,
            touched_files: Vec::new(),
        }
    }

    /// Sets the project identifier.
    #[must_use]
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Sets the workspace identifier.
    #[must_use]
    pub fn with_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    /// Sets the branch.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Adds a touched file.
    #[must_use]
    pub fn with_touched_file(mut self, path: impl Into<String>) -> Self {
        self.touched_files.push(path.into());
        self
    }
}

/// Options controlling a recall query.
#[derive(Debug, Clone, PartialEq)]
pub struct RecallOptions {
    /// Scope filter applied after scoring.
    pub scope: RecallScope,
    /// Maximum number of results returned.
    pub limit: usize,
    /// Minimum similarity threshold.
    ///
    /// Compared against the raw `similarity` of each candidate, not the
    /// combined score, so the cutoff keeps its meaning as the embedding
    /// model's own confidence.
    pub min_score: Option<f32>,
    /// Candidate kinds to keep (the serialized `type` field). Empty keeps
    /// all kinds.
    pub kinds: Vec<String>,
}

impl Default for RecallOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl RecallOptions {
    /// Creates the default options: project scope, limit 10, no thresholds.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scope: RecallScope::Project,
            limit: 10,
            min_score: None,
            kinds: Vec::new(),
        }
    }

    /// Sets the scope.
    #[must_use]
    pub const fn with_scope(mut self, scope: RecallScope) -> Self {
        self.scope = scope;
        self
    }

    /// Sets the result limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the minimum similarity threshold.
    #[must_use]
    pub const fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Adds a kind filter.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kinds.push(kind.into());
        self
    }
}

/// Provenance of a scored result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSource {
    /// Project identifier the candidate was captured under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Workspace identifier the candidate was captured under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    /// Branch the candidate was captured on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// File the candidate was loaded from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

/// A recall result with its combined relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    /// Candidate identity, unique within one recall response.
    pub id: String,
    /// The candidate text.
    pub text: String,
    /// Combined relevance score; finite, non-negative, at most 1.2.
    pub score: f64,
    /// Candidate kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Provenance of the underlying candidate.
    pub source: ResultSource,
    /// Capture time.
    pub date: DateTime<Utc>,
    /// Whether the candidate is pinned as permanently relevant.
    pub permanent: bool,
}

impl ScoredResult {
    /// Builds a result from a candidate and its combined score, dropping the
    /// raw similarity and millisecond timestamp from the public shape.
    #[must_use]
    pub fn from_candidate(candidate: RecallCandidate, score: f64) -> Self {
        Self {
            id: candidate.id,
            text: candidate.text,
            score,
            kind: candidate.kind,
            source: ResultSource {
                project: candidate.project,
                workspace: candidate.workspace,
                branch: candidate.branch,
                source_file: candidate.source_file,
            },
            date: DateTime::from_timestamp_millis(candidate.timestamp).unwrap_or_default(),
            permanent: candidate.permanent,
        }
    }
}
