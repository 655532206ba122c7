//! Inheritance integration tests.
//!
//! Exercises the full load path: marker-based workspace detection, category
//! directory reads, and per-category merge policies, all against real
//! directory trees.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use recollect::services::merge_items;
use recollect::{
    Category, InheritanceService, MarkerWorkspaceDetector, MemoryItem, MemorySource,
};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn service() -> InheritanceService {
    InheritanceService::new(Arc::new(MarkerWorkspaceDetector::new()))
}

fn write_note(root: &Path, category: &str, name: &str, text: &str) {
    let dir = root.join("memory").join(category);
    std::fs::create_dir_all(&dir).expect("create category dir");
    std::fs::write(dir.join(name), text).expect("write note");
}

/// A project outside any workspace sees only its own notes.
#[tokio::test]
async fn test_standalone_project_loads_own_notes() {
    let project = TempDir::new().expect("temp dir");
    write_note(project.path(), "decisions", "api.md", "use grpc");
    write_note(project.path(), "gotchas", "timeout.md", "retries mask timeouts");

    let memory = service().load_inherited_memory(project.path()).await;

    assert_eq!(memory.decisions.len(), 1);
    assert_eq!(memory.gotchas.len(), 1);
    assert!(memory.preferences.is_empty());
    assert!(memory.conversations.is_empty());
    assert!(memory.iter().all(|item| item.source == MemorySource::Project));
    assert!(memory.iter().all(|item| (item.relevance - 1.0).abs() < 1e-9));
}

/// A project inside a workspace inherits workspace notes under each
/// category's merge policy.
#[tokio::test]
async fn test_workspace_inheritance_end_to_end() {
    let workspace = TempDir::new().expect("temp dir");
    std::fs::write(workspace.path().join("workspace.json"), "{}").expect("marker");
    let project = workspace.path().join("services").join("billing");
    std::fs::create_dir_all(&project).expect("project dir");

    // Override category: the project's api topic wins, logging fills in.
    write_note(&project, "decisions", "api.md", "project api decision");
    write_note(workspace.path(), "decisions", "api.md", "workspace api decision");
    write_note(workspace.path(), "decisions", "logging.md", "use tracing");

    // Union category: both sides survive, project first.
    write_note(&project, "gotchas", "cache.md", "project cache gotcha");
    write_note(workspace.path(), "gotchas", "cache.md", "workspace cache gotcha");

    // Preferences exist only in the workspace.
    write_note(workspace.path(), "preferences", "style.md", "four space indent");

    let memory = service().load_inherited_memory(&project).await;

    assert_eq!(memory.decisions.len(), 2);
    assert_eq!(memory.decisions[0].topic, "api");
    assert_eq!(memory.decisions[0].text, "project api decision");
    assert_eq!(memory.decisions[0].source, MemorySource::Project);
    assert_eq!(memory.decisions[1].topic, "logging");
    assert_eq!(memory.decisions[1].source, MemorySource::Workspace);
    assert!((memory.decisions[1].relevance - 0.5).abs() < 1e-9);

    assert_eq!(memory.gotchas.len(), 2);
    assert_eq!(memory.gotchas[0].source, MemorySource::Project);
    assert_eq!(memory.gotchas[1].source, MemorySource::Workspace);

    assert_eq!(memory.preferences.len(), 1);
    assert_eq!(memory.preferences[0].source, MemorySource::Workspace);
}

/// Workspace detection walks any number of intermediate directories.
#[tokio::test]
async fn test_deeply_nested_project_inherits() {
    let workspace = TempDir::new().expect("temp dir");
    std::fs::write(workspace.path().join("workspace.json"), "{}").expect("marker");
    let project = workspace.path().join("teams").join("platform").join("api");
    std::fs::create_dir_all(&project).expect("project dir");

    write_note(workspace.path(), "decisions", "db.md", "postgres everywhere");

    let memory = service().load_inherited_memory(&project).await;

    assert_eq!(memory.decisions.len(), 1);
    assert_eq!(memory.decisions[0].source, MemorySource::Workspace);
}

/// Loading never fails: a project with no memory directory at all yields an
/// empty set.
#[tokio::test]
async fn test_missing_memory_directories_yield_empty_set() {
    let project = TempDir::new().expect("temp dir");

    let memory = service().load_inherited_memory(project.path()).await;

    assert!(memory.is_empty());
    assert_eq!(memory.len(), 0);
}

/// Empty and whitespace-only notes are kept, with empty text.
#[tokio::test]
async fn test_empty_notes_are_kept() {
    let project = TempDir::new().expect("temp dir");
    write_note(project.path(), "decisions", "placeholder.md", "");
    write_note(project.path(), "decisions", "whitespace.md", "   \n\t  ");

    let memory = service().load_inherited_memory(project.path()).await;

    assert_eq!(memory.decisions.len(), 2);
    assert!(memory.decisions.iter().all(|item| item.text.is_empty()));
}

/// Items within a category are ordered by filename.
#[tokio::test]
async fn test_items_sorted_by_filename() {
    let project = TempDir::new().expect("temp dir");
    write_note(project.path(), "conversations", "2024-03-socket.md", "march");
    write_note(project.path(), "conversations", "2024-01-kickoff.md", "january");
    write_note(project.path(), "conversations", "2024-02-retro.md", "february");

    let memory = service().load_inherited_memory(project.path()).await;

    let topics: Vec<&str> = memory
        .conversations
        .iter()
        .map(|item| item.topic.as_str())
        .collect();
    assert_eq!(
        topics,
        vec!["2024-01-kickoff", "2024-02-retro", "2024-03-socket"]
    );
}

/// Non-note files and subdirectories in a category directory are ignored.
#[tokio::test]
async fn test_non_note_entries_are_ignored() {
    let project = TempDir::new().expect("temp dir");
    write_note(project.path(), "decisions", "real.md", "kept");
    write_note(project.path(), "decisions", "scratch.txt", "wrong extension");
    std::fs::create_dir_all(project.path().join("memory/decisions/archive")).expect("subdir");

    let memory = service().load_inherited_memory(project.path()).await;

    assert_eq!(memory.decisions.len(), 1);
    assert_eq!(memory.decisions[0].topic, "real");
}

/// Roots are reported project first, and reported even before the
/// directories exist.
#[tokio::test]
async fn test_inherited_roots_ordering() {
    let workspace = TempDir::new().expect("temp dir");
    std::fs::write(workspace.path().join("workspace.json"), "{}").expect("marker");
    let project = workspace.path().join("billing");
    std::fs::create_dir_all(&project).expect("project dir");

    let roots = service().inherited_roots(&project).await;

    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0], project.join("memory"));
    assert_eq!(roots[1], workspace.path().join("memory"));
    assert!(!roots[0].exists());
}

/// A configured memory directory name applies to both roots.
#[tokio::test]
async fn test_custom_memory_dir() {
    let workspace = TempDir::new().expect("temp dir");
    std::fs::write(workspace.path().join("workspace.json"), "{}").expect("marker");
    let project = workspace.path().join("app");
    std::fs::create_dir_all(&project).expect("project dir");

    let notes = workspace.path().join("knowledge").join("decisions");
    std::fs::create_dir_all(&notes).expect("notes dir");
    std::fs::write(notes.join("api.md"), "from knowledge dir").expect("note");

    let memory = service()
        .with_memory_dir("knowledge")
        .load_inherited_memory(&project)
        .await;

    assert_eq!(memory.decisions.len(), 1);
    assert_eq!(memory.decisions[0].text, "from knowledge dir");
}

/// merge_items applies the policy of whichever category it is given.
#[test]
fn test_merge_items_respects_category_policy() {
    let project = vec![MemoryItem::new(
        "same",
        "project text",
        MemorySource::Project,
        Category::Preferences,
    )];
    let workspace = vec![MemoryItem::new(
        "same",
        "workspace text",
        MemorySource::Workspace,
        Category::Preferences,
    )];

    let merged = merge_items(project.clone(), workspace.clone(), Category::Preferences);
    assert_eq!(merged.len(), 1, "override keeps the project item only");

    let project: Vec<MemoryItem> = project
        .into_iter()
        .map(|item| MemoryItem::new(item.topic, item.text, item.source, Category::Conversations))
        .collect();
    let workspace: Vec<MemoryItem> = workspace
        .into_iter()
        .map(|item| MemoryItem::new(item.topic, item.text, item.source, Category::Conversations))
        .collect();
    let merged = merge_items(project, workspace, Category::Conversations);
    assert_eq!(merged.len(), 2, "union keeps both items");
}
