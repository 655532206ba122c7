//! CLI command implementations.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `recall` | Search memory notes ranked by relevance |
//! | `show` | Print the merged memory view for a project |
//! | `roots` | List the memory roots a project inherits from |
//! | `context` | Recall memories describing the current project |
//! | `config` | Configuration management |
//!
//! # Example Usage
//!
//! ```bash
//! # Search notes near the current project
//! recollect recall "database connection pooling"
//!
//! # Inspect what a project inherits from its workspace
//! recollect show
//! recollect roots
//! ```
//!
//! The binary has no persistent index. Each invocation loads the notes the
//! project inherits, embeds them into an in-process vector store, and
//! queries that.

use anyhow::Context;

use crate::config::RecollectConfig;
use crate::context::{query_context_for, MarkerWorkspaceDetector, WorkspaceDetector};
use crate::embedding::{EmbeddingClient, HashEmbedder};
use crate::models::{
    Category, MemorySource, MergedMemorySet, QueryContext, RecallCandidate, RecallOptions,
    RecallScope, ScoredResult,
};
use crate::services::{InheritanceService, RecallService};
use crate::storage::InMemoryVectorStore;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text (default).
    #[default]
    Text,
    /// JSON format.
    Json,
}

impl FromStr for OutputFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown output format '{other}', expected text or json"
            ))),
        }
    }
}

/// Parses a scope argument.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidInput`] for unknown scope names.
pub fn parse_scope(s: &str) -> crate::Result<RecallScope> {
    RecallScope::parse(s).ok_or_else(|| {
        crate::Error::InvalidInput(format!(
            "unknown scope '{s}', expected project, workspace, or global"
        ))
    })
}

/// Rejects category filters that name no known category.
fn validate_kinds(kinds: &[String]) -> crate::Result<()> {
    for kind in kinds {
        if Category::parse(kind).is_none() {
            return Err(crate::Error::InvalidInput(format!(
                "unknown category '{kind}', expected one of decisions, gotchas, preferences, conversations"
            )));
        }
    }
    Ok(())
}

/// Arguments for the recall command.
#[derive(Debug, Clone)]
pub struct RecallArgs {
    /// The search query.
    pub query: String,
    /// Scope filter.
    pub scope: RecallScope,
    /// Maximum number of results; falls back to the configured default.
    pub limit: Option<usize>,
    /// Minimum similarity threshold.
    pub min_score: Option<f32>,
    /// Category filters.
    pub kinds: Vec<String>,
    /// Output format.
    pub format: OutputFormat,
    /// Project directory; defaults to the current directory.
    pub dir: Option<PathBuf>,
}

/// Services a command invocation runs against.
struct CommandServices {
    inheritance: InheritanceService,
    embedder: Arc<HashEmbedder>,
    store: Arc<InMemoryVectorStore>,
    context: QueryContext,
    project_dir: PathBuf,
}

impl CommandServices {
    async fn build(config: &RecollectConfig, dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let project_dir = match dir {
            Some(dir) => dir,
            None => std::env::current_dir().context("resolving current directory")?,
        };

        let detector = Arc::new(MarkerWorkspaceDetector::with_marker(
            config.workspace_marker.clone(),
        ));
        let info = detector.detect_workspace(&project_dir).await;
        let context = query_context_for(&project_dir, &info);

        let inheritance = InheritanceService::new(detector)
            .with_memory_dir(config.memory_dir.clone())
            .with_note_extension(config.note_extension.clone());

        Ok(Self {
            inheritance,
            embedder: Arc::new(HashEmbedder::new()),
            store: Arc::new(InMemoryVectorStore::new()),
            context,
            project_dir,
        })
    }

    fn recall_service(&self) -> RecallService {
        RecallService::new(self.embedder.clone(), self.store.clone())
    }
}

/// Recall command.
///
/// # Errors
///
/// Returns an error if a category filter is unknown or if indexing,
/// embedding, or the search fails.
pub async fn cmd_recall(config: &RecollectConfig, args: RecallArgs) -> anyhow::Result<()> {
    validate_kinds(&args.kinds)?;

    let services = CommandServices::build(config, args.dir.clone()).await?;
    index_notes(&services, &config.note_extension).await?;

    let mut options = RecallOptions::new()
        .with_scope(args.scope)
        .with_limit(args.limit.unwrap_or(config.max_results));
    if let Some(min_score) = args.min_score {
        options = options.with_min_score(min_score);
    }
    for kind in args.kinds {
        options = options.with_kind(kind);
    }

    let results = services
        .recall_service()
        .recall(&args.query, &services.context, &options)
        .await?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match args.format {
        OutputFormat::Text => write_results(&mut handle, &results)?,
        OutputFormat::Json => write_json(&mut handle, &results)?,
    }
    Ok(())
}

/// Show command: prints the merged memory view for a project.
///
/// # Errors
///
/// Returns an error if output fails.
pub async fn cmd_show(
    config: &RecollectConfig,
    dir: Option<PathBuf>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let services = CommandServices::build(config, dir).await?;
    let memory = services
        .inheritance
        .load_inherited_memory(&services.project_dir)
        .await;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match format {
        OutputFormat::Text => write_memory(&mut handle, &memory)?,
        OutputFormat::Json => write_json(&mut handle, &memory)?,
    }
    Ok(())
}

/// Roots command: lists the memory roots a project inherits from.
///
/// # Errors
///
/// Returns an error if output fails.
pub async fn cmd_roots(config: &RecollectConfig, dir: Option<PathBuf>) -> anyhow::Result<()> {
    let services = CommandServices::build(config, dir).await?;
    let roots = services
        .inheritance
        .inherited_roots(&services.project_dir)
        .await;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_roots(&mut handle, &roots)?;
    Ok(())
}

/// Context command: recalls memories describing the current project.
///
/// # Errors
///
/// Returns an error if indexing, embedding, or the search fails.
pub async fn cmd_context(
    config: &RecollectConfig,
    dir: Option<PathBuf>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let services = CommandServices::build(config, dir).await?;
    index_notes(&services, &config.note_extension).await?;

    let results = services
        .recall_service()
        .recall_for_context(&services.project_dir, &services.context)
        .await?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match format {
        OutputFormat::Text => {
            write_context_header(&mut handle, &services.context)?;
            write_results(&mut handle, &results)?;
        },
        OutputFormat::Json => write_json(&mut handle, &results)?,
    }
    Ok(())
}

/// Config command.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn cmd_config(config: &RecollectConfig, show: bool) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if show {
        write_config(&mut handle, config)?;
    } else {
        writeln!(handle, "Use --show to display configuration")?;
    }
    Ok(())
}

/// Loads every note the project inherits into the in-process vector store.
///
/// Note identity is `<source>/<category>/<topic>`, so a project note and a
/// workspace note on the same topic stay distinct candidates. Timestamps
/// come from file modification time. Notes the embedder produces no vector
/// for are skipped.
async fn index_notes(
    services: &CommandServices,
    note_extension: &str,
) -> crate::Result<usize> {
    let roots = services
        .inheritance
        .inherited_roots(&services.project_dir)
        .await;

    let mut indexed = 0;
    for (position, root) in roots.iter().enumerate() {
        let source = if position == 0 {
            MemorySource::Project
        } else {
            MemorySource::Workspace
        };
        for category in Category::all() {
            let dir = root.join(category.as_str());
            let items = services
                .inheritance
                .read_memory_files(&dir, source, *category)
                .await;
            for item in items {
                let path = dir.join(format!("{}.{note_extension}", item.topic));
                let candidate = note_candidate(&item.topic, &item.text, source, *category, &path)
                    .with_timestamp(note_timestamp(&path).await);
                let candidate = attach_identity(candidate, source, &services.context);

                let Some(embedding) = services.embedder.embed(&item.text).await? else {
                    continue;
                };
                services.store.insert(candidate, embedding).await;
                indexed += 1;
            }
        }
    }

    tracing::debug!(indexed, "notes indexed");
    Ok(indexed)
}

fn note_candidate(
    topic: &str,
    text: &str,
    source: MemorySource,
    category: Category,
    path: &Path,
) -> RecallCandidate {
    RecallCandidate::new(
        format!("{}/{}/{topic}", source.as_str(), category.as_str()),
        text,
        category.as_str(),
    )
    .with_source_file(path.display().to_string())
}

/// Tags a candidate with the identities scope filtering matches against.
/// Workspace notes carry no project identity; they are visible to project
/// scope only through widening.
fn attach_identity(
    mut candidate: RecallCandidate,
    source: MemorySource,
    context: &QueryContext,
) -> RecallCandidate {
    if source == MemorySource::Project {
        if let Some(project_id) = &context.project_id {
            candidate = candidate.with_project(project_id.clone());
        }
    }
    if let Some(workspace) = &context.workspace {
        candidate = candidate.with_workspace(workspace.clone());
    }
    if let Some(branch) = &context.branch {
        candidate = candidate.with_branch(branch.clone());
    }
    candidate
}

/// File modification time in epoch milliseconds, or now when unavailable.
async fn note_timestamp(path: &Path) -> i64 {
    let modified = tokio::fs::metadata(path)
        .await
        .and_then(|metadata| metadata.modified());
    match modified {
        Ok(time) => time
            .duration_since(std::time::UNIX_EPOCH)
            .map_or_else(|_| crate::current_timestamp_ms(), |d| {
                i64::try_from(d.as_millis()).unwrap_or_else(|_| crate::current_timestamp_ms())
            }),
        Err(_) => crate::current_timestamp_ms(),
    }
}

/// Writes recall results as text to the given writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_results<W: Write>(writer: &mut W, results: &[ScoredResult]) -> io::Result<()> {
    if results.is_empty() {
        writeln!(writer, "No memories found.")?;
        return Ok(());
    }

    writeln!(writer, "Found {} memories:", results.len())?;
    writeln!(writer)?;
    for result in results {
        let pinned = if result.permanent { " (pinned)" } else { "" };
        writeln!(
            writer,
            "  [{:.2}] {} ({}){pinned}",
            result.score, result.id, result.kind
        )?;
        writeln!(writer, "       {}", truncate_chars(&result.text, 100))?;
        writeln!(writer)?;
    }
    Ok(())
}

/// Writes the merged memory view as text to the given writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_memory<W: Write>(writer: &mut W, memory: &MergedMemorySet) -> io::Result<()> {
    if memory.is_empty() {
        writeln!(writer, "No memories found.")?;
        return Ok(());
    }

    for category in Category::all() {
        let items = memory.items(*category);
        if items.is_empty() {
            continue;
        }
        writeln!(writer, "{} ({}):", category, items.len())?;
        for item in items {
            writeln!(writer, "  {} [{}]", item.topic, item.source)?;
            for line in item.text.lines() {
                writeln!(writer, "    {line}")?;
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Writes inherited memory roots as text to the given writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_roots<W: Write>(writer: &mut W, roots: &[PathBuf]) -> io::Result<()> {
    for root in roots {
        if root.exists() {
            writeln!(writer, "{}", root.display())?;
        } else {
            writeln!(writer, "{} (not created yet)", root.display())?;
        }
    }
    Ok(())
}

/// Writes the detected query context as a text header.
fn write_context_header<W: Write>(writer: &mut W, context: &QueryContext) -> io::Result<()> {
    if let Some(project_id) = &context.project_id {
        match &context.branch {
            Some(branch) => writeln!(writer, "Project: {project_id} (branch {branch})")?,
            None => writeln!(writer, "Project: {project_id}")?,
        }
    }
    if let Some(workspace) = &context.workspace {
        writeln!(writer, "Workspace: {workspace}")?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Writes any serializable value as pretty JSON to the given writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write, T: serde::Serialize>(
    writer: &mut W,
    value: &T,
) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing output to JSON")?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Writes the active configuration to the given writer.
fn write_config<W: Write>(writer: &mut W, config: &RecollectConfig) -> io::Result<()> {
    writeln!(writer, "Current Configuration")?;
    writeln!(writer, "=====================")?;
    writeln!(writer)?;
    writeln!(writer, "Memory Directory: {}", config.memory_dir)?;
    writeln!(writer, "Note Extension: {}", config.note_extension)?;
    writeln!(writer, "Workspace Marker: {}", config.workspace_marker)?;
    writeln!(writer, "Max Results: {}", config.max_results)?;
    Ok(())
}

/// Truncates to at most `max` characters, appending an ellipsis when cut.
fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max).collect();
    truncated.push_str("...");
    truncated
}
