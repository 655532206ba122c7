//! Recall integration tests.
//!
//! Runs the full pipeline (embed, search, score, scope, dedupe, rank)
//! against the hash embedder and the in-memory store, checking the
//! behaviors callers observe: ranking, widening, filtering, and limits.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use recollect::{
    current_timestamp_ms, EmbeddingClient, HashEmbedder, InMemoryVectorStore, QueryContext,
    RecallCandidate, RecallOptions, RecallScope, RecallService, ScoredResult,
};
use std::path::Path;
use std::sync::Arc;

const DAY_MS: i64 = 86_400_000;

struct Fixture {
    embedder: Arc<HashEmbedder>,
    store: Arc<InMemoryVectorStore>,
    service: RecallService,
}

impl Fixture {
    fn new() -> Self {
        let embedder = Arc::new(HashEmbedder::new());
        let store = Arc::new(InMemoryVectorStore::new());
        let service = RecallService::new(embedder.clone(), store.clone());
        Self {
            embedder,
            store,
            service,
        }
    }

    async fn seed(&self, candidate: RecallCandidate) {
        let embedding = self
            .embedder
            .embed(&candidate.text)
            .await
            .expect("embed")
            .expect("vector");
        self.store.insert(candidate, embedding).await;
    }
}

/// A fresh candidate tagged with the test project and workspace.
fn note(id: &str, text: &str) -> RecallCandidate {
    RecallCandidate::new(id, text, "decisions")
        .with_project("acme/api")
        .with_workspace("acme")
        .with_timestamp(current_timestamp_ms())
}

/// A fresh candidate belonging to the workspace but no project.
fn workspace_note(id: &str, text: &str) -> RecallCandidate {
    RecallCandidate::new(id, text, "decisions")
        .with_workspace("acme")
        .with_timestamp(current_timestamp_ms())
}

fn context() -> QueryContext {
    QueryContext::new()
        .with_project_id("acme/api")
        .with_workspace("acme")
}

fn ids(results: &[ScoredResult]) -> Vec<&str> {
    results.iter().map(|result| result.id.as_str()).collect()
}

/// The note matching the query text ranks first.
#[tokio::test]
async fn test_semantic_recall_finds_matching_note() {
    let fixture = Fixture::new();
    fixture.seed(note("db", "use postgres for billing data")).await;
    fixture.seed(note("runtime", "tokio worker thread sizing")).await;
    fixture.seed(note("git", "prefer rebase over merge commits")).await;

    let results = fixture
        .service
        .recall("tokio worker thread sizing", &context(), &RecallOptions::new())
        .await
        .expect("recall");

    assert!(!results.is_empty());
    assert_eq!(results[0].id, "runtime");
    assert!(results[0].score > results[results.len() - 1].score);
}

/// A pinned note outranks an otherwise identical note, and no score
/// exceeds the boost ceiling.
#[tokio::test]
async fn test_permanent_note_outranks_equal_note() {
    let fixture = Fixture::new();
    let now = current_timestamp_ms();
    fixture
        .seed(
            note("pinned", "connection pool sizing guidance")
                .with_timestamp(now)
                .with_permanent(true),
        )
        .await;
    fixture
        .seed(note("plain", "connection pool sizing guidance").with_timestamp(now))
        .await;

    let results = fixture
        .service
        .recall("connection pool sizing guidance", &context(), &RecallOptions::new())
        .await
        .expect("recall");

    assert_eq!(results[0].id, "pinned");
    assert!(results[0].permanent);
    assert!(results[0].score > results[1].score);
    assert!(results.iter().all(|result| result.score <= 1.2));
}

/// Project scope widens to the workspace when the project side is sparse
/// and the workspace side is not.
#[tokio::test]
async fn test_project_scope_widens_to_workspace() {
    let fixture = Fixture::new();
    fixture.seed(note("own", "deploy pipeline notes")).await;
    fixture.seed(workspace_note("ws-1", "shared deploy conventions")).await;
    fixture.seed(workspace_note("ws-2", "shared logging conventions")).await;
    fixture.seed(workspace_note("ws-3", "shared review conventions")).await;

    let results = fixture
        .service
        .recall("conventions", &context(), &RecallOptions::new())
        .await
        .expect("recall");

    let found = ids(&results);
    assert_eq!(found.len(), 4, "widened set spans the whole workspace");
    assert!(found.contains(&"own"));
    assert!(found.contains(&"ws-1"));
}

/// Project scope does not widen when the project has enough results.
#[tokio::test]
async fn test_project_scope_stays_when_populated() {
    let fixture = Fixture::new();
    fixture.seed(note("p-1", "api versioning decision")).await;
    fixture.seed(note("p-2", "api pagination decision")).await;
    fixture.seed(note("p-3", "api auth decision")).await;
    fixture.seed(workspace_note("ws-1", "workspace api convention")).await;

    let results = fixture
        .service
        .recall("api", &context(), &RecallOptions::new())
        .await
        .expect("recall");

    let found = ids(&results);
    assert_eq!(found.len(), 3);
    assert!(!found.contains(&"ws-1"));
}

/// Workspace scope admits only candidates from the same workspace.
#[tokio::test]
async fn test_workspace_scope_excludes_other_workspaces() {
    let fixture = Fixture::new();
    fixture.seed(workspace_note("ours", "shared retry policy")).await;
    fixture
        .seed(
            RecallCandidate::new("theirs", "shared retry policy", "decisions")
                .with_workspace("rival")
                .with_timestamp(current_timestamp_ms()),
        )
        .await;

    let results = fixture
        .service
        .recall(
            "shared retry policy",
            &context(),
            &RecallOptions::new().with_scope(RecallScope::Workspace),
        )
        .await
        .expect("recall");

    assert_eq!(ids(&results), vec!["ours"]);
}

/// Global scope applies no identity filtering at all.
#[tokio::test]
async fn test_global_scope_sees_everything() {
    let fixture = Fixture::new();
    fixture.seed(note("mine", "incident runbook steps")).await;
    fixture
        .seed(
            RecallCandidate::new("foreign", "incident runbook steps", "decisions")
                .with_project("other/repo")
                .with_timestamp(current_timestamp_ms()),
        )
        .await;

    let results = fixture
        .service
        .recall(
            "incident runbook steps",
            &context(),
            &RecallOptions::new().with_scope(RecallScope::Global),
        )
        .await
        .expect("recall");

    assert_eq!(results.len(), 2);
}

/// The similarity floor removes weak matches and keeps strong ones.
#[tokio::test]
async fn test_min_score_drops_weak_matches() {
    let fixture = Fixture::new();
    fixture.seed(note("strong", "kafka consumer rebalancing")).await;
    fixture.seed(note("weak", "frontend css grid layout")).await;

    let results = fixture
        .service
        .recall(
            "kafka consumer rebalancing",
            &context(),
            &RecallOptions::new().with_min_score(0.9),
        )
        .await
        .expect("recall");

    assert_eq!(ids(&results), vec!["strong"]);
}

/// Kind filters keep only candidates of the requested categories.
#[tokio::test]
async fn test_kind_filter_selects_categories() {
    let fixture = Fixture::new();
    fixture.seed(note("decision", "database migration plan")).await;
    fixture
        .seed(
            RecallCandidate::new("gotcha", "database migration plan", "gotchas")
                .with_project("acme/api")
                .with_workspace("acme")
                .with_timestamp(current_timestamp_ms()),
        )
        .await;

    let results = fixture
        .service
        .recall(
            "database migration plan",
            &context(),
            &RecallOptions::new().with_kind("gotchas"),
        )
        .await
        .expect("recall");

    assert_eq!(ids(&results), vec!["gotcha"]);
    assert_eq!(results[0].kind, "gotchas");
}

/// Duplicate ids collapse to the strongest occurrence.
#[tokio::test]
async fn test_duplicate_ids_collapse() {
    let fixture = Fixture::new();
    fixture.seed(note("same", "stale cache invalidation note")).await;
    fixture.seed(note("same", "cache invalidation strategy")).await;
    fixture.seed(note("other", "unrelated release checklist")).await;

    let results = fixture
        .service
        .recall("cache invalidation strategy", &context(), &RecallOptions::new())
        .await
        .expect("recall");

    let same_count = results.iter().filter(|result| result.id == "same").count();
    assert_eq!(same_count, 1);
    assert_eq!(
        results.iter().find(|result| result.id == "same").unwrap().text,
        "cache invalidation strategy"
    );
}

/// The limit caps the result count after ranking.
#[tokio::test]
async fn test_limit_truncates_results() {
    let fixture = Fixture::new();
    for index in 0..5 {
        fixture
            .seed(note(&format!("n-{index}"), &format!("deployment note {index}")))
            .await;
    }

    let results = fixture
        .service
        .recall(
            "deployment note",
            &context(),
            &RecallOptions::new().with_limit(2),
        )
        .await
        .expect("recall");

    assert_eq!(results.len(), 2);
}

/// An empty query short-circuits to no results.
#[tokio::test]
async fn test_empty_query_returns_nothing() {
    let fixture = Fixture::new();
    fixture.seed(note("a", "anything at all")).await;

    let results = fixture
        .service
        .recall("", &context(), &RecallOptions::new())
        .await
        .expect("recall");

    assert!(results.is_empty());
}

/// With equal similarity and identity, the fresher note wins on recency.
#[tokio::test]
async fn test_fresh_note_outranks_stale_note() {
    let fixture = Fixture::new();
    let now = current_timestamp_ms();
    fixture
        .seed(note("fresh", "queue backpressure tuning").with_timestamp(now))
        .await;
    fixture
        .seed(note("stale", "queue backpressure tuning").with_timestamp(now - 30 * DAY_MS))
        .await;

    let results = fixture
        .service
        .recall("queue backpressure tuning", &context(), &RecallOptions::new())
        .await
        .expect("recall");

    assert_eq!(ids(&results), vec!["fresh", "stale"]);
    assert!(results[0].score > results[1].score);
}

/// Context recall queries by project identity and returns a small set.
#[tokio::test]
async fn test_context_recall_is_small_and_project_keyed() {
    let fixture = Fixture::new();
    for index in 0..7 {
        fixture
            .seed(note(
                &format!("ctx-{index}"),
                &format!("acme/api service overview part {index}"),
            ))
            .await;
    }

    let results = fixture
        .service
        .recall_for_context(Path::new("/code/acme/api"), &context())
        .await
        .expect("recall");

    assert!(!results.is_empty());
    assert!(results.len() <= 5);
}

/// The serialized result shape follows the downstream contract: `type`
/// instead of `kind`, camelCase provenance, RFC 3339 dates.
#[tokio::test]
async fn test_result_wire_shape() {
    let fixture = Fixture::new();
    fixture
        .seed(
            note("wire", "wire shape check")
                .with_branch("main")
                .with_source_file("memory/decisions/wire.md"),
        )
        .await;

    let results = fixture
        .service
        .recall("wire shape check", &context(), &RecallOptions::new())
        .await
        .expect("recall");

    let json = serde_json::to_string(&results[0]).expect("serialize");
    assert!(json.contains("\"type\":\"decisions\""));
    assert!(json.contains("\"sourceFile\":\"memory/decisions/wire.md\""));
    assert!(json.contains("\"project\":\"acme/api\""));
    assert!(!json.contains("\"similarity\""), "raw similarity is not part of the output");
}
