//! Memory items, categories, and the merged inheritance view.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Memory note categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Architectural and design decisions.
    #[default]
    Decisions,
    /// Pitfalls and surprising behavior worth remembering.
    Gotchas,
    /// Stylistic and tooling preferences.
    Preferences,
    /// Summaries carried over from previous sessions.
    Conversations,
}

impl Category {
    /// Returns all category variants.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Decisions,
            Self::Gotchas,
            Self::Preferences,
            Self::Conversations,
        ]
    }

    /// Returns the category as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Decisions => "decisions",
            Self::Gotchas => "gotchas",
            Self::Preferences => "preferences",
            Self::Conversations => "conversations",
        }
    }

    /// Returns how project and workspace items combine for this category.
    ///
    /// Decisions and preferences carry per-topic authority, so the project
    /// overrides the workspace topic-by-topic. Gotchas and conversations are
    /// cumulative and combine as a plain union.
    #[must_use]
    pub const fn merge_policy(&self) -> MergePolicy {
        match self {
            Self::Decisions | Self::Preferences => MergePolicy::Override,
            Self::Gotchas | Self::Conversations => MergePolicy::Union,
        }
    }

    /// Parses a category from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "decisions" => Some(Self::Decisions),
            "gotchas" => Some(Self::Gotchas),
            "preferences" => Some(Self::Preferences),
            "conversations" => Some(Self::Conversations),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a category combines project and workspace items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergePolicy {
    /// Project items win on topic collision; workspace items fill the gaps.
    Override,
    /// Project and workspace items are concatenated, project first.
    Union,
}

/// Which memory root an item was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemorySource {
    /// The project's own memory directory.
    Project,
    /// The containing workspace's memory directory.
    Workspace,
}

impl MemorySource {
    /// Returns the source as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Workspace => "workspace",
        }
    }

    /// Base relevance weight for items loaded from this source.
    #[must_use]
    pub const fn relevance(&self) -> f64 {
        match self {
            Self::Project => 1.0,
            Self::Workspace => 0.5,
        }
    }
}

impl fmt::Display for MemorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single memory note loaded from disk.
///
/// One file under `<root>/memory/<category>/` becomes one item. The filename
/// minus its extension is the `topic`, which is the item's identity in
/// override merges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryItem {
    /// Filename minus extension; identity within override merges.
    pub topic: String,
    /// Trimmed file contents.
    pub text: String,
    /// Which root the item came from.
    pub source: MemorySource,
    /// Base relevance weight, fixed by source (1.0 project, 0.5 workspace).
    pub relevance: f64,
    /// The category the item was read under.
    pub category: Category,
}

impl MemoryItem {
    /// Creates a memory item with the relevance implied by its source.
    #[must_use]
    pub fn new(
        topic: impl Into<String>,
        text: impl Into<String>,
        source: MemorySource,
        category: Category,
    ) -> Self {
        Self {
            topic: topic.into(),
            text: text.into(),
            source,
            relevance: source.relevance(),
            category,
        }
    }
}

/// The merged view of project and workspace memory, one list per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedMemorySet {
    /// Merged decisions (override policy).
    pub decisions: Vec<MemoryItem>,
    /// Merged gotchas (union policy).
    pub gotchas: Vec<MemoryItem>,
    /// Merged preferences (override policy).
    pub preferences: Vec<MemoryItem>,
    /// Merged conversation summaries (union policy).
    pub conversations: Vec<MemoryItem>,
}

impl MergedMemorySet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            decisions: Vec::new(),
            gotchas: Vec::new(),
            preferences: Vec::new(),
            conversations: Vec::new(),
        }
    }

    /// Returns the items for a category.
    #[must_use]
    pub fn items(&self, category: Category) -> &[MemoryItem] {
        match category {
            Category::Decisions => &self.decisions,
            Category::Gotchas => &self.gotchas,
            Category::Preferences => &self.preferences,
            Category::Conversations => &self.conversations,
        }
    }

    /// Replaces the items for a category.
    pub fn set_items(&mut self, category: Category, items: Vec<MemoryItem>) {
        match category {
            Category::Decisions => self.decisions = items,
            Category::Gotchas => self.gotchas = items,
            Category::Preferences => self.preferences = items,
            Category::Conversations => self.conversations = items,
        }
    }

    /// Total number of items across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decisions.len()
            + self.gotchas.len()
            + self.preferences.len()
            + self.conversations.len()
    }

    /// Returns true if no category holds any items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over all items in category order.
    pub fn iter(&self) -> impl Iterator<Item = &MemoryItem> {
        Category::all()
            .iter()
            .flat_map(|category| self.items(*category).iter())
    }
}
