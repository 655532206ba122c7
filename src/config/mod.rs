//! Configuration management.

use serde::Deserialize;
use std::path::Path;

/// Main configuration for recollect.
///
/// Covers the filesystem layout knobs and the default result limit. The
/// scoring weights, the recency half-life, and the scope-widening
/// threshold are part of the ranking contract and deliberately not
/// configurable.
#[derive(Debug, Clone)]
pub struct RecollectConfig {
    /// Directory name holding category directories under each root.
    pub memory_dir: String,
    /// Note file extension (without the dot).
    pub note_extension: String,
    /// Marker filename identifying a workspace root.
    pub workspace_marker: String,
    /// Default maximum number of recall results.
    pub max_results: usize,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Memory directory name.
    pub memory_dir: Option<String>,
    /// Note file extension.
    pub note_extension: Option<String>,
    /// Workspace marker filename.
    pub workspace_marker: Option<String>,
    /// Max results.
    pub max_results: Option<usize>,
}

impl Default for RecollectConfig {
    fn default() -> Self {
        Self {
            memory_dir: "memory".to_string(),
            note_extension: "md".to_string(),
            workspace_marker: "workspace.json".to_string(),
            max_results: 10,
        }
    }
}

impl RecollectConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: e.to_string(),
            })?;

        let file: ConfigFile =
            toml::from_str(&contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/recollect/` on macOS)
    /// 2. XDG config dir (`~/.config/recollect/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        // Check platform-specific config dir first
        let platform_config = base_dirs.config_dir().join("recollect").join("config.toml");
        if platform_config.exists() {
            if let Ok(config) = Self::load_from_file(&platform_config) {
                return config;
            }
        }

        // Fall back to XDG-style ~/.config/recollect/ for Unix compatibility
        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join("recollect")
            .join("config.toml");
        if xdg_config.exists() {
            if let Ok(config) = Self::load_from_file(&xdg_config) {
                return config;
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `RecollectConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(memory_dir) = file.memory_dir {
            config.memory_dir = memory_dir;
        }
        if let Some(note_extension) = file.note_extension {
            config.note_extension = note_extension.trim_start_matches('.').to_string();
        }
        if let Some(workspace_marker) = file.workspace_marker {
            config.workspace_marker = workspace_marker;
        }
        if let Some(max_results) = file.max_results {
            config.max_results = max_results;
        }

        config
    }

    /// Sets the memory directory name.
    #[must_use]
    pub fn with_memory_dir(mut self, memory_dir: impl Into<String>) -> Self {
        self.memory_dir = memory_dir.into();
        self
    }

    /// Sets the default maximum number of recall results.
    #[must_use]
    pub const fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}
