use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Describes where an application keeps its files.
///
/// All fields are optional; an empty `subdir` makes the resolver return the
/// bare base directories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application directory, appended to every base path. Segments are
    /// separated by `/`, e.g. `"foo/bar"`.
    pub subdir: String,

    /// Replaces `subdir` on Unix (including Termux) when non-empty.
    pub subdir_unix: String,
    /// Replaces `subdir` on macOS and iOS when non-empty.
    pub subdir_darwin_ios: String,
    /// Replaces `subdir` on Windows when non-empty.
    pub subdir_windows: String,
    /// Replaces `subdir` on Plan 9 when non-empty.
    pub subdir_plan9: String,

    /// Use the roaming profile for the per-user config directory on Windows.
    /// No effect elsewhere, and none in system-wide mode.
    pub use_roaming: bool,

    /// Appended to the config directory if it collides with the state or
    /// cache directory. Ignored when `subdir` is empty.
    pub subdir_config: String,
    /// Appended to the state directory if it collides with the config or
    /// cache directory. Ignored when `subdir` is empty.
    pub subdir_state: String,
    /// Appended to the cache directory if it collides with the config or
    /// state directory. Ignored when `subdir` is empty.
    pub subdir_cache: String,
}

impl AppConfig {
    pub fn new(subdir: impl Into<String>) -> Self {
        Self {
            subdir: subdir.into(),
            ..Default::default()
        }
    }

    pub fn with_config_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.subdir_config = suffix.into();
        self
    }

    pub fn with_state_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.subdir_state = suffix.into();
        self
    }

    pub fn with_cache_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.subdir_cache = suffix.into();
        self
    }

    pub fn with_roaming(mut self, use_roaming: bool) -> Self {
        self.use_roaming = use_roaming;
        self
    }

    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))
    }
}
