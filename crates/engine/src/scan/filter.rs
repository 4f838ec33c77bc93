use albumsync_config::{Config, normalize_extension};
use std::collections::HashSet;
use std::path::Path;

/// Which directories to prune and which file extensions to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFilter {
    skip_dirs: HashSet<String>,
    /// Lowercase, without the leading dot.
    extensions: HashSet<String>,
}

impl ScanFilter {
    pub fn new<S: AsRef<str>>(skip_dirs: impl IntoIterator<Item = S>, extensions: impl IntoIterator<Item = S>) -> Self {
        Self {
            skip_dirs: skip_dirs.into_iter().map(|d| d.as_ref().to_string()).collect(),
            extensions: extensions
                .into_iter()
                .map(|e| normalize_extension(e.as_ref()))
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            skip_dirs: config.skip_dir_set(),
            extensions: config.extension_set(),
        }
    }

    /// Whether the directory at `path` is pruned, judged by its base name.
    pub fn skips_dir(&self, path: &Path) -> bool {
        path.file_name().and_then(|n| n.to_str()).is_some_and(|name| self.skip_dirs.contains(name))
    }

    /// Whether the last extension of `path` is allowed, ignoring case.
    pub fn allows(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|extension| self.extensions.contains(&extension.to_ascii_lowercase()))
    }
}

impl Default for ScanFilter {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
