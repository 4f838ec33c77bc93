use crate::retry::RetryPolicy;
use crate::scan::ScanFilter;
use albumsync_config::Config;
use std::path::PathBuf;

/// Run-wide settings shared by every engine component.
#[derive(Debug, Clone)]
pub struct Context {
    /// Library root; each sub-directory maps to an album.
    pub root: PathBuf,
    pub filter: ScanFilter,
    /// Applied to empty pages while reading the inventory.
    pub retrieve: RetryPolicy,
    /// Applied to whole upload-and-place attempts.
    pub upload: RetryPolicy,
    pub delete_duplicates: bool,
}

impl Context {
    /// Defaults for everything but the root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let config = Config::default();
        Self {
            root: root.into(),
            filter: ScanFilter::default(),
            retrieve: RetryPolicy::new(config.retrieve_attempts, config.retrieve_interval()),
            upload: RetryPolicy::new(config.upload_attempts, config.upload_interval()),
            delete_duplicates: config.delete_dupes,
        }
    }

    pub fn from_config(config: &Config) -> albumsync_config::error::Result<Self> {
        Ok(Self {
            root: config.library_path()?.to_path_buf(),
            filter: ScanFilter::from_config(config),
            retrieve: RetryPolicy::new(config.retrieve_attempts, config.retrieve_interval()),
            upload: RetryPolicy::new(config.upload_attempts, config.upload_interval()),
            delete_duplicates: config.delete_dupes,
        })
    }

    pub fn with_filter(mut self, filter: ScanFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_retrieve(mut self, policy: RetryPolicy) -> Self {
        self.retrieve = policy;
        self
    }

    pub fn with_upload(mut self, policy: RetryPolicy) -> Self {
        self.upload = policy;
        self
    }

    pub fn with_delete_duplicates(mut self, enabled: bool) -> Self {
        self.delete_duplicates = enabled;
        self
    }
}
