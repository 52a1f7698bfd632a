use crate::error::{DiggerError, Result};
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_LISTING_BASE: &str = "https://pydigger.com/search/has-vcs-no-author";
pub const DEFAULT_METADATA_BASE: &str = "https://pydigger.com/pypi";
pub const DEFAULT_HISTORY_PATH: &str = "git_log.txt";
pub const DEFAULT_ENTRIES: usize = 20;
pub const LEGACY_MANIFEST: &str = "setup.py";
pub const MODERN_MANIFEST: &str = "pyproject.toml";

/// Everything a run needs to know, passed into [`crate::execute_run`].
#[derive(Debug, Clone)]
pub struct DiggerConfig {
    /// Number of listing entries to examine, most recent first
    pub entries: usize,
    pub listing_base: String,
    pub metadata_base: String,
    pub history_path: PathBuf,
    /// Concurrent fetches per stage
    pub workers: usize,
    pub timeout_secs: u64,
    pub legacy_marker: String,
    pub modern_marker: String,
    /// Report without appending to the history store
    pub dry_run: bool,
}

impl Default for DiggerConfig {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ENTRIES,
            listing_base: DEFAULT_LISTING_BASE.to_string(),
            metadata_base: DEFAULT_METADATA_BASE.to_string(),
            history_path: PathBuf::from(DEFAULT_HISTORY_PATH),
            workers: 1,
            timeout_secs: 10,
            legacy_marker: LEGACY_MANIFEST.to_string(),
            modern_marker: MODERN_MANIFEST.to_string(),
            dry_run: false,
        }
    }
}

impl DiggerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.entries == 0 {
            return Err(DiggerError::Config("entries must be at least 1".to_string()));
        }
        if self.workers == 0 {
            return Err(DiggerError::Config("workers must be at least 1".to_string()));
        }
        if self.legacy_marker.is_empty() || self.modern_marker.is_empty() {
            return Err(DiggerError::Config("manifest markers must not be empty".to_string()));
        }
        Ok(())
    }

    /// `<listing_base>?q=&page=1&limit=<entries>`
    pub fn listing_url(&self) -> Result<String> {
        let limit = self.entries.to_string();
        let url = Url::parse_with_params(
            &self.listing_base,
            &[("q", ""), ("page", "1"), ("limit", limit.as_str())],
        )
        .map_err(|e| {
            DiggerError::Config(format!("invalid listing URL {}: {}", self.listing_base, e))
        })?;
        Ok(url.to_string())
    }

    pub fn metadata_url(&self, id: &str) -> String {
        format!("{}/{}", self.metadata_base.trim_end_matches('/'), id)
    }
}
