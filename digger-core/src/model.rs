use serde::{Deserialize, Serialize};
use std::fmt;

/// A package from the listing page, with the URL of its metadata page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub metadata_url: String,
}

impl Candidate {
    pub fn new(id: impl Into<String>, metadata_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metadata_url: metadata_url.into(),
        }
    }
}

/// URL of a project page on a hosting provider.
///
/// Compared as a raw string: no scheme, case or trailing-slash normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostingLink(String);

impl HostingLink {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostingLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for HostingLink {
    fn from(url: String) -> Self {
        Self(url)
    }
}

impl From<&str> for HostingLink {
    fn from(url: &str) -> Self {
        Self(url.to_string())
    }
}

/// Counts at each stage boundary of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub listed: usize,
    pub linked: usize,
    pub with_legacy_manifest: usize,
    pub without_modern_manifest: usize,
    pub previously_reported: usize,
    pub unreported: usize,
}
