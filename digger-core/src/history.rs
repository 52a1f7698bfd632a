// Append-only history of previously reported hosting links

use crate::error::{DiggerError, Result};
use crate::model::HostingLink;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info};

/// Previously reported links, as the set of whitespace-separated tokens of
/// the history blob.
#[derive(Debug, Clone, Default)]
pub struct History {
    tokens: HashSet<String>,
}

impl History {
    pub fn from_blob(blob: &str) -> Self {
        Self {
            tokens: blob.split_whitespace().map(str::to_string).collect(),
        }
    }

    /// Token-exact membership; a link that only appears inside a longer
    /// token does not count.
    pub fn contains(&self, link: &HostingLink) -> bool {
        self.tokens.contains(link.as_str())
    }

    /// Split `links` into (unreported, previously reported), both in input order.
    pub fn partition(&self, links: Vec<HostingLink>) -> (Vec<HostingLink>, Vec<HostingLink>) {
        links.into_iter().partition(|link| !self.contains(link))
    }

    pub fn filter(&self, links: Vec<HostingLink>) -> Vec<HostingLink> {
        self.partition(links).0
    }
}

/// Read the whole history store.
pub fn load(path: &Path) -> Result<History> {
    let blob = fs::read_to_string(path).map_err(|source| DiggerError::StoreUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let history = History::from_blob(&blob);
    debug!("Loaded {} history tokens from {}", history.tokens.len(), path.display());
    Ok(history)
}

/// Drop every link already present in the history store at `path`.
pub fn filter_logged(links: Vec<HostingLink>, path: &Path) -> Result<Vec<HostingLink>> {
    Ok(load(path)?.filter(links))
}

/// Format a results block: blank-line separator, a `Results <timestamp> :`
/// header, then one link per line.
pub fn format_block(links: &[HostingLink], timestamp: DateTime<Utc>) -> String {
    let body: Vec<&str> = links.iter().map(HostingLink::as_str).collect();
    format!(
        "\n\n\n\nResults {} :\n{}\n",
        timestamp.format("%Y-%m-%d %H:%M:%S%.6f"),
        body.join("\n")
    )
}

/// Append a results block to the store. Existing content is never rewritten.
pub fn append(path: &Path, links: &[HostingLink], timestamp: DateTime<Utc>) -> Result<()> {
    let write_failed = |source: io::Error| DiggerError::StoreWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(write_failed)?;
    file.write_all(format_block(links, timestamp).as_bytes())
        .map_err(write_failed)?;

    info!("Appended {} link(s) to {}", links.len(), path.display());
    Ok(())
}

/// Create an empty history store. An existing store is left alone unless
/// `force` is set, in which case it is emptied.
///
/// Returns whether a new empty store was written.
pub fn init(path: &Path, force: bool) -> Result<bool> {
    let write_failed = |source: io::Error| DiggerError::StoreWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if path.exists() && !force {
        return Ok(false);
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(write_failed)?;
    }
    fs::write(path, "").map_err(write_failed)?;
    Ok(true)
}
